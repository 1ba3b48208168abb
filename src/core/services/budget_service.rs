//! Expense CRUD, read-side filters, and the income balance sheet.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::{LedgerError, LedgerResult};
use crate::ledger::{BudgetLedger, ContributionLedger, Expense};

/// Partial-update payload for an expense. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Running balance of paid contribution income against expenses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSheet {
    pub income: i64,
    pub expenses: f64,
    pub balance: f64,
}

pub struct BudgetService;

impl BudgetService {
    pub fn add(
        budget: &mut BudgetLedger,
        actor: &Actor,
        amount: f64,
        category: &str,
        date: NaiveDate,
        description: Option<String>,
    ) -> LedgerResult<Uuid> {
        actor.ensure_can_write()?;
        if amount <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "expense amount must be positive, got {}",
                amount
            )));
        }
        if category.trim().is_empty() {
            return Err(LedgerError::Validation("category must not be empty".into()));
        }
        let mut expense = Expense::new(amount, category.trim(), date);
        expense.description = description;
        Ok(budget.add(expense))
    }

    pub fn edit(
        budget: &mut BudgetLedger,
        actor: &Actor,
        id: Uuid,
        updates: ExpenseUpdate,
    ) -> LedgerResult<()> {
        actor.ensure_can_write()?;
        if let Some(amount) = updates.amount {
            if amount <= 0.0 {
                return Err(LedgerError::Validation(format!(
                    "expense amount must be positive, got {}",
                    amount
                )));
            }
        }
        if let Some(category) = &updates.category {
            if category.trim().is_empty() {
                return Err(LedgerError::Validation("category must not be empty".into()));
            }
        }
        let expense = budget
            .expense_mut(id)
            .ok_or_else(|| LedgerError::NotFound(format!("no expense {}", id)))?;
        if let Some(amount) = updates.amount {
            expense.amount = amount;
        }
        if let Some(category) = updates.category {
            expense.category = category.trim().to_string();
        }
        if let Some(date) = updates.date {
            expense.date = date;
        }
        if let Some(description) = updates.description {
            expense.description = Some(description);
        }
        budget.touch();
        Ok(())
    }

    pub fn remove(budget: &mut BudgetLedger, actor: &Actor, id: Uuid) -> LedgerResult<Expense> {
        actor.ensure_can_write()?;
        budget
            .remove(id)
            .ok_or_else(|| LedgerError::NotFound(format!("no expense {}", id)))
    }

    pub fn by_category<'a>(budget: &'a BudgetLedger, category: &str) -> Vec<&'a Expense> {
        let needle = category.trim().to_lowercase();
        budget
            .expenses
            .iter()
            .filter(|expense| expense.category.to_lowercase() == needle)
            .collect()
    }

    pub fn in_month(budget: &BudgetLedger, year: i32, month: u32) -> Vec<&Expense> {
        budget
            .expenses
            .iter()
            .filter(|expense| expense.date.year() == year && expense.date.month() == month)
            .collect()
    }

    pub fn in_year(budget: &BudgetLedger, year: i32) -> Vec<&Expense> {
        budget
            .expenses
            .iter()
            .filter(|expense| expense.date.year() == year)
            .collect()
    }

    /// Expenses dated within `start..=end`.
    pub fn in_range(budget: &BudgetLedger, start: NaiveDate, end: NaiveDate) -> Vec<&Expense> {
        budget
            .expenses
            .iter()
            .filter(|expense| expense.date >= start && expense.date <= end)
            .collect()
    }

    /// Income is the sum of every paid contribution across the whole
    /// contribution ledger, deliberately not date-scoped.
    pub fn balance(budget: &BudgetLedger, contributions: &ContributionLedger) -> BalanceSheet {
        let income = contributions.total_paid_income();
        let expenses = budget.total_expenses();
        BalanceSheet {
            income,
            expenses,
            balance: income as f64 - expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Role;
    use crate::calendar::{MonthName, YearKey};
    use crate::ledger::ContributionRecord;

    fn admin() -> Actor {
        Actor::new("ops", Role::Admin)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_validates_amount_and_category() {
        let mut budget = BudgetLedger::new();
        assert!(matches!(
            BudgetService::add(&mut budget, &admin(), -5.0, "Repairs", date(2024, 1, 5), None),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            BudgetService::add(&mut budget, &admin(), 5.0, "  ", date(2024, 1, 5), None),
            Err(LedgerError::Validation(_))
        ));
        assert!(budget.expenses.is_empty());
    }

    #[test]
    fn filters_are_pure_reads() {
        let mut budget = BudgetLedger::new();
        BudgetService::add(&mut budget, &admin(), 120.0, "Repairs", date(2024, 1, 5), None)
            .unwrap();
        BudgetService::add(&mut budget, &admin(), 80.0, "Utilities", date(2024, 2, 10), None)
            .unwrap();
        BudgetService::add(&mut budget, &admin(), 40.0, "repairs", date(2023, 12, 28), None)
            .unwrap();

        assert_eq!(BudgetService::by_category(&budget, "Repairs").len(), 2);
        assert_eq!(BudgetService::in_month(&budget, 2024, 1).len(), 1);
        assert_eq!(BudgetService::in_year(&budget, 2024).len(), 2);
        assert_eq!(
            BudgetService::in_range(&budget, date(2023, 12, 1), date(2024, 1, 31)).len(),
            2
        );
        assert_eq!(budget.expenses.len(), 3);
    }

    #[test]
    fn edit_and_remove_report_missing_ids() {
        let mut budget = BudgetLedger::new();
        let id = BudgetService::add(
            &mut budget,
            &admin(),
            120.0,
            "Repairs",
            date(2024, 1, 5),
            None,
        )
        .unwrap();
        BudgetService::edit(
            &mut budget,
            &admin(),
            id,
            ExpenseUpdate {
                amount: Some(150.0),
                ..ExpenseUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(budget.expense(id).unwrap().amount, 150.0);

        let missing = Uuid::new_v4();
        assert!(matches!(
            BudgetService::remove(&mut budget, &admin(), missing),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn balance_uses_paid_income_across_whole_ledger() {
        let mut contributions = ContributionLedger::new();
        let bucket =
            contributions.ensure_bucket(YearKey::parse("2023").unwrap(), MonthName::December);
        bucket.contributions.push(ContributionRecord {
            name: "Amina".into(),
            amount: 500,
            paid: true,
        });
        bucket.contributions.push(ContributionRecord {
            name: "Kofi".into(),
            amount: 300,
            paid: false,
        });
        bucket.recompute_total();

        let mut budget = BudgetLedger::new();
        BudgetService::add(&mut budget, &admin(), 120.0, "Repairs", date(2024, 1, 5), None)
            .unwrap();

        let sheet = BudgetService::balance(&budget, &contributions);
        assert_eq!(sheet.income, 500);
        assert_eq!(sheet.expenses, 120.0);
        assert_eq!(sheet.balance, 380.0);
    }
}
