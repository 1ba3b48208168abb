use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, LedgerResult};

/// Access level decided by the caller; the ledgers only enforce it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub fn can_write(&self) -> bool {
        !matches!(self, Role::Viewer)
    }
}

/// The effective user of a save cycle. Mutating services take an `Actor`
/// and run `ensure_can_write` as the final check before touching state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn ensure_can_write(&self) -> LedgerResult<()> {
        if self.role.can_write() {
            Ok(())
        } else {
            Err(LedgerError::Permission(format!(
                "`{}` has read-only access",
                self.name
            )))
        }
    }
}
