//! Concurrent GDS session caps.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

pub const DEFAULT_MAX_SESSIONS_PER_USER: u32 = 3;
pub const DEFAULT_MAX_SESSIONS_PER_COMPANY: u32 = 50;

/// Per-user and per-company session limits.
///
/// `per_user` never exceeds `per_company`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLimits")]
pub struct SessionLimits {
    per_user: u32,
    per_company: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLimits {
    per_user: u32,
    per_company: u32,
}

impl TryFrom<RawLimits> for SessionLimits {
    type Error = EditorError;

    fn try_from(raw: RawLimits) -> Result<Self> {
        Self::new(raw.per_user, raw.per_company)
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            per_user: DEFAULT_MAX_SESSIONS_PER_USER,
            per_company: DEFAULT_MAX_SESSIONS_PER_COMPANY,
        }
    }
}

impl SessionLimits {
    pub fn new(per_user: u32, per_company: u32) -> Result<Self> {
        if per_user > per_company {
            return Err(EditorError::SessionLimitExceeded {
                per_user,
                per_company,
            });
        }
        Ok(Self {
            per_user,
            per_company,
        })
    }

    pub fn per_user(&self) -> u32 {
        self.per_user
    }

    pub fn per_company(&self) -> u32 {
        self.per_company
    }

    pub fn with_per_user(self, per_user: u32) -> Result<Self> {
        Self::new(per_user, self.per_company)
    }

    pub fn with_per_company(self, per_company: u32) -> Result<Self> {
        Self::new(self.per_user, per_company)
    }
}
