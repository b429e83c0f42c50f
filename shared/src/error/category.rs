//! Error categories for classifying errors by domain

use serde::{Deserialize, Serialize};

/// Classification of errors by functional domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General request/validation errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Catalog errors (6xxx)
    Catalog,
    /// Sync queue errors (7xxx)
    SyncQueue,
    /// Payment provider errors (8xxx)
    Provider,
    /// System/infrastructure errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Category for a raw error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            1000..=1999 => Self::Auth,
            6000..=6999 => Self::Catalog,
            7000..=7999 => Self::SyncQueue,
            8000..=8999 => Self::Provider,
            9000..=9999 => Self::System,
            _ => Self::General,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ranges() {
        assert_eq!(ErrorCategory::from_code(2), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(6002), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::SyncQueue);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Provider);
        assert_eq!(ErrorCategory::from_code(9002), ErrorCategory::System);
    }
}
