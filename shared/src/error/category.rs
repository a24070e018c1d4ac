//! Error category classification

use super::codes::ErrorCode;

/// Classification of error codes by domain, derived from the numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 0xxx: general errors
    General,
    /// 1xxx: authentication errors
    Auth,
    /// 2xxx: permission errors
    Permission,
    /// 4xxx: order errors
    Order,
    /// 6xxx: product errors
    Product,
    /// 8xxx: account errors
    Account,
    /// 9xxx: system errors
    System,
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            0..=999 => ErrorCategory::General,
            1000..=1999 => ErrorCategory::Auth,
            2000..=2999 => ErrorCategory::Permission,
            4000..=4999 => ErrorCategory::Order,
            6000..=6999 => ErrorCategory::Product,
            8000..=8999 => ErrorCategory::Account,
            _ => ErrorCategory::System,
        }
    }
}
