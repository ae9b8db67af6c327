use crate::error::ApiError;

/// Pure arithmetic behind the leave balance ledger. Mirrors the conditional
/// `UPDATE ... WHERE balance >= ?` the handlers issue, so the invariants are
/// unit-testable without a database.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry {
    pub allocated: f64,
    pub used: f64,
    pub balance: f64,
}

impl LedgerEntry {
    /// Fresh entry for a benefit year: nothing used yet.
    pub fn allocate(quota: f64) -> Self {
        Self {
            allocated: quota,
            used: 0.0,
            balance: quota,
        }
    }

    /// Zero-valued view for quota-free leave types.
    pub fn empty() -> Self {
        Self {
            allocated: 0.0,
            used: 0.0,
            balance: 0.0,
        }
    }

    /// Debits `days` from the entry. Fails without mutating anything when the
    /// remaining balance does not cover the request; never clamps.
    pub fn debit(&self, days: f64) -> Result<Self, ApiError> {
        if days <= 0.0 {
            return Err(ApiError::Validation("debit must be a positive number of days".into()));
        }
        if days > self.balance {
            return Err(ApiError::InsufficientBalance {
                requested: days,
                available: self.balance,
            });
        }
        Ok(Self {
            allocated: self.allocated,
            used: self.used + days,
            balance: self.balance - days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_moves_days_from_balance_to_used() {
        let entry = LedgerEntry::allocate(12.0);
        let after = entry.debit(2.0).unwrap();
        assert_eq!(after.used, 2.0);
        assert_eq!(after.balance, 10.0);
        assert_eq!(after.allocated, 12.0);
    }

    #[test]
    fn balance_equals_allocated_minus_used_after_every_debit() {
        let mut entry = LedgerEntry::allocate(20.0);
        for days in [1.0, 0.5, 3.0, 2.5] {
            entry = entry.debit(days).unwrap();
            assert_eq!(entry.balance, entry.allocated - entry.used);
        }
    }

    #[test]
    fn overdraw_fails_and_leaves_entry_unchanged() {
        let entry = LedgerEntry {
            allocated: 12.0,
            used: 10.0,
            balance: 2.0,
        };
        let err = entry.debit(3.0).unwrap_err();
        assert!(matches!(err, ApiError::InsufficientBalance { .. }));
        assert_eq!(entry.balance, 2.0);
        assert_eq!(entry.used, 10.0);
    }

    #[test]
    fn debit_to_exactly_zero_is_allowed() {
        let entry = LedgerEntry::allocate(2.0);
        let after = entry.debit(2.0).unwrap();
        assert_eq!(after.balance, 0.0);
    }

    #[test]
    fn non_positive_debit_is_rejected() {
        let entry = LedgerEntry::allocate(5.0);
        assert!(entry.debit(0.0).is_err());
        assert!(entry.debit(-1.0).is_err());
    }
}
