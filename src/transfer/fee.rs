//! Fee policy
//!
//! Pure derivation of the fee and total debit for a requested amount. The
//! engine debits the sender by `amount + fee`; the fee accrues to the
//! treasury wallet.

use rust_decimal::{Decimal, RoundingStrategy};

/// Amounts above this pay the fee: 1000.00
pub fn fee_threshold() -> Decimal {
    Decimal::new(100_000, 2)
}

/// Fee rate applied above the threshold: 0.10
pub fn fee_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// Derive the fee for a requested amount.
///
/// `amount > 1000.00` pays 10%, rounded half-up to 2 places; anything at or
/// below the threshold is free. No failure modes.
#[inline]
pub fn fee_for(amount: Decimal) -> Decimal {
    if amount > fee_threshold() {
        (amount * fee_rate()).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    }
}

/// Total debited from the sender: requested amount plus fee.
#[inline]
pub fn credit_amount(amount: Decimal, fee: Decimal) -> Decimal {
    amount + fee
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_at_threshold_is_free() {
        let amount = dec("1000.00");
        let fee = fee_for(amount);
        assert_eq!(fee, dec("0.00"));
        assert_eq!(credit_amount(amount, fee), dec("1000.00"));
    }

    #[test]
    fn test_just_above_threshold() {
        // 1000.01 * 0.10 = 100.001 -> 100.00
        let amount = dec("1000.01");
        let fee = fee_for(amount);
        assert_eq!(fee, dec("100.00"));
        assert_eq!(credit_amount(amount, fee), dec("1100.01"));
    }

    #[test]
    fn test_below_threshold_is_free() {
        assert_eq!(fee_for(dec("0.01")), dec("0.00"));
        assert_eq!(fee_for(dec("999.99")), dec("0.00"));
    }

    #[test]
    fn test_rounds_half_up() {
        // 1000.25 * 0.10 = 100.025: half-up gives 100.03, banker's would
        // give 100.02
        assert_eq!(fee_for(dec("1000.25")), dec("100.03"));
        assert_eq!(fee_for(dec("1000.15")), dec("100.02"));
    }

    #[test]
    fn test_large_amount() {
        assert_eq!(fee_for(dec("5000.00")), dec("500.00"));
        assert_eq!(fee_for(dec("1001.00")), dec("100.10"));
    }
}
