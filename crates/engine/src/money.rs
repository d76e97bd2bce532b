use std::{fmt, ops::Neg};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{EngineError, OperationType, ResultEngine};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (balances and
/// transaction amounts) to avoid floating-point drift. Decimal amounts only
/// exist at the edges, see [`to_minor_units`] and [`from_minor_units`].
///
/// The value is signed:
/// - positive = credit / increase
/// - negative = debit / decrease
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        f.pad(&format!("{sign}{units}.{cents:02}"))
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

/// Converts an external decimal amount into cents.
///
/// The amount is multiplied by 100 and **truncated toward zero**: `10.999`
/// becomes `1099`, not `1100`. Range and sign checks belong to the caller; the
/// only failure is a value that does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> ResultEngine<MoneyCents> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|scaled| scaled.trunc())
        .and_then(|cents| cents.to_i64())
        .map(MoneyCents)
        .ok_or_else(|| EngineError::InvalidAmount(format!("amount too large: {amount}")))
}

/// Converts cents back into a decimal amount with two fractional digits.
#[must_use]
pub fn from_minor_units(amount: MoneyCents) -> Decimal {
    Decimal::new(amount.0, 2)
}

/// Applies the sign convention of `operation` to an unsigned amount.
///
/// | Operation              | Sign |
/// |------------------------|------|
/// | `credit_voucher`       | `+`  |
/// | `normal_purchase`      | `-`  |
/// | `installment_purchase` | `-`  |
/// | `withdrawal`           | `-`  |
#[must_use]
pub fn apply_sign(amount: MoneyCents, operation: OperationType) -> MoneyCents {
    match operation {
        OperationType::CreditVoucher => amount,
        OperationType::NormalPurchase
        | OperationType::InstallmentPurchase
        | OperationType::Withdrawal => -amount,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn to_minor_units_truncates_toward_zero() {
        assert_eq!(to_minor_units(dec!(100.00)).unwrap().cents(), 10000);
        assert_eq!(to_minor_units(dec!(10.999)).unwrap().cents(), 1099);
        assert_eq!(to_minor_units(dec!(0.019)).unwrap().cents(), 1);
        assert_eq!(to_minor_units(dec!(0.005)).unwrap().cents(), 0);
        assert_eq!(to_minor_units(dec!(-1.239)).unwrap().cents(), -123);
    }

    #[test]
    fn to_minor_units_rejects_values_outside_i64() {
        assert!(to_minor_units(Decimal::MAX).is_err());
        assert!(to_minor_units(dec!(92233720368547758.08)).is_err());
    }

    #[test]
    fn round_trip_keeps_two_decimals() {
        for amount in [dec!(100.00), dec!(50.00), dec!(0.01), dec!(12.34), dec!(999999.99)] {
            let cents = to_minor_units(amount).unwrap();
            assert_eq!(from_minor_units(cents), amount);
        }
        assert_eq!(from_minor_units(MoneyCents::new(10000)).to_string(), "100.00");
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let max = MoneyCents::new(i64::MAX);
        assert_eq!(max.checked_add(MoneyCents::new(1)), None);
        assert_eq!(
            MoneyCents::new(100).checked_sub(MoneyCents::new(250)),
            Some(MoneyCents::new(-150))
        );
    }

    #[test]
    fn sign_table() {
        let amount = MoneyCents::new(2500);
        assert_eq!(apply_sign(amount, OperationType::CreditVoucher).cents(), 2500);
        assert_eq!(apply_sign(amount, OperationType::NormalPurchase).cents(), -2500);
        assert_eq!(
            apply_sign(amount, OperationType::InstallmentPurchase).cents(),
            -2500
        );
        assert_eq!(apply_sign(amount, OperationType::Withdrawal).cents(), -2500);
    }

    #[test]
    fn sign_matches_credit_flag() {
        for op in OperationType::ALL {
            let signed = apply_sign(MoneyCents::new(1), op);
            assert_eq!(signed.is_negative(), !op.is_credit(), "{op}");
        }
    }
}
