//! Operation types a posting can carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// The fixed set of monetary operations an account accepts.
///
/// Only [`OperationType::CreditVoucher`] increases a balance; every other
/// operation is a debit and goes through the funds check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    NormalPurchase,
    InstallmentPurchase,
    Withdrawal,
    CreditVoucher,
}

impl OperationType {
    pub const ALL: [OperationType; 4] = [
        Self::NormalPurchase,
        Self::InstallmentPurchase,
        Self::Withdrawal,
        Self::CreditVoucher,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NormalPurchase => "normal_purchase",
            Self::InstallmentPurchase => "installment_purchase",
            Self::Withdrawal => "withdrawal",
            Self::CreditVoucher => "credit_voucher",
        }
    }

    /// Returns `true` if the operation adds money to the account.
    #[must_use]
    pub const fn is_credit(self) -> bool {
        match self {
            Self::CreditVoucher => true,
            Self::NormalPurchase | Self::InstallmentPurchase | Self::Withdrawal => false,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<&str> for OperationType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "normal_purchase" => Ok(Self::NormalPurchase),
            "installment_purchase" => Ok(Self::InstallmentPurchase),
            "withdrawal" => Ok(Self::Withdrawal),
            "credit_voucher" => Ok(Self::CreditVoucher),
            other => Err(EngineError::UnsupportedOperation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for op in OperationType::ALL {
            assert_eq!(OperationType::try_from(op.as_str()).unwrap(), op);
        }
    }

    #[test]
    fn only_credit_voucher_is_credit() {
        let credits: Vec<_> = OperationType::ALL
            .into_iter()
            .filter(|op| op.is_credit())
            .collect();
        assert_eq!(credits, vec![OperationType::CreditVoucher]);
    }

    #[test]
    fn unknown_name_is_unsupported() {
        assert_eq!(
            OperationType::try_from("refund"),
            Err(EngineError::UnsupportedOperation("refund".to_string()))
        );
    }
}
