use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowanceType {
    Personal,
    Donation,
    KReceipt,
}

impl AllowanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Donation => "donation",
            Self::KReceipt => "k-receipt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "personal" => Some(Self::Personal),
            "donation" => Some(Self::Donation),
            "k-receipt" => Some(Self::KReceipt),
            _ => None,
        }
    }

    /// Whether a calculation request may claim this allowance directly.
    /// The personal allowance is always applied by the engine instead.
    pub fn is_claimable(&self) -> bool {
        matches!(self, Self::Donation | Self::KReceipt)
    }

    /// Whether an administrator may move this allowance's upper bound.
    pub fn is_adjustable(&self) -> bool {
        matches!(self, Self::Personal | Self::KReceipt)
    }
}

impl std::fmt::Display for AllowanceType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured lower and upper bound for one allowance type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceBound {
    pub allowance_type: AllowanceType,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
}

impl AllowanceBound {
    pub fn contains(
        &self,
        amount: Decimal,
    ) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }
}

/// A single allowance claimed on a calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceDetail {
    pub allowance_type: AllowanceType,
    pub amount: Decimal,
}

impl AllowanceDetail {
    pub fn new(
        allowance_type: AllowanceType,
        amount: Decimal,
    ) -> Self {
        Self {
            allowance_type,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn as_str_and_parse_round_trip() {
        for t in [
            AllowanceType::Personal,
            AllowanceType::Donation,
            AllowanceType::KReceipt,
        ] {
            assert_eq!(AllowanceType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn parse_rejects_unknown_code() {
        assert_eq!(AllowanceType::parse("K-Receipt"), None);
        assert_eq!(AllowanceType::parse(""), None);
    }

    #[test]
    fn display_matches_stored_code() {
        assert_eq!(AllowanceType::KReceipt.to_string(), "k-receipt");
        assert_eq!(AllowanceType::Personal.to_string(), "personal");
    }

    #[test]
    fn only_donation_and_k_receipt_are_claimable() {
        assert!(!AllowanceType::Personal.is_claimable());
        assert!(AllowanceType::Donation.is_claimable());
        assert!(AllowanceType::KReceipt.is_claimable());
    }

    #[test]
    fn only_personal_and_k_receipt_are_adjustable() {
        assert!(AllowanceType::Personal.is_adjustable());
        assert!(!AllowanceType::Donation.is_adjustable());
        assert!(AllowanceType::KReceipt.is_adjustable());
    }

    #[test]
    fn bound_contains_is_inclusive() {
        let bound = AllowanceBound {
            allowance_type: AllowanceType::KReceipt,
            min_amount: dec!(0),
            max_amount: dec!(50000),
        };

        assert!(bound.contains(dec!(0)));
        assert!(bound.contains(dec!(50000)));
        assert!(!bound.contains(dec!(50000.01)));
        assert!(!bound.contains(dec!(-1)));
    }
}
