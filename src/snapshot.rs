use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{NegotiationRatePolicy, ProductConfig};
use crate::decimal::Rate;
use crate::types::PayoutType;

/// contract terms frozen at subscription time
///
/// fields are private and there are no setters, so once captured a snapshot
/// cannot drift from what the customer signed. renewal captures a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSnapshot {
    product_code: String,
    product_name: String,
    policy_term_months: u32,
    payout_type: PayoutType,
    interest_rate_monthly: Rate,
    interest_rate_maturity: Rate,
    negotiation_rate: Rate,
    early_break_rate_monthly: Rate,
    early_break_rate_maturity: Rate,
    captured_at: DateTime<Utc>,
}

impl InvestmentSnapshot {
    /// copy the current product terms by value
    pub fn capture(product: &ProductConfig, captured_at: DateTime<Utc>) -> Self {
        Self {
            product_code: product.product_code().to_string(),
            product_name: product.product_name().to_string(),
            policy_term_months: product.policy_term_months(),
            payout_type: product.payout_type(),
            interest_rate_monthly: product.interest_rate_monthly(),
            interest_rate_maturity: product.interest_rate_maturity(),
            negotiation_rate: product.negotiation_rate(),
            early_break_rate_monthly: product.early_break_rate_monthly(),
            early_break_rate_maturity: product.early_break_rate_maturity(),
            captured_at,
        }
    }

    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn policy_term_months(&self) -> u32 {
        self.policy_term_months
    }

    pub fn payout_type(&self) -> PayoutType {
        self.payout_type
    }

    pub fn interest_rate_monthly(&self) -> Rate {
        self.interest_rate_monthly
    }

    pub fn interest_rate_maturity(&self) -> Rate {
        self.interest_rate_maturity
    }

    pub fn negotiation_rate(&self) -> Rate {
        self.negotiation_rate
    }

    pub fn early_break_rate_monthly(&self) -> Rate {
        self.early_break_rate_monthly
    }

    pub fn early_break_rate_maturity(&self) -> Rate {
        self.early_break_rate_maturity
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// contractual rate for this payout type, with the negotiated
    /// surcharge added when the policy says so
    pub fn normal_rate(&self, policy: NegotiationRatePolicy) -> Rate {
        let base = match self.payout_type {
            PayoutType::Monthly => self.interest_rate_monthly,
            PayoutType::Maturity => self.interest_rate_maturity,
        };
        match policy {
            NegotiationRatePolicy::Informational => base,
            NegotiationRatePolicy::Additive => base + self.negotiation_rate,
        }
    }

    /// reduced rate applied retroactively on early exit
    pub fn early_break_rate(&self) -> Rate {
        match self.payout_type {
            PayoutType::Monthly => self.early_break_rate_monthly,
            PayoutType::Maturity => self.early_break_rate_maturity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn product() -> ProductConfig {
        ProductConfig::builder("FD-12M", "Fixed Deposit 12M")
            .payout_type(PayoutType::Monthly)
            .interest_rate_monthly(dec!(12))
            .interest_rate_maturity(dec!(13))
            .negotiation_rate(dec!(0.5))
            .early_break_rate_monthly(dec!(8))
            .early_break_rate_maturity(dec!(9))
            .build()
            .unwrap()
    }

    #[test]
    fn test_capture_is_a_copy() {
        let captured_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let live = product();
        let snapshot = InvestmentSnapshot::capture(&live, captured_at);

        // later edits to the catalogue do not leak into the snapshot
        let repriced = live.to_builder().interest_rate_monthly(dec!(20)).build().unwrap();
        assert_eq!(repriced.interest_rate_monthly(), Rate::from_percentage(20));

        assert_eq!(snapshot.interest_rate_monthly(), Rate::from_percentage(12));
        assert_eq!(snapshot.product_name(), "Fixed Deposit 12M");
        assert_eq!(snapshot.captured_at(), captured_at);
    }

    #[test]
    fn test_rate_selection_by_payout_type() {
        let snapshot = InvestmentSnapshot::capture(&product(), Utc::now());

        assert_eq!(snapshot.normal_rate(NegotiationRatePolicy::Informational), Rate::from_percentage(12));
        assert_eq!(snapshot.early_break_rate(), Rate::from_percentage(8));
        assert_eq!(
            snapshot.normal_rate(NegotiationRatePolicy::Additive).as_percentage(),
            dec!(12.5)
        );

        let maturity = product().to_builder().payout_type(PayoutType::Maturity).build().unwrap();
        let snapshot = InvestmentSnapshot::capture(&maturity, Utc::now());
        assert_eq!(snapshot.normal_rate(NegotiationRatePolicy::Informational), Rate::from_percentage(13));
        assert_eq!(snapshot.early_break_rate(), Rate::from_percentage(9));
    }
}
