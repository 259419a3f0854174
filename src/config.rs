use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{Result, SettlementError};
use crate::types::PayoutType;

/// live product configuration
///
/// this is the editable catalogue entry. investments never read it after
/// subscription; they carry an [`InvestmentSnapshot`](crate::snapshot::InvestmentSnapshot)
/// copied from it instead. only [`ProductConfigBuilder::build`] creates one,
/// so every instance has passed validation; reprice through [`ProductConfig::to_builder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductConfig {
    product_code: String,
    product_name: String,
    policy_term_months: u32,
    payout_type: PayoutType,
    interest_rate_monthly: Rate,
    interest_rate_maturity: Rate,
    negotiation_rate: Rate,
    early_break_rate_monthly: Rate,
    early_break_rate_maturity: Rate,
}

impl ProductConfig {
    pub fn builder(code: impl Into<String>, name: impl Into<String>) -> ProductConfigBuilder {
        ProductConfigBuilder::new(code, name)
    }

    /// builder seeded with this product's terms, for repricing a catalogue entry
    pub fn to_builder(&self) -> ProductConfigBuilder {
        ProductConfigBuilder::new(self.product_code.clone(), self.product_name.clone())
            .term_months(self.policy_term_months)
            .payout_type(self.payout_type)
            .interest_rate_monthly(self.interest_rate_monthly.as_percentage())
            .interest_rate_maturity(self.interest_rate_maturity.as_percentage())
            .negotiation_rate(self.negotiation_rate.as_percentage())
            .early_break_rate_monthly(self.early_break_rate_monthly.as_percentage())
            .early_break_rate_maturity(self.early_break_rate_maturity.as_percentage())
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

    /// twelve month fixed deposit paying interest every month
    pub fn monthly_fixed_deposit(code: &str, name: &str) -> Result<Self> {
        ProductConfigBuilder::new(code, name)
            .term_months(12)
            .payout_type(PayoutType::Monthly)
            .interest_rate_monthly(dec!(12))
            .interest_rate_maturity(dec!(13))
            .early_break_rate_monthly(dec!(8))
            .early_break_rate_maturity(dec!(9))
            .build()
    }

    /// twelve month fixed deposit paying everything at maturity
    pub fn maturity_fixed_deposit(code: &str, name: &str) -> Result<Self> {
        ProductConfigBuilder::new(code, name)
            .term_months(12)
            .payout_type(PayoutType::Maturity)
            .interest_rate_monthly(dec!(9.5))
            .interest_rate_maturity(dec!(10))
            .early_break_rate_monthly(dec!(6))
            .early_break_rate_maturity(dec!(7))
            .build()
    }
}

/// builder for product configurations, rates given as percentages
#[derive(Debug, Clone)]
pub struct ProductConfigBuilder {
    product_code: String,
    product_name: String,
    policy_term_months: u32,
    payout_type: PayoutType,
    interest_rate_monthly: Decimal,
    interest_rate_maturity: Decimal,
    negotiation_rate: Decimal,
    early_break_rate_monthly: Decimal,
    early_break_rate_maturity: Decimal,
}

impl ProductConfigBuilder {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            product_code: code.into(),
            product_name: name.into(),
            policy_term_months: 12,
            payout_type: PayoutType::Maturity,
            interest_rate_monthly: Decimal::ZERO,
            interest_rate_maturity: Decimal::ZERO,
            negotiation_rate: Decimal::ZERO,
            early_break_rate_monthly: Decimal::ZERO,
            early_break_rate_maturity: Decimal::ZERO,
        }
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.policy_term_months = months;
        self
    }

    pub fn payout_type(mut self, payout_type: PayoutType) -> Self {
        self.payout_type = payout_type;
        self
    }

    pub fn interest_rate_monthly(mut self, percent: Decimal) -> Self {
        self.interest_rate_monthly = percent;
        self
    }

    pub fn interest_rate_maturity(mut self, percent: Decimal) -> Self {
        self.interest_rate_maturity = percent;
        self
    }

    pub fn negotiation_rate(mut self, percent: Decimal) -> Self {
        self.negotiation_rate = percent;
        self
    }

    pub fn early_break_rate_monthly(mut self, percent: Decimal) -> Self {
        self.early_break_rate_monthly = percent;
        self
    }

    pub fn early_break_rate_maturity(mut self, percent: Decimal) -> Self {
        self.early_break_rate_maturity = percent;
        self
    }

    pub fn build(self) -> Result<ProductConfig> {
        if self.product_code.trim().is_empty() || self.product_name.trim().is_empty() {
            return Err(SettlementError::InvalidConfiguration {
                message: "product code and name are required".to_string(),
            });
        }

        if self.policy_term_months == 0 {
            return Err(SettlementError::InvalidConfiguration {
                message: "policy term must be at least one month".to_string(),
            });
        }

        let rates = [
            ("interest_rate_monthly", self.interest_rate_monthly),
            ("interest_rate_maturity", self.interest_rate_maturity),
            ("negotiation_rate", self.negotiation_rate),
            ("early_break_rate_monthly", self.early_break_rate_monthly),
            ("early_break_rate_maturity", self.early_break_rate_maturity),
        ];
        if let Some((name, rate)) = rates.iter().find(|(_, r)| *r < Decimal::ZERO) {
            return Err(SettlementError::InvalidConfiguration {
                message: format!("{name} cannot be negative: {rate}"),
            });
        }

        if self.early_break_rate_monthly > self.interest_rate_monthly
            || self.early_break_rate_maturity > self.interest_rate_maturity
        {
            log::warn!(
                "product {}: early break rate exceeds the normal rate, breaking early will not claw back interest",
                self.product_code
            );
        }

        Ok(ProductConfig {
            product_code: self.product_code,
            product_name: self.product_name,
            policy_term_months: self.policy_term_months,
            payout_type: self.payout_type,
            interest_rate_monthly: Rate::from_percent(self.interest_rate_monthly),
            interest_rate_maturity: Rate::from_percent(self.interest_rate_maturity),
            negotiation_rate: Rate::from_percent(self.negotiation_rate),
            early_break_rate_monthly: Rate::from_percent(self.early_break_rate_monthly),
            early_break_rate_maturity: Rate::from_percent(self.early_break_rate_maturity),
        })
    }
}

/// whether the negotiated surcharge feeds the rate used for settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationRatePolicy {
    /// shown on the preview but not applied
    Informational,
    /// added on top of the normal rate; break rates are left untouched
    Additive,
}

/// settlement engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    pub negotiation_rate_policy: NegotiationRatePolicy,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            negotiation_rate_policy: NegotiationRatePolicy::Informational,
        }
    }
}

impl SettlementConfig {
    pub fn additive_negotiation() -> Self {
        Self {
            negotiation_rate_policy: NegotiationRatePolicy::Additive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_converts_percentages() {
        let product = ProductConfig::builder("FD-12M", "Fixed Deposit 12M")
            .term_months(12)
            .payout_type(PayoutType::Monthly)
            .interest_rate_monthly(dec!(12))
            .negotiation_rate(dec!(0.5))
            .early_break_rate_monthly(dec!(8))
            .build()
            .unwrap();

        assert_eq!(product.interest_rate_monthly(), Rate::from_percentage(12));
        assert_eq!(product.negotiation_rate().as_decimal(), dec!(0.005));
        assert_eq!(product.early_break_rate_monthly(), Rate::from_percentage(8));
    }

    #[test]
    fn test_zero_term_rejected() {
        let result = ProductConfig::builder("FD-0", "Broken").term_months(0).build();
        assert!(matches!(result, Err(SettlementError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = ProductConfig::builder("FD-NEG", "Negative")
            .interest_rate_maturity(dec!(-1))
            .build();
        assert!(matches!(result, Err(SettlementError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_blank_code_rejected() {
        let result = ProductConfig::builder("  ", "Unnamed").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_presets() {
        let monthly = ProductConfig::monthly_fixed_deposit("FD-M", "Monthly").unwrap();
        assert_eq!(monthly.payout_type(), PayoutType::Monthly);

        let maturity = ProductConfig::maturity_fixed_deposit("FD-X", "Maturity").unwrap();
        assert_eq!(maturity.payout_type(), PayoutType::Maturity);
        assert_eq!(maturity.interest_rate_maturity(), Rate::from_percentage(10));
    }

    #[test]
    fn test_reprice_through_builder() {
        let current = ProductConfig::maturity_fixed_deposit("FD-X", "Maturity").unwrap();

        let repriced = current.to_builder().interest_rate_maturity(dec!(11)).build().unwrap();
        assert_eq!(repriced.interest_rate_maturity(), Rate::from_percentage(11));
        assert_eq!(repriced.early_break_rate_maturity(), current.early_break_rate_maturity());
        assert_eq!(repriced.product_code(), "FD-X");

        // repricing is validated like any other build
        let broken = current.to_builder().early_break_rate_maturity(dec!(-2)).build();
        assert!(matches!(broken, Err(SettlementError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_default_policy_is_informational() {
        assert_eq!(
            SettlementConfig::default().negotiation_rate_policy,
            NegotiationRatePolicy::Informational
        );
    }
}
