use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::ProductConfig;
use crate::decimal::Money;
use crate::errors::{Result, SettlementError};
use crate::investment::Investment;
use crate::payout::InvestmentPayout;
use crate::types::{InvestmentId, InvestmentStatus, PayoutId, PayoutKind, PayoutStatus};

/// investment records
pub trait InvestmentRepository {
    fn get_investment(&self, id: InvestmentId) -> Result<Investment>;

    fn insert_investment(&mut self, investment: Investment) -> Result<()>;

    fn update_investment_status(
        &mut self,
        id: InvestmentId,
        status: InvestmentStatus,
        timestamp: DateTime<Utc>,
    ) -> Result<()>;
}

/// payout records
pub trait PayoutRepository {
    /// insert a payout, failing with `PayoutAlreadyOutstanding` when the
    /// investment already has a non-paid payout. implementations must make
    /// the check and the insert one atomic step.
    fn create_payout(&mut self, payout: InvestmentPayout) -> Result<()>;

    fn get_payout(&self, id: PayoutId) -> Result<InvestmentPayout>;

    /// replace a stored payout with its updated state
    fn update_payout(&mut self, payout: &InvestmentPayout) -> Result<()>;

    fn find_outstanding(&self, investment_id: InvestmentId) -> Option<InvestmentPayout>;

    fn payouts_for(&self, investment_id: InvestmentId) -> Vec<InvestmentPayout>;

    /// interest disbursed so far through paid monthly interest payouts
    fn paid_interest(&self, investment_id: InvestmentId) -> Money {
        self.payouts_for(investment_id)
            .iter()
            .filter(|p| p.payout_type == PayoutKind::MonthlyInterest && p.status == PayoutStatus::Paid)
            .map(|p| p.interest_amount)
            .sum()
    }
}

/// current product terms, used when renewing
pub trait ProductCatalog {
    fn current_product(&self, product_code: &str) -> Result<ProductConfig>;
}

/// in-memory store for tests and demos
#[derive(Debug, Default)]
pub struct MemoryStore {
    investments: HashMap<InvestmentId, Investment>,
    payouts: HashMap<PayoutId, InvestmentPayout>,
    products: HashMap<String, ProductConfig>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// publish or replace a product in the catalogue
    pub fn upsert_product(&mut self, product: ProductConfig) {
        self.products.insert(product.product_code().to_string(), product);
    }

    pub fn investments(&self) -> impl Iterator<Item = &Investment> {
        self.investments.values()
    }
}

impl InvestmentRepository for MemoryStore {
    fn get_investment(&self, id: InvestmentId) -> Result<Investment> {
        self.investments
            .get(&id)
            .cloned()
            .ok_or(SettlementError::InvestmentNotFound { id })
    }

    fn insert_investment(&mut self, investment: Investment) -> Result<()> {
        self.investments.insert(investment.id, investment);
        Ok(())
    }

    fn update_investment_status(
        &mut self,
        id: InvestmentId,
        status: InvestmentStatus,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let investment = self
            .investments
            .get_mut(&id)
            .ok_or(SettlementError::InvestmentNotFound { id })?;
        investment.update_status(status, timestamp);
        Ok(())
    }
}

impl PayoutRepository for MemoryStore {
    fn create_payout(&mut self, payout: InvestmentPayout) -> Result<()> {
        if let Some(existing) = self.find_outstanding(payout.investment_id) {
            return Err(SettlementError::PayoutAlreadyOutstanding {
                investment_id: payout.investment_id,
                existing: existing.id,
            });
        }
        self.payouts.insert(payout.id, payout);
        Ok(())
    }

    fn get_payout(&self, id: PayoutId) -> Result<InvestmentPayout> {
        self.payouts
            .get(&id)
            .cloned()
            .ok_or(SettlementError::PayoutNotFound { id })
    }

    fn update_payout(&mut self, payout: &InvestmentPayout) -> Result<()> {
        let stored = self
            .payouts
            .get_mut(&payout.id)
            .ok_or(SettlementError::PayoutNotFound { id: payout.id })?;
        *stored = payout.clone();
        Ok(())
    }

    fn find_outstanding(&self, investment_id: InvestmentId) -> Option<InvestmentPayout> {
        self.payouts
            .values()
            .find(|p| p.investment_id == investment_id && p.is_outstanding())
            .cloned()
    }

    fn payouts_for(&self, investment_id: InvestmentId) -> Vec<InvestmentPayout> {
        let mut payouts: Vec<_> = self
            .payouts
            .values()
            .filter(|p| p.investment_id == investment_id)
            .cloned()
            .collect();
        payouts.sort_by_key(|p| p.requested_at);
        payouts
    }
}

impl ProductCatalog for MemoryStore {
    fn current_product(&self, product_code: &str) -> Result<ProductConfig> {
        self.products
            .get(product_code)
            .cloned()
            .ok_or(SettlementError::ProductNotFound {
                code: product_code.to_string(),
            })
    }
}
