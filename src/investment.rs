use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ProductConfig;
use crate::decimal::Money;
use crate::errors::{Result, SettlementError};
use crate::interest::add_months;
use crate::snapshot::InvestmentSnapshot;
use crate::types::{InvestmentId, InvestmentStatus};

/// a customer investment: mutable status over an immutable snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: InvestmentId,
    pub transaction_id: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    pub status: InvestmentStatus,
    pub created_at: DateTime<Utc>,
    pub last_status_change: DateTime<Utc>,
    /// the investment this one was renewed from, if any
    pub renewed_from: Option<InvestmentId>,
    snapshot: InvestmentSnapshot,
}

impl Investment {
    /// open an investment, freezing the product terms as they are right now
    pub fn subscribe(
        product: &ProductConfig,
        transaction_id: impl Into<String>,
        amount: Money,
        start_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if amount.is_negative() {
            return Err(SettlementError::NegativeAmount {
                field: "amount",
                amount: amount.as_decimal(),
            });
        }

        let snapshot = InvestmentSnapshot::capture(product, now);
        let maturity_date = add_months(start_date, snapshot.policy_term_months())?;

        Ok(Self {
            id: Uuid::new_v4(),
            transaction_id: transaction_id.into(),
            amount,
            start_date,
            maturity_date,
            status: InvestmentStatus::Active,
            created_at: now,
            last_status_change: now,
            renewed_from: None,
            snapshot,
        })
    }

    /// frozen contract terms
    pub fn snapshot(&self) -> &InvestmentSnapshot {
        &self.snapshot
    }

    pub fn is_settleable(&self) -> bool {
        self.status.is_settleable()
    }

    pub fn has_reached_maturity(&self, as_of: NaiveDate) -> bool {
        as_of >= self.maturity_date
    }

    pub fn update_status(&mut self, status: InvestmentStatus, timestamp: DateTime<Utc>) {
        self.status = status;
        self.last_status_change = timestamp;
    }

    /// build the successor investment from the product's current terms
    ///
    /// the receiver is left untouched; moving it to `Renewed` is the caller's job.
    pub fn renew(
        &self,
        product: &ProductConfig,
        start_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Investment> {
        if !self.is_settleable() {
            return Err(SettlementError::InvestmentNotSettleable {
                status: self.status,
            });
        }

        let mut renewed = Investment::subscribe(
            product,
            format!("{}-R", self.transaction_id),
            self.amount,
            start_date,
            now,
        )?;
        renewed.renewed_from = Some(self.id);
        Ok(renewed)
    }
}
