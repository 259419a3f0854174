use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{InvestmentId, InvestmentStatus, PayoutId, PayoutKind};

/// audit events emitted by the payout controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // investment events
    InvestmentSubscribed {
        investment_id: InvestmentId,
        product_code: String,
        amount: Money,
        start_date: NaiveDate,
        maturity_date: NaiveDate,
    },
    InvestmentStatusChanged {
        investment_id: InvestmentId,
        old_status: InvestmentStatus,
        new_status: InvestmentStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    InvestmentRenewed {
        old_investment_id: InvestmentId,
        new_investment_id: InvestmentId,
        product_code: String,
        timestamp: DateTime<Utc>,
    },

    // payout events
    PayoutInitiated {
        payout_id: PayoutId,
        investment_id: InvestmentId,
        kind: PayoutKind,
        total_payout: Money,
        timestamp: DateTime<Utc>,
    },
    PayoutApproved {
        payout_id: PayoutId,
        timestamp: DateTime<Utc>,
    },
    PayoutSettled {
        payout_id: PayoutId,
        investment_id: InvestmentId,
        amount: Money,
        reference_no: String,
        timestamp: DateTime<Utc>,
    },
    ClawbackApplied {
        investment_id: InvestmentId,
        overpaid_interest: Money,
        capital_returned: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
