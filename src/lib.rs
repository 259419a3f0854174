pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod investment;
pub mod lifecycle;
pub mod payout;
pub mod settlement;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod views;

// re-export key types
pub use config::{NegotiationRatePolicy, ProductConfig, ProductConfigBuilder, SettlementConfig};
pub use decimal::{Money, Rate};
pub use errors::{Result, SettlementError};
pub use events::{Event, EventStore};
pub use interest::{add_months, stayed_months, AccrualEngine, InterestCalculation};
pub use investment::Investment;
pub use lifecycle::{PayoutController, SettlementStore};
pub use payout::{InvestmentPayout, SettleOutcome};
pub use settlement::{compute_payout, PayoutAmounts, PayoutBreakdown, SettlementInput};
pub use snapshot::InvestmentSnapshot;
pub use store::{InvestmentRepository, MemoryStore, PayoutRepository, ProductCatalog};
pub use types::{
    InvestmentId, InvestmentStatus, PayoutId, PayoutKind, PayoutStatus, PayoutType, SettlementTrigger,
};
pub use views::{PayoutView, SettlementPreviewView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
