use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::config::SettlementConfig;
use crate::decimal::Money;
use crate::errors::{Result, SettlementError};
use crate::events::{Event, EventStore};
use crate::investment::Investment;
use crate::payout::{InvestmentPayout, SettleOutcome};
use crate::settlement::{compute_payout, PayoutBreakdown, SettlementInput};
use crate::store::{InvestmentRepository, PayoutRepository, ProductCatalog};
use crate::types::{InvestmentId, InvestmentStatus, PayoutId, PayoutStatus, SettlementTrigger};

/// everything the controller needs from persistence
pub trait SettlementStore: InvestmentRepository + PayoutRepository + ProductCatalog {}

impl<T> SettlementStore for T where T: InvestmentRepository + PayoutRepository + ProductCatalog {}

/// drives payouts from preview to paid
///
/// every operation validates and computes before its first write. operations
/// take `&mut self`; callers sharing a controller across threads put it behind
/// a mutex so the outstanding-payout check and insert stay serialized.
pub struct PayoutController<S> {
    store: S,
    config: SettlementConfig,
    pub events: EventStore,
}

impl<S: SettlementStore> PayoutController<S> {
    pub fn new(store: S, config: SettlementConfig) -> Self {
        Self {
            store,
            config,
            events: EventStore::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// subscribe a customer to a product at its current terms
    pub fn open_investment(
        &mut self,
        product_code: &str,
        transaction_id: &str,
        amount: Money,
        start_date: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Investment> {
        let product = self.store.current_product(product_code)?;
        let investment = Investment::subscribe(&product, transaction_id, amount, start_date, time_provider.now())?;
        self.store.insert_investment(investment.clone())?;

        log::info!(
            "investment {} opened: {} {} until {}",
            investment.id, product_code, amount, investment.maturity_date
        );
        self.events.emit(Event::InvestmentSubscribed {
            investment_id: investment.id,
            product_code: product_code.to_string(),
            amount,
            start_date,
            maturity_date: investment.maturity_date,
        });

        Ok(investment)
    }

    /// compute what a settlement would pay today without recording anything
    pub fn preview(
        &self,
        investment_id: InvestmentId,
        trigger: SettlementTrigger,
        time_provider: &SafeTimeProvider,
    ) -> Result<PayoutBreakdown> {
        let investment = self.store.get_investment(investment_id)?;
        self.breakdown_for(&investment, trigger, time_provider.now().date_naive())
    }

    fn breakdown_for(
        &self,
        investment: &Investment,
        trigger: SettlementTrigger,
        as_of: NaiveDate,
    ) -> Result<PayoutBreakdown> {
        let already_paid = self.store.paid_interest(investment.id);
        let input = SettlementInput::for_investment(investment, as_of, already_paid, trigger)?;
        compute_payout(&input, &self.config)
    }

    /// record a pending payout for the trigger
    pub fn initiate_payout(
        &mut self,
        investment_id: InvestmentId,
        trigger: SettlementTrigger,
        time_provider: &SafeTimeProvider,
    ) -> Result<InvestmentPayout> {
        let now = time_provider.now();
        let investment = self.store.get_investment(investment_id)?;

        if let Some(existing) = self.store.find_outstanding(investment_id) {
            log::warn!(
                "investment {}: payout {} still {:?}, refusing {:?}",
                investment_id, existing.id, existing.status, trigger
            );
            return Err(SettlementError::PayoutAlreadyOutstanding {
                investment_id,
                existing: existing.id,
            });
        }

        let breakdown = self.breakdown_for(&investment, trigger, now.date_naive())?;
        if trigger == SettlementTrigger::ScheduledMonthly && breakdown.total_payout.is_zero() {
            return Err(SettlementError::UnsupportedTrigger {
                trigger,
                reason: "no interest due since the last payout".to_string(),
            });
        }

        let payout = InvestmentPayout::from_breakdown(investment_id, breakdown, now);

        // terminal settlements take the investment out of ACTIVE
        let moves_status = trigger.is_terminal() && investment.status == InvestmentStatus::Active;
        if moves_status {
            self.store
                .update_investment_status(investment_id, InvestmentStatus::Matured, now)?;
        }

        if let Err(e) = self.store.create_payout(payout.clone()) {
            if moves_status {
                self.store.update_investment_status(
                    investment_id,
                    investment.status,
                    investment.last_status_change,
                )?;
            }
            return Err(e);
        }

        log::info!(
            "payout {} initiated for investment {}: {:?} total {}",
            payout.id, investment_id, payout.payout_type, payout.total_payout
        );
        self.events.emit(Event::PayoutInitiated {
            payout_id: payout.id,
            investment_id,
            kind: payout.payout_type,
            total_payout: payout.total_payout,
            timestamp: now,
        });
        if moves_status {
            self.events.emit(Event::InvestmentStatusChanged {
                investment_id,
                old_status: investment.status,
                new_status: InvestmentStatus::Matured,
                reason: format!("{:?} payout requested", trigger),
                timestamp: now,
            });
        }
        if payout.penalty_amount.is_positive() {
            self.events.emit(Event::ClawbackApplied {
                investment_id,
                overpaid_interest: payout.penalty_amount,
                capital_returned: payout.total_payout,
                timestamp: now,
            });
        }

        Ok(payout)
    }

    /// PENDING -> APPROVED
    pub fn approve_payout(
        &mut self,
        payout_id: PayoutId,
        time_provider: &SafeTimeProvider,
    ) -> Result<InvestmentPayout> {
        let now = time_provider.now();
        let mut payout = self.store.get_payout(payout_id)?;

        if let Err(e) = payout.approve(now) {
            log::warn!("payout {}: approve rejected: {}", payout_id, e);
            return Err(e);
        }
        self.store.update_payout(&payout)?;

        log::info!("payout {} approved", payout_id);
        self.events.emit(Event::PayoutApproved {
            payout_id,
            timestamp: now,
        });

        Ok(payout)
    }

    /// mark a payout paid against an external payment reference
    ///
    /// maturity and early break payouts close the investment.
    pub fn settle_payout(
        &mut self,
        payout_id: PayoutId,
        reference_no: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<InvestmentPayout> {
        let (payout, _) = self.settle(payout_id, reference_no, false, time_provider)?;
        Ok(payout)
    }

    /// settle a maturity payout and roll the principal into a new investment
    /// on the product's current terms, starting at the maturity date
    ///
    /// the settled payout disburses only the final interest.
    pub fn settle_and_renew(
        &mut self,
        payout_id: PayoutId,
        reference_no: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<(InvestmentPayout, Option<Investment>)> {
        self.settle(payout_id, reference_no, true, time_provider)
    }

    fn settle(
        &mut self,
        payout_id: PayoutId,
        reference_no: &str,
        renew: bool,
        time_provider: &SafeTimeProvider,
    ) -> Result<(InvestmentPayout, Option<Investment>)> {
        let now = time_provider.now();
        let mut payout = self.store.get_payout(payout_id)?;
        let investment = self.store.get_investment(payout.investment_id)?;

        // a renewal keeps the principal invested; only the interest is disbursed
        let rolled_over = if renew && payout.status != PayoutStatus::Paid {
            Some(payout.roll_over_principal()?)
        } else {
            None
        };

        match payout.settle(reference_no, now)? {
            SettleOutcome::AlreadySettled => {
                log::info!("payout {} already settled with {}, ignoring repeat", payout_id, reference_no);
                return Ok((payout, None));
            }
            SettleOutcome::Settled => {}
        }

        let renewed = match rolled_over {
            Some(principal) => {
                let product = self.store.current_product(investment.snapshot().product_code())?;
                let next = investment.renew(&product, investment.maturity_date, now)?;
                log::info!(
                    "payout {}: principal {} rolled into investment {}",
                    payout_id, principal, next.id
                );
                Some(next)
            }
            None => None,
        };

        self.store.update_payout(&payout)?;

        let new_status = if payout.payout_type.is_terminal() {
            let status = if renewed.is_some() {
                InvestmentStatus::Renewed
            } else {
                InvestmentStatus::Closed
            };
            self.store.update_investment_status(investment.id, status, now)?;
            Some(status)
        } else {
            None
        };

        if let Some(next) = &renewed {
            self.store.insert_investment(next.clone())?;
        }

        log::info!(
            "payout {} paid: {} ref {}",
            payout_id, payout.total_payout, reference_no
        );
        self.events.emit(Event::PayoutSettled {
            payout_id,
            investment_id: investment.id,
            amount: payout.total_payout,
            reference_no: reference_no.trim().to_string(),
            timestamp: now,
        });
        if let Some(status) = new_status {
            self.events.emit(Event::InvestmentStatusChanged {
                investment_id: investment.id,
                old_status: investment.status,
                new_status: status,
                reason: format!("{:?} payout settled", payout.payout_type),
                timestamp: now,
            });
        }
        if let Some(next) = &renewed {
            self.emit_renewed(&investment, next, now);
        }

        Ok((payout, renewed))
    }

    /// replace an active or matured investment with a fresh one on current terms
    pub fn renew_investment(
        &mut self,
        investment_id: InvestmentId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Investment> {
        let now = time_provider.now();
        let investment = self.store.get_investment(investment_id)?;

        if !investment.is_settleable() {
            return Err(SettlementError::InvestmentNotSettleable {
                status: investment.status,
            });
        }
        if let Some(existing) = self.store.find_outstanding(investment_id) {
            return Err(SettlementError::PayoutAlreadyOutstanding {
                investment_id,
                existing: existing.id,
            });
        }

        let product = self.store.current_product(investment.snapshot().product_code())?;
        let renewed = investment.renew(&product, now.date_naive(), now)?;

        self.store.insert_investment(renewed.clone())?;
        self.store
            .update_investment_status(investment_id, InvestmentStatus::Renewed, now)?;

        self.events.emit(Event::InvestmentStatusChanged {
            investment_id,
            old_status: investment.status,
            new_status: InvestmentStatus::Renewed,
            reason: "renewed".to_string(),
            timestamp: now,
        });
        self.emit_renewed(&investment, &renewed, now);

        Ok(renewed)
    }

    /// move an active investment to MATURED once its maturity date has passed
    pub fn refresh_maturity(
        &mut self,
        investment_id: InvestmentId,
        time_provider: &SafeTimeProvider,
    ) -> Result<InvestmentStatus> {
        let now = time_provider.now();
        let investment = self.store.get_investment(investment_id)?;

        if investment.status != InvestmentStatus::Active || !investment.has_reached_maturity(now.date_naive()) {
            return Ok(investment.status);
        }

        self.store
            .update_investment_status(investment_id, InvestmentStatus::Matured, now)?;
        log::info!("investment {} matured on {}", investment_id, investment.maturity_date);
        self.events.emit(Event::InvestmentStatusChanged {
            investment_id,
            old_status: InvestmentStatus::Active,
            new_status: InvestmentStatus::Matured,
            reason: format!("maturity date {} reached", investment.maturity_date),
            timestamp: now,
        });

        Ok(InvestmentStatus::Matured)
    }

    fn emit_renewed(&mut self, old: &Investment, new: &Investment, now: chrono::DateTime<chrono::Utc>) {
        log::info!("investment {} renewed as {}", old.id, new.id);
        self.events.emit(Event::InvestmentRenewed {
            old_investment_id: old.id,
            new_investment_id: new.id,
            product_code: new.snapshot().product_code().to_string(),
            timestamp: now,
        });
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
