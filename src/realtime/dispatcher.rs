use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    core::services::{EvaluationInput, NotificationRuleEvaluator, SnapshotService},
    domain::{Alert, AlertColor, OutboundMessage, UserId},
    errors::Result,
    ledger::{ActionType, AwardResult, GamificationLedger, RewardClaim, RewardTier},
    storage::{ProfileStore, TransactionSource},
};

use super::{
    connection::{ConnectionId, LiveConnection},
    registry::ConnectionRegistry,
};

/// A user action that can move progression and trigger a push.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Simple(ActionType),
    ReceiptScan { amount: f64 },
    ExpenseLogged { amount: f64, category: String },
}

impl UserAction {
    pub fn action_type(&self) -> ActionType {
        match self {
            UserAction::Simple(action) => *action,
            UserAction::ReceiptScan { .. } => ActionType::ScanReceipt,
            UserAction::ExpenseLogged { .. } => ActionType::ManualExpense,
        }
    }
}

/// Delivery counts for one push; never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub alert_count: usize,
    pub single_delivered: usize,
    pub list_delivered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub award: AwardResult,
    pub dispatch: DispatchReport,
}

/// Joins rule evaluation, progression updates, and connection delivery.
pub struct AlertDispatcher {
    registry: Arc<ConnectionRegistry>,
    transactions: Arc<dyn TransactionSource>,
    profiles: Arc<dyn ProfileStore>,
    evaluator: NotificationRuleEvaluator,
    ledger: GamificationLedger,
}

impl AlertDispatcher {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        transactions: Arc<dyn TransactionSource>,
        profiles: Arc<dyn ProfileStore>,
        evaluator: NotificationRuleEvaluator,
        ledger: GamificationLedger,
    ) -> Self {
        Self {
            registry,
            transactions,
            profiles,
            evaluator,
            ledger,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn evaluate(&self, input: &EvaluationInput) -> Vec<Alert> {
        self.evaluator.evaluate(
            &input.snapshot,
            &input.forecast,
            &input.progression,
            &input.signals,
        )
    }

    /// Polling path: the same rule pass the push path uses.
    pub async fn current_alerts(&self, user: UserId, reference: NaiveDate) -> Result<Vec<Alert>> {
        let input = SnapshotService::load(
            self.transactions.as_ref(),
            self.profiles.as_ref(),
            user,
            reference,
        )
        .await?;
        Ok(self.evaluate(&input))
    }

    /// Pushes the full refreshed list to every connection of `user`.
    pub async fn refresh(&self, user: UserId, reference: NaiveDate) -> DispatchReport {
        self.dispatch(user, None, reference).await
    }

    /// Sends `single` (if any) ahead of the refreshed list. Failures are logged and swallowed.
    pub async fn dispatch(
        &self,
        user: UserId,
        single: Option<Alert>,
        reference: NaiveDate,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        if self.registry.connection_count(user) == 0 {
            debug!(user_id = user, "no live connections; dropping push");
            return report;
        }

        if let Some(alert) = single {
            if let Some(payload) = encode(user, &OutboundMessage::single(alert)) {
                report.single_delivered = self.registry.broadcast(user, &payload).await;
            }
        }

        match self.current_alerts(user, reference).await {
            Ok(alerts) => {
                report.alert_count = alerts.len();
                if let Some(payload) = encode(user, &OutboundMessage::alerts(alerts)) {
                    report.list_delivered = self.registry.broadcast(user, &payload).await;
                }
            }
            Err(err) => warn!(user_id = user, error = %err, "failed to evaluate alerts"),
        }
        report
    }

    /// Registers a new connection and sends it the current list.
    pub async fn connect(
        &self,
        user: UserId,
        connection: Arc<dyn LiveConnection>,
        reference: NaiveDate,
    ) -> ConnectionId {
        let id = self.registry.register(user, connection);
        match self.current_alerts(user, reference).await {
            Ok(alerts) => {
                if let Some(payload) = encode(user, &OutboundMessage::alerts(alerts)) {
                    self.registry.send_to(user, id, &payload).await;
                }
            }
            Err(err) => warn!(user_id = user, error = %err, "initial alert push skipped"),
        }
        id
    }

    pub async fn disconnect(&self, user: UserId, id: ConnectionId) -> bool {
        self.registry.unregister(user, id).await
    }

    /// Applies `action` once, persists the result, then pushes best-effort.
    ///
    /// A concurrent progression write fails the whole award with
    /// [`StoreError::Contention`](crate::errors::StoreError::Contention); nothing is pushed.
    pub async fn handle_action(
        &self,
        user: UserId,
        action: UserAction,
        reference: NaiveDate,
    ) -> Result<ActionOutcome> {
        let profile = self.profiles.get(user).await?;
        let before = profile.progression;
        let award = match &action {
            UserAction::ReceiptScan { amount } => self.ledger.award_receipt(&before, *amount),
            other => self.ledger.award(&before, other.action_type()),
        };
        self.profiles
            .persist_progression(user, before, award.new_progression)
            .await?;

        let single = self.single_alert_for(&action, &award);
        let dispatch = self.dispatch(user, single, reference).await;
        Ok(ActionOutcome { award, dispatch })
    }

    /// Redeems a reward tier against the stored balance.
    pub async fn claim_reward(&self, user: UserId, tier: RewardTier) -> Result<RewardClaim> {
        let profile = self.profiles.get(user).await?;
        let claim = self.ledger.claim_reward(&profile.progression, tier)?;
        self.profiles
            .persist_progression(user, profile.progression, claim.new_progression)
            .await?;
        Ok(claim)
    }

    fn single_alert_for(&self, action: &UserAction, award: &AwardResult) -> Option<Alert> {
        let currency = self.evaluator.currency();
        match action {
            UserAction::ReceiptScan { .. } => Some(Alert::new(
                "🪙",
                AlertColor::Yellow,
                format!(
                    "Congratulations! You earned {} coins for scanning a receipt. Balance: {} coins",
                    award.coins_awarded, award.new_progression.coin_balance
                ),
            )),
            UserAction::ExpenseLogged { amount, category } => Some(Alert::new(
                "📊",
                AlertColor::Blue,
                format!("Expense recorded: {category} - {amount:.2} {currency}"),
            )),
            UserAction::Simple(_) if award.level_up => Some(Alert::new(
                "🎉",
                AlertColor::Purple,
                format!("Level up! You are now a {}.", award.new_level),
            )),
            UserAction::Simple(_) => None,
        }
    }
}

fn encode(user: UserId, message: &OutboundMessage) -> Option<String> {
    match message.to_payload() {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!(user_id = user, error = %err, "failed to encode outbound message");
            None
        }
    }
}
