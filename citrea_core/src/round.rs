//! Lifecycle of a single bet, from dispatch to a resolved (or failed) outcome.
//!
//! The external round trip is: ask the oracle for a verified score, submit the
//! bet transaction, then wait for the ledger's `Bet` event carrying the score.
//! This module only tracks where a bet is in that trip; it performs no I/O.

use crate::{
    bet::BetAmount,
    error::RoundError,
    paytable::PayoutTable,
    resolver::{resolve, BetResolution},
    score::OutcomeScore,
};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long to wait for the ledger's bet event before giving up.
pub const DEFAULT_BET_TIMEOUT: Duration = Duration::from_secs(30);

/// Event the ledger emits once a bet has been settled on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetEvent {
    pub player: String,
    pub bet_amount: Decimal,
    pub score: OutcomeScore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    AwaitingOracle { player: String, bet: BetAmount },
    AwaitingConfirmation { player: String, bet: BetAmount },
    Resolved(BetResolution),
    FailedTimeout { bet: BetAmount },
    FailedError { reason: String },
}

impl RoundState {
    pub fn name(&self) -> &'static str {
        match self {
            RoundState::Idle => "idle",
            RoundState::AwaitingOracle { .. } => "awaiting oracle",
            RoundState::AwaitingConfirmation { .. } => "awaiting confirmation",
            RoundState::Resolved(_) => "resolved",
            RoundState::FailedTimeout { .. } => "timed out",
            RoundState::FailedError { .. } => "failed",
        }
    }

    pub fn is_outstanding(&self) -> bool {
        matches!(
            self,
            RoundState::AwaitingOracle { .. } | RoundState::AwaitingConfirmation { .. }
        )
    }
}

/// One player's bet slot. At most one bet is in flight at a time and it
/// accepts exactly one score.
#[derive(Debug, Clone)]
pub struct BetRound {
    state: RoundState,
    timeout: Duration,
}

impl Default for BetRound {
    fn default() -> Self {
        Self::new(DEFAULT_BET_TIMEOUT)
    }
}

impl BetRound {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: RoundState::Idle,
            timeout,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn invalid(&self, action: &'static str) -> RoundError {
        RoundError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }

    /// Accept a new bet. Allowed from idle or after a previous round finished.
    pub fn place(
        &mut self,
        player: &str,
        bet: BetAmount,
        balance: Decimal,
    ) -> Result<(), RoundError> {
        if self.state.is_outstanding() {
            return Err(RoundError::BetOutstanding);
        }
        if bet.amount() > balance {
            return Err(crate::error::BetError::InsufficientBalance.into());
        }
        info!(%player, %bet, "bet placed");
        self.state = RoundState::AwaitingOracle {
            player: player.to_string(),
            bet,
        };
        Ok(())
    }

    /// The oracle answered and the bet transaction was submitted.
    pub fn oracle_accepted(&mut self) -> Result<(), RoundError> {
        match std::mem::replace(&mut self.state, RoundState::Idle) {
            RoundState::AwaitingOracle { player, bet } => {
                debug!(%player, "oracle accepted, awaiting confirmation");
                self.state = RoundState::AwaitingConfirmation { player, bet };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.invalid("accept an oracle response"))
            }
        }
    }

    /// Feed a ledger event. Events for other players are rejected and leave the
    /// round waiting; the first matching event resolves it.
    pub fn deliver(
        &mut self,
        event: &BetEvent,
        table: &PayoutTable,
    ) -> Result<BetResolution, RoundError> {
        let (player, bet) = match &self.state {
            RoundState::AwaitingConfirmation { player, bet } => (player, *bet),
            _ => return Err(self.invalid("deliver a score")),
        };
        if !player.eq_ignore_ascii_case(&event.player) {
            debug!(expected = %player, got = %event.player, "ignoring foreign bet event");
            return Err(RoundError::ForeignEvent(event.player.clone()));
        }
        if event.bet_amount != bet.amount() {
            warn!(placed = %bet, reported = %event.bet_amount, "ledger reported a different bet amount");
        }
        let resolution = match resolve(&event.score, bet, table) {
            Ok(r) => r,
            Err(e) => {
                self.state = RoundState::FailedError {
                    reason: e.to_string(),
                };
                return Err(e.into());
            }
        };
        info!(score = %event.score, category = %resolution.category, payout = %resolution.payout, "bet resolved");
        self.state = RoundState::Resolved(resolution.clone());
        Ok(resolution)
    }

    /// The bet event did not arrive in time. No score is produced.
    pub fn time_out(&mut self) -> Result<(), RoundError> {
        let bet = match &self.state {
            RoundState::AwaitingOracle { bet, .. } | RoundState::AwaitingConfirmation { bet, .. } => {
                *bet
            }
            _ => return Err(self.invalid("time out")),
        };
        warn!(%bet, timeout = ?self.timeout, "bet event not received within timeout period");
        self.state = RoundState::FailedTimeout { bet };
        Ok(())
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), RoundError> {
        if !self.state.is_outstanding() {
            return Err(self.invalid("fail"));
        }
        let reason = reason.into();
        warn!(%reason, "bet failed");
        self.state = RoundState::FailedError { reason };
        Ok(())
    }

    /// Clear a finished round so the next bet can be placed.
    pub fn reset(&mut self) -> Result<(), RoundError> {
        if self.state.is_outstanding() {
            return Err(RoundError::BetOutstanding);
        }
        self.state = RoundState::Idle;
        Ok(())
    }
}
