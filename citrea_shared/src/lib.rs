use chrono::{DateTime, Utc};
use citrea_core::{BetResolution, PayoutTable, RtpReport};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Score and bet as the frontend receives them from the ledger's bet event.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResolveRequest {
    pub score: String,
    pub bet: String,
    /// Last balance read from the ledger; checked against the bet when present.
    #[serde(default)]
    pub balance: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolveResponse {
    pub score: String,
    pub reels: Vec<u8>,
    pub category: String,
    pub multiplier: u32,
    pub is_win: bool,
    pub is_jackpot: bool,
    pub bet: Decimal,
    pub payout: Decimal,
    /// `payout` rounded to display precision.
    pub payout_display: String,
    pub resolved_at: DateTime<Utc>,
}

impl ResolveResponse {
    pub fn from_resolution(r: &BetResolution, resolved_at: DateTime<Utc>) -> Self {
        Self {
            score: r.score.to_string(),
            reels: r.score.symbols().iter().map(|s| s.to_index()).collect(),
            category: r.label(),
            multiplier: r.multiplier,
            is_win: r.is_win(),
            is_jackpot: r.is_jackpot,
            bet: r.bet.amount(),
            payout: r.payout,
            payout_display: r.display_payout(),
            resolved_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaytableResponse {
    pub paytable: PayoutTable,
    pub rtp: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RtpResponse {
    pub report: RtpReport,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal server error")]
    Internal,
}

impl From<citrea_core::ScoreError> for ApiError {
    fn from(e: citrea_core::ScoreError) -> Self {
        ApiError::Invalid(e.to_string())
    }
}

impl From<citrea_core::BetError> for ApiError {
    fn from(e: citrea_core::BetError) -> Self {
        ApiError::Invalid(e.to_string())
    }
}

impl From<citrea_core::PayoutError> for ApiError {
    fn from(e: citrea_core::PayoutError) -> Self {
        ApiError::Invalid(e.to_string())
    }
}

impl From<citrea_core::ResolveError> for ApiError {
    fn from(e: citrea_core::ResolveError) -> Self {
        ApiError::Invalid(e.to_string())
    }
}

impl From<citrea_core::PaytableError> for ApiError {
    fn from(e: citrea_core::PaytableError) -> Self {
        ApiError::Invalid(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
