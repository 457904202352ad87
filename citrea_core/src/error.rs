use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("outcome score must be exactly 3 digits, got {len} characters")]
    WrongLength { len: usize },
    #[error("outcome score has non-digit {found:?} at position {position}")]
    NotADigit { position: usize, found: char },
    #[error("outcome score {0} does not fit in 3 digits")]
    OutOfRange(u32),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PaytableError {
    #[error("payout table is missing required entry `{0}`")]
    MissingEntry(&'static str),
    #[error("payout table entry `{0}` has multiplier 0")]
    ZeroMultiplier(String),
    #[error("unrecognized payout table key `{0}`")]
    UnknownKey(String),
    #[error("invalid bonus symbol designation: {0}")]
    BonusSymbols(String),
    #[error("payout table entry `{key}` multiplier {multiplier} exceeds {}", crate::paytable::MAX_MULTIPLIER)]
    MultiplierTooLarge { key: String, multiplier: u32 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BetError {
    #[error("bet amount is empty")]
    Empty,
    #[error("bet amount `{0}` is not a finite decimal number")]
    NotANumber(String),
    #[error("Bet amount must be greater than 0")]
    NotPositive,
    #[error("Insufficient balance for this bet")]
    InsufficientBalance,
    #[error("bet amount exceeds the maximum of {}", crate::bet::MAX_BET)]
    TooLarge,
    #[error("bet amount has {scale} decimal places, at most {} are supported", crate::bet::MAX_BET_SCALE)]
    TooPrecise { scale: u32 },
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutError {
    #[error("payout for bet {bet} x{multiplier} is not representable")]
    Overflow {
        bet: rust_decimal::Decimal,
        multiplier: u32,
    },
    #[error("simulation totals are not representable after {spins} spins")]
    TotalOverflow { spins: u64 },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Payout(#[from] PayoutError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReelError {
    #[error("reel {reel} strip is empty")]
    EmptyStrip { reel: usize },
    #[error("reel {reel} strip never shows symbol {symbol}")]
    MissingSymbol { reel: usize, symbol: u8 },
    #[error("a reel window needs at least one row")]
    NoRows,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("a bet is already outstanding")]
    BetOutstanding,
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
    #[error("bet event for player {0} does not belong to this round")]
    ForeignEvent(String),
    #[error(transparent)]
    Bet(#[from] BetError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Payout(#[from] PayoutError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle rejected the request: {0}")]
    Rejected(String),
    #[error("oracle did not answer in time")]
    Timeout,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Payout(#[from] PayoutError),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported payout table format for {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
    #[error("invalid TOML payout table: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON payout table: {0}")]
    Json(#[from] serde_json::Error),
}
