use crate::error::OracleError;
use crate::score::{OutcomeScore, SCORE_WIDTH};
use crate::symbols::{Symbol, SYMBOL_COUNT};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

// Provably-fair stand-in for the randomness kernel:
// server_seed (secret) + client_seed + nonce -> HMAC-SHA256 -> floats in [0,1) -> digits

pub type HmacSha256 = Hmac<Sha256>;

const WORD_SPAN: f64 = 4_294_967_296.0;

/// Source of verified outcome scores. The production implementation lives
/// outside this crate and talks to the oracle kernel and the ledger.
pub trait ScoreOracle {
    fn draw(&self, player: &str, nonce: u64) -> Result<OutcomeScore, OracleError>;
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

/// Big-endian 32-bit words of `hmac_bytes` scaled into [0,1). Once the block
/// runs out it is rehashed, so any `count` can be served.
pub fn derive_floats(hmac_bytes: &[u8], count: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(count);
    let mut block = hmac_bytes.to_vec();
    while out.len() < count {
        out.extend(
            block
                .chunks_exact(4)
                .take(count - out.len())
                .map(|w| f64::from(u32::from_be_bytes([w[0], w[1], w[2], w[3]])) / WORD_SPAN),
        );
        block = Sha256::digest(&block).to_vec();
    }
    out
}

#[derive(Debug, Clone)]
pub struct SeededOracle {
    server_seed: String, // secret until revealed
    client_seed: String,
}

impl SeededOracle {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
        }
    }

    /// Commitment published before any bet is taken.
    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self, nonce: u64) -> Result<[u8; 32], OracleError> {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .map_err(|e| OracleError::Rejected(e.to_string()))?;
        mac.update(format!("{}:{}", self.client_seed, nonce).as_bytes());
        let mut out = [0u8; 32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        Ok(out)
    }

    pub fn score(&self, nonce: u64) -> Result<OutcomeScore, OracleError> {
        let floats = derive_floats(&self.hmac_bytes(nonce)?, SCORE_WIDTH);
        let mut reels = [Symbol::ALL[0]; SCORE_WIDTH];
        for (reel, f) in reels.iter_mut().zip(floats) {
            let digit = ((f * SYMBOL_COUNT as f64).floor() as usize).min(SYMBOL_COUNT as usize - 1);
            *reel = Symbol::ALL[digit];
        }
        Ok(OutcomeScore::from_symbols(reels))
    }
}

impl ScoreOracle for SeededOracle {
    fn draw(&self, _player: &str, nonce: u64) -> Result<OutcomeScore, OracleError> {
        self.score(nonce)
    }
}

/// Recompute a score from revealed seeds and compare it with what was reported.
pub fn verify_score(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    expected: &OutcomeScore,
) -> bool {
    SeededOracle::new(server_seed, client_seed)
        .score(nonce)
        .map(|s| s == *expected)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_scores_are_deterministic() {
        let a = SeededOracle::new("server", "client");
        let b = SeededOracle::new("server", "client");
        assert_eq!(a.server_seed_hash_hex(), b.server_seed_hash_hex());
        assert_eq!(a.hmac_bytes(1).unwrap(), b.hmac_bytes(1).unwrap());
        assert_eq!(a.score(1).unwrap(), b.score(1).unwrap());
    }

    #[test]
    fn nonce_changes_the_stream() {
        let o = SeededOracle::new("server", "client");
        let distinct: std::collections::HashSet<_> =
            (0..50).map(|n| o.score(n).unwrap()).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn floats_extend_past_one_digest() {
        let o = SeededOracle::new("server", "client");
        let floats = derive_floats(&o.hmac_bytes(3).unwrap(), 20);
        assert_eq!(floats.len(), 20);
        assert!(floats.iter().all(|f| (0.0..1.0).contains(f)));
    }

    #[test]
    fn verification_catches_tampering() {
        let o = SeededOracle::new("server", "client");
        let score = o.score(9).unwrap();
        assert!(verify_score("server", "client", 9, &score));

        let mut reels = score.symbols();
        reels[0] = Symbol::ALL[((reels[0].to_index() + 1) % SYMBOL_COUNT) as usize];
        let forged = OutcomeScore::from_symbols(reels);
        assert!(!verify_score("server", "client", 9, &forged));
        assert_eq!(o.server_seed_hash_hex(), derive_hash_hex(b"server"));
    }
}
