use citrea_core::{resolve, BetAmount, PayoutTable, ReelSet, SeededOracle};
use rust_decimal::Decimal;

fn main() {
    // Example end-to-end spin against the seeded oracle
    let oracle = SeededOracle::new("example-server-seed", "example-client-seed");
    let nonce = 1u64;
    let score = match oracle.score(nonce) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("oracle failed: {e}");
            return;
        }
    };
    let bet = match BetAmount::new(Decimal::new(1, 2)) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let table = PayoutTable::citrea();
    let resolution = match resolve(&score, bet, &table) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let window = ReelSet::default().reel_window(&score, 3).unwrap_or_default();
    for row in &window {
        let glyphs: Vec<&str> = row.iter().map(|s| s.glyph()).collect();
        println!("{}", glyphs.join(" | "));
    }
    println!(
        "server_seed_hash={} score={} {} x{} payout={}",
        oracle.server_seed_hash_hex(),
        score,
        resolution.label(),
        resolution.multiplier,
        resolution.display_payout()
    );
}
