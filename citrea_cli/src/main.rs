use std::path::PathBuf;

use anyhow::Context;
use citrea_core::{
    analyze, format_amount, resolve, resolve_paytable, simulate, validate_bet, verify_score,
    BetAmount, OutcomeScore, PayoutTable, ReelSet, SeededOracle,
};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "citrea-cli", about = "Operator CLI for the Citrea slot payout rules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Payout table file (.toml or .json); the built-in schedule when unset
    #[arg(long, global = true, env = "CITREA_PAYTABLE")]
    paytable: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a 3-digit outcome score for a bet
    Resolve {
        score: String,
        #[arg(long)]
        bet: String,
        /// Displayed balance; the bet must not exceed it
        #[arg(long)]
        balance: Option<Decimal>,
    },
    /// Print the validated payout table
    Paytable {
        #[arg(long, value_enum, default_value_t = Format::Toml)]
        format: Format,
    },
    /// Exact return-to-player breakdown over all 1000 scores
    Rtp,
    /// Spin against the seeded oracle
    Simulate {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long, default_value_t = 1000)]
        spins: u64,
        #[arg(long, default_value = "0.01")]
        bet: String,
        /// Write every spin to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Check a reported score against revealed seeds
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
        #[arg(long)]
        score: String,
    },
}

fn cmd_resolve(
    table: &PayoutTable,
    score: &str,
    bet: &str,
    balance: Option<Decimal>,
) -> anyhow::Result<()> {
    let bet = match balance {
        Some(b) => validate_bet(bet, b)?,
        None => BetAmount::parse(bet)?,
    };
    let score = OutcomeScore::parse(score)?;
    let r = resolve(&score, bet, table)?;

    let window = ReelSet::default().reel_window(&score, 3)?;
    for (i, row) in window.iter().enumerate() {
        let glyphs: Vec<&str> = row.iter().map(|s| s.glyph()).collect();
        let marker = if i == 1 { ">" } else { " " };
        println!("{marker} {}", glyphs.join(" | "));
    }
    println!(
        "score={} category={} multiplier={} jackpot={} bet={} payout={}",
        r.score,
        r.label(),
        r.multiplier,
        r.is_jackpot,
        r.bet,
        r.display_payout()
    );
    Ok(())
}

fn cmd_paytable(table: &PayoutTable, format: Format) -> anyhow::Result<()> {
    let out = match format {
        Format::Json => serde_json::to_string_pretty(table)?,
        Format::Toml => toml::to_string(table)?,
    };
    println!("{out}");
    Ok(())
}

fn cmd_rtp(table: &PayoutTable) {
    let report = analyze(table);
    println!(
        "{:<14} {:>10} {:>6} {:>8} {:>10}",
        "category", "multiplier", "hits", "prob", "return"
    );
    for row in &report.rows {
        println!(
            "{:<14} {:>10} {:>6} {:>8} {:>10}",
            row.label,
            row.multiplier,
            row.hits,
            format_amount(row.probability),
            format_amount(row.contribution)
        );
    }
    println!(
        "hit frequency={} rtp={}",
        format_amount(report.hit_frequency),
        format_amount(report.rtp)
    );
}

fn cmd_simulate(
    table: &PayoutTable,
    server_seed: String,
    client_seed: String,
    spins: u64,
    bet: &str,
    csv_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let bet = BetAmount::parse(bet)?;
    let oracle = SeededOracle::new(server_seed, client_seed);
    let summary = simulate(&oracle, "simulator", table, bet, spins)?;

    if let Some(path) = csv_path {
        let mut wtr = csv::Writer::from_path(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        wtr.write_record(["nonce", "score", "category", "multiplier", "payout"])?;
        for r in &summary.records {
            wtr.write_record(&[
                r.nonce.to_string(),
                r.score.to_string(),
                r.label.clone(),
                r.multiplier.to_string(),
                r.payout.to_string(),
            ])?;
        }
        wtr.flush()?;
        println!("Exported {} spins to {}", summary.records.len(), path.display());
    }

    println!(
        "server_seed_hash={} spins={} wins={} jackpots={} wagered={} paid={} rtp={}",
        oracle.server_seed_hash_hex(),
        summary.spins,
        summary.wins,
        summary.jackpots,
        format_amount(summary.total_bet),
        format_amount(summary.total_payout),
        summary
            .rtp()
            .map(format_amount)
            .unwrap_or_else(|| "n/a".to_string())
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let table = resolve_paytable(cli.paytable.as_deref()).context("loading payout table")?;
    debug!(jackpot = table.jackpot(), "payout table ready");

    match cli.command {
        Commands::Resolve {
            score,
            bet,
            balance,
        } => cmd_resolve(&table, &score, &bet, balance)?,
        Commands::Paytable { format } => cmd_paytable(&table, format)?,
        Commands::Rtp => cmd_rtp(&table),
        Commands::Simulate {
            server_seed,
            client_seed,
            spins,
            bet,
            csv,
        } => cmd_simulate(&table, server_seed, client_seed, spins, &bet, csv)?,
        Commands::Verify {
            server_seed,
            client_seed,
            nonce,
            score,
        } => {
            let score = OutcomeScore::parse(&score)?;
            if verify_score(&server_seed, &client_seed, nonce, &score) {
                println!("OK: score {score} matches nonce {nonce}");
            } else {
                anyhow::bail!("score {score} does not match the revealed seeds at nonce {nonce}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "citrea-cli",
            "resolve",
            "070",
            "--bet",
            "0.01",
            "--balance",
            "1.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve {
                score,
                bet,
                balance,
            } => {
                assert_eq!(score, "070");
                assert_eq!(bet, "0.01");
                assert_eq!(balance, Some(Decimal::new(15, 1)));
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn simulate_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spins.csv");
        cmd_simulate(
            &PayoutTable::citrea(),
            "s".into(),
            "c".into(),
            25,
            "0.01",
            Some(path.clone()),
        )
        .unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.lines().count(), 26);
        assert!(body.starts_with("nonce,score,category,multiplier,payout"));
    }

    #[test]
    fn resolve_rejects_bet_above_balance() {
        let err = cmd_resolve(&PayoutTable::citrea(), "777", "2", Some(Decimal::ONE)).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient balance for this bet");
    }
}
