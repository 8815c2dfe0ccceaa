//! reel-sim — Batch spin simulator
//!
//! Usage:
//!   reel-sim --spins 100000 --seed 7
//!   reel-sim --config machine.yaml --bet-index 2 --json
//!
//! Runs spins back to back with zero timing, restarting the session whenever
//! it ends, and reports session outcomes plus RTP and hit rate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reel_engine::{GameConfig, SessionEnd, SessionStats, SlotError, SlotSession, TimingConfig};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "reel-sim", about = "Batch spin simulator for the reel slot engine")]
struct Cli {
    /// Game config (.json, .yaml or .yml); built-in machine when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of spins to play
    #[arg(short, long, default_value_t = 10_000)]
    spins: u64,

    /// RNG seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Bet level to play at (index into the bet amounts)
    #[arg(short, long)]
    bet_index: Option<usize>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    machine: String,
    seed: Option<u64>,
    spins_requested: u64,
    spins_played: u64,
    sessions_lost: u64,
    sessions_won: u64,
    rejected_bets: u64,
    final_balance: u64,
    rtp_percent: f64,
    hit_rate_percent: f64,
    stats: SessionStats,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.session.seed = Some(seed);
    }
    if let Some(index) = cli.bet_index {
        config.bet.starting_index = index;
    }
    config.timing = TimingConfig::instant();

    log::info!("Simulating {} spins on '{}'", cli.spins, config.name);
    let summary = simulate(config, cli.spins)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn simulate(config: GameConfig, spins: u64) -> Result<Summary> {
    let mut summary = Summary {
        machine: config.name.clone(),
        seed: config.session.seed,
        spins_requested: spins,
        ..Summary::default()
    };
    let bet_index = config.bet.starting_index;
    let mut session = SlotSession::new(config).context("invalid game config")?;

    while summary.spins_played < spins {
        match session.spin() {
            Ok(report) => {
                summary.spins_played += 1;
                match report.settlement.end {
                    Some(SessionEnd::GameOver) => {
                        summary.sessions_lost += 1;
                        restart(&mut session, bet_index)?;
                    }
                    Some(SessionEnd::GameWin) => {
                        summary.sessions_won += 1;
                        restart(&mut session, bet_index)?;
                    }
                    None => {}
                }
            }
            Err(SlotError::InsufficientFunds { balance, bet }) => {
                summary.rejected_bets += 1;
                log::debug!("bet {} exceeds balance {}, stepping down", bet, balance);
                if !session.decrease_bet() {
                    summary.sessions_lost += 1;
                    restart(&mut session, bet_index)?;
                }
            }
            Err(e) => return Err(anyhow::Error::from(e).context("spin failed")),
        }
    }

    let stats = session.stats().clone();
    summary.final_balance = session.balance();
    summary.rtp_percent = stats.rtp();
    summary.hit_rate_percent = stats.hit_rate();
    summary.stats = stats;
    Ok(summary)
}

fn restart(session: &mut SlotSession, bet_index: usize) -> Result<()> {
    session.restart().context("restart rejected")?;
    session.set_bet_index(bet_index);
    Ok(())
}

fn print_summary(summary: &Summary) {
    let stats = &summary.stats;

    println!("Machine:        {}", summary.machine);
    if let Some(seed) = summary.seed {
        println!("Seed:           {}", seed);
    }
    println!("Spins:          {}/{}", summary.spins_played, summary.spins_requested);
    println!("Sessions lost:  {}", summary.sessions_lost);
    println!("Sessions won:   {}", summary.sessions_won);
    println!("Rejected bets:  {}", summary.rejected_bets);
    println!("Total bet:      {}", stats.total_bet);
    println!("Total win:      {}", stats.total_win);
    println!("RTP:            {:.2}%", summary.rtp_percent);
    println!("Hit rate:       {:.2}%", summary.hit_rate_percent);
    println!("Jackpots:       {}", stats.jackpots_triggered);
    println!("Largest win:    {}", stats.max_single_win);
    println!("Final balance:  {}", summary.final_balance);
}
