use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use log::{error, info};
use payroll::{ParticipantSnapshot, PayrollError, PoolSnapshot, QuarryShare, RewarderSnapshot};
use serde::Serialize;
use thiserror::Error;

mod display;
mod input;

use display::ui_amount;
use input::{load_snapshot, resolve_now, InputError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Predicts quarry rewards from pool and miner snapshots")]
struct Cli {
    /// Unix timestamp to evaluate at; defaults to the system clock
    #[arg(long, global = true, env = "PAYROLL_NOW")]
    now: Option<i64>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reward per token, and a miner's claimable rewards if given
    Rewards {
        #[arg(long)]
        pool: PathBuf,
        #[arg(long)]
        miner: Option<PathBuf>,
        /// Reward token decimals, for human-readable amounts
        #[arg(long)]
        decimals: Option<u8>,
    },
    /// Pool state after a checkpoint at `--now`
    Checkpoint {
        #[arg(long)]
        pool: PathBuf,
        /// Re-sync the annual rate from this rewarder
        #[arg(long, requires = "share")]
        rewarder: Option<PathBuf>,
        /// The quarry's rewards share in `--rewarder`
        #[arg(long, requires = "rewarder")]
        share: Option<u64>,
    },
    /// Pool and miner state after settling the miner at `--now`
    Settle {
        #[arg(long)]
        pool: PathBuf,
        #[arg(long)]
        miner: PathBuf,
        /// Re-sync the annual rate from this rewarder
        #[arg(long, requires = "share")]
        rewarder: Option<PathBuf>,
        /// The quarry's rewards share in `--rewarder`
        #[arg(long, requires = "rewarder")]
        share: Option<u64>,
    },
    /// Annual rate a quarry receives for its rewards share
    Rate {
        #[arg(long)]
        rewarder: PathBuf,
        #[arg(long)]
        share: u64,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("rewards currently unknown: {0}")]
    Payroll(#[from] PayrollError),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            // Never report zero when the inputs are inconsistent.
            CliError::Payroll(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Serialize, Debug)]
struct RewardsReport {
    now: i64,
    reward_per_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewards_earned: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewards_earned_ui: Option<String>,
}

#[derive(Serialize, Debug)]
struct SettlementReport {
    pool: PoolSnapshot,
    miner: ParticipantSnapshot,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let stdout = io::stdout();
    if let Err(err) = run(&cli, &mut stdout.lock()) {
        error!("{err}");
        match err {
            CliError::Payroll(_) => eprintln!("{err}"),
            _ => eprintln!("error: {err}"),
        }
        process::exit(err.exit_code());
    }
}

fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    let now = resolve_now(cli.now)?;
    info!("evaluating at {now}");
    match &cli.cmd {
        Command::Rewards {
            pool,
            miner,
            decimals,
        } => {
            let pool: PoolSnapshot = load_snapshot(pool)?;
            let miner: Option<ParticipantSnapshot> =
                miner.as_deref().map(load_snapshot::<ParticipantSnapshot>).transpose()?;
            let report = rewards_report(&pool, miner.as_ref(), *decimals, now)?;
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "now: {}", report.now)?;
                writeln!(out, "reward_per_token: {}", report.reward_per_token)?;
                if let Some(earned) = &report.rewards_earned {
                    writeln!(out, "rewards_earned: {earned}")?;
                }
                if let Some(earned) = &report.rewards_earned_ui {
                    writeln!(out, "rewards_earned_ui: {earned}")?;
                }
            }
        }
        Command::Checkpoint {
            pool,
            rewarder,
            share,
        } => {
            let pool: PoolSnapshot = load_snapshot(pool)?;
            let next = match load_share(rewarder.as_deref(), *share)? {
                Some(share) => payroll::predict_checkpoint_with_rate(&pool, &share, now)?,
                None => payroll::predict_checkpoint(&pool, now)?,
            };
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&next)?)?;
            } else {
                write_pool(out, "", &next)?;
            }
        }
        Command::Settle {
            pool,
            miner,
            rewarder,
            share,
        } => {
            let pool: PoolSnapshot = load_snapshot(pool)?;
            let miner: ParticipantSnapshot = load_snapshot(miner)?;
            let share = load_share(rewarder.as_deref(), *share)?;
            let settled = payroll::predict_settlement(&pool, &miner, share.as_ref(), now)?;
            let report = SettlementReport {
                pool: settled.pool,
                miner: settled.participant,
            };
            if cli.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                write_pool(out, "pool.", &report.pool)?;
                writeln!(out, "miner.deposited: {}", report.miner.deposited)?;
                writeln!(
                    out,
                    "miner.reward_per_token_paid: {}",
                    report.miner.reward_per_token_paid
                )?;
                writeln!(out, "miner.reward_accrued: {}", report.miner.reward_accrued)?;
            }
        }
        Command::Rate { rewarder, share } => {
            let rewarder: RewarderSnapshot = load_snapshot(rewarder)?;
            let rate = payroll::quarry_annual_rate(&rewarder, *share)?;
            if cli.json {
                writeln!(out, "{}", serde_json::json!({ "annual_rate": rate }))?;
            } else {
                writeln!(out, "annual_rate: {rate}")?;
            }
        }
    }
    Ok(())
}

fn load_share(
    rewarder: Option<&Path>,
    share: Option<u64>,
) -> Result<Option<QuarryShare>, CliError> {
    match (rewarder, share) {
        (Some(rewarder), Some(share)) => {
            let rewarder: RewarderSnapshot = load_snapshot(rewarder)?;
            Ok(Some(QuarryShare::new(rewarder, share)))
        }
        _ => Ok(None),
    }
}

fn write_pool(out: &mut impl Write, prefix: &str, pool: &PoolSnapshot) -> io::Result<()> {
    writeln!(out, "{prefix}famine_time: {}", pool.famine_time)?;
    writeln!(out, "{prefix}last_checkpoint_time: {}", pool.last_checkpoint_time)?;
    writeln!(out, "{prefix}annual_rate: {}", pool.annual_rate)?;
    writeln!(
        out,
        "{prefix}reward_per_token_stored: {}",
        pool.reward_per_token_stored
    )?;
    writeln!(out, "{prefix}total_deposited: {}", pool.total_deposited)
}

fn rewards_report(
    pool: &PoolSnapshot,
    miner: Option<&ParticipantSnapshot>,
    decimals: Option<u8>,
    now: i64,
) -> Result<RewardsReport, PayrollError> {
    let reward_per_token = payroll::reward_per_token(pool, now)?;
    let earned = miner
        .map(|miner| payroll::rewards_earned(pool, miner, now))
        .transpose()?;
    Ok(RewardsReport {
        now,
        reward_per_token: reward_per_token.to_string(),
        rewards_earned: earned.map(|e| e.to_string()),
        rewards_earned_ui: earned.zip(decimals).map(|(e, d)| ui_amount(e, d)),
    })
}
