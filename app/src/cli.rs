//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use amm::SwapMode;
use router_core::{Amount, SearchStrategy};

#[derive(Parser, Debug)]
#[command(name = "auto-router", author, version, about = "Multi-hop constant-product DEX router")]
pub struct Cli {
    /// Router configuration file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find and quote the best route for one swap
    Route(RouteArgs),
    /// Route every request in a file against one snapshot
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Pool snapshot file (JSON)
    #[arg(long)]
    pub pools: PathBuf,

    /// Token being sold
    #[arg(long)]
    pub from: String,

    /// Token being bought
    #[arg(long)]
    pub to: String,

    /// Fixed amount in the token's smallest unit
    #[arg(long)]
    pub amount: Amount,

    #[arg(long, value_enum, default_value_t = ModeArg::FixedInput)]
    pub mode: ModeArg,

    #[arg(long)]
    pub max_hops: Option<u8>,

    /// Slippage tolerance in percent
    #[arg(long)]
    pub slippage: Option<f64>,

    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Pool snapshot file (JSON)
    #[arg(long)]
    pub pools: PathBuf,

    /// Request list file (JSON)
    #[arg(long)]
    pub requests: PathBuf,

    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    FixedInput,
    FixedOutput,
}

impl From<ModeArg> for SwapMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::FixedInput => SwapMode::FixedInput,
            ModeArg::FixedOutput => SwapMode::FixedOutput,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    BestFirst,
    Exhaustive,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::BestFirst => SearchStrategy::BestFirst,
            StrategyArg::Exhaustive => SearchStrategy::Exhaustive,
        }
    }
}
