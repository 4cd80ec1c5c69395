use std::path::PathBuf;

use clap::Parser;
use console::style;
use token_balances::{
    actions::{self, Mode, Request},
    chain::Chain,
};

/// Snapshot ERC20 balances of a wallet at a date or block.
///
/// Every option is optional, anything not given is asked interactively.
#[derive(Parser, Debug)]
#[command(name = "token-balances", version)]
pub struct Cli {
    /// Chain to query
    #[arg(long, value_enum)]
    chain: Option<Chain>,

    /// Query a single token or the whole token list
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Token address for single token mode
    #[arg(long)]
    token: Option<String>,

    /// Date to query at (YYYY/MM/DD), today means the latest block
    #[arg(long, conflicts_with = "block")]
    date: Option<String>,

    /// Exact block number, skips date resolution
    #[arg(long)]
    block: Option<u64>,

    /// Wallet address to check
    #[arg(long)]
    wallet: Option<String>,

    /// Directory the all-tokens snapshot is written to
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

impl From<Cli> for Request {
    fn from(cli: Cli) -> Self {
        Request {
            chain: cli.chain,
            mode: cli.mode,
            token: cli.token,
            date: cli.date,
            block: cli.block,
            wallet: cli.wallet,
            out_dir: cli.out_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    token_balances::log::init();
    let cli = Cli::parse();

    if let Err(err) = actions::run(cli.into()).await {
        eprintln!("{} {err}", style("error:").red());
        if err.is_connect() {
            eprintln!("{}", style("Check your internet connection and endpoints.").yellow());
        }
        std::process::exit(1);
    }
}
