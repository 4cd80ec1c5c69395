use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use alloy::primitives::Address;
use indicatif::ProgressBar;
use inquire::Text;
use strum_macros::{Display, EnumIter};

use crate::{
    alloy::StringExt,
    balances::{self, BalanceResult, BalanceSource},
    block::{self, BlockTarget, DATE_FORMAT},
    chain::Chain,
    config::{Registry, Settings},
    connection::ChainConnection,
    impl_inquire_selection,
    token_list::{self, TokenDescriptor},
    traits::Inquire,
    units::{sort_balances, SortPolicy},
};

/// Ethereum mainnet USDC, offered as the default single token.
pub const DEFAULT_TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";

impl_inquire_selection!(Chain, "Which blockchain do you want to query?");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, clap::ValueEnum)]
pub enum Mode {
    #[strum(to_string = "Single token")]
    #[value(name = "single")]
    Single,
    #[strum(to_string = "All")]
    #[value(name = "all")]
    All,
}

impl_inquire_selection!(Mode, "How many tokens do you want to query?");

/// Answers that were given up front. Anything left as `None` is asked
/// interactively.
#[derive(Clone, Debug, Default)]
pub struct Request {
    pub chain: Option<Chain>,
    pub mode: Option<Mode>,
    pub token: Option<String>,
    pub date: Option<String>,
    pub block: Option<u64>,
    pub wallet: Option<String>,
    pub out_dir: Option<PathBuf>,
}

pub async fn run(request: Request) -> crate::Result<()> {
    let settings = Settings::from_env()?;
    let registry = Registry::from_env();

    let chain = Chain::unwrap_or_inquire(request.chain, &())?;
    // endpoint and key are checked here, before any request goes out
    let connection = ChainConnection::connect(&registry, chain)?;

    let mode = Mode::unwrap_or_inquire(request.mode, &())?;
    let token = match mode {
        Mode::Single => Some(ask_token(request.token)?),
        Mode::All => None,
    };

    let today = block::today();
    let today_str = today.format(DATE_FORMAT).to_string();
    let (target, date) = match request.block.or(settings.block_number) {
        Some(block) => (BlockTarget::Number(block), format!("block {block}")),
        None => {
            let date = match request.date {
                Some(date) => date,
                None => Text::new("Date you want to query from? (format YYYY/MM/DD)")
                    .with_default(&today_str)
                    .prompt()?,
            };
            (BlockTarget::from_date(&date, today)?, date)
        }
    };

    let wallet = ask_wallet(request.wallet, settings.wallet)?;

    println!("~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~");
    match target {
        BlockTarget::Latest => println!("Checking balance for today..."),
        BlockTarget::Timestamp(ts) => println!("Checking balance at {date} (timestamp {ts})"),
        BlockTarget::Number(_) => println!("Checking balance at {date}"),
    }
    let block = block::resolve_block(&connection, target).await?;
    println!("⛓ Using block {block}");

    if let Some(token) = token {
        let result = balances::single_balance(&connection, token, wallet, block).await?;
        println!(
            "Wallet balance on {date} is {}",
            serde_json::to_string_pretty(&result)?
        );
    } else {
        let start = Instant::now();

        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(format!("Fetching {chain} token list..."));
        let tokens = token_list::fetch_tokens(connection.config()).await;
        spinner.finish_and_clear();
        let tokens = tokens?;
        println!("🧮 Retrieved {} ERC20 tokens", tokens.len());

        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(format!("Querying {} balances...", tokens.len()));
        let results =
            snapshot_balances(&connection, &tokens, wallet, block, settings.sort_policy).await;
        spinner.finish_and_clear();

        let out_dir = request.out_dir.unwrap_or_else(|| PathBuf::from("."));
        let path = write_balances(&results, chain, &out_dir)?;

        println!(
            "Retrieved tokens and balances in {:.2?}",
            start.elapsed()
        );
        println!("💨💨💨💨💨💨💨💨");
        println!(
            "Results sorted ({}) and saved in {} file",
            settings.sort_policy,
            path.display()
        );
    }

    Ok(())
}

fn ask_token(token: Option<String>) -> crate::Result<Address> {
    let token = match token {
        Some(token) => token,
        None => Text::new("What is the token address? (default Eth. USDC)")
            .with_default(DEFAULT_TOKEN)
            .prompt()?,
    };
    token.parse_as_address()
}

fn ask_wallet(wallet: Option<String>, default: Option<Address>) -> crate::Result<Address> {
    let wallet = match wallet {
        Some(wallet) => wallet,
        None => {
            let default = default.map(|address| address.to_string());
            let mut prompt = Text::new("What is the wallet address you want to check?");
            if let Some(default) = default.as_deref() {
                prompt = prompt.with_default(default);
            }
            prompt.prompt()?
        }
    };
    wallet.parse_as_address()
}

/// Batch balances for every token, ordered by `policy`.
pub async fn snapshot_balances<S: BalanceSource>(
    source: &S,
    tokens: &[TokenDescriptor],
    wallet: Address,
    block: u64,
    policy: SortPolicy,
) -> Vec<BalanceResult> {
    let mut results = balances::batch_balances(source, tokens, wallet, block).await;
    sort_balances(&mut results, policy);
    results
}

/// Writes `balances-<Chain>.json` into `dir` as a compact JSON array.
pub fn write_balances(results: &[BalanceResult], chain: Chain, dir: &Path) -> crate::Result<PathBuf> {
    let path = dir.join(chain.output_file_name());
    let content = serde_json::to_string(results)?;
    fs::write(&path, content).map_err(|e| crate::Error::FileWriteFailed(path.clone(), e))?;

    tracing::info!(path = %path.display(), count = results.len(), "balances written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use alloy::primitives::U256;

    use super::*;
    use crate::balances::tests::{token, wallet, MockSource};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("token-balances-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_all_tokens_snapshot_file() {
        let tokens = vec![token(1, "USDC", 6), token(2, "DAI", 18)];
        let source = MockSource {
            balances: HashMap::from([
                (tokens[0].address, U256::from(2_500_000u64)),
                (tokens[1].address, U256::from(3_000_000_000_000_000_000u128)),
            ]),
        };

        let results =
            snapshot_balances(&source, &tokens, wallet(), 17_000_000, SortPolicy::Lexical).await;
        let dir = temp_dir("snapshot");
        let path = write_balances(&results, Chain::Ethereum, &dir).unwrap();

        assert_eq!(path, dir.join("balances-Ethereum.json"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"[{"name":"DAI Token","symbol":"DAI","balance":"3"},{"name":"USDC Token","symbol":"USDC","balance":"2.5"}]"#
        );

        fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_snapshot_numeric_order_with_failure() {
        let tokens = vec![token(1, "NINE", 0), token(2, "TEN", 0), token(3, "FAIL", 0)];
        let source = MockSource {
            balances: HashMap::from([
                (tokens[0].address, U256::from(9u64)),
                (tokens[1].address, U256::from(10u64)),
            ]),
        };

        let results =
            snapshot_balances(&source, &tokens, wallet(), 17_000_000, SortPolicy::Numeric).await;
        let ranked: Vec<_> = results
            .iter()
            .map(|r| (r.symbol.as_str(), r.balance.as_str()))
            .collect();
        assert_eq!(ranked, vec![("TEN", "10"), ("NINE", "9"), ("FAIL", "0")]);
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = std::env::temp_dir().join("token-balances-does-not-exist/nested");
        assert!(matches!(
            write_balances(&[], Chain::Polygon, &dir),
            Err(crate::Error::FileWriteFailed(..))
        ));
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::Single.to_string(), "Single token");
        assert_eq!(Mode::All.to_string(), "All");
    }
}
