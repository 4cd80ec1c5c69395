use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Chains the tool knows how to query. The set is closed, every variant must
/// carry its own explorer endpoint and key.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(ascii_case_insensitive)]
pub enum Chain {
    Ethereum,
    Avalanche,
    Binance,
    Polygon,
}

impl Chain {
    /// Prefix of the per-chain environment variables, e.g. `ETH_ARCHIVE_NODE`.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ETH",
            Chain::Avalanche => "AVA",
            Chain::Binance => "BNB",
            Chain::Polygon => "POLY",
        }
    }

    pub fn explorer_api_key_var(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ETHERSCAN_API_KEY",
            Chain::Avalanche => "SNOWTRACE_API_KEY",
            Chain::Binance => "BSCSCAN_API_KEY",
            Chain::Polygon => "POLYSCAN_API_KEY",
        }
    }

    pub fn default_explorer_api(&self) -> &'static str {
        match self {
            Chain::Ethereum => "https://api.etherscan.io/api",
            Chain::Avalanche => "https://api.snowtrace.io/api",
            Chain::Binance => "https://api.bscscan.com/api",
            Chain::Polygon => "https://api.polygonscan.com/api",
        }
    }

    pub fn default_token_list(&self) -> &'static str {
        match self {
            Chain::Ethereum => {
                "https://raw.githubusercontent.com/viaprotocol/tokenlists/main/tokenlists/ethereum.json"
            }
            Chain::Avalanche => {
                "https://raw.githubusercontent.com/viaprotocol/tokenlists/main/tokenlists/avax.json"
            }
            Chain::Binance => {
                "https://raw.githubusercontent.com/viaprotocol/tokenlists/main/tokenlists/bsc.json"
            }
            Chain::Polygon => {
                "https://raw.githubusercontent.com/viaprotocol/tokenlists/main/tokenlists/polygon.json"
            }
        }
    }

    /// File the all-tokens snapshot is written to.
    pub fn output_file_name(&self) -> String {
        format!("balances-{self}.json")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_explorer_endpoints_are_distinct() {
        let apis: HashSet<_> = Chain::iter().map(|c| c.default_explorer_api()).collect();
        let keys: HashSet<_> = Chain::iter().map(|c| c.explorer_api_key_var()).collect();

        assert_eq!(apis.len(), 4);
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Chain::Polygon.to_string(), "Polygon");
        assert_eq!("binance".parse::<Chain>().unwrap(), Chain::Binance);
        assert_eq!(
            Chain::Ethereum.output_file_name(),
            "balances-Ethereum.json"
        );
    }
}
