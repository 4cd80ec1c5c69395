use std::collections::HashMap;

use alloy::primitives::Address;
use strum::IntoEnumIterator;
use url::Url;

use crate::{alloy::StringExt, chain::Chain, units::SortPolicy};

/// Everything needed to talk to one chain. Only built by [`Registry::resolve`],
/// so a value of this type always has every endpoint and key filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainConfig {
    pub chain: Chain,
    pub rpc_url: Url,
    pub token_list_url: Url,
    pub explorer_api_url: Url,
    pub explorer_api_key: String,
}

#[derive(Clone, Debug, Default)]
struct RawChainEntry {
    rpc_url: Option<String>,
    token_list_url: Option<String>,
    explorer_api_url: Option<String>,
    explorer_api_key: Option<String>,
}

/// Chain endpoint registry, read once at startup from the environment.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: HashMap<Chain, RawChainEntry>,
}

impl Registry {
    /// Loads `.env` if present and reads the process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: String| lookup(key.as_str()).filter(|value| !value.trim().is_empty());

        let entries = Chain::iter()
            .map(|chain| {
                let prefix = chain.env_prefix();
                let entry = RawChainEntry {
                    rpc_url: get(format!("{prefix}_ARCHIVE_NODE")),
                    token_list_url: get(format!("{prefix}_TOKEN_LIST")),
                    explorer_api_url: get(format!("{prefix}_EXPLORER_API")),
                    explorer_api_key: get(chain.explorer_api_key_var().to_string()),
                };
                (chain, entry)
            })
            .collect();

        Self { entries }
    }

    pub fn resolve(&self, chain: Chain) -> crate::Result<ChainConfig> {
        let entry = self.entries.get(&chain).cloned().unwrap_or_default();
        let prefix = chain.env_prefix();

        let rpc_url = entry.rpc_url.ok_or_else(|| {
            crate::Error::Configuration(format!(
                "RPC endpoint for {chain} is not set, please set {prefix}_ARCHIVE_NODE"
            ))
        })?;
        let explorer_api_key = entry.explorer_api_key.ok_or_else(|| {
            crate::Error::Configuration(format!(
                "Explorer API key for {chain} is not set, please set {}",
                chain.explorer_api_key_var()
            ))
        })?;

        let token_list_url = entry
            .token_list_url
            .unwrap_or_else(|| chain.default_token_list().to_string());
        let explorer_api_url = entry
            .explorer_api_url
            .unwrap_or_else(|| chain.default_explorer_api().to_string());

        Ok(ChainConfig {
            chain,
            rpc_url: parse_config_url(&rpc_url)?,
            token_list_url: parse_config_url(&token_list_url)?,
            explorer_api_url: parse_config_url(&explorer_api_url)?,
            explorer_api_key,
        })
    }
}

fn parse_config_url(value: &str) -> crate::Result<Url> {
    value
        .trim()
        .parse::<Url>()
        .map_err(|e| crate::Error::Configuration(format!("'{value}' is not a valid URL ({e})")))
}

/// Run-wide defaults that are not tied to a chain.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub wallet: Option<Address>,
    /// Non-zero pins every query to this block and skips date resolution.
    pub block_number: Option<u64>,
    pub sort_policy: SortPolicy,
}

impl Settings {
    pub fn from_env() -> crate::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let wallet = get("WALLET")
            .map(|wallet| {
                wallet
                    .trim()
                    .parse_as_address()
                    .map_err(|_| crate::Error::Configuration(format!("WALLET '{wallet}' is not a valid address")))
            })
            .transpose()?;

        let block_number = get("BLOCK_NUMBER")
            .map(|block| {
                block.trim().parse::<u64>().map_err(|_| {
                    crate::Error::Configuration(format!("BLOCK_NUMBER '{block}' is not a number"))
                })
            })
            .transpose()?
            .filter(|block| *block != 0);

        let sort_policy = get("BALANCE_SORT")
            .map(|policy| {
                policy.trim().parse::<SortPolicy>().map_err(|_| {
                    crate::Error::Configuration(format!(
                        "BALANCE_SORT '{policy}' must be 'numeric' or 'lexical'"
                    ))
                })
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            wallet,
            block_number,
            sort_policy,
        })
    }
}
