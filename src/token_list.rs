use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{config::ChainConfig, reqwest::Reqwest, units::DEFAULT_DECIMALS};

/// One entry of a hosted token list. Other fields in the document (chainId,
/// logoURI, ...) are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address: Address,
    pub symbol: String,
    pub name: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

/// Downloads the chain's token list. Not cached, every call hits the network.
pub async fn fetch_tokens(config: &ChainConfig) -> crate::Result<Vec<TokenDescriptor>> {
    let tokens = Reqwest::get(config.token_list_url.clone())
        .receive_json::<Vec<TokenDescriptor>>()
        .await
        .map_err(|e| crate::Error::TokenList {
            chain: config.chain,
            source: Box::new(e),
        })?;

    tracing::info!(chain = %config.chain, count = tokens.len(), "fetched token list");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chain::Chain, connection::tests::test_config, testutils::serve};

    const LIST: &str = r#"[
        {
            "chainId": 1,
            "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "name": "USD Coin",
            "symbol": "USDC",
            "decimals": 6,
            "logoURI": "https://example.org/usdc.png"
        },
        {
            "chainId": 1,
            "address": "0x6b175474e89094c44da98b954eedeac495271d0f",
            "name": "Dai Stablecoin",
            "symbol": "DAI",
            "decimals": 18
        },
        {
            "address": "0x514910771af9ca656af840dff83e8264ecf986ca",
            "name": "ChainLink Token",
            "symbol": "LINK"
        }
    ]"#;

    fn config_for(url: &url::Url) -> ChainConfig {
        let mut config = test_config(Chain::Ethereum, "http://127.0.0.1:9000/api");
        config.token_list_url = url.clone();
        config
    }

    #[tokio::test]
    async fn test_fetch_tokens_keeps_order() {
        let (url, _) = serve("200 OK", LIST).await;

        let tokens = fetch_tokens(&config_for(&url)).await.unwrap();
        let symbols: Vec<_> = tokens.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["USDC", "DAI", "LINK"]);
        assert_eq!(tokens[0].decimals, 6);
        assert_eq!(tokens[2].decimals, DEFAULT_DECIMALS);
        assert_eq!(
            tokens[1].address,
            "0x6B175474E89094C44Da98b954EedeAC495271d0F"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_malformed_document() {
        let (url, _) = serve(
            "200 OK",
            r#"[{"address":"0x1234","name":"Bad","symbol":"BAD","decimals":18}]"#,
        )
        .await;

        let err = fetch_tokens(&config_for(&url)).await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::TokenList {
                chain: Chain::Ethereum,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_not_found() {
        let (url, _) = serve("404 Not Found", "404: Not Found").await;

        assert!(matches!(
            fetch_tokens(&config_for(&url)).await,
            Err(crate::Error::TokenList { .. })
        ));
    }
}
