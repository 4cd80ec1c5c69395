//! Etherscan-family block explorer API (etherscan, snowtrace, bscscan,
//! polygonscan all share the same `module=block` endpoint).

use serde::Deserialize;

use crate::{chain::Chain, config::ChainConfig, reqwest::Reqwest, serde::SerdeResponseParse};

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// Asks the chain's explorer for the last block mined at or before
/// `timestamp` (unix seconds).
pub async fn get_block_by_timestamp(config: &ChainConfig, timestamp: u64) -> crate::Result<u64> {
    let chain = config.chain;
    tracing::info!(%chain, timestamp, "resolving block by timestamp");

    let text = Reqwest::get(config.explorer_api_url.clone())
        .query(&[
            ("module", "block".to_string()),
            ("action", "getblocknobytime".to_string()),
            ("timestamp", timestamp.to_string()),
            ("closest", "before".to_string()),
            ("apikey", config.explorer_api_key.clone()),
        ])
        .receive_text()
        .await
        .map_err(|e| crate::Error::ExplorerApi {
            chain,
            reason: e.to_string(),
            source: Some(Box::new(e)),
        })?;

    parse_block_response(chain, &text)
}

fn parse_block_response(chain: Chain, text: &str) -> crate::Result<u64> {
    let response: ExplorerResponse = text
        .serde_parse_custom()
        .map_err(|e| crate::Error::ExplorerApi {
            chain,
            reason: format!("unparsable response body ({e})"),
            source: None,
        })?;

    if response.status != "1" {
        return Err(crate::Error::ExplorerApi {
            chain,
            reason: format!("{} ({})", response.message, response.result),
            source: None,
        });
    }

    let block = match &response.result {
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        serde_json::Value::Number(n) => n.as_u64(),
        _ => None,
    };

    block.ok_or_else(|| crate::Error::ExplorerApi {
        chain,
        reason: format!("result {} is not a block number", response.result),
        source: None,
    })
}
