use alloy::providers::Provider;
use chrono::{Local, NaiveDate, TimeZone};

use crate::{connection::ChainConnection, explorer};

/// Format the date prompt shows and accepts.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Which block a run should read balances at. Resolved once, then reused for
/// every query of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockTarget {
    Latest,
    Timestamp(u64),
    Number(u64),
}

impl BlockTarget {
    /// Today (local time) means the chain head, any other day means the last
    /// block before that day's local midnight.
    pub fn from_date(input: &str, today: NaiveDate) -> crate::Result<Self> {
        let date = parse_date(input)?;
        if date == today {
            return Ok(BlockTarget::Latest);
        }

        let midnight = date
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| Local.from_local_datetime(&dt).earliest())
            .ok_or_else(|| crate::Error::InvalidDate(input.to_string()))?;

        let timestamp = u64::try_from(midnight.timestamp())
            .map_err(|_| crate::Error::InvalidDate(input.to_string()))?;

        Ok(BlockTarget::Timestamp(timestamp))
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(input: &str) -> crate::Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"))
        .map_err(|_| crate::Error::InvalidDate(input.to_string()))
}

pub async fn current_block(connection: &ChainConnection) -> crate::Result<u64> {
    let block = connection
        .provider()
        .get_block_number()
        .await
        .map_err(|error| crate::Error::Rpc {
            chain: connection.chain(),
            error: Box::new(error),
        })?;

    tracing::info!(chain = %connection.chain(), block, "current block");
    Ok(block)
}

pub async fn block_at_timestamp(connection: &ChainConnection, timestamp: u64) -> crate::Result<u64> {
    explorer::get_block_by_timestamp(connection.config(), timestamp).await
}

pub async fn resolve_block(connection: &ChainConnection, target: BlockTarget) -> crate::Result<u64> {
    match target {
        BlockTarget::Latest => current_block(connection).await,
        BlockTarget::Timestamp(timestamp) => block_at_timestamp(connection, timestamp).await,
        BlockTarget::Number(block) => Ok(block),
    }
}
