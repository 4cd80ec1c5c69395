use std::future::Future;

use alloy::{
    eips::BlockId,
    primitives::{Address, U256},
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::{connection::ChainConnection, erc20::IERC20, token_list::TokenDescriptor, units};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    pub name: String,
    pub symbol: String,
    pub balance: String,
}

/// Anything that can answer `balanceOf` for a token at a given block.
pub trait BalanceSource {
    fn balance_of(
        &self,
        token: Address,
        owner: Address,
        block: u64,
    ) -> impl Future<Output = crate::Result<U256>> + Send;
}

impl BalanceSource for ChainConnection {
    async fn balance_of(&self, token: Address, owner: Address, block: u64) -> crate::Result<U256> {
        IERC20::new(token, self.provider().clone())
            .balanceOf(owner)
            .block(BlockId::number(block))
            .call()
            .await
            .map_err(|e| contract_call_error(token, "balanceOf", e))
    }
}

fn contract_call_error(
    contract: Address,
    call: &'static str,
    error: alloy::contract::Error,
) -> crate::Error {
    crate::Error::ContractCall {
        contract,
        call,
        error: Box::new(error),
    }
}

/// Reads metadata and the balance of one token. Fails on the first call that
/// errors, no partial result is returned.
pub async fn single_balance(
    connection: &ChainConnection,
    token: Address,
    wallet: Address,
    block: u64,
) -> crate::Result<BalanceResult> {
    tracing::info!(%token, "retrieving ERC20 token details");
    let contract = IERC20::new(token, connection.provider().clone());

    let decimals = contract
        .decimals()
        .call()
        .await
        .map_err(|e| contract_call_error(token, "decimals", e))?;
    let name = contract
        .name()
        .call()
        .await
        .map_err(|e| contract_call_error(token, "name", e))?;
    let symbol = contract
        .symbol()
        .call()
        .await
        .map_err(|e| contract_call_error(token, "symbol", e))?;

    let raw = connection.balance_of(token, wallet, block).await?;

    Ok(BalanceResult {
        name,
        symbol,
        balance: units::convert(Some(raw), decimals),
    })
}

/// Queries `balanceOf` for every token concurrently, all at `block`, and waits
/// for every call to settle. Output order matches `tokens`.
///
/// A failed call is reported as a zero balance instead of an error, so one bad
/// contract in a list of thousands cannot sink the whole snapshot. The mapping
/// happens in [`degrade_to_zero`].
pub async fn batch_balances<S: BalanceSource>(
    source: &S,
    tokens: &[TokenDescriptor],
    wallet: Address,
    block: u64,
) -> Vec<BalanceResult> {
    let settled: Vec<crate::Result<U256>> = join_all(
        tokens
            .iter()
            .map(|token| source.balance_of(token.address, wallet, block)),
    )
    .await;

    let mut degraded = 0usize;
    let results: Vec<BalanceResult> = tokens
        .iter()
        .zip(settled)
        .map(|(token, result)| {
            let raw = degrade_to_zero(token, result);
            if raw.is_none() {
                degraded += 1;
            }
            BalanceResult {
                name: token.name.clone(),
                symbol: token.symbol.clone(),
                balance: units::convert(raw, token.decimals),
            }
        })
        .collect();

    if degraded > 0 {
        tracing::warn!(
            degraded,
            total = tokens.len(),
            "some balance calls failed and were reported as zero"
        );
    }
    results
}

fn degrade_to_zero(token: &TokenDescriptor, result: crate::Result<U256>) -> Option<U256> {
    match result {
        Ok(raw) => Some(raw),
        Err(err) => {
            tracing::debug!(token = %token.address, symbol = %token.symbol, "balance call failed, reporting zero: {err}");
            None
        }
    }
}
