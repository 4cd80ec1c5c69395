use std::path::PathBuf;

use alloy::primitives::Address;
use url::Url;

use crate::{
    chain::Chain,
    reqwest::{ReqwestErrorContext, ReqwestInnerError, ReqwestStage},
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("RPC request to {chain} node failed. (Error: {error})")]
    Rpc {
        chain: Chain,
        error: Box<alloy::transports::TransportError>,
    },

    #[error("Block explorer API for {chain} failed: {reason}")]
    ExplorerApi {
        chain: Chain,
        reason: String,
        #[source]
        source: Option<Box<Error>>,
    },

    #[error("Failed to fetch token list for {chain}. (Error: {source})")]
    TokenList {
        chain: Chain,
        #[source]
        source: Box<Error>,
    },

    #[error("Contract call {call}() on {contract} failed. (Error: {error})")]
    ContractCall {
        contract: Address,
        call: &'static str,
        error: Box<alloy::contract::Error>,
    },

    #[error("Address '{0}' is not a valid Ethereum address.")]
    InvalidAddress(String),

    #[error("Date '{0}' is not valid, expected format YYYY/MM/DD.")]
    InvalidDate(String),

    #[error("'{0}' is not a valid unsigned integer magnitude.")]
    InvalidMagnitude(String),

    #[error("Please check your internet connection, the URL seems to be unreachable: {0}")]
    Internet(Url),

    #[error("Request '{url}' failed at stage '{stage:?}' (Error='{inner:?}')", url = context.url)]
    ReqwestFailed {
        stage: ReqwestStage,
        context: Box<ReqwestErrorContext>,
        inner: ReqwestInnerError,
    },

    #[error("Reqwest builder missing error context, this is a bug please report it.")]
    ReqwestErrorContextMissing,

    #[error(transparent)]
    Inquire(#[from] inquire::InquireError),

    #[error("Failed to write to the file: {0}. (Error: {1:?})")]
    FileWriteFailed(PathBuf, std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Internet(_) => true,
            Self::ReqwestFailed { inner, .. } => inner.is_connect(),
            Self::TokenList { source, .. } => source.is_connect(),
            Self::ExplorerApi {
                source: Some(source),
                ..
            } => source.is_connect(),
            _ => false,
        }
    }
}
