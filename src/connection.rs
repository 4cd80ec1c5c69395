use std::fmt::{Debug, Formatter};

use alloy::providers::DynProvider;

use crate::{
    alloy::http_provider,
    chain::Chain,
    config::{ChainConfig, Registry},
};

/// A resolved chain together with its provider handle. Passed explicitly to
/// everything that talks to the chain, there is no process-wide provider.
#[derive(Clone)]
pub struct ChainConnection {
    config: ChainConfig,
    provider: DynProvider,
}

impl ChainConnection {
    /// Resolves the chain in the registry first, so a missing endpoint or key
    /// fails before any request is made.
    pub fn connect(registry: &Registry, chain: Chain) -> crate::Result<Self> {
        let config = registry.resolve(chain)?;
        tracing::info!(%chain, "initialising provider");
        let provider = http_provider(config.rpc_url.clone());
        Ok(Self { config, provider })
    }

    pub fn with_provider(config: ChainConfig, provider: DynProvider) -> Self {
        Self { config, provider }
    }

    pub fn chain(&self) -> Chain {
        self.config.chain
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }
}

impl Debug for ChainConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConnection")
            .field("chain", &self.config.chain)
            .field("rpc_url", &self.config.rpc_url.as_str())
            .finish_non_exhaustive()
    }
}
