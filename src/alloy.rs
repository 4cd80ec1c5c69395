use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use url::Url;

pub trait StringExt {
    fn parse_as_address(&self) -> crate::Result<Address>;
}

impl StringExt for str {
    fn parse_as_address(&self) -> crate::Result<Address> {
        self.trim()
            .parse::<Address>()
            .map_err(|_| crate::Error::InvalidAddress(self.to_string()))
    }
}

impl StringExt for String {
    fn parse_as_address(&self) -> crate::Result<Address> {
        self.as_str().parse_as_address()
    }
}

/// Read-only HTTP provider. No fillers are installed since the tool never
/// sends transactions.
pub fn http_provider(rpc_url: Url) -> DynProvider {
    ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_http(rpc_url)
        .erased()
}
