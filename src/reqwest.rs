use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use url::Url;

use crate::serde::{SerdePathError, SerdeResponseParse};

#[derive(Debug)]
pub enum ReqwestStage {
    Send,
    Status,
    DecodeText,
    Deserialise,
}

#[derive(Debug)]
pub struct ReqwestErrorContext {
    pub url: Url,
    /// Query keys only, values can carry api keys.
    pub query_keys: Vec<String>,
}

#[derive(Debug)]
pub enum ReqwestInnerError {
    Reqwest(reqwest::Error),
    SerdePath(SerdePathError),
}

impl ReqwestInnerError {
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Reqwest(err) => err.is_connect(),
            Self::SerdePath(_) => false,
        }
    }
}

/// GET request that remembers where it was going so failures can say which
/// stage broke.
pub struct Reqwest {
    builder: RequestBuilder,
    error_context: Option<ReqwestErrorContext>,
}

impl Reqwest {
    pub fn get(url: Url) -> Self {
        let builder = reqwest::Client::new().get(url.clone());
        Self {
            builder,
            error_context: Some(ReqwestErrorContext {
                url,
                query_keys: vec![],
            }),
        }
    }

    pub fn query(mut self, query: &[(&str, String)]) -> Self {
        self.builder = self.builder.query(query);
        if let Some(context) = self.error_context.as_mut() {
            context
                .query_keys
                .extend(query.iter().map(|(key, _)| key.to_string()));
        }
        self
    }

    pub async fn receive_text(self) -> crate::Result<String> {
        let (text, _) = self.receive_text_internal().await?;
        Ok(text)
    }

    async fn receive_text_internal(mut self) -> crate::Result<(String, Box<ReqwestErrorContext>)> {
        let error_context = Box::new(
            self.error_context
                .take()
                .ok_or(crate::Error::ReqwestErrorContextMissing)?,
        );

        tracing::debug!(url = %error_context.url, "sending GET request");

        let send_result = self.builder.send().await;
        let Ok(response) = send_result else {
            let err = send_result.unwrap_err();
            if err.is_connect() {
                return Err(crate::Error::Internet(error_context.url));
            } else {
                return Err(crate::Error::ReqwestFailed {
                    stage: ReqwestStage::Send,
                    context: error_context,
                    inner: ReqwestInnerError::Reqwest(err),
                });
            }
        };

        let status_result = response.error_for_status();
        let Ok(response) = status_result else {
            let err = status_result.unwrap_err();
            return Err(crate::Error::ReqwestFailed {
                stage: ReqwestStage::Status,
                context: error_context,
                inner: ReqwestInnerError::Reqwest(err),
            });
        };

        let text_result = response.text().await;
        let Ok(text) = text_result else {
            let err = text_result.unwrap_err();
            return Err(crate::Error::ReqwestFailed {
                stage: ReqwestStage::DecodeText,
                context: error_context,
                inner: ReqwestInnerError::Reqwest(err),
            });
        };

        Ok((text, error_context))
    }

    pub async fn receive_json<J: Debug + DeserializeOwned>(self) -> crate::Result<J> {
        let (text, error_context) = self.receive_text_internal().await?;

        let parse_result = text.as_str().serde_parse_custom();
        let Ok(json) = parse_result else {
            let err = parse_result.unwrap_err();
            return Err(crate::Error::ReqwestFailed {
                stage: ReqwestStage::Deserialise,
                context: error_context,
                inner: ReqwestInnerError::SerdePath(err),
            });
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::serve_once;

    #[tokio::test]
    async fn test_status_error_stage() {
        let url = serve_once("500 Internal Server Error", "oops").await;

        let err = Reqwest::get(url).receive_text().await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::ReqwestFailed {
                stage: ReqwestStage::Status,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_deserialise_error_stage() {
        let url = serve_once("200 OK", "[1, 2").await;

        let err = Reqwest::get(url)
            .receive_json::<Vec<u8>>()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::ReqwestFailed {
                stage: ReqwestStage::Deserialise,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url: Url = format!("http://{}/", listener.local_addr().unwrap())
            .parse()
            .unwrap();
        drop(listener);

        let err = Reqwest::get(url).receive_text().await.unwrap_err();
        assert!(err.is_connect());
    }
}
