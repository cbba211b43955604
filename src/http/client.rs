//! HTTP Getter Module
//!
//! Outbound half of the peer protocol: fetches one value from one remote
//! peer and decodes the protobuf envelope.

use async_trait::async_trait;
use prost::Message;

use crate::error::{CacheError, Result};
use crate::pb;
use crate::peers::PeerGetter;

// == HTTP Getter ==
/// Fetches values from a single peer's cache endpoint.
pub struct HttpGetter {
    client: reqwest::Client,
    /// Peer base URL including the cache path, e.g.
    /// `http://10.0.0.2:3000/_gcache/`.
    base_url: String,
}

impl HttpGetter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    /// Issues `GET <base_url><group>/<key>` (both segments URL-escaped) and
    /// decodes the `application/octet-stream` protobuf body.
    async fn get(&self, request: &pb::Request) -> Result<pb::Response> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|err| CacheError::Peer(format!("invalid peer url {}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| CacheError::Peer(format!("peer url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push(&request.group)
            .push(&request.key);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| CacheError::Peer(err.to_string()))?;

        if !response.status().is_success() {
            return Err(CacheError::Peer(format!(
                "server returned {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| CacheError::Peer(err.to_string()))?;

        pb::Response::decode(body)
            .map_err(|err| CacheError::Peer(format!("decoding response body: {err}")))
    }
}
