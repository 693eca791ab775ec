// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use alloy::rpc::client::{ClientBuilder, RpcClient};
use alloy::transports::http::reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use alloy::transports::http::reqwest::{self, Url};
use alloy::transports::http::Http;
use alloy::transports::{TransportErrorKind, TransportResult};
use alloy_rpc_types_engine::{Claims, JwtSecret};
use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};

/// Lifetime (seconds) of a minted engine API token
pub const ENGINE_TOKEN_TTL: u64 = 60;

/// Opens raw JSON-RPC clients to endpoints.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connects to an http(s), ws(s) or ipc endpoint.
    async fn connect(&self, url: &str) -> TransportResult<RpcClient>;

    /// Connects to an engine API endpoint, authenticating with a token minted from `secret`.
    async fn connect_authenticated(
        &self,
        url: &str,
        secret: &JwtSecret,
    ) -> TransportResult<RpcClient>;
}

/// [Connector] backed by the alloy built-in transports
#[derive(Debug, Clone, Copy, Default)]
pub struct AlloyConnector;

#[async_trait]
impl Connector for AlloyConnector {
    async fn connect(&self, url: &str) -> TransportResult<RpcClient> {
        ClientBuilder::default().connect(url).await
    }

    async fn connect_authenticated(
        &self,
        url: &str,
        secret: &JwtSecret,
    ) -> TransportResult<RpcClient> {
        let url = Url::parse(url).map_err(TransportErrorKind::custom)?;
        let token = mint_engine_token(secret)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(TransportErrorKind::custom)?,
        );
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(TransportErrorKind::custom)?;

        Ok(RpcClient::new(Http::with_client(http_client, url), false))
    }
}

/// Encodes a short-lived HS256 token for the engine API
pub fn mint_engine_token(secret: &JwtSecret) -> TransportResult<String> {
    let iat = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(TransportErrorKind::custom)?
        .as_secs();
    secret
        .encode(&Claims {
            iat,
            exp: Some(iat + ENGINE_TOKEN_TTL),
        })
        .map_err(TransportErrorKind::custom)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod tests {
    use super::*;
    use alloy::transports::mock::Asserter;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves mocked transports for registered urls and refuses every other url.
    #[derive(Default)]
    pub struct MockConnector {
        endpoints: Mutex<HashMap<String, Asserter>>,
        attempts: Mutex<HashMap<String, u64>>,
    }

    impl MockConnector {
        pub fn with_endpoint(self, url: &str, asserter: Asserter) -> Self {
            self.endpoints
                .lock()
                .unwrap()
                .insert(url.to_string(), asserter);
            self
        }

        pub fn attempts(&self, url: &str) -> u64 {
            self.attempts
                .lock()
                .unwrap()
                .get(url)
                .copied()
                .unwrap_or_default()
        }

        fn serve(&self, url: &str) -> TransportResult<RpcClient> {
            *self
                .attempts
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default() += 1;
            match self.endpoints.lock().unwrap().get(url) {
                Some(asserter) => Ok(RpcClient::mocked(asserter.clone())),
                None => Err(TransportErrorKind::custom_str("connection refused")),
            }
        }
    }

    #[async_trait]
    impl Connector for MockConnector {
        async fn connect(&self, url: &str) -> TransportResult<RpcClient> {
            self.serve(url)
        }

        async fn connect_authenticated(
            &self,
            url: &str,
            _secret: &JwtSecret,
        ) -> TransportResult<RpcClient> {
            self.serve(url)
        }
    }

    pub const TEST_JWT_SECRET: &str =
        "f79ae8046bc11c9927afe911db7143c51a806c4a537cc08e0d37140b0192f430";

    #[test]
    fn test_engine_token_validates() {
        let secret = JwtSecret::from_hex(TEST_JWT_SECRET).unwrap();
        let token = mint_engine_token(&secret).unwrap();
        assert!(secret.validate(&token).is_ok());
    }

    #[tokio::test]
    async fn test_authenticated_connect_rejects_bad_url() {
        let secret = JwtSecret::from_hex(TEST_JWT_SECRET).unwrap();
        assert!(AlloyConnector
            .connect_authenticated("not a url", &secret)
            .await
            .is_err());
    }
}
