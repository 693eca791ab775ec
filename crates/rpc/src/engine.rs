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

use crate::connector::Connector;
use crate::error::RpcClientError;
use alloy::primitives::U64;
use alloy::rpc::client::RpcClient;
use alloy::rpc::json_rpc::{RpcRecv, RpcSend};
use alloy_rpc_types_engine::JwtSecret;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Client for an engine API endpoint guarded by a shared JWT secret.
///
/// Engine tokens are only accepted for a short window around their issuance time, so a fresh
/// authenticated transport is opened for every request.
#[derive(Clone)]
pub struct EngineClient {
    url: String,
    secret: JwtSecret,
    timeout: Duration,
    connector: Arc<dyn Connector>,
}

impl Debug for EngineClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineClient")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl EngineClient {
    pub fn new(
        url: impl Into<String>,
        secret: JwtSecret,
        timeout: Duration,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            url: url.into(),
            secret,
            timeout,
            connector,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Opens a transport carrying a newly minted token
    pub async fn client(&self) -> Result<RpcClient, RpcClientError> {
        self.connector
            .connect_authenticated(&self.url, &self.secret)
            .await
            .map_err(|err| RpcClientError::call(&self.url, err))
    }

    pub async fn request<P: RpcSend, R: RpcRecv>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<R, RpcClientError> {
        let client = self.client().await?;
        match tokio::time::timeout(self.timeout, client.request(method, params)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(RpcClientError::call(&self.url, err)),
            Err(_) => Err(RpcClientError::CallTimeout {
                url: self.url.clone(),
                timeout: self.timeout,
            }),
        }
    }

    pub async fn chain_id(&self) -> Result<u64, RpcClientError> {
        let chain_id: U64 = self.request("eth_chainId", ()).await?;
        Ok(chain_id.to())
    }

    /// Exchanges the list of supported engine API methods with the execution client
    pub async fn exchange_capabilities(
        &self,
        capabilities: Vec<String>,
    ) -> Result<Vec<String>, RpcClientError> {
        self.request("engine_exchangeCapabilities", (capabilities,))
            .await
    }
}
