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

use crate::error::RpcClientError;
use crate::timeout::with_call_timeout;
use alloy::eips::BlockNumberOrTag;
use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::Block;
use async_trait::async_trait;
use std::future::IntoFuture;
use std::time::Duration;

/// A connection to one endpoint under a per-call timeout.
///
/// The timeout is enforced by the transport, so contract handles and [Provider] calls made
/// through this client are bounded as well.
#[derive(Debug, Clone)]
pub struct EndpointClient {
    /// Url this client was dialed from
    url: String,
    /// Inner provider.
    inner: RootProvider,
    /// Upper bound for each call
    timeout: Duration,
}

impl EndpointClient {
    pub fn new(url: impl Into<String>, client: RpcClient, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            inner: RootProvider::new(with_call_timeout(client, timeout)),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn provider(&self) -> &RootProvider {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Awaits `call` under this client's timeout, tagging failures with the endpoint url.
    pub async fn timed<F, T, E>(&self, call: F) -> Result<T, RpcClientError>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        match tokio::time::timeout(self.timeout, call.into_future()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(RpcClientError::call(&self.url, err)),
            Err(_) => Err(RpcClientError::CallTimeout {
                url: self.url.clone(),
                timeout: self.timeout,
            }),
        }
    }

    pub async fn chain_id(&self) -> Result<u64, RpcClientError> {
        self.timed(self.inner.get_chain_id()).await
    }

    pub async fn block_number(&self) -> Result<u64, RpcClientError> {
        self.timed(self.inner.get_block_number()).await
    }

    pub async fn block_by_number(
        &self,
        number: BlockNumberOrTag,
    ) -> Result<Option<Block>, RpcClientError> {
        self.timed(self.inner.get_block_by_number(number)).await
    }

    pub async fn balance_at(
        &self,
        address: Address,
        block_number: u64,
    ) -> Result<U256, RpcClientError> {
        self.timed(self.inner.get_balance(address).number(block_number))
            .await
    }
}

#[async_trait]
impl Provider<Ethereum> for EndpointClient {
    fn root(&self) -> &RootProvider<Ethereum> {
        &self.inner
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod tests {
    use super::*;
    use alloy::primitives::U64;
    use alloy::transports::mock::Asserter;

    #[tokio::test]
    async fn test_timed_tags_failures_with_url() {
        let asserter = Asserter::new();
        asserter.push_success(&U64::from(17000));
        asserter.push_failure_msg("header not found");
        let client = EndpointClient::new(
            "http://l1.invalid:8545",
            RpcClient::mocked(asserter),
            Duration::from_secs(5),
        );

        assert_eq!(client.chain_id().await.unwrap(), 17000);
        let err = client.block_number().await.unwrap_err();
        assert!(matches!(err, RpcClientError::Call { url, .. } if url == "http://l1.invalid:8545"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_enforces_timeout() {
        let client = EndpointClient::new(
            "http://l2.invalid:8545",
            RpcClient::mocked(Asserter::new()),
            Duration::from_millis(250),
        );
        let stalled = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, std::io::Error>(())
        };

        let err = client.timed(stalled).await.unwrap_err();
        assert!(matches!(
            err,
            RpcClientError::CallTimeout { timeout, .. } if timeout == Duration::from_millis(250)
        ));
    }
}
