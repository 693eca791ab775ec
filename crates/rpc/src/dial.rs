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
use alloy::network::Ethereum;
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::transports::TransportResult;
use alloy_rpc_types_engine::JwtSecret;
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;
use tracing::{debug, warn};

/// Dials `url` until it answers `eth_chainId`, making at most `max_retries` attempts
/// spaced by `retry_interval`, and giving up at `deadline`.
pub async fn dial_with_backoff(
    connector: &dyn Connector,
    url: &str,
    retry_interval: Duration,
    max_retries: u64,
    deadline: Instant,
) -> Result<RpcClient, RpcClientError> {
    retry_dial(url, retry_interval, max_retries, deadline, move || async move {
        probe(connector.connect(url).await?).await
    })
    .await
}

/// Same as [dial_with_backoff] for an authenticated engine API endpoint.
pub async fn dial_engine_with_backoff(
    connector: &dyn Connector,
    url: &str,
    secret: &JwtSecret,
    retry_interval: Duration,
    max_retries: u64,
    deadline: Instant,
) -> Result<RpcClient, RpcClientError> {
    retry_dial(url, retry_interval, max_retries, deadline, move || async move {
        probe(connector.connect_authenticated(url, secret).await?).await
    })
    .await
}

async fn probe(client: RpcClient) -> TransportResult<RpcClient> {
    let chain_id = RootProvider::<Ethereum>::new(client.clone()).get_chain_id().await?;
    debug!("Endpoint reported chain id {chain_id}");
    Ok(client)
}

async fn retry_dial<F, Fut>(
    url: &str,
    retry_interval: Duration,
    max_retries: u64,
    deadline: Instant,
    mut attempt: F,
) -> Result<RpcClient, RpcClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TransportResult<RpcClient>>,
{
    // a zero budget still dials once
    let attempts = max_retries.max(1);
    let strategy = FixedInterval::new(retry_interval).take((attempts - 1) as usize);

    let mut count = 0u64;
    let dialing = Retry::start(strategy, || {
        count += 1;
        let current = count;
        let fut = attempt();
        async move {
            let res = fut.await;
            if let Err(err) = &res {
                warn!("Dial attempt {current}/{attempts} to {url} failed: {err}");
            }
            res
        }
    });

    match timeout_at(deadline, dialing).await {
        Ok(Ok(client)) => Ok(client),
        Ok(Err(source)) => Err(RpcClientError::DialExhausted {
            url: url.to_string(),
            attempts,
            source,
        }),
        Err(_) => Err(RpcClientError::Timeout(format!("dialing {url}"))),
    }
}
