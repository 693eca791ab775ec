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

use crate::archive::is_archive_node;
use crate::await_tel;
use crate::config::ClientConfig;
use crate::connector::Connector;
use crate::dial::{dial_engine_with_backoff, dial_with_backoff};
use crate::endpoint::EndpointClient;
use crate::engine::EngineClient;
use crate::error::RpcClientError;
use crate::timeout::with_call_timeout;
use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256, U64};
use alloy::providers::Provider;
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;
use alloy_rpc_types_engine::JwtSecret;
use apus_contracts::ApusMarket::ApusMarketInstance;
use apus_contracts::ApusTask::ApusTaskInstance;
use apus_contracts::TaikoL1::TaikoL1Instance;
use apus_contracts::TaikoL2::TaikoL2Instance;
use apus_contracts::TaikoToken::TaikoTokenInstance;
use apus_contracts::{ApusMarket, ApusTask, TaikoL1, TaikoL2, TaikoToken};
use opentelemetry::global::tracer;
use opentelemetry::trace::{TraceContextExt, Tracer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Clients and protocol contracts of the Apus chain
#[derive(Debug, Clone)]
pub struct ApusChain {
    pub client: EndpointClient,
    pub raw: RpcClient,
    pub task: ApusTaskInstance<EndpointClient>,
    pub market: ApusMarketInstance<EndpointClient>,
    pub chain_id: u64,
}

/// All the L1, L2 and Apus chain handles a driver or prover needs
#[derive(Debug, Clone)]
pub struct Client {
    pub l1: EndpointClient,
    pub l2: EndpointClient,
    pub l2_checkpoint: Option<EndpointClient>,
    pub l1_raw: RpcClient,
    pub l2_raw: RpcClient,
    pub l2_engine: Option<EngineClient>,
    pub taiko_l1: TaikoL1Instance<EndpointClient>,
    pub taiko_l2: TaikoL2Instance<EndpointClient>,
    pub taiko_token: Option<TaikoTokenInstance<EndpointClient>>,
    pub apus: Option<ApusChain>,
    pub l1_chain_id: u64,
    pub l2_chain_id: u64,
    /// L1 height at which the rollup was deployed
    pub genesis_height: u64,
}

impl Client {
    /// Dials all configured endpoints and checks that they are fit for the driver.
    ///
    /// Fails without returning any handle if an endpoint cannot be dialed, the L1 node is
    /// not an archive node, or the L2 node disagrees with TaikoL1 on the genesis block.
    pub async fn new(
        connector: Arc<dyn Connector>,
        config: &ClientConfig,
    ) -> Result<Self, RpcClientError> {
        let tracer = tracer("apus");
        let context = opentelemetry::Context::current_with_span(tracer.start("Client::new"));

        let timeout = config.timeout();
        let deadline = Instant::now() + timeout;
        match await_tel!(
            context,
            tracer,
            "Client::build",
            tokio::time::timeout_at(deadline, Self::build(connector, config, deadline))
        ) {
            Ok(result) => result,
            Err(_) => Err(RpcClientError::Timeout(format!(
                "building rpc clients within {timeout:?}"
            ))),
        }
    }

    async fn build(
        connector: Arc<dyn Connector>,
        config: &ClientConfig,
        deadline: Instant,
    ) -> Result<Self, RpcClientError> {
        let retry_interval = config.retry_interval;
        let max_retries = config.max_retries();
        let rpc_timeout = config.rpc_timeout();

        // Dial required endpoints first
        let l1 = EndpointClient::new(
            &config.l1_endpoint,
            dial_with_backoff(
                connector.as_ref(),
                &config.l1_endpoint,
                retry_interval,
                max_retries,
                deadline,
            )
            .await?,
            rpc_timeout,
        );
        let l2 = EndpointClient::new(
            &config.l2_endpoint,
            dial_with_backoff(
                connector.as_ref(),
                &config.l2_endpoint,
                retry_interval,
                max_retries,
                deadline,
            )
            .await?,
            rpc_timeout,
        );
        let apus = match config.apus_endpoint() {
            Some(url) => Some(EndpointClient::new(
                url,
                dial_with_backoff(
                    connector.as_ref(),
                    url,
                    retry_interval,
                    max_retries,
                    deadline,
                )
                .await?,
                rpc_timeout,
            )),
            None => None,
        };
        info!("Connected to L1 ({}) and L2 ({})", l1.url(), l2.url());

        // Bind protocol contracts
        let taiko_l1 = TaikoL1::new(
            require_address("TaikoL1", config.taiko_l1_address)?,
            l1.clone(),
        );
        let taiko_l2 = TaikoL2::new(
            require_address("TaikoL2", config.taiko_l2_address)?,
            l2.clone(),
        );
        let taiko_token = config
            .taiko_token_address()
            .map(|address| TaikoToken::new(address, l1.clone()));
        let apus_contracts = match &apus {
            Some(client) => Some((
                ApusTask::new(
                    require_address("ApusTask", config.apus_task_address)?,
                    client.clone(),
                ),
                ApusMarket::new(
                    require_address("ApusMarket", config.apus_market_address)?,
                    client.clone(),
                ),
            )),
            None => None,
        };

        // The driver replays L1 from the rollup genesis onwards
        let state_vars = l1.timed(taiko_l1.getStateVariables().call()).await?;
        let genesis_height = state_vars.genesisHeight;
        info!("TaikoL1 genesis height: {genesis_height}");
        if !is_archive_node(&l1, genesis_height).await {
            return Err(RpcClientError::ArchiveRequired {
                url: config.l1_endpoint.clone(),
            });
        }

        // Raw handles and chain ids
        let l1_raw = open_raw(connector.as_ref(), &config.l1_endpoint, rpc_timeout).await?;
        let l2_raw = open_raw(connector.as_ref(), &config.l2_endpoint, rpc_timeout).await?;
        let l1_chain_id = raw_chain_id(&l1, &l1_raw).await?;
        let l2_chain_id = raw_chain_id(&l2, &l2_raw).await?;
        info!("L1 chain id: {l1_chain_id}, L2 chain id: {l2_chain_id}");

        let apus = match (apus, apus_contracts) {
            (Some(client), Some((task, market))) => {
                let raw = open_raw(connector.as_ref(), client.url(), rpc_timeout).await?;
                let chain_id = raw_chain_id(&client, &raw).await?;
                info!("Connected to Apus chain {chain_id} ({})", client.url());
                Some(ApusChain {
                    client,
                    raw,
                    task,
                    market,
                    chain_id,
                })
            }
            _ => None,
        };

        let l2_engine = match config.engine_credentials() {
            Some((url, secret)) => {
                let secret = JwtSecret::from_hex(secret).map_err(|err| {
                    RpcClientError::Config(format!("invalid engine jwt secret: {err}"))
                })?;
                dial_engine_with_backoff(
                    connector.as_ref(),
                    url,
                    &secret,
                    retry_interval,
                    max_retries,
                    deadline,
                )
                .await?;
                info!("Connected to L2 engine ({url})");
                Some(EngineClient::new(
                    url,
                    secret,
                    rpc_timeout,
                    connector.clone(),
                ))
            }
            None => None,
        };

        let l2_checkpoint = match config.l2_checkpoint_endpoint() {
            Some(url) => {
                let client = dial_with_backoff(
                    connector.as_ref(),
                    url,
                    retry_interval,
                    max_retries,
                    deadline,
                )
                .await?;
                info!("Connected to L2 checkpoint ({url})");
                Some(EndpointClient::new(url, client, rpc_timeout))
            }
            None => None,
        };

        let client = Self {
            l1,
            l2,
            l2_checkpoint,
            l1_raw,
            l2_raw,
            l2_engine,
            taiko_l1,
            taiko_l2,
            taiko_token,
            apus,
            l1_chain_id,
            l2_chain_id,
            genesis_height,
        };
        client.ensure_genesis_matched().await?;

        Ok(client)
    }

    /// Checks that the genesis block hash recorded by TaikoL1 is the L2 node's genesis hash
    pub async fn ensure_genesis_matched(&self) -> Result<(), RpcClientError> {
        let filter = Filter::new()
            .address(*self.taiko_l1.address())
            .event_signature(TaikoL1::BlockVerified::SIGNATURE_HASH)
            .topic1(B256::ZERO)
            .from_block(self.genesis_height)
            .to_block(self.genesis_height);
        let logs = self.l1.timed(self.l1.get_logs(&filter)).await?;

        let Some(log) = logs.first() else {
            warn!(
                "Genesis block not found in TaikoL1 at height {}",
                self.genesis_height
            );
            return Ok(());
        };
        let contract_genesis = log
            .log_decode::<TaikoL1::BlockVerified>()
            .map_err(|err| RpcClientError::call(self.l1.url(), err))?
            .inner
            .data
            .blockHash;

        let node_genesis = self
            .l2
            .block_by_number(BlockNumberOrTag::Number(0))
            .await?
            .ok_or_else(|| RpcClientError::GenesisMissing {
                url: self.l2.url().to_string(),
            })?
            .header
            .hash;

        if node_genesis != contract_genesis {
            return Err(RpcClientError::GenesisMismatch {
                node: node_genesis,
                contract: contract_genesis,
            });
        }
        info!("Genesis block {node_genesis} matched");
        Ok(())
    }
}

fn require_address(contract: &'static str, address: Address) -> Result<Address, RpcClientError> {
    if address.is_zero() {
        return Err(RpcClientError::Binding {
            contract,
            reason: "contract address must be set".to_string(),
        });
    }
    Ok(address)
}

async fn open_raw(
    connector: &dyn Connector,
    url: &str,
    timeout: Duration,
) -> Result<RpcClient, RpcClientError> {
    let client = connector
        .connect(url)
        .await
        .map_err(|err| RpcClientError::call(url, err))?;
    Ok(with_call_timeout(client, timeout))
}

async fn raw_chain_id(client: &EndpointClient, raw: &RpcClient) -> Result<u64, RpcClientError> {
    let chain_id: U64 = client
        .timed(raw.request_noparams("eth_chainId"))
        .await?;
    Ok(chain_id.to())
}
