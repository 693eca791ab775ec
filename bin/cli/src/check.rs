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

use anyhow::Context;
use apus_rpc::args::RpcArgs;
use apus_rpc::{AlloyConnector, Client};
use std::sync::Arc;
use tracing::info;

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    #[clap(flatten)]
    pub rpc: RpcArgs,
}

pub async fn check(args: CheckArgs) -> anyhow::Result<()> {
    let config = args.rpc.to_config()?;
    let client = Client::new(Arc::new(AlloyConnector), &config)
        .await
        .context("Client::new")?;

    info!(
        "L1 chain {} ({}), L2 chain {} ({})",
        client.l1_chain_id,
        client.l1.url(),
        client.l2_chain_id,
        client.l2.url()
    );

    let state = client
        .l1
        .timed(client.taiko_l1.getStateVariables().call())
        .await?;
    info!(
        "TaikoL1 {}: genesis height {}, {} blocks, last verified block {}",
        client.taiko_l1.address(),
        client.genesis_height,
        state.numBlocks,
        state.lastVerifiedBlockId
    );
    let synced_l1_height = client
        .l2
        .timed(client.taiko_l2.latestSyncedL1Height().call())
        .await?;
    info!(
        "TaikoL2 {}: synced up to L1 block {synced_l1_height}",
        client.taiko_l2.address()
    );

    match &client.taiko_token {
        Some(token) => {
            let supply = client.l1.timed(token.totalSupply().call()).await?;
            info!("TaikoToken {}: total supply {supply}", token.address());
        }
        None => info!("TaikoToken not configured"),
    }

    match &client.l2_engine {
        Some(engine) => {
            let chain_id = engine.chain_id().await?;
            info!("L2 engine ({}) reports chain {chain_id}", engine.url());
        }
        None => info!("L2 engine not configured"),
    }

    match &client.l2_checkpoint {
        Some(checkpoint) => {
            let head = checkpoint.block_number().await?;
            info!("L2 checkpoint ({}) at block {head}", checkpoint.url());
        }
        None => info!("L2 checkpoint not configured"),
    }

    match &client.apus {
        Some(apus) => {
            let tasks = apus.client.timed(apus.task.getTaskCount().call()).await?;
            let provers = apus
                .client
                .timed(apus.market.getProverCount().call())
                .await?;
            info!(
                "Apus chain {} ({}): {tasks} tasks, {provers} provers",
                apus.chain_id,
                apus.client.url()
            );
        }
        None => info!("Apus chain not configured"),
    }

    Ok(())
}
