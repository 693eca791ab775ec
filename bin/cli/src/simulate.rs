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

use alloy::eips::{BlockId, BlockNumberOrTag};
use alloy::primitives::Address;
use anyhow::Context;
use apus_contracts::TaikoData::BlockMetadata;
use apus_prover::args::DummyProofArgs;
use apus_prover::{ProofProducer, ProofRequest, ProofRequestOptions};
use apus_rpc::args::RpcArgs;
use apus_rpc::{AlloyConnector, Client};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(clap::Args, Debug, Clone)]
pub struct SimulateArgs {
    #[clap(flatten)]
    pub rpc: RpcArgs,
    #[clap(flatten)]
    pub dummy: DummyProofArgs,

    /// Number of most recent L2 blocks to request proofs for
    #[clap(long, env, default_value_t = 4)]
    pub block_count: u64,
    /// Address recorded as prover and assigned prover of every request
    #[clap(long, env, default_value_t = Address::ZERO)]
    pub prover_address: Address,
}

pub async fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = args.rpc.to_config()?;
    let client = Client::new(Arc::new(AlloyConnector), &config)
        .await
        .context("Client::new")?;
    let producer = args.dummy.to_producer()?;

    let latest = client.l2.block_number().await?;
    let first = latest
        .saturating_sub(args.block_count.saturating_sub(1))
        .max(1);
    info!("Requesting dummy proofs for L2 blocks {first}..={latest}");

    let (result_tx, result_rx) = async_channel::unbounded();
    let mut outstanding = 0u64;
    for number in first..=latest {
        let Some(block) = client
            .l2
            .block_by_number(BlockNumberOrTag::Number(number))
            .await?
        else {
            warn!("L2 block {number} not found");
            continue;
        };
        let l1_height = match client
            .l2
            .timed(
                client
                    .taiko_l2
                    .latestSyncedL1Height()
                    .block(BlockId::number(number))
                    .call(),
            )
            .await
        {
            Ok(height) => height,
            Err(err) => {
                warn!("Failed to read synced L1 height at L2 block {number}: {err}");
                0
            }
        };

        let header = block.header.inner;
        let meta = BlockMetadata {
            id: number,
            timestamp: header.timestamp,
            l1Height: l1_height,
            mixHash: header.mix_hash,
            gasLimit: u32::try_from(header.gas_limit).unwrap_or(u32::MAX),
            proposer: header.beneficiary,
            ..Default::default()
        };
        let opts = ProofRequestOptions {
            prover_address: args.prover_address,
            assigned_prover: args.prover_address,
            block_hash: block.header.hash,
            parent_hash: header.parent_hash,
            ..Default::default()
        };
        producer
            .request_proof(ProofRequest::new(number, meta, header, opts), result_tx.clone())
            .await?;
        outstanding += 1;
    }
    drop(result_tx);

    while outstanding > 0 {
        let proof = result_rx
            .recv()
            .await
            .context("proof result channel closed")?;
        match &proof.result {
            Ok(payload) => info!(
                "Received proof for L2 block {} ({} bytes, degree {})",
                proof.block_id,
                payload.proof.len(),
                payload.degree
            ),
            Err(err) => error!("Proof for L2 block {} failed: {err}", proof.block_id),
        }
        outstanding -= 1;
    }
    info!("All requested proofs delivered");

    Ok(())
}
