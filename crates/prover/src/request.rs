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

use crate::ProvingError;
use alloy::consensus::Header;
use alloy::primitives::{Address, Bytes, B256};
use apus_contracts::TaikoData::BlockMetadata;

/// Circuits variant reported by every proof this crate produces
pub const CIRCUITS_IDX: u64 = 0;

/// Driver-side parameters attached to a proof request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofRequestOptions {
    /// Account that will submit the proof
    pub prover_address: Address,
    /// Prover the block was assigned to when proposed
    pub assigned_prover: Address,
    pub meta_hash: B256,
    pub block_hash: B256,
    pub parent_hash: B256,
    pub graffiti: B256,
    /// Overrides the producer's proof window (seconds) when set
    pub proof_window: Option<u64>,
}

/// A block to prove, snapshotted at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRequest {
    pub block_id: u64,
    pub meta: BlockMetadata,
    pub header: Header,
    pub opts: ProofRequestOptions,
}

impl ProofRequest {
    pub fn new(
        block_id: u64,
        meta: BlockMetadata,
        header: Header,
        opts: ProofRequestOptions,
    ) -> Self {
        Self {
            block_id,
            meta,
            header,
            opts,
        }
    }

    /// Pairs this request with the outcome of proving it
    pub fn into_result(self, result: Result<ProofPayload, ProvingError>) -> ProofWithHeader {
        ProofWithHeader {
            block_id: self.block_id,
            meta: self.meta,
            header: self.header,
            opts: self.opts,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofPayload {
    pub proof: Bytes,
    /// Circuits variant that produced `proof`
    pub degree: u64,
}

/// A delivered proof, or the reason it could not be computed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofWithHeader {
    pub block_id: u64,
    pub meta: BlockMetadata,
    pub header: Header,
    pub opts: ProofRequestOptions,
    pub result: Result<ProofPayload, ProvingError>,
}

impl ProofWithHeader {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
