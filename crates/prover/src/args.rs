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

use crate::dummy::DummyProofProducer;
use crate::ProvingError;
use alloy::primitives::Address;
use std::time::Duration;

#[derive(clap::Args, Debug, Clone, Default)]
pub struct DummyProofArgs {
    /// Lower bound (seconds) of the random delay before a dummy proof is delivered
    #[clap(long, env)]
    pub dummy_proof_delay_lower_bound: Option<u64>,
    /// Upper bound (seconds) of the random delay before a dummy proof is delivered
    #[clap(long, env)]
    pub dummy_proof_delay_upper_bound: Option<u64>,
    /// Time (seconds) the oracle prover waits after the proof window before submitting
    #[clap(long, env, default_value_t = 0)]
    pub oracle_proof_submission_delay: u64,
    /// Address of the oracle prover
    #[clap(long, env, default_value_t = Address::ZERO)]
    pub oracle_prover_address: Address,
    /// Time (seconds) after a block's timestamp reserved for its assigned prover
    #[clap(long, env, default_value_t = 0)]
    pub proof_window: u64,
}

impl DummyProofArgs {
    pub fn to_producer(&self) -> Result<DummyProofProducer, ProvingError> {
        DummyProofProducer::new(
            self.dummy_proof_delay_lower_bound.map(Duration::from_secs),
            self.dummy_proof_delay_upper_bound.map(Duration::from_secs),
            Duration::from_secs(self.oracle_proof_submission_delay),
            self.oracle_prover_address,
            self.proof_window,
        )
    }
}
