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

pub mod args;
pub mod dummy;
pub mod producer;
pub mod request;

pub use dummy::DummyProofProducer;
pub use producer::ProofProducer;
pub use request::{ProofPayload, ProofRequest, ProofRequestOptions, ProofWithHeader};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvingError {
    #[error("SubmissionRejected error: block {block_id} {reason}")]
    SubmissionRejected { block_id: u64, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Computation error: block {block_id} {reason}")]
    Computation { block_id: u64, reason: String },
}
