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

use crate::request::{ProofRequest, ProofWithHeader};
use crate::ProvingError;
use async_channel::Sender;
use async_trait::async_trait;

/// A backend that proves blocks in the background.
///
/// A successful [ProofProducer::request_proof] call only means the request was accepted. The
/// result, including any computation failure, is delivered later through `result_tx`, at most
/// once per request and in no particular order relative to other requests.
#[async_trait]
pub trait ProofProducer: Send + Sync {
    /// Schedules `request` without waiting for it to be proven.
    ///
    /// An error means the request was rejected and nothing will be sent on `result_tx`.
    async fn request_proof(
        &self,
        request: ProofRequest,
        result_tx: Sender<ProofWithHeader>,
    ) -> Result<(), ProvingError>;

    /// Suppresses delivery of any outstanding requests for `block_id`.
    ///
    /// Unknown or already delivered ids are not an error.
    async fn cancel(&self, block_id: u64) -> Result<(), ProvingError>;
}
