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

use alloy::primitives::B256;
use alloy::transports::TransportError;
use std::time::Duration;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum RpcClientError {
    #[error("DialExhausted error: failed to dial {url} after {attempts} attempts: {source}")]
    DialExhausted {
        url: String,
        attempts: u64,
        #[source]
        source: TransportError,
    },

    #[error("Timeout error: deadline exceeded while {0}")]
    Timeout(String),

    #[error("ArchiveRequired error: node ({url}) must be archive node")]
    ArchiveRequired { url: String },

    #[error("GenesisMismatch error: genesis header hash mismatch, node: {node}, TaikoL1 contract: {contract}")]
    GenesisMismatch { node: B256, contract: B256 },

    #[error("GenesisMissing error: node ({url}) did not return its genesis block")]
    GenesisMissing { url: String },

    #[error("Binding error: {contract}: {reason}")]
    Binding {
        contract: &'static str,
        reason: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Call error: request to {url} failed: {source}")]
    Call {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("CallTimeout error: request to {url} exceeded {timeout:?}")]
    CallTimeout { url: String, timeout: Duration },
}

impl RpcClientError {
    pub fn call(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Call {
            url: url.into(),
            source: source.into(),
        }
    }
}
