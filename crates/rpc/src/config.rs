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

use alloy::primitives::Address;
use std::time::Duration;

/// Deadline for the whole bootstrap, and for each call, when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Dial attempts per endpoint when none is configured
pub const DEFAULT_MAX_RETRIES: u64 = 10;

/// Everything needed to build a [crate::Client].
///
/// The engine client is only built when both `l2_engine_endpoint` and `jwt_secret` are given.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub l1_endpoint: String,
    pub l2_endpoint: String,
    pub l2_checkpoint_endpoint: Option<String>,
    pub apus_endpoint: Option<String>,
    pub l2_engine_endpoint: Option<String>,
    /// Hex-encoded engine API secret
    pub jwt_secret: Option<String>,

    pub taiko_l1_address: Address,
    pub taiko_l2_address: Address,
    pub taiko_token_address: Option<Address>,
    pub apus_task_address: Address,
    pub apus_market_address: Address,

    pub retry_interval: Duration,
    pub max_retries: Option<u64>,
    /// Deadline shared by every bootstrap step
    pub timeout: Option<Duration>,
    /// Deadline of each individual call
    pub rpc_timeout: Option<Duration>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ClientConfig {
    pub fn max_retries(&self) -> u64 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn rpc_timeout(&self) -> Duration {
        self.rpc_timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn l2_checkpoint_endpoint(&self) -> Option<&str> {
        non_empty(&self.l2_checkpoint_endpoint)
    }

    pub fn apus_endpoint(&self) -> Option<&str> {
        non_empty(&self.apus_endpoint)
    }

    /// Engine url and secret, if both are present
    pub fn engine_credentials(&self) -> Option<(&str, &str)> {
        non_empty(&self.l2_engine_endpoint).zip(non_empty(&self.jwt_secret))
    }

    /// Token contract address, unless unset or zero
    pub fn taiko_token_address(&self) -> Option<Address> {
        self.taiko_token_address.filter(|address| !address.is_zero())
    }
}
