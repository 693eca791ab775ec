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

use crate::endpoint::EndpointClient;
use alloy::primitives::Address;
use tracing::{debug, warn};

/// Returns whether `client` still serves state as of `genesis_height`.
///
/// Any failure of the historical query, pruned state included, counts as `false`.
pub async fn is_archive_node(client: &EndpointClient, genesis_height: u64) -> bool {
    match client.balance_at(Address::ZERO, genesis_height).await {
        Ok(balance) => {
            debug!(
                "Node ({}) served historical balance {balance} at block {genesis_height}",
                client.url()
            );
            true
        }
        Err(err) => {
            warn!(
                "Node ({}) failed historical state query at block {genesis_height}: {err}",
                client.url()
            );
            false
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod tests {
    use super::*;
    use alloy::primitives::U256;
    use alloy::rpc::client::RpcClient;
    use alloy::transports::mock::Asserter;
    use std::time::Duration;

    fn mocked_client(asserter: Asserter) -> EndpointClient {
        EndpointClient::new(
            "http://l1.invalid:8545",
            RpcClient::mocked(asserter),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_archive_node_detected() {
        let asserter = Asserter::new();
        asserter.push_success(&U256::from(1_000_000u64));
        assert!(is_archive_node(&mocked_client(asserter), 1).await);
    }

    #[tokio::test]
    async fn test_pruned_node_detected() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("missing trie node 0x1b3c (path ) state is not available");
        assert!(!is_archive_node(&mocked_client(asserter), 1).await);
    }

    #[tokio::test]
    async fn test_any_probe_failure_is_negative() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("internal error");
        assert!(!is_archive_node(&mocked_client(asserter), 18_000_000).await);
    }
}
