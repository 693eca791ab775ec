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

use crate::config::ClientConfig;
use crate::error::RpcClientError;
use alloy::primitives::Address;
use std::path::PathBuf;
use std::time::Duration;

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RpcArgs {
    /// Address of the L1 rpc endpoint to use (archive node, eth namespace required)
    #[clap(long, env)]
    pub l1_rpc_url: String,
    /// Address of the L2 rpc endpoint to use (eth namespace required)
    #[clap(long, env)]
    pub l2_rpc_url: String,
    /// Address of an L2 checkpoint rpc endpoint to sync state from
    #[clap(long, env)]
    pub l2_checkpoint_url: Option<String>,
    /// Address of the Apus chain rpc endpoint to use
    #[clap(long, env)]
    pub apus_rpc_url: Option<String>,
    /// Address of the L2 engine API endpoint to use
    #[clap(long, env)]
    pub l2_engine_url: Option<String>,
    /// Path to the file holding the hex-encoded engine API JWT secret
    #[clap(long, env)]
    pub jwt_secret: Option<PathBuf>,

    /// Address of the TaikoL1 contract
    #[clap(long, env)]
    pub taiko_l1_address: Address,
    /// Address of the TaikoL2 contract
    #[clap(long, env)]
    pub taiko_l2_address: Address,
    /// Address of the TaikoToken contract
    #[clap(long, env)]
    pub taiko_token_address: Option<Address>,
    /// Address of the ApusTask contract on the Apus chain
    #[clap(long, env, default_value_t = Address::ZERO)]
    pub apus_task_address: Address,
    /// Address of the ApusMarket contract on the Apus chain
    #[clap(long, env, default_value_t = Address::ZERO)]
    pub apus_market_address: Address,

    /// Time (in seconds) between successive dial attempts
    #[clap(long, env, default_value_t = 12)]
    pub rpc_retry_interval: u64,
    /// Number of dial attempts per endpoint (default 10)
    #[clap(long, env)]
    pub rpc_max_retries: Option<u64>,
    /// Timeout (seconds) for connecting to and checking all endpoints (default 60)
    #[clap(long, env)]
    pub bootstrap_timeout: Option<u64>,
    /// Timeout (seconds) for a single rpc request (default 60)
    #[clap(long, env)]
    pub rpc_timeout: Option<u64>,
}

impl RpcArgs {
    pub fn to_config(&self) -> Result<ClientConfig, RpcClientError> {
        let jwt_secret = self
            .jwt_secret
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path).map_err(|err| {
                    RpcClientError::Config(format!(
                        "failed to read jwt secret from {}: {err}",
                        path.display()
                    ))
                })
            })
            .transpose()?;

        Ok(ClientConfig {
            l1_endpoint: self.l1_rpc_url.clone(),
            l2_endpoint: self.l2_rpc_url.clone(),
            l2_checkpoint_endpoint: self.l2_checkpoint_url.clone(),
            apus_endpoint: self.apus_rpc_url.clone(),
            l2_engine_endpoint: self.l2_engine_url.clone(),
            jwt_secret,
            taiko_l1_address: self.taiko_l1_address,
            taiko_l2_address: self.taiko_l2_address,
            taiko_token_address: self.taiko_token_address,
            apus_task_address: self.apus_task_address,
            apus_market_address: self.apus_market_address,
            retry_interval: Duration::from_secs(self.rpc_retry_interval),
            max_retries: self.rpc_max_retries,
            timeout: self.bootstrap_timeout.map(Duration::from_secs),
            rpc_timeout: self.rpc_timeout.map(Duration::from_secs),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod tests {
    use super::*;
    use clap::Parser;

    #[derive(clap::Parser, Debug)]
    struct TestCli {
        #[clap(flatten)]
        rpc: RpcArgs,
    }

    #[test]
    fn test_args_map_into_config() {
        let cli = TestCli::try_parse_from([
            "apus",
            "--l1-rpc-url",
            "http://l1:8545",
            "--l2-rpc-url",
            "ws://l2:8546",
            "--taiko-l1-address",
            "0x6375394335f34848b850114b66a49d6f47f2cda8",
            "--taiko-l2-address",
            "0x1000777700000000000000000000000000000001",
            "--rpc-max-retries",
            "3",
            "--bootstrap-timeout",
            "30",
        ])
        .unwrap();
        let config = cli.rpc.to_config().unwrap();

        assert_eq!(config.l1_endpoint, "http://l1:8545");
        assert_eq!(config.l2_endpoint, "ws://l2:8546");
        assert_eq!(config.retry_interval, Duration::from_secs(12));
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.rpc_timeout(), Duration::from_secs(60));
        assert!(config.engine_credentials().is_none());
        assert!(config.apus_endpoint().is_none());
    }

    #[test]
    fn test_missing_jwt_file_is_config_error() {
        let args = RpcArgs {
            jwt_secret: Some(PathBuf::from("/nonexistent/jwt.hex")),
            ..Default::default()
        };
        assert!(matches!(args.to_config(), Err(RpcClientError::Config(_))));
    }
}
