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

//! Typed bindings for the protocol contracts the client talks to.
//!
//! Only the view functions and events consumed off-chain are declared.

use alloy::sol;

sol!(
    #[sol(all_derives)]
    library TaikoData {
        /// Metadata of a proposed L2 block as recorded by TaikoL1.
        struct BlockMetadata {
            uint64 id;
            uint64 timestamp;
            uint64 l1Height;
            bytes32 l1Hash;
            bytes32 mixHash;
            bytes32 txListHash;
            uint24 txListByteStart;
            uint24 txListByteEnd;
            uint32 gasLimit;
            address proposer;
            address treasury;
        }
    }
);

sol!(
    #[sol(rpc, all_derives)]
    interface TaikoL1 {
        struct StateVariables {
            uint64 blockFee;
            uint64 accBlockFees;
            uint64 genesisHeight;
            uint64 genesisTimestamp;
            uint64 numBlocks;
            uint64 proofTimeIssued;
            uint64 proofTimeTarget;
            uint64 lastVerifiedBlockId;
            uint64 accProposedAt;
            uint64 nextEthDepositToProcess;
            uint64 numEthDeposits;
        }

        event BlockVerified(
            uint256 indexed blockId,
            bytes32 blockHash,
            address prover,
            uint64 blockFee,
            uint64 proofReward
        );

        function getStateVariables() external view returns (StateVariables memory);

        function getCrossChainBlockHash(uint64 blockId) external view returns (bytes32);
    }
);

sol!(
    #[sol(rpc, all_derives)]
    interface TaikoL2 {
        function publicInputHash() external view returns (bytes32);

        function latestSyncedL1Height() external view returns (uint64);

        function getBlockHash(uint64 number) external view returns (bytes32);
    }
);

sol!(
    #[sol(rpc, all_derives)]
    interface TaikoToken {
        function balanceOf(address account) external view returns (uint256);

        function totalSupply() external view returns (uint256);
    }
);

sol!(
    #[sol(rpc, all_derives)]
    interface ApusTask {
        function getTaskCount() external view returns (uint256);

        function getTaskStatus(uint256 taskId) external view returns (uint8);
    }
);

sol!(
    #[sol(rpc, all_derives)]
    interface ApusMarket {
        function getAssignedProver(uint64 blockId) external view returns (address);

        function getProverCount() external view returns (uint256);
    }
);
