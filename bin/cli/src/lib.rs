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

pub mod check;
pub mod simulate;

#[derive(clap::Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Connect to all configured endpoints and report what was found
    Check(check::CheckArgs),
    /// Request dummy proofs for the latest L2 blocks and wait for them
    Simulate(simulate::SimulateArgs),
}
