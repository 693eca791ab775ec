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

pub mod archive;
pub mod args;
pub mod client;
pub mod config;
pub mod connector;
pub mod dial;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod timeout;

pub use client::{ApusChain, Client};
pub use config::ClientConfig;
pub use connector::{AlloyConnector, Connector};
pub use endpoint::EndpointClient;
pub use engine::EngineClient;
pub use error::RpcClientError;

#[macro_export]
macro_rules! await_tel {
    ($c:ident, $e:expr) => {
        opentelemetry::trace::FutureExt::with_context($e, $c.clone()).await
    };
    ($c:ident, $t:ident, $l:literal, $e:expr) => {
        opentelemetry::trace::FutureExt::with_context(
            $e,
            <opentelemetry::Context as opentelemetry::trace::TraceContextExt>::current_with_span(
                opentelemetry::trace::Tracer::start_with_context(&$t, $l, &$c),
            ),
        )
        .await
    };
}
