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

use crate::producer::ProofProducer;
use crate::request::{ProofPayload, ProofRequest, ProofWithHeader, CIRCUITS_IDX};
use crate::ProvingError;
use alloy::primitives::{Address, Bytes};
use async_channel::Sender;
use async_trait::async_trait;
use rand::Rng;
use spin::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Length of the placeholder proof
pub const DUMMY_PROOF_LEN: usize = 100;

#[derive(Debug, Default)]
struct PendingProofs {
    next_ticket: u64,
    /// Deliveries per block id, keyed by ticket, until their send has returned
    tasks: HashMap<u64, HashMap<u64, JoinHandle<()>>>,
}

impl PendingProofs {
    fn release(&mut self, block_id: u64, ticket: u64) {
        let Some(tickets) = self.tasks.get_mut(&block_id) else {
            return;
        };
        tickets.remove(&ticket);
        if tickets.is_empty() {
            self.tasks.remove(&block_id);
        }
    }
}

/// Delivers placeholder proofs after a simulated proving delay.
#[derive(Debug)]
pub struct DummyProofProducer {
    random_delay_lower_bound: Option<Duration>,
    random_delay_upper_bound: Option<Duration>,
    oracle_submission_delay: Duration,
    oracle_prover_address: Address,
    /// Seconds after a block's timestamp during which only its assigned prover may submit
    proof_window: u64,
    pending: Arc<Mutex<PendingProofs>>,
}

impl DummyProofProducer {
    pub fn new(
        random_delay_lower_bound: Option<Duration>,
        random_delay_upper_bound: Option<Duration>,
        oracle_submission_delay: Duration,
        oracle_prover_address: Address,
        proof_window: u64,
    ) -> Result<Self, ProvingError> {
        if let (Some(lower), Some(upper)) = (random_delay_lower_bound, random_delay_upper_bound) {
            if upper < lower {
                return Err(ProvingError::Config(format!(
                    "random proof delay upper bound {upper:?} is below lower bound {lower:?}"
                )));
            }
        }
        Ok(Self {
            random_delay_lower_bound,
            random_delay_upper_bound,
            oracle_submission_delay,
            oracle_prover_address,
            proof_window,
            pending: Default::default(),
        })
    }

    /// Number of deliveries that have not been written yet
    pub fn pending(&self) -> usize {
        self.pending.lock().tasks.values().map(HashMap::len).sum()
    }

    fn random_delay(&self) -> Duration {
        let (Some(lower), Some(upper)) =
            (self.random_delay_lower_bound, self.random_delay_upper_bound)
        else {
            return Duration::ZERO;
        };
        if upper.is_zero() {
            return Duration::ZERO;
        }
        let lower = lower.as_millis() as u64;
        let upper = upper.as_millis() as u64;
        let delay = Duration::from_millis(rand::thread_rng().gen_range(lower..=upper));
        info!("Random dummy proof delay: {delay:?}");
        delay
    }

    fn schedule(&self, request: ProofRequest, result_tx: Sender<ProofWithHeader>, delay: Duration) {
        let block_id = request.block_id;
        let pending = self.pending.clone();
        let mut table = self.pending.lock();
        let ticket = table.next_ticket;
        table.next_ticket += 1;

        // The ticket is held until the send returns, including while it waits on a full channel
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let payload = ProofPayload {
                proof: Bytes::from(vec![0xff; DUMMY_PROOF_LEN]),
                degree: CIRCUITS_IDX,
            };
            if let Err(err) = result_tx.send(request.into_result(Ok(payload))).await {
                warn!("Failed to deliver dummy proof for block {block_id}: {err}");
            }
            pending.lock().release(block_id, ticket);
        });
        table
            .tasks
            .entry(block_id)
            .or_default()
            .insert(ticket, task);
    }
}

/// Seconds left until the oracle may submit, i.e. until `header_time + window + oracle_delay`.
pub fn oracle_submission_delay(
    now: u64,
    header_time: u64,
    window: u64,
    oracle_delay: Duration,
) -> Duration {
    let deadline = header_time as i128 + window as i128 + oracle_delay.as_secs() as i128;
    let remaining = deadline - now as i128;
    if remaining <= 0 {
        Duration::ZERO
    } else {
        Duration::from_secs(u64::try_from(remaining).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl ProofProducer for DummyProofProducer {
    async fn request_proof(
        &self,
        request: ProofRequest,
        result_tx: Sender<ProofWithHeader>,
    ) -> Result<(), ProvingError> {
        let block_id = request.block_id;
        if result_tx.is_closed() {
            return Err(ProvingError::SubmissionRejected {
                block_id,
                reason: "result channel is closed".to_string(),
            });
        }
        info!(
            "Request dummy proof for block {block_id} (proposer {}, height {}, hash {})",
            request.meta.proposer,
            request.header.number,
            request.header.hash_slow()
        );

        let assigned_prover = request.opts.assigned_prover;
        let delay = if assigned_prover != self.oracle_prover_address
            && !self.oracle_submission_delay.is_zero()
        {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default();
            let window = request.opts.proof_window.unwrap_or(self.proof_window);
            let delay = oracle_submission_delay(
                now,
                request.header.timestamp,
                window,
                self.oracle_submission_delay,
            );
            info!(
                "Oracle proof submission delay for block {block_id} (proposer {}, assigned prover {assigned_prover}): {delay:?}",
                request.meta.proposer
            );
            delay
        } else {
            self.random_delay()
        };

        self.schedule(request, result_tx, delay);
        Ok(())
    }

    async fn cancel(&self, block_id: u64) -> Result<(), ProvingError> {
        let cancelled = self.pending.lock().tasks.remove(&block_id);
        match cancelled {
            Some(tasks) => {
                let count = tasks.len();
                for task in tasks.values() {
                    task.abort();
                }
                // No delivery can happen once the aborted tasks have stopped
                for task in tasks.into_values() {
                    let _ = task.await;
                }
                info!("Cancelled {count} dummy proof(s) for block {block_id}");
            }
            None => debug!("No pending dummy proof for block {block_id}"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod tests {
    use super::*;
    use crate::request::ProofRequestOptions;
    use alloy::consensus::Header;
    use alloy::primitives::{address, b256};
    use apus_contracts::TaikoData::BlockMetadata;
    use async_channel::{bounded, unbounded, TryRecvError};
    use tokio::time::Instant;

    const ORACLE: Address = address!("0x1000777700000000000000000000000000000001");
    const PROVER: Address = address!("0x70997970c51812dc3a010c7d01b50e0d17dc79c8");

    fn unix_now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn request(block_id: u64, timestamp: u64, assigned_prover: Address) -> ProofRequest {
        let meta = BlockMetadata {
            id: block_id,
            timestamp,
            l1Height: 4_000_000 + block_id,
            proposer: PROVER,
            gasLimit: 30_000_000,
            ..Default::default()
        };
        let header = Header {
            number: block_id,
            timestamp,
            gas_limit: 30_000_000,
            ..Default::default()
        };
        let opts = ProofRequestOptions {
            prover_address: PROVER,
            assigned_prover,
            ..Default::default()
        };
        ProofRequest::new(block_id, meta, header, opts)
    }

    fn producer(
        lower: Option<u64>,
        upper: Option<u64>,
        oracle_delay: u64,
        window: u64,
    ) -> DummyProofProducer {
        DummyProofProducer::new(
            lower.map(Duration::from_secs),
            upper.map(Duration::from_secs),
            Duration::from_secs(oracle_delay),
            ORACLE,
            window,
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_bounds_delay_delivery() {
        let producer = producer(Some(2), Some(2), 0, 0);
        let (tx, rx) = unbounded();
        let start = Instant::now();

        producer
            .request_proof(request(7, unix_now(), PROVER), tx)
            .await
            .unwrap();
        assert_eq!(producer.pending(), 1);

        let result = rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(result.block_id, 7);
        assert_eq!(producer.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unset_bounds_deliver_immediately() {
        let (tx, rx) = unbounded();
        let start = Instant::now();
        for producer in [producer(None, Some(5), 0, 0), producer(Some(0), Some(0), 0, 0)] {
            producer
                .request_proof(request(1, unix_now(), PROVER), tx.clone())
                .await
                .unwrap();
            rx.recv().await.unwrap();
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oracle_deadline_passed_is_immediate() {
        // The random bounds would hold the proof back for a minute
        let producer = producer(Some(60), Some(60), 10, 5);
        let (tx, rx) = unbounded();
        let start = Instant::now();

        producer
            .request_proof(request(3, unix_now() - 20, PROVER), tx)
            .await
            .unwrap();
        rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oracle_deadline_pending_waits() {
        let producer = producer(None, None, 10, 5);
        let (tx, rx) = unbounded();
        let start = Instant::now();

        producer
            .request_proof(request(3, unix_now(), PROVER), tx)
            .await
            .unwrap();
        rx.recv().await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(14) && elapsed <= Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oracle_assignment_uses_random_delay() {
        let producer = producer(Some(3), Some(3), 10, 5);
        let (tx, rx) = unbounded();
        let start = Instant::now();

        producer
            .request_proof(request(3, unix_now(), ORACLE), tx)
            .await
            .unwrap();
        rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_overrides_proof_window() {
        let producer = producer(None, None, 10, 3600);
        let (tx, rx) = unbounded();
        let start = Instant::now();

        let mut request = request(3, unix_now() - 20, PROVER);
        request.opts.proof_window = Some(5);
        producer.request_proof(request, tx).await.unwrap();
        rx.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_delivery() {
        let producer = producer(Some(5), Some(5), 0, 0);
        let (tx, rx) = unbounded();

        producer
            .request_proof(request(9, unix_now(), PROVER), tx.clone())
            .await
            .unwrap();
        producer
            .request_proof(request(9, unix_now(), PROVER), tx.clone())
            .await
            .unwrap();
        assert_eq!(producer.pending(), 2);
        producer.cancel(9).await.unwrap();
        assert_eq!(producer.pending(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
        // cancelling again is harmless
        producer.cancel(9).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_leaves_other_blocks() {
        let producer = producer(Some(5), Some(5), 0, 0);
        let (tx, rx) = unbounded();

        for block_id in [1, 2] {
            producer
                .request_proof(request(block_id, unix_now(), PROVER), tx.clone())
                .await
                .unwrap();
        }
        producer.cancel(1).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().block_id, 2);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_delivery_blocked_on_full_channel() {
        let producer = producer(Some(1), Some(1), 0, 0);
        let (tx, rx) = bounded(1);

        producer
            .request_proof(request(1, unix_now(), PROVER), tx.clone())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        producer
            .request_proof(request(2, unix_now(), PROVER), tx.clone())
            .await
            .unwrap();
        // block 1 fills the channel, block 2 waits for room
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.is_full());
        assert_eq!(producer.pending(), 1);

        producer.cancel(2).await.unwrap();
        assert_eq!(producer.pending(), 0);

        assert_eq!(rx.recv().await.unwrap().block_id, 1);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(rx.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test]
    async fn test_cancel_unknown_block_is_noop() {
        let producer = producer(None, None, 0, 0);
        assert!(producer.cancel(42).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_matches_submission() {
        let producer = producer(Some(1), Some(4), 0, 0);
        let (tx, rx) = unbounded();
        let mut submitted = request(11, 1_700_000_000, PROVER);
        submitted.meta.txListHash =
            b256!("0x569e75fc77c1a856f6daaf9e69d8a9566ca34aa47f9133711ce065a571af0cfd");
        submitted.header.parent_hash =
            b256!("0x3a2aeb1312c09308cf61903c682108fefa880ee411a75ee91275f27f569a2f83");
        submitted.opts.graffiti =
            b256!("0x0000000000000000000000000000000000000000000000000000000000000001");

        producer
            .request_proof(submitted.clone(), tx)
            .await
            .unwrap();
        let delivered = rx.recv().await.unwrap();

        assert_eq!(delivered.block_id, submitted.block_id);
        assert_eq!(delivered.meta, submitted.meta);
        assert_eq!(delivered.header, submitted.header);
        assert_eq!(delivered.opts, submitted.opts);
        let payload = delivered.result.unwrap();
        assert_eq!(payload.proof, Bytes::from(vec![0xff; DUMMY_PROOF_LEN]));
        assert_eq!(payload.degree, CIRCUITS_IDX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_arrive_out_of_order() {
        let producer = producer(None, None, 10, 5);
        let (tx, rx) = unbounded();

        producer
            .request_proof(request(1, unix_now(), PROVER), tx.clone())
            .await
            .unwrap();
        producer
            .request_proof(request(2, unix_now() - 60, PROVER), tx)
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().block_id, 2);
        assert_eq!(rx.recv().await.unwrap().block_id, 1);
    }

    #[tokio::test]
    async fn test_closed_channel_is_rejected() {
        let producer = producer(None, None, 0, 0);
        let (tx, rx) = unbounded();
        drop(rx);

        let err = producer
            .request_proof(request(5, unix_now(), PROVER), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvingError::SubmissionRejected { block_id: 5, .. }));
        assert_eq!(producer.pending(), 0);
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let err = DummyProofProducer::new(
            Some(Duration::from_secs(5)),
            Some(Duration::from_secs(1)),
            Duration::ZERO,
            ORACLE,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, ProvingError::Config(_)));
    }

    #[test]
    fn test_oracle_submission_delay() {
        let oracle_delay = Duration::from_secs(10);
        // deadline long passed
        assert_eq!(oracle_submission_delay(100, 80, 5, oracle_delay), Duration::ZERO);
        // exactly at the deadline
        assert_eq!(oracle_submission_delay(100, 85, 5, oracle_delay), Duration::ZERO);
        assert_eq!(
            oracle_submission_delay(100, 90, 5, oracle_delay),
            Duration::from_secs(5)
        );
        // header from the future
        assert_eq!(
            oracle_submission_delay(100, 200, 5, oracle_delay),
            Duration::from_secs(115)
        );
    }
}
