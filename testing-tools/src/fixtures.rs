//! Builders for sample wire frames and queue items, so orchestrator and
//! collaborator tests don't each hand-roll the byte layout from §4.1's wire
//! format.

use vanguard_parser::wire::{FRAME_KIND_STANDARD, INTENT_KIND_NONE, INTENT_KIND_SWAP_EXACT_IN};
use vanguard_queue::QueuedTransaction;
use vanguard_types::PoolState;

/// A standard-kind frame with no decodable intent: header fields are all
/// plausible-looking but otherwise arbitrary.
pub fn bare_frame(payload: &[u8]) -> Vec<u8> {
    frame_with_kind(FRAME_KIND_STANDARD, payload)
}

/// A frame with an unrecognized outer `frame_kind`, for exercising the
/// hard-error ingest path.
pub fn unknown_frame_kind(payload: &[u8]) -> Vec<u8> {
    frame_with_kind(0xFF, payload)
}

fn frame_with_kind(frame_kind: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![frame_kind];
    buf.extend_from_slice(&[0xAAu8; 32]); // id
    buf.extend_from_slice(&[0xBBu8; 20]); // sender
    buf.extend_from_slice(&[0xCCu8; 20]); // target
    buf.extend_from_slice(&10_000u64.to_le_bytes()); // fee
    buf.extend_from_slice(&500u64.to_le_bytes()); // priority_fee
    buf.extend_from_slice(&200_000u64.to_le_bytes()); // resource_limit
    buf.extend_from_slice(&1u64.to_le_bytes()); // arrival_us
    buf.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    buf.extend_from_slice(payload);
    buf.push(INTENT_KIND_NONE);
    buf
}

/// A standard-kind frame carrying a decodable `swap_exact_in` intent against
/// `pool_id`.
pub fn swap_frame(pool_id: u64, amount_in: u128, min_amount_out: u128) -> Vec<u8> {
    let mut buf = bare_frame(b"\xde\xad\xbe\xef");
    *buf.last_mut().unwrap() = INTENT_KIND_SWAP_EXACT_IN;
    buf.extend_from_slice(&pool_id.to_le_bytes());
    buf.extend_from_slice(&1u64.to_le_bytes()); // token_in
    buf.extend_from_slice(&2u64.to_le_bytes()); // token_out
    buf.extend_from_slice(&amount_in.to_le_bytes());
    buf.extend_from_slice(&min_amount_out.to_le_bytes());
    buf
}

/// A healthy, deep-liquidity constant-product pool, useful as a default
/// fixture wherever the exact reserves don't matter to the test.
pub fn sample_pool(pool_id: u64, slot: u64) -> PoolState {
    PoolState::new(pool_id.into(), 1_000_000_000, 1_000_000_000, 30, slot)
}

/// Wraps a raw frame as a dequeued item ready for
/// `PipelineOrchestrator::run_cycle`.
pub fn queued(raw: Vec<u8>, priority_fee: u64) -> QueuedTransaction {
    QueuedTransaction { raw, priority_fee, arrival_us: 1 }
}
