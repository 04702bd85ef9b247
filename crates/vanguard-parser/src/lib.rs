//! Zero-copy wire parser (§4.1, component C1).
//!
//! Decodes a raw ingress byte slice into a [`Transaction`] view plus an
//! optional [`SwapIntent`], without any owning allocation on the happy path:
//! every field either is `Copy` or borrows directly from the input slice.

pub mod error;
pub mod wire;

pub use error::ParseError;
use tracing::trace;
use vanguard_types::{Address, SwapIntent, TokenId, Transaction, TxHash};
use wire::*;

/// Result of a successful decode: the transaction view and, when the payload
/// decoded as a recognized swap instruction, its intent.
#[derive(Debug, Clone, Copy)]
pub struct DecodedTransaction<'a> {
    pub transaction: Transaction<'a>,
    pub intent: Option<SwapIntent>
}

/// Decodes one wire frame.
///
/// # Errors
/// Returns [`ParseError::MalformedWire`] if `data` is shorter than the
/// minimum frame, [`ParseError::UnknownVariant`] if the outer frame kind is
/// unrecognized, and [`ParseError::TruncatedField`] if the payload's declared
/// length runs past the end of `data`.
///
/// Per §4.1's edge policy, an unrecognized *inner* intent discriminant is not
/// an error: the transaction view is still returned, with `intent = None`.
#[inline]
pub fn decode(data: &[u8]) -> Result<DecodedTransaction<'_>, ParseError> {
    if data.len() < MIN_FRAME_LEN {
        return Err(ParseError::MalformedWire { got: data.len(), min: MIN_FRAME_LEN });
    }

    let frame_kind = data[0];
    if frame_kind != FRAME_KIND_STANDARD {
        return Err(ParseError::UnknownVariant(frame_kind));
    }

    let mut cursor = 1usize;
    let id: TxHash = read_array(data, &mut cursor);
    let sender: Address = read_array(data, &mut cursor);
    let target: Address = read_array(data, &mut cursor);
    let fee = read_u64(data, &mut cursor);
    let priority_fee = read_u64(data, &mut cursor);
    let resource_limit = read_u64(data, &mut cursor);
    let arrival_us = read_u64(data, &mut cursor);

    let payload_len = read_u16(data, &mut cursor) as usize;
    let remaining = data.len() - cursor;
    if payload_len > remaining {
        return Err(ParseError::TruncatedField { declared: payload_len, remaining });
    }
    let payload = &data[cursor..cursor + payload_len];
    cursor += payload_len;

    if cursor >= data.len() {
        return Err(ParseError::MalformedWire { got: data.len(), min: cursor + 1 });
    }
    let intent_kind = data[cursor];
    cursor += 1;

    let intent = match intent_kind {
        INTENT_KIND_SWAP_EXACT_IN => {
            let remaining = data.len() - cursor;
            if remaining < INTENT_FIELDS_LEN {
                return Err(ParseError::TruncatedField {
                    declared: INTENT_FIELDS_LEN,
                    remaining
                });
            }
            let pool_id = read_u64(data, &mut cursor);
            let token_in = read_u64(data, &mut cursor);
            let token_out = read_u64(data, &mut cursor);
            let amount_in = read_u128(data, &mut cursor);
            let min_amount_out = read_u128(data, &mut cursor);
            Some(SwapIntent {
                token_in: TokenId(token_in),
                token_out: TokenId(token_out),
                amount_in,
                min_amount_out,
                pool_id: pool_id.into()
            })
        }
        INTENT_KIND_NONE => None,
        other => {
            trace!(intent_kind = other, "unrecognized intent discriminant, keeping bare tx view");
            None
        }
    };

    let transaction =
        Transaction { id, sender, target, payload, fee, priority_fee, resource_limit, arrival_us };
    Ok(DecodedTransaction { transaction, intent })
}

#[inline]
fn read_array<const N: usize>(data: &[u8], cursor: &mut usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&data[*cursor..*cursor + N]);
    *cursor += N;
    out
}

#[inline]
fn read_u16(data: &[u8], cursor: &mut usize) -> u16 {
    u16::from_le_bytes(read_array(data, cursor))
}

#[inline]
fn read_u64(data: &[u8], cursor: &mut usize) -> u64 {
    u64::from_le_bytes(read_array(data, cursor))
}

#[inline]
fn read_u128(data: &[u8], cursor: &mut usize) -> u128 {
    u128::from_le_bytes(read_array(data, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_frame(frame_kind: u8, payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![frame_kind];
        buf.extend_from_slice(&[1u8; 32]); // id
        buf.extend_from_slice(&[2u8; 20]); // sender
        buf.extend_from_slice(&[3u8; 20]); // target
        buf.extend_from_slice(&7u64.to_le_bytes()); // fee
        buf.extend_from_slice(&3u64.to_le_bytes()); // priority_fee
        buf.extend_from_slice(&100_000u64.to_le_bytes()); // resource_limit
        buf.extend_from_slice(&42u64.to_le_bytes()); // arrival_us
        buf.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        buf.extend_from_slice(payload);
        buf.push(INTENT_KIND_NONE);
        buf
    }

    fn swap_frame(pool_id: u64, amount_in: u128, min_out: u128) -> Vec<u8> {
        let mut buf = bare_frame(FRAME_KIND_STANDARD, b"\xde\xad\xbe\xef");
        *buf.last_mut().unwrap() = INTENT_KIND_SWAP_EXACT_IN;
        buf.extend_from_slice(&pool_id.to_le_bytes());
        buf.extend_from_slice(&9u64.to_le_bytes()); // token_in
        buf.extend_from_slice(&10u64.to_le_bytes()); // token_out
        buf.extend_from_slice(&amount_in.to_le_bytes());
        buf.extend_from_slice(&min_out.to_le_bytes());
        buf
    }

    #[test]
    fn rejects_short_buffers() {
        let err = decode(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, ParseError::MalformedWire { .. }));
    }

    #[test]
    fn rejects_unknown_frame_kind() {
        let frame = bare_frame(0xFF, b"");
        let err = decode(&frame).unwrap_err();
        assert_eq!(err, ParseError::UnknownVariant(0xFF));
    }

    #[test]
    fn truncated_payload_length_is_rejected() {
        let mut frame = bare_frame(FRAME_KIND_STANDARD, b"hi");
        // overwrite the payload_len prefix to claim more bytes than exist
        let len_offset = HEADER_LEN - 2;
        frame[len_offset..len_offset + 2].copy_from_slice(&60_000u16.to_le_bytes());
        let err = decode(&frame).unwrap_err();
        assert!(matches!(err, ParseError::TruncatedField { .. }));
    }

    #[test]
    fn known_program_unknown_inner_discriminant_yields_bare_transaction() {
        let mut frame = bare_frame(FRAME_KIND_STANDARD, b"payload");
        *frame.last_mut().unwrap() = 0x7B; // unrecognized intent discriminant
        let decoded = decode(&frame).expect("decode should not fail on unknown inner kind");
        assert!(decoded.intent.is_none());
        assert_eq!(decoded.transaction.payload, b"payload");
    }

    #[test]
    fn decodes_swap_intent_without_copying_payload() {
        let frame = swap_frame(77, 10_000, 1);
        let decoded = decode(&frame).unwrap();
        let intent = decoded.intent.expect("swap intent should decode");
        assert_eq!(intent.pool_id.0, 77);
        assert_eq!(intent.amount_in, 10_000);
        assert_eq!(intent.min_amount_out, 1);
        // the payload view still points inside the original buffer
        assert_eq!(decoded.transaction.payload, b"\xde\xad\xbe\xef");
        assert_eq!(decoded.transaction.payload.as_ptr(), &frame[HEADER_LEN]);
    }
}
