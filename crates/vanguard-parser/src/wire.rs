//! Wire layout for the generic frame this parser decodes.
//!
//! The concrete on-chain encoding for any specific chain is a collaborator's
//! concern (§9's open question); this module documents the one
//! chain-agnostic frame this crate actually understands, used by the ingress
//! adapter test harness and by `testing-tools`' fixtures.
//!
//! ```text
//! offset  size  field
//! 0       1     frame_kind       (0 = standard; anything else is unknown)
//! 1       32    tx id
//! 33      20    sender
//! 53      20    target
//! 73      8     fee                 (u64 LE)
//! 81      8     priority_fee        (u64 LE)
//! 89      8     resource_limit      (u64 LE)
//! 97      8     arrival_us          (u64 LE)
//! 105     2     payload_len         (u16 LE)
//! 107     N     payload             (N = payload_len)
//! 107+N   1     intent_kind         (0 = none/unrecognized; 1 = swap_exact_in)
//! 108+N   56    intent fields, only present when intent_kind == 1 (see below)
//! ```
//!
//! Intent fields (when `intent_kind == 1`):
//! ```text
//! offset  size  field
//! 0       8     pool_id     (u64 LE)
//! 8       8     token_in    (u64 LE)
//! 16      8     token_out   (u64 LE)
//! 24      16    amount_in       (u128 LE)
//! 40      16    min_amount_out  (u128 LE)
//! ```

pub const FRAME_KIND_STANDARD: u8 = 0;
pub const INTENT_KIND_NONE: u8 = 0;
pub const INTENT_KIND_SWAP_EXACT_IN: u8 = 1;

pub const HEADER_LEN: usize = 1 + 32 + 20 + 20 + 8 + 8 + 8 + 8 + 2;
pub const INTENT_FIELDS_LEN: usize = 8 + 8 + 8 + 16 + 16;
/// Smallest possible frame: header with a zero-length payload, plus the
/// trailing intent-kind byte.
pub const MIN_FRAME_LEN: usize = HEADER_LEN + 1;
