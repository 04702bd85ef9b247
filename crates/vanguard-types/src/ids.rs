use std::fmt;

/// A 20-byte chain-agnostic account/contract identifier.
///
/// Kept as a plain fixed-size array rather than a chain SDK type: the wire
/// format for any specific chain is a collaborator's concern (see
/// [crate::error::ConfigError] and the crate-level docs), not this crate's.
pub type Address = [u8; 20];

/// A 32-byte transaction identifier (hash, signature digest, or equivalent).
pub type TxHash = [u8; 32];

/// Fixed-width numeric pool identifier.
///
/// Parsing assigns this once, at decode time, instead of keying hot-path maps
/// by a variable-length string or byte vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{:016x}", self.0)
    }
}

impl From<u64> for PoolId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Fixed-width numeric token identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token#{:016x}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identifier for a relay collaborator, stable across the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelayId(pub u32);

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relay#{}", self.0)
    }
}

/// Identifier minted by [`crate::bundle::Bundle::new`] for dispatch
/// deduplication (see `vanguard-relay`'s `DuplicateDispatch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleId(pub u64);

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bundle#{:016x}", self.0)
    }
}
