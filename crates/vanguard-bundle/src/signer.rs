//! The `Signer` collaborator (§6): `sign(message_bytes) -> signature_bytes`
//! in ≤ 200 µs per call. This crate never manages keys; it only calls out.

/// Fatal per §7's invariant-violation class: a `Signer` implementation
/// breaking its own contract (e.g. returning an empty or malformed
/// signature) is a bug, not a transient condition, and unwinds the worker.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("signer produced an invalid signature for a {message_len}-byte message")]
pub struct SignerContractBreak {
    pub message_len: usize
}

#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc)]
pub trait Signer: Send + Sync {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerContractBreak>;
}
