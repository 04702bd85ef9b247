use vanguard_bundle::{Signer, SignerContractBreak};

/// Always-succeeds `Signer` double: "signs" by reversing the message bytes,
/// which is enough for builder tests that only assert on shape.
#[derive(Debug, Default)]
pub struct MockSigner;

#[async_trait::async_trait]
impl Signer for MockSigner {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerContractBreak> {
        Ok(message.iter().rev().copied().collect())
    }
}

/// `Signer` double that always breaks its contract, for exercising the
/// invariant-violation escalation path.
#[derive(Debug, Default)]
pub struct BrokenSigner;

#[async_trait::async_trait]
impl Signer for BrokenSigner {
    async fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerContractBreak> {
        Err(SignerContractBreak { message_len: message.len() })
    }
}
