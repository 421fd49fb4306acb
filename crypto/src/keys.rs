//! secp256k1 account keys.

use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use std::fmt;

use crate::error::CryptoError;

/// The account whose UTXOs are being split: its address and signing key.
#[derive(Clone)]
pub struct Account {
    pub address: Address,
    pub signer: PrivateKeySigner,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("signer", &"<redacted>")
            .finish()
    }
}

/// Parse a hex private key (with or without `0x`) into an account.
pub fn account_from_private_key(hex_key: &str) -> Result<Account, CryptoError> {
    let trimmed = hex_key.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(stripped).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(CryptoError::InvalidKey(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    let signer =
        PrivateKeySigner::from_slice(&bytes).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    Ok(Account {
        address: signer.address(),
        signer,
    })
}
