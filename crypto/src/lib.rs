//! Cryptographic plumbing for the UTXO splitter.
//!
//! - **Account keys**: secp256k1 private key parsing and address derivation
//! - **Typed data**: EIP-712 hashing of a split plan under the plasma
//!   framework's domain
//! - **Signing**: one recoverable signature per transaction input
//! - **Encoding**: RLP encoding of the signed transaction for submission

pub mod encoding;
pub mod error;
pub mod keys;
pub mod sign;
pub mod typed_data;

pub use encoding::{decode_signed_transaction, encode_signed_transaction, TransactionEnvelope};
pub use error::CryptoError;
pub use keys::{account_from_private_key, Account};
pub use sign::{recover_signer, sign_plan, TypedDataSigner};
pub use typed_data::{plasma_domain, signing_hash, MAX_INPUTS, MAX_OUTPUTS};
