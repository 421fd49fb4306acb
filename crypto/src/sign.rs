//! Signing split plans.

use alloy_primitives::{Address, Bytes, Signature, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::Eip712Domain;
use splitter_types::{SignedTransaction, SplitPlan};

use crate::encoding::encode_signed_transaction;
use crate::error::CryptoError;
use crate::keys::Account;
use crate::typed_data::{plasma_domain, signing_hash};

/// Sign `plan` with one key per input and encode it for submission.
///
/// `keys[i]` must own `plan.inputs[i]`; every key signs the same digest.
pub fn sign_plan(
    plan: &SplitPlan,
    domain: &Eip712Domain,
    keys: &[&PrivateKeySigner],
) -> Result<SignedTransaction, CryptoError> {
    if keys.len() != plan.inputs.len() {
        return Err(CryptoError::KeyCountMismatch {
            expected: plan.inputs.len(),
            got: keys.len(),
        });
    }
    let hash = signing_hash(plan, domain)?;
    let signatures = keys
        .iter()
        .map(|key| {
            key.sign_hash_sync(&hash)
                .map(|sig| Bytes::copy_from_slice(&sig.as_bytes()))
                .map_err(|e| CryptoError::Signing(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let encoded = encode_signed_transaction(plan, &signatures)?;
    Ok(SignedTransaction {
        plan: plan.clone(),
        signatures,
        encoded,
    })
}

/// Recover the address that produced `signature` over `hash`.
///
/// Returns `None` for malformed signatures.
pub fn recover_signer(hash: &B256, signature: &[u8]) -> Option<Address> {
    let sig = Signature::try_from(signature).ok()?;
    sig.recover_address_from_prehash(hash).ok()
}

/// Signs plans on behalf of a single account under a fixed domain.
///
/// All inputs of a split belong to the same account, so the account's key
/// is used for every input slot.
#[derive(Clone, Debug)]
pub struct TypedDataSigner {
    account: Account,
    domain: Eip712Domain,
}

impl TypedDataSigner {
    pub fn new(account: Account, verifying_contract: Address) -> Self {
        Self {
            account,
            domain: plasma_domain(verifying_contract),
        }
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub fn sign(&self, plan: &SplitPlan) -> Result<SignedTransaction, CryptoError> {
        let keys = vec![&self.account.signer; plan.inputs.len()];
        sign_plan(plan, &self.domain, &keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::decode_signed_transaction;
    use crate::keys::account_from_private_key;
    use splitter_types::{Amount, OutputSpec, Utxo};

    const KEY_A: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_B: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn plan(owner: Address, inputs: usize) -> SplitPlan {
        let token = Address::repeat_byte(1);
        SplitPlan {
            inputs: (0..inputs)
                .map(|i| Utxo {
                    amount: Amount::from(100u64),
                    currency: token,
                    owner,
                    blknum: 1000,
                    txindex: i as u64,
                    oindex: 0,
                })
                .collect(),
            outputs: vec![
                OutputSpec::payment(owner, token, Amount::from(45u64)),
                OutputSpec::payment(owner, token, Amount::from(45u64)),
            ],
        }
    }

    #[test]
    fn one_signature_per_input_recovering_to_owner() {
        let account = account_from_private_key(KEY_A).unwrap();
        let signer = TypedDataSigner::new(account.clone(), Address::repeat_byte(7));
        let p = plan(account.address, 2);

        let signed = signer.sign(&p).unwrap();
        assert_eq!(signed.signatures.len(), 2);

        let hash = signing_hash(&p, signer.domain()).unwrap();
        for sig in &signed.signatures {
            assert_eq!(sig.len(), 65);
            assert_eq!(recover_signer(&hash, sig), Some(account.address));
        }
    }

    #[test]
    fn encoded_bytes_carry_the_signatures() {
        let account = account_from_private_key(KEY_A).unwrap();
        let signer = TypedDataSigner::new(account.clone(), Address::repeat_byte(7));
        let signed = signer.sign(&plan(account.address, 1)).unwrap();
        let envelope = decode_signed_transaction(&signed.encoded).unwrap();
        assert_eq!(envelope.signatures, signed.signatures);
    }

    #[test]
    fn distinct_keys_per_input() {
        let a = account_from_private_key(KEY_A).unwrap();
        let b = account_from_private_key(KEY_B).unwrap();
        let domain = plasma_domain(Address::repeat_byte(7));
        let p = plan(a.address, 2);

        let signed = sign_plan(&p, &domain, &[&a.signer, &b.signer]).unwrap();
        let hash = signing_hash(&p, &domain).unwrap();
        assert_eq!(recover_signer(&hash, &signed.signatures[0]), Some(a.address));
        assert_eq!(recover_signer(&hash, &signed.signatures[1]), Some(b.address));
    }

    #[test]
    fn key_count_must_match_inputs() {
        let a = account_from_private_key(KEY_A).unwrap();
        let domain = plasma_domain(Address::ZERO);
        let result = sign_plan(&plan(a.address, 2), &domain, &[&a.signer]);
        assert!(matches!(result, Err(CryptoError::KeyCountMismatch { .. })));
    }

    #[test]
    fn malformed_signature_recovers_nothing() {
        assert_eq!(recover_signer(&B256::ZERO, &[0u8; 10]), None);
    }
}
