//! Throwaway EVM identities and EIP-191 personal-sign signatures.

use core_logic::WalletError;
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::{hash_message, to_checksum};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A freshly generated account: checksummed address plus `0x` hex secret key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    address: String,
    private_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address)
            .field("private_key", &"***REDACTED***")
            .finish()
    }
}

impl KeyPair {
    /// Generates new key material from the thread-local CSPRNG.
    pub fn create() -> Self {
        let wallet = LocalWallet::new(&mut rand::thread_rng());
        Self::from_wallet(&wallet)
    }

    pub fn from_private_key(private_key: &str) -> Result<Self, WalletError> {
        Ok(Self::from_wallet(&parse_wallet(private_key)?))
    }

    fn from_wallet(wallet: &LocalWallet) -> Self {
        Self {
            address: to_checksum(&wallet.address(), None),
            private_key: format!("0x{}", hex::encode(wallet.signer().to_bytes())),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn sign(&self, message: &str) -> Result<String, WalletError> {
        sign_message(&self.private_key, message)
    }
}

fn parse_wallet(private_key: &str) -> Result<LocalWallet, WalletError> {
    private_key
        .trim()
        .parse::<LocalWallet>()
        .map_err(|e| WalletError::InvalidKey {
            reason: e.to_string(),
        })
}

/// Signs `message` with the Ethereum signed-message prefix and returns
/// `0x` + hex(r || s || v), v being 27 or 28.
pub fn sign_message(private_key: &str, message: &str) -> Result<String, WalletError> {
    let wallet = parse_wallet(private_key)?;
    let signature = wallet
        .sign_hash(hash_message(message))
        .map_err(|e| WalletError::InvalidKey {
            reason: e.to_string(),
        })?;
    Ok(format!("0x{}", hex::encode(signature.to_vec())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Signature;
    use std::str::FromStr;

    // Well-known hardhat account #0
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_create_yields_distinct_accounts() {
        let a = KeyPair::create();
        let b = KeyPair::create();

        assert_ne!(a.address(), b.address());
        assert_ne!(a.private_key(), b.private_key());
        assert_eq!(a.address().len(), 42);
        assert_eq!(a.private_key().len(), 66);
        assert!(a.private_key().starts_with("0x"));
    }

    #[test]
    fn test_private_key_round_trips_to_address() {
        let pair = KeyPair::create();
        let restored = KeyPair::from_private_key(pair.private_key()).unwrap();
        assert_eq!(restored.address(), pair.address());
    }

    #[test]
    fn test_known_key_address() {
        let pair = KeyPair::from_private_key(TEST_KEY).unwrap();
        assert_eq!(pair.address(), TEST_ADDRESS);
    }

    #[test]
    fn test_signature_shape() {
        let signature = sign_message(TEST_KEY, "Fanable Rewards 1700000000000").unwrap();

        assert_eq!(signature.len(), 132);
        assert!(signature.starts_with("0x"));
        assert!(signature[2..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        let v = &signature[130..];
        assert!(v == "1b" || v == "1c");
    }

    #[test]
    fn test_signature_recovers_signer() {
        let message = "Fanable Rewards 1700000000123";
        let signature = sign_message(TEST_KEY, message).unwrap();

        let parsed = Signature::from_str(&signature).unwrap();
        let recovered = parsed.recover(message).unwrap();
        assert_eq!(to_checksum(&recovered, None), TEST_ADDRESS);
    }

    #[test]
    fn test_signature_independent_of_call_order() {
        let first = sign_message(TEST_KEY, "Fanable Rewards 1").unwrap();
        let _other = sign_message(TEST_KEY, "Fanable Rewards 2").unwrap();
        let again = sign_message(TEST_KEY, "Fanable Rewards 1").unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_malformed_key_is_rejected() {
        for key in ["", "0x1234", "not-a-key", "0xzz74bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"] {
            assert!(matches!(
                sign_message(key, "hello"),
                Err(WalletError::InvalidKey { .. })
            ));
        }
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let pair = KeyPair::from_private_key(TEST_KEY).unwrap();
        let rendered = format!("{:?}", pair);
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains(&TEST_KEY[2..]));
    }
}
