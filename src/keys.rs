//! Key material handling: decoding the configured secret, generating wallets,
//! and detached message signatures.
//!
//! A Solana secret key is the 64-byte concatenation of the Ed25519 seed and
//! public key, exchanged as Base58 text.

use crate::error::DispatchError;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};

const SIGNATURE_LEN: usize = 64;
const PUBKEY_LEN: usize = 32;

/// Decode a Base58 secret key into a signing keypair.
pub fn decode_keypair(secret: &str) -> Result<Keypair, DispatchError> {
    let secret = secret.trim();
    if secret.is_empty() {
        return Err(DispatchError::Configuration(
            "private key is empty".to_string(),
        ));
    }

    let bytes = bs58::decode(secret)
        .into_vec()
        .map_err(|e| DispatchError::Configuration(format!("private key is not base58: {e}")))?;

    Keypair::from_bytes(&bytes)
        .map_err(|e| DispatchError::Configuration(format!("private key is not a keypair: {e}")))
}

/// A freshly generated wallet in its exchange format.
#[derive(Debug, Clone)]
pub struct GeneratedWallet {
    pub public_key: String,
    pub private_key: String,
}

pub fn generate_wallet() -> GeneratedWallet {
    let keypair = Keypair::new();
    GeneratedWallet {
        public_key: keypair.pubkey().to_string(),
        private_key: bs58::encode(keypair.to_bytes()).into_string(),
    }
}

/// Sign the UTF-8 bytes of `message`, returning the Base58 signature.
pub fn sign_message(signer: &Keypair, message: &str) -> String {
    signer.sign_message(message.as_bytes()).to_string()
}

/// Verify a Base58 detached signature over the UTF-8 bytes of `message`.
///
/// Malformed inputs are errors; a well-formed signature that does not match
/// yields `Ok(false)`.
pub fn verify_signature(
    message: &str,
    signature: &str,
    public_key: &str,
) -> Result<bool, DispatchError> {
    let signature_bytes = bs58::decode(signature)
        .into_vec()
        .map_err(|e| DispatchError::InvalidSignature(format!("not base58: {e}")))?;
    if signature_bytes.len() != SIGNATURE_LEN {
        return Err(DispatchError::InvalidSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            signature_bytes.len()
        )));
    }

    let pubkey_bytes = bs58::decode(public_key)
        .into_vec()
        .map_err(|e| DispatchError::invalid_address("public key", format!("not base58: {e}")))?;
    let pubkey = Pubkey::try_from(pubkey_bytes.as_slice()).map_err(|_| {
        DispatchError::invalid_address(
            "public key",
            format!("expected {PUBKEY_LEN} bytes, got {}", pubkey_bytes.len()),
        )
    })?;

    let signature = Signature::try_from(signature_bytes.as_slice())
        .map_err(|e| DispatchError::InvalidSignature(e.to_string()))?;

    Ok(signature.verify(pubkey.as_ref(), message.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_wallet_round_trips_through_base58() {
        let wallet = generate_wallet();
        let decoded = decode_keypair(&wallet.private_key).unwrap();
        assert_eq!(decoded.pubkey().to_string(), wallet.public_key);
    }

    #[test]
    fn generated_wallets_are_distinct() {
        let a = generate_wallet();
        let b = generate_wallet();
        assert_ne!(a.public_key, b.public_key);
    }

    #[test]
    fn decode_accepts_surrounding_whitespace() {
        let keypair = Keypair::new();
        let encoded = format!("  {}\n", keypair.to_base58_string());
        assert_eq!(decode_keypair(&encoded).unwrap().pubkey(), keypair.pubkey());
    }

    #[test]
    fn decode_rejects_empty_secret() {
        let err = decode_keypair("").unwrap_err();
        assert!(matches!(err, DispatchError::Configuration(_)));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_keypair("0OIl").is_err());
        // valid base58 but only 32 bytes
        let short = bs58::encode([7u8; 32]).into_string();
        assert!(matches!(
            decode_keypair(&short),
            Err(DispatchError::Configuration(_))
        ));
    }

    #[test]
    fn signed_message_verifies() {
        let keypair = Keypair::new();
        let signature = sign_message(&keypair, "hello solana");
        let valid =
            verify_signature("hello solana", &signature, &keypair.pubkey().to_string()).unwrap();
        assert!(valid);
    }

    #[test]
    fn altered_message_fails_verification() {
        let keypair = Keypair::new();
        let signature = sign_message(&keypair, "hello solana");
        let valid =
            verify_signature("hello solanb", &signature, &keypair.pubkey().to_string()).unwrap();
        assert!(!valid);
    }

    #[test]
    fn other_key_fails_verification() {
        let signer = Keypair::new();
        let other = Keypair::new();
        let signature = sign_message(&signer, "gm");
        assert!(!verify_signature("gm", &signature, &other.pubkey().to_string()).unwrap());
    }

    #[test]
    fn short_signature_is_an_error() {
        let keypair = Keypair::new();
        let short = bs58::encode([1u8; 10]).into_string();
        let err = verify_signature("gm", &short, &keypair.pubkey().to_string()).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidSignature(_)));
    }

    #[test]
    fn malformed_public_key_is_an_error() {
        let keypair = Keypair::new();
        let signature = sign_message(&keypair, "gm");
        let err = verify_signature("gm", &signature, "abc").unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidAddress {
                field: "public key",
                ..
            }
        ));
    }
}
