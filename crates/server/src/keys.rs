//! Server signing identity

use anyhow::{Context, Result};
use solana_sdk::signature::Keypair;

/// Decode a base58-encoded 64-byte secret key
pub fn keypair_from_base58(encoded: &str) -> Result<Keypair> {
    let bytes = bs58::decode(encoded.trim())
        .into_vec()
        .context("Secret key is not valid base58")?;

    Keypair::from_bytes(&bytes).map_err(|e| anyhow::anyhow!("Invalid secret key: {}", e))
}

/// Read the payer keypair from the named environment variable
pub fn load_payer_from_env(var: &str) -> Result<Keypair> {
    let encoded = std::env::var(var).with_context(|| format!("{} environment variable not set", var))?;
    keypair_from_base58(&encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Signer;

    #[test]
    fn test_base58_round_trip() {
        let keypair = Keypair::new();
        let decoded = keypair_from_base58(&keypair.to_base58_string()).unwrap();
        assert_eq!(decoded.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(keypair_from_base58("0OIl").is_err());
        assert!(keypair_from_base58("3yZe7d").is_err());
    }
}
