//! L2-native key pair.
//!
//! Ed25519 with the secret derived as `sha256(sha256(seed))`, so the same
//! seed (or the same L1 signature over [`ZkLinkSigner::SIGN_MESSAGE`]) always
//! yields the same key.

use crate::consts::{NEW_PUBKEY_HASH_BYTES_LEN, ZKLINK_PUBKEY_LEN, ZKLINK_SIGNATURE_LEN};
use crate::helpers::encode_prefixed_hex;
use crate::prelude::Result;
use crate::signature::eth::EthSigner;
use crate::signature::starknet::StarkSigner;
use crate::Error;
use ed25519_dalek::{Signature, Signer as _, SigningKey, VerifyingKey};
use ethers::utils::keccak256;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

const MIN_SEED_LEN: usize = 32;

pub struct ZkLinkSigner {
    secret: Zeroizing<[u8; 32]>,
    public_key: PackedPublicKey,
}

impl ZkLinkSigner {
    /// Message the L1 key signs to derive the L2 key.
    pub const SIGN_MESSAGE: &'static str = "Sign this message to create a key to interact with zkLink's layer2 services.\nNOTE: This application is powered by zkLink protocol.\n\nOnly sign this message for a trusted client!";

    pub fn new_from_seed(seed: &[u8]) -> Result<Self> {
        if seed.len() < MIN_SEED_LEN {
            return Err(Error::PrivateKeyParse(format!(
                "seed must be at least {MIN_SEED_LEN} bytes, got {}",
                seed.len()
            )));
        }
        let mut inner = Zeroizing::new([0u8; 32]);
        inner.copy_from_slice(&Sha256::digest(seed));
        let mut secret = Zeroizing::new([0u8; 32]);
        secret.copy_from_slice(&Sha256::digest(inner.as_slice()));
        Ok(Self::from_secret(secret))
    }

    pub fn new_from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut secret = Zeroizing::new([0u8; 32]);
        if bytes.len() != secret.len() {
            return Err(Error::PrivateKeyParse(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        secret.copy_from_slice(bytes);
        Ok(Self::from_secret(secret))
    }

    pub fn new_from_hex_eth_signer(eth_hex_private_key: &str) -> Result<Self> {
        let eth_signer = EthSigner::new_from_hex_str(eth_hex_private_key)?;
        Self::new_from_eth_signer(&eth_signer)
    }

    pub fn new_from_eth_signer(eth_signer: &EthSigner) -> Result<Self> {
        let signature = eth_signer.sign_message(Self::SIGN_MESSAGE.as_bytes())?;
        Self::new_from_seed(&signature.serialize_packed())
    }

    pub fn new_from_stark_signer(stark_signer: &StarkSigner) -> Result<Self> {
        let signature = stark_signer.sign_message(Self::SIGN_MESSAGE.as_bytes())?;
        Self::new_from_seed(&signature.to_bytes_be())
    }

    pub fn random() -> Self {
        let mut secret = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(secret.as_mut_slice());
        Self::from_secret(secret)
    }

    fn from_secret(secret: Zeroizing<[u8; 32]>) -> Self {
        let verifying_key = SigningKey::from_bytes(&secret).verifying_key();
        let public_key = PackedPublicKey(verifying_key.to_bytes());
        Self { secret, public_key }
    }

    pub fn public_key(&self) -> PackedPublicKey {
        self.public_key.clone()
    }

    /// Signs `msg` and packs the signature together with the public key, so
    /// verifiers need nothing else.
    ///
    /// The scheme is plain Ed25519 (RFC 8032), not Schnorr-MuSig.
    pub fn sign_musig(&self, msg: &[u8]) -> ZkLinkSignature {
        let signing_key = SigningKey::from_bytes(&self.secret);
        ZkLinkSignature {
            pub_key: self.public_key.clone(),
            signature: PackedSignature(signing_key.sign(msg).to_bytes()),
        }
    }
}

impl fmt::Debug for ZkLinkSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZkLinkSigner")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedPublicKey(
    #[serde(with = "crate::helpers::prefixed_hex")] pub [u8; ZKLINK_PUBKEY_LEN],
);

impl PackedPublicKey {
    /// Last 20 bytes of keccak-256 over the packed key.
    pub fn public_key_hash(&self) -> PubKeyHash {
        let hash = keccak256(self.0);
        let mut out = [0u8; NEW_PUBKEY_HASH_BYTES_LEN];
        out.copy_from_slice(&hash[32 - NEW_PUBKEY_HASH_BYTES_LEN..]);
        PubKeyHash(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_hex(&self) -> String {
        encode_prefixed_hex(self.0)
    }
}

impl fmt::Debug for PackedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

/// Identifies an L2 key inside transactions.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PubKeyHash(
    #[serde(with = "crate::helpers::prefixed_hex")] [u8; NEW_PUBKEY_HASH_BYTES_LEN],
);

impl PubKeyHash {
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = crate::helpers::decode_prefixed_hex("pubKeyHash", s)?;
        let len = bytes.len();
        let bytes: [u8; NEW_PUBKEY_HASH_BYTES_LEN] = bytes.try_into().map_err(|_| {
            Error::validation(
                "pubKeyHash",
                format!("expected {NEW_PUBKEY_HASH_BYTES_LEN} bytes, got {len}"),
            )
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `0x` and 40 lowercase hex digits.
    pub fn as_hex(&self) -> String {
        encode_prefixed_hex(self.0)
    }
}

impl From<[u8; NEW_PUBKEY_HASH_BYTES_LEN]> for PubKeyHash {
    fn from(bytes: [u8; NEW_PUBKEY_HASH_BYTES_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for PubKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl fmt::Display for PubKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedSignature(
    #[serde(with = "crate::helpers::prefixed_hex")] pub [u8; ZKLINK_SIGNATURE_LEN],
);

impl fmt::Debug for PackedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_prefixed_hex(self.0))
    }
}

/// Primary signature together with the key that made it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkLinkSignature {
    pub pub_key: PackedPublicKey,
    pub signature: PackedSignature,
}

impl ZkLinkSignature {
    pub const LEN: usize = ZKLINK_PUBKEY_LEN + ZKLINK_SIGNATURE_LEN;

    /// Strict Ed25519 verification. False for any mismatch, including keys
    /// that are not valid curve points.
    pub fn verify_musig(&self, msg: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.pub_key.0) else {
            return false;
        };
        let signature = Signature::from_bytes(&self.signature.0);
        verifying_key.verify_strict(msg, &signature).is_ok()
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..ZKLINK_PUBKEY_LEN].copy_from_slice(&self.pub_key.0);
        out[ZKLINK_PUBKEY_LEN..].copy_from_slice(&self.signature.0);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LEN {
            return Err(Error::InvalidSignature(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let mut pub_key = [0u8; ZKLINK_PUBKEY_LEN];
        pub_key.copy_from_slice(&bytes[..ZKLINK_PUBKEY_LEN]);
        let mut signature = [0u8; ZKLINK_SIGNATURE_LEN];
        signature.copy_from_slice(&bytes[ZKLINK_PUBKEY_LEN..]);
        Ok(Self {
            pub_key: PackedPublicKey(pub_key),
            signature: PackedSignature(signature),
        })
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidSignature("missing 0x prefix".to_string()))?;
        let bytes =
            hex::decode(digits).map_err(|e| Error::InvalidSignature(format!("invalid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn as_hex(&self) -> String {
        encode_prefixed_hex(self.to_bytes())
    }
}
