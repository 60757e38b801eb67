use crate::consts::ETH_SIGNATURE_LEN;
use crate::helpers::{encode_prefixed_hex, parse_private_key};
use crate::prelude::Result;
use crate::Error;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Signature, H256};
use ethers::utils::hash_message;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// Ethereum key. The wallet is rebuilt for every signature and dropped right
/// after, so only the zeroizing buffer outlives a call.
pub struct EthSigner {
    private_key: Zeroizing<[u8; 32]>,
    address: Address,
}

impl EthSigner {
    pub fn new_from_hex_str(private_key: &str) -> Result<Self> {
        Self::new_from_bytes(parse_private_key(private_key)?)
    }

    pub fn new_from_bytes(private_key: Zeroizing<[u8; 32]>) -> Result<Self> {
        let address = wallet(&private_key)?.address();
        Ok(Self {
            private_key,
            address,
        })
    }

    pub fn get_address(&self) -> Address {
        self.address
    }

    /// EIP-191 personal message signature:
    /// `sign(keccak256("\x19Ethereum Signed Message:\n" + len(msg) + msg))`.
    pub fn sign_message(&self, msg: &[u8]) -> Result<PackedEthSignature> {
        self.sign_hash(hash_message(msg))
    }

    /// Signs a precomputed 32-byte digest. `v` is 27 or 28.
    pub fn sign_hash(&self, hash: H256) -> Result<PackedEthSignature> {
        let signature = wallet(&self.private_key)?
            .sign_hash(hash)
            .map_err(|e| Error::SignatureFailure(e.to_string()))?;
        Ok(PackedEthSignature::from(signature))
    }
}

fn wallet(private_key: &[u8; 32]) -> Result<LocalWallet> {
    LocalWallet::from_bytes(private_key)
        .map_err(|_| Error::PrivateKeyParse("not a valid secp256k1 secret key".to_string()))
}

impl fmt::Debug for EthSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// 65-byte `r ‖ s ‖ v` signature as produced by `eth_sign`.
///
/// Bytes are kept exactly as received: `v` may be `0/1` or `27/28` and is
/// only normalized when building the L1 contract witness.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedEthSignature([u8; ETH_SIGNATURE_LEN]);

impl PackedEthSignature {
    pub fn serialize_packed(&self) -> [u8; ETH_SIGNATURE_LEN] {
        self.0
    }

    pub fn deserialize_packed(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; ETH_SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            Error::InvalidSignature(format!(
                "expected {ETH_SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        let v = bytes[ETH_SIGNATURE_LEN - 1];
        if !matches!(v, 0 | 1 | 27 | 28) {
            return Err(Error::InvalidSignature(format!(
                "invalid recovery byte {v}"
            )));
        }
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidSignature("missing 0x prefix".to_string()))?;
        let bytes =
            hex::decode(digits).map_err(|e| Error::InvalidSignature(format!("invalid hex: {e}")))?;
        Self::deserialize_packed(&bytes)
    }

    pub fn as_hex(&self) -> String {
        encode_prefixed_hex(self.0)
    }

    /// Address whose key produced this signature over `digest`.
    pub fn signature_recover_signer(&self, digest: H256) -> Result<Address> {
        let signature = Signature::try_from(self.0.as_slice())
            .map_err(|e| Error::InvalidSignature(e.to_string()))?;
        signature
            .recover(digest)
            .map_err(|e| Error::InvalidSignature(e.to_string()))
    }
}

impl From<Signature> for PackedEthSignature {
    fn from(signature: Signature) -> Self {
        let mut bytes = [0u8; ETH_SIGNATURE_LEN];
        bytes.copy_from_slice(&signature.to_vec());
        Self(bytes)
    }
}

impl fmt::Debug for PackedEthSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Serialize for PackedEthSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for PackedEthSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}
