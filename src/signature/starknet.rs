use crate::consts::{STARKNET_MESSAGE_PREFIX, STARK_SIGNATURE_LEN};
use crate::helpers::{encode_prefixed_hex, parse_private_key};
use crate::prelude::Result;
use crate::Error;
use lazy_static::lazy_static;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use starknet_crypto::{get_public_key, pedersen_hash, rfc6979_generate_k, sign, verify, Felt};
use std::fmt;
use zeroize::Zeroizing;

/// Bytes of a felt that carries a short string.
const SHORT_STRING_MAX_LEN: usize = 31;

/// Order of the Stark curve generator, big-endian.
const EC_ORDER: [u8; 32] = [
    0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xb7, 0x81, 0x12, 0x6d, 0xca, 0xe7, 0xb2, 0x32, 0x1e, 0x66, 0xa2, 0x41, 0xad, 0xc6, 0x4d, 0x2f,
];

lazy_static! {
    static ref MESSAGE_PREFIX: Felt = felt_from_be_slice(STARKNET_MESSAGE_PREFIX.as_bytes());
}

/// Left-pads up to 32 bytes into a felt. Callers keep `bytes` at most 31 long,
/// so the value is always below the field modulus.
fn felt_from_be_slice(bytes: &[u8]) -> Felt {
    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(bytes);
    Felt::from_bytes_be(&padded)
}

/// Reads 32 big-endian bytes, rejecting values at or above the field modulus.
fn canonical_felt(bytes: &[u8; 32]) -> Option<Felt> {
    let felt = Felt::from_bytes_be(bytes);
    (felt.to_bytes_be() == *bytes).then_some(felt)
}

/// Cairo short string: up to 31 ASCII bytes read as a big-endian integer.
pub fn short_string(field: &'static str, s: &str) -> Result<Felt> {
    if !s.is_ascii() || s.len() > SHORT_STRING_MAX_LEN {
        return Err(Error::validation(
            field,
            format!("must be at most {SHORT_STRING_MAX_LEN} ASCII characters"),
        ));
    }
    Ok(felt_from_be_slice(s.as_bytes()))
}

/// `0x`-prefixed hex of at most 64 digits that fits the field.
pub fn parse_felt_hex(field: &'static str, s: &str) -> Result<Felt> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| Error::validation(field, "hex string must start with 0x"))?;
    if digits.is_empty() || digits.len() > 64 {
        return Err(Error::validation(field, "expected 1 to 64 hex digits"));
    }
    let padded = format!("{digits:0>64}");
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(&padded, &mut bytes)
        .map_err(|e| Error::validation(field, format!("invalid hex: {e}")))?;
    canonical_felt(&bytes).ok_or_else(|| Error::validation(field, "exceeds the field modulus"))
}

/// `h(...h(h(0, e0), e1)..., n)`: the Pedersen chain over `elements`
/// finalized with their count.
pub fn compute_hash_on_elements(elements: &[Felt]) -> Felt {
    let hash = elements
        .iter()
        .fold(Felt::ZERO, |acc, element| pedersen_hash(&acc, element));
    pedersen_hash(&hash, &Felt::from(elements.len() as u64))
}

/// Splits `msg` into 31-byte felts.
fn message_elements(msg: &[u8]) -> impl Iterator<Item = Felt> + '_ {
    msg.chunks(SHORT_STRING_MAX_LEN).map(felt_from_be_slice)
}

/// Hash of a raw message, used for key derivation and standalone messages.
pub fn get_msg_hash(msg: &[u8]) -> Felt {
    compute_hash_on_elements(&message_elements(msg).collect::<Vec<_>>())
}

/// Hash of a message bound to a chain and an account:
/// `[short("StarkNet Message"), short(chain_id), address, chunks...]`.
pub fn get_account_message_hash(chain_id: &str, address: &str, msg: &[u8]) -> Result<Felt> {
    let mut elements = vec![
        *MESSAGE_PREFIX,
        short_string("chainId", chain_id)?,
        parse_felt_hex("address", address)?,
    ];
    elements.extend(message_elements(msg));
    Ok(compute_hash_on_elements(&elements))
}

/// Key bytes are wiped on drop. `Felt` has no zeroize support, so each
/// signing call builds the secret `Felt` on its own stack frame and that copy
/// is not wiped.
pub struct StarkSigner {
    private_key: Zeroizing<[u8; 32]>,
    public_key: Felt,
}

impl StarkSigner {
    pub fn new_from_hex_str(private_key: &str) -> Result<Self> {
        let private_key = parse_private_key(private_key)?;
        if private_key.iter().all(|b| *b == 0) || *private_key >= EC_ORDER {
            return Err(Error::PrivateKeyParse(
                "Stark key must be in [1, curve order)".to_string(),
            ));
        }
        let public_key = get_public_key(&Felt::from_bytes_be(&private_key));
        Ok(Self {
            private_key,
            public_key,
        })
    }

    pub fn public_key(&self) -> Felt {
        self.public_key
    }

    /// Deterministic (RFC 6979) ECDSA over a field element.
    pub fn sign_hash(&self, hash: &Felt) -> Result<StarkEcdsaSignature> {
        let signature = {
            let secret = Felt::from_bytes_be(&self.private_key);
            let k = rfc6979_generate_k(hash, &secret, None);
            sign(&secret, hash, &k).map_err(|e| Error::SignatureFailure(format!("{e:?}")))?
        };
        Ok(StarkEcdsaSignature {
            pub_key: self.public_key,
            r: signature.r,
            s: signature.s,
        })
    }

    pub fn sign_message(&self, msg: &[u8]) -> Result<StarkEcdsaSignature> {
        self.sign_hash(&get_msg_hash(msg))
    }
}

impl fmt::Debug for StarkSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("**StarkSigner**")
    }
}

/// Stark ECDSA signature with the signer's public key, packed as
/// `pub_key ‖ r ‖ s` (3 x 32 bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StarkEcdsaSignature {
    pub pub_key: Felt,
    pub r: Felt,
    pub s: Felt,
}

impl StarkEcdsaSignature {
    pub fn to_bytes_be(&self) -> [u8; STARK_SIGNATURE_LEN] {
        let mut out = [0u8; STARK_SIGNATURE_LEN];
        out[..32].copy_from_slice(&self.pub_key.to_bytes_be());
        out[32..64].copy_from_slice(&self.r.to_bytes_be());
        out[64..].copy_from_slice(&self.s.to_bytes_be());
        out
    }

    pub fn from_bytes_be(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != STARK_SIGNATURE_LEN {
            return Err(Error::InvalidSignature(format!(
                "expected {STARK_SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut felts = bytes.chunks_exact(32).map(|chunk| {
            let mut word = [0u8; 32];
            word.copy_from_slice(chunk);
            canonical_felt(&word).ok_or_else(|| {
                Error::InvalidSignature("element exceeds the field modulus".to_string())
            })
        });
        let (Some(pub_key), Some(r), Some(s)) = (felts.next(), felts.next(), felts.next()) else {
            return Err(Error::InvalidSignature("truncated signature".to_string()));
        };
        Ok(Self {
            pub_key: pub_key?,
            r: r?,
            s: s?,
        })
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| Error::InvalidSignature("missing 0x prefix".to_string()))?;
        let bytes =
            hex::decode(digits).map_err(|e| Error::InvalidSignature(format!("invalid hex: {e}")))?;
        Self::from_bytes_be(&bytes)
    }

    pub fn as_hex(&self) -> String {
        encode_prefixed_hex(self.to_bytes_be())
    }

    /// Checks `r, s` against the embedded public key. False on any failure.
    pub fn verify(&self, hash: &Felt) -> bool {
        verify(&self.pub_key, hash, &self.r, &self.s).unwrap_or(false)
    }
}

impl fmt::Debug for StarkEcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Serialize for StarkEcdsaSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for StarkEcdsaSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x0139fe4d6f02e666e86a6f58e65060f115cd3c185bd9e98bd829636931458f79";

    #[test]
    fn sign_and_verify_message() {
        let signer = StarkSigner::new_from_hex_str(KEY).unwrap();
        let signature = signer.sign_message(b"hello world").unwrap();
        assert_eq!(signature.pub_key, signer.public_key());
        assert!(signature.verify(&get_msg_hash(b"hello world")));
        assert!(!signature.verify(&get_msg_hash(b"hello worle")));
        // RFC 6979 nonces make signing deterministic.
        assert_eq!(signature, signer.sign_message(b"hello world").unwrap());
    }

    #[test]
    fn public_key_is_derived_at_construction() {
        let signer = StarkSigner::new_from_hex_str(KEY).unwrap();
        let secret = parse_felt_hex("privateKey", KEY).unwrap();
        assert_eq!(signer.public_key(), get_public_key(&secret));
        let signature = signer.sign_hash(&Felt::from(7u64)).unwrap();
        assert_eq!(signature.pub_key, signer.public_key());
        assert!(signature.verify(&Felt::from(7u64)));
    }

    #[test]
    fn bytes_round_trip() {
        let signer = StarkSigner::new_from_hex_str(KEY).unwrap();
        let signature = signer.sign_message(b"msg").unwrap();
        let bytes = signature.to_bytes_be();
        assert_eq!(StarkEcdsaSignature::from_bytes_be(&bytes).unwrap(), signature);
        assert_eq!(StarkEcdsaSignature::from_hex(&signature.as_hex()).unwrap(), signature);
        assert!(StarkEcdsaSignature::from_bytes_be(&bytes[..95]).is_err());
    }

    #[test]
    fn non_canonical_elements_are_rejected() {
        let mut bytes = [0u8; STARK_SIGNATURE_LEN];
        bytes[32..64].copy_from_slice(&[0xff; 32]);
        assert!(matches!(
            StarkEcdsaSignature::from_bytes_be(&bytes),
            Err(Error::InvalidSignature(_))
        ));
    }

    #[test]
    fn key_range_is_checked() {
        assert!(StarkSigner::new_from_hex_str(&hex::encode([0u8; 32])).is_err());
        assert!(StarkSigner::new_from_hex_str(&hex::encode(EC_ORDER)).is_err());
        let mut below = EC_ORDER;
        below[31] -= 1;
        assert!(StarkSigner::new_from_hex_str(&hex::encode(below)).is_ok());
    }

    #[test]
    fn short_strings() {
        assert_eq!(short_string("chainId", "").unwrap(), Felt::ZERO);
        assert_eq!(
            short_string("chainId", "SN_MAIN").unwrap(),
            Felt::from(0x534e5f4d41494eu64)
        );
        assert!(short_string("chainId", &"a".repeat(32)).is_err());
        assert!(short_string("chainId", "é").is_err());
    }

    #[test]
    fn felt_hex_parsing() {
        assert_eq!(parse_felt_hex("address", "0x1").unwrap(), Felt::ONE);
        assert!(parse_felt_hex("address", "1").is_err());
        assert!(parse_felt_hex("address", "0x").is_err());
        assert!(parse_felt_hex("address", &format!("0x{}", "f".repeat(64))).is_err());
    }

    #[test]
    fn account_message_hash_binds_domain() {
        let address = "0x04a69b67bcabfa7d3ccb96e1d25c2e6fc93589fe24a6fd04566b8700ff97a71a";
        let a = get_account_message_hash("SN_MAIN", address, b"msg").unwrap();
        let b = get_account_message_hash("SN_SEPOLIA", address, b"msg").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, get_msg_hash(b"msg"));
    }

    #[test]
    fn debug_hides_key() {
        let signer = StarkSigner::new_from_hex_str(KEY).unwrap();
        assert_eq!(format!("{signer:?}"), "**StarkSigner**");
    }
}
