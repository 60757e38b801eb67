use crate::prelude::Result;
use crate::Error;
use chrono::Utc;

/// Seconds since the unix epoch. The builder rejects values past `u32::MAX`.
pub fn current_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Decodes a strictly `0x`-prefixed, even-length hex string.
pub fn decode_prefixed_hex(field: &'static str, s: &str) -> Result<Vec<u8>> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| Error::validation(field, "hex string must start with 0x"))?;
    if digits.len() % 2 != 0 {
        return Err(Error::validation(field, "odd number of hex digits"));
    }
    hex::decode(digits).map_err(|e| Error::validation(field, format!("invalid hex: {e}")))
}

pub fn encode_prefixed_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parses raw 32-byte key material, with or without the `0x` prefix.
///
/// The error never echoes the input.
pub(crate) fn parse_private_key(s: &str) -> Result<zeroize::Zeroizing<[u8; 32]>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() != 64 {
        return Err(Error::PrivateKeyParse(format!(
            "expected 64 hex digits, got {}",
            digits.len()
        )));
    }
    let mut key = zeroize::Zeroizing::new([0u8; 32]);
    hex::decode_to_slice(digits, key.as_mut_slice())
        .map_err(|_| Error::PrivateKeyParse("private key is not valid hex".to_string()))?;
    Ok(key)
}

/// Serde adapter: byte containers as `0x`-prefixed hex strings.
pub(crate) mod prefixed_hex {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&super::encode_prefixed_hex(bytes))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<Vec<u8>>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = super::decode_prefixed_hex("hex", &s).map_err(D::Error::custom)?;
        let len = bytes.len();
        T::try_from(bytes).map_err(|_| D::Error::custom(format!("unexpected byte length {len}")))
    }
}

/// Serde adapter: `u128` as a radix-10 string, so JSON consumers keep full precision.
pub(crate) mod u128_dec_str {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
