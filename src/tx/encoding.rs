//! Canonical byte layout of a `ChangePubKey`.
//!
//! | offset | width | field |
//! |--------|-------|-------|
//! | 0  | 1  | tx type (`0x06`) |
//! | 1  | 1  | chain id |
//! | 2  | 4  | account id |
//! | 6  | 1  | sub-account id |
//! | 7  | 20 | new pubkey hash |
//! | 27 | 2  | fee token |
//! | 29 | 2  | packed fee (see [`crate::tx::float`]) |
//! | 31 | 4  | nonce |
//! | 35 | 4  | timestamp |
//!
//! All integers are big-endian. Authorization data is deliberately outside
//! the signed bytes: it is what the L1 owner signs, not what the L2 key signs.

use crate::consts::{CHANGE_PUBKEY_BYTES_LEN, CHANGE_PUBKEY_TX_TYPE, NEW_PUBKEY_HASH_BYTES_LEN};
use crate::prelude::Result;
use crate::signature::zklink::PubKeyHash;
use crate::tx::builder::{
    check_account_id, check_chain_id, check_fee_token, check_nonce, check_sub_account_id,
};
use crate::tx::float::unpack_fee_amount;
use crate::tx::{
    AccountId, ChainId, ChangePubKey, ChangePubKeyAuthData, Nonce, SubAccountId, TimeStamp,
    TokenId,
};
use crate::Error;

pub fn encode(tx: &ChangePubKey) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHANGE_PUBKEY_BYTES_LEN);
    out.push(CHANGE_PUBKEY_TX_TYPE);
    out.push(*tx.chain_id);
    out.extend_from_slice(&tx.account_id.to_be_bytes());
    out.push(*tx.sub_account_id);
    out.extend_from_slice(tx.new_pk_hash.as_bytes());
    out.extend_from_slice(&tx.fee_token.to_be_bytes());
    out.extend_from_slice(&tx.packed_fee);
    out.extend_from_slice(&tx.nonce.to_be_bytes());
    out.extend_from_slice(&tx.ts.to_be_bytes());
    debug_assert_eq!(out.len(), CHANGE_PUBKEY_BYTES_LEN);
    out
}

/// Reads canonical bytes back into a transaction with `Onchain` auth data.
///
/// Range rules are the builder's, so a decoded value is as trustworthy as a
/// built one.
pub fn decode(bytes: &[u8]) -> Result<ChangePubKey> {
    if bytes.len() != CHANGE_PUBKEY_BYTES_LEN {
        return Err(Error::Encoding(format!(
            "expected {CHANGE_PUBKEY_BYTES_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[0] != CHANGE_PUBKEY_TX_TYPE {
        return Err(Error::Encoding(format!(
            "unexpected tx type {:#04x}",
            bytes[0]
        )));
    }

    let mut reader = Reader { bytes, pos: 1 };
    let chain_id = reader.take::<1>()[0];
    let account_id = u32::from_be_bytes(reader.take::<4>());
    let sub_account_id = reader.take::<1>()[0];
    let new_pk_hash = reader.take::<NEW_PUBKEY_HASH_BYTES_LEN>();
    let fee_token = u16::from_be_bytes(reader.take::<2>());
    let packed_fee = reader.take::<2>();
    let nonce = u32::from_be_bytes(reader.take::<4>());
    let ts = u32::from_be_bytes(reader.take::<4>());

    let as_encoding = |e: Error| Error::Encoding(e.to_string());
    check_chain_id(chain_id).map_err(as_encoding)?;
    check_account_id(account_id).map_err(as_encoding)?;
    check_sub_account_id(sub_account_id).map_err(as_encoding)?;
    check_fee_token(u32::from(fee_token)).map_err(as_encoding)?;
    check_nonce(nonce).map_err(as_encoding)?;
    let fee = unpack_fee_amount(&packed_fee)
        .ok_or_else(|| Error::Encoding("packed fee overflows 128 bits".to_string()))?;

    Ok(ChangePubKey {
        chain_id: ChainId(chain_id),
        account_id: AccountId(account_id),
        sub_account_id: SubAccountId(sub_account_id),
        new_pk_hash: PubKeyHash::from(new_pk_hash),
        fee_token: TokenId(fee_token),
        fee,
        packed_fee,
        nonce: Nonce(nonce),
        auth_data: ChangePubKeyAuthData::Onchain,
        ts: TimeStamp(ts),
    })
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    // Bounds are fixed by the length check in `decode`.
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::ChangePubKeyRequest;

    fn request() -> ChangePubKeyRequest {
        ChangePubKeyRequest {
            chain_id: 1,
            account_id: 2,
            sub_account_id: 4,
            new_pk_hash: "0xd8d5fb6a6caef06aa3dc2abdcdc240987e5330fe".to_string(),
            fee_token: 1,
            fee: "100".to_string(),
            nonce: 100,
            layer1_signature: None,
            timestamp: 100,
        }
    }

    #[test]
    fn encodes_golden_layout() {
        let tx = request().build().unwrap();
        let expected = hex::decode(concat!(
            "06",
            "01",
            "00000002",
            "04",
            "d8d5fb6a6caef06aa3dc2abdcdc240987e5330fe",
            "0001",
            "0c80",
            "00000064",
            "00000064",
        ))
        .unwrap();
        assert_eq!(encode(&tx), expected);
        assert_eq!(encode(&tx).len(), CHANGE_PUBKEY_BYTES_LEN);
    }

    #[test]
    fn encoding_is_idempotent() {
        let tx = request().build().unwrap();
        assert_eq!(encode(&tx), encode(&tx));
        assert_eq!(encode(&tx), encode(&tx.clone()));
    }

    #[test]
    fn decode_restores_encoded_fields() {
        let mut req = request();
        req.fee = "1000000000000000000".to_string();
        req.timestamp = 1_693_472_232;
        let tx = req.build().unwrap();
        let decoded = decode(&encode(&tx)).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn distinct_fields_give_distinct_bytes() {
        let base = encode(&request().build().unwrap());
        let mut other = request();
        other.nonce = 101;
        assert_ne!(base, encode(&other.build().unwrap()));
        let mut other = request();
        other.sub_account_id = 5;
        assert_ne!(base, encode(&other.build().unwrap()));
        let mut other = request();
        other.fee = "1000".to_string();
        assert_ne!(base, encode(&other.build().unwrap()));
    }

    #[test]
    fn decode_rejects_malformed_input() {
        let bytes = encode(&request().build().unwrap());
        assert!(matches!(decode(&bytes[..38]), Err(Error::Encoding(_))));

        let mut wrong_type = bytes.clone();
        wrong_type[0] = 0x04;
        assert!(matches!(decode(&wrong_type), Err(Error::Encoding(_))));

        let mut wrong_chain = bytes.clone();
        wrong_chain[1] = 0xff;
        assert!(matches!(decode(&wrong_chain), Err(Error::Encoding(_))));

        let mut exhausted_nonce = bytes;
        exhausted_nonce[31..35].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(decode(&exhausted_nonce), Err(Error::Encoding(_))));
    }
}
