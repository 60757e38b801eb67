use crate::consts::{
    ETH_SIGNATURE_LEN, GLOBAL_ASSET_ACCOUNT_ID, MAX_ACCOUNT_ID, MAX_CHAIN_ID, MAX_NONCE,
    MAX_PACKABLE_FEE, MAX_SUB_ACCOUNT_ID, MAX_TOKEN_ID, NEW_PUBKEY_HASH_BYTES_LEN, STARK_SIGNATURE_LEN,
    USDX_TOKEN_ID_LOWER_BOUND, USDX_TOKEN_ID_UPPER_BOUND,
};
use crate::helpers::decode_prefixed_hex;
use crate::prelude::Result;
use crate::signature::eth::PackedEthSignature;
use crate::signature::starknet::StarkEcdsaSignature;
use crate::signature::zklink::PubKeyHash;
use crate::tx::float::{pack_fee_amount, unpack_fee_amount};
use crate::tx::{
    AccountId, ChainId, ChangePubKey, ChangePubKeyAuthData, ChangePubKeyRequest, Nonce,
    SubAccountId, TimeStamp, TokenId,
};
use crate::Error;
use log::debug;

/// Validates a request into an immutable transaction.
///
/// Pure: the same request always yields the same transaction or the same error.
pub fn build(request: &ChangePubKeyRequest) -> Result<ChangePubKey> {
    check_chain_id(request.chain_id)?;
    check_account_id(request.account_id)?;
    check_sub_account_id(request.sub_account_id)?;
    let new_pk_hash = parse_pubkey_hash(&request.new_pk_hash)?;
    let fee_token = check_fee_token(request.fee_token)?;
    let (fee, packed_fee) = parse_fee(&request.fee)?;
    check_nonce(request.nonce)?;
    let ts = u32::try_from(request.timestamp)
        .map_err(|_| Error::validation("timestamp", "does not fit in 32 bits"))?;
    let auth_data = match &request.layer1_signature {
        Some(signature) => parse_layer1_signature(signature)?,
        None => ChangePubKeyAuthData::Onchain,
    };

    debug!(
        "built ChangePubKey account={} sub_account={} nonce={} fee={}",
        request.account_id, request.sub_account_id, request.nonce, fee
    );

    Ok(ChangePubKey {
        chain_id: ChainId(request.chain_id),
        account_id: AccountId(request.account_id),
        sub_account_id: SubAccountId(request.sub_account_id),
        new_pk_hash,
        fee_token,
        fee,
        packed_fee,
        nonce: Nonce(request.nonce),
        auth_data,
        ts: TimeStamp(ts),
    })
}

pub(crate) fn check_chain_id(chain_id: u8) -> Result<()> {
    if chain_id > MAX_CHAIN_ID {
        return Err(Error::validation(
            "chainId",
            format!("{chain_id} exceeds {MAX_CHAIN_ID}"),
        ));
    }
    Ok(())
}

pub(crate) fn check_account_id(account_id: u32) -> Result<()> {
    if account_id > MAX_ACCOUNT_ID {
        return Err(Error::validation(
            "accountId",
            format!("{account_id} exceeds {MAX_ACCOUNT_ID}"),
        ));
    }
    if account_id == GLOBAL_ASSET_ACCOUNT_ID {
        return Err(Error::validation(
            "accountId",
            "the global asset account cannot change its key",
        ));
    }
    Ok(())
}

pub(crate) fn check_sub_account_id(sub_account_id: u8) -> Result<()> {
    if sub_account_id > MAX_SUB_ACCOUNT_ID {
        return Err(Error::validation(
            "subAccountId",
            format!("{sub_account_id} exceeds {MAX_SUB_ACCOUNT_ID}"),
        ));
    }
    Ok(())
}

pub(crate) fn check_fee_token(token: u32) -> Result<TokenId> {
    if token > MAX_TOKEN_ID {
        return Err(Error::validation(
            "feeToken",
            format!("{token} exceeds {MAX_TOKEN_ID}"),
        ));
    }
    if (USDX_TOKEN_ID_LOWER_BOUND..=USDX_TOKEN_ID_UPPER_BOUND).contains(&token) {
        return Err(Error::validation(
            "feeToken",
            format!(
                "ids {USDX_TOKEN_ID_LOWER_BOUND}..={USDX_TOKEN_ID_UPPER_BOUND} are reserved"
            ),
        ));
    }
    // Bounded by MAX_TOKEN_ID above.
    Ok(TokenId(token as u16))
}

pub(crate) fn check_nonce(nonce: u32) -> Result<()> {
    if nonce >= MAX_NONCE {
        return Err(Error::validation(
            "nonce",
            format!("{nonce} is not below {MAX_NONCE}"),
        ));
    }
    Ok(())
}

fn parse_pubkey_hash(s: &str) -> Result<PubKeyHash> {
    let bytes = decode_prefixed_hex("newPkHash", s)?;
    let bytes: [u8; NEW_PUBKEY_HASH_BYTES_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
        Error::validation(
            "newPkHash",
            format!(
                "expected {NEW_PUBKEY_HASH_BYTES_LEN} bytes, got {}",
                b.len()
            ),
        )
    })?;
    Ok(PubKeyHash::from(bytes))
}

fn parse_fee(s: &str) -> Result<(u128, [u8; 2])> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::validation(
            "fee",
            "must be a non-negative radix-10 integer",
        ));
    }
    let fee: u128 = s
        .parse()
        .map_err(|_| Error::validation("fee", "does not fit in 128 bits"))?;
    if fee > MAX_PACKABLE_FEE {
        return Err(Error::validation(
            "fee",
            format!("{fee} exceeds the packable maximum {MAX_PACKABLE_FEE}"),
        ));
    }
    let packed = pack_fee_amount(fee).map_err(|e| Error::validation("fee", e.to_string()))?;
    if unpack_fee_amount(&packed) != Some(fee) {
        return Err(Error::validation(
            "fee",
            format!("{fee} is not exactly representable as a packed fee"),
        ));
    }
    Ok((fee, packed))
}

fn parse_layer1_signature(s: &str) -> Result<ChangePubKeyAuthData> {
    let bytes = decode_prefixed_hex("layer1Signature", s)?;
    match bytes.len() {
        ETH_SIGNATURE_LEN => {
            let eth_signature = PackedEthSignature::deserialize_packed(&bytes)
                .map_err(|e| Error::validation("layer1Signature", e.to_string()))?;
            Ok(ChangePubKeyAuthData::EthECDSA { eth_signature })
        }
        STARK_SIGNATURE_LEN => {
            let stark_signature = StarkEcdsaSignature::from_bytes_be(&bytes)
                .map_err(|e| Error::validation("layer1Signature", e.to_string()))?;
            Ok(ChangePubKeyAuthData::StarkECDSA { stark_signature })
        }
        len => Err(Error::validation(
            "layer1Signature",
            format!(
                "expected {ETH_SIGNATURE_LEN} (Ethereum) or {STARK_SIGNATURE_LEN} (Starknet) bytes, got {len}"
            ),
        )),
    }
}
