use crate::helpers::current_timestamp;
use crate::prelude::Result;
use crate::tx::{builder, ChangePubKey};
use serde::{Deserialize, Serialize};

/// Untrusted input for a `ChangePubKey`, in the shapes callers usually hold:
/// hex strings for byte fields and a decimal string for the fee.
///
/// Nothing is checked until [`ChangePubKeyRequest::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePubKeyRequest {
    pub chain_id: u8,
    pub account_id: u32,
    pub sub_account_id: u8,
    /// `0x` followed by 40 hex digits.
    pub new_pk_hash: String,
    pub fee_token: u32,
    /// Integer amount in the fee token's base unit, radix 10.
    pub fee: String,
    pub nonce: u32,
    /// Precomputed L1 authorization, passed through unchanged when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer1_signature: Option<String>,
    pub timestamp: u64,
}

impl ChangePubKeyRequest {
    /// Request stamped with the current time and no precomputed L1 signature.
    pub fn new(
        chain_id: u8,
        account_id: u32,
        sub_account_id: u8,
        new_pk_hash: impl Into<String>,
        fee_token: u32,
        fee: impl Into<String>,
        nonce: u32,
    ) -> Self {
        Self {
            chain_id,
            account_id,
            sub_account_id,
            new_pk_hash: new_pk_hash.into(),
            fee_token,
            fee: fee.into(),
            nonce,
            layer1_signature: None,
            timestamp: current_timestamp(),
        }
    }

    pub fn with_layer1_signature(mut self, signature: impl Into<String>) -> Self {
        self.layer1_signature = Some(signature.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(&self) -> Result<ChangePubKey> {
        builder::build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_from_json() {
        let json = r#"{
            "chainId": 1,
            "accountId": 2,
            "subAccountId": 4,
            "newPkHash": "0xd8d5fb6a6caef06aa3dc2abdcdc240987e5330fe",
            "feeToken": 1,
            "fee": "100",
            "nonce": 100,
            "timestamp": 100
        }"#;
        let request: ChangePubKeyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.account_id, 2);
        assert_eq!(request.layer1_signature, None);
        assert!(request.build().is_ok());
    }

    #[test]
    fn new_stamps_current_time() {
        let request = ChangePubKeyRequest::new(
            1,
            2,
            4,
            "0xd8d5fb6a6caef06aa3dc2abdcdc240987e5330fe",
            1,
            "100",
            0,
        );
        assert!(request.timestamp > 0);
        assert_eq!(request.with_timestamp(100).timestamp, 100);
    }
}
