//! Layer-1 authorization of a key change.
//!
//! The L1 owner of an account signs a short human-readable text that names the
//! new key hash, the nonce and the account. How that text is hashed and signed
//! depends on the chain the owner lives on.

use crate::prelude::Result;
use crate::signature::eth::PackedEthSignature;
use crate::signature::starknet::{
    get_account_message_hash, parse_felt_hex, short_string, StarkEcdsaSignature,
};
use crate::signature::zklink::PubKeyHash;
use crate::tx::{AccountId, ChangePubKey, ChangePubKeyAuthData, Nonce};
use ethers::types::{Address, H256};
use ethers::utils::hash_message;
use serde::{Deserialize, Serialize};
use starknet_crypto::Felt;

/// Chain the L1 owner authorizes from. New chains are added as variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum L1SignerType {
    Eth,
    #[serde(rename_all = "camelCase")]
    Starknet { chain_id: String, address: String },
}

impl L1SignerType {
    /// Rejects Starknet parameters that cannot be hashed into a message.
    pub fn validate(&self) -> Result<()> {
        if let L1SignerType::Starknet { chain_id, address } = self {
            short_string("chainId", chain_id)?;
            parse_felt_hex("address", address)?;
        }
        Ok(())
    }

    pub fn build_auth_message(&self, tx: &ChangePubKey) -> Result<AuthMessage> {
        let text = change_pubkey_auth_text(tx.new_pk_hash(), tx.nonce(), tx.account_id());
        match self {
            L1SignerType::Eth => Ok(AuthMessage {
                digest: hash_message(text.as_bytes()).0,
                text,
            }),
            L1SignerType::Starknet { chain_id, address } => {
                let hash = get_account_message_hash(chain_id, address, text.as_bytes())?;
                Ok(AuthMessage {
                    digest: hash.to_bytes_be(),
                    text,
                })
            }
        }
    }
}

/// ```text
/// ChangePubKey
/// PubKeyHash: 0x<40 lowercase hex digits>
/// Nonce: <decimal>
/// AccountId: <decimal>
/// ```
pub fn change_pubkey_auth_text(
    pubkey_hash: &PubKeyHash,
    nonce: Nonce,
    account_id: AccountId,
) -> String {
    format!(
        "ChangePubKey\nPubKeyHash: {}\nNonce: {}\nAccountId: {}",
        pubkey_hash.as_hex(),
        nonce,
        account_id
    )
}

/// Text the L1 owner approves and the 32-byte digest actually signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMessage {
    text: String,
    digest: [u8; 32],
}

impl AuthMessage {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// keccak-256 of the EIP-191 payload for Ethereum, the Pedersen message
    /// hash for Starknet.
    pub fn digest(&self) -> [u8; 32] {
        self.digest
    }
}

/// Who is expected to have produced an L1 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer1Identity {
    Ethereum(Address),
    /// Stark public key.
    Starknet(Felt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "signature")]
pub enum TxLayer1Signature {
    EthereumSignature(PackedEthSignature),
    StarkSignature(StarkEcdsaSignature),
}

impl TxLayer1Signature {
    /// The supplied L1 signature carried by a transaction's auth data, if any.
    pub fn from_auth_data(auth_data: &ChangePubKeyAuthData) -> Option<Self> {
        match auth_data {
            ChangePubKeyAuthData::EthECDSA { eth_signature } => {
                Some(Self::EthereumSignature(*eth_signature))
            }
            ChangePubKeyAuthData::StarkECDSA { stark_signature } => {
                Some(Self::StarkSignature(*stark_signature))
            }
            ChangePubKeyAuthData::Onchain | ChangePubKeyAuthData::EthCreate2 { .. } => None,
        }
    }

    pub fn into_auth_data(self) -> ChangePubKeyAuthData {
        match self {
            Self::EthereumSignature(eth_signature) => {
                ChangePubKeyAuthData::EthECDSA { eth_signature }
            }
            Self::StarkSignature(stark_signature) => {
                ChangePubKeyAuthData::StarkECDSA { stark_signature }
            }
        }
    }

    /// True when the scheme matches `identity` and the signature over `message`
    /// belongs to it.
    pub fn verify(&self, message: &AuthMessage, identity: &Layer1Identity) -> bool {
        match (self, identity) {
            (Self::EthereumSignature(signature), Layer1Identity::Ethereum(address)) => signature
                .signature_recover_signer(H256(message.digest))
                .map(|recovered| recovered == *address)
                .unwrap_or(false),
            (Self::StarkSignature(signature), Layer1Identity::Starknet(pub_key)) => {
                signature.pub_key == *pub_key
                    && signature.verify(&Felt::from_bytes_be(&message.digest))
            }
            _ => false,
        }
    }

    pub fn as_hex(&self) -> String {
        match self {
            Self::EthereumSignature(signature) => signature.as_hex(),
            Self::StarkSignature(signature) => signature.as_hex(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::eth::EthSigner;
    use crate::signature::starknet::StarkSigner;
    use crate::tx::ChangePubKeyRequest;

    const STARK_ADDRESS: &str =
        "0x04a69b67bcabfa7d3ccb96e1d25c2e6fc93589fe24a6fd04566b8700ff97a71a";

    fn tx() -> ChangePubKey {
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
        .build()
        .unwrap()
    }

    fn starknet() -> L1SignerType {
        L1SignerType::Starknet {
            chain_id: "SN_MAIN".to_string(),
            address: STARK_ADDRESS.to_string(),
        }
    }

    #[test]
    fn auth_text_template() {
        let message = L1SignerType::Eth.build_auth_message(&tx()).unwrap();
        assert_eq!(
            message.text(),
            "ChangePubKey\nPubKeyHash: 0xd8d5fb6a6caef06aa3dc2abdcdc240987e5330fe\nNonce: 100\nAccountId: 2"
        );
        assert_eq!(
            hex::encode(message.digest()),
            "3cc7721fc80cca964609b141341c795ce1c2d2662e76efa033d9b80151ba1acd"
        );
    }

    #[test]
    fn eth_signature_verifies_against_owner() {
        let signer = EthSigner::new_from_hex_str(&hex::encode([5u8; 32])).unwrap();
        let message = L1SignerType::Eth.build_auth_message(&tx()).unwrap();
        let signature = TxLayer1Signature::EthereumSignature(
            signer.sign_hash(H256(message.digest())).unwrap(),
        );
        assert!(signature.verify(&message, &Layer1Identity::Ethereum(signer.get_address())));
        assert!(!signature.verify(&message, &Layer1Identity::Ethereum(Address::zero())));
        assert!(!signature.verify(&message, &Layer1Identity::Starknet(Felt::ONE)));
    }

    #[test]
    fn stark_signature_verifies_against_owner() {
        let signer = StarkSigner::new_from_hex_str(
            "0x0139fe4d6f02e666e86a6f58e65060f115cd3c185bd9e98bd829636931458f79",
        )
        .unwrap();
        let message = starknet().build_auth_message(&tx()).unwrap();
        let signature = TxLayer1Signature::StarkSignature(
            signer
                .sign_hash(&Felt::from_bytes_be(&message.digest()))
                .unwrap(),
        );
        let owner = Layer1Identity::Starknet(signer.public_key());
        assert!(signature.verify(&message, &owner));

        let other_message = L1SignerType::Starknet {
            chain_id: "SN_SEPOLIA".to_string(),
            address: STARK_ADDRESS.to_string(),
        }
        .build_auth_message(&tx())
        .unwrap();
        assert!(!signature.verify(&other_message, &owner));
    }

    #[test]
    fn starknet_params_are_validated() {
        let bad = L1SignerType::Starknet {
            chain_id: "SN_MAIN".to_string(),
            address: "not-an-address".to_string(),
        };
        assert!(bad.validate().is_err());
        assert!(bad.build_auth_message(&tx()).is_err());
        assert!(starknet().validate().is_ok());
        assert!(L1SignerType::Eth.validate().is_ok());
    }

    #[test]
    fn layer1_signature_json() {
        let mut raw = [0u8; 65];
        raw[64] = 0x1b;
        let signature = TxLayer1Signature::EthereumSignature(
            PackedEthSignature::deserialize_packed(&raw).unwrap(),
        );
        let json = serde_json::to_value(signature).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "EthereumSignature",
                "signature": format!("0x{}1b", "00".repeat(64)),
            })
        );
        assert_eq!(
            serde_json::from_value::<TxLayer1Signature>(json).unwrap(),
            signature
        );
    }

    #[test]
    fn signer_type_json() {
        let json = serde_json::to_value(starknet()).unwrap();
        assert_eq!(json["type"], "Starknet");
        assert_eq!(json["chainId"], "SN_MAIN");
        assert_eq!(
            serde_json::from_value::<L1SignerType>(serde_json::json!({ "type": "Eth" })).unwrap(),
            L1SignerType::Eth
        );
    }
}
