use crate::signature::eth::PackedEthSignature;
use crate::signature::starknet::StarkEcdsaSignature;
use crate::signature::zklink::PubKeyHash;
use crate::tx::encoding;
use crate::tx::{AccountId, ChainId, Nonce, SubAccountId, TimeStamp, TokenId};
use ethers::types::{Address, H256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Inputs of a counterfactual (CREATE2) account address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Create2Data {
    pub creator_address: Address,
    pub salt_arg: H256,
    pub code_hash: H256,
}

impl Create2Data {
    pub fn salt(&self, pubkey_hash: &[u8]) -> [u8; 32] {
        let mut bytes = Vec::with_capacity(32 + pubkey_hash.len());
        bytes.extend_from_slice(self.salt_arg.as_bytes());
        bytes.extend_from_slice(pubkey_hash);
        keccak256(bytes)
    }

    /// Address the creator deploys to when the salt is bound to `pubkey_hash`.
    pub fn get_address(&self, pubkey_hash: &[u8]) -> Address {
        let salt = self.salt(pubkey_hash);
        let mut bytes = Vec::with_capacity(1 + 20 + 32 + 32);
        bytes.push(0xff);
        bytes.extend_from_slice(self.creator_address.as_bytes());
        bytes.extend_from_slice(&salt);
        bytes.extend_from_slice(self.code_hash.as_bytes());
        Address::from_slice(&keccak256(bytes)[12..])
    }
}

/// How the L1 owner of the account authorizes the new key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChangePubKeyAuthData {
    /// Authorized by a prior L1 contract call.
    #[default]
    Onchain,
    EthECDSA {
        #[serde(rename = "ethSignature")]
        eth_signature: PackedEthSignature,
    },
    StarkECDSA {
        #[serde(rename = "starkSignature")]
        stark_signature: StarkEcdsaSignature,
    },
    EthCreate2 { data: Create2Data },
}

impl ChangePubKeyAuthData {
    pub fn is_onchain(&self) -> bool {
        matches!(self, ChangePubKeyAuthData::Onchain)
    }

    pub fn is_eth_ecdsa(&self) -> bool {
        matches!(self, ChangePubKeyAuthData::EthECDSA { .. })
    }

    pub fn is_create2(&self) -> bool {
        matches!(self, ChangePubKeyAuthData::EthCreate2 { .. })
    }

    /// Witness bytes the L1 contract checks for Ethereum authorizations:
    /// `0x00 ‖ r ‖ s ‖ v(27|28)` for ECDSA, `0x01 ‖ creator ‖ salt ‖ code_hash` for CREATE2.
    pub fn get_eth_witness(&self) -> Option<Vec<u8>> {
        match self {
            ChangePubKeyAuthData::Onchain | ChangePubKeyAuthData::StarkECDSA { .. } => None,
            ChangePubKeyAuthData::EthECDSA { eth_signature } => {
                let packed = eth_signature.serialize_packed();
                let mut bytes = Vec::with_capacity(66);
                bytes.push(0x00);
                bytes.extend_from_slice(&packed[..64]);
                let mut v = packed[64];
                if v == 0 || v == 1 {
                    v += 27;
                }
                bytes.push(v);
                Some(bytes)
            }
            ChangePubKeyAuthData::EthCreate2 { data } => {
                let mut bytes = Vec::with_capacity(1 + 20 + 32 + 32);
                bytes.push(0x01);
                bytes.extend_from_slice(data.creator_address.as_bytes());
                bytes.extend_from_slice(data.salt_arg.as_bytes());
                bytes.extend_from_slice(data.code_hash.as_bytes());
                Some(bytes)
            }
        }
    }
}

/// `ChangePubKey` sets the public key hash that authorizes all further L2
/// transactions of an account.
///
/// Values only come out of the builder or the canonical decoder, so every
/// field already fits its slot in the canonical layout and the fee is exactly
/// packable. There are no setters; signing consumes the value and returns a
/// separate [`crate::TxSignature`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePubKey {
    pub(crate) chain_id: ChainId,
    pub(crate) account_id: AccountId,
    pub(crate) sub_account_id: SubAccountId,
    pub(crate) new_pk_hash: PubKeyHash,
    pub(crate) fee_token: TokenId,
    #[serde(with = "crate::helpers::u128_dec_str")]
    pub(crate) fee: u128,
    #[serde(skip)]
    pub(crate) packed_fee: [u8; 2],
    pub(crate) nonce: Nonce,
    #[serde(rename = "ethAuthData")]
    pub(crate) auth_data: ChangePubKeyAuthData,
    pub(crate) ts: TimeStamp,
}

impl ChangePubKey {
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn sub_account_id(&self) -> SubAccountId {
        self.sub_account_id
    }

    pub fn new_pk_hash(&self) -> &PubKeyHash {
        &self.new_pk_hash
    }

    pub fn fee_token(&self) -> TokenId {
        self.fee_token
    }

    pub fn fee(&self) -> u128 {
        self.fee
    }

    pub fn nonce(&self) -> Nonce {
        self.nonce
    }

    pub fn timestamp(&self) -> TimeStamp {
        self.ts
    }

    pub fn auth_data(&self) -> &ChangePubKeyAuthData {
        &self.auth_data
    }

    pub fn is_onchain(&self) -> bool {
        self.auth_data.is_onchain()
    }

    /// Canonical bytes, see [`encoding::encode`].
    pub fn get_bytes(&self) -> Vec<u8> {
        encoding::encode(self)
    }

    /// SHA-256 of the canonical bytes.
    pub fn tx_hash(&self) -> [u8; 32] {
        Sha256::digest(self.get_bytes()).into()
    }

    /// Same transaction with different authorization. Auth data is not part
    /// of the canonical bytes, so the primary signature is unaffected.
    pub(crate) fn with_auth_data(mut self, auth_data: ChangePubKeyAuthData) -> Self {
        self.auth_data = auth_data;
        self
    }
}
