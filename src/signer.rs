use crate::prelude::Result;
use crate::signature::{
    AuthMessage, EthSigner, L1SignerType, Layer1Identity, PackedPublicKey, PubKeyHash,
    StarkSigner, TxLayer1Signature, TxSignature, ZkLinkSignature, ZkLinkSigner,
};
use crate::signature::starknet::get_account_message_hash;
use crate::tx::{ChangePubKey, ChangePubKeyAuthData, Create2Data};
use crate::Error;
use ethers::types::{Address, H256};
use log::{debug, info};
use starknet_crypto::Felt;

/// L1 key of a [`Signer`], matching its [`L1SignerType`].
#[derive(Debug)]
pub enum Layer1Signer {
    Eth(EthSigner),
    Starknet(StarkSigner),
}

/// Owns the L2 key and the L1 key of one account and signs `ChangePubKey`
/// transactions end to end.
///
/// The L2 key is derived from the L1 key, so one private key is all a caller
/// holds.
#[derive(Debug)]
pub struct Signer {
    zklink_signer: ZkLinkSigner,
    layer1_signer: Layer1Signer,
    l1_type: L1SignerType,
}

impl Signer {
    pub fn new(private_key: &str, l1_type: L1SignerType) -> Result<Self> {
        l1_type.validate()?;
        let (zklink_signer, layer1_signer) = match &l1_type {
            L1SignerType::Eth => {
                let eth_signer = EthSigner::new_from_hex_str(private_key)?;
                let zklink_signer = ZkLinkSigner::new_from_eth_signer(&eth_signer)?;
                (zklink_signer, Layer1Signer::Eth(eth_signer))
            }
            L1SignerType::Starknet { .. } => {
                let stark_signer = StarkSigner::new_from_hex_str(private_key)?;
                let zklink_signer = ZkLinkSigner::new_from_stark_signer(&stark_signer)?;
                (zklink_signer, Layer1Signer::Starknet(stark_signer))
            }
        };
        let signer = Self {
            zklink_signer,
            layer1_signer,
            l1_type,
        };
        info!("signer ready, pubkey hash {}", signer.pubkey_hash());
        Ok(signer)
    }

    pub fn pubkey_hash(&self) -> PubKeyHash {
        self.zklink_signer.public_key().public_key_hash()
    }

    pub fn public_key(&self) -> PackedPublicKey {
        self.zklink_signer.public_key()
    }

    pub fn l1_type(&self) -> &L1SignerType {
        &self.l1_type
    }

    pub fn layer1_identity(&self) -> Layer1Identity {
        match &self.layer1_signer {
            Layer1Signer::Eth(signer) => Layer1Identity::Ethereum(signer.get_address()),
            Layer1Signer::Starknet(signer) => Layer1Identity::Starknet(signer.public_key()),
        }
    }

    /// The key change was (or will be) authorized by an L1 contract call, so
    /// only the primary signature is attached. A transaction that carries an
    /// L1 signature is refused.
    pub fn sign_change_pubkey_with_onchain_auth_data(
        &self,
        tx: ChangePubKey,
    ) -> Result<TxSignature> {
        if TxLayer1Signature::from_auth_data(tx.auth_data()).is_some() {
            return Err(Error::SignatureFailure(
                "transaction carries an L1 signature; use L1 auth signing".to_string(),
            ));
        }
        let tx = tx.with_auth_data(ChangePubKeyAuthData::Onchain);
        Ok(self.compose(&tx, None))
    }

    /// Primary signature plus an L1 signature over the auth message.
    ///
    /// A signature supplied with the request is kept byte for byte; it must be
    /// of the signer's L1 scheme. Otherwise the L1 key signs now.
    pub fn sign_change_pubkey_with_eth_ecdsa_auth(
        &self,
        tx: ChangePubKey,
    ) -> Result<TxSignature> {
        let layer1_signature = match TxLayer1Signature::from_auth_data(tx.auth_data()) {
            Some(supplied) => {
                self.check_scheme(&supplied)?;
                debug!("using supplied L1 signature for account {}", tx.account_id());
                supplied
            }
            None if tx.auth_data().is_create2() => {
                return Err(Error::SignatureFailure(
                    "transaction carries CREATE2 authorization".to_string(),
                ));
            }
            None => {
                let message = self.l1_type.build_auth_message(&tx)?;
                self.sign_auth_message(&message)?
            }
        };
        let tx = tx.with_auth_data(layer1_signature.into_auth_data());
        Ok(self.compose(&tx, Some(layer1_signature)))
    }

    /// Authorization by a counterfactual account: `data` must derive
    /// `account_address` from the transaction's new pubkey hash.
    pub fn sign_change_pubkey_with_create2data_auth(
        &self,
        tx: ChangePubKey,
        data: Create2Data,
        account_address: Address,
    ) -> Result<TxSignature> {
        let derived = data.get_address(tx.new_pk_hash().as_bytes());
        if derived != account_address {
            return Err(Error::validation(
                "create2Data",
                format!("derives {derived:?}, expected {account_address:?}"),
            ));
        }
        let tx = tx.with_auth_data(ChangePubKeyAuthData::EthCreate2 { data: data.clone() });
        Ok(self.compose(&tx, None).with_create2_data(data))
    }

    pub fn sign_layer_two_message(&self, msg: &[u8]) -> ZkLinkSignature {
        self.zklink_signer.sign_musig(msg)
    }

    /// Signs a free-form text with the L1 key: EIP-191 for Ethereum, the
    /// account-bound message hash for Starknet.
    pub fn sign_layer_one_message(&self, text: &str) -> Result<TxLayer1Signature> {
        match (&self.layer1_signer, &self.l1_type) {
            (Layer1Signer::Eth(signer), _) => Ok(TxLayer1Signature::EthereumSignature(
                signer.sign_message(text.as_bytes())?,
            )),
            (Layer1Signer::Starknet(signer), L1SignerType::Starknet { chain_id, address }) => {
                let hash = get_account_message_hash(chain_id, address, text.as_bytes())?;
                Ok(TxLayer1Signature::StarkSignature(signer.sign_hash(&hash)?))
            }
            (Layer1Signer::Starknet(_), L1SignerType::Eth) => Err(Error::SignatureFailure(
                "Starknet key without Starknet parameters".to_string(),
            )),
        }
    }

    fn sign_auth_message(&self, message: &AuthMessage) -> Result<TxLayer1Signature> {
        match &self.layer1_signer {
            Layer1Signer::Eth(signer) => Ok(TxLayer1Signature::EthereumSignature(
                signer.sign_hash(H256(message.digest()))?,
            )),
            Layer1Signer::Starknet(signer) => Ok(TxLayer1Signature::StarkSignature(
                signer.sign_hash(&Felt::from_bytes_be(&message.digest()))?,
            )),
        }
    }

    fn check_scheme(&self, signature: &TxLayer1Signature) -> Result<()> {
        match (signature, &self.layer1_signer) {
            (TxLayer1Signature::EthereumSignature(_), Layer1Signer::Eth(_))
            | (TxLayer1Signature::StarkSignature(_), Layer1Signer::Starknet(_)) => Ok(()),
            _ => Err(Error::SignatureFailure(
                "supplied L1 signature does not match the signer's L1 type".to_string(),
            )),
        }
    }

    fn compose(
        &self,
        tx: &ChangePubKey,
        layer1_signature: Option<TxLayer1Signature>,
    ) -> TxSignature {
        let bytes = tx.get_bytes();
        let signature = self.zklink_signer.sign_musig(&bytes);
        debug!(
            "signed ChangePubKey account={} nonce={} new_pk_hash={}",
            tx.account_id(),
            tx.nonce(),
            tx.new_pk_hash()
        );
        TxSignature::compose(bytes, signature, layer1_signature)
    }
}
