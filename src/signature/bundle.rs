use crate::prelude::Result;
use crate::signature::l1::{L1SignerType, Layer1Identity, TxLayer1Signature};
use crate::signature::zklink::ZkLinkSignature;
use crate::tx::{encoding, ChangePubKey, ChangePubKeyAuthData, Create2Data};
use crate::Error;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Everything a verifier needs about a signed `ChangePubKey`: the canonical
/// bytes, the primary signature over them and the L1 authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSignature {
    #[serde(with = "crate::helpers::prefixed_hex")]
    tx: Vec<u8>,
    signature: ZkLinkSignature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layer1_signature: Option<TxLayer1Signature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    create2_data: Option<Create2Data>,
}

impl TxSignature {
    pub fn compose(
        tx_bytes: Vec<u8>,
        signature: ZkLinkSignature,
        layer1_signature: Option<TxLayer1Signature>,
    ) -> Self {
        Self {
            tx: tx_bytes,
            signature,
            layer1_signature,
            create2_data: None,
        }
    }

    pub(crate) fn with_create2_data(mut self, data: Create2Data) -> Self {
        self.create2_data = Some(data);
        self
    }

    pub fn tx_bytes(&self) -> &[u8] {
        &self.tx
    }

    pub fn signature(&self) -> &ZkLinkSignature {
        &self.signature
    }

    pub fn layer1_signature(&self) -> Option<&TxLayer1Signature> {
        self.layer1_signature.as_ref()
    }

    pub fn create2_data(&self) -> Option<&Create2Data> {
        self.create2_data.as_ref()
    }

    /// The transaction back from its canonical bytes, with auth data restored
    /// from the bundle.
    pub fn decode_tx(&self) -> Result<ChangePubKey> {
        let tx = encoding::decode(&self.tx)?;
        let auth_data = match (&self.create2_data, self.layer1_signature) {
            (Some(_), Some(_)) => return Err(conflicting_auth()),
            (Some(data), None) => ChangePubKeyAuthData::EthCreate2 { data: data.clone() },
            (None, Some(signature)) => signature.into_auth_data(),
            (None, None) => ChangePubKeyAuthData::Onchain,
        };
        Ok(tx.with_auth_data(auth_data))
    }

    pub fn verify_tx_signature(&self) -> bool {
        self.signature.verify_musig(&self.tx)
    }

    /// Whether the signing key is the key the transaction installs.
    pub fn signature_binds_new_pk_hash(&self) -> bool {
        encoding::decode(&self.tx)
            .map(|tx| *tx.new_pk_hash() == self.signature.pub_key.public_key_hash())
            .unwrap_or(false)
    }

    /// Checks the L1 authorization against `identity`.
    ///
    /// Errors only when the bundle cannot be decoded or the signer type cannot
    /// build a message; a missing or wrong signature is `Ok(false)`.
    pub fn verify_layer1_signature(
        &self,
        l1_type: &L1SignerType,
        identity: &Layer1Identity,
    ) -> Result<bool> {
        let tx = encoding::decode(&self.tx)?;
        let message = l1_type.build_auth_message(&tx)?;
        Ok(self
            .layer1_signature
            .map(|signature| signature.verify(&message, identity))
            .unwrap_or(false))
    }

    /// SHA-256 of the canonical bytes.
    pub fn tx_hash(&self) -> [u8; 32] {
        Sha256::digest(&self.tx).into()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::JsonParse(e.to_string()))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let bundle: Self =
            serde_json::from_str(s).map_err(|e| Error::JsonParse(e.to_string()))?;
        if bundle.create2_data.is_some() && bundle.layer1_signature.is_some() {
            return Err(conflicting_auth());
        }
        Ok(bundle)
    }
}

fn conflicting_auth() -> Error {
    Error::validation(
        "layer1Signature",
        "a bundle cannot carry both CREATE2 data and an L1 signature",
    )
}
