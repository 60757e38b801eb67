//! Builds, encodes and signs `ChangePubKey` transactions for an L2 rollup,
//! with optional Ethereum or Starknet authorization of the new key.
//!
//! ```no_run
//! use rollup_signer::{ChangePubKeyRequest, L1SignerType, Signer};
//!
//! # fn main() -> rollup_signer::prelude::Result<()> {
//! let signer = Signer::new(
//!     "0xb32593e347bf09436b058fbeabc17ebd2c7c1fa42e542f5f78fc3580faef83b7",
//!     L1SignerType::Eth,
//! )?;
//! let request = ChangePubKeyRequest::new(1, 2, 4, signer.pubkey_hash().as_hex(), 1, "100", 0);
//! let tx = request.build()?;
//! let bundle = signer.sign_change_pubkey_with_eth_ecdsa_auth(tx)?;
//! println!("{}", bundle.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod consts;
mod errors;
pub mod helpers;
pub mod prelude;
pub mod signature;
mod signer;
pub mod tx;

pub use errors::Error;
pub use signature::{
    AuthMessage, EthSigner, L1SignerType, Layer1Identity, PackedEthSignature, PackedPublicKey,
    PubKeyHash, StarkEcdsaSignature, StarkSigner, TxLayer1Signature, TxSignature, ZkLinkSignature,
    ZkLinkSigner,
};
pub use signer::{Layer1Signer, Signer};
pub use tx::{
    AccountId, ChainId, ChangePubKey, ChangePubKeyAuthData, ChangePubKeyRequest, Create2Data,
    Nonce, SubAccountId, TimeStamp, TokenId,
};
