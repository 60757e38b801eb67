pub mod bundle;
pub mod eth;
pub mod l1;
pub mod starknet;
pub mod zklink;

pub use bundle::TxSignature;
pub use eth::{EthSigner, PackedEthSignature};
pub use l1::{AuthMessage, L1SignerType, Layer1Identity, TxLayer1Signature};
pub use starknet::{StarkEcdsaSignature, StarkSigner};
pub use zklink::{PackedPublicKey, PubKeyHash, ZkLinkSignature, ZkLinkSigner};
