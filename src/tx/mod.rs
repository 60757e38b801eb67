mod builder;
mod change_pubkey;
pub mod encoding;
pub mod float;
mod request;

pub use builder::build;
pub use change_pubkey::{ChangePubKey, ChangePubKeyAuthData, Create2Data};
pub use request::ChangePubKeyRequest;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &$inner {
                &self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Layer-2 chain partition the transaction targets.
    ChainId(u8)
);
id_type!(AccountId(u32));
id_type!(SubAccountId(u8));
id_type!(
    /// Fee token; the canonical layout gives it 16 bits.
    TokenId(u16)
);
id_type!(Nonce(u32));
id_type!(
    /// Seconds since epoch, 32 bits wide on the wire.
    TimeStamp(u32)
);
