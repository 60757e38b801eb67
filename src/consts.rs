/// Transaction type tag written as the first canonical byte.
pub const CHANGE_PUBKEY_TX_TYPE: u8 = 0x06;

pub const CHAIN_ID_BIT_WIDTH: usize = 8;
pub const ACCOUNT_ID_BIT_WIDTH: usize = 32;
pub const SUB_ACCOUNT_ID_BIT_WIDTH: usize = 8;
pub const TOKEN_BIT_WIDTH: usize = 16;
pub const TX_TYPE_BIT_WIDTH: usize = 8;
pub const NONCE_BIT_WIDTH: usize = 32;
pub const TIMESTAMP_BIT_WIDTH: usize = 32;

/// An account whose nonce reached this value can no longer transact.
pub const MAX_NONCE: u32 = u32::MAX;

pub const NEW_PUBKEY_HASH_BYTES_LEN: usize = 20;
pub const NEW_PUBKEY_HASH_WIDTH: usize = NEW_PUBKEY_HASH_BYTES_LEN * 8;

/// Fee float: value = mantissa * 10^exponent
pub const FEE_EXPONENT_BIT_WIDTH: usize = 5;
pub const FEE_MANTISSA_BIT_WIDTH: usize = 11;

/// Largest fee the packed float can express: (2^11 - 1) * 10^31.
pub const MAX_PACKABLE_FEE: u128 = 20_470_000_000_000_000_000_000_000_000_000_000;

pub const SIGNED_CHANGE_PUBKEY_BIT_WIDTH: usize = TX_TYPE_BIT_WIDTH
    + CHAIN_ID_BIT_WIDTH
    + ACCOUNT_ID_BIT_WIDTH
    + SUB_ACCOUNT_ID_BIT_WIDTH
    + NEW_PUBKEY_HASH_WIDTH
    + TOKEN_BIT_WIDTH
    + FEE_EXPONENT_BIT_WIDTH
    + FEE_MANTISSA_BIT_WIDTH
    + NONCE_BIT_WIDTH
    + TIMESTAMP_BIT_WIDTH;

pub const CHANGE_PUBKEY_BYTES_LEN: usize = SIGNED_CHANGE_PUBKEY_BIT_WIDTH / 8;

/// Depth of the sub-account tree; chain ids share the same partition width.
pub const SUB_ACCOUNT_TREE_DEPTH: u32 = 5;
pub const MAX_CHAIN_ID: u8 = (1 << SUB_ACCOUNT_TREE_DEPTH) - 1;
pub const MAX_SUB_ACCOUNT_ID: u8 = (1 << SUB_ACCOUNT_TREE_DEPTH) - 1;

/// Account ids are leaves of a 24-level tree.
pub const USED_ACCOUNT_SUBTREE_DEPTH: u32 = 24;
pub const MAX_ACCOUNT_ID: u32 = (1 << USED_ACCOUNT_SUBTREE_DEPTH) - 1;
/// Holds the L1 contracts' remaining assets; never the subject of a user transaction.
pub const GLOBAL_ASSET_ACCOUNT_ID: u32 = 1;

pub const MAX_TOKEN_ID: u32 = u16::MAX as u32;
pub const USD_TOKEN_ID: u32 = 1;
pub const USDX_TOKEN_ID_LOWER_BOUND: u32 = USD_TOKEN_ID + 1;
pub const USDX_TOKEN_ID_UPPER_BOUND: u32 = 16;

pub const ETH_SIGNATURE_LEN: usize = 65;
pub const STARK_SIGNATURE_LEN: usize = 96;
pub const ZKLINK_PUBKEY_LEN: usize = 32;
pub const ZKLINK_SIGNATURE_LEN: usize = 64;

/// Starknet personal-message domain prefix.
pub const STARKNET_MESSAGE_PREFIX: &str = "StarkNet Message";
