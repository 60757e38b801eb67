//! Decimal floating-point packing for fee amounts.
//!
//! A packed amount is `mantissa * 10^exponent`, laid out big-endian as
//! `mantissa << exponent_len | exponent`. Packing rounds down, so an amount is
//! only usable in a transaction when it survives a pack/unpack round trip.

use crate::consts::{FEE_EXPONENT_BIT_WIDTH, FEE_MANTISSA_BIT_WIDTH, MAX_PACKABLE_FEE};
use crate::prelude::Result;
use crate::Error;

const EXPONENT_BASE: u128 = 10;

/// Widest exponent field: `10^exponent` must index with a `u32` power.
const MAX_EXPONENT_LEN: usize = 31;
const MAX_MANTISSA_LEN: usize = 64;

fn check_layout(exponent_len: usize, mantissa_len: usize) -> Result<()> {
    let total_len = exponent_len + mantissa_len;
    if total_len % 8 != 0
        || total_len > 64
        || exponent_len > MAX_EXPONENT_LEN
        || mantissa_len > MAX_MANTISSA_LEN
    {
        return Err(Error::Encoding(format!(
            "unsupported float layout {exponent_len}+{mantissa_len} bits"
        )));
    }
    Ok(())
}

/// Packs `amount` to the closest float that is less or equal to it.
pub fn pack(amount: u128, exponent_len: usize, mantissa_len: usize) -> Result<Vec<u8>> {
    check_layout(exponent_len, mantissa_len)?;
    let total_len = exponent_len + mantissa_len;

    let max_power = (1u32 << exponent_len) - 1;
    let max_exponent = EXPONENT_BASE.saturating_pow(max_power);
    let max_mantissa = (1u128 << mantissa_len) - 1;
    if amount > max_mantissa.saturating_mul(max_exponent) {
        return Err(Error::Encoding(format!(
            "amount {amount} exceeds the {total_len}-bit float range"
        )));
    }

    // Minimal exponent such that amount <= max_mantissa * base^exponent. When it
    // is above zero, one step lower with a saturated mantissa can be closer.
    // A limit past u128::MAX always covers the amount.
    let mut exponent = 0u64;
    let mut scale = 1u128;
    while max_mantissa
        .checked_mul(scale)
        .is_some_and(|limit| amount > limit)
    {
        scale = scale
            .checked_mul(EXPONENT_BASE)
            .ok_or_else(|| Error::Encoding(format!("amount {amount} overflows the scale")))?;
        exponent += 1;
    }
    let (exponent, mantissa) = if exponent == 0 {
        (0, amount)
    } else {
        let mantissa = amount / scale;
        let diff_exact = amount - mantissa * scale;
        let diff_saturated = amount - max_mantissa * (scale / EXPONENT_BASE);
        if diff_exact < diff_saturated {
            (exponent, mantissa)
        } else {
            (exponent - 1, max_mantissa)
        }
    };

    let packed = ((mantissa as u64) << exponent_len) | exponent;
    let bytes = packed.to_be_bytes();
    Ok(bytes[8 - total_len / 8..].to_vec())
}

/// Returns `None` when the layout does not match `data` or the value overflows `u128`.
pub fn unpack(data: &[u8], exponent_len: usize, mantissa_len: usize) -> Option<u128> {
    check_layout(exponent_len, mantissa_len).ok()?;
    if exponent_len + mantissa_len != data.len() * 8 {
        return None;
    }
    let packed = data
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    let exponent = (packed & ((1u64 << exponent_len) - 1)) as u32;
    let mantissa = u128::from(packed >> exponent_len);
    EXPONENT_BASE
        .checked_pow(exponent)
        .and_then(|scale| mantissa.checked_mul(scale))
}

pub fn pack_fee_amount(amount: u128) -> Result<[u8; 2]> {
    let packed = pack(amount, FEE_EXPONENT_BIT_WIDTH, FEE_MANTISSA_BIT_WIDTH)?;
    let mut out = [0u8; 2];
    out.copy_from_slice(&packed);
    Ok(out)
}

pub fn unpack_fee_amount(data: &[u8]) -> Option<u128> {
    unpack(data, FEE_EXPONENT_BIT_WIDTH, FEE_MANTISSA_BIT_WIDTH)
}

/// Whether the fee survives packing unchanged (and thus may be used in a transaction).
pub fn is_fee_amount_packable(amount: u128) -> bool {
    if amount > MAX_PACKABLE_FEE {
        return false;
    }
    pack_fee_amount(amount)
        .ok()
        .and_then(|packed| unpack_fee_amount(&packed))
        == Some(amount)
}

/// The largest packable fee not above `amount`.
pub fn closest_packable_fee_amount(amount: u128) -> Result<u128> {
    let packed = pack_fee_amount(amount)?;
    unpack_fee_amount(&packed)
        .ok_or_else(|| Error::Encoding(format!("fee {amount} does not repack")))
}
