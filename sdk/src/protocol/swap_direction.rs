//! Which idle token to swap before compounding into a position.

use orca_whirlpools_core::{sqrt_price_to_tick_index, U128};

use super::math::{tick_sqrt_price, token_amounts_from_liquidity};
use crate::core::{SdkError, SdkResult, MAX_SQRT_PRICE, MIN_SQRT_PRICE};

/// Liquidity at which the position's token ratio is sampled
pub const REFERENCE_LIQUIDITY: u128 = 1 << 48;

/// `true` when idle token A is in excess of what the position absorbs at the
/// current price and should be swapped into B; `false` for B into A.
///
/// Pure: the caller supplies freshly fetched price, bounds and balances.
/// With the current tick at or below the lower bound the position holds only
/// A, so B is swapped; at or above the upper bound only B, so A is swapped.
/// In range the token ratio the position requires at the current price is
/// compared with the idle balances by cross-multiplication. The ratio does
/// not depend on the size of the position and is always sampled at
/// [`REFERENCE_LIQUIDITY`]. At the exact balance point no swap is needed and
/// `false` is returned.
pub fn is_token_a_to_b(
    current_sqrt_price: u128,
    _position_liquidity: u128,
    tick_lower_index: i32,
    tick_upper_index: i32,
    idle_a: u64,
    idle_b: u64,
) -> SdkResult<bool> {
    if tick_lower_index >= tick_upper_index {
        return Err(SdkError::InvalidParameters(format!(
            "tick bounds out of order ({} >= {})",
            tick_lower_index, tick_upper_index
        )));
    }
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&current_sqrt_price) {
        return Err(SdkError::InvalidParameters(format!(
            "sqrt price {} outside the AMM range",
            current_sqrt_price
        )));
    }
    let sqrt_lower = tick_sqrt_price(tick_lower_index)?;
    let sqrt_upper = tick_sqrt_price(tick_upper_index)?;

    let tick_current_index = sqrt_price_to_tick_index(U128::from(current_sqrt_price));
    if tick_current_index <= tick_lower_index {
        return Ok(false);
    }
    if tick_current_index >= tick_upper_index {
        return Ok(true);
    }

    let (required_a, required_b) = token_amounts_from_liquidity(
        REFERENCE_LIQUIDITY,
        current_sqrt_price,
        sqrt_lower,
        sqrt_upper,
        true,
    )?;
    if required_a == 0 && required_b == 0 {
        return Err(SdkError::InvalidParameters(
            "position requires no tokens at the current price".to_string(),
        ));
    }

    // idle_a / idle_b > required_a / required_b, without division
    let excess_a = (idle_a as u128)
        .checked_mul(required_b as u128)
        .ok_or(SdkError::MathOverflow)?;
    let excess_b = (idle_b as u128)
        .checked_mul(required_a as u128)
        .ok_or(SdkError::MathOverflow)?;
    Ok(excess_a > excess_b)
}
