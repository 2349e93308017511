//! Price, tick and liquidity conversions on the AMM's Q64.64 sqrt-price grid.

use ethnum::U256;
use orca_whirlpools_core::{
    sqrt_price_to_tick_index, tick_index_to_sqrt_price, try_get_amount_delta_a,
    try_get_amount_delta_b, U128,
};

use crate::core::{SdkError, SdkResult, MAX_SQRT_PRICE, MAX_TICK_INDEX, MIN_SQRT_PRICE, MIN_TICK_INDEX};

/// Sqrt price (Q64.64) at a tick, rejecting ticks outside the AMM range
pub fn tick_sqrt_price(tick_index: i32) -> SdkResult<u128> {
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_index) {
        return Err(SdkError::TickOutOfRange(tick_index));
    }
    Ok(u128::from(tick_index_to_sqrt_price(tick_index)))
}

/// Convert a human-readable price of A in B to a Q64.64 sqrt price
pub fn price_to_sqrt_price_x64(price: f64, decimals_a: u8, decimals_b: u8) -> SdkResult<u128> {
    if !price.is_finite() || price <= 0.0 {
        return Err(SdkError::InvalidParameters(format!(
            "price must be positive and finite, got {}",
            price
        )));
    }
    let sqrt_price = u128::from(orca_whirlpools_core::price_to_sqrt_price(price, decimals_a, decimals_b));
    Ok(sqrt_price.clamp(MIN_SQRT_PRICE, MAX_SQRT_PRICE))
}

/// Tick index at or below a human-readable price
pub fn price_to_tick_index(price: f64, decimals_a: u8, decimals_b: u8) -> SdkResult<i32> {
    let sqrt_price = price_to_sqrt_price_x64(price, decimals_a, decimals_b)?;
    Ok(sqrt_price_to_tick_index(U128::from(sqrt_price)))
}

/// Human-readable price of A in B at a tick
pub fn tick_index_to_price(tick_index: i32, decimals_a: u8, decimals_b: u8) -> f64 {
    orca_whirlpools_core::tick_index_to_price(tick_index, decimals_a, decimals_b)
}

/// Round a tick toward zero to a multiple of the pool's tick spacing
pub fn initializable_tick_index(tick_index: i32, tick_spacing: u16) -> i32 {
    tick_index - tick_index.checked_rem(tick_spacing as i32).unwrap_or(0)
}

/// Token amounts represented by `liquidity` between two sqrt prices
pub fn token_amounts_from_liquidity(
    liquidity: u128,
    current_sqrt_price: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    round_up: bool,
) -> SdkResult<(u64, u64)> {
    if sqrt_price_lower >= sqrt_price_upper {
        return Err(SdkError::InvalidParameters(
            "lower sqrt price must be below upper sqrt price".to_string(),
        ));
    }
    if liquidity == 0 {
        return Ok((0, 0));
    }

    // Below the range: all token A
    if current_sqrt_price <= sqrt_price_lower {
        let a = amount_a_delta(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        return Ok((a, 0));
    }
    // Above the range: all token B
    if current_sqrt_price >= sqrt_price_upper {
        let b = amount_b_delta(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
        return Ok((0, b));
    }
    let a = amount_a_delta(current_sqrt_price, sqrt_price_upper, liquidity, round_up)?;
    let b = amount_b_delta(sqrt_price_lower, current_sqrt_price, liquidity, round_up)?;
    Ok((a, b))
}

/// Largest liquidity the given amounts can back in `[tick_lower, tick_upper)`
/// at `tick_current_index`
pub fn liquidity_from_token_amounts(
    tick_current_index: i32,
    tick_lower_index: i32,
    tick_upper_index: i32,
    amount_a: u64,
    amount_b: u64,
) -> SdkResult<u128> {
    if tick_lower_index >= tick_upper_index {
        return Err(SdkError::InvalidParameters(format!(
            "tick bounds out of order ({} >= {})",
            tick_lower_index, tick_upper_index
        )));
    }
    let sqrt_lower = tick_sqrt_price(tick_lower_index)?;
    let sqrt_upper = tick_sqrt_price(tick_upper_index)?;

    if tick_current_index >= tick_upper_index {
        return liquidity_for_amount_b(sqrt_lower, sqrt_upper, amount_b);
    }
    if tick_current_index < tick_lower_index {
        return liquidity_for_amount_a(sqrt_lower, sqrt_upper, amount_a);
    }

    let sqrt_current = tick_sqrt_price(tick_current_index)?;
    let from_a = liquidity_for_amount_a(sqrt_current, sqrt_upper, amount_a)?;
    let from_b = liquidity_for_amount_b(sqrt_lower, sqrt_current, amount_b)?;
    Ok(from_a.min(from_b))
}

fn liquidity_for_amount_a(sqrt_price_1: u128, sqrt_price_2: u128, amount: u64) -> SdkResult<u128> {
    let lower = sqrt_price_1.min(sqrt_price_2);
    let upper = sqrt_price_1.max(sqrt_price_2);
    if lower == upper {
        return Ok(0);
    }
    let numerator = U256::from(amount)
        .checked_mul(U256::from(upper))
        .and_then(|v| v.checked_mul(U256::from(lower)))
        .ok_or(SdkError::MathOverflow)?
        >> 64;
    let liquidity = numerator / U256::from(upper - lower);
    narrow(liquidity)
}

fn liquidity_for_amount_b(sqrt_price_1: u128, sqrt_price_2: u128, amount: u64) -> SdkResult<u128> {
    let lower = sqrt_price_1.min(sqrt_price_2);
    let upper = sqrt_price_1.max(sqrt_price_2);
    if lower == upper {
        return Ok(0);
    }
    let liquidity = (U256::from(amount) << 64) / U256::from(upper - lower);
    narrow(liquidity)
}

fn narrow(value: U256) -> SdkResult<u128> {
    if value > U256::from(u128::MAX) {
        return Err(SdkError::MathOverflow);
    }
    Ok(value.as_u128())
}

fn amount_a_delta(sqrt_price_1: u128, sqrt_price_2: u128, liquidity: u128, round_up: bool) -> SdkResult<u64> {
    try_get_amount_delta_a(
        U128::from(sqrt_price_1.min(sqrt_price_2)),
        U128::from(sqrt_price_1.max(sqrt_price_2)),
        U128::from(liquidity),
        round_up,
    )
    .map_err(|_| SdkError::MathOverflow)
}

fn amount_b_delta(sqrt_price_1: u128, sqrt_price_2: u128, liquidity: u128, round_up: bool) -> SdkResult<u64> {
    try_get_amount_delta_b(
        U128::from(sqrt_price_1.min(sqrt_price_2)),
        U128::from(sqrt_price_1.max(sqrt_price_2)),
        U128::from(liquidity),
        round_up,
    )
    .map_err(|_| SdkError::MathOverflow)
}
