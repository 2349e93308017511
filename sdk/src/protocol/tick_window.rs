//! Tick-array windows for swap-bearing instructions.

use orca_whirlpools_core::get_tick_array_start_tick_index;
use solana_sdk::pubkey::Pubkey;

use super::pda::PdaBuilder;
use crate::core::{
    SdkError, SdkResult, SwapDirection, MAX_SWAP_TICK_ARRAYS, MAX_TICK_INDEX, MIN_TICK_INDEX,
    TICK_ARRAY_SIZE,
};

/// Ticks covered by one tick array
pub fn ticks_per_array(tick_spacing: u16) -> i32 {
    TICK_ARRAY_SIZE as i32 * tick_spacing as i32
}

/// Start index of the tick array containing `tick_index`, moved `offset`
/// whole arrays up (positive) or down (negative).
///
/// Returns `None` when the result leaves the AMM's valid start-index range or
/// `tick_spacing` is zero.
pub fn start_tick_index(tick_index: i32, tick_spacing: u16, offset: i32) -> Option<i32> {
    if tick_spacing == 0 {
        return None;
    }
    let ticks_in_array = ticks_per_array(tick_spacing);
    let start = get_tick_array_start_tick_index(tick_index, tick_spacing)
        .checked_add(offset.checked_mul(ticks_in_array)?)?;

    let min_start = MIN_TICK_INDEX - (MIN_TICK_INDEX % ticks_in_array + ticks_in_array);
    if start < min_start || start > MAX_TICK_INDEX {
        return None;
    }
    Some(start)
}

/// Tick-array start index for a position bound
pub fn checked_start_tick_index(tick_index: i32, tick_spacing: u16) -> SdkResult<i32> {
    start_tick_index(tick_index, tick_spacing, 0).ok_or(SdkError::TickOutOfRange(tick_index))
}

/// Ordered tick arrays a swap starting at `tick_current_index` walks through.
///
/// The walk begins at the array holding the current tick; for token-B-in the
/// current tick is shifted up one tick spacing first, since a price sitting on
/// the last tick of an array trades into the next one. At most `max_count`
/// addresses are returned. The walk stops early, without error, once the next
/// start index would leave the valid range.
pub fn tick_array_window(
    pda: &PdaBuilder,
    whirlpool: &Pubkey,
    tick_current_index: i32,
    tick_spacing: u16,
    direction: SwapDirection,
    max_count: usize,
) -> Vec<Pubkey> {
    let shift = match direction {
        SwapDirection::AToB => 0,
        SwapDirection::BToA => tick_spacing as i32,
    };
    let step = match direction {
        SwapDirection::AToB => -1,
        SwapDirection::BToA => 1,
    };

    let mut window = Vec::with_capacity(max_count);
    let mut offset = 0i32;
    for _ in 0..max_count {
        let Some(start) =
            start_tick_index(tick_current_index.saturating_add(shift), tick_spacing, offset)
        else {
            break;
        };
        window.push(pda.tick_array(whirlpool, start).0);
        offset += step;
    }
    window
}

/// Fit a window to the fixed tick-array slots of a swap instruction.
///
/// A short window repeats its last entry; an empty one means the current
/// tick itself is out of range.
pub fn swap_tick_arrays(
    window: &[Pubkey],
    tick_current_index: i32,
) -> SdkResult<[Pubkey; MAX_SWAP_TICK_ARRAYS]> {
    let last = *window
        .last()
        .ok_or(SdkError::TickOutOfRange(tick_current_index))?;
    let mut slots = [last; MAX_SWAP_TICK_ARRAYS];
    for (slot, address) in slots.iter_mut().zip(window) {
        *slot = *address;
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_start_index_rounds_down() {
        assert_eq!(start_tick_index(1000, 64, 0), Some(0));
        assert_eq!(start_tick_index(5631, 64, 0), Some(0));
        assert_eq!(start_tick_index(5632, 64, 0), Some(5632));
        assert_eq!(start_tick_index(-1, 64, 0), Some(-5632));
        assert_eq!(start_tick_index(1000, 64, 2), Some(11264));
        assert_eq!(start_tick_index(1000, 64, -1), Some(-5632));
        assert_eq!(start_tick_index(1000, 0, 0), None);
    }

    #[test]
    fn test_start_index_agrees_with_amm_rounding() {
        for spacing in [1u16, 8, 64, 128] {
            for tick in [-443_000, -5633, -5632, -1, 0, 1, 5631, 77_777, 443_000] {
                let start = start_tick_index(tick, spacing, 0).unwrap();
                assert_eq!(start, get_tick_array_start_tick_index(tick, spacing));
                assert!(start <= tick && tick < start + ticks_per_array(spacing));
            }
        }
    }

    #[test]
    fn test_start_index_bounds() {
        // spacing 1: arrays of 88 ticks; the lowest valid start sits below MIN_TICK_INDEX
        let lowest = start_tick_index(MIN_TICK_INDEX, 1, 0).unwrap();
        assert!(lowest <= MIN_TICK_INDEX);
        assert_eq!(start_tick_index(MIN_TICK_INDEX, 1, -1), None);

        let highest = start_tick_index(MAX_TICK_INDEX, 1, 0).unwrap();
        assert!(highest <= MAX_TICK_INDEX && highest + 88 > MAX_TICK_INDEX);
        assert_eq!(start_tick_index(MAX_TICK_INDEX, 1, 1), None);
    }

    #[test]
    fn test_window_walks_with_direction() {
        let pda = PdaBuilder::default();
        let pool = Pubkey::new_unique();

        let down = tick_array_window(&pda, &pool, 1000, 64, SwapDirection::AToB, 3);
        let expected_down: Vec<Pubkey> = [0, -5632, -11264]
            .iter()
            .map(|s| pda.tick_array(&pool, *s).0)
            .collect();
        assert_eq!(down, expected_down);

        let up = tick_array_window(&pda, &pool, 1000, 64, SwapDirection::BToA, 3);
        let expected_up: Vec<Pubkey> = [0, 5632, 11264]
            .iter()
            .map(|s| pda.tick_array(&pool, *s).0)
            .collect();
        assert_eq!(up, expected_up);
    }

    #[test]
    fn test_b_to_a_shift_at_array_edge() {
        let pda = PdaBuilder::default();
        let pool = Pubkey::new_unique();

        // Last initializable tick of array 0 for spacing 64
        let window = tick_array_window(&pda, &pool, 5568, 64, SwapDirection::BToA, 1);
        assert_eq!(window, vec![pda.tick_array(&pool, 5632).0]);

        let window = tick_array_window(&pda, &pool, 5568, 64, SwapDirection::AToB, 1);
        assert_eq!(window, vec![pda.tick_array(&pool, 0).0]);
    }

    #[test]
    fn test_window_is_bounded_and_unique() {
        let pda = PdaBuilder::default();
        let pool = Pubkey::new_unique();
        for direction in [SwapDirection::AToB, SwapDirection::BToA] {
            for tick in [-20_000, -1, 0, 1000, 77_777] {
                let window = tick_array_window(&pda, &pool, tick, 8, direction, 3);
                assert_eq!(window.len(), 3);
                let unique: HashSet<_> = window.iter().collect();
                assert_eq!(unique.len(), window.len());
            }
        }
    }

    #[test]
    fn test_window_shortens_near_extremes() {
        let pda = PdaBuilder::default();
        let pool = Pubkey::new_unique();

        let near_max = tick_array_window(&pda, &pool, MAX_TICK_INDEX - 10, 64, SwapDirection::BToA, 3);
        assert!(!near_max.is_empty() && near_max.len() < 3);

        let near_min = tick_array_window(&pda, &pool, MIN_TICK_INDEX + 10, 64, SwapDirection::AToB, 3);
        assert!(!near_min.is_empty() && near_min.len() < 3);

        // Away from the edge the same spacing yields a full window
        assert_eq!(
            tick_array_window(&pda, &pool, MAX_TICK_INDEX - 10, 64, SwapDirection::AToB, 3).len(),
            3
        );
    }

    #[test]
    fn test_window_is_deterministic() {
        let pda = PdaBuilder::default();
        let pool = Pubkey::new_unique();
        let a = tick_array_window(&pda, &pool, -4242, 16, SwapDirection::BToA, 3);
        let b = tick_array_window(&PdaBuilder::default(), &pool, -4242, 16, SwapDirection::BToA, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_swap_tick_arrays_pads_short_window() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert_eq!(swap_tick_arrays(&[a, b], 0).unwrap(), [a, b, b]);
        assert!(matches!(
            swap_tick_arrays(&[], 9),
            Err(SdkError::TickOutOfRange(9))
        ));
    }
}
