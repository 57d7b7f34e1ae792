//! Two-sided liquidity sizing from live pool reserves.
//!
//! Given one side's desired contribution and a cap on the other side's
//! available balance, computes both deposit amounts at the pool's current
//! ratio. The ratio is carried in 1e18 fixed point; when the desired
//! amount would require more of the other asset than is available, the
//! pair is clamped to the available amount and the first side is
//! back-solved from the same ratio.

use ethers::types::U256;
use thiserror::Error;

use crate::types::apply_bps;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizingError {
    /// Reserve ratio is zero, overflows, or truncates an amount to zero.
    #[error("pair cannot be sized from reserves")]
    UnsizablePair,
}

/// Sized contributions for one liquidity call. Minimums carry the
/// configured slippage tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairAmounts {
    pub amount_x: U256,
    pub amount_y: U256,
    pub min_x: U256,
    pub min_y: U256,
    /// Set when the pool had no reserves and the inputs passed through
    /// unscaled as the pool's first liquidity.
    pub first_liquidity: bool,
}

fn scale() -> U256 {
    U256::exp10(18)
}

/// Size a two-sided deposit of `desired_x` of asset X against at most
/// `available_y` of asset Y, at the ratio implied by the reserves.
///
/// A zero input is refused before the empty-pool passthrough is
/// considered; no caller may submit a zero-amount deposit, so a zero
/// input against an unseeded pool is still `UnsizablePair` rather than
/// a passthrough.
pub fn size_liquidity_pair(
    reserve_x: U256,
    reserve_y: U256,
    desired_x: U256,
    available_y: U256,
    slippage_bps: u64,
) -> Result<PairAmounts, SizingError> {
    if desired_x.is_zero() || available_y.is_zero() {
        return Err(SizingError::UnsizablePair);
    }
    let min_bps = 10_000u64.saturating_sub(slippage_bps);

    // An empty pool has no ratio to respect; the caller's amounts set it.
    if reserve_x.is_zero() || reserve_y.is_zero() {
        return Ok(PairAmounts {
            amount_x: desired_x,
            amount_y: available_y,
            min_x: apply_bps(desired_x, min_bps),
            min_y: apply_bps(available_y, min_bps),
            first_liquidity: true,
        });
    }

    let ratio = reserve_y
        .checked_mul(scale())
        .ok_or(SizingError::UnsizablePair)?
        / reserve_x;
    if ratio.is_zero() {
        return Err(SizingError::UnsizablePair);
    }

    let mut amount_x = desired_x;
    let mut amount_y = amount_x
        .checked_mul(ratio)
        .ok_or(SizingError::UnsizablePair)?
        / scale();

    if amount_y > available_y {
        // Clamp to what is available and back-solve the X side.
        amount_y = available_y;
        amount_x = amount_y
            .checked_mul(scale())
            .ok_or(SizingError::UnsizablePair)?
            / ratio;
    }

    if amount_x.is_zero() || amount_y.is_zero() {
        return Err(SizingError::UnsizablePair);
    }

    Ok(PairAmounts {
        amount_x,
        amount_y,
        min_x: apply_bps(amount_x, min_bps),
        min_y: apply_bps(amount_y, min_bps),
        first_liquidity: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    #[test]
    fn test_sizes_to_reserve_ratio() {
        // 1 X : 4 Y pool, Y side plentiful
        let sized = size_liquidity_pair(e18(100), e18(400), e18(10), e18(1_000), 500).unwrap();
        assert_eq!(sized.amount_x, e18(10));
        assert_eq!(sized.amount_y, e18(40));
        assert!(!sized.first_liquidity);
    }

    #[test]
    fn test_clamps_and_back_solves() {
        // desired 50 X would need 200 Y; only 150 Y available, so
        // X falls to 37.5
        let sized = size_liquidity_pair(e18(100), e18(400), e18(50), e18(150), 500).unwrap();
        assert_eq!(sized.amount_y, e18(150));
        assert_eq!(sized.amount_x, e18(150) / 4);
        assert_eq!(sized.amount_x, U256::from(37_500_000_000_000_000_000u128));
    }

    #[test]
    fn test_minimums_carry_slippage() {
        let sized = size_liquidity_pair(e18(100), e18(400), e18(10), e18(1_000), 500).unwrap();
        assert_eq!(sized.min_x, e18(10) * 9_500 / 10_000);
        assert_eq!(sized.min_y, e18(40) * 9_500 / 10_000);
    }

    #[test]
    fn test_empty_pool_passes_through() {
        let sized = size_liquidity_pair(U256::zero(), U256::zero(), e18(5), e18(7), 500).unwrap();
        assert!(sized.first_liquidity);
        assert_eq!(sized.amount_x, e18(5));
        assert_eq!(sized.amount_y, e18(7));
    }

    #[test]
    fn test_zero_inputs_unsizable() {
        assert_eq!(
            size_liquidity_pair(e18(100), e18(400), U256::zero(), e18(10), 500),
            Err(SizingError::UnsizablePair)
        );
        assert_eq!(
            size_liquidity_pair(e18(100), e18(400), e18(10), U256::zero(), 500),
            Err(SizingError::UnsizablePair)
        );
    }

    #[test]
    fn test_zero_input_against_empty_pool_unsizable() {
        // The zero-input refusal takes precedence over the empty-pool
        // passthrough.
        assert_eq!(
            size_liquidity_pair(U256::zero(), U256::zero(), U256::zero(), e18(7), 500),
            Err(SizingError::UnsizablePair)
        );
        assert_eq!(
            size_liquidity_pair(U256::zero(), U256::zero(), e18(5), U256::zero(), 500),
            Err(SizingError::UnsizablePair)
        );
    }

    #[test]
    fn test_degenerate_ratio_unsizable() {
        // reserve_y so small relative to reserve_x that the ratio
        // truncates to zero
        assert_eq!(
            size_liquidity_pair(U256::exp10(40), U256::one(), e18(10), e18(10), 500),
            Err(SizingError::UnsizablePair)
        );
    }

    #[test]
    fn test_ratio_overflow_unsizable() {
        assert_eq!(
            size_liquidity_pair(U256::one(), U256::MAX, e18(1), e18(1), 500),
            Err(SizingError::UnsizablePair)
        );
    }

    #[test]
    fn test_truncated_amount_unsizable() {
        // 6-decimal dust against an extreme ratio truncates Y to zero
        assert_eq!(
            size_liquidity_pair(U256::exp10(30), U256::exp10(13), U256::from(10u64), U256::from(10u64), 500),
            Err(SizingError::UnsizablePair)
        );
    }

    #[test]
    fn test_mixed_decimal_pairs() {
        // 18-decimal X against 6-decimal Y at 1:2 value parity
        let reserve_x = e18(1_000);
        let reserve_y = U256::from(2_000_000_000u64); // 2000 units of 6 dp
        let sized =
            size_liquidity_pair(reserve_x, reserve_y, e18(10), U256::from(100_000_000u64), 500)
                .unwrap();
        assert_eq!(sized.amount_x, e18(10));
        assert_eq!(sized.amount_y, U256::from(20_000_000u64));
    }
}
