//! AMM Calculator
//!
//! Swap math using constant product formula (x * y = k) with the fee taken
//! from the input side before the invariant is applied.
//!
//! All arithmetic is exact over `BigUint`. Output amounts round down and
//! required inputs round up, so a route never promises more than the pools
//! will settle on-chain.

use num_bigint::BigUint;
use num_traits::One;
use thiserror::Error;

use router_core::{Amount, FeeFraction, PoolId, RouterError};

/// Basis points in 100%
const BPS_DENOM: u64 = 10_000;

/// Failure simulating a single pool
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapMathError {
    #[error("pool has an empty reserve")]
    EmptyReserves,

    #[error("requested output exceeds pool reserves")]
    InsufficientLiquidity,
}

impl SwapMathError {
    /// Attach the pool the failure happened in
    pub fn for_pool(self, pool: &PoolId) -> RouterError {
        match self {
            Self::EmptyReserves => RouterError::invalid_pool(pool.as_str(), self.to_string()),
            Self::InsufficientLiquidity => RouterError::InsufficientLiquidity {
                pool: pool.to_string(),
            },
        }
    }
}

/// Calculate swap output for a fixed input
///
/// Formula: output = (input * (d - n) * reserves_out) / (reserves_in * d + input * (d - n))
/// where the fee is `n / d`. Rounds down.
pub fn amount_out(
    amount_in: &Amount,
    reserve_in: &Amount,
    reserve_out: &Amount,
    fee: &FeeFraction,
) -> Result<Amount, SwapMathError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(SwapMathError::EmptyReserves);
    }
    if amount_in.is_zero() {
        return Ok(Amount::zero());
    }

    let fee_denom = BigUint::from(fee.denominator());
    let input_with_fee = amount_in.as_biguint() * BigUint::from(fee.complement());

    let numerator = &input_with_fee * reserve_out.as_biguint();
    let denominator = reserve_in.as_biguint() * fee_denom + input_with_fee;

    Ok(Amount::from(numerator / denominator))
}

/// Calculate required input for a desired output (reverse calculation)
///
/// Formula: input = ceil((reserves_in * output * d) / ((reserves_out - output) * (d - n)))
pub fn amount_in(
    amount_out: &Amount,
    reserve_in: &Amount,
    reserve_out: &Amount,
    fee: &FeeFraction,
) -> Result<Amount, SwapMathError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(SwapMathError::EmptyReserves);
    }
    if amount_out.is_zero() {
        return Ok(Amount::zero());
    }
    if amount_out >= reserve_out {
        return Err(SwapMathError::InsufficientLiquidity);
    }

    let numerator = reserve_in.as_biguint()
        * amount_out.as_biguint()
        * BigUint::from(fee.denominator());
    let denominator = (reserve_out.as_biguint() - amount_out.as_biguint())
        * BigUint::from(fee.complement());

    Ok(Amount::from(div_ceil(numerator, &denominator)))
}

fn div_ceil(numerator: BigUint, denominator: &BigUint) -> BigUint {
    let quotient = &numerator / denominator;
    if (quotient.clone() * denominator) == numerator {
        quotient
    } else {
        quotient + BigUint::one()
    }
}

/// Price impact of a multi-hop execution as a percentage.
///
/// Compares the realised rate to the product of the spot prices along the
/// path. Display analytics only; never used to rank routes.
pub fn route_price_impact_percent(
    reserves: &[(&Amount, &Amount)],
    amount_in: &Amount,
    amount_out: &Amount,
) -> f64 {
    if amount_in.is_zero() || amount_out.is_zero() || reserves.is_empty() {
        return 0.0;
    }

    let spot_product: f64 = reserves
        .iter()
        .map(|(r_in, r_out)| {
            let r_in = r_in.to_f64_lossy();
            if r_in == 0.0 {
                0.0
            } else {
                r_out.to_f64_lossy() / r_in
            }
        })
        .product();
    if spot_product == 0.0 {
        return 0.0;
    }

    let execution_rate = amount_out.to_f64_lossy() / amount_in.to_f64_lossy();
    ((spot_product - execution_rate) / spot_product).abs() * 100.0
}

fn slippage_bps(slippage_percent: f64) -> u64 {
    let bps = (slippage_percent * 100.0).round();
    if bps <= 0.0 {
        0
    } else {
        (bps as u64).min(BPS_DENOM)
    }
}

/// Minimum acceptable output after slippage tolerance (rounds down)
pub fn apply_slippage_floor(amount: &Amount, slippage_percent: f64) -> Amount {
    let bps = slippage_bps(slippage_percent);
    let scaled = amount.as_biguint() * BigUint::from(BPS_DENOM - bps);
    Amount::from(scaled / BigUint::from(BPS_DENOM))
}

/// Maximum input to allow after slippage tolerance (rounds up)
pub fn apply_slippage_ceil(amount: &Amount, slippage_percent: f64) -> Amount {
    let bps = slippage_bps(slippage_percent);
    let scaled = amount.as_biguint() * BigUint::from(BPS_DENOM + bps);
    Amount::from(div_ceil(scaled, &BigUint::from(BPS_DENOM)))
}
