//! Depth-indexed cost evaluation

use serde::{Deserialize, Serialize};
use tracing::debug;
use zkbisect_core::{DisputeError, Result};

/// Largest accepted bisection depth. `2^d` stays exact and the remaining
/// PGU stays well clear of underflow up to here.
pub const MAX_DEPTH: u32 = 64;

/// PGU per bPGU
const PGU_PER_BILLION: f64 = 1_000_000_000.0;

/// Fee constants of the hybrid protocol
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostConstants {
    /// Fixed fee of one compressed proof
    pub compressed_base_fee: f64,
    /// Compressed proof price per bPGU
    pub compressed_pgu_price: f64,
    /// Fixed fee of the final PLONK wrapping proof
    pub plonk_fee: f64,
    /// Marginal improvement below which deeper bisection is not worth a round
    pub epsilon: f64,
}

impl Default for CostConstants {
    fn default() -> Self {
        Self {
            compressed_base_fee: 0.2,
            compressed_pgu_price: 0.45,
            plonk_fee: 0.3,
            epsilon: 0.001,
        }
    }
}

impl CostConstants {
    fn validate(&self) -> Result<()> {
        non_negative("compressed_base_fee", self.compressed_base_fee)?;
        non_negative("compressed_pgu_price", self.compressed_pgu_price)?;
        non_negative("plonk_fee", self.plonk_fee)?;
        non_negative("epsilon", self.epsilon)
    }

    /// Limit of `total_cost(d)` as `d` grows
    pub fn floor(&self) -> f64 {
        self.compressed_base_fee + self.plonk_fee
    }
}

/// One row of the cost curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostPoint {
    /// Bisection rounds played before proving
    pub depth: u32,
    /// Proof computation left after `depth` halvings, in bPGU
    #[serde(rename = "remainingBillionPGU")]
    pub remaining_billion_pgu: f64,
    /// Compressed proof fee
    pub compressed_fee: f64,
    /// PLONK wrapping fee
    pub plonk_fee: f64,
    /// `compressed_fee + plonk_fee`
    pub total_cost: f64,
}

/// Cost for each depth `0..=max_depth` plus the selected depth
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCurve {
    /// Rows indexed by depth
    pub points: Vec<CostPoint>,
    /// Depth chosen by the diminishing-returns rule
    pub optimal_depth: u32,
}

impl CostCurve {
    /// Row for `depth`
    pub fn at(&self, depth: u32) -> Option<&CostPoint> {
        self.points.get(depth as usize)
    }

    /// Row for the selected depth
    pub fn optimal(&self) -> &CostPoint {
        &self.points[self.optimal_depth as usize]
    }

    /// Deepest evaluated depth
    pub fn max_depth(&self) -> u32 {
        self.points.last().map_or(0, |p| p.depth)
    }

    /// Cost saved by playing to the selected depth instead of proving the whole range
    pub fn savings(&self) -> f64 {
        self.points[0].total_cost - self.optimal().total_cost
    }
}

/// Evaluate the cost curve for depths `0..=max_depth`.
///
/// `total_pgu` is the proving cost of the whole disputed range as reported by
/// the external oracle. The optimal depth is the smallest `d >= 1` whose
/// improvement over `d - 1` is below `constants.epsilon`, or `max_depth` if
/// every step improves by at least epsilon.
pub fn evaluate(total_pgu: f64, constants: &CostConstants, max_depth: u32) -> Result<CostCurve> {
    if !total_pgu.is_finite() || total_pgu <= 0.0 {
        return Err(DisputeError::InvalidCostInput { field: "total_pgu", value: total_pgu });
    }
    constants.validate()?;
    if max_depth > MAX_DEPTH {
        return Err(DisputeError::DepthOutOfRange { requested: max_depth, max: MAX_DEPTH });
    }

    let points: Vec<CostPoint> = (0..=max_depth)
        .map(|d| point_at(total_pgu, constants, d))
        .collect();

    let optimal_depth = points
        .windows(2)
        .find(|w| w[0].total_cost - w[1].total_cost < constants.epsilon)
        .map_or(max_depth, |w| w[1].depth);

    debug!(
        total_pgu,
        max_depth,
        optimal_depth,
        cost = points[optimal_depth as usize].total_cost,
        "Evaluated cost curve"
    );
    Ok(CostCurve { points, optimal_depth })
}

fn point_at(total_pgu: f64, constants: &CostConstants, depth: u32) -> CostPoint {
    let remaining_billion_pgu = total_pgu / PGU_PER_BILLION / pow2(depth);
    let compressed_fee =
        constants.compressed_base_fee + remaining_billion_pgu * constants.compressed_pgu_price;
    let plonk_fee = constants.plonk_fee;
    CostPoint {
        depth,
        remaining_billion_pgu,
        compressed_fee,
        plonk_fee,
        total_cost: compressed_fee + plonk_fee,
    }
}

/// Exact `2^depth` for `depth <= 64`
fn pow2(depth: u32) -> f64 {
    (1u128 << depth) as f64
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DisputeError::InvalidCostInput { field, value });
    }
    Ok(())
}
