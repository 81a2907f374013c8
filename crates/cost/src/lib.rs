//! Cost model for hybrid dispute resolution
//!
//! For every candidate bisection depth `d`, prices one compressed proof over
//! the remaining `1 / 2^d` of the disputed computation plus a fixed PLONK
//! wrapping fee, and picks the depth where extra rounds stop paying off.

mod model;
mod report;
mod scenario;

pub use model::{evaluate, CostConstants, CostCurve, CostPoint, MAX_DEPTH};
pub use report::{CycleBreakdown, PerBlockStats, PhaseCycles, ProvingReport};
pub use scenario::{scenarios, CostScenario, DEFAULT_SCENARIO_DEPTHS};
