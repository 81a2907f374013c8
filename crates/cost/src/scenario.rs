//! Labelled cost scenarios priced in USD

use serde::Serialize;
use zkbisect_core::{DisputeError, Result};

use crate::model::{CostCurve, CostPoint};

/// Depths shown by default: the full batch and a few bisection depths
pub const DEFAULT_SCENARIO_DEPTHS: [u32; 5] = [0, 5, 7, 10, 11];

/// A cost curve row with a display label and USD price
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostScenario {
    /// "Full Batch" or "Bisect d=N"
    pub label: String,
    /// Curve row
    #[serde(flatten)]
    pub point: CostPoint,
    /// `total_cost * prove_price_usd`
    pub usd: f64,
}

/// Pick the rows at `depths` from `curve` and price them.
///
/// Depths past the end of the curve are skipped.
pub fn scenarios(curve: &CostCurve, prove_price_usd: f64, depths: &[u32]) -> Result<Vec<CostScenario>> {
    if !prove_price_usd.is_finite() || prove_price_usd < 0.0 {
        return Err(DisputeError::InvalidCostInput {
            field: "prove_price_usd",
            value: prove_price_usd,
        });
    }

    Ok(depths
        .iter()
        .filter_map(|&d| curve.at(d))
        .map(|point| CostScenario {
            label: label(point.depth),
            point: *point,
            usd: point.total_cost * prove_price_usd,
        })
        .collect())
}

fn label(depth: u32) -> String {
    if depth == 0 {
        "Full Batch".to_string()
    } else {
        format!("Bisect d={depth}")
    }
}

#[cfg(test)]
mod tests {
    use crate::{evaluate, CostConstants};

    use super::*;

    #[test]
    fn test_default_scenarios() {
        let curve = evaluate(1e10, &CostConstants::default(), 11).unwrap();
        let rows = scenarios(&curve, 0.34, &DEFAULT_SCENARIO_DEPTHS).unwrap();

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Full Batch", "Bisect d=5", "Bisect d=7", "Bisect d=10", "Bisect d=11"]);
        assert!((rows[0].usd - 5.0 * 0.34).abs() < 1e-9);
    }

    #[test]
    fn test_depths_past_curve_skipped() {
        let curve = evaluate(1e10, &CostConstants::default(), 6).unwrap();
        let rows = scenarios(&curve, 1.0, &DEFAULT_SCENARIO_DEPTHS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].point.depth, 5);
    }

    #[test]
    fn test_flattened_json() {
        let curve = evaluate(1e10, &CostConstants::default(), 0).unwrap();
        let rows = scenarios(&curve, 1.0, &[0]).unwrap();
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["label"], "Full Batch");
        assert_eq!(json["depth"], 0);
        assert_eq!(json["remainingBillionPGU"], 10.0);
        assert!(json.get("point").is_none());
    }

    #[test]
    fn test_negative_price_rejected() {
        let curve = evaluate(1e10, &CostConstants::default(), 0).unwrap();
        assert!(scenarios(&curve, -1.0, &[0]).is_err());
    }
}
