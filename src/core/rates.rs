use super::types::RiskScenario;

/// Annual return assumed for `custom` when no usable rate was supplied.
pub const DEFAULT_CUSTOM_RATE: f64 = 0.08;

/// Fixed annual return per preset scenario. `Custom` has no row.
pub const RATE_TABLE: [(RiskScenario, f64); 4] = [
    (RiskScenario::Conservative, 0.06),
    (RiskScenario::Moderate, 0.08),
    (RiskScenario::Aggressive, 0.10),
    (RiskScenario::VeryAggressive, 0.12),
];

pub fn table_rate(scenario: RiskScenario) -> Option<f64> {
    RATE_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == scenario)
        .map(|&(_, rate)| rate)
}

/// Resolves the annual return actually used for a calculation.
pub fn resolve_annual_rate(scenario: RiskScenario, custom_rate: Option<f64>) -> f64 {
    match table_rate(scenario) {
        Some(rate) => rate,
        None => custom_rate
            .filter(|rate| rate.is_finite())
            .unwrap_or(DEFAULT_CUSTOM_RATE),
    }
}
