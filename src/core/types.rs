use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskScenario {
    Conservative,
    Moderate,
    Aggressive,
    VeryAggressive,
    Custom,
}

impl RiskScenario {
    pub const ALL: [RiskScenario; 5] = [
        RiskScenario::Conservative,
        RiskScenario::Moderate,
        RiskScenario::Aggressive,
        RiskScenario::VeryAggressive,
        RiskScenario::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskScenario::Conservative => "conservative",
            RiskScenario::Moderate => "moderate",
            RiskScenario::Aggressive => "aggressive",
            RiskScenario::VeryAggressive => "very_aggressive",
            RiskScenario::Custom => "custom",
        }
    }
}

/// Caller-supplied parameters for a single contribution calculation.
///
/// `custom_rate` is an annual return expressed as a fraction (0.085 for 8.5%)
/// and is only consulted when `risk_scenario` is [`RiskScenario::Custom`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationInput {
    pub target_amount: f64,
    pub years_to_goal: u32,
    pub initial_investment: f64,
    pub risk_scenario: RiskScenario,
    pub custom_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub target_amount: f64,
    pub years_to_goal: u32,
    pub initial_investment: f64,
    pub risk_scenario: RiskScenario,
    pub monthly_contribution: f64,
    pub projected_annual_return: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub custom_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub total_value: f64,
    pub total_contributions: f64,
    pub growth: f64,
}
