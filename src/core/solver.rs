use super::error::CalcError;
use super::rates::resolve_annual_rate;
use super::types::{CalculationInput, CalculationResult};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Below this periodic rate the annuity factor is taken at its linear limit.
const ZERO_RATE_EPSILON: f64 = 1e-12;

/// Solves for the level monthly contribution that grows, together with the
/// initial lump sum, into `target_amount` by the end of the horizon.
///
/// The lump sum compounds once per year while the contributions compound
/// monthly; projections built from the result must not assume one convention.
pub fn solve_required_contribution(
    input: &CalculationInput,
) -> Result<CalculationResult, CalcError> {
    validate_input(input)?;

    let annual_return = resolve_annual_rate(input.risk_scenario, input.custom_rate);
    if annual_return <= -1.0 {
        return Err(CalcError::invalid(
            "custom_rate",
            "annual return must be greater than -100%",
        ));
    }

    let monthly_return = annual_return / MONTHS_PER_YEAR as f64;
    let years = f64::from(input.years_to_goal);
    let total_months = years * f64::from(MONTHS_PER_YEAR);

    // Skip the power for an empty lump sum: 0 * inf would be NaN on long horizons.
    let future_value_of_initial = if input.initial_investment > 0.0 {
        input.initial_investment * (1.0 + annual_return).powf(years)
    } else {
        0.0
    };
    let target_after_initial = input.target_amount - future_value_of_initial;

    let monthly_contribution = if target_after_initial > 0.0 {
        target_after_initial / annuity_factor(monthly_return, total_months)
    } else {
        0.0
    };
    let monthly_contribution = monthly_contribution.max(0.0);

    let total_contributions =
        input.initial_investment + monthly_contribution * total_months;
    let total_growth = (input.target_amount - total_contributions).max(0.0);

    Ok(CalculationResult {
        target_amount: input.target_amount,
        years_to_goal: input.years_to_goal,
        initial_investment: input.initial_investment,
        risk_scenario: input.risk_scenario,
        monthly_contribution,
        projected_annual_return: annual_return,
        total_contributions,
        total_growth,
        custom_rate: input.custom_rate,
    })
}

/// Future value of one unit paid at the end of each of `periods` periods.
pub fn annuity_factor(rate: f64, periods: f64) -> f64 {
    if rate.abs() < ZERO_RATE_EPSILON {
        return periods;
    }
    ((1.0 + rate).powf(periods) - 1.0) / rate
}

fn validate_input(input: &CalculationInput) -> Result<(), CalcError> {
    if !input.target_amount.is_finite() || input.target_amount <= 0.0 {
        return Err(CalcError::invalid(
            "target_amount",
            "must be a finite number > 0",
        ));
    }
    if input.years_to_goal == 0 {
        return Err(CalcError::invalid("years_to_goal", "must be > 0"));
    }
    if !input.initial_investment.is_finite() || input.initial_investment < 0.0 {
        return Err(CalcError::invalid(
            "initial_investment",
            "must be a finite number >= 0",
        ));
    }
    Ok(())
}
