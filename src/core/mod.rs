mod error;
mod projection;
mod rates;
mod solver;
mod types;

pub(crate) use projection::round_half_up;

pub use error::CalcError;
pub use projection::{YearlyProjection, project_years};
pub use rates::{DEFAULT_CUSTOM_RATE, RATE_TABLE, resolve_annual_rate, table_rate};
pub use solver::{MONTHS_PER_YEAR, annuity_factor, solve_required_contribution};
pub use types::{CalculationInput, CalculationResult, ProjectionPoint, RiskScenario};
