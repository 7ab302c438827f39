use std::iter::FusedIterator;

use super::solver::MONTHS_PER_YEAR;
use super::types::{CalculationResult, ProjectionPoint};

/// Year-by-year replay of a solved calculation, for charting.
///
/// Each step adds the year's contributions and then applies one year of
/// growth at the annual rate. Running totals are kept in full precision and
/// only rounded when a point is emitted. A clone resumes from the same year;
/// call [`project_years`] again to start over from year 0.
#[derive(Debug, Clone)]
pub struct YearlyProjection {
    annual_return: f64,
    yearly_contribution: f64,
    years_to_goal: u64,
    next_year: u64,
    total_value: f64,
    total_contributions: f64,
}

pub fn project_years(result: &CalculationResult) -> YearlyProjection {
    YearlyProjection {
        annual_return: result.projected_annual_return,
        yearly_contribution: result.monthly_contribution * MONTHS_PER_YEAR as f64,
        years_to_goal: u64::from(result.years_to_goal),
        next_year: 0,
        total_value: result.initial_investment,
        total_contributions: result.initial_investment,
    }
}

impl YearlyProjection {
    fn remaining(&self) -> usize {
        let remaining = (self.years_to_goal + 1).saturating_sub(self.next_year);
        usize::try_from(remaining).unwrap_or(usize::MAX)
    }
}

impl Iterator for YearlyProjection {
    type Item = ProjectionPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_year > self.years_to_goal {
            return None;
        }
        let year = u32::try_from(self.next_year).ok()?;
        self.next_year += 1;

        if year == 0 {
            return Some(ProjectionPoint {
                year,
                total_value: round_half_up(self.total_value),
                total_contributions: round_half_up(self.total_contributions),
                growth: 0.0,
            });
        }

        self.total_contributions += self.yearly_contribution;
        self.total_value =
            (self.total_value + self.yearly_contribution) * (1.0 + self.annual_return);
        let growth = self.total_value - self.total_contributions;

        Some(ProjectionPoint {
            year,
            total_value: round_half_up(self.total_value),
            total_contributions: round_half_up(self.total_contributions),
            growth: round_half_up(growth),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for YearlyProjection {}

impl FusedIterator for YearlyProjection {}

// Halves round toward +inf, so -2.5 becomes -2 rather than -3.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
