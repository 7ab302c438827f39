use serde::Serialize;

use super::CalculationRecord;
use crate::core::{RiskScenario, round_half_up};

/// Number of records charted individually in [`AnalysisSummary::recent_goals`].
pub const RECENT_GOALS_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub calculation_count: usize,
    pub average_target_amount: Option<f64>,
    pub average_monthly_contribution: Option<f64>,
    pub average_years_to_goal: Option<u32>,
    pub risk_distribution: Vec<ScenarioCount>,
    pub recent_goals: Vec<GoalChartRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCount {
    pub scenario: RiskScenario,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalChartRow {
    pub name: String,
    pub target_amount: f64,
    pub monthly_contribution: f64,
    pub total_contributions: f64,
    pub total_growth: f64,
    pub years_to_goal: u32,
}

/// Aggregates a page of records, typically the newest ones from a store.
pub fn summarize(records: &[CalculationRecord]) -> AnalysisSummary {
    let count = records.len();
    let mean = |total: f64| (count > 0).then(|| total / count as f64);

    let target_total: f64 = records.iter().map(|r| r.result.target_amount).sum();
    let monthly_total: f64 = records.iter().map(|r| r.result.monthly_contribution).sum();
    let years_total: f64 = records.iter().map(|r| r.result.years_to_goal as f64).sum();

    let risk_distribution = RiskScenario::ALL
        .into_iter()
        .filter_map(|scenario| {
            let count = records
                .iter()
                .filter(|r| r.result.risk_scenario == scenario)
                .count();
            (count > 0).then_some(ScenarioCount { scenario, count })
        })
        .collect();

    let recent_goals = records
        .iter()
        .take(RECENT_GOALS_LIMIT)
        .enumerate()
        .map(|(index, record)| GoalChartRow {
            name: format!("Goal {}", index + 1),
            target_amount: record.result.target_amount,
            monthly_contribution: record.result.monthly_contribution,
            total_contributions: record.result.total_contributions,
            total_growth: record.result.total_growth,
            years_to_goal: record.result.years_to_goal,
        })
        .collect();

    AnalysisSummary {
        calculation_count: count,
        average_target_amount: mean(target_total),
        average_monthly_contribution: mean(monthly_total),
        average_years_to_goal: mean(years_total).map(|years| round_half_up(years) as u32),
        risk_distribution,
        recent_goals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalculationInput, solve_required_contribution};
    use crate::history::{CalculationStore, InMemoryStore};

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn store_with(entries: &[(f64, u32, RiskScenario)]) -> InMemoryStore {
        let store = InMemoryStore::new();
        for &(target_amount, years_to_goal, risk_scenario) in entries {
            let result = solve_required_contribution(&CalculationInput {
                target_amount,
                years_to_goal,
                initial_investment: 0.0,
                risk_scenario,
                custom_rate: None,
            })
            .expect("valid input");
            store.append(result);
        }
        store
    }

    #[test]
    fn empty_history_has_no_averages() {
        let summary = summarize(&[]);
        assert_eq!(summary.calculation_count, 0);
        assert_eq!(summary.average_target_amount, None);
        assert_eq!(summary.average_monthly_contribution, None);
        assert_eq!(summary.average_years_to_goal, None);
        assert!(summary.risk_distribution.is_empty());
        assert!(summary.recent_goals.is_empty());
    }

    #[test]
    fn averages_and_distribution_over_records() {
        let store = store_with(&[
            (100_000.0, 10, RiskScenario::Moderate),
            (200_000.0, 15, RiskScenario::Aggressive),
            (300_000.0, 20, RiskScenario::Moderate),
            (400_000.0, 8, RiskScenario::Custom),
        ]);
        let records = store.list(20);
        let summary = summarize(&records);

        assert_eq!(summary.calculation_count, 4);
        assert_approx(summary.average_target_amount.expect("average"), 250_000.0);
        let expected_monthly =
            records.iter().map(|r| r.result.monthly_contribution).sum::<f64>() / 4.0;
        assert_approx(
            summary.average_monthly_contribution.expect("average"),
            expected_monthly,
        );
        // (10 + 15 + 20 + 8) / 4 = 13.25
        assert_eq!(summary.average_years_to_goal, Some(13));
        assert_eq!(
            summary.risk_distribution,
            vec![
                ScenarioCount {
                    scenario: RiskScenario::Moderate,
                    count: 2
                },
                ScenarioCount {
                    scenario: RiskScenario::Aggressive,
                    count: 1
                },
                ScenarioCount {
                    scenario: RiskScenario::Custom,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn average_years_rounds_half_up() {
        let store = store_with(&[
            (100_000.0, 10, RiskScenario::Moderate),
            (100_000.0, 11, RiskScenario::Moderate),
        ]);
        let summary = summarize(&store.list(20));
        assert_eq!(summary.average_years_to_goal, Some(11));
    }

    #[test]
    fn recent_goals_are_capped_and_labelled_newest_first() {
        let entries: Vec<_> = (1..=12)
            .map(|i| (i as f64 * 10_000.0, 10, RiskScenario::Conservative))
            .collect();
        let store = store_with(&entries);
        let summary = summarize(&store.list(20));

        assert_eq!(summary.calculation_count, 12);
        assert_eq!(summary.recent_goals.len(), RECENT_GOALS_LIMIT);
        assert_eq!(summary.recent_goals[0].name, "Goal 1");
        assert_approx(summary.recent_goals[0].target_amount, 120_000.0);
        assert_eq!(summary.recent_goals[9].name, "Goal 10");
        assert_approx(summary.recent_goals[9].target_amount, 30_000.0);
    }

    #[test]
    fn summary_serializes_with_camel_case_keys() {
        let store = store_with(&[(50_000.0, 5, RiskScenario::VeryAggressive)]);
        let summary = summarize(&store.list(20));
        let json = serde_json::to_string(&summary).expect("summary should serialize");
        assert!(json.contains("\"calculationCount\":1"));
        assert!(json.contains("\"averageYearsToGoal\":5"));
        assert!(json.contains("\"scenario\":\"very_aggressive\""));
        assert!(json.contains("\"recentGoals\""));
    }
}
