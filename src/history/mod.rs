//! Append-only log of solved calculations.
//!
//! The solver never touches this module; callers hand each result to an
//! injected [`CalculationStore`] after solving.

mod analysis;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::core::CalculationResult;

pub use analysis::{AnalysisSummary, GoalChartRow, RECENT_GOALS_LIMIT, ScenarioCount, summarize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: CalculationResult,
}

pub trait CalculationStore: Send + Sync {
    fn append(&self, result: CalculationResult) -> CalculationRecord;

    /// Most recent records first, at most `limit` of them.
    fn list(&self, limit: usize) -> Vec<CalculationRecord>;

    fn get(&self, id: Uuid) -> Option<CalculationRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<CalculationRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CalculationStore for InMemoryStore {
    fn append(&self, result: CalculationResult) -> CalculationRecord {
        let record = CalculationRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            result,
        };
        self.records.write().push(record.clone());
        record
    }

    fn list(&self, limit: usize) -> Vec<CalculationRecord> {
        self.records
            .read()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    fn get(&self, id: Uuid) -> Option<CalculationRecord> {
        self.records
            .read()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }
}
