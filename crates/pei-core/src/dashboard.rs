//! Dashboard model: the plans finalized during this session.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::profile::StudentProfile;

/// One entry in the dashboard's recent-plans list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRecord {
    pub id: Uuid,
    pub student_name: String,
    pub age: String,
    pub completed_at: DateTime<Utc>,
}

impl PlanRecord {
    pub fn new(profile: &StudentProfile, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_name: profile.name.clone(),
            age: profile.age.clone(),
            completed_at,
        }
    }

    /// Date in the `dd/mm/yyyy` form the dashboard cards use.
    pub fn last_updated_label(&self) -> String {
        self.completed_at.format("%d/%m/%Y").to_string()
    }
}

/// Session-scoped list of finalized plans, newest first.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    records: Vec<PlanRecord>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dashboard pre-populated with demonstration entries.
    pub fn with_samples() -> Self {
        let samples = [
            ("Lucas Silva", "8", 2025, 3, 24),
            ("Ana Oliveira", "6", 2025, 3, 20),
            ("Pedro Santos", "10", 2025, 3, 18),
        ];
        let records = samples
            .into_iter()
            .filter_map(|(name, age, y, m, d)| {
                let completed_at = NaiveDate::from_ymd_opt(y, m, d)?
                    .and_hms_opt(12, 0, 0)?
                    .and_utc();
                Some(PlanRecord {
                    id: Uuid::new_v4(),
                    student_name: name.to_string(),
                    age: age.to_string(),
                    completed_at,
                })
            })
            .collect();
        Self { records }
    }

    /// Add a finalized plan to the top of the list.
    pub fn record(&mut self, record: PlanRecord) {
        self.records.insert(0, record);
    }

    pub fn recent(&self) -> &[PlanRecord] {
        &self.records
    }

    pub fn active_count(&self) -> usize {
        self.records.len()
    }
}
