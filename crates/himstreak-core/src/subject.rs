//! Study subjects and their derived time totals.

use serde::{Deserialize, Serialize};

use crate::session::SessionLog;

/// A study subject. `total_min` is derived from the session log and
/// recomputed, never stored authoritatively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique name; sessions reference subjects by this key.
    pub name: String,
    pub icon: String,
    pub color: String,
    /// Total studied minutes, summed from the log.
    #[serde(rename = "totalTime", default)]
    pub total_min: u32,
}

impl Subject {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            total_min: 0,
        }
    }

    /// The stock subject set the app ships with.
    pub fn default_set() -> Vec<Subject> {
        vec![
            Subject::new("Accountancy", "\u{1F4CA}", "#FF6B6B"),
            Subject::new("Business Law", "\u{2696}\u{FE0F}", "#4ECDC4"),
            Subject::new("Quantitative Aptitude", "\u{1F522}", "#45B7D1"),
            Subject::new("Business Economics", "\u{1F4C8}", "#96CEB4"),
        ]
    }
}

/// Recompute every subject's total from the log. Sessions naming a
/// subject not in the list contribute to no total.
pub fn recompute_totals(subjects: &mut [Subject], log: &SessionLog) {
    let totals = log.totals_by_subject();
    for subject in subjects {
        subject.total_min = totals.get(&subject.name).copied().unwrap_or(0);
    }
}
