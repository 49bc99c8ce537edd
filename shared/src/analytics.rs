//! Progress analytics
//!
//! Turns the progress log into chart-ready series: the weight line chart
//! and the energy level / workout intensity distributions.

use crate::models::{Intensity, Mood, ProgressEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point of the progress time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub weight: f64,
    pub mood: Mood,
    pub intensity: Intensity,
}

/// Count of entries for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount<T> {
    pub label: T,
    pub count: usize,
}

/// Chart-ready summary of the progress log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressAnalytics {
    pub entries_count: usize,
    pub series: Vec<ProgressPoint>,
    pub mood_distribution: Vec<CategoryCount<Mood>>,
    pub intensity_distribution: Vec<CategoryCount<Intensity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_change: Option<f64>,
}

/// Build analytics from a log in insertion (chronological) order
pub fn summarize_progress(entries: &[ProgressEntry]) -> ProgressAnalytics {
    let series: Vec<ProgressPoint> = entries
        .iter()
        .map(|e| ProgressPoint {
            date: e.date(),
            weight: e.weight(),
            mood: e.mood(),
            intensity: e.intensity(),
        })
        .collect();

    let mood_distribution = Mood::ALL
        .iter()
        .map(|m| CategoryCount {
            label: *m,
            count: entries.iter().filter(|e| e.mood() == *m).count(),
        })
        .collect();

    let intensity_distribution = Intensity::ALL
        .iter()
        .map(|i| CategoryCount {
            label: *i,
            count: entries.iter().filter(|e| e.intensity() == *i).count(),
        })
        .collect();

    let start_weight = entries.first().map(|e| e.weight());
    let latest_weight = entries.last().map(|e| e.weight());
    let total_change = match (start_weight, latest_weight) {
        (Some(start), Some(latest)) => Some(((latest - start) * 100.0).round() / 100.0),
        _ => None,
    };

    ProgressAnalytics {
        entries_count: entries.len(),
        series,
        mood_distribution,
        intensity_distribution,
        start_weight,
        latest_weight,
        total_change,
    }
}
