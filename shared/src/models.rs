//! Data models for the Fit AI coaching workflow

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Validated user profile
///
/// Only [`crate::validation::validate_profile`] constructs this type, so every
/// instance satisfies all field constraints. There are no setters: a new
/// submission produces a new profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    name: String,
    age: u32,
    sex: String,
    weight: f64,
    height: f64,
    goals: String,
    country: String,
}

impl UserProfile {
    pub(crate) fn from_validated(
        name: String,
        age: u32,
        sex: String,
        weight: f64,
        height: f64,
        goals: String,
        country: String,
    ) -> Self {
        Self {
            name,
            age,
            sex,
            weight,
            height,
            goals,
            country,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn sex(&self) -> &str {
        &self.sex
    }

    /// Weight in kilograms
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Height in centimeters
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn goals(&self) -> &str {
        &self.goals
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

/// Self-reported energy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Mood {
    Low,
    Medium,
    High,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Low, Mood::Medium, Mood::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Low => "Low",
            Mood::Medium => "Medium",
            Mood::High => "High",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Mood::Low),
            "medium" => Ok(Mood::Medium),
            "high" => Ok(Mood::High),
            _ => Err(format!("Invalid mood: {}. Must be one of: Low, Medium, High", s)),
        }
    }
}

impl TryFrom<String> for Mood {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Perceived workout intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Intensity {
    Light,
    Moderate,
    Intense,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Light, Intensity::Moderate, Intensity::Intense];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Light => "Light",
            Intensity::Moderate => "Moderate",
            Intensity::Intense => "Intense",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Intensity::Light),
            "moderate" => Ok(Intensity::Moderate),
            "intense" => Ok(Intensity::Intense),
            _ => Err(format!(
                "Invalid intensity: {}. Must be one of: Light, Moderate, Intense",
                s
            )),
        }
    }
}

impl TryFrom<String> for Intensity {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One daily check-in in the progress log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    date: NaiveDate,
    weight: f64,
    mood: Mood,
    intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl ProgressEntry {
    /// Create an entry dated today (local calendar day)
    pub fn new(weight: f64, mood: Mood, intensity: Intensity, notes: Option<String>) -> Self {
        Self::recorded_on(Local::now().date_naive(), weight, mood, intensity, notes)
    }

    /// Create an entry for an explicit day
    pub fn recorded_on(
        date: NaiveDate,
        weight: f64,
        mood: Mood,
        intensity: Intensity,
        notes: Option<String>,
    ) -> Self {
        // Blank notes are the same as no notes
        let notes = notes.filter(|n| !n.trim().is_empty());
        Self {
            date,
            weight,
            mood,
            intensity,
            notes,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// One completed equipment analysis and plan generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHistoryEntry {
    pub date: NaiveDate,
    pub equipment: String,
    pub plan: String,
}

impl WorkoutHistoryEntry {
    /// History record for a plan completed today
    pub fn completed_today(result: &EquipmentPlanResult) -> Self {
        Self {
            date: Local::now().date_naive(),
            equipment: result.equipment_description.clone(),
            plan: result.plan_text.clone(),
        }
    }
}

/// Output of the plan orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    pub full_plan_text: String,
    /// Encoded audio (MP3) of the summarized plan
    pub narration_audio: Vec<u8>,
}

/// Output of the equipment workout orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPlanResult {
    pub equipment_description: String,
    pub plan_text: String,
}

/// A single exercise in today's routine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutCard {
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub rest_seconds: u32,
}

impl WorkoutCard {
    pub fn new(exercise: &str, sets: u32, reps: u32, rest_seconds: u32) -> Self {
        Self {
            exercise: exercise.to_string(),
            sets,
            reps,
            rest_seconds,
        }
    }

    /// Spoken coaching line for this exercise
    pub fn instructions(&self) -> String {
        format!(
            "Let's do {} {} for {} sets. Rest for {} seconds between sets.",
            self.reps, self.exercise, self.sets, self.rest_seconds
        )
    }
}

/// Default bodyweight routine shown on the workout tab
pub fn default_routine() -> Vec<WorkoutCard> {
    vec![
        WorkoutCard::new("Push-ups", 3, 12, 30),
        WorkoutCard::new("Squats", 4, 15, 60),
        WorkoutCard::new("Plank", 3, 1, 15),
    ]
}
