//! Per-process user session
//!
//! Holds the current profile, the durable progress log and the workout
//! history of this run. The application state keeps it behind one async
//! mutex; collaborators are never called while it is locked.

use super::progress::ProgressStore;
use fit_ai_shared::{ProgressEntry, StorageError, UserProfile, WorkoutHistoryEntry};
use tracing::info;

#[derive(Debug)]
pub struct Session {
    profile: Option<UserProfile>,
    progress: ProgressStore,
    workout_history: Vec<WorkoutHistoryEntry>,
}

impl Session {
    pub fn new(progress: ProgressStore) -> Self {
        Self {
            profile: None,
            progress,
            workout_history: Vec::new(),
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Replace the current profile wholesale
    pub fn set_profile(&mut self, profile: UserProfile) {
        info!(name = %profile.name(), "Profile updated");
        self.profile = Some(profile);
    }

    pub fn progress(&self) -> &[ProgressEntry] {
        self.progress.entries()
    }

    pub fn progress_store(&self) -> &ProgressStore {
        &self.progress
    }

    pub async fn append_progress(&mut self, entry: ProgressEntry) -> Result<(), StorageError> {
        self.progress.append_progress(entry).await
    }

    pub fn workout_history(&self) -> &[WorkoutHistoryEntry] {
        &self.workout_history
    }

    /// Session-only; workout history is never written to disk
    pub fn append_workout_history(&mut self, entry: WorkoutHistoryEntry) {
        self.workout_history.push(entry);
    }
}
