//! Business logic services
//!
//! Orchestrators coordinate the external AI collaborators; the session and
//! progress store own all mutable user state.

pub mod equipment;
pub mod export;
pub mod plan;
pub mod progress;
pub mod prompts;
pub mod session;
pub mod workout;

pub use equipment::{EquipmentError, EquipmentOrchestrator};
pub use export::ExportService;
pub use plan::PlanOrchestrator;
pub use progress::ProgressStore;
pub use session::Session;
pub use workout::{audio_data_uri, WorkoutService};
