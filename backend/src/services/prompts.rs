//! System instructions and prompt builders for the text-generation service

use crate::clients::TextRequest;
use fit_ai_shared::UserProfile;

pub const ADVISOR_INSTRUCTION: &str = "You are a helpful health assistant whose job is to \
strictly provide a workout regime, diet (based on their locale) and health advice based on \
the information provided by the human.";

pub const SUMMARIZER_INSTRUCTION: &str = "You are an expert text summarizer. Your job is to \
summarize the user text, while retaining as much information as possible.";

pub const WORKOUT_PLANNER_INSTRUCTION: &str = "You are a workout planner. Your job is to \
generate a workout plan based on the user's workout equipment.";

/// Request for a personalized regime covering every profile field
pub fn plan_request(profile: &UserProfile) -> TextRequest {
    let prompt = format!(
        "Please create a personalized fitness plan based on these details:\n\
         - Name: {}\n\
         - Age: {}\n\
         - Sex: {}\n\
         - Weight: {} kg\n\
         - Height: {} cm\n\
         - Goals: {}\n\
         - Country: {}",
        profile.name(),
        profile.age(),
        profile.sex(),
        profile.weight(),
        profile.height(),
        profile.goals(),
        profile.country(),
    );
    TextRequest {
        system_instruction: ADVISOR_INSTRUCTION.to_string(),
        prompt,
    }
}

/// Summarize a generated plan; the text is passed through unmodified
pub fn summary_request(plan_text: &str) -> TextRequest {
    TextRequest {
        system_instruction: SUMMARIZER_INSTRUCTION.to_string(),
        prompt: plan_text.to_string(),
    }
}

/// Plan a workout around the captioned equipment; country is not included
pub fn equipment_request(profile: &UserProfile, equipment: &str) -> TextRequest {
    let prompt = format!(
        "Equipments: {}\n\
         Please create a workout plan using this equipment for:\n\
         - Name: {}\n\
         - Age: {}\n\
         - Sex: {}\n\
         - Weight: {} kg\n\
         - Height: {} cm\n\
         - Goals: {}",
        equipment,
        profile.name(),
        profile.age(),
        profile.sex(),
        profile.weight(),
        profile.height(),
        profile.goals(),
    );
    TextRequest {
        system_instruction: WORKOUT_PLANNER_INSTRUCTION.to_string(),
        prompt,
    }
}
