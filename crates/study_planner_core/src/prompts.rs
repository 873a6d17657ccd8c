//! crates/study_planner_core/src/prompts.rs
//!
//! Fixed prompt templates sent to the text-generation model.

use crate::domain::SkillLevel;

const PLAN_PROMPT_TEMPLATE: &str = r#"Create a short day-wise study plan.
Rules:
- Bullet points
- No paragraphs
- Simple language

Subject: {subject}
Level: {level}
Hours/day: {hours}
Exam in {days_left} days
"#;

const NOTES_PROMPT_TEMPLATE: &str = r#"Create very short revision notes.
Rules:
- Bullet points
- Headings
- Exam-focused

Topic: {subject}
"#;

const CHAT_PROMPT_PREFIX: &str = "Answer briefly in simple words for a student:\n";

/// Builds the prompt asking for a day-by-day study plan.
pub fn build_plan_prompt(
    subject: &str,
    level: SkillLevel,
    hours_per_day: u8,
    days_left: i64,
) -> String {
    // `{subject}` is substituted last so a subject containing a placeholder is left alone.
    PLAN_PROMPT_TEMPLATE
        .replace("{level}", level.as_str())
        .replace("{hours}", &hours_per_day.to_string())
        .replace("{days_left}", &days_left.to_string())
        .replace("{subject}", subject)
}

/// Builds the prompt asking for short revision notes on a subject.
pub fn build_notes_prompt(subject: &str) -> String {
    NOTES_PROMPT_TEMPLATE.replace("{subject}", subject)
}

/// Builds the prompt for a free-form sidebar question.
pub fn build_chat_prompt(question: &str) -> String {
    format!("{CHAT_PROMPT_PREFIX}{question}")
}
