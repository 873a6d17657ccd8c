pub mod domain;
pub mod planner;
pub mod ports;
pub mod prompts;

pub use domain::{
    ChatHistory, ChatTurn, GeneratedContent, SkillLevel, StudyDraft, StudyRequest,
    ValidationError,
};
pub use planner::{ask, generate_study_content, submit, SubmissionOutcome};
pub use ports::{PortError, PortResult, TextGenerationService};
