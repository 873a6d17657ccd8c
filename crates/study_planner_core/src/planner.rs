//! crates/study_planner_core/src/planner.rs
//!
//! Orchestrates one form submission or one chat question against a
//! `TextGenerationService`.

use crate::domain::{
    ChatHistory, ChatTurn, GeneratedContent, StudyDraft, StudyRequest, ValidationError,
};
use crate::ports::{PortResult, TextGenerationService};
use crate::prompts::{build_chat_prompt, build_notes_prompt, build_plan_prompt};
use chrono::NaiveDate;

/// The result of submitting the study form once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The draft failed validation; the generator was not called.
    Invalid(ValidationError),
    /// Both the plan and the notes were generated.
    Generated(GeneratedContent),
    /// A generation call failed; nothing that was generated is kept.
    Failed(String),
}

/// Validates a draft and, if it is valid, generates the plan and the notes.
pub async fn submit(
    generator: &dyn TextGenerationService,
    draft: StudyDraft,
    today: NaiveDate,
) -> SubmissionOutcome {
    let request = match StudyRequest::validate(draft, today) {
        Ok(request) => request,
        Err(e) => return SubmissionOutcome::Invalid(e),
    };

    match generate_study_content(generator, &request, today).await {
        Ok(content) => SubmissionOutcome::Generated(content),
        Err(e) => SubmissionOutcome::Failed(e.to_string()),
    }
}

/// Generates the plan and then the notes for a validated request.
///
/// The calls are made one after the other and fail as a unit.
pub async fn generate_study_content(
    generator: &dyn TextGenerationService,
    request: &StudyRequest,
    today: NaiveDate,
) -> PortResult<GeneratedContent> {
    let plan_prompt = build_plan_prompt(
        request.subject(),
        request.level(),
        request.hours_per_day(),
        request.days_left(today),
    );
    let notes_prompt = build_notes_prompt(request.subject());

    let plan = generator.generate(&plan_prompt).await?;
    let notes = generator.generate(&notes_prompt).await?;

    Ok(GeneratedContent { plan, notes })
}

/// Answers a sidebar question and appends the exchange to `history`.
///
/// A blank question is ignored and returns `Ok(None)` without calling the
/// generator. On failure the history is left untouched.
pub async fn ask<'h>(
    generator: &dyn TextGenerationService,
    history: &'h mut ChatHistory,
    question: &str,
) -> PortResult<Option<&'h ChatTurn>> {
    if question.trim().is_empty() {
        return Ok(None);
    }

    let answer = generator.generate(&build_chat_prompt(question)).await?;
    Ok(Some(history.push(ChatTurn {
        question: question.to_string(),
        answer,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every prompt and answers from a script, failing on the call
    /// numbers listed in `fail_on`.
    #[derive(Default)]
    struct ScriptedGenerator {
        prompts: Mutex<Vec<String>>,
        fail_on: Vec<usize>,
    }

    impl ScriptedGenerator {
        fn failing_on(calls: &[usize]) -> Self {
            Self {
                fail_on: calls.to_vec(),
                ..Self::default()
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerationService for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> PortResult<String> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            let call = prompts.len();
            if self.fail_on.contains(&call) {
                return Err(PortError::Unexpected(format!("quota exceeded on call {call}")));
            }
            Ok(format!("response #{call}"))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    fn draft(subject: &str, days_ahead: i64) -> StudyDraft {
        StudyDraft {
            subject: subject.to_string(),
            level: "Beginner".to_string(),
            hours_per_day: Some(2),
            exam_date: Some(today() + chrono::Duration::days(days_ahead)),
        }
    }

    #[tokio::test]
    async fn empty_subject_never_reaches_the_generator() {
        let generator = ScriptedGenerator::default();
        for subject in ["", "   ", "\n\t"] {
            let outcome = submit(&generator, draft(subject, 3), today()).await;
            assert_eq!(outcome, SubmissionOutcome::Invalid(ValidationError::EmptySubject));
        }
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn valid_submission_generates_plan_then_notes() {
        let generator = ScriptedGenerator::default();
        let outcome = submit(&generator, draft("Python Programming", 10), today()).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Generated(GeneratedContent {
                plan: "response #1".to_string(),
                notes: "response #2".to_string(),
            })
        );
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Exam in 10 days"));
        assert!(prompts[0].contains("Level: Beginner"));
        assert!(prompts[1].contains("Topic: Python Programming"));
    }

    #[tokio::test]
    async fn failure_on_either_call_discards_both_outputs() {
        for failing_call in [1, 2] {
            let generator = ScriptedGenerator::failing_on(&[failing_call]);
            let outcome = submit(&generator, draft("Geography", 5), today()).await;
            assert_eq!(
                outcome,
                SubmissionOutcome::Failed(format!("quota exceeded on call {failing_call}"))
            );
        }
    }

    #[tokio::test]
    async fn plan_failure_skips_the_notes_call() {
        let generator = ScriptedGenerator::failing_on(&[1]);
        submit(&generator, draft("Geography", 5), today()).await;
        assert_eq!(generator.prompts().len(), 1);
    }

    #[tokio::test]
    async fn identical_submissions_are_generated_independently() {
        // Results are not cached, so the same draft calls the model again and
        // may get a different answer.
        let generator = ScriptedGenerator::default();
        let first = submit(&generator, draft("Economics", 4), today()).await;
        let second = submit(&generator, draft("Economics", 4), today()).await;

        assert_eq!(generator.prompts().len(), 4);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn ask_appends_one_turn_in_order() {
        let generator = ScriptedGenerator::default();
        let mut history = ChatHistory::new();

        for question in ["What is recursion?", "And iteration?"] {
            let turn = ask(&generator, &mut history, question).await.unwrap().unwrap();
            assert_eq!(turn.question, question);
        }

        let turns: Vec<_> = history.iter().cloned().collect();
        assert_eq!(
            turns,
            vec![
                ChatTurn {
                    question: "What is recursion?".to_string(),
                    answer: "response #1".to_string(),
                },
                ChatTurn {
                    question: "And iteration?".to_string(),
                    answer: "response #2".to_string(),
                },
            ]
        );
        assert!(generator.prompts()[0].starts_with("Answer briefly in simple words for a student:\n"));
    }

    #[tokio::test]
    async fn blank_question_is_ignored() {
        let generator = ScriptedGenerator::default();
        let mut history = ChatHistory::new();

        assert!(ask(&generator, &mut history, "  ").await.unwrap().is_none());
        assert!(history.is_empty());
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn failed_question_leaves_history_untouched() {
        let generator = ScriptedGenerator::failing_on(&[2]);
        let mut history = ChatHistory::new();

        ask(&generator, &mut history, "first").await.unwrap();
        let err = ask(&generator, &mut history, "second").await.unwrap_err();

        assert_eq!(err.to_string(), "quota exceeded on call 2");
        assert_eq!(history.len(), 1);
        assert_eq!(history.iter().next().unwrap().answer, "response #1");
    }
}
