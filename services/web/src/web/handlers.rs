//! services/web/src/web/handlers.rs
//!
//! Axum handlers behind the HTML page: showing the page, submitting the study
//! form and asking the sidebar chat a question.
//!
//! Every event handler registers its session and holds the session's lock
//! until the page is rendered, so the events of one session are processed one
//! at a time.

use crate::web::{
    pages::{render_page, FormValues, PageView},
    state::{AppState, SessionHandle},
};
use axum::{
    extract::State,
    response::Html,
    Extension, Form,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;
use study_planner_core::{
    domain::{SkillLevel, StudyDraft, MAX_HOURS_PER_DAY, MIN_HOURS_PER_DAY},
    planner::{self, SubmissionOutcome},
};
use tracing::{error, info, warn};

/// The date the form validates exam dates against.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

//=========================================================================================
// Form Payloads
//=========================================================================================

/// The study form as posted by the browser. Every field is kept as text so a
/// malformed value becomes a validation warning rather than a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct StudyForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub exam_date: String,
}

impl StudyForm {
    pub fn to_draft(&self) -> StudyDraft {
        StudyDraft {
            subject: self.subject.clone(),
            level: self.level.clone(),
            hours_per_day: self.hours.trim().parse().ok(),
            exam_date: parse_date(&self.exam_date),
        }
    }

    /// The values to pre-fill the form with when the page is shown again.
    fn form_values(&self, today: NaiveDate) -> FormValues {
        let defaults = FormValues::defaults(today);
        FormValues {
            subject: self.subject.clone(),
            level: self.level.parse::<SkillLevel>().unwrap_or(defaults.level),
            hours: self
                .hours
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|h| (MIN_HOURS_PER_DAY..=MAX_HOURS_PER_DAY).contains(h))
                .unwrap_or(defaults.hours),
            exam_date: parse_date(&self.exam_date).unwrap_or(defaults.exam_date),
        }
    }
}

/// The sidebar chat form.
#[derive(Debug, Default, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// Parses the `YYYY-MM-DD` value sent by an HTML date input.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

//=========================================================================================
// Page Handlers
//=========================================================================================

/// GET / - Show the page with the session's chat history.
pub async fn index_handler(Extension(handle): Extension<SessionHandle>) -> Html<String> {
    let session = handle.session.lock().await;
    let today = today();
    Html(render_page(&PageView {
        today,
        form: FormValues::defaults(today),
        history: &session.history,
        chat_error: None,
        outcome: None,
    }))
}

/// POST /plan - Validate the study form and generate the plan and notes.
pub async fn plan_form_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(handle): Extension<SessionHandle>,
    Form(form): Form<StudyForm>,
) -> Html<String> {
    let stored = app_state.sessions.register(&handle).await;
    let session = stored.lock().await;
    let today = today();

    let outcome = planner::submit(app_state.generator.as_ref(), form.to_draft(), today).await;
    log_outcome(&handle, &outcome);

    Html(render_page(&PageView {
        today,
        form: form.form_values(today),
        history: &session.history,
        chat_error: None,
        outcome: Some(&outcome),
    }))
}

/// POST /ask - Answer a sidebar question and show the updated history.
pub async fn ask_form_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(handle): Extension<SessionHandle>,
    Form(form): Form<AskForm>,
) -> Html<String> {
    let stored = app_state.sessions.register(&handle).await;
    let mut session = stored.lock().await;
    let today = today();

    let chat_error =
        match planner::ask(app_state.generator.as_ref(), &mut session.history, &form.question)
            .await
        {
            Ok(Some(_)) => {
                info!("Answered chat question for session {}", handle.id);
                None
            }
            Ok(None) => None,
            Err(e) => {
                error!("Chat question failed for session {}: {}", handle.id, e);
                Some(e.to_string())
            }
        };

    Html(render_page(&PageView {
        today,
        form: FormValues::defaults(today),
        history: &session.history,
        chat_error: chat_error.as_deref(),
        outcome: None,
    }))
}

pub(crate) fn log_outcome(handle: &SessionHandle, outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Invalid(e) => {
            warn!("Rejected study form for session {}: {}", handle.id, e)
        }
        SubmissionOutcome::Generated(_) => {
            info!("Generated study plan and notes for session {}", handle.id)
        }
        SubmissionOutcome::Failed(e) => {
            error!("Study content generation failed for session {}: {}", handle.id, e)
        }
    }
}
