//! services/web/src/web/rest.rs
//!
//! Contains the Axum handlers for the JSON API and the master definition for
//! the OpenAPI specification.

use crate::web::{
    handlers::{log_outcome, parse_date, today},
    state::{AppState, SessionHandle},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_planner_core::{
    domain::{ChatHistory, StudyDraft},
    planner::{self, SubmissionOutcome},
};
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        plan_api_handler,
        chat_api_handler,
        chat_history_handler,
    ),
    components(
        schemas(StudyPlanPayload, GeneratedContentResponse, ChatQuestionPayload,
            ChatHistoryResponse, ChatTurnResponse, ErrorResponse)
    ),
    tags(
        (name = "AI Smart Study Planner API", description = "Study plans, revision notes and a help chat generated by Gemini.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The parameters of a study plan request.
///
/// Missing fields are reported by validation, in the same order as on the form.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct StudyPlanPayload {
    pub subject: String,
    /// One of `Beginner`, `Intermediate` or `Advanced`.
    pub level: String,
    /// Between 1 and 10.
    pub hours_per_day: Option<i64>,
    /// `YYYY-MM-DD`, not before today.
    #[schema(example = "2030-06-01")]
    pub exam_date: Option<String>,
}

impl StudyPlanPayload {
    fn into_draft(self) -> StudyDraft {
        StudyDraft {
            subject: self.subject,
            level: self.level,
            hours_per_day: self.hours_per_day,
            exam_date: self.exam_date.as_deref().and_then(parse_date),
        }
    }
}

/// The study plan and revision notes generated for one request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratedContentResponse {
    pub plan: String,
    pub notes: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ChatQuestionPayload {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatTurnResponse {
    pub question: String,
    pub answer: String,
}

/// The session's chat history, oldest turn first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub turns: Vec<ChatTurnResponse>,
}

impl From<&ChatHistory> for ChatHistoryResponse {
    fn from(history: &ChatHistory) -> Self {
        Self {
            turns: history
                .iter()
                .map(|turn| ChatTurnResponse {
                    question: turn.question.clone(),
                    answer: turn.answer.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

/// Reports a body the `Json` extractor could not read with the usual error shape.
fn rejected(rejection: JsonRejection) -> (StatusCode, Json<ErrorResponse>) {
    api_error(rejection.status(), rejection.body_text())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a study plan and revision notes.
///
/// Makes two sequential calls to the model. If either fails, neither text is returned.
#[utoipa::path(
    post,
    path = "/api/plan",
    request_body = StudyPlanPayload,
    responses(
        (status = 200, description = "Plan and notes generated", body = GeneratedContentResponse),
        (status = 400, description = "The body is not valid JSON", body = ErrorResponse),
        (status = 422, description = "The request failed validation", body = ErrorResponse),
        (status = 502, description = "The model call failed", body = ErrorResponse)
    )
)]
pub async fn plan_api_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(handle): Extension<SessionHandle>,
    payload: Result<Json<StudyPlanPayload>, JsonRejection>,
) -> ApiResult<GeneratedContentResponse> {
    let Json(payload) = payload.map_err(rejected)?;
    let stored = app_state.sessions.register(&handle).await;
    let _session = stored.lock().await;

    let outcome =
        planner::submit(app_state.generator.as_ref(), payload.into_draft(), today()).await;
    log_outcome(&handle, &outcome);

    match outcome {
        SubmissionOutcome::Generated(content) => Ok(Json(GeneratedContentResponse {
            plan: content.plan,
            notes: content.notes,
        })),
        SubmissionOutcome::Invalid(e) => {
            Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
        SubmissionOutcome::Failed(message) => Err(api_error(StatusCode::BAD_GATEWAY, message)),
    }
}

/// Ask the help chat a question and get the session's updated history.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatQuestionPayload,
    responses(
        (status = 200, description = "Question answered and appended", body = ChatHistoryResponse),
        (status = 400, description = "The question was blank or the body is not valid JSON", body = ErrorResponse),
        (status = 502, description = "The model call failed", body = ErrorResponse)
    )
)]
pub async fn chat_api_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(handle): Extension<SessionHandle>,
    payload: Result<Json<ChatQuestionPayload>, JsonRejection>,
) -> ApiResult<ChatHistoryResponse> {
    let Json(payload) = payload.map_err(rejected)?;
    let stored = app_state.sessions.register(&handle).await;
    let mut session = stored.lock().await;

    let asked =
        planner::ask(app_state.generator.as_ref(), &mut session.history, &payload.question).await;
    match asked {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(api_error(StatusCode::BAD_REQUEST, "Please enter a question."));
        }
        Err(e) => {
            error!("Chat question failed for session {}: {}", handle.id, e);
            return Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()));
        }
    }

    Ok(Json(ChatHistoryResponse::from(&session.history)))
}

/// Get the session's chat history.
#[utoipa::path(
    get,
    path = "/api/chat",
    responses(
        (status = 200, description = "The chat history, oldest first", body = ChatHistoryResponse)
    )
)]
pub async fn chat_history_handler(
    Extension(handle): Extension<SessionHandle>,
) -> Json<ChatHistoryResponse> {
    let session = handle.session.lock().await;
    Json(ChatHistoryResponse::from(&session.history))
}
