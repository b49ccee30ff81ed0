//! Job submission and status endpoints.
//!
//! Outcomes are signalled through the `status` field of a 200 response,
//! not through transport-level error codes; the one exception is a
//! presign failure on a completed job, which surfaces as 502.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};

use sd3_pipeline::JobReport;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Form body of `POST /text-to-image`.
#[derive(Deserialize)]
pub struct SubmitForm {
    /// The text prompt to render.
    pub text: String,
}

/// Response of a successful submission.
#[derive(Serialize)]
pub struct SubmitResponse {
    #[serde(rename = "job-id")]
    pub job_id: sd3_core::JobId,
    pub message: &'static str,
}

/// Response of `GET /results/{id}`; exactly one of `url` / `message`
/// accompanies the `status` field.
#[derive(Serialize)]
pub struct ResultResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResultResponse {
    fn invalid(id: &str) -> Self {
        Self {
            status: "ERROR",
            url: None,
            message: Some(format!("job-id={id} is invalid")),
        }
    }
}

/// POST /text-to-image -- accept a prompt and return its job id.
async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SubmitForm>,
) -> AppResult<Json<SubmitResponse>> {
    if form.text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "form field 'text' must not be empty".into(),
        ));
    }

    tracing::debug!(prompt_chars = form.text.len(), "Received text-to-image prompt");
    let job_id = state.orchestrator.submit(form.text).await?;

    Ok(Json(SubmitResponse {
        job_id,
        message: "job submitted successfully",
    }))
}

/// GET /results/{id} -- current status of a job.
///
/// Non-UUID path segments take the same invalid-id path as unknown ids, so
/// the `status` field stays the only outcome signal.
async fn results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ResultResponse>> {
    let Ok(job_id) = uuid::Uuid::parse_str(&id) else {
        return Ok(Json(ResultResponse::invalid(&id)));
    };

    let response = match state.orchestrator.status(job_id).await? {
        JobReport::NotFound => ResultResponse::invalid(&id),
        JobReport::Pending => ResultResponse {
            status: "PENDING",
            url: None,
            message: Some("Job is still processing".into()),
        },
        JobReport::Failed { message } => ResultResponse {
            status: "ERROR",
            url: None,
            message: Some(message),
        },
        JobReport::Ready { url } => ResultResponse {
            status: "SUCCESS",
            url: Some(url),
            message: None,
        },
    };

    Ok(Json(response))
}

/// Mount the job routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/text-to-image", post(submit))
        .route("/results/{id}", get(results))
}
