//! HTTP request handlers for the leave API.
//!
//! This module contains the router, the session extractor, and the handler
//! functions for all API endpoints.

use axum::{
    Json, Router, async_trait,
    extract::{FromRequestParts, State, rejection::JsonRejection},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::approval::approve_each;
use crate::decomposition::submit_application;
use crate::error::EngineError;
use crate::models::{ApprovalState, HolidayQuery, Identity, LeaveApplication};
use crate::session::{Authenticator, Credentials, SessionToken};
use crate::store::{Directory, HolidaySource};
use crate::visibility::{TeamClaim, ViewOutcome, approver_view, self_view, team_view};

use super::request::{ApplicationsRequest, ApproveRequest, HolidaysRequest};
use super::response::{
    ApiError, ApiErrorResponse, ApplyResponse, ApproveResponse, LoginResponse,
};
use super::state::AppState;

/// Header carrying the session token.
pub const SESSION_HEADER: &str = "session-id";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/leaves", get(self_view_handler))
        .route("/leaves/apply", post(apply_handler))
        .route("/leaves/team", post(team_view_handler))
        .route("/leaves/applications", post(applications_handler))
        .route("/leaves/approve", post(approve_handler))
        .route("/holidays", post(holidays_handler))
        .with_state(state)
}

/// The identity bound to the request's `Session-Id` token.
///
/// Requests without a header, with an unparsable token, or with an expired
/// session are rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// The token the request presented.
    pub token: SessionToken,
    /// The identity the token resolves to.
    pub identity: Identity,
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(SessionToken::parse)
            .ok_or(EngineError::Unauthenticated)?;

        let identity = state.sessions().resolve(&token).await?;
        Ok(Self { token, identity })
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a body rejection to a 400 response.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}

fn engine_failure(correlation_id: Uuid, error: EngineError) -> Response {
    if error.is_dependency_failure() {
        warn!(correlation_id = %correlation_id, error = %error, "Dependency failure");
    } else {
        warn!(correlation_id = %correlation_id, error = %error, "Request rejected");
    }
    ApiErrorResponse::from(error).into_response()
}

fn view_response(correlation_id: Uuid, outcome: ViewOutcome) -> Response {
    match outcome {
        ViewOutcome::Found(documents) => {
            info!(
                correlation_id = %correlation_id,
                documents = documents.len(),
                "View resolved"
            );
            json_response(StatusCode::OK, documents)
        }
        ViewOutcome::NotFound => {
            info!(correlation_id = %correlation_id, "View is empty");
            ApiErrorResponse::not_found("No leave records in scope").into_response()
        }
    }
}

/// Handler for POST /login.
///
/// Resolves the caller's identity and opens a session. The token is returned
/// both in the body and in the `Session-Id` header.
async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing login");

    let credentials = match payload {
        Ok(Json(credentials)) => credentials,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let identity = match state.authenticator().authenticate(&credentials).await {
        Ok(identity) => identity,
        Err(err) => return engine_failure(correlation_id, err),
    };

    let token = state.sessions().open(identity.clone()).await;
    info!(
        correlation_id = %correlation_id,
        username = %identity.username,
        "Session opened"
    );

    let body = LoginResponse {
        session_id: token.to_string(),
        identity,
    };
    (
        StatusCode::OK,
        [(SESSION_HEADER, token.to_string())],
        Json(body),
    )
        .into_response()
}

/// Handler for POST /logout.
async fn logout_handler(State(state): State<AppState>, session: Authenticated) -> Response {
    let correlation_id = Uuid::new_v4();
    state.sessions().close(&session.token).await;
    info!(
        correlation_id = %correlation_id,
        username = %session.identity.username,
        "Session closed"
    );
    StatusCode::NO_CONTENT.into_response()
}

/// Handler for POST /leaves/apply.
///
/// Decomposes the application into business-day records and appends them to
/// the caller's leave document.
async fn apply_handler(
    State(state): State<AppState>,
    session: Authenticated,
    payload: Result<Json<LeaveApplication>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        username = %session.identity.username,
        "Processing leave application"
    );

    let application = match payload {
        Ok(Json(application)) => application,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let submission = match submit_application(
        state.store(),
        state.holidays(),
        state.policy(),
        &session.identity,
        &application,
    )
    .await
    {
        Ok(submission) => submission,
        Err(err) => return engine_failure(correlation_id, err),
    };

    if !submission.user_found() {
        warn!(
            correlation_id = %correlation_id,
            username = %application.username,
            "No leave document for applicant"
        );
        return ApiErrorResponse::not_found(format!(
            "No leave document for '{}'",
            application.username
        ))
        .into_response();
    }

    info!(
        correlation_id = %correlation_id,
        records = submission.records.len(),
        "Leave application completed"
    );
    json_response(
        StatusCode::OK,
        ApplyResponse {
            matched_count: submission.result.matched_count,
            modified_count: submission.result.modified_count,
            records: submission.records,
        },
    )
}

/// Handler for GET /leaves.
async fn self_view_handler(State(state): State<AppState>, session: Authenticated) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        username = %session.identity.username,
        "Processing self view"
    );

    match self_view(state.store(), &session.identity).await {
        Ok(outcome) => view_response(correlation_id, outcome),
        Err(err) => engine_failure(correlation_id, err),
    }
}

/// Handler for POST /leaves/team.
async fn team_view_handler(
    State(state): State<AppState>,
    session: Authenticated,
    payload: Result<Json<TeamClaim>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        username = %session.identity.username,
        "Processing team view"
    );

    let claim = match payload {
        Ok(Json(claim)) => claim,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    match team_view(state.store(), state.directory(), &claim, &session.identity).await {
        Ok(outcome) => view_response(correlation_id, outcome),
        Err(err) => engine_failure(correlation_id, err),
    }
}

/// Handler for POST /leaves/applications.
///
/// Lists the records assigned to the calling approver.
async fn applications_handler(
    State(state): State<AppState>,
    session: Authenticated,
    payload: Result<Json<ApplicationsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        username = %session.identity.username,
        "Processing approver view"
    );

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    if request.approver_name != session.identity.username {
        return engine_failure(
            correlation_id,
            EngineError::Unauthorized {
                reason: format!(
                    "'{}' cannot list applications assigned to '{}'",
                    session.identity.username, request.approver_name
                ),
            },
        );
    }

    let status = request.status.map(ApprovalState::from);
    match approver_view(state.store(), &request.approver_name, status).await {
        Ok(outcome) => view_response(correlation_id, outcome),
        Err(err) => engine_failure(correlation_id, err),
    }
}

/// Handler for POST /leaves/approve.
///
/// Decides every listed record independently and reports each outcome. Only
/// the owner's designated approver may decide.
async fn approve_handler(
    State(state): State<AppState>,
    session: Authenticated,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        approver = %session.identity.username,
        "Processing leave decisions"
    );

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let owner = match state.directory().find_user(&request.username).await {
        Ok(Some(owner)) => owner,
        Ok(None) => {
            return ApiErrorResponse::not_found(format!(
                "Unknown employee '{}'",
                request.username
            ))
            .into_response();
        }
        Err(err) => return engine_failure(correlation_id, err),
    };

    if owner.approver_name != session.identity.username {
        return engine_failure(
            correlation_id,
            EngineError::Unauthorized {
                reason: format!(
                    "'{}' is not the approver of '{}'",
                    session.identity.username, owner.username
                ),
            },
        );
    }

    match approve_each(state.store(), &request.username, &request.decisions).await {
        Ok(reports) => {
            info!(
                correlation_id = %correlation_id,
                decisions = reports.len(),
                "Leave decisions completed"
            );
            json_response(StatusCode::OK, ApproveResponse { reports })
        }
        Err(err) => engine_failure(correlation_id, err),
    }
}

/// Handler for POST /holidays.
async fn holidays_handler(
    State(state): State<AppState>,
    payload: Result<Json<HolidaysRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing holiday lookup");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let query = HolidayQuery::new(request.country, request.year);
    match state.holidays().holidays_of(&query).await {
        Ok(holidays) => {
            info!(
                correlation_id = %correlation_id,
                country = %query.country,
                year = query.year,
                holidays = holidays.len(),
                "Holiday lookup completed"
            );
            json_response(StatusCode::OK, holidays)
        }
        Err(err) => engine_failure(
            correlation_id,
            EngineError::HolidayLookupFailure {
                country: query.country,
                year: query.year,
                message: err.to_string(),
            },
        ),
    }
}
