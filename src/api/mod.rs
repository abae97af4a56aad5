//! HTTP API for the leave engine.
//!
//! This module exposes login, leave application, the three leave views,
//! approval and holiday lookup as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{Authenticated, SESSION_HEADER, create_router};
pub use request::{ApplicationsRequest, ApproveRequest, HolidaysRequest, StatusFilter};
pub use response::{ApiError, ApiErrorResponse, ApplyResponse, ApproveResponse, LoginResponse};
pub use state::AppState;
