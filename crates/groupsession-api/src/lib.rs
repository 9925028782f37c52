//! groupsession-api: Shared wire types for the GroupSession REST API
//!
//! Contains entity records, request payloads and the result envelopes the
//! server wraps every response in. All JSON field names are camelCase.

pub mod models;
pub mod requests;
pub mod responses;

pub use models::{Group, Message, Schedule, User};
pub use requests::{
    CreateScheduleRequest, LoginCredentials, SearchParams, SendMessageRequest, SortOrder,
    UpdateScheduleRequest,
};
pub use responses::{ApiResponse, AuthResponse, PaginatedResponse};
