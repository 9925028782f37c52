//! groupsession-client: HTTP client library for the GroupSession REST API
//!
//! Wraps authentication, users, groups, schedules and messages behind one
//! typed client. The client keeps a single session token, sends it as
//! `X-Session-ID` on every request, and drops it when the server answers 401.
//!
//! Every API call returns the server's result envelope; failures of any kind
//! (network, timeout, error status) come back as `success: false` with an
//! `error` message instead of an `Err`.
//!
//! # Example
//!
//! ```no_run
//! use groupsession_client::{ClientConfig, GroupSessionClient, LoginCredentials, SearchParams};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroupSessionClient::new(
//!     ClientConfig::new("http://localhost:8080/gsession").with_timeout_ms(30_000),
//! )?;
//!
//! let auth = client.login(&LoginCredentials::new("admin", "admin")).await;
//! if !auth.success {
//!     return Ok(());
//! }
//!
//! let users = client
//!     .get_users(Some(&SearchParams::new().page(1).page_size(10)))
//!     .await;
//! for user in users.items() {
//!     println!("{} ({})", user.user_name, user.user_id);
//! }
//!
//! client.logout().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS};
pub use error::{ClientError, Result, UNKNOWN_ERROR};
pub use http::{Envelope, GroupSessionClient, SESSION_HEADER};
pub use session::Session;

pub use groupsession_api::{
    ApiResponse, AuthResponse, CreateScheduleRequest, Group, LoginCredentials, Message,
    PaginatedResponse, Schedule, SearchParams, SendMessageRequest, SortOrder,
    UpdateScheduleRequest, User,
};
