//! Failure handling: bad credentials, missing session, unreachable server,
//! timeouts, missing resources, a caller-side retry loop, and grouping
//! error messages into categories.

use std::fmt;
use std::time::Duration;

use color_eyre::Result;
use eyre::eyre;
use groupsession_client::{
    ApiResponse, ClientConfig, CreateScheduleRequest, GroupSessionClient, LoginCredentials,
};

use super::{login, or_na};
use crate::config::Config;

/// Retry `request` until it reports success, sleeping `delay` between tries
///
/// # Errors
/// Returns the last failure message once `max_attempts` tries have failed.
pub async fn retry_request<T, F, Fut>(
    mut request: F,
    max_attempts: u32,
    delay: Duration,
) -> Result<ApiResponse<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResponse<T>>,
{
    let mut last_error = String::from("no attempts made");

    for attempt in 1..=max_attempts {
        println!("   attempt {attempt}/{max_attempts}...");
        let response = request().await;
        if response.success {
            println!("   ✓ succeeded on attempt {attempt}");
            return Ok(response);
        }
        last_error = response
            .error_message()
            .unwrap_or("API call failed")
            .to_string();
        tracing::debug!(attempt, error = %last_error, "attempt failed");

        if attempt < max_attempts {
            tokio::time::sleep(delay).await;
        }
    }

    Err(eyre!("failed after {max_attempts} attempts: {last_error}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Timeout,
    Authentication,
    Permission,
    NotFound,
    Validation,
    Server,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Network => "network error",
            Self::Timeout => "timeout",
            Self::Authentication => "authentication error",
            Self::Permission => "permission error",
            Self::NotFound => "resource not found",
            Self::Validation => "validation error",
            Self::Server => "server error",
            Self::Unknown => "unknown error",
        };
        f.write_str(label)
    }
}

/// Guess a category from the text of an error message
pub fn categorize_error(error: Option<&str>) -> ErrorCategory {
    let Some(error) = error.filter(|e| !e.is_empty()) else {
        return ErrorCategory::Unknown;
    };
    let error = error.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| error.contains(w));

    if mentions(&["network", "connection", "error sending request"]) {
        ErrorCategory::Network
    } else if mentions(&["timeout", "timed out"]) {
        ErrorCategory::Timeout
    } else if mentions(&["unauthorized", "401"]) {
        ErrorCategory::Authentication
    } else if mentions(&["forbidden", "403"]) {
        ErrorCategory::Permission
    } else if mentions(&["not found", "404"]) {
        ErrorCategory::NotFound
    } else if mentions(&["validation", "invalid"]) {
        ErrorCategory::Validation
    } else {
        ErrorCategory::Server
    }
}

fn report(label: &str, success: bool, error: Option<&str>) {
    if success {
        println!("⚠ {label}: unexpected success");
    } else {
        println!("✓ {label}: {} [{}]", or_na(error), categorize_error(error));
    }
}

pub async fn run(config: &Config) -> Result<()> {
    println!("=== GroupSession client: error handling ===\n");

    let client = config.connect()?;

    println!("1. Invalid credentials");
    let invalid = client
        .login(&LoginCredentials::new("invalid_user", "wrong_password"))
        .await;
    report("login rejected", invalid.success, invalid.message.as_deref());

    println!("\n2. Call without a session");
    let anonymous = client.get_current_user().await;
    report("unauthenticated call", anonymous.success, anonymous.error_message());
    println!("   authenticated: {}", client.is_authenticated());

    println!("\n3. Unreachable server");
    let unreachable = GroupSessionClient::new(
        ClientConfig::new("http://invalid-host:9999/gsession").with_timeout_ms(5_000),
    )?;
    let users = unreachable.get_users(None).await;
    report("network failure", users.success, users.error_message());

    println!("\n4. Very short timeout");
    let mut hasty = config.client.clone();
    hasty.timeout_ms = Some(1);
    let hasty = GroupSessionClient::new(hasty)?;
    let me = hasty.get_current_user().await;
    if me.success {
        println!("✓ server answered within 1ms");
    } else {
        report("timeout", me.success, me.error_message());
    }

    println!();
    if login(&client, config).await {
        println!("5. Missing user");
        let missing = client.get_user("non_existent_user_12345").await;
        report("missing user", missing.success, missing.error_message());

        println!("\n6. Deleting a missing schedule");
        let deleted = client.delete_schedule("non_existent_schedule_12345").await;
        report("missing schedule", deleted.success, deleted.error_message());

        println!("\n7. Invalid schedule data");
        let invalid = client
            .create_schedule(&CreateScheduleRequest {
                title: String::new(),
                start_date: "invalid-date".into(),
                end_date: "invalid-date".into(),
                ..Default::default()
            })
            .await;
        report("validation", invalid.success, invalid.error_message());

        println!("\n8. Retry loop against a missing user");
        match retry_request(
            || client.get_user("definitely_non_existent_user"),
            3,
            Duration::from_millis(500),
        )
        .await
        {
            Ok(_) => println!("⚠ retry unexpectedly succeeded"),
            Err(err) => println!("✓ gave up: {err}"),
        }
    } else {
        println!("Skipping steps that need a session\n");
    }

    println!("\n9. Categorizing messages");
    for (index, message) in [
        "Network error occurred",
        "Request timeout",
        "Unauthorized access",
        "User not found",
        "Invalid date format",
        "Internal server error",
    ]
    .into_iter()
    .enumerate()
    {
        println!(
            "   {}. \"{message}\" -> {}",
            index + 1,
            categorize_error(Some(message))
        );
    }

    if client.is_authenticated() {
        println!();
        super::logout(&client).await;
    }

    println!("\n=== Done ===");
    println!("Always check `success`; retry network failures; log in again after a 401.");
    Ok(())
}
