//! Usage samples, one per subcommand

pub mod basic;
pub mod errors;
pub mod groups;
pub mod messages;
pub mod schedules;
pub mod users;

use groupsession_client::GroupSessionClient;

use crate::config::Config;

/// Log in with the configured account, printing the outcome
pub async fn login(client: &GroupSessionClient, config: &Config) -> bool {
    println!("Logging in as {}...", config.credentials.user_id);
    let auth = client.login(&config.credentials.login()).await;

    if auth.success {
        println!("✓ Logged in\n");
    } else {
        println!("✗ Login failed: {}\n", or_na(auth.message.as_deref()));
    }
    auth.success
}

pub async fn logout(client: &GroupSessionClient) {
    println!("Logging out...");
    let response = client.logout().await;
    if response.success {
        println!("✓ Logged out\n");
    } else {
        println!("✗ Logout failed: {}\n", or_na(response.error_message()));
    }
}

/// Placeholder for absent optional fields
pub fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}
