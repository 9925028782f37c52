//! Login, authentication state, session save/restore and logout

use color_eyre::Result;

use super::{login, or_na};
use crate::config::Config;

pub async fn run(config: &Config) -> Result<()> {
    println!("=== GroupSession client: basic usage ===\n");

    println!("1. Creating client for {}", config.client.base_url);
    let client = config.connect()?;
    println!("✓ Client ready\n");

    println!("2. Login");
    if !login(&client, config).await {
        return Ok(());
    }
    println!("  Session ID: {}\n", or_na(client.session_id().as_deref()));

    println!("3. Authentication state");
    if client.is_authenticated() {
        println!("✓ Authenticated\n");
    } else {
        println!("✗ Not authenticated\n");
        return Ok(());
    }

    println!("4. Current user");
    let current = client.get_current_user().await;
    match &current.data {
        Some(user) if current.success => {
            println!("✓ User: {} ({})", user.user_name, user.user_id);
            println!("  Email: {}", or_na(user.email.as_deref()));
            println!("  Department: {}\n", or_na(user.department.as_deref()));
        }
        _ => println!("✗ Could not load current user: {}\n", or_na(current.error_message())),
    }

    println!("5. Session management");
    let saved = client.session_id();
    client.clear_session();
    println!("  Session cleared, authenticated: {}", client.is_authenticated());
    if let Some(session_id) = saved {
        client.set_session_id(session_id);
        println!("  Session restored, authenticated: {}\n", client.is_authenticated());
    }

    println!("6. Logout");
    let response = client.logout().await;
    if response.success {
        println!("✓ Logged out, authenticated: {}\n", client.is_authenticated());
    } else {
        println!("✗ Logout failed: {}\n", or_na(response.error_message()));
    }

    println!("=== Done ===");
    Ok(())
}
