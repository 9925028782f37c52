//! User lookup, listing, search and paging

use color_eyre::Result;
use groupsession_client::{SearchParams, SortOrder, User};

use super::{login, logout, or_na};
use crate::config::Config;

fn print_user(index: usize, user: &User) {
    let status = if user.active { "active" } else { "inactive" };
    println!("  {}. {} ({}) [{status}]", index + 1, user.user_name, user.user_id);
    println!(
        "     {} / {}",
        or_na(user.department.as_deref()),
        or_na(user.position.as_deref())
    );
}

pub async fn run(config: &Config) -> Result<()> {
    println!("=== GroupSession client: user management ===\n");

    let client = config.connect()?;
    if !login(&client, config).await {
        return Ok(());
    }

    println!("1. Current user");
    let current = client.get_current_user().await;
    match &current.data {
        Some(user) if current.success => {
            println!("✓ {} ({})", user.user_name, user.user_id);
            println!("  Last login: {}\n", or_na(user.last_login.as_deref()));
        }
        _ => println!("✗ {}\n", or_na(current.error_message())),
    }

    println!("2. First page of users");
    let users = client
        .get_users(Some(&SearchParams::new().page(1).page_size(10)))
        .await;
    if users.success {
        println!(
            "✓ Showing {} of {} users:",
            users.items().len(),
            users.total_count.unwrap_or_default()
        );
        for (index, user) in users.items().iter().enumerate() {
            print_user(index, user);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(users.error_message()));
    }

    println!("3. Search users for \"admin\"");
    let found = client
        .get_users(Some(&SearchParams::new().query("admin")))
        .await;
    if found.success {
        println!("✓ {} match(es)", found.items().len());
        for (index, user) in found.items().iter().enumerate() {
            print_user(index, user);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(found.error_message()));
    }

    if let Some(first) = users.items().first() {
        println!("4. Details for {}", first.user_id);
        let detail = client.get_user(&first.user_id).await;
        match &detail.data {
            Some(user) if detail.success => {
                println!("✓ {} <{}>\n", user.user_name, or_na(user.email.as_deref()));
            }
            _ => println!("✗ {}\n", or_na(detail.error_message())),
        }
    }

    println!("5. Page 2 sorted by name");
    let page2 = client
        .get_users(Some(
            &SearchParams::new()
                .page(2)
                .page_size(5)
                .sort_by("userName")
                .sort_order(SortOrder::Asc),
        ))
        .await;
    if page2.success {
        println!(
            "✓ Page {} ({} per page):",
            page2.page.unwrap_or(2),
            page2.page_size.unwrap_or(5)
        );
        for (index, user) in page2.items().iter().enumerate() {
            print_user(index, user);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(page2.error_message()));
    }

    logout(&client).await;
    println!("=== Done ===");
    Ok(())
}
