//! Group listing, search, details and membership

use color_eyre::Result;
use groupsession_client::{Group, SearchParams, SortOrder};

use super::{login, logout, or_na};
use crate::config::Config;

fn print_group(index: usize, group: &Group) {
    let status = if group.active { "active" } else { "inactive" };
    println!(
        "  {}. {} ({}) [{status}], {} member(s)",
        index + 1,
        group.group_name,
        group.group_id,
        group.members.len()
    );
}

pub async fn run(config: &Config) -> Result<()> {
    println!("=== GroupSession client: group operations ===\n");

    let client = config.connect()?;
    if !login(&client, config).await {
        return Ok(());
    }

    println!("1. Groups");
    let groups = client
        .get_groups(Some(&SearchParams::new().page(1).page_size(10)))
        .await;
    if groups.success {
        println!(
            "✓ Showing {} of {} groups:",
            groups.items().len(),
            groups.total_count.unwrap_or_default()
        );
        for (index, group) in groups.items().iter().enumerate() {
            print_group(index, group);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(groups.error_message()));
    }

    println!("2. Search groups for \"dev\"");
    let found = client
        .get_groups(Some(&SearchParams::new().query("dev")))
        .await;
    if found.success {
        println!("✓ {} match(es)", found.items().len());
        for (index, group) in found.items().iter().enumerate() {
            print_group(index, group);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(found.error_message()));
    }

    if let Some(target) = groups.items().first() {
        println!("3. Details and members of {}", target.group_id);
        let (detail, members) = tokio::join!(
            client.get_group(&target.group_id),
            client.get_group_members(&target.group_id)
        );

        match &detail.data {
            Some(group) if detail.success => {
                println!("✓ {}", group.group_name);
                println!("  Description: {}", or_na(group.description.as_deref()));
            }
            _ => println!("✗ {}", or_na(detail.error_message())),
        }

        match &members.data {
            Some(users) if members.success => {
                println!("✓ {} member(s):", users.len());
                for user in users {
                    println!("  - {} ({})", user.user_name, user.user_id);
                }
            }
            _ => println!("✗ {}", or_na(members.error_message())),
        }
        println!();
    }

    println!("4. Groups sorted by name");
    let sorted = client
        .get_groups(Some(
            &SearchParams::new()
                .page_size(20)
                .sort_by("groupName")
                .sort_order(SortOrder::Asc),
        ))
        .await;
    if sorted.success {
        for (index, group) in sorted.items().iter().enumerate() {
            print_group(index, group);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(sorted.error_message()));
    }

    println!("5. Active groups");
    let all = client
        .get_groups(Some(&SearchParams::new().page_size(100)))
        .await;
    if all.success {
        let active: Vec<_> = all.items().iter().filter(|g| g.active).collect();
        println!("✓ {} of {} groups are active", active.len(), all.items().len());
        for (index, group) in active.into_iter().enumerate() {
            print_group(index, group);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(all.error_message()));
    }

    logout(&client).await;
    println!("=== Done ===");
    Ok(())
}
