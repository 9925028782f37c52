//! Sending, reading, marking and deleting messages

use color_eyre::Result;
use groupsession_client::{Message, SearchParams, SendMessageRequest, SortOrder};

use super::{login, logout, or_na};
use crate::config::Config;

fn print_message(index: usize, message: &Message) {
    let marker = if message.read { " " } else { "*" };
    println!(
        "  {}.{marker} {} (from {}, {})",
        index + 1,
        message.subject,
        message.from,
        message.sent_at
    );
}

/// Messages not yet read
fn unread(messages: &[Message]) -> Vec<&Message> {
    messages.iter().filter(|m| !m.read).collect()
}

pub async fn run(config: &Config) -> Result<()> {
    println!("=== GroupSession client: messaging ===\n");

    let client = config.connect()?;
    if !login(&client, config).await {
        return Ok(());
    }

    println!("1. Inbox");
    let inbox = client
        .get_messages(Some(&SearchParams::new().page(1).page_size(10)))
        .await;
    if inbox.success {
        println!(
            "✓ Showing {} of {} (* = unread):",
            inbox.items().len(),
            inbox.total_count.unwrap_or_default()
        );
        for (index, message) in inbox.items().iter().enumerate() {
            print_message(index, message);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(inbox.error_message()));
    }

    println!("2. Send message");
    let request = SendMessageRequest {
        subject: "Sample message - API test".into(),
        body: "This message was sent by the GroupSession client samples.".into(),
        to: vec!["user1".into(), "user2".into()],
        cc: Some(vec!["user3".into()]),
        bcc: None,
    };
    let sent = client.send_message(&request).await;
    let sent_id = match sent.data {
        Some(message) if sent.success => {
            println!("✓ Sent {} to [{}]\n", message.message_id, message.to.join(", "));
            Some(message.message_id)
        }
        _ => {
            println!("✗ {}\n", or_na(sent.error.as_deref()));
            None
        }
    };

    if let Some(message_id) = &sent_id {
        println!("3. Read back {message_id}");
        let detail = client.get_message(message_id).await;
        match &detail.data {
            Some(message) if detail.success => {
                println!("  Subject: {}", message.subject);
                println!("  From: {}", message.from);
                println!("  To: [{}]", message.to.join(", "));
                if let Some(cc) = &message.cc {
                    println!("  Cc: [{}]", cc.join(", "));
                }
                println!("  Read: {}", message.read);
                println!("  Body: {}\n", message.body);
            }
            _ => println!("✗ {}\n", or_na(detail.error_message())),
        }
    }

    println!("4. Search messages for \"API\"");
    let found = client
        .get_messages(Some(&SearchParams::new().query("API")))
        .await;
    if found.success {
        println!("✓ {} match(es)", found.items().len());
        for (index, message) in found.items().iter().enumerate() {
            print_message(index, message);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(found.error_message()));
    }

    println!("5. Unread messages");
    let recent = client
        .get_messages(Some(&SearchParams::new().page_size(50)))
        .await;
    if recent.success {
        let pending = unread(recent.items());
        println!("✓ {} unread of {}", pending.len(), recent.items().len());
        for (index, message) in pending.into_iter().enumerate() {
            print_message(index, message);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(recent.error_message()));
    }

    if let Some(message_id) = &sent_id {
        println!("6. Mark {message_id} as read");
        let marked = client.mark_message_as_read(message_id).await;
        if marked.success {
            let check = client.get_message(message_id).await;
            let read = check.data.is_some_and(|m| m.read);
            println!("✓ Marked, read flag now {read}\n");
        } else {
            println!("✗ {}\n", or_na(marked.error_message()));
        }
    }

    println!("7. Latest messages");
    let latest = client
        .get_messages(Some(
            &SearchParams::new()
                .page(1)
                .page_size(5)
                .sort_by("sentAt")
                .sort_order(SortOrder::Desc),
        ))
        .await;
    if latest.success {
        for (index, message) in latest.items().iter().enumerate() {
            print_message(index, message);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(latest.error_message()));
    }

    if let Some(message_id) = &sent_id {
        println!("8. Delete {message_id}");
        let deleted = client.delete_message(message_id).await;
        if deleted.success {
            if client.get_message(message_id).await.success {
                println!("⚠ Message still appears to exist\n");
            } else {
                println!("✓ Deleted\n");
            }
        } else {
            println!("✗ {}\n", or_na(deleted.error_message()));
        }
    }

    logout(&client).await;
    println!("=== Done ===");
    Ok(())
}
