//! Schedule create, read, update, search and delete

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone, Utc};
use color_eyre::Result;
use groupsession_client::{
    CreateScheduleRequest, Schedule, SearchParams, SortOrder, UpdateScheduleRequest,
};

use super::{login, logout, or_na};
use crate::config::Config;

/// Start and end of a 90 minute meeting at 10:00 tomorrow, as RFC 3339
fn tomorrow_meeting(now: DateTime<Local>) -> Option<(String, String)> {
    let day = now.date_naive().checked_add_days(Days::new(1))?;
    let start = Local
        .from_local_datetime(&day.and_time(NaiveTime::from_hms_opt(10, 0, 0)?))
        .earliest()?;
    let end = start + chrono::Duration::minutes(90);
    Some((
        start.with_timezone(&Utc).to_rfc3339(),
        end.with_timezone(&Utc).to_rfc3339(),
    ))
}

/// Schedules starting after `now`; unparseable dates are skipped
fn upcoming<'a>(schedules: &'a [Schedule], now: DateTime<Utc>) -> Vec<&'a Schedule> {
    schedules
        .iter()
        .filter(|s| {
            DateTime::parse_from_rfc3339(&s.start_date)
                .map(|start| start.with_timezone(&Utc) > now)
                .unwrap_or(false)
        })
        .collect()
}

fn print_schedule(schedule: &Schedule) {
    println!("  ID: {}", schedule.schedule_id);
    println!("  Title: {}", schedule.title);
    println!("  When: {} - {}", schedule.start_date, schedule.end_date);
    println!("  Location: {}", or_na(schedule.location.as_deref()));
    println!("  Attendees: [{}]", schedule.attendees.join(", "));
    println!("  Created by {} at {}", schedule.created_by, schedule.created_at);
}

pub async fn run(config: &Config) -> Result<()> {
    println!("=== GroupSession client: schedule CRUD ===\n");

    let client = config.connect()?;
    if !login(&client, config).await {
        return Ok(());
    }

    println!("1. Existing schedules");
    let existing = client
        .get_schedules(Some(&SearchParams::new().page(1).page_size(5)))
        .await;
    if existing.success {
        println!(
            "✓ Showing {} of {}:",
            existing.items().len(),
            existing.total_count.unwrap_or_default()
        );
        for (index, schedule) in existing.items().iter().enumerate() {
            println!(
                "  {}. {} ({} - {})",
                index + 1,
                schedule.title,
                schedule.start_date,
                schedule.end_date
            );
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(existing.error_message()));
    }

    println!("2. Create schedule");
    let Some((start_date, end_date)) = tomorrow_meeting(Local::now()) else {
        eyre::bail!("could not compute tomorrow's meeting time");
    };
    let request = CreateScheduleRequest {
        title: "Sample meeting - API test".into(),
        description: Some("Created by the GroupSession client samples.".into()),
        start_date,
        end_date,
        location: Some("Meeting room A".into()),
        attendees: Some(vec!["admin".into(), "user1".into(), "user2".into()]),
    };
    let created = client.create_schedule(&request).await;
    let created_id = match created.data {
        Some(schedule) if created.success => {
            println!("✓ Created:");
            print_schedule(&schedule);
            println!();
            Some(schedule.schedule_id)
        }
        _ => {
            println!("✗ {}\n", or_na(created.error.as_deref()));
            None
        }
    };

    if let Some(schedule_id) = &created_id {
        println!("3. Read back {schedule_id}");
        let detail = client.get_schedule(schedule_id).await;
        match &detail.data {
            Some(schedule) if detail.success => {
                print_schedule(schedule);
                println!("  Description: {}\n", or_na(schedule.description.as_deref()));
            }
            _ => println!("✗ {}\n", or_na(detail.error_message())),
        }

        println!("4. Update {schedule_id}");
        let update = UpdateScheduleRequest {
            title: Some("Sample meeting - API test (updated)".into()),
            description: Some("Changed by the update step.".into()),
            location: Some("Meeting room B".into()),
            attendees: Some(vec![
                "admin".into(),
                "user1".into(),
                "user2".into(),
                "user3".into(),
            ]),
            ..UpdateScheduleRequest::new(schedule_id.clone())
        };
        let updated = client.update_schedule(&update).await;
        match &updated.data {
            Some(schedule) if updated.success => {
                print_schedule(schedule);
                println!("  Updated at: {}\n", schedule.updated_at);
            }
            _ => println!("✗ {}\n", or_na(updated.error_message())),
        }
    }

    println!("5. Search schedules for \"API\"");
    let found = client
        .get_schedules(Some(&SearchParams::new().query("API").page(1).page_size(10)))
        .await;
    if found.success {
        println!("✓ {} match(es)", found.items().len());
        for (index, schedule) in found.items().iter().enumerate() {
            println!("  {}. {}", index + 1, schedule.title);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(found.error_message()));
    }

    println!("6. Upcoming schedules");
    let by_start = client
        .get_schedules(Some(
            &SearchParams::new()
                .page(1)
                .page_size(10)
                .sort_by("startDate")
                .sort_order(SortOrder::Asc),
        ))
        .await;
    if by_start.success {
        let soon = upcoming(by_start.items(), Utc::now());
        println!("✓ {} upcoming", soon.len());
        for (index, schedule) in soon.iter().take(5).enumerate() {
            println!("  {}. {} at {}", index + 1, schedule.title, schedule.start_date);
        }
        if soon.len() > 5 {
            println!("  ... and {} more", soon.len() - 5);
        }
        println!();
    } else {
        println!("✗ {}\n", or_na(by_start.error_message()));
    }

    if let Some(schedule_id) = &created_id {
        println!("7. Delete {schedule_id}");
        let deleted = client.delete_schedule(schedule_id).await;
        if deleted.success {
            let check = client.get_schedule(schedule_id).await;
            if check.success {
                println!("⚠ Schedule still appears to exist\n");
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
