use anyhow::{Context, Result};
use bakery_core::Transition;

use crate::format;
use crate::storage::Storage;

pub fn open() -> Result<()> {
    let storage = Storage::open()?;
    let mut tracker = storage.availability();

    match tracker.open().context("failed to open the shop")? {
        Transition::Opened(session) => {
            println!(
                "{} is open since {}.",
                storage.config.shop.name,
                format::timestamp(session.opened_at)
            );
        }
        _ => println!("{} is already open.", storage.config.shop.name),
    }

    Ok(())
}

pub fn close() -> Result<()> {
    let storage = Storage::open()?;
    let mut tracker = storage.availability();

    match tracker.close().context("failed to close the shop")? {
        Transition::Closed(session) => {
            println!(
                "{} is closed. Session lasted {}.",
                storage.config.shop.name,
                format::duration(session.duration_minutes)
            );
        }
        _ => println!("{} is already closed.", storage.config.shop.name),
    }

    Ok(())
}

pub fn status(json: bool) -> Result<()> {
    let storage = Storage::open()?;
    let tracker = storage.availability();

    if json {
        println!("{}", serde_json::to_string_pretty(tracker.state())?);
        return Ok(());
    }

    match tracker.current_session() {
        Some(session) => println!(
            "{} is OPEN since {} ({}).",
            storage.config.shop.name,
            format::timestamp(session.opened_at),
            format::duration(session.elapsed_minutes(chrono::Utc::now()))
        ),
        None => println!("{} is CLOSED.", storage.config.shop.name),
    }

    if let Some(last) = tracker.history().last() {
        println!("Last session: {}", format::session_line(last));
    }

    Ok(())
}

pub fn history(limit: Option<usize>) -> Result<()> {
    let storage = Storage::open()?;
    let tracker = storage.availability();
    let limit = limit.unwrap_or(storage.config.shop.history_limit);

    let sessions = tracker.recent_history(limit);
    if sessions.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    println!(
        "Last {} of {} sessions:",
        sessions.len(),
        tracker.history().len()
    );
    for session in &sessions {
        println!("  {}", format::session_line(session));
    }

    let total_minutes: i64 = tracker.history().iter().map(|s| s.duration_minutes).sum();
    println!("Total time open: {}", format::duration(total_minutes));

    Ok(())
}
