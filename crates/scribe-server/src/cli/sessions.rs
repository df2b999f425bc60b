use crate::cli::{truncate, Cli};
use anyhow::Result;

pub fn run(cli: &Cli) -> Result<()> {
    let scribe = cli.open_scribe()?;
    let sessions = scribe.list_sessions()?;

    if sessions.is_empty() {
        println!("No sessions yet.");
        return Ok(());
    }

    println!();
    println!(
        "{:<36}  {:<8}  {:<20}  {}",
        "ID", "STATUS", "CREATED", "TITLE"
    );
    println!("{}", "─".repeat(90));
    for session in &sessions {
        println!(
            "{:<36}  {:<8}  {:<20}  {}",
            session.id,
            session.status,
            session.created_at.format("%Y-%m-%d %H:%M UTC"),
            truncate(&session.title, 40)
        );
    }
    println!();

    Ok(())
}
