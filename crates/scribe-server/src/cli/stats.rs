use crate::cli::Cli;
use anyhow::Result;

pub fn run(cli: &Cli) -> Result<()> {
    let scribe = cli.open_scribe()?;
    let stats = scribe.stats()?;

    let db_mb = stats.db_size_bytes as f64 / 1_048_576.0;

    println!();
    println!("Store Overview");
    println!("{}", "─".repeat(50));
    println!("Sessions:  {:>8}", stats.session_count);

    let mut statuses: Vec<_> = stats.sessions_by_status.iter().collect();
    statuses.sort_by_key(|(status, _)| status.as_str());
    for (status, count) in &statuses {
        println!("  {:16} {:>8}", status.as_str(), count);
    }

    println!("Messages:  {:>8}", stats.message_count);
    println!("  {:16} {:>8}", "final", stats.final_message_count);
    println!("  {:16} {:>8}", "interim", stats.interim_message_count);
    println!("Chat:      {:>8}", stats.chat_count);
    println!("DB Size:   {:>6.1} MB", db_mb);
    println!("{}", "─".repeat(50));
    println!();

    Ok(())
}
