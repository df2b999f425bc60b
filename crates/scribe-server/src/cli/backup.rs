use crate::cli::{BackupArgs, Cli};
use anyhow::Result;

pub fn run(args: BackupArgs, cli: &Cli) -> Result<()> {
    let scribe = cli.open_scribe()?;
    scribe.snapshot(&args.dest)?;

    let size = std::fs::metadata(&args.dest)?.len();
    println!("Snapshot written to {} ({} bytes).", args.dest.display(), size);
    Ok(())
}
