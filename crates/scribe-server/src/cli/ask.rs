use crate::cli::{AskArgs, Cli};
use anyhow::Result;
use scribe_core::ContextQuery;

pub fn run(args: AskArgs, cli: &Cli) -> Result<()> {
    let scribe = cli.open_scribe()?;

    let query = args.minutes.map(|minutes| ContextQuery::Recent { minutes });
    let exchange = scribe.ask(args.session, &args.question, query)?;

    if args.format == "json" {
        let out = serde_json::json!({
            "user": exchange.user,
            "assistant": exchange.assistant,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!("you> {}", exchange.user.content);
        println!("scribe> {}", exchange.assistant.content);
        println!();
        println!(
            "({} context message(s) consulted)",
            exchange.assistant.context_ids.len()
        );
    }

    Ok(())
}
