//! Demo data command handler

use crate::context::KindredCliContext;
use crate::output::*;

pub async fn handle_seed_command(
    ctx: &KindredCliContext,
    format: OutputFormat,
) -> kindred::Result<()> {
    let report = ctx.family_manager.seed_demo().await?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            to_pretty_json(&serde_json::json!({
                "members": report.members,
                "relationships": report.relationships,
            }))?
        ),
        OutputFormat::Table => {
            println!(
                "{}",
                format_success(&format!(
                    "Loaded {} members and {} relationships",
                    report.members, report.relationships
                ))
            );
            println!(
                "{}",
                format_info("Run `kindred-cli graph` to see the family tree")
            );
        }
    }
    Ok(())
}
