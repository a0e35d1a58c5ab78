//! Graph command handler

use crate::args::GraphArgs;
use crate::context::KindredCliContext;
use crate::output::*;

pub async fn handle_graph_command(
    args: GraphArgs,
    ctx: &KindredCliContext,
    format: OutputFormat,
) -> kindred::Result<()> {
    match format {
        OutputFormat::Json => {
            let payload = ctx.family_manager.get_graph().await?;
            let body = if args.pretty {
                serde_json::to_vec_pretty(&payload)?
            } else {
                payload.to_json_bytes()?
            };
            println!("{}", String::from_utf8_lossy(&body));
        }
        OutputFormat::Table => {
            let graph = ctx.family_manager.build_graph().await?;
            println!("{}", family_tree(&graph));
            for dropped in graph.dropped() {
                println!(
                    "{}",
                    format_warning(&format!(
                        "Skipped {} ({})",
                        dropped.relationship,
                        dropped.reason.code()
                    ))
                );
            }
        }
    }
    Ok(())
}
