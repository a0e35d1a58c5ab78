pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;
pub mod utils;

pub use context::KindredCliContext;
pub use output::{
    CliColors, OutputFormat, error_json, family_tree, format_error, format_info, format_success,
    format_warning, member_details, member_table, output_error, print_member_list,
};
pub use utils::parse_sex;

use commands::Commands;

/// Run one command against an open context
pub async fn run_command(
    command: Commands,
    ctx: &KindredCliContext,
    format: OutputFormat,
) -> kindred::Result<()> {
    use handlers::*;

    match command {
        Commands::Version => {
            println!("Kindred CLI v{}", kindred::VERSION);
            Ok(())
        }
        Commands::Seed => handle_seed_command(ctx, format).await,
        Commands::Member(cmd) => handle_member_command(cmd, ctx, format).await,
        Commands::Relate(args) => handle_relate_command(args, ctx, format).await,
        Commands::Unrelate(args) => handle_unrelate_command(args, ctx, format).await,
        Commands::Validate(args) => handle_validate_command(args, ctx, format).await,
        Commands::Children(args) => handle_children_command(args, ctx, format).await,
        Commands::Graph(args) => handle_graph_command(args, ctx, format).await,
    }
}
