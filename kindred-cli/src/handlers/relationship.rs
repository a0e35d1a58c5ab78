//! Relationship command handlers

use colored::Colorize;
use kindred::KindredError;
use kindred::models::MemberId;
use serde_json::json;

use crate::args::{ChildrenArgs, PairArgs};
use crate::context::KindredCliContext;
use crate::output::*;

pub async fn handle_relate_command(
    args: PairArgs,
    ctx: &KindredCliContext,
    format: OutputFormat,
) -> kindred::Result<()> {
    let relationship = ctx
        .family_manager
        .add_relationship(MemberId(args.parent), MemberId(args.child))
        .await?;

    match format {
        OutputFormat::Json => println!("{}", to_pretty_json(&relationship)?),
        OutputFormat::Table => println!(
            "{}",
            format_success(&format!("Recorded {}", relationship.to_string().bold()))
        ),
    }
    Ok(())
}

pub async fn handle_unrelate_command(
    args: PairArgs,
    ctx: &KindredCliContext,
    format: OutputFormat,
) -> kindred::Result<()> {
    ctx.family_manager
        .remove_relationship(MemberId(args.parent), MemberId(args.child))
        .await?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            to_pretty_json(&json!({ "removed": true, "parent_id": args.parent, "child_id": args.child }))?
        ),
        OutputFormat::Table => println!(
            "{}",
            format_success(&format!("Removed {} -> {}", args.parent, args.child))
        ),
    }
    Ok(())
}

/// Dry-run check. A rejection is a normal outcome here, not an error.
pub async fn handle_validate_command(
    args: PairArgs,
    ctx: &KindredCliContext,
    format: OutputFormat,
) -> kindred::Result<()> {
    let outcome = ctx
        .family_manager
        .validate_new_relationship(MemberId(args.parent), MemberId(args.child))
        .await;

    let reason = match outcome {
        Ok(()) => None,
        Err(KindredError::Rejected(rejection)) => Some(rejection),
        Err(e) => return Err(e),
    };

    match format {
        OutputFormat::Json => {
            let mut body = json!({ "valid": reason.is_none() });
            if let Some(rejection) = reason {
                body["reason"] = json!(rejection.code());
            }
            println!("{}", to_pretty_json(&body)?);
        }
        OutputFormat::Table => match reason {
            None => println!(
                "{}",
                format_success(&format!("{} -> {} can be recorded", args.parent, args.child))
            ),
            Some(rejection) => println!(
                "{}",
                format_error(&format!(
                    "{} -> {} would be rejected: {} ({})",
                    args.parent,
                    args.child,
                    rejection,
                    rejection.code().color(CliColors::warning())
                ))
            ),
        },
    }
    Ok(())
}

pub async fn handle_children_command(
    args: ChildrenArgs,
    ctx: &KindredCliContext,
    format: OutputFormat,
) -> kindred::Result<()> {
    let manager = &ctx.family_manager;
    let ordered = manager.order_children(MemberId(args.parent)).await?;

    match format {
        OutputFormat::Json => println!("{}", to_pretty_json(&ordered)?),
        OutputFormat::Table => {
            let mut children = Vec::with_capacity(ordered.len());
            for id in ordered {
                children.push(manager.get_member(id).await?);
            }
            print_member_list(&children);
        }
    }
    Ok(())
}
