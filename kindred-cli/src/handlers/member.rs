//! Member command handlers

use colored::Colorize;
use kindred::models::{Member, MemberId, NewMember};
use kindred::storage::RelationshipFilter;

use crate::commands::MemberCommands;
use crate::context::KindredCliContext;
use crate::output::*;

pub async fn handle_member_command(
    cmd: MemberCommands,
    ctx: &KindredCliContext,
    format: OutputFormat,
) -> kindred::Result<()> {
    let manager = &ctx.family_manager;

    match cmd {
        MemberCommands::Add(args) => {
            let member = manager
                .create_member(NewMember {
                    firstname: args.firstname,
                    lastname: args.lastname,
                    date_of_birth: args.born,
                    date_of_death: args.died,
                    sex: args.sex.unwrap_or_default(),
                })
                .await?;

            match format {
                OutputFormat::Json => println!("{}", to_pretty_json(&member)?),
                OutputFormat::Table => println!(
                    "{}",
                    format_success(&format!(
                        "Added {} with ID {}",
                        member.display_name().bold(),
                        member.id.to_string().color(CliColors::accent())
                    ))
                ),
            }
        }

        MemberCommands::List => {
            let members = manager.list_members().await?;
            match format {
                OutputFormat::Json => println!("{}", to_pretty_json(&members)?),
                OutputFormat::Table => print_member_list(&members),
            }
        }

        MemberCommands::Show(args) => {
            let id = MemberId(args.id);
            let member = manager.get_member(id).await?;
            let parents = parents_of(ctx, id).await?;
            let children = children_of(ctx, id).await?;

            match format {
                OutputFormat::Json => println!(
                    "{}",
                    to_pretty_json(&serde_json::json!({
                        "member": member,
                        "parents": parents,
                        "children": children,
                    }))?
                ),
                OutputFormat::Table => {
                    println!("{}", member_details(&member, &parents, &children))
                }
            }
        }

        MemberCommands::Remove(args) => {
            let removed = manager.delete_member(MemberId(args.id)).await?;
            match format {
                OutputFormat::Json => println!("{}", to_pretty_json(&removed)?),
                OutputFormat::Table => println!(
                    "{}",
                    format_success(&format!("Removed {}", removed.display_name()))
                ),
            }
        }
    }

    Ok(())
}

async fn parents_of(ctx: &KindredCliContext, id: MemberId) -> kindred::Result<Vec<Member>> {
    let manager = &ctx.family_manager;
    let mut parents = Vec::new();
    for relationship in manager
        .list_relationships(Some(RelationshipFilter::child(id)))
        .await?
    {
        parents.push(manager.get_member(relationship.parent_id).await?);
    }
    Ok(parents)
}

async fn children_of(ctx: &KindredCliContext, id: MemberId) -> kindred::Result<Vec<Member>> {
    let manager = &ctx.family_manager;
    let mut children = Vec::new();
    for child in manager.order_children(id).await? {
        children.push(manager.get_member(child).await?);
    }
    Ok(children)
}
