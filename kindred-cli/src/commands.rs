//! Command enum definitions

use crate::args::*;
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display version information
    Version,

    /// Load the demo family into an empty snapshot
    Seed,

    /// Family member commands
    #[command(subcommand)]
    Member(MemberCommands),

    /// Record that PARENT is a parent of CHILD
    #[command(
        long_about = r#"
Record a parent/child relationship. The relationship is refused when:
  • the parent and child are the same member      (self-parenting)
  • the relationship already exists               (duplicate)
  • the child already has the maximum of parents  (parent-count-exceeded)
  • the child is already an ancestor of the parent (cycle)
"#
    )]
    Relate(PairArgs),

    /// Remove a parent/child relationship
    Unrelate(PairArgs),

    /// Check whether a relationship could be recorded, without writing it
    Validate(PairArgs),

    /// List the children of a member, oldest first
    Children(ChildrenArgs),

    /// Print the render-ready family graph
    #[command(
        long_about = r#"
Print the family graph. With --output json this is the `{ nodes, edges }`
payload served by the HTTP API; the table view draws the family as a tree
starting from every member without recorded parents.
"#
    )]
    Graph(GraphArgs),
}

#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Add a new family member
    Add(AddMemberArgs),

    /// List all family members
    List,

    /// Show one family member with parents and children
    #[command(alias = "get")]
    Show(MemberIdArgs),

    /// Remove a family member with no remaining relationships
    #[command(alias = "delete")]
    Remove(MemberIdArgs),
}
