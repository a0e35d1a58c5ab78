//! Command handlers for the Kindred CLI

pub mod graph;
pub mod member;
pub mod relationship;
pub mod seed;

pub use graph::handle_graph_command;
pub use member::handle_member_command;
pub use relationship::{
    handle_children_command, handle_relate_command, handle_unrelate_command,
    handle_validate_command,
};
pub use seed::handle_seed_command;
