//! Command argument structures

use chrono::NaiveDate;
use clap::Args;
use kindred::models::Sex;

use crate::utils::parse_sex;

// Member command arguments
#[derive(Args, Debug)]
pub struct AddMemberArgs {
    /// First name
    pub firstname: String,

    /// Last name
    pub lastname: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long, short)]
    pub born: Option<NaiveDate>,

    /// Date of death (YYYY-MM-DD)
    #[arg(long, short)]
    pub died: Option<NaiveDate>,

    /// Sex (male, female, other, unknown)
    #[arg(long, short, value_parser = parse_sex)]
    pub sex: Option<Sex>,
}

#[derive(Args, Debug)]
pub struct MemberIdArgs {
    /// Member ID
    pub id: i64,
}

// Relationship command arguments
#[derive(Args, Debug)]
pub struct PairArgs {
    /// Parent member ID
    pub parent: i64,

    /// Child member ID
    pub child: i64,
}

#[derive(Args, Debug)]
pub struct ChildrenArgs {
    /// Parent member ID
    pub parent: i64,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Pretty-print the JSON payload
    #[arg(long)]
    pub pretty: bool,
}
