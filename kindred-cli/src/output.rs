use std::collections::HashSet;

use clap::ValueEnum;
use colored::*;
use kindred::KindredError;
use kindred::graph::FamilyGraph;
use kindred::models::{Member, MemberId, Sex};
use serde::Serialize;
use serde_json::json;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn error() -> Color {
        Color::TrueColor {
            r: 239,
            g: 68,
            b: 68,
        }
    }

    pub fn warning() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn info() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn muted() -> Color {
        Color::TrueColor {
            r: 148,
            g: 163,
            b: 184,
        }
    }

    pub fn accent() -> Color {
        Color::TrueColor {
            r: 168,
            g: 85,
            b: 247,
        }
    }
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".color(CliColors::success()), message)
}

pub fn format_error(message: &str) -> String {
    format!("{} {}", "✗".color(CliColors::error()), message)
}

pub fn format_warning(message: &str) -> String {
    format!("{} {}", "!".color(CliColors::warning()), message)
}

pub fn format_info(message: &str) -> String {
    format!("{} {}", "ℹ".color(CliColors::info()), message)
}

/// Stable error code for machine-readable output
pub fn error_code(error: &KindredError) -> &'static str {
    match error {
        KindredError::Rejected(_) | KindredError::PartnershipRejected(_) => "REJECTED",
        KindredError::NotFound(_) => "NOT_FOUND",
        KindredError::Conflict(_) => "CONFLICT",
        KindredError::InvalidInput(_) => "INVALID_INPUT",
        KindredError::Storage(_) => "STORAGE_ERROR",
        KindredError::Serialization(_) => "SERIALIZATION_ERROR",
        KindredError::Configuration(_) => "CONFIGURATION_ERROR",
        KindredError::Logging(_) => "LOGGING_ERROR",
    }
}

/// Error body for `--output json`
pub fn error_json(error: &KindredError) -> serde_json::Value {
    let mut body = json!({
        "error": true,
        "code": error_code(error),
        "message": error.to_string(),
    });
    let reason = match error {
        KindredError::Rejected(rejection) => Some(rejection.code()),
        KindredError::PartnershipRejected(rejection) => Some(rejection.code()),
        _ => None,
    };
    if let Some(reason) = reason {
        body["reason"] = json!(reason);
    }
    body
}

pub fn output_error(error: &KindredError, format: OutputFormat) {
    match format {
        OutputFormat::Json => match to_pretty_json(&error_json(error)) {
            Ok(body) => println!("{}", body),
            Err(_) => eprintln!("{}", format_error(&error.to_string())),
        },
        OutputFormat::Table => eprintln!("{}", format_error(&error.to_string())),
    }
}

pub fn to_pretty_json<T: Serialize>(value: &T) -> kindred::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn sex_marker(sex: Sex) -> ColoredString {
    match sex {
        Sex::Male => "M".color(CliColors::info()),
        Sex::Female => "F".color(CliColors::accent()),
        Sex::Other => "O".normal(),
        Sex::Unknown => "-".color(CliColors::muted()),
    }
}

fn lifespan(member: &Member) -> String {
    match (member.date_of_birth, member.date_of_death) {
        (None, None) => String::new(),
        (Some(born), None) => format!("b. {}", born),
        (None, Some(died)) => format!("d. {}", died),
        (Some(born), Some(died)) => format!("{} – {}", born, died),
    }
}

/// One aligned row per member
pub fn member_table(members: &[Member]) -> String {
    if members.is_empty() {
        return "No family members.".color(CliColors::muted()).to_string();
    }

    let name_width = members
        .iter()
        .map(|m| m.display_name().chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = vec![format!(
        "{:>5}  {:<width$}  {}  {}",
        "ID".bold(),
        "NAME".bold(),
        "SEX".bold(),
        "DATES".bold(),
        width = name_width
    )];
    for member in members {
        lines.push(format!(
            "{:>5}  {:<width$}  {:<3}  {}",
            member.id.to_string().color(CliColors::muted()),
            member.display_name(),
            sex_marker(member.sex),
            lifespan(member),
            width = name_width
        ));
    }
    lines.join("\n")
}

pub fn print_member_list(members: &[Member]) {
    println!("{}", member_table(members));
}

/// Detail block for one member
pub fn member_details(member: &Member, parents: &[Member], children: &[Member]) -> String {
    let names = |members: &[Member]| {
        if members.is_empty() {
            format!("{}", "none".color(CliColors::muted()))
        } else {
            members
                .iter()
                .map(|m| format!("{} ({})", m.display_name(), m.id))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    let mut lines = vec![
        format!(
            "{} {}",
            member.display_name().bold(),
            format!("#{}", member.id).color(CliColors::muted())
        ),
        format!("  Sex:      {}", member.sex),
    ];
    if let Some(born) = member.date_of_birth {
        lines.push(format!("  Born:     {}", born));
    }
    if let Some(died) = member.date_of_death {
        lines.push(format!("  Died:     {}", died));
    }
    lines.push(format!("  Parents:  {}", names(parents)));
    lines.push(format!("  Children: {}", names(children)));
    lines.join("\n")
}

/// Draw the family as indented trees, one per root.
///
/// A child with two parents is drawn under both. Members reached again on the
/// current path are marked and not expanded, so stored cycles cannot recurse.
pub fn family_tree(graph: &FamilyGraph) -> String {
    if graph.nodes().is_empty() {
        return "No family members.".color(CliColors::muted()).to_string();
    }

    let roots = graph.roots();
    if roots.is_empty() {
        return format_warning("No root members; the stored relationships form a cycle.");
    }

    let mut lines = Vec::new();
    for root in roots {
        let mut path = HashSet::new();
        draw_subtree(graph, root, 0, &mut path, &mut lines);
    }
    lines.join("\n")
}

fn draw_subtree(
    graph: &FamilyGraph,
    id: MemberId,
    depth: usize,
    path: &mut HashSet<MemberId>,
    lines: &mut Vec<String>,
) {
    let Some(member) = graph.member(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let branch = if depth == 0 { "" } else { "└─ " };

    if !path.insert(id) {
        lines.push(format!(
            "{}{}{} {}",
            indent,
            branch,
            member.display_name(),
            "(cycle)".color(CliColors::error())
        ));
        return;
    }

    let dates = lifespan(member);
    lines.push(format!(
        "{}{}{} {}{}",
        indent,
        branch,
        member.display_name().bold(),
        format!("#{}", member.id).color(CliColors::muted()),
        if dates.is_empty() {
            String::new()
        } else {
            format!("  {}", dates.color(CliColors::muted()))
        }
    ));

    for child in graph.children_of(id) {
        draw_subtree(graph, child, depth + 1, path, lines);
    }
    path.remove(&id);
}
