//! Integration tests for the Kindred CLI
//!
//! The first group drives the command handlers against a snapshot in a
//! temporary directory; the second runs the compiled binary end to end.

use std::path::Path;
use std::process::Command;

use kindred::KindredError;
use kindred::graph::Rejection;
use kindred::models::{MemberId, Sex};
use kindred::storage::Snapshot;
use kindred_cli::args::{AddMemberArgs, ChildrenArgs, GraphArgs, MemberIdArgs, PairArgs};
use kindred_cli::commands::{Commands, MemberCommands};
use kindred_cli::{KindredCliContext, OutputFormat, run_command};
use serde_json::Value;
use tempfile::TempDir;

async fn create_test_context() -> (KindredCliContext, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let ctx = KindredCliContext::new(&temp_dir.path().join("family.json"))
        .await
        .expect("Failed to open snapshot");
    (ctx, temp_dir)
}

fn add(first: &str, born: Option<&str>) -> Commands {
    Commands::Member(MemberCommands::Add(AddMemberArgs {
        firstname: first.to_string(),
        lastname: "Test".to_string(),
        born: born.map(|d| d.parse().unwrap()),
        died: None,
        sex: None,
    }))
}

fn relate(parent: i64, child: i64) -> Commands {
    Commands::Relate(PairArgs { parent, child })
}

#[tokio::test]
async fn test_add_and_relate_write_through_to_snapshot() {
    let (ctx, temp_dir) = create_test_context().await;

    run_command(add("Parent", Some("1960-01-01")), &ctx, OutputFormat::Json)
        .await
        .unwrap();
    run_command(add("Child", Some("1990-01-01")), &ctx, OutputFormat::Table)
        .await
        .unwrap();
    run_command(relate(1, 2), &ctx, OutputFormat::Table)
        .await
        .unwrap();

    let snapshot = Snapshot::load(temp_dir.path().join("family.json"))
        .await
        .unwrap();
    assert_eq!(snapshot.members.len(), 2);
    assert_eq!(snapshot.relationships.len(), 1);
}

#[tokio::test]
async fn test_relate_rejections_surface_as_errors() {
    let (ctx, _temp_dir) = create_test_context().await;
    for name in ["A", "B", "C"] {
        run_command(add(name, None), &ctx, OutputFormat::Table)
            .await
            .unwrap();
    }
    run_command(relate(1, 2), &ctx, OutputFormat::Table)
        .await
        .unwrap();
    run_command(relate(2, 3), &ctx, OutputFormat::Table)
        .await
        .unwrap();

    let err = run_command(relate(3, 1), &ctx, OutputFormat::Table)
        .await
        .unwrap_err();
    assert!(matches!(err, KindredError::Rejected(Rejection::Cycle)));

    let err = run_command(relate(1, 2), &ctx, OutputFormat::Json)
        .await
        .unwrap_err();
    assert!(matches!(err, KindredError::Rejected(Rejection::Duplicate)));

    let err = run_command(relate(1, 9), &ctx, OutputFormat::Table)
        .await
        .unwrap_err();
    assert!(matches!(err, KindredError::NotFound(_)));
}

#[tokio::test]
async fn test_validate_does_not_write() {
    let (ctx, _temp_dir) = create_test_context().await;
    run_command(add("A", None), &ctx, OutputFormat::Table)
        .await
        .unwrap();
    run_command(add("B", None), &ctx, OutputFormat::Table)
        .await
        .unwrap();

    run_command(
        Commands::Validate(PairArgs {
            parent: 1,
            child: 2,
        }),
        &ctx,
        OutputFormat::Json,
    )
    .await
    .unwrap();
    // A rejected candidate is reported, not raised
    run_command(
        Commands::Validate(PairArgs {
            parent: 1,
            child: 1,
        }),
        &ctx,
        OutputFormat::Table,
    )
    .await
    .unwrap();

    assert!(
        ctx.family_manager
            .list_relationships(None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_unrelate_and_remove_member() {
    let (ctx, _temp_dir) = create_test_context().await;
    run_command(add("A", None), &ctx, OutputFormat::Table)
        .await
        .unwrap();
    run_command(add("B", None), &ctx, OutputFormat::Table)
        .await
        .unwrap();
    run_command(relate(1, 2), &ctx, OutputFormat::Table)
        .await
        .unwrap();

    let remove = |id| Commands::Member(MemberCommands::Remove(MemberIdArgs { id }));
    let err = run_command(remove(1), &ctx, OutputFormat::Table)
        .await
        .unwrap_err();
    assert!(matches!(err, KindredError::Conflict(_)));

    run_command(
        Commands::Unrelate(PairArgs {
            parent: 1,
            child: 2,
        }),
        &ctx,
        OutputFormat::Table,
    )
    .await
    .unwrap();
    run_command(remove(1), &ctx, OutputFormat::Table)
        .await
        .unwrap();

    let remaining = ctx.family_manager.list_members().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, MemberId(2));
}

#[tokio::test]
async fn test_seed_then_read_commands() {
    let (ctx, _temp_dir) = create_test_context().await;

    run_command(Commands::Seed, &ctx, OutputFormat::Table)
        .await
        .unwrap();
    assert_eq!(ctx.family_manager.list_members().await.unwrap().len(), 19);

    // Seeding twice is refused
    let err = run_command(Commands::Seed, &ctx, OutputFormat::Table)
        .await
        .unwrap_err();
    assert!(matches!(err, KindredError::Conflict(_)));

    for format in [OutputFormat::Table, OutputFormat::Json] {
        run_command(Commands::Member(MemberCommands::List), &ctx, format)
            .await
            .unwrap();
        run_command(
            Commands::Member(MemberCommands::Show(MemberIdArgs { id: 5 })),
            &ctx,
            format,
        )
        .await
        .unwrap();
        run_command(Commands::Children(ChildrenArgs { parent: 5 }), &ctx, format)
            .await
            .unwrap();
        run_command(Commands::Graph(GraphArgs { pretty: false }), &ctx, format)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_member_sex_argument() {
    let (ctx, _temp_dir) = create_test_context().await;
    run_command(
        Commands::Member(MemberCommands::Add(AddMemberArgs {
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            born: None,
            died: None,
            sex: Some(Sex::Female),
        })),
        &ctx,
        OutputFormat::Table,
    )
    .await
    .unwrap();

    let member = ctx.family_manager.get_member(MemberId(1)).await.unwrap();
    assert_eq!(member.sex, Sex::Female);
}

mod binary {
    use super::*;

    fn kindred_cli(snapshot: &Path, args: &[&str]) -> std::process::Output {
        Command::new(env!("CARGO_BIN_EXE_kindred-cli"))
            .arg("--snapshot")
            .arg(snapshot)
            .args(args)
            .output()
            .expect("Failed to run kindred-cli")
    }

    fn stdout_json(output: &std::process::Output) -> Value {
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
    }

    #[test]
    fn test_version() {
        let temp_dir = TempDir::new().unwrap();
        let output = kindred_cli(&temp_dir.path().join("family.json"), &["version"]);
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains(kindred::VERSION));
    }

    #[test]
    fn test_graph_json_after_relate() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("family.json");

        let output = kindred_cli(
            &snapshot,
            &["--machine", "member", "add", "Mom", "Javier", "--born", "1970-10-02", "--sex", "female"],
        );
        assert!(output.status.success());
        assert_eq!(stdout_json(&output)["id"], 1);

        assert!(kindred_cli(&snapshot, &["member", "add", "Jr", "Javier", "--born", "1984-04-20"]).status.success());
        assert!(kindred_cli(&snapshot, &["relate", "1", "2"]).status.success());

        let output = kindred_cli(&snapshot, &["--output", "json", "graph"]);
        assert!(output.status.success());
        assert_eq!(
            stdout_json(&output),
            serde_json::json!({
                "nodes": [
                    {
                        "id": "member-1", "label": "Mom Javier",
                        "firstname": "Mom", "lastname": "Javier",
                        "birthDate": "1970-10-02", "deathDate": null, "sex": "female"
                    },
                    {
                        "id": "member-2", "label": "Jr Javier",
                        "firstname": "Jr", "lastname": "Javier",
                        "birthDate": "1984-04-20", "deathDate": null, "sex": null
                    }
                ],
                "edges": [
                    { "id": "parent-1-child-2", "source": "member-1", "target": "member-2", "order": 0 }
                ]
            })
        );
    }

    #[test]
    fn test_rejection_exits_nonzero_with_reason() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("family.json");
        assert!(kindred_cli(&snapshot, &["member", "add", "Solo", "Test"]).status.success());

        let output = kindred_cli(&snapshot, &["--machine", "relate", "1", "1"]);
        assert!(!output.status.success());
        let body = stdout_json(&output);
        assert_eq!(body["code"], "REJECTED");
        assert_eq!(body["reason"], "self-parenting");
    }

    #[test]
    fn test_validate_reports_json_outcome() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("family.json");
        assert!(kindred_cli(&snapshot, &["seed"]).status.success());

        // Member 5 already has two recorded parents in the demo family
        let output = kindred_cli(&snapshot, &["--machine", "validate", "1", "5"]);
        assert!(output.status.success());
        assert_eq!(
            stdout_json(&output),
            serde_json::json!({ "valid": false, "reason": "parent-count-exceeded" })
        );
    }

    #[test]
    fn test_children_json_is_id_list() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("family.json");
        assert!(kindred_cli(&snapshot, &["member", "add", "P", "T"]).status.success());
        assert!(kindred_cli(&snapshot, &["member", "add", "Late", "T", "--born", "2000-01-01"]).status.success());
        assert!(kindred_cli(&snapshot, &["member", "add", "Undated", "T"]).status.success());
        assert!(kindred_cli(&snapshot, &["member", "add", "Early", "T", "--born", "1990-01-01"]).status.success());
        for child in ["2", "3", "4"] {
            assert!(kindred_cli(&snapshot, &["relate", "1", child]).status.success());
        }

        let output = kindred_cli(&snapshot, &["--machine", "children", "1"]);
        assert!(output.status.success());
        assert_eq!(stdout_json(&output), serde_json::json!([4, 2, 3]));
    }

    #[test]
    fn test_removed_member_id_is_not_reused() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("family.json");
        assert!(kindred_cli(&snapshot, &["member", "add", "Mom", "Javier"]).status.success());
        assert!(kindred_cli(&snapshot, &["member", "add", "Jr", "Javier"]).status.success());
        assert!(kindred_cli(&snapshot, &["member", "remove", "2"]).status.success());

        let output = kindred_cli(&snapshot, &["--machine", "member", "add", "Kat", "Javier"]);
        assert!(output.status.success());
        assert_eq!(stdout_json(&output)["id"], 3);
    }

    #[test]
    fn test_pretty_graph_matches_compact() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("family.json");
        assert!(kindred_cli(&snapshot, &["seed"]).status.success());

        let compact = kindred_cli(&snapshot, &["--output", "json", "graph"]);
        let pretty = kindred_cli(&snapshot, &["--output", "json", "graph", "--pretty"]);
        assert!(compact.status.success());
        assert!(pretty.status.success());
        assert_eq!(String::from_utf8_lossy(&compact.stdout).lines().count(), 1);
        assert_eq!(stdout_json(&compact), stdout_json(&pretty));
    }
}
