// tests/integration/output.rs
//! Writing a harvested database to disk.

use jira_harvest::{write_database, Database, Issue, IssueId, Link};
use serde_json::Value;
use std::path::PathBuf;

fn scratch_dir(test: &str) -> PathBuf {
    std::env::temp_dir().join(format!("jira-harvest-{}-{}", test, std::process::id()))
}

#[test]
fn written_file_has_all_three_collections() {
    let db = Database::new();
    db.add_issue(Issue {
        id: IssueId::from("1"),
        name: "YARN-1".to_string(),
        title: "Scheduler stalls".to_string(),
        ..Default::default()
    });
    db.add_issue(Issue {
        id: IssueId::from("2"),
        name: "YARN-2".to_string(),
        ..Default::default()
    });
    db.set_parent(IssueId::from("2"), IssueId::from("1"));
    db.add_link(Link::new(IssueId::from("1"), IssueId::from("2"), "is blocked by"));

    let dir = scratch_dir("collections");
    let path = dir.join("nested").join("db.json");
    let bytes = write_database(&path, &db.snapshot()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(bytes, text.len());

    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["Issues"]["1"]["Name"], "YARN-1");
    assert_eq!(json["Issues"]["1"]["Title"], "Scheduler stalls");
    assert_eq!(json["Issues"]["2"]["Created"], Value::Null);
    assert_eq!(json["Tree"]["2"], "1");
    assert_eq!(json["Graph"]["1"][0]["Type"], "is blocked by");
    assert_eq!(json["Graph"]["1"][0]["To"], "2");
    assert_eq!(json["Graph"]["1"][0]["Created"], Value::Null);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_database_writes_empty_maps() {
    let dir = scratch_dir("empty");
    let path = dir.join("empty.json");
    write_database(&path, &Database::new().snapshot()).unwrap();

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({ "Issues": {}, "Tree": {}, "Graph": {} }));

    let _ = std::fs::remove_dir_all(&dir);
}
