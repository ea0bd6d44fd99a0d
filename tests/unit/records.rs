// tests/unit/records.rs
//! Decoding raw search results into domain records.

use chrono::{TimeZone, Utc};
use jira_harvest::{parse_issue, parse_jira_date, IssueId, SearchResponse};
use pretty_assertions::assert_eq;
use serde_json::json;

fn decode(page: serde_json::Value) -> SearchResponse {
    serde_json::from_value(page).unwrap()
}

#[test]
fn full_issue_maps_every_field() {
    let page = decode(json!({
        "maxResults": 50,
        "total": 1,
        "issues": [{
            "id": "12345",
            "key": "HADOOP-9",
            "fields": {
                "summary": "NPE in NameNode",
                "description": "Stack trace attached",
                "created": "2013-01-02T03:04:05.678+0100",
                "parent": { "id": "12000" },
                "comment": {
                    "maxResults": 2,
                    "comments": [
                        {
                            "created": "2013-01-03T00:00:00.000+0000",
                            "body": "Can reproduce",
                            "author": { "displayName": "Ann", "emailAddress": "ann@example.org" }
                        },
                        {
                            "created": "2013-01-04T00:00:00.000+0000",
                            "body": "Fixed",
                            "author": { "displayName": "Bo" }
                        }
                    ]
                },
                "issuelinks": [
                    {
                        "id": "900",
                        "type": { "inward": "is duplicated by", "outward": "duplicates" },
                        "inwardIssue": { "id": "12346" }
                    },
                    {
                        "id": "901",
                        "type": { "inward": "relates to" },
                        "outwardIssue": { "id": "12347" }
                    }
                ]
            }
        }]
    }));
    assert_eq!(page.max_results, Some(50));
    assert_eq!(page.total, Some(1));

    let parsed = parse_issue(page.issues.into_iter().next().unwrap());
    let issue = &parsed.issue;
    assert_eq!(issue.id, IssueId::from("12345"));
    assert_eq!(issue.name, "HADOOP-9");
    assert_eq!(issue.title, "NPE in NameNode");
    assert_eq!(issue.body, "Stack trace attached");
    assert_eq!(
        issue.created,
        Some(Utc.with_ymd_and_hms(2013, 1, 2, 2, 4, 5).unwrap() + chrono::Duration::milliseconds(678))
    );
    assert_eq!(issue.comments.len(), 2);
    assert_eq!(issue.comments[0].author_name, "Ann");
    assert_eq!(issue.comments[0].author_email, "ann@example.org");
    assert_eq!(issue.comments[1].author_email, "");
    assert_eq!(issue.comments[1].body, "Fixed");

    assert_eq!(parsed.parent, Some(IssueId::from("12000")));
    assert_eq!(parsed.links.len(), 2);
    let inward = parsed.links[0].inward.as_ref().unwrap();
    assert_eq!(parsed.links[0].link_id, "900");
    assert_eq!(inward.type_name, "is duplicated by");
    assert_eq!(inward.other, IssueId::from("12346"));
    assert!(parsed.links[1].inward.is_none());
    assert!(parsed.link_evidence.is_empty());
}

#[test]
fn missing_and_mistyped_fields_fall_back_to_defaults() {
    let page = decode(json!({
        "total": "many",
        "issues": [
            { "id": "1", "key": "X-1", "fields": { "summary": null, "created": 17, "parent": { "id": "" } } },
            { "id": "2" },
            "not an issue"
        ]
    }));
    assert_eq!(page.total, None);
    assert_eq!(page.max_results, None);
    assert_eq!(page.issues.len(), 2);

    let first = parse_issue(page.issues[0].clone());
    assert_eq!(first.issue.title, "");
    assert_eq!(first.issue.created, None);
    assert_eq!(first.parent, None);

    let second = parse_issue(page.issues[1].clone());
    assert_eq!(second.issue.name, "");
    assert!(second.links.is_empty());
}

#[test]
fn changelog_keeps_only_dated_link_additions() {
    let page = decode(json!({
        "issues": [{
            "id": "7",
            "key": "Y-7",
            "changelog": {
                "histories": [
                    {
                        "created": "2016-05-06T07:08:09.000+0000",
                        "items": [
                            { "field": "Link", "to": "Y-8" },
                            { "field": "Link", "to": null },
                            { "field": "assignee", "to": "bob" }
                        ]
                    },
                    {
                        "created": "not a date",
                        "items": [{ "field": "Link", "to": "Y-9" }]
                    }
                ]
            }
        }]
    }));

    let parsed = parse_issue(page.issues.into_iter().next().unwrap());
    assert_eq!(parsed.link_evidence.len(), 1);
    assert_eq!(parsed.link_evidence[0].target_key, "Y-8");
    assert_eq!(
        parsed.link_evidence[0].created,
        Utc.with_ymd_and_hms(2016, 5, 6, 7, 8, 9).unwrap()
    );
}

#[test]
fn jira_dates() {
    assert_eq!(
        parse_jira_date("2020-02-29T23:59:59.000-0500"),
        Some(Utc.with_ymd_and_hms(2020, 3, 1, 4, 59, 59).unwrap())
    );
    assert_eq!(parse_jira_date(""), None);
    assert_eq!(parse_jira_date("2020-02-29"), None);
}
