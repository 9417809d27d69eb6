// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn serializes_wire_field_names() {
    let record = PatchRecord::pending("lint", "j1", "https://ci.example.com/patch/j1");
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["task"], "lint");
    assert_eq!(json["jobId"], "j1");
    assert_eq!(json["link"], "https://ci.example.com/patch/j1");
    assert_eq!(json["status"], "pending");
}

#[test]
fn round_trips_through_json() {
    let record = PatchRecord {
        task: "unit".into(),
        patch_id: "abc123".into(),
        link: "https://ci.example.com/patch/abc123".into(),
        status: PatchStatus::Succeeded,
    };
    let json = serde_json::to_string(&record).unwrap();
    let parsed: PatchRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn missing_status_decodes_as_pending() {
    let json = r#"{"task":"lint","jobId":"j1","link":"u"}"#;
    let parsed: PatchRecord = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.status, PatchStatus::Pending);
}

#[yare::parameterized(
    started  = { "started" },
    created  = { "created" },
    unknown  = { "who-knows" },
)]
fn raw_intermediate_status_decodes_as_pending(raw: &str) {
    let json = format!(r#"{{"task":"lint","jobId":"j1","link":"u","status":"{raw}"}}"#);
    let parsed: PatchRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.status, PatchStatus::Pending);
}

#[test]
fn terminal_status_decodes_verbatim() {
    let json = r#"{"task":"lint","jobId":"j1","link":"u","status":"failed"}"#;
    let parsed: PatchRecord = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.status, PatchStatus::Failed);
}
