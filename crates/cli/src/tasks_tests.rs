// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const BUILD_CONFIG: &str = r#"
tasks:
  - name: lint
    tags: [e2e_backup, quick]
  - name: unit
    tags: [quick]
  - name: e2e_restore
    tags: [e2e_backup]
  - name: untagged
"#;

#[test]
fn filters_tasks_by_variant_tag_in_file_order() {
    let tasks = variant_tasks(BUILD_CONFIG, "e2e_backup").unwrap();
    assert_eq!(tasks, vec!["lint".to_string(), "e2e_restore".to_string()]);
}

#[test]
fn unknown_variant_selects_nothing() {
    assert!(variant_tasks(BUILD_CONFIG, "nope").unwrap().is_empty());
}

#[test]
fn tasks_without_tags_are_skipped_not_errors() {
    let tasks = variant_tasks(BUILD_CONFIG, "quick").unwrap();
    assert_eq!(tasks, vec!["lint".to_string(), "unit".to_string()]);
}

#[test]
fn malformed_yaml_is_an_error() {
    assert!(variant_tasks("tasks: [\n", "v").is_err());
}

#[test]
fn load_reads_relative_to_the_working_copy() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".evergreen.yml"), BUILD_CONFIG).unwrap();
    let config = Config {
        repo_owner: "o".into(),
        repo_name: "r".into(),
        ticket_prefix: String::new(),
        build_project: "p".into(),
        build_variant: "e2e_backup".into(),
        local_repo: dir.path().to_path_buf(),
        status_base_url: "https://ci.example.com/patch".into(),
        form_port: 8081,
        build_config: ".evergreen.yml".into(),
    };
    let tasks = load_variant_tasks(&config).unwrap();
    assert_eq!(tasks, vec!["lint".to_string(), "e2e_restore".to_string()]);
}
