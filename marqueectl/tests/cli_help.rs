use assert_cmd::cargo::cargo_bin_cmd;

fn help_text(args: &[&str]) -> String {
    let mut cmd = cargo_bin_cmd!("marqueectl");
    let output = cmd
        .args(args)
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output).into_owned()
}

#[test]
fn top_level_help_lists_sync_commands() {
    let text = help_text(&[]);
    for command in [
        "movie",
        "details-bulk",
        "people",
        "list",
        "backfill",
        "genres",
        "from-mappings",
        "migrate",
    ] {
        assert!(text.contains(command), "help missing '{command}'");
    }
    assert!(text.contains("--in-memory"), "help missing --in-memory");
}

#[test]
fn bulk_help_documents_resume_cursor() {
    let text = help_text(&["details-bulk"]);
    for flag in ["--start-after", "--batch-size"] {
        assert!(text.contains(flag), "details-bulk help missing {flag}");
    }
}

#[test]
fn list_help_mentions_pages() {
    let text = help_text(&["list"]);
    assert!(text.contains("--pages"), "list help missing --pages");
}

#[test]
fn unknown_list_type_is_rejected() {
    let mut cmd = cargo_bin_cmd!("marqueectl");
    cmd.args(["list", "trending"]).assert().failure();
}
