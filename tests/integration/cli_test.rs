use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

fn taskboard() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("taskboard").unwrap();
    cmd.env_remove("RUST_LOG").env("TASKBOARD_USER", "asha");
    cmd
}

fn init_board() -> TempDir {
    let dir = TempDir::new().unwrap();
    taskboard().arg("init").current_dir(dir.path()).assert().success();
    dir
}

fn json_of(dir: &TempDir, args: &[&str]) -> Value {
    let output = taskboard()
        .arg("--json")
        .args(args)
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add_task(dir: &TempDir, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["task", "add", "-t", title];
    args.extend_from_slice(extra);
    let task = json_of(dir, &args);
    task["taskId"].as_str().unwrap().to_string()
}

fn column_ids(board: &Value, status: &str) -> Vec<String> {
    board
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["status"] == status)
        .unwrap()["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["taskId"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn init_creates_board_dir() {
    let dir = TempDir::new().unwrap();
    taskboard()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains(".taskboard"));

    assert!(dir.path().join(".taskboard/config.json").exists());
    assert!(dir.path().join(".taskboard/tasks.json").exists());
    assert!(dir.path().join(".taskboard/meetings.json").exists());
}

#[test]
fn init_twice_fails() {
    let dir = init_board();
    taskboard()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("already exists"));
}

#[test]
fn commands_outside_a_board_fail() {
    let dir = TempDir::new().unwrap();
    taskboard()
        .arg("board")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("not a taskboard directory"));
}

#[test]
fn task_add_and_show_by_prefix() {
    let dir = init_board();
    let id = add_task(
        &dir,
        "Write release notes",
        &[
            "--priority",
            "high",
            "--deadline",
            "2025-06-30",
            "--assignee-id",
            "emp-7",
            "--assignee-name",
            "Ravi",
            "--project",
            "p1",
            "--project-name",
            "Portal",
        ],
    );
    assert_eq!(id.len(), 16);

    let task = json_of(&dir, &["task", "show", &id[..6]]);
    assert_eq!(task["title"], "Write release notes");
    assert_eq!(task["priority"], "High");
    assert_eq!(task["status"], "Planned");
    assert_eq!(task["deadline"], "2025-06-30");
    assert_eq!(task["assignedToDetails"]["memberName"], "Ravi");
    assert_eq!(task["assignedBy"], "asha");

    taskboard()
        .args(["task", "show", &id])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("Assignee: Ravi <emp-7>"));
}

#[test]
fn task_add_rejects_bad_input() {
    let dir = init_board();
    taskboard()
        .args(["task", "add", "-t", "x", "--priority", "urgent"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown priority"));
    taskboard()
        .args(["task", "add", "-t", "x", "--deadline", "30/06/2025"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid date"));
    taskboard()
        .args(["task", "add", "-t", "x", "--assignee-id", "emp-1"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn task_update_and_delete() {
    let dir = init_board();
    let id = add_task(&dir, "Draft", &["--deadline", "2025-01-01"]);

    let updated = json_of(
        &dir,
        &["task", "update", &id, "-t", "Final", "--status", "completed", "--clear-deadline"],
    );
    assert_eq!(updated["taskId"], id.as_str());
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["status"], "Completed");
    assert!(updated["deadline"].is_null());

    taskboard()
        .args(["task", "update", &id])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("nothing to update"));

    taskboard()
        .args(["task", "delete", &id])
        .current_dir(dir.path())
        .assert()
        .success();
    taskboard()
        .args(["task", "show", &id])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("not found"));
}

#[test]
fn board_groups_in_column_order() {
    let dir = init_board();
    let a = add_task(&dir, "a", &[]);
    let b = add_task(&dir, "b", &["--status", "In Progress"]);
    let c = add_task(&dir, "c", &[]);
    add_task(&dir, "listed only", &["--status", "pending"]);

    let board = json_of(&dir, &["board"]);
    let statuses: Vec<&str> = board
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["Planned", "In Progress", "Completed"]);
    assert_eq!(column_ids(&board, "Planned"), vec![a, c]);
    assert_eq!(column_ids(&board, "In Progress"), vec![b]);
    assert!(column_ids(&board, "Completed").is_empty());
}

#[test]
fn move_onto_card_in_other_column_changes_status() {
    let dir = init_board();
    let t1 = add_task(&dir, "one", &[]);
    let t2 = add_task(&dir, "two", &["--status", "In Progress"]);

    let out = json_of(&dir, &["move", &t1, &t2]);
    assert_eq!(out["statusChanged"], true);
    assert_eq!(out["statusUpdate"]["taskId"], t1.as_str());
    assert_eq!(out["statusUpdate"]["newStatus"], "In Progress");
    assert_eq!(column_ids(&out["board"], "In Progress"), vec![t1.clone(), t2]);

    let task = json_of(&dir, &["task", "show", &t1]);
    assert_eq!(task["status"], "In Progress");
}

#[test]
fn move_to_column_puts_card_at_head() {
    let dir = init_board();
    let t1 = add_task(&dir, "one", &[]);
    let t3 = add_task(&dir, "three", &["--status", "completed"]);

    let out = json_of(&dir, &["move", &t1, "--to", "completed"]);
    assert_eq!(column_ids(&out["board"], "Completed"), vec![t1, t3]);
    assert!(column_ids(&out["board"], "Planned").is_empty());
}

#[test]
fn move_within_column_reports_reorder() {
    let dir = init_board();
    let a = add_task(&dir, "a", &[]);
    let b = add_task(&dir, "b", &[]);

    let out = json_of(&dir, &["move", &b, &a]);
    assert_eq!(out["statusChanged"], false);
    assert!(out["statusUpdate"].is_null());
    assert_eq!(column_ids(&out["board"], "Planned"), vec![b, a]);
}

#[test]
fn move_errors() {
    let dir = init_board();
    let a = add_task(&dir, "a", &[]);

    taskboard()
        .args(["move", &a, "ffffffffffff"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("not found"));
    taskboard()
        .args(["move", &a, "--to", "pending"])
        .current_dir(dir.path())
        .assert()
        .failure();
    taskboard()
        .args(["move", &a, &a, "--to", "completed"])
        .current_dir(dir.path())
        .assert()
        .failure();
    taskboard()
        .args(["move", &a])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn list_paginates() {
    let dir = init_board();
    for n in 0..12 {
        add_task(&dir, &format!("task {:02}", n), &["--status", "pending"]);
    }

    let out = json_of(&dir, &["list", "--page-size", "5", "--page", "3", "--sort", "title"]);
    assert_eq!(out["page"]["totalCount"], 12);
    assert_eq!(out["page"]["totalPages"], 3);
    let titles: Vec<&str> = out["page"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["task 10", "task 11"]);

    let out = json_of(&dir, &["list", "--page-size", "5", "--page", "4"]);
    assert!(out["page"]["items"].as_array().unwrap().is_empty());

    taskboard()
        .args(["list", "--page-size", "5"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("Page 1 of 3 (12 tasks)  [1] 2 3"));
}

#[test]
fn list_filters_and_sorts() {
    let dir = init_board();
    add_task(&dir, "Alpha", &["--priority", "low", "--project", "p1"]);
    add_task(&dir, "Beta", &["--priority", "high", "--project", "p1"]);
    add_task(&dir, "Gamma", &["--priority", "high", "--project", "p2"]);
    add_task(&dir, "Delta", &["--priority", "medium", "--project", "p1"]);

    let out = json_of(&dir, &["list", "--priority", "high"]);
    assert_eq!(out["page"]["totalCount"], 2);

    let out = json_of(&dir, &["list", "--project", "p1", "--sort", "priority", "--desc"]);
    let titles: Vec<&str> = out["page"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Delta", "Alpha", "Beta"]);

    let out = json_of(&dir, &["list", "--search", "  ALP "]);
    assert_eq!(out["page"]["totalCount"], 1);

    let out = json_of(&dir, &["list", "--priority", "all", "--project", "all"]);
    assert_eq!(out["page"]["totalCount"], 4);
}

#[test]
fn list_date_range_needs_both_bounds() {
    let dir = init_board();
    add_task(&dir, "early", &["--deadline", "2025-01-10"]);
    add_task(&dir, "late", &["--deadline", "2025-03-10"]);
    add_task(&dir, "none", &[]);

    let out = json_of(&dir, &["list", "--from", "2025-01-01", "--to", "2025-01-31"]);
    assert_eq!(out["page"]["totalCount"], 1);
    assert_eq!(out["page"]["items"][0]["title"], "early");

    taskboard()
        .args(["list", "--from", "2025-01-01"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn list_rejects_unknown_sort_key() {
    let dir = init_board();
    taskboard()
        .args(["list", "--sort", "colour"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown sort key"));
}

#[test]
fn export_writes_report() {
    let dir = init_board();
    add_task(
        &dir,
        "Alpha",
        &["--assignee-id", "emp-1", "--assignee-name", "Mina", "--project", "p1"],
    );
    add_task(&dir, "Beta", &["--project", "p1"]);
    add_task(&dir, "Other", &["--project", "p2"]);
    let path = dir.path().join("report.json");

    taskboard()
        .args([
            "export",
            "--project",
            "p1",
            "--sort",
            "title",
            "--desc",
            "--output",
            path.to_str().unwrap(),
        ])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("Exported 2 tasks"));

    let report: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(report["request"]["projectId"], "p1");
    assert_eq!(report["request"]["sortKey"], "title_desc");
    assert_eq!(report["tasks"][0]["title"], "Beta");
    assert_eq!(report["totalCount"], 2);

    taskboard()
        .args([
            "export",
            "--assigned-to",
            "Mina",
            "--output",
            path.to_str().unwrap(),
        ])
        .current_dir(dir.path())
        .assert()
        .success();
    let report: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(report["request"]["assignedTo"], "emp-1");
}

#[test]
fn meeting_add_list_show() {
    let dir = init_board();
    let meeting = json_of(
        &dir,
        &[
            "meeting", "add", "--project", "p1", "--project-name", "Portal", "-t", "Kickoff",
            "--agenda", "Scope", "--summary", "Agreed", "--notes", "None", "--date",
            "2999-01-01", "--start", "10:00", "--end", "11:30",
        ],
    );
    assert_eq!(meeting["duration"], "1h 30m");
    assert_eq!(meeting["status"], "draft");
    assert_eq!(meeting["meetingMode"], "offline");
    let id = meeting["meetingId"].as_str().unwrap().to_string();

    let out = json_of(&dir, &["meeting", "list", "--project", "p1"]);
    assert_eq!(out["page"]["totalCount"], 1);

    let shown = json_of(&dir, &["meeting", "show", &id[..8]]);
    assert_eq!(shown["meeting"]["title"], "Kickoff");
    assert_eq!(shown["delay"]["showCauseRequired"], false);

    let finalized = json_of(&dir, &["meeting", "finalize", &id]);
    assert_eq!(finalized["status"], "final");
}

#[test]
fn meeting_validation_lists_fields() {
    let dir = init_board();
    taskboard()
        .args([
            "meeting", "add", "--project", "p1", "-t", "Sync", "--mode", "online", "--date",
            "2025-05-02", "--duration", "1h",
        ])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("agenda: Agenda is required"))
        .stderr(predicates::str::contains("meetingLink"));
}

#[test]
fn show_cause_for_late_minutes_only() {
    let dir = init_board();
    let base = [
        "meeting", "add", "--project", "p1", "--agenda", "a", "--summary", "s", "--notes", "n",
        "--duration", "1h",
    ];

    let mut late_args = base.to_vec();
    late_args.extend(["-t", "Old", "--date", "2020-01-01"]);
    let late = json_of(&dir, &late_args);
    let late_id = late["meetingId"].as_str().unwrap().to_string();

    let mut future_args = base.to_vec();
    future_args.extend(["-t", "Future", "--date", "2999-01-01"]);
    let future = json_of(&dir, &future_args);
    let future_id = future["meetingId"].as_str().unwrap().to_string();

    taskboard()
        .args(["meeting", "show", &late_id])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("show cause required"));

    let updated = json_of(
        &dir,
        &["meeting", "show-cause", &late_id, "--reason", "Client call ran over"],
    );
    assert_eq!(updated["showCause"]["submittedBy"], "asha");
    assert_eq!(updated["showCause"]["reason"], "Client call ran over");

    taskboard()
        .args(["meeting", "show-cause", &future_id, "--reason", "n/a"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("on time"));
    taskboard()
        .args(["meeting", "show-cause", &late_id, "--reason", "   "])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn json_errors_still_go_to_stderr() {
    let dir = init_board();
    taskboard()
        .args(["--json", "task", "show", "abcdef"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stdout(predicates::str::is_empty());
}

#[test]
fn task_add_keeps_external_id() {
    let dir = init_board();
    let id = add_task(&dir, "Imported", &["--id", "TSK-0042", "--status", "pending"]);
    assert_eq!(id, "TSK-0042");

    taskboard()
        .args(["task", "add", "-t", "Again", "--id", "TSK-0042"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("already in use"));
    taskboard()
        .args(["task", "add", "-t", "Bad", "--id", "two words"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn list_with_huge_page_number_is_empty() {
    let dir = init_board();
    add_task(&dir, "only", &[]);
    let out = json_of(&dir, &["list", "--page", "18446744073709551615"]);
    assert!(out["page"]["items"].as_array().unwrap().is_empty());

    taskboard()
        .args(["list", "--page", "18446744073709551615"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("Page 18446744073709551615 of 1"));
}

#[test]
fn oversized_meeting_durations_are_handled() {
    let dir = init_board();
    let base = [
        "meeting", "add", "--project", "p1", "-t", "Marathon", "--agenda", "a", "--summary", "s",
        "--notes", "n", "--date", "2025-05-02",
    ];

    let mut overflow = base.to_vec();
    overflow.extend(["--duration", "200000000000000000h"]);
    taskboard()
        .args(&overflow)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("Unrecognised duration"));

    let mut far = base.to_vec();
    far.extend(["--duration", "100000000000000m"]);
    let meeting = json_of(&dir, &far);
    let id = meeting["meetingId"].as_str().unwrap().to_string();

    let shown = json_of(&dir, &["meeting", "show", &id]);
    assert!(shown["delay"].is_null());
    taskboard()
        .args(["meeting", "show-cause", &id, "--reason", "late"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("on time"));
}
