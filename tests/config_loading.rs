// tests/config_loading.rs

use dropflow_test_utils::init_tracing;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use dropflow::config::load_and_validate;
use dropflow::config::paths::is_inside;
use dropflow::pipeline::Registry;
use dropflow::types::FallbackAction;

type TestResult = Result<(), Box<dyn Error>>;

/// Write `contents` as a `Dropflow.toml` in a fresh temp dir.
fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("creating temp dir");
    let path = dir.path().join("Dropflow.toml");
    fs::write(&path, contents).expect("writing config file");
    (dir, path)
}

#[test]
fn full_config_round_trips() -> TestResult {
    init_tracing();

    let (_dir, path) = write_config(
        r#"
[watch]
path = "landing"
recursive = true
wait_seconds = 5
on_unmatched = "DELETE"

[pipeline.sales]
tasks = [
    { script = "scripts/extract.sh", group = "extract", log_dir = "logs/sales" },
    { script = "scripts/clean.sh", group = "extract", log_dir = "logs/sales" },
    { script = "scripts/load.sh", group = "load", log_dir = "logs/sales" },
]
"#,
    );

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.watch.path, Path::new("landing"));
    assert!(cfg.watch.recursive);
    assert_eq!(cfg.watch.wait_seconds, 5);
    assert_eq!(cfg.watch.on_unmatched, FallbackAction::Delete);

    let sales = &cfg.pipeline["sales"];
    assert_eq!(sales.tasks.len(), 3);
    assert_eq!(sales.tasks[0].script, Path::new("scripts/extract.sh"));
    assert_eq!(sales.tasks[0].group, "extract");
    assert_eq!(sales.tasks[1].group, "extract");
    assert_eq!(sales.tasks[2].group, "load");
    assert_eq!(sales.tasks[2].log_dir, Path::new("logs/sales"));

    Ok(())
}

#[test]
fn missing_watch_section_uses_defaults() -> TestResult {
    init_tracing();

    let (_dir, path) = write_config(
        r#"
[pipeline.etl]
tasks = [{ script = "run.sh", group = "1", log_dir = "logs" }]
"#,
    );

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.watch.path, Path::new("."));
    assert!(!cfg.watch.recursive);
    assert_eq!(cfg.watch.wait_seconds, 20);
    assert_eq!(cfg.watch.on_unmatched, FallbackAction::None);

    Ok(())
}

#[test]
fn registry_tags_come_out_in_deterministic_order() -> TestResult {
    init_tracing();

    let (_dir, path) = write_config(
        r#"
[pipeline.zeta]
tasks = [{ script = "z.sh", group = "1", log_dir = "logs" }]

[pipeline.alpha]
tasks = [{ script = "a.sh", group = "1", log_dir = "logs" }]

[pipeline.mid]
tasks = [{ script = "m.sh", group = "1", log_dir = "logs" }]
"#,
    );

    let cfg = load_and_validate(&path)?;
    let registry = Registry::from_config(&cfg);

    let tags: Vec<&str> = registry.tags().collect();
    assert_eq!(tags, vec!["alpha", "mid", "zeta"]);
    assert_eq!(registry.len(), 3);

    Ok(())
}

#[test]
fn fallback_action_accepts_mixed_case() -> TestResult {
    init_tracing();

    let (_dir, path) = write_config(
        r#"
[watch]
on_unmatched = "DeLeTe"

[pipeline.etl]
tasks = [{ script = "run.sh", group = "1", log_dir = "logs" }]
"#,
    );

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.watch.on_unmatched, FallbackAction::Delete);

    Ok(())
}

#[test]
fn config_without_pipelines_is_rejected() {
    init_tracing();

    let (_dir, path) = write_config(
        r#"
[watch]
path = "landing"
"#,
    );

    assert!(load_and_validate(&path).is_err());
}

#[test]
fn pipeline_without_tasks_is_rejected() {
    init_tracing();

    let (_dir, path) = write_config(
        r#"
[pipeline.etl]
tasks = []
"#,
    );

    assert!(load_and_validate(&path).is_err());
}

#[test]
fn zero_wait_seconds_is_rejected() {
    init_tracing();

    let (_dir, path) = write_config(
        r#"
[watch]
wait_seconds = 0

[pipeline.etl]
tasks = [{ script = "run.sh", group = "1", log_dir = "logs" }]
"#,
    );

    assert!(load_and_validate(&path).is_err());
}

#[test]
fn empty_group_is_rejected() {
    init_tracing();

    let (_dir, path) = write_config(
        r#"
[pipeline.etl]
tasks = [{ script = "run.sh", group = "", log_dir = "logs" }]
"#,
    );

    assert!(load_and_validate(&path).is_err());
}

#[test]
fn missing_config_file_is_an_error() {
    init_tracing();

    let dir = tempfile::tempdir().expect("creating temp dir");
    let path = dir.path().join("nope.toml");

    assert!(load_and_validate(&path).is_err());
}

#[test]
fn relative_log_dirs_count_as_inside_the_default_watch_path() {
    init_tracing();

    // The default watch path is "."; relative log dirs land under it.
    assert!(is_inside(Path::new("."), Path::new("logs")));
    assert!(is_inside(Path::new("."), Path::new("sub/../logs")));
    assert!(is_inside(Path::new("landing"), Path::new("landing/logs")));
    // Logging straight into the watched directory itself counts too.
    assert!(is_inside(Path::new("landing"), Path::new("landing")));

    assert!(!is_inside(Path::new("."), Path::new("../elsewhere")));
    assert!(!is_inside(Path::new("landing"), Path::new("logs")));
}

#[test]
fn path_containment_anchors_relative_paths_at_the_current_directory() -> TestResult {
    init_tracing();

    let cwd = std::env::current_dir()?;

    // Absolute log dir spelled out under the relative watch path ".".
    assert!(is_inside(Path::new("."), &cwd.join("logs")));
    // Relative log dir against the same directory given absolutely.
    assert!(is_inside(&cwd, Path::new("logs")));
    // An absolute path elsewhere is not inside the watched tree.
    assert!(!is_inside(&cwd.join("in"), Path::new("/")));

    Ok(())
}
