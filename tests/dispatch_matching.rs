// tests/dispatch_matching.rs

use dropflow_test_utils::builders::{RegistryBuilder, spec};
use dropflow_test_utils::fake_executor::FakeExecutor;
use dropflow_test_utils::{init_tracing, with_timeout};

use std::error::Error;

use dropflow::dispatch::{DispatchHandler, FileEvent};
use dropflow::errors::DropflowError;
use dropflow::pipeline::Registry;
use dropflow::types::FallbackAction;

type TestResult = Result<(), Box<dyn Error>>;

fn handler_with(
    registry: Option<Registry>,
    executor: FakeExecutor,
) -> DispatchHandler<FakeExecutor> {
    DispatchHandler::with_executor(registry, FallbackAction::None, executor)
}

#[tokio::test]
async fn tag_substring_match_triggers_pipeline() -> TestResult {
    init_tracing();

    let registry = RegistryBuilder::new()
        .with_pipeline("orders", vec![spec("ingest.sh", "1", "logs")])
        .build();
    let executor = FakeExecutor::new();
    let handler = handler_with(Some(registry), executor.clone());

    let summaries = with_timeout(
        handler.on_file_created(&FileEvent::file("drop/orders_2024-05.csv")),
    )
    .await?;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].tag, "orders");
    assert_eq!(executor.started_order(), vec!["ingest.sh".to_string()]);

    Ok(())
}

#[tokio::test]
async fn overlapping_tags_trigger_independent_runs_in_registry_order() -> TestResult {
    init_tracing();

    // "test" is a substring of "test2", so a test2 file matches both.
    let registry = RegistryBuilder::new()
        .with_pipeline("test", vec![spec("t.sh", "1", "logs")])
        .with_pipeline("test2", vec![spec("t2.sh", "1", "logs")])
        .build();
    let executor = FakeExecutor::new();
    let handler = handler_with(Some(registry), executor.clone());

    let summaries =
        with_timeout(handler.on_file_created(&FileEvent::file("test2_data.csv"))).await?;

    let tags: Vec<&str> = summaries.iter().map(|s| s.tag.as_str()).collect();
    assert_eq!(tags, vec!["test", "test2"]);
    assert_eq!(
        executor.started_order(),
        vec!["t.sh".to_string(), "t2.sh".to_string()],
        "runs should be sequential, registry order"
    );

    Ok(())
}

#[tokio::test]
async fn matching_uses_only_the_final_path_segment() -> TestResult {
    init_tracing();

    // "data" appears in the directory part of the path, not the file name.
    let registry = RegistryBuilder::new()
        .with_pipeline("data", vec![spec("d.sh", "1", "logs")])
        .with_pipeline("etl", vec![spec("e.sh", "1", "logs")])
        .build();
    let executor = FakeExecutor::new();
    let handler = handler_with(Some(registry), executor.clone());

    let summaries =
        with_timeout(handler.on_file_created(&FileEvent::file("/data/in/etl_x.csv"))).await?;

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].tag, "etl");
    assert_eq!(executor.started_order(), vec!["e.sh".to_string()]);

    Ok(())
}

#[tokio::test]
async fn directory_events_are_ignored() -> TestResult {
    init_tracing();

    let registry = RegistryBuilder::new()
        .with_pipeline("orders", vec![spec("ingest.sh", "1", "logs")])
        .build();
    let executor = FakeExecutor::new();
    let handler = handler_with(Some(registry), executor.clone());

    let summaries =
        with_timeout(handler.on_file_created(&FileEvent::directory("orders_archive"))).await?;

    assert!(summaries.is_empty());
    assert!(executor.events().is_empty());

    Ok(())
}

#[tokio::test]
async fn missing_registry_is_a_fatal_configuration_error() -> TestResult {
    init_tracing();

    let handler = handler_with(None, FakeExecutor::new());

    let err = with_timeout(handler.on_file_created(&FileEvent::file("orders.csv")))
        .await
        .unwrap_err();
    assert!(matches!(err, DropflowError::RegistryMissing));

    Ok(())
}

#[tokio::test]
async fn empty_registry_behaves_like_missing() -> TestResult {
    init_tracing();

    let handler = handler_with(Some(Registry::new()), FakeExecutor::new());

    let err = with_timeout(handler.on_file_created(&FileEvent::file("orders.csv")))
        .await
        .unwrap_err();
    assert!(matches!(err, DropflowError::RegistryMissing));

    Ok(())
}

#[tokio::test]
async fn unmatched_file_with_none_fallback_reports_no_runs() -> TestResult {
    init_tracing();

    let registry = RegistryBuilder::new()
        .with_pipeline("orders", vec![spec("ingest.sh", "1", "logs")])
        .build();
    let executor = FakeExecutor::new();
    let handler = handler_with(Some(registry), executor.clone());

    let summaries =
        with_timeout(handler.on_file_created(&FileEvent::file("unrelated.txt"))).await?;

    assert!(summaries.is_empty());
    assert!(executor.events().is_empty());

    Ok(())
}
