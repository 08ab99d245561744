#![cfg(feature = "profile")]

use arbor_profiler::{ProfilerError, SortBy};
use std::fs;

#[test]
fn test_init_from_file() {
    let dir = std::env::temp_dir().join(format!("arbor-settings-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let broken = dir.join("broken.json");
    fs::write(&broken, "{ \"name_width\": 0 }").unwrap();
    assert!(matches!(
        arbor_profiler::init_from_file(&broken),
        Err(ProfilerError::Settings(_))
    ));

    let path = dir.join("arbor.json");
    let json = serde_json::json!({
        "default_sort": "execution_order",
        "name_width": 24,
        "default_label": "anonymous",
    });
    fs::write(&path, json.to_string()).unwrap();
    arbor_profiler::init_from_file(&path).unwrap();

    let settings = arbor_profiler::profiler().settings();
    assert_eq!(settings.default_sort, SortBy::ExecutionOrder);
    assert_eq!(settings.name_width, 24);

    arbor_profiler::section_push("");
    arbor_profiler::section_pop();
    let report = arbor_profiler::profiler().report(SortBy::TotalTime);
    assert_eq!(report.name_width, 24);
    assert!(report.threads[0].find(&["anonymous"]).is_some());

    fs::remove_dir_all(&dir).unwrap();
}
