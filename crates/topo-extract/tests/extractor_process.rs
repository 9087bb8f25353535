//! Extractor process behaviour with small shell scripts standing in for the
//! real tool.

#![cfg(unix)]

use std::path::{Path, PathBuf};

use topo_config::{ClassifyConfig, ExtractorConfig};
use topo_extract::{
    Classifier, ExtractError, ExtractionMode, Extractor, GraphBuilder, extract_raw,
};

fn shell(script: &str, timeout_secs: u64) -> ExtractorConfig {
    ExtractorConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string(), "extractor".to_string(), "{file}".to_string()],
        timeout_secs,
    }
}

fn definition(dir: &Path) -> PathBuf {
    let path = dir.join("app.bicep");
    std::fs::write(&path, "line\n".repeat(30)).unwrap();
    path
}

#[tokio::test]
async fn extractor_output_builds_a_graph() {
    let dir = tempfile::tempdir().unwrap();
    let file = definition(dir.path());
    let output = r#"{"resources":[{"name":"frontend","type":"Applications.Core/containers","file":"app.bicep","line":4},{"name":"backend","type":"Applications.Core/containers","file":"app.bicep","line":12}],"connections":[{"sourceId":"frontend","targetId":"http://backend:3000","type":"connection"}]}"#;
    let config = shell(&format!("echo '{output}'"), 10);

    let (raw, mode) = extract_raw(&config, &file, false).await.unwrap();
    assert_eq!(mode, ExtractionMode::Extractor);

    let builder = GraphBuilder::new(
        Classifier::from_config(&ClassifyConfig::default()).unwrap(),
        dir.path(),
    );
    let outcome = builder.build(&file, raw).unwrap();
    assert_eq!(outcome.graph.nodes().len(), 2);
    assert_eq!(outcome.graph.edges().len(), 1);
}

#[tokio::test]
async fn placeholder_receives_the_absolute_path() {
    let dir = tempfile::tempdir().unwrap();
    let file = definition(dir.path());
    // Echo the path back inside a valid document to prove it arrived.
    let config = shell(
        r#"printf '{"resources":[{"name":"%s","type":"t","line":1}],"connections":[]}' "$1""#,
        10,
    );
    let output = Extractor::new(config).run(&file).await.unwrap();
    assert!(output.contains(&*file.to_string_lossy()));
}

#[tokio::test]
async fn non_zero_exit_is_extraction_failed() {
    let dir = tempfile::tempdir().unwrap();
    let file = definition(dir.path());
    let config = shell("echo 'no cluster available' >&2; exit 3", 10);

    let err = Extractor::new(config).run(&file).await.unwrap_err();
    match err {
        ExtractError::ExtractionFailed { stderr, status, .. } => {
            assert_eq!(stderr, "no cluster available");
            assert!(status.contains('3'), "{status}");
        }
        other => panic!("expected ExtractionFailed, got {other}"),
    }
}

#[tokio::test]
async fn slow_extractor_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let file = definition(dir.path());
    let config = shell("sleep 5", 1);

    let started = std::time::Instant::now();
    let err = Extractor::new(config).run(&file).await.unwrap_err();
    assert!(matches!(err, ExtractError::ExtractionTimedOut { timeout_secs: 1, .. }));
    assert!(started.elapsed() < std::time::Duration::from_secs(4));
}

#[tokio::test]
async fn garbage_output_is_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let file = definition(dir.path());
    let config = shell("echo 'Deploying... done'", 10);

    let err = extract_raw(&config, &file, false).await.unwrap_err();
    assert!(
        matches!(err, ExtractError::SchemaMismatch { ref raw, .. } if raw.contains("Deploying"))
    );
}

#[tokio::test]
async fn relative_definition_path_is_rejected() {
    let err = Extractor::new(shell("true", 10))
        .run(Path::new("app.bicep"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::RelativeDefinitionPath(_)));
}

#[tokio::test]
async fn unconfigured_extractor_scans_directly() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("app.bicep");
    std::fs::write(
        &file,
        "resource web 'Applications.Core/containers@2023-10-01-preview' = {\n  name: 'web'\n}\n",
    )
    .unwrap();

    let (raw, mode) = extract_raw(&ExtractorConfig::default(), &file, false)
        .await
        .unwrap();
    assert_eq!(mode, ExtractionMode::Direct);
    assert_eq!(raw.resources.len(), 1);
    assert_eq!(raw.resources[0].line, 1);
}
