use forecast_fill::artifacts::{normalize_identifier, sanitize_file_name, ArtifactIndex};
use forecast_fill::models::Pipeline;
use forecast_fill::FillError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_pipeline(dir: &Path, file: &str, pipeline: &Pipeline) {
    fs::create_dir_all(dir).unwrap();
    pipeline.save(dir.join(file)).unwrap();
}

#[rstest]
#[case("Sales1", "Sales")]
#[case("B", "")]
#[case("a/b:c?d", "abc")]
#[case("", "")]
fn test_normalize_identifier(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(normalize_identifier(raw), expected);
}

#[test]
fn test_normalize_drops_last_char_before_stripping() {
    // trailing character is removed first, even if it is path-unsafe
    assert_eq!(normalize_identifier("N1/"), "N1");
    assert_eq!(normalize_identifier("x<y>z"), "xy");
    assert_eq!(sanitize_file_name("x<y>z"), "xyz");
}

#[test]
fn test_empty_root_has_no_artifacts() {
    let root = tempdir().unwrap();
    let index = ArtifactIndex::scan(root.path()).unwrap();
    assert!(index.is_empty());

    for identifier in ["A1", "B", "anything"] {
        assert!(matches!(
            index.locate(identifier),
            Err(FillError::ArtifactNotFound { .. })
        ));
    }
}

#[test]
fn test_locates_directory_containing_normalized_identifier() {
    let root = tempdir().unwrap();
    write_pipeline(
        &root.path().join("pipeline_Sales"),
        "model.json",
        &Pipeline::ExponentialSmoothing { alpha: 0.3 },
    );
    write_pipeline(&root.path().join("pipeline_Costs"), "model.json", &Pipeline::Naive);

    let index = ArtifactIndex::scan(root.path()).unwrap();
    assert_eq!(index.len(), 2);

    let (location, pipeline) = index.load("Sales7").unwrap();
    assert_eq!(location.dir_name, "pipeline_Sales");
    assert_eq!(pipeline, Pipeline::ExponentialSmoothing { alpha: 0.3 });
}

#[test]
fn test_exact_directory_name_wins() {
    let root = tempdir().unwrap();
    write_pipeline(&root.path().join("AB_old"), "p.json", &Pipeline::Naive);
    write_pipeline(
        &root.path().join("AB"),
        "p.json",
        &Pipeline::MovingAverage { window: 3 },
    );

    let index = ArtifactIndex::scan(root.path()).unwrap();
    let location = index.locate("ABX").unwrap();
    assert_eq!(location.dir_name, "AB");
}

#[test]
fn test_first_directory_by_name_wins_without_exact_match() {
    let root = tempdir().unwrap();
    write_pipeline(&root.path().join("z_North"), "p.json", &Pipeline::Naive);
    write_pipeline(&root.path().join("a_North"), "p.json", &Pipeline::Naive);

    let index = ArtifactIndex::scan(root.path()).unwrap();
    assert_eq!(index.locate("North1").unwrap().dir_name, "a_North");
}

#[test]
fn test_directory_without_pipeline_file() {
    let root = tempdir().unwrap();
    let dir = root.path().join("Sales");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("notes.txt"), "not a pipeline").unwrap();

    let index = ArtifactIndex::scan(root.path()).unwrap();
    assert!(matches!(
        index.locate("Sales1"),
        Err(FillError::ArtifactNotFound { .. })
    ));
}

#[test]
fn test_multiple_pipeline_files_are_ambiguous() {
    let root = tempdir().unwrap();
    let dir = root.path().join("Sales");
    write_pipeline(&dir, "a.json", &Pipeline::Naive);
    write_pipeline(&dir, "b.json", &Pipeline::Naive);

    let index = ArtifactIndex::scan(root.path()).unwrap();
    match index.locate("Sales1") {
        Err(FillError::AmbiguousArtifact { count, .. }) => assert_eq!(count, 2),
        other => panic!("Expected AmbiguousArtifact, got {:?}", other),
    }
}

#[test]
fn test_invalid_pipeline_file_fails_to_load() {
    let root = tempdir().unwrap();
    let dir = root.path().join("Sales");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("p.json"), r#"{"model": "holt", "alpha": 2.0, "beta": 0.1}"#).unwrap();

    let index = ArtifactIndex::scan(root.path()).unwrap();
    assert!(index.locate("Sales1").is_ok());
    assert!(index.load("Sales1").is_err());
}

#[test]
fn test_missing_root_is_io_error() {
    let root = tempdir().unwrap();
    let result = ArtifactIndex::scan(root.path().join("does_not_exist"));
    assert!(matches!(result, Err(FillError::Io(_))));
}
