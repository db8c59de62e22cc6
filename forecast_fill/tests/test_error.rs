use forecast_fill::report::{ColumnOutcome, ColumnReport, WorkbookOutcome, WorkbookReport};
use forecast_fill::{FillError, RunConfig};
use rstest::rstest;
use series_math::MathError;
use std::io;
use std::path::PathBuf;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    match FillError::from(io_error) {
        FillError::Io(_) => {}
        other => panic!("Expected Io variant, got {:?}", other),
    }

    let math_error = MathError::InsufficientData("need 2 points".to_string());
    match FillError::from(math_error) {
        FillError::Math(inner) => assert!(inner.to_string().contains("need 2 points")),
        other => panic!("Expected Math variant, got {:?}", other),
    }

    let json_error = serde_json::from_str::<RunConfig>("{not json").unwrap_err();
    assert_eq!(FillError::from(json_error).kind(), "json");
}

#[rstest]
#[case(FillError::InvalidInput("short".to_string()), "invalid_input")]
#[case(FillError::EmptyLibrary, "empty_library")]
#[case(FillError::InsufficientOverlap { aligned: 1 }, "insufficient_overlap")]
#[case(
    FillError::ArtifactNotFound { identifier: "B".to_string(), reason: "none".to_string() },
    "artifact_not_found"
)]
#[case(
    FillError::AmbiguousArtifact { dir: PathBuf::from("pipelines/B"), count: 2 },
    "ambiguous_artifact"
)]
#[case(
    FillError::UnreadableSheet { workbook: "Test_example1".to_string(), sheet: "Monthly".to_string() },
    "unreadable_sheet"
)]
#[case(FillError::Engine("diverged".to_string()), "engine")]
#[case(FillError::Config("bad".to_string()), "config")]
fn test_error_kinds(#[case] error: FillError, #[case] kind: &str) {
    assert_eq!(error.kind(), kind);
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_error_messages_name_the_subject() {
    let err = FillError::UnreadableSheet {
        workbook: "Test_example4".to_string(),
        sheet: "Monthly".to_string(),
    };
    assert_eq!(err.to_string(), "Workbook 'Test_example4' has no 'Monthly' sheet");

    let err = FillError::InsufficientOverlap { aligned: 1 };
    assert!(err.to_string().contains("1 aligned point"));
}

#[test]
fn test_errors_become_report_entries() {
    let err = FillError::ArtifactNotFound {
        identifier: "Sales1".to_string(),
        reason: "no directory".to_string(),
    };
    let column = ColumnReport::failed("Sales", &err);
    assert_eq!(column.column, "Sales");
    assert_eq!(
        column.outcome,
        ColumnOutcome::Failed {
            kind: "artifact_not_found".to_string(),
            message: err.to_string(),
        }
    );

    let workbook = WorkbookReport::skipped("Test_example9", &FillError::EmptyLibrary);
    assert_eq!(workbook.test_id, None);
    assert!(matches!(
        workbook.outcome,
        WorkbookOutcome::Skipped { ref kind, .. } if kind == "empty_library"
    ));
}

#[test]
fn test_column_report_json_shape() {
    let report = ColumnReport {
        column: "Flat".to_string(),
        outcome: ColumnOutcome::PassThrough,
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json, serde_json::json!({"column": "Flat", "status": "pass_through"}));
}
