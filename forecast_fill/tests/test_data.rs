use forecast_fill::data::{Cell, Column, DataLoader, Table, Workbook};
use forecast_fill::library::ReferenceLibrary;
use forecast_fill::FillError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn test_loader_classifies_cells() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Unnamed: 0,Sales,Costs").unwrap();
    writeln!(file, "0,10.5,3").unwrap();
    writeln!(file, "1,11.0,4").unwrap();
    writeln!(file, "2,Forecast,5").unwrap();

    let table = DataLoader::from_csv(file.path(), "Forecast").unwrap();
    assert_eq!(table.width(), 3);
    assert_eq!(table.height(), 3);

    let sales = table.column("Sales").unwrap();
    assert_eq!(
        sales.cells(),
        &[Cell::Value(10.5), Cell::Value(11.0), Cell::Placeholder]
    );
    assert_eq!(table.column("Costs").unwrap().all_values(), Some(vec![3.0, 4.0, 5.0]));
    assert!(table.columns()[0].is_index());
    assert!(!sales.is_index());
}

#[test]
fn test_written_table_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("out.csv");
    let table = Table::from_columns(vec![
        Column::from_values("A", &[1.5, 2.5, 3.5]),
        Column::new(
            "B",
            vec![Cell::Value(1.0), Cell::Text("n/a".to_string()), Cell::Placeholder],
        ),
    ])
    .unwrap();

    DataLoader::write_csv(&table, &path, "Forecast").unwrap();
    let reloaded = DataLoader::from_csv(&path, "Forecast").unwrap();
    assert_eq!(reloaded, table);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = DataLoader::from_csv("nonexistent_file.csv", "Forecast");
    assert!(matches!(result, Err(FillError::Io(_))));
}

#[test]
fn test_table_rejects_uneven_columns() {
    let mut table = Table::new();
    table.push(Column::from_values("A", &[1.0, 2.0])).unwrap();
    assert!(table.push(Column::from_values("B", &[1.0])).is_err());
    assert_eq!(table.width(), 1);
}

#[test]
fn test_workbook_discovery() {
    let dir = tempdir().unwrap();
    for name in [
        "Test_example2.Monthly.csv",
        "Test_example2.Weekly.csv",
        "Test_example1.Monthly.csv",
        "Test_example3.Weekly.csv",
        "Train.csv",
        "Test_notes.txt",
    ] {
        fs::write(dir.path().join(name), "A\n1\n").unwrap();
    }
    fs::create_dir(dir.path().join("Test_dir")).unwrap();

    let workbooks = Workbook::discover(dir.path(), "Test").unwrap();
    let names: Vec<&str> = workbooks.iter().map(Workbook::name).collect();
    assert_eq!(names, vec!["Test_example1", "Test_example2", "Test_example3"]);
    assert_eq!(workbooks[1].sheet_names(), vec!["Monthly", "Weekly"]);

    assert!(workbooks[0].read_sheet("Monthly", "Forecast").is_ok());
    match workbooks[2].read_sheet("Monthly", "Forecast") {
        Err(FillError::UnreadableSheet { workbook, sheet }) => {
            assert_eq!(workbook, "Test_example3");
            assert_eq!(sheet, "Monthly");
        }
        other => panic!("Expected UnreadableSheet, got {:?}", other),
    }
}

#[rstest]
#[case("Test_example12", Some(12))]
#[case("batch_Test_example7_final", Some(7))]
#[case("Test_example", None)]
#[case("Other3", None)]
fn test_workbook_test_id(#[case] name: &str, #[case] expected: Option<u64>) {
    let workbook = Workbook::new(name, BTreeMap::<String, PathBuf>::new());
    assert_eq!(workbook.test_id("Test_example").ok(), expected);
}

#[test]
fn test_reference_library_skips_non_numeric_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Unnamed: 0,A,B,C").unwrap();
    writeln!(file, "0,1.0,2.0,x").unwrap();
    writeln!(file, "1,2.0,Forecast,y").unwrap();
    writeln!(file, "2,3.0,4.0,z").unwrap();

    let library = ReferenceLibrary::from_csv(file.path(), "Forecast").unwrap();
    let names: Vec<&str> = library.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["A"]);
    assert_eq!(library.height(), 3);
}

#[test]
fn test_reference_library_requires_equal_lengths() {
    let result = ReferenceLibrary::new(vec![("A", vec![1.0, 2.0]), ("B", vec![1.0])]);
    assert!(matches!(result, Err(FillError::InvalidInput(_))));
}
