use std::fs;
use std::path::Path;

use epsilon_reduce::asc::{load_asc, parse_asc, AscHeader, Grid};
use epsilon_reduce::ReduceError;
use tempfile::TempDir;

const SAMPLE: &str = "\
ncols         3
nrows         2
xllcorner     28.86
yllcorner     -2.84
cellsize      0.0083
NODATA_value  -9999
1 2 3
4 -9999 6
";

#[test]
fn test_parse_header_and_values() {
    let grid = parse_asc(SAMPLE.as_bytes(), Path::new("sample.asc")).unwrap();
    let header = grid.header();
    assert_eq!(grid.shape(), (2, 3));
    assert_eq!(header.xllcorner, 28.86);
    assert_eq!(header.yllcorner, -2.84);
    assert_eq!(header.cellsize, 0.0083);
    assert_eq!(grid.nodata(), -9999.0);
    assert_eq!(grid.row(0), &[1.0, 2.0, 3.0]);
    assert_eq!(grid.get(1, 2), 6.0);
    assert!(grid.is_nodata(grid.get(1, 1)));
}

#[test]
fn test_short_row_is_rejected_with_line() {
    let text = "ncols 3\nnrows 2\n1 2 3\n4 5\n";
    match parse_asc(text.as_bytes(), Path::new("bad.asc")) {
        Err(ReduceError::Asc { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected ASC error, got {other:?}"),
    }
}

#[test]
fn test_missing_rows_are_rejected() {
    let text = "ncols 2\nnrows 3\n1 2\n3 4\n";
    assert!(matches!(
        parse_asc(text.as_bytes(), Path::new("bad.asc")),
        Err(ReduceError::Asc { .. })
    ));
}

#[test]
fn test_extra_rows_are_rejected() {
    let text = "ncols 1\nnrows 1\n1\n2\n";
    assert!(matches!(
        parse_asc(text.as_bytes(), Path::new("bad.asc")),
        Err(ReduceError::Asc { line: 4, .. })
    ));
}

#[test]
fn test_non_numeric_cell_is_rejected() {
    let text = "ncols 2\nnrows 1\n1 x\n";
    assert!(matches!(
        parse_asc(text.as_bytes(), Path::new("bad.asc")),
        Err(ReduceError::Asc { line: 3, .. })
    ));
}

#[test]
fn test_missing_dimensions_are_rejected() {
    let text = "ncols 2\n1 2\n";
    assert!(matches!(
        parse_asc(text.as_bytes(), Path::new("bad.asc")),
        Err(ReduceError::Asc { .. })
    ));
}

#[test]
fn test_load_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("population.asc");
    fs::write(&path, SAMPLE).unwrap();
    let grid = load_asc(&path).unwrap();
    assert_eq!(grid.shape(), (2, 3));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_asc(dir.path().join("absent.asc")).unwrap_err();
    assert!(matches!(err, ReduceError::Io { .. }));
    // the OS error belongs to the source chain, not the message itself
    let message = err.to_string();
    assert!(message.starts_with("cannot access "), "unexpected message {message}");
    assert!(message.ends_with("absent.asc"), "cause repeated in message: {message}");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_grid_constructors() {
    let header = AscHeader::new(2, 2);
    assert!(Grid::new(header.clone(), vec![1.0; 3]).is_none());
    let filled = Grid::filled(header, 0.99);
    assert_eq!(filled.row(1), &[0.99, 0.99]);
}
