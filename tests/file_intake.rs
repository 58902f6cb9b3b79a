use dash_forge::gui::is_csv_file;

#[test]
fn csv_extension_is_accepted() {
    assert!(is_csv_file("data.csv", ""));
    assert!(is_csv_file("DATA.CSV", "application/octet-stream"));
}

#[test]
fn csv_mime_is_accepted_regardless_of_name() {
    assert!(is_csv_file("export.txt", "text/csv"));
}

#[test]
fn everything_else_is_rejected() {
    assert!(!is_csv_file("data.txt", ""));
    assert!(!is_csv_file("data.xlsx", "application/vnd.ms-excel"));
    assert!(!is_csv_file("csv", "text/plain"));
}
