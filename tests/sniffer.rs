use dash_forge::sniffer::{sniff, ColumnType};

#[test]
fn numbers_and_dates_are_told_apart() {
    let report = sniff("a,b\n1,2024-01-01\n2,2024-01-02");
    assert_eq!(report.headers, vec!["a", "b"]);
    assert_eq!(report.columns[0].inferred, ColumnType::Numerical);
    assert_eq!(report.columns[1].inferred, ColumnType::DateTime);
}

#[test]
fn text_falls_back_to_categorical() {
    let report = sniff("region,amount\nNorth,10\nSouth,20");
    assert_eq!(report.columns[0].inferred, ColumnType::Categorical);
    assert_eq!(report.columns[1].inferred, ColumnType::Numerical);
}

#[test]
fn mixed_content_is_categorical() {
    let report = sniff("x\n12\nhello\n2024-01-01");
    assert_eq!(report.columns[0].inferred, ColumnType::Categorical);
}

#[test]
fn blank_lines_are_dropped() {
    let report = sniff("a,b\n\n1,2\n\n\n3,4\n\n");
    assert_eq!(report.sample_rows.len(), 2);
    assert_eq!(report.sample_rows[0], vec!["1", "2"]);
}

#[test]
fn sampling_caps_at_five_rows() {
    let csv = "n\n1\n2\n3\n4\n5\n6\n7";
    let report = sniff(csv);
    assert_eq!(report.sample_rows.len(), 5);
    assert_eq!(report.columns[0].samples.len(), 3);
}

#[test]
fn surrounding_quotes_are_trimmed() {
    let report = sniff("\"name\",\"value\"\n\"Widget A\",\"12\"");
    assert_eq!(report.headers, vec!["name", "value"]);
    assert_eq!(report.sample_rows[0], vec!["Widget A", "12"]);
    assert_eq!(report.columns[1].inferred, ColumnType::Numerical);
}

#[test]
fn empty_input_yields_an_empty_report() {
    let report = sniff("");
    assert!(report.headers.is_empty());
    assert!(report.sample_rows.is_empty());
    assert!(report.columns.is_empty());
}

#[test]
fn empty_cells_do_not_break_inference() {
    let report = sniff("a,b\n1,\n2,x");
    assert_eq!(report.columns[0].inferred, ColumnType::Numerical);
    assert_eq!(report.columns[1].inferred, ColumnType::Categorical);
    assert_eq!(report.columns[1].samples, vec!["x"]);
}
