use fitsdiff_core::{DiffConfig, DiffReport, FitsDiffError, SnapshotReader, run_diff};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_snapshot(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("snapshot fixture should be writable");
    path
}

fn compare(config: &DiffConfig, first: &Path, second: &Path) -> DiffReport {
    run_diff(config, &SnapshotReader, first, second).expect("comparison should run")
}

const SIMPLE_IMAGE: &str = r#"{
    "hdus": [
        {
            "cards": [
                {"keyword": "SIMPLE", "value": true, "comment": "conforms"},
                {"keyword": "BITPIX", "value": 16},
                {"keyword": "NAXIS", "value": 1},
                {"keyword": "NAXIS1", "value": 3}
            ],
            "shape": [3],
            "payload": {"kind": "array", "data": {"kind": "int16", "values": [7, 8, 9]}}
        }
    ]
}"#;

#[test]
fn identical_files_report_no_difference() {
    let temp = TempDir::new().expect("tempdir should be created");
    let first = write_snapshot(temp.path(), "a.json", SIMPLE_IMAGE);
    let second = write_snapshot(temp.path(), "b.json", SIMPLE_IMAGE);

    let report = compare(&DiffConfig::default(), &first, &second);

    assert!(report.identical);
    assert_eq!(
        report.lines.last().map(String::as_str),
        Some("No difference is found.")
    );
    assert!(
        !report
            .lines
            .iter()
            .any(|line| line.contains("different values") || line.contains("Extra keyword")),
        "unexpected mismatch lines: {:?}",
        report.lines
    );
}

#[test]
fn close_keyword_values_disappear_under_tolerance() {
    let header = |exptime: &str| {
        format!(
            r#"{{
                "hdus": [
                    {{
                        "cards": [
                            {{"keyword": "SIMPLE", "value": true}},
                            {{"keyword": "EXPTIME", "value": {exptime}}}
                        ]
                    }}
                ]
            }}"#
        )
    };
    let temp = TempDir::new().expect("tempdir should be created");
    let first = write_snapshot(temp.path(), "a.json", &header("100.0"));
    let second = write_snapshot(temp.path(), "b.json", &header("100.05"));

    let strict = compare(&DiffConfig::default(), &first, &second);
    assert!(!strict.identical);
    assert!(
        strict
            .lines
            .contains(&"  Keyword EXPTIME  has different values:".to_string()),
        "report: {:?}",
        strict.lines
    );

    let tolerant = compare(
        &DiffConfig {
            delta: 0.01,
            ..DiffConfig::default()
        },
        &first,
        &second,
    );
    assert!(tolerant.identical, "report: {:?}", tolerant.lines);
}

#[test]
fn single_image_discrepancy_names_the_display_coordinate() {
    let image = |last: i64| {
        format!(
            r#"{{
                "hdus": [
                    {{
                        "cards": [{{"keyword": "SIMPLE", "value": true}}],
                        "shape": [2, 3],
                        "payload": {{
                            "kind": "array",
                            "data": {{"kind": "int32", "values": [0, 1, 2, 3, 4, {last}]}}
                        }}
                    }}
                ]
            }}"#
        )
    };
    let temp = TempDir::new().expect("tempdir should be created");
    let first = write_snapshot(temp.path(), "a.json", &image(60));
    let second = write_snapshot(temp.path(), "b.json", &image(66));

    let report = compare(&DiffConfig::default(), &first, &second);

    assert!(!report.identical);
    assert!(
        report
            .lines
            .iter()
            .any(|line| line.contains("[3, 2]")),
        "report: {:?}",
        report.lines
    );
    assert!(
        report
            .lines
            .contains(&"    There are 1 different data points.".to_string())
    );
    assert_eq!(report.units[0].data_difference_count, 1);
}

#[test]
fn format_mismatch_skips_one_column_and_compares_the_next() {
    let table = |time_format: &str, time_kind: &str, rate_mid: i64| {
        format!(
            r#"{{
                "hdus": [
                    {{"cards": [{{"keyword": "SIMPLE", "value": true}}]}},
                    {{
                        "cards": [{{"keyword": "XTENSION", "value": "BINTABLE"}}],
                        "shape": [3],
                        "payload": {{
                            "kind": "table",
                            "columns": [
                                {{
                                    "name": "TIME",
                                    "format": "{time_format}",
                                    "values": {{"kind": "{time_kind}", "values": [1.0, 2.0, 3.0]}}
                                }},
                                {{
                                    "name": "RATE",
                                    "format": "1J",
                                    "values": {{"kind": "int32", "values": [10, {rate_mid}, 30]}}
                                }}
                            ]
                        }}
                    }}
                ]
            }}"#
        )
    };
    let temp = TempDir::new().expect("tempdir should be created");
    let first = write_snapshot(temp.path(), "a.json", &table("1E", "float32", 20));
    let second = write_snapshot(temp.path(), "b.json", &table("1D", "float64", 25));

    let report = compare(&DiffConfig::default(), &first, &second);

    assert!(!report.identical);
    assert!(
        report
            .lines
            .contains(&"BINTABLE Extension 1 HDU:".to_string())
    );
    assert!(
        report
            .lines
            .iter()
            .any(|line| line.starts_with("Different data type at column 1:")),
        "report: {:?}",
        report.lines
    );
    assert!(
        report
            .lines
            .contains(&"    Data differ at column 2:".to_string())
    );
    assert!(
        report
            .lines
            .contains(&"      Row   2, file 1:               20    file 2:               25".to_string())
    );
    assert!(
        report
            .lines
            .contains(&"    There are 1 different data points.".to_string())
    );
    assert_eq!(report.units[1].data_difference_count, 1);
}

#[test]
fn zero_budget_still_counts_every_discrepancy() {
    let image = |values: &str| {
        format!(
            r#"{{
                "hdus": [
                    {{
                        "cards": [{{"keyword": "SIMPLE", "value": true}}],
                        "shape": [5],
                        "payload": {{
                            "kind": "array",
                            "data": {{"kind": "int32", "values": {values}}}
                        }}
                    }}
                ]
            }}"#
        )
    };
    let temp = TempDir::new().expect("tempdir should be created");
    let first = write_snapshot(temp.path(), "a.json", &image("[1, 2, 3, 4, 5]"));
    let second = write_snapshot(temp.path(), "b.json", &image("[9, 9, 9, 9, 9]"));

    let report = compare(
        &DiffConfig {
            max_diff: 0,
            ..DiffConfig::default()
        },
        &first,
        &second,
    );

    assert!(!report.identical);
    assert!(
        !report
            .lines
            .iter()
            .any(|line| line.starts_with("    Data differ at")),
        "report: {:?}",
        report.lines
    );
    assert!(
        report
            .lines
            .contains(&"    There are 5 different data points.".to_string())
    );
    assert_eq!(report.units[0].data_difference_count, 5);
}

#[test]
fn missing_exclusion_list_warns_before_the_banner() {
    let temp = TempDir::new().expect("tempdir should be created");
    let first = write_snapshot(temp.path(), "a.json", SIMPLE_IMAGE);
    let second = write_snapshot(temp.path(), "b.json", SIMPLE_IMAGE);
    let missing = temp.path().join("no-such-list.txt");

    let report = compare(
        &DiffConfig {
            value_exclusions: format!("@{}", missing.display()),
            ..DiffConfig::default()
        },
        &first,
        &second,
    );

    assert!(report.lines[0].starts_with("CAUTION:"), "report: {:?}", report.lines);
    assert!(report.lines[1].starts_with(" fitsdiff: "));
    assert!(report.identical);
}

#[test]
fn readable_exclusion_list_suppresses_named_keywords() {
    let header = |exptime: &str| {
        format!(
            r#"{{
                "hdus": [
                    {{
                        "cards": [
                            {{"keyword": "SIMPLE", "value": true}},
                            {{"keyword": "EXPTIME", "value": {exptime}}}
                        ]
                    }}
                ]
            }}"#
        )
    };
    let temp = TempDir::new().expect("tempdir should be created");
    let first = write_snapshot(temp.path(), "a.json", &header("100.0"));
    let second = write_snapshot(temp.path(), "b.json", &header("250.0"));
    let list = temp.path().join("skip.lst");
    fs::write(&list, "exptime\n").expect("list should be writable");

    let report = compare(
        &DiffConfig {
            value_exclusions: format!("@{}", list.display()),
            ..DiffConfig::default()
        },
        &first,
        &second,
    );

    assert!(report.identical, "report: {:?}", report.lines);
}

#[test]
fn unit_count_mismatch_aborts_the_run() {
    let temp = TempDir::new().expect("tempdir should be created");
    let first = write_snapshot(temp.path(), "a.json", SIMPLE_IMAGE);
    let second = write_snapshot(
        temp.path(),
        "b.json",
        r#"{
            "hdus": [
                {"cards": [{"keyword": "SIMPLE", "value": true}]},
                {"cards": [{"keyword": "XTENSION", "value": "IMAGE"}]}
            ]
        }"#,
    );

    let error = run_diff(&DiffConfig::default(), &SnapshotReader, &first, &second)
        .expect_err("mismatched unit counts should abort");
    assert!(matches!(error, FitsDiffError::UnitCountMismatch { .. }));
}
