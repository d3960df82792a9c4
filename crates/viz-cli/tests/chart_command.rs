//! End-to-end CLI tests: study folder + request JSON → chart payload.

use std::fs;
use std::path::PathBuf;
use viz_cli::cli::{ChartArgs, OutputArg};
use viz_cli::commands::{ChartPayload, chart_payload};

fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("viz-cli-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create fixture dir");
    dir
}

fn write_study(dir: &PathBuf) {
    fs::write(
        dir.join("subjects.csv"),
        "subject_id,subject_code,study_code,first_treatment_date\n\
         S1,E01-001,STUDY01,2024-01-01\n\
         S2,E01-002,STUDY01,2024-01-01\n",
    )
    .expect("write subjects");
    fs::write(
        dir.join("labs.csv"),
        "event_id,subject_id,measurement,value,unit,visit_number,sample_date\n\
         lab-1,S1,ALT,10,U/L,1,2024-02-01\n\
         lab-2,S1,ALT,20,U/L,1,2024-02-01\n\
         lab-3,S2,ALT,30,U/L,2,2024-03-01\n\
         lab-4,S2,AST,40,U/L,1,2024-02-01\n",
    )
    .expect("write labs");
}

fn args(dir: &PathBuf, request: &str) -> ChartArgs {
    let request_path = dir.join("request.json");
    fs::write(&request_path, request).expect("write request");
    ChartArgs {
        study_folder: dir.clone(),
        request: request_path,
        study_code: Some("STUDY01".to_string()),
        output: OutputArg::Json,
    }
}

#[test]
fn box_plot_request_end_to_end() {
    let dir = fixture_dir("boxplot");
    write_study(&dir);
    let args = args(
        &dir,
        r#"{
            "domain": "labs",
            "chart": "box_plot",
            "x": {"option": "VISIT_NUMBER", "bin_size": 1},
            "y": {"option": "VALUE"},
            "filters": [{"option": "MEASUREMENT", "values": ["ALT"]}]
        }"#,
    );

    let payload = chart_payload(&args).expect("chart payload");
    let ChartPayload::BoxPlot { cells } = payload else {
        panic!("expected box plot payload");
    };
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0].x, "1");
    assert_eq!(cells[0].stats.median, 15.0);
    assert_eq!(cells[0].stats.lower_quartile, 12.5);
    assert_eq!(cells[0].stats.upper_quartile, 17.5);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn counts_request_with_temporal_axis() {
    let dir = fixture_dir("counts");
    write_study(&dir);
    let args = args(
        &dir,
        r#"{
            "domain": "labs",
            "chart": "counts",
            "x": {
                "option": "SAMPLE_DATE",
                "bin_size": 5,
                "timestamp_type": "DAYS_SINCE_FIRST_DOSE"
            },
            "color_by": {"option": "MEASUREMENT"}
        }"#,
    );

    let payload = chart_payload(&args).expect("chart payload");
    let ChartPayload::Counts { series } = payload else {
        panic!("expected counts payload");
    };
    // ALT and AST series over the same categories.
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].name, "ALT");
    // 2024-02-01 is day 31 and 2024-03-01 is day 60 after first dose.
    let categories: Vec<&str> = series[0]
        .entries
        .iter()
        .map(|e| e.category.as_str())
        .collect();
    assert_eq!(categories, vec!["30 - 34", "60 - 64"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bad_request_is_an_error_not_a_panic() {
    let dir = fixture_dir("bad");
    write_study(&dir);
    let args = args(
        &dir,
        r#"{
            "domain": "labs",
            "chart": "counts",
            "x": {"option": "NOT_AN_OPTION"}
        }"#,
    );
    assert!(chart_payload(&args).is_err());

    let _ = fs::remove_dir_all(&dir);
}
