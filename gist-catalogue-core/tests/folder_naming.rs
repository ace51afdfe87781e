use gist_catalogue_core::dates::{format_date, DateFormat};
use gist_catalogue_core::error::CatalogueError;
use gist_catalogue_core::folder::{assign_folder_names, folder_name, sanitise};
use gist_catalogue_core::model::Gist;
use serde_json::{json, Map, Value};

fn gist(id: &str, created_at: &str, filenames: &[&str]) -> Gist {
    let files: Map<String, Value> = filenames
        .iter()
        .map(|name| (name.to_string(), json!({ "filename": name })))
        .collect();
    Gist::from_value(&json!({
        "id": id,
        "created_at": created_at,
        "updated_at": created_at,
        "files": files,
    }))
}

#[test]
fn folder_name_for_single_python_file() {
    let g = gist("1", "2024-06-17T09:30:09Z", &["file1.py"]);
    assert_eq!(folder_name(&g).unwrap(), "20240617-file1-gist");
}

#[test]
fn folder_name_is_deterministic() {
    let g = gist("1", "2024-07-24T12:00:00Z", &["word break.py", "tests.py"]);
    let first = folder_name(&g).unwrap();
    let second = folder_name(&g).unwrap();
    assert_eq!(first, second);
    // Files are joined in filename order.
    assert_eq!(first, "20240724-tests_word_break-gist");
}

#[test]
fn sanitise_table() {
    struct Case {
        input: &'static str,
        expected: &'static str,
    }
    let cases = [
        Case {
            input: "file1.py",
            expected: "file1",
        },
        Case {
            input: "unit conversion.py",
            expected: "unit_conversion",
        },
        Case {
            input: "find-unused!.rs",
            expected: "find_unused_",
        },
        // Only the last extension goes.
        Case {
            input: "archive.tar.gz",
            expected: "archive_tar",
        },
        Case {
            input: "Makefile",
            expected: "Makefile",
        },
        Case {
            input: ".bashrc",
            expected: "",
        },
        Case {
            input: "café.txt",
            expected: "caf_",
        },
    ];

    for case in cases {
        assert_eq!(sanitise(case.input), case.expected, "input: {:?}", case.input);
    }
}

#[test]
fn sanitise_truncates_to_fifty_characters() {
    let long = format!("{}.py", "a".repeat(80));
    let sanitised = sanitise(&long);
    assert_eq!(sanitised.len(), 50);
    assert!(sanitised.chars().all(|c| c == 'a'));
}

#[test]
fn sanitised_output_is_alphanumeric_or_underscore() {
    let sanitised = sanitise("weird name (v2) [final]; really?.md");
    assert!(sanitised.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
}

#[test]
fn folder_name_rejects_malformed_timestamp() {
    let g = gist("1", "17/06/2024", &["file1.py"]);
    match folder_name(&g) {
        Err(CatalogueError::InvalidTimestamp { value }) => assert_eq!(value, "17/06/2024"),
        other => panic!("expected InvalidTimestamp, got {other:?}"),
    }
}

#[test]
fn format_date_supports_every_layout() {
    let ts = "2024-06-17T09:30:09Z";
    assert_eq!(format_date(ts, DateFormat::Date).unwrap(), "2024-06-17");
    assert_eq!(format_date(ts, DateFormat::Compact).unwrap(), "20240617");
    assert_eq!(format_date(ts, DateFormat::YearMonth).unwrap(), "2024-06");
    assert_eq!(format_date(ts, DateFormat::YearMonthSlash).unwrap(), "2024/06");
    assert_eq!(format_date(ts, DateFormat::DateSlash).unwrap(), "2024/06/17");
    assert!(format_date("", DateFormat::Date).is_err());
}

#[test]
fn date_format_displays_its_pattern() {
    assert_eq!(DateFormat::default().to_string(), "YYYY-MM-DD");
    assert_eq!(DateFormat::Compact.to_string(), "YYYYMMDD");
}

#[test]
fn colliding_folder_names_get_the_gist_id_appended() {
    let gists = vec![
        gist("aaa", "2024-06-17T09:30:09Z", &["solution.py"]),
        gist("bbb", "2024-06-17T18:00:00Z", &["solution.py"]),
        gist("", "2024-06-17T19:00:00Z", &["solution.py"]),
        gist("ccc", "2024-06-18T09:00:00Z", &["solution.py"]),
    ];

    let names = assign_folder_names(&gists).unwrap();

    assert_eq!(
        names,
        vec![
            "20240617-solution-gist".to_string(),
            "20240617-solution-gist-bbb".to_string(),
            "20240617-solution-gist-3".to_string(),
            "20240618-solution-gist".to_string(),
        ]
    );
}

#[test]
fn collision_suffix_from_gist_id_is_a_single_path_component() {
    let gists = vec![
        gist("aaa", "2024-06-17T09:30:09Z", &["solution.py"]),
        gist("/../../../escaped", "2024-06-17T18:00:00Z", &["solution.py"]),
        gist("x\\y.z", "2024-06-17T19:00:00Z", &["solution.py"]),
    ];

    let names = assign_folder_names(&gists).unwrap();

    assert_eq!(names[1], "20240617-solution-gist-__________escaped");
    assert_eq!(names[2], "20240617-solution-gist-x_y_z");
    for name in &names {
        assert!(!name.contains(['/', '\\', '.']), "unsafe folder name {name:?}");
    }
}
