use chrono::NaiveDate;
use rating_csv::{export, ratings_to_csv, ExportConfig, HeaderStyle, RatingError, RatingType};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use zip::write::SimpleFileOptions;

const NAMESPACE: &str = "http://xbrl.sec.gov/ratings/2015-03-31";

fn obligor_document() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rt:ROCRA xmlns:rt="{}">
  <rt:RAN>ACME Ratings</rt:RAN>
  <rt:FCD>2023-01-01</rt:FCD>
  <rt:OD>
    <rt:OSC>FIN</rt:OSC>
    <rt:OBNAME>Example Bank</rt:OBNAME>
    <rt:LEI>5493001KJTIIGC8Y1R12</rt:LEI>
    <rt:ORD>
      <rt:IP>true</rt:IP>
      <rt:R>BBB</rt:R>
      <rt:RAD>2022-06-01</rt:RAD>
      <rt:RT>Long Term</rt:RT>
    </rt:ORD>
    <rt:ORD>
      <rt:IP>true</rt:IP>
      <rt:R>A</rt:R>
      <rt:RAD>2023-06-01</rt:RAD>
      <rt:RT>Long Term</rt:RT>
    </rt:ORD>
  </rt:OD>
</rt:ROCRA>"#,
        NAMESPACE
    )
}

fn issuer_document() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rt:ROCRA xmlns:rt="{}">
  <rt:RAN>ACME Ratings</rt:RAN>
  <rt:FCD>2023-01-01</rt:FCD>
  <rt:ISD>
    <rt:SSC>Corporate</rt:SSC>
    <rt:ISSNAME>Example Issuer</rt:ISSNAME>
    <rt:IND>
      <rt:INSTNAME>Senior Notes 2030</rt:INSTNAME>
      <rt:CUSIP>123456AB7</rt:CUSIP>
      <rt:IRD><rt:R>BB</rt:R><rt:RAD>2020-01-15</rt:RAD><rt:RT>Long Term</rt:RT></rt:IRD>
      <rt:IRD><rt:R>BB+</rt:R><rt:RAD>2021-03-01</rt:RAD><rt:RT>Long Term</rt:RT></rt:IRD>
    </rt:IND>
    <rt:IND>
      <rt:INSTNAME>Commercial Paper</rt:INSTNAME>
      <rt:IRD><rt:R>B-1</rt:R><rt:RAD>2019-05-05</rt:RAD><rt:RT>Short Term</rt:RT></rt:IRD>
    </rt:IND>
  </rt:ISD>
</rt:ROCRA>"#,
        NAMESPACE
    )
}

fn write_archive(dir: &TempDir, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.path().join("ratings.zip");
    let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
    path
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn column(headers: &[String], name: &str) -> usize {
    headers.iter().position(|h| h == name).unwrap()
}

fn date(s: &str) -> Option<NaiveDate> {
    Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
}

#[test]
fn test_obligor_export_all_ratings() {
    let dir = tempdir().unwrap();
    let doc = obligor_document();
    let zip_path = write_archive(&dir, &[("acme-obligor.xml", doc.as_bytes())]);
    let csv_path = dir.path().join("out.csv");

    let summary = ratings_to_csv(&zip_path, &csv_path, RatingType::Obligor, None).unwrap();
    assert_eq!(summary.rows, 2);

    let (headers, rows) = read_csv(&csv_path);
    assert_eq!(headers.len(), 20);
    assert_eq!(&headers[..3], &["RAN", "FCD", "OSC"]);
    assert_eq!(rows.len(), 2);

    let r = column(&headers, "R");
    let ran = column(&headers, "RAN");
    let fcd = column(&headers, "FCD");
    let name = column(&headers, "OBNAME");
    assert_eq!(rows[0][r], "BBB");
    assert_eq!(rows[1][r], "A");
    for row in &rows {
        assert_eq!(row[ran], "ACME Ratings");
        assert_eq!(row[fcd], "2023-01-01");
        assert_eq!(row[name], "Example Bank");
        assert_eq!(row[column(&headers, "CIK")], "");
    }
}

#[test]
fn test_obligor_export_asof() {
    let dir = tempdir().unwrap();
    let doc = obligor_document();
    let zip_path = write_archive(&dir, &[("acme-obligor.xml", doc.as_bytes())]);
    let csv_path = dir.path().join("out.csv");

    ratings_to_csv(&zip_path, &csv_path, RatingType::Obligor, date("2022-12-31")).unwrap();

    let (headers, rows) = read_csv(&csv_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][column(&headers, "R")], "BBB");
    assert_eq!(rows[0][column(&headers, "RAD")], "2022-06-01");
}

#[test]
fn test_asof_before_any_rating_writes_header_only() {
    let dir = tempdir().unwrap();
    let doc = obligor_document();
    let zip_path = write_archive(&dir, &[("acme-obligor.xml", doc.as_bytes())]);
    let csv_path = dir.path().join("out.csv");

    let summary =
        ratings_to_csv(&zip_path, &csv_path, RatingType::Obligor, date("2000-01-01")).unwrap();
    assert_eq!(summary.documents, 1);
    assert_eq!(summary.rows, 0);
    assert_eq!(read_csv(&csv_path).1.len(), 0);
}

#[test]
fn test_issuer_export() {
    let dir = tempdir().unwrap();
    let issuer = issuer_document();
    let obligor = obligor_document();
    let zip_path = write_archive(
        &dir,
        &[
            ("issuer.xml", issuer.as_bytes()),
            ("obligor.xml", obligor.as_bytes()),
        ],
    );
    let csv_path = dir.path().join("out.csv");

    let summary = ratings_to_csv(&zip_path, &csv_path, RatingType::Issuer, None).unwrap();
    assert_eq!(summary.documents, 2);
    assert_eq!(summary.rows, 3);

    let (headers, rows) = read_csv(&csv_path);
    assert_eq!(headers.len(), 30);
    let inst = column(&headers, "INSTNAME");
    let issuer_name = column(&headers, "ISSNAME");
    let cusip = column(&headers, "CUSIP");
    let rows: Vec<_> = rows
        .iter()
        .map(|row| {
            (
                row[issuer_name].as_str(),
                row[inst].as_str(),
                row[cusip].as_str(),
                row[column(&headers, "R")].as_str(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Example Issuer", "Senior Notes 2030", "123456AB7", "BB"),
            ("Example Issuer", "Senior Notes 2030", "123456AB7", "BB+"),
            ("Example Issuer", "Commercial Paper", "", "B-1"),
        ]
    );
}

#[test]
fn test_issuer_export_asof_filters_each_instrument() {
    let dir = tempdir().unwrap();
    let issuer = issuer_document();
    let zip_path = write_archive(&dir, &[("issuer.xml", issuer.as_bytes())]);
    let csv_path = dir.path().join("out.csv");

    ratings_to_csv(&zip_path, &csv_path, RatingType::Issuer, date("2021-12-31")).unwrap();

    let (headers, rows) = read_csv(&csv_path);
    let r = column(&headers, "R");
    let ratings: Vec<_> = rows.iter().map(|row| row[r].as_str()).collect();
    assert_eq!(ratings, vec!["BB+", "B-1"]);
}

#[test]
fn test_empty_archive_writes_header() {
    let dir = tempdir().unwrap();
    let zip_path = write_archive(&dir, &[]);
    let csv_path = dir.path().join("out.csv");

    let summary = ratings_to_csv(&zip_path, &csv_path, RatingType::Issuer, None).unwrap();
    assert_eq!(summary.entries, 0);

    let (headers, rows) = read_csv(&csv_path);
    assert_eq!(headers.len(), 30);
    assert_eq!(headers.last().map(String::as_str), Some("RTT"));
    assert!(rows.is_empty());
}

#[test]
fn test_non_xml_entries_are_ignored() {
    let dir = tempdir().unwrap();
    let doc = obligor_document();
    let zip_path = write_archive(
        &dir,
        &[
            ("readme.txt", &b"\xFF\xFE not a document"[..]),
            // Would add two more rows if it were read.
            ("copy.xml.bak", doc.as_bytes()),
            ("acme-obligor.xml", doc.as_bytes()),
        ],
    );
    let csv_path = dir.path().join("out.csv");

    let summary = ratings_to_csv(&zip_path, &csv_path, RatingType::Obligor, None).unwrap();
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.documents, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.rows, 2);
}

#[test]
fn test_declared_latin1_entry_is_decoded() {
    let dir = tempdir().unwrap();
    let doc = obligor_document()
        .replace(r#"encoding="UTF-8""#, r#"encoding="ISO-8859-1""#)
        .replace("Example Bank", "Soci\u{e9}t\u{e9} G\u{e9}n\u{e9}rale");
    let latin1: Vec<u8> = doc.chars().map(|c| c as u8).collect();
    assert!(latin1.contains(&0xE9));
    let zip_path = write_archive(&dir, &[("latin1-obligor.xml", latin1.as_slice())]);
    let csv_path = dir.path().join("out.csv");

    let summary = ratings_to_csv(&zip_path, &csv_path, RatingType::Obligor, None).unwrap();
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.rows, 2);

    let (headers, rows) = read_csv(&csv_path);
    let name = column(&headers, "OBNAME");
    assert!(rows.iter().all(|row| row[name] == "Soci\u{e9}t\u{e9} G\u{e9}n\u{e9}rale"));
}

#[test]
fn test_undecodable_entries_are_skipped() {
    let dir = tempdir().unwrap();
    let doc = obligor_document();
    let mut bad = doc.clone().into_bytes();
    bad.extend_from_slice(b"<!-- \xC3\x28 -->");
    let zip_path = write_archive(
        &dir,
        &[
            ("bad-encoding.xml", bad.as_slice()),
            ("malformed.xml", &b"<rt:ROCRA><unclosed>"[..]),
            ("acme-obligor.xml", doc.as_bytes()),
        ],
    );
    let csv_path = dir.path().join("out.csv");

    let summary = ratings_to_csv(&zip_path, &csv_path, RatingType::Obligor, None).unwrap();
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.documents, 1);
    assert_eq!(read_csv(&csv_path).1.len(), 2);
}

#[test]
fn test_missing_rating_date_aborts_asof_export() {
    let dir = tempdir().unwrap();
    let doc = obligor_document().replace("<rt:RAD>2023-06-01</rt:RAD>", "");
    let zip_path = write_archive(&dir, &[("acme-obligor.xml", doc.as_bytes())]);
    let csv_path = dir.path().join("out.csv");

    let err = ratings_to_csv(&zip_path, &csv_path, RatingType::Obligor, date("2023-12-31"))
        .unwrap_err();
    assert!(matches!(err, RatingError::MissingRequiredField("RAD")));
}

#[test]
fn test_long_names_and_nested_output_dir() {
    let dir = tempdir().unwrap();
    let doc = obligor_document();
    let zip_path = write_archive(&dir, &[("acme-obligor.xml", doc.as_bytes())]);
    let csv_path = dir.path().join("exports/2023/obligor.csv");

    let config = ExportConfig::new(&zip_path, &csv_path, RatingType::Obligor)
        .with_header_style(HeaderStyle::Long);
    export(&config).unwrap();

    let (headers, rows) = read_csv(&csv_path);
    assert_eq!(headers[0], "rating_agency_name");
    assert_eq!(headers[19], "rating_type_term");
    assert_eq!(rows[0][column(&headers, "obligor_name")], "Example Bank");
}

#[test]
fn test_missing_archive_is_an_error() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("out.csv");
    let result = ratings_to_csv(dir.path().join("nope.zip"), &csv_path, RatingType::Obligor, None);
    assert!(matches!(result, Err(RatingError::Io(_))));
    assert!(!csv_path.exists());
}
