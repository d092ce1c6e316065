use super::config;
use crate::normalize::{normalize_row, normalize_rows};
use crate::portrait::RawPortraitRow;
use crate::*;

#[test]
fn parse_year_prefers_a_four_digit_token() {
    assert_eq!(parse_year("1823"), Some(1823));
    assert_eq!(parse_year("c. 1790-1795"), Some(1790));
    assert_eq!(parse_year("painted 1780s, signed 1791"), Some(1791));
    assert_eq!(parse_year("2001"), Some(2001));
}

#[test]
fn parse_year_ignores_tokens_outside_16xx_to_20xx() {
    assert_eq!(parse_year("1590"), None);
    assert_eq!(parse_year("2100"), None);
    assert_eq!(parse_year("17901"), None);
}

#[test]
fn parse_year_word_boundaries_are_ascii() {
    assert_eq!(parse_year("1790年"), Some(1790));
    assert_eq!(parse_year("1790é"), Some(1790));
    assert_eq!(parse_year("é1780s"), Some(1785));
    assert_eq!(parse_year("c.1801ß"), Some(1801));
    // Non-ASCII digits are not digits here.
    assert_eq!(parse_year("١٧٩٠"), None);
    assert_eq!(parse_year("x1790"), None);
}

#[test]
fn parse_year_reads_decades_as_start_plus_five() {
    assert_eq!(parse_year("1780s"), Some(1785));
    assert_eq!(parse_year("about the 1790s"), Some(1795));
    assert_eq!(parse_year("1780 s"), Some(1780));
}

#[test]
fn parse_year_fixed_century_phrases() {
    assert_eq!(parse_year("early 19th century"), Some(1805));
    assert_eq!(parse_year("late 18th century"), Some(1785));
    // Phrase matching is case-sensitive.
    assert_eq!(parse_year("Early 19th Century"), None);
    assert_eq!(parse_year("mid 18th century"), None);
    assert_eq!(parse_year(""), None);
    assert_eq!(parse_year("undated"), None);
}

#[test]
fn parse_year_is_deterministic() {
    for input in ["1780s", "early 19th century", "ca. 1801", "n.d."] {
        assert_eq!(parse_year(input), parse_year(input), "{input}");
    }
}

#[test]
fn normalize_row_applies_defaults() {
    let record = normalize_row(RawPortraitRow {
        date: "1795".to_string(),
        sitter_gender: "  F ".to_string(),
        thumbnail: "https://example.org/a.jpg".to_string(),
        ..Default::default()
    });
    assert_eq!(record.year, Some(1795));
    assert_eq!(record.size, "Unknown");
    assert_eq!(record.gender, Gender::Female);
    assert_eq!(record.thumbnail_low_res_url, "https://example.org/a.jpg");
    assert_eq!(record.title, "");
}

#[test]
fn normalize_rows_drops_unusable_years() {
    let rows = ["1780s", "early 19th century", "1823", "unknown", "1770", "1815", "1769"]
        .into_iter()
        .map(|date| RawPortraitRow {
            date: date.to_string(),
            ..Default::default()
        });
    let years: Vec<_> = normalize_rows(rows, &config())
        .into_iter()
        .filter_map(|r| r.year)
        .collect();
    assert_eq!(years, [1785, 1805, 1770, 1815]);
}

#[test]
fn csv_reader_maps_dataset_columns() {
    let csv = "\
date,title,artist,sitter,size,sitter gender,thumbnail,thumbnail-low-res,extra
1795,Lansdowne,Gilbert Stuart,George Washington,Regular,Male,https://x/hi.jpg,https://x/lo.jpg,ignored
late 18th century,Lady,,,miniature,female,,,
1900,Too late,,,,,,,
";
    let records = load_portraits_from_reader(csv.as_bytes(), &config()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].artist, "Gilbert Stuart");
    assert_eq!(records[0].gender, Gender::Male);
    assert_eq!(records[0].thumbnail_low_res_url, "https://x/lo.jpg");
    assert_eq!(records[1].year, Some(1785));
    assert_eq!(records[1].gender, Gender::Female);
    assert!(records[1].is_miniature());
}

#[test]
fn csv_reader_tolerates_missing_columns() {
    let csv = "date,title\n1801,Only a title\n";
    let records = load_portraits_from_reader(csv.as_bytes(), &config()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].size, "Unknown");
    assert_eq!(records[0].gender, Gender::Unknown);
}

#[test]
fn missing_file_is_a_data_load_error() {
    let err = load_portraits_sync("/definitely/not/here.csv", &config()).unwrap_err();
    assert!(matches!(err, Error::DataLoad { .. }), "{err}");
    assert!(err.to_string().contains("/definitely/not/here.csv"));
}

#[test]
fn async_load_matches_sync_load() {
    let err = futures::executor::block_on(load_portraits("/definitely/not/here.csv", &config()))
        .unwrap_err();
    assert!(matches!(err, Error::DataLoad { .. }));
}
