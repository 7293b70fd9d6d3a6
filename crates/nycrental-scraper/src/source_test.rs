use calamine::{Data, Range};

use super::sheet::{work_items_from_range, ADDRESS_COLUMN, BOROUGH_COLUMN};
use super::*;

const SEARCH_BASE: &str = "https://streeteasy.com/search";

fn boroughs(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

/// Builds a sheet with a few title rows above the header, as the published
/// list has.
fn sheet(rows: &[(&str, &str)]) -> Range<Data> {
    let last_row = u32::try_from(rows.len() + 3).unwrap();
    let mut range = Range::new((0, 0), (last_row, 2));
    range.set_value((0, 0), Data::String("Class B Multiple Dwellings".to_owned()));
    range.set_value((1, 0), Data::String("As of 2024".to_owned()));
    range.set_value((3, 0), Data::String("BIN".to_owned()));
    range.set_value((3, 1), Data::String(BOROUGH_COLUMN.to_owned()));
    range.set_value((3, 2), Data::String(ADDRESS_COLUMN.to_owned()));
    for (i, (borough, address)) in rows.iter().enumerate() {
        let r = u32::try_from(i + 4).unwrap();
        range.set_value((r, 0), Data::Float(1_000_000.0 + f64::from(r)));
        range.set_value((r, 1), Data::String((*borough).to_owned()));
        range.set_value((r, 2), Data::String((*address).to_owned()));
    }
    range
}

#[test]
fn search_url_encodes_address_and_check_mark() {
    let url = search_url(SEARCH_BASE, "123 Main St, Apt #4").unwrap();
    assert_eq!(
        url,
        "https://streeteasy.com/search?utf8=%E2%9C%93&search=123+Main+St%2C+Apt+%234&commit="
    );
}

#[test]
fn search_url_rejects_unparseable_base() {
    let err = search_url("not a base", "1 Main St").unwrap_err();
    assert!(matches!(err, SourceError::InvalidUrl { .. }), "got {err:?}");
}

#[test]
fn finds_relative_xls_link_and_prefixes_base() {
    let html = r#"
        <html><body>
          <p>Other download <a href="/other.pdf">PDF</a></p>
          <p><a href="/assets/hpd/downloads/misc/ClassB.xls">Class B Multiple Dwellings List (XLS)</a></p>
        </body></html>"#;
    let url = find_xls_link(html, "https://www.nyc.gov/page", "https://www.nyc.gov").unwrap();
    assert_eq!(url, "https://www.nyc.gov/assets/hpd/downloads/misc/ClassB.xls");
}

#[test]
fn absolute_xls_link_is_kept() {
    let html = r#"<p>Class B Multiple Dwellings List (XLS) <a href="https://cdn.example.org/b.xls">here</a></p>"#;
    let url = find_xls_link(html, "https://www.nyc.gov/page", "https://www.nyc.gov/").unwrap();
    assert_eq!(url, "https://cdn.example.org/b.xls");
}

#[test]
fn missing_paragraph_is_an_error() {
    let err = find_xls_link("<p>nothing here</p>", "https://x.test/", "https://x.test")
        .unwrap_err();
    assert!(matches!(err, SourceError::MissingLink { .. }), "got {err:?}");
}

#[test]
fn paragraph_without_anchor_is_an_error() {
    let html = "<p>Class B Multiple Dwellings List (XLS) coming soon</p>";
    let err = find_xls_link(html, "https://x.test/", "https://x.test").unwrap_err();
    assert!(matches!(err, SourceError::MissingLink { .. }), "got {err:?}");
}

#[test]
fn rows_are_filtered_by_borough_in_sheet_order() {
    let range = sheet(&[
        ("MANHATTAN", "10 W 45TH ST"),
        ("BROOKLYN", "5 ATLANTIC AVE"),
        ("MANHATTAN", "200 E 10TH ST"),
        ("QUEENS", "1 QUEENS BLVD"),
    ]);
    let items = work_items_from_range(&range, &boroughs(&["MANHATTAN"]), SEARCH_BASE).unwrap();

    let addresses: Vec<&str> = items.iter().map(|i| i.address.as_str()).collect();
    assert_eq!(addresses, ["10 W 45TH ST", "200 E 10TH ST"]);
    assert!(items[0].search_url.contains("search=10+W+45TH+ST"));
}

#[test]
fn borough_match_ignores_case_and_padding() {
    let range = sheet(&[(" Brooklyn ", "5 ATLANTIC AVE"), ("MANHATTAN", "1 BROADWAY")]);
    let items =
        work_items_from_range(&range, &boroughs(&["brooklyn", "Manhattan"]), SEARCH_BASE).unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn blank_addresses_are_skipped() {
    let range = sheet(&[("MANHATTAN", "   "), ("MANHATTAN", "1 BROADWAY")]);
    let items = work_items_from_range(&range, &boroughs(&["MANHATTAN"]), SEARCH_BASE).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].address, "1 BROADWAY");
}

#[test]
fn missing_address_column_is_reported() {
    let mut range: Range<Data> = Range::new((0, 0), (2, 1));
    range.set_value((0, 0), Data::String(BOROUGH_COLUMN.to_owned()));
    range.set_value((0, 1), Data::String("Address".to_owned()));
    let err = work_items_from_range(&range, &boroughs(&["MANHATTAN"]), SEARCH_BASE).unwrap_err();
    assert!(
        matches!(&err, SourceError::MissingColumn { column } if column == ADDRESS_COLUMN),
        "got {err:?}"
    );
}

#[test]
fn non_workbook_bytes_are_a_spreadsheet_error() {
    let err = work_items_from_workbook(b"<html>not a spreadsheet</html>", &[], SEARCH_BASE)
        .unwrap_err();
    assert!(matches!(err, SourceError::Spreadsheet(_)), "got {err:?}");
}
