use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use nycrental_core::WorkItem;

use crate::error::SourceError;

use super::search_url;

pub(super) const BOROUGH_COLUMN: &str = "Borough";
pub(super) const ADDRESS_COLUMN: &str = "Combined Address";

/// Header rows are searched within this many leading rows.
const HEADER_SCAN_ROWS: usize = 20;

/// Parses a downloaded workbook (XLS or XLSX) and returns one work item per
/// address row whose borough is in `boroughs`.
///
/// # Errors
///
/// Returns [`SourceError::Spreadsheet`] if the bytes are not a readable
/// workbook, [`SourceError::NoWorksheet`] if it has no sheets, and
/// [`SourceError::MissingColumn`] if the header row cannot be located.
pub fn work_items_from_workbook(
    bytes: &[u8],
    boroughs: &[String],
    search_base_url: &str,
) -> Result<Vec<WorkItem>, SourceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SourceError::NoWorksheet)??;
    work_items_from_range(&range, boroughs, search_base_url)
}

pub(super) fn work_items_from_range(
    range: &Range<Data>,
    boroughs: &[String],
    search_base_url: &str,
) -> Result<Vec<WorkItem>, SourceError> {
    let header = find_header(range)?;
    let wanted: Vec<String> = boroughs
        .iter()
        .map(|b| b.trim().to_ascii_uppercase())
        .collect();

    let mut items = Vec::new();
    for row in range.rows().skip(header.row + 1) {
        let borough = cell_text(row, header.borough).to_ascii_uppercase();
        if !wanted.iter().any(|w| *w == borough) {
            continue;
        }
        let address = cell_text(row, header.address);
        if address.is_empty() {
            continue;
        }
        let url = search_url(search_base_url, &address)?;
        items.push(WorkItem::new(address, url));
    }
    Ok(items)
}

struct HeaderRow {
    row: usize,
    borough: usize,
    address: usize,
}

fn find_header(range: &Range<Data>) -> Result<HeaderRow, SourceError> {
    let mut saw_borough = false;
    for (row_idx, row) in range.rows().take(HEADER_SCAN_ROWS).enumerate() {
        let column = |name: &str| row.iter().position(|c| c.to_string().trim() == name);
        let borough = column(BOROUGH_COLUMN);
        saw_borough |= borough.is_some();
        if let (Some(borough), Some(address)) = (borough, column(ADDRESS_COLUMN)) {
            return Ok(HeaderRow {
                row: row_idx,
                borough,
                address,
            });
        }
    }
    let column = if saw_borough {
        ADDRESS_COLUMN
    } else {
        BOROUGH_COLUMN
    };
    Err(SourceError::MissingColumn {
        column: column.to_owned(),
    })
}

fn cell_text(row: &[Data], idx: usize) -> String {
    row.get(idx)
        .map(|c| c.to_string().trim().to_owned())
        .unwrap_or_default()
}
