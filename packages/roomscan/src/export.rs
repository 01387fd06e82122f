//! Spreadsheet export of aggregated product rows.

use rust_xlsxwriter::{Format, Workbook};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::traits::RowExporter;
use crate::types::ProductRow;

const HEADERS: [&str; 4] = ["Item Name", "Price", "Website", "Product Link"];

/// Writes rows as a single flat `.xlsx` sheet, sorted by price.
///
/// Sort policy: rows whose price coerces to a number come first, ascending;
/// rows with non-numeric prices keep their original relative order and go
/// to the end. A bad price value never aborts the export.
pub struct XlsxExporter {
    output_path: PathBuf,
}

impl XlsxExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl RowExporter for XlsxExporter {
    fn export(&self, rows: &[ProductRow]) -> Result<PathBuf> {
        if rows.is_empty() {
            return Err(PipelineError::NoData);
        }

        let sorted = sorted_by_price(rows);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }

        for (i, row) in sorted.iter().enumerate() {
            let r = (i + 1) as u32;
            worksheet.write_string(r, 0, &row.item_name)?;
            match coerce_price(&row.price) {
                Some(value) => worksheet.write_number(r, 1, value)?,
                None => worksheet.write_string(r, 1, &row.price)?,
            };
            worksheet.write_string(r, 2, &row.website)?;
            worksheet.write_string(r, 3, &row.product_link)?;
        }

        workbook.save(&self.output_path)?;
        info!(path = %self.output_path.display(), rows = rows.len(), "report written");
        Ok(self.output_path.clone())
    }
}

/// Best-effort numeric coercion of a price string.
///
/// Tolerates currency symbols and thousands separators; anything that
/// still fails to parse is treated as non-numeric rather than an error.
pub(crate) fn coerce_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Stable sort: numeric prices ascending first, non-numeric rows after in
/// their original order.
pub(crate) fn sorted_by_price(rows: &[ProductRow]) -> Vec<&ProductRow> {
    let mut keyed: Vec<(Option<f64>, &ProductRow)> =
        rows.iter().map(|r| (coerce_price(&r.price), r)).collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(name: &str, price: &str) -> ProductRow {
        ProductRow::new(name, price, "shop.example", "https://shop.example/p")
    }

    #[test]
    fn coerces_plain_and_decorated_prices() {
        assert_eq!(coerce_price("25.00"), Some(25.0));
        assert_eq!(coerce_price("$49.99"), Some(49.99));
        assert_eq!(coerce_price("1,299.00"), Some(1299.0));
        assert_eq!(coerce_price("N/A"), None);
        assert_eq!(coerce_price(""), None);
    }

    #[test]
    fn numeric_rows_sort_ascending_before_non_numeric() {
        let rows = vec![
            row("lamp", "N/A"),
            row("chair", "49.99"),
            row("unknown", "call us"),
            row("stool", "25.00"),
        ];

        let sorted = sorted_by_price(&rows);
        let names: Vec<&str> = sorted.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, ["stool", "chair", "lamp", "unknown"]);
    }

    #[test]
    fn non_numeric_rows_keep_relative_order() {
        let rows = vec![row("a", "first bad"), row("b", "second bad"), row("c", "1.0")];
        let sorted = sorted_by_price(&rows);
        let names: Vec<&str> = sorted.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn empty_rows_fail_with_no_data_and_write_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let exporter = XlsxExporter::new(&path);

        let err = exporter.export(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::NoData));
        assert!(!path.exists());
    }

    #[test]
    fn export_writes_a_file_for_mixed_prices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let exporter = XlsxExporter::new(&path);

        let rows = vec![row("lamp", "N/A"), row("stool", "25.00")];
        let written = exporter.export(&rows).unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
    }
}
