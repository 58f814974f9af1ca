//! Sales report export to CSV and XLSX.

use bazaar_core::report::{Cell, ExportFormat, ReportTable};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

const SHEET_NAME: &str = "Sales Report";
const MONEY_FORMAT: &str = "#,##0.00";

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer failed: {0}")]
    CsvBuffer(String),

    #[error("XLSX write failed: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("report is too large for a worksheet")]
    TooLarge,
}

/// Write `table` in `format`.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write(table: &ReportTable, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(table),
        ExportFormat::Xlsx => to_xlsx(table),
    }
}

/// Header line, then one line per row. Money cells carry two decimals.
///
/// # Errors
///
/// Returns an error if a record can't be written.
pub fn to_csv(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::to_text))?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::CsvBuffer(e.to_string()))
}

/// Single worksheet with a bold header and bold totals row. Numbers stay
/// numeric so the sheet can be re-summed.
///
/// # Errors
///
/// Returns an error if the workbook can't be built.
pub fn to_xlsx(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format(MONEY_FORMAT);
    let bold_money = Format::new().set_bold().set_num_format(MONEY_FORMAT);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(0, column(col)?, *header, &bold)?;
    }

    let last = table.rows.len().saturating_sub(1);
    for (i, row) in table.rows.iter().enumerate() {
        let r = u32::try_from(i + 1).map_err(|_| ExportError::TooLarge)?;
        let is_total = i == last;
        for (col, cell) in row.iter().enumerate() {
            let (text_format, number_format) = if is_total {
                (&bold, &bold_money)
            } else {
                (&Format::new(), &money)
            };
            write_cell(sheet, r, column(col)?, cell, text_format, number_format)?;
        }
    }

    sheet.autofit();
    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    text_format: &Format,
    money_format: &Format,
) -> Result<(), ExportError> {
    match cell {
        Cell::Text(text) => {
            sheet.write_string_with_format(row, col, text, text_format)?;
        }
        Cell::Integer(n) => {
            // i64 quantities far exceed f64 precision only past 2^53
            #[allow(clippy::cast_precision_loss)]
            sheet.write_number_with_format(row, col, *n as f64, text_format)?;
        }
        Cell::Money(amount) => {
            let value = amount.to_f64().unwrap_or_default();
            sheet.write_number_with_format(row, col, value, money_format)?;
        }
        Cell::Empty => {}
    }
    Ok(())
}

fn column(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::TooLarge)
}
