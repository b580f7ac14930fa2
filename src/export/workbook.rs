//! Workbook output: Detail, Summary and Pivot sheets in one xlsx file.
//!
//! Hours, rates and money are written as numeric cells rounded to two
//! decimals, with a number format carrying the currency symbol, so the
//! sheets stay usable for further arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::error::EngineResult;
use crate::models::{CalculatedEntry, EmployeeSummary, ExportViews, PivotTable};

use super::FormatOptions;
use super::delimited::DETAIL_HEADER;
use super::display;

/// Summary sheet headers, in column order.
pub const SUMMARY_HEADER: &[&str] = &[
    "Employee",
    "Email",
    "Entries",
    "Gross Hours",
    "Break Deduction (hrs)",
    "Net Hours",
    "Total Pay",
];

struct SheetFormats {
    header: Format,
    hours: Format,
    money: Format,
    total_label: Format,
    total_hours: Format,
}

impl SheetFormats {
    fn new(currency_symbol: &str) -> Self {
        let hours = Format::new().set_num_format("0.00").set_align(FormatAlign::Right);
        let money = Format::new()
            .set_num_format(format!("\"{currency_symbol}\"#,##0.00"))
            .set_align(FormatAlign::Right);
        Self {
            header: Format::new().set_bold(),
            total_label: Format::new().set_bold(),
            total_hours: hours.clone().set_bold(),
            hours,
            money,
        }
    }
}

/// Writes the three-sheet workbook. Sheets of an empty export carry their
/// header rows only.
pub fn write_workbook(views: &ExportViews, options: &FormatOptions) -> EngineResult<Vec<u8>> {
    let formats = SheetFormats::new(&options.currency_symbol);
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Detail")?;
    write_detail_sheet(sheet, &views.detail, &formats)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;
    write_summary_sheet(sheet, &views.summary, &formats)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Pivot")?;
    write_pivot_sheet(sheet, &views.pivot, &formats)?;

    Ok(workbook.save_to_buffer()?)
}

fn number(value: Decimal) -> f64 {
    display::round2(value).to_f64().unwrap_or_default()
}

fn write_header(sheet: &mut Worksheet, header: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in (0u16..).zip(header) {
        sheet.write_string_with_format(0, col, *title, format)?;
    }
    Ok(())
}

fn write_detail_sheet(
    sheet: &mut Worksheet,
    detail: &[CalculatedEntry],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    write_header(sheet, DETAIL_HEADER, &formats.header)?;

    for (row, entry) in (1u32..).zip(detail) {
        sheet.write_string(row, 0, display::date(entry.date))?;
        sheet.write_string(row, 1, &entry.employee_name)?;
        sheet.write_string(row, 2, &entry.employee_email)?;
        sheet.write_string(row, 3, entry.location_name.as_deref().unwrap_or_default())?;
        sheet.write_string(row, 4, &entry.category_name)?;
        sheet.write_string(row, 5, &entry.pay_period)?;
        sheet.write_string(row, 6, display::time(entry.clock_in))?;
        sheet.write_string(row, 7, display::time(entry.clock_out))?;
        sheet.write_number(row, 8, entry.break_minutes)?;
        sheet.write_number_with_format(row, 9, number(entry.gross_hours), &formats.hours)?;
        sheet.write_number_with_format(row, 10, number(entry.net_hours), &formats.hours)?;
        sheet.write_number_with_format(row, 11, number(entry.effective_rate), &formats.money)?;
        sheet.write_number_with_format(row, 12, number(entry.total_pay), &formats.money)?;
    }

    sheet.set_column_width(1, 22)?;
    sheet.set_column_width(2, 28)?;
    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    summary: &[EmployeeSummary],
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    write_header(sheet, SUMMARY_HEADER, &formats.header)?;

    for (row, employee) in (1u32..).zip(summary) {
        sheet.write_string(row, 0, &employee.employee_name)?;
        sheet.write_string(row, 1, &employee.employee_email)?;
        sheet.write_number(row, 2, employee.entry_count as f64)?;
        sheet.write_number_with_format(row, 3, number(employee.gross_hours), &formats.hours)?;
        sheet.write_number_with_format(
            row,
            4,
            number(employee.break_deduction_hours),
            &formats.hours,
        )?;
        sheet.write_number_with_format(row, 5, number(employee.total_net_hours), &formats.hours)?;
        sheet.write_number_with_format(row, 6, number(employee.total_pay), &formats.money)?;
    }

    sheet.set_column_width(0, 22)?;
    sheet.set_column_width(1, 28)?;
    Ok(())
}

fn write_pivot_sheet(
    sheet: &mut Worksheet,
    pivot: &PivotTable,
    formats: &SheetFormats,
) -> Result<(), XlsxError> {
    let header: Vec<&str> = std::iter::once("Employee")
        .chain(pivot.columns.iter().map(|column| column.header()))
        .chain(std::iter::once("Total"))
        .collect();
    write_header(sheet, &header, &formats.header)?;
    let total_col = (pivot.columns.len() + 1) as u16;

    for (row, pivot_row) in (1u32..).zip(&pivot.rows) {
        sheet.write_string(row, 0, &pivot_row.employee_name)?;
        for (col, cell) in (1u16..).zip(&pivot_row.cells) {
            if !cell.is_zero() {
                sheet.write_number_with_format(row, col, number(*cell), &formats.hours)?;
            }
        }
        sheet.write_number_with_format(row, total_col, number(pivot_row.total), &formats.hours)?;
    }

    if !pivot.rows.is_empty() {
        let row = (pivot.rows.len() + 1) as u32;
        sheet.write_string_with_format(row, 0, "TOTAL", &formats.total_label)?;
        for (col, cell) in (1u16..).zip(&pivot.column_totals) {
            if !cell.is_zero() {
                sheet.write_number_with_format(row, col, number(*cell), &formats.total_hours)?;
            }
        }
        sheet.write_number_with_format(
            row,
            total_col,
            number(pivot.grand_total),
            &formats.total_hours,
        )?;
    }

    sheet.set_column_width(0, 22)?;
    Ok(())
}
