use super::{ExportError, COLUMN_HEADERS};
use crate::models::expense::Expense;
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};

const SHEET_NAME: &str = "Gastos";
const COLUMN_WIDTHS: [f64; 5] = [12.0, 28.0, 14.0, 22.0, 40.0];

/// Renders expenses as an `.xlsx` workbook with a single "Gastos" sheet.
/// Amounts and dates are native cells so the sheet can sum and sort them.
pub fn render(expenses: &[Expense]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format("#,##0.00");
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, (title, width)) in COLUMN_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, *title, &header_format)?;
            worksheet.set_column_width(col, width)?;
        }

        for (index, expense) in expenses.iter().enumerate() {
            let row = index as u32 + 1;
            let date = excel_date(expense.expense_date)?;
            worksheet.write_date_with_format(row, 0, &date, &date_format)?;
            worksheet.write_string(row, 1, &expense.category)?;
            worksheet.write_number_with_format(row, 2, expense.amount, &money_format)?;
            worksheet.write_string(row, 3, &expense.approver)?;
            worksheet.write_string(row, 4, expense.description_display())?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime, XlsxError> {
    ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)
}
