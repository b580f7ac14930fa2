//! Delimited text output: the detail table as CSV.

use csv::{QuoteStyle, WriterBuilder};

use crate::error::{EngineError, EngineResult};
use crate::models::CalculatedEntry;

use super::FormatOptions;
use super::display;

/// Detail table headers, in column order.
pub const DETAIL_HEADER: &[&str] = &[
    "Date",
    "Employee",
    "Email",
    "Location",
    "Category",
    "Pay Period",
    "Clock In",
    "Clock Out",
    "Break (mins)",
    "Gross Hours",
    "Net Hours",
    "Rate",
    "Pay",
];

/// Renders one calculated entry as display strings, aligned with
/// [`DETAIL_HEADER`].
pub fn detail_row(entry: &CalculatedEntry, options: &FormatOptions) -> Vec<String> {
    vec![
        display::date(entry.date),
        entry.employee_name.clone(),
        entry.employee_email.clone(),
        entry.location_name.clone().unwrap_or_default(),
        entry.category_name.clone(),
        entry.pay_period.clone(),
        display::time(entry.clock_in),
        display::time(entry.clock_out),
        entry.break_minutes.to_string(),
        display::decimal_2dp(entry.gross_hours),
        display::decimal_2dp(entry.net_hours),
        display::money(entry.effective_rate, &options.currency_symbol),
        display::money(entry.total_pay, &options.currency_symbol),
    ]
}

/// Writes the detail table as comma-separated text.
///
/// Fields holding a comma, a quote or a line break are wrapped in quotes
/// with embedded quotes doubled. The header row is always written, so an
/// empty table yields a header-only file.
pub fn write_detail(detail: &[CalculatedEntry], options: &FormatOptions) -> EngineResult<Vec<u8>> {
    write_table(DETAIL_HEADER, detail.iter().map(|entry| detail_row(entry, options)))
}

/// Writes a header and rows to an in-memory CSV buffer.
pub(crate) fn write_table<I>(header: &[&str], rows: I) -> EngineResult<Vec<u8>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    writer.into_inner().map_err(|err| EngineError::ExportWrite {
        kind: "csv".to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_datetime(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn options() -> FormatOptions {
        FormatOptions {
            currency_symbol: "£".to_string(),
        }
    }

    fn create_entry(employee_name: &str, category_name: &str) -> CalculatedEntry {
        let clock_in = make_datetime("2024-01-15T08:00:00+00:00");
        CalculatedEntry {
            entry_id: "te_001".to_string(),
            employee_id: "emp_001".to_string(),
            employee_name: employee_name.to_string(),
            employee_email: "alex@example.com".to_string(),
            date: clock_in.date_naive(),
            clock_in,
            clock_out: make_datetime("2024-01-15T12:00:00+00:00"),
            location_name: Some("Main Hall".to_string()),
            category_id: Some("cat_bar".to_string()),
            category_name: category_name.to_string(),
            break_minutes: 15,
            gross_hours: dec("4"),
            net_hours: dec("3.75"),
            effective_rate: dec("12.00"),
            total_pay: dec("45.00"),
            pay_period: "January 2024".to_string(),
        }
    }

    fn parse(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_reader(bytes);
        let header = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|record| record.unwrap().iter().map(str::to_string).collect())
            .collect();
        (header, rows)
    }

    /// DT-001: detail row display formatting
    #[test]
    fn test_detail_row_formatting() {
        let bytes = write_detail(&[create_entry("Alex", "Bar")], &options()).unwrap();
        let (header, rows) = parse(&bytes);

        assert_eq!(header, DETAIL_HEADER);
        assert_eq!(
            rows[0],
            vec![
                "15/01/2024",
                "Alex",
                "alex@example.com",
                "Main Hall",
                "Bar",
                "January 2024",
                "08:00",
                "12:00",
                "15",
                "4.00",
                "3.75",
                "£12.00",
                "£45.00",
            ]
        );
    }

    #[test]
    fn test_empty_detail_is_header_only() {
        let bytes = write_detail(&[], &options()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Date,Employee,Email"));
    }

    #[test]
    fn test_fields_with_delimiter_and_quotes_are_escaped() {
        let bytes = write_detail(&[create_entry("Smith, \"Al\"", "Bar")], &options()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"Smith, \"\"Al\"\"\""));
    }

    #[test]
    fn test_missing_location_renders_blank() {
        let mut entry = create_entry("Alex", "Bar");
        entry.location_name = None;
        let bytes = write_detail(&[entry], &options()).unwrap();
        let (_, rows) = parse(&bytes);
        assert_eq!(rows[0][3], "");
    }

    proptest! {
        #[test]
        fn prop_escaped_fields_round_trip(
            name in "[a-zA-Z ,\"\n]{1,20}",
            category in "[a-zA-Z ,\"\r\n]{1,20}",
        ) {
            let bytes = write_detail(&[create_entry(&name, &category)], &options()).unwrap();
            let (_, rows) = parse(&bytes);
            prop_assert_eq!(rows.len(), 1);
            prop_assert_eq!(&rows[0][1], &name);
            prop_assert_eq!(&rows[0][4], &category);
        }
    }
}
