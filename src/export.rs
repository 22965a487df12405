//! Exports a user's transactions as a CSV spreadsheet.

use serde::Serialize;
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    transaction::{TransactionRecord, TransactionType},
};

/// The file name offered to the browser for the export.
pub const EXPORT_FILE_NAME: &str = "transacoes_financeiras.csv";

/// Dates are written day first, e.g. "05/02/2024".
const EXPORT_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Data")]
    date: String,
    #[serde(rename = "Tipo")]
    transaction_type: &'static str,
    #[serde(rename = "Categoria")]
    category: &'a str,
    #[serde(rename = "Valor")]
    value: f64,
    #[serde(rename = "Observação")]
    note: &'a str,
}

fn type_label(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "Receita",
        TransactionType::Expense => "Despesa",
    }
}

impl<'a> ExportRow<'a> {
    fn from_record(record: &'a TransactionRecord) -> Result<Self, Error> {
        let date = record
            .date
            .format(EXPORT_DATE_FORMAT)
            .inspect_err(|error| {
                tracing::error!("could not format date {}: {error}", record.date)
            })?;

        Ok(Self {
            date,
            transaction_type: type_label(record.transaction_type),
            category: &record.category,
            value: record.value,
            note: record.note.as_deref().unwrap_or_default(),
        })
    }
}

/// Write `transactions` as CSV, one row per transaction in the given order.
///
/// # Errors
/// Returns an:
/// - [Error::NothingToExport] if `transactions` is empty,
/// - [Error::DateFormatError] if a date could not be formatted,
/// - or [Error::CsvError] if the CSV could not be written.
pub fn transactions_to_csv(transactions: &[TransactionRecord]) -> Result<Vec<u8>, Error> {
    if transactions.is_empty() {
        return Err(Error::NothingToExport);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());

    for transaction in transactions {
        writer.serialize(ExportRow::from_record(transaction)?)?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error,
        export::transactions_to_csv,
        transaction::{TransactionRecord, TransactionType},
    };

    fn create_test_transaction(
        transaction_type: TransactionType,
        value: f64,
        category: &str,
        note: Option<&str>,
    ) -> TransactionRecord {
        TransactionRecord {
            id: 1,
            transaction_type,
            value,
            category: category.to_owned(),
            date: date!(2024 - 02 - 05),
            note: note.map(str::to_owned),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn empty_export_is_an_error() {
        assert_eq!(transactions_to_csv(&[]), Err(Error::NothingToExport));
    }

    #[test]
    fn writes_header_and_rows() {
        let transactions = vec![
            create_test_transaction(TransactionType::Income, 1000.0, "Salário", None),
            create_test_transaction(
                TransactionType::Expense,
                12.5,
                "Alimentação",
                Some("almoço, sobremesa"),
            ),
        ];

        let csv = String::from_utf8(transactions_to_csv(&transactions).unwrap()).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Data,Tipo,Categoria,Valor,Observação");
        assert_eq!(lines[1], "05/02/2024,Receita,Salário,1000.0,");
        assert_eq!(
            lines[2],
            "05/02/2024,Despesa,Alimentação,12.5,\"almoço, sobremesa\""
        );
        assert_eq!(lines.len(), 3);
    }
}
