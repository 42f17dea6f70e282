//! # Legacy Import
//!
//! Normalizes product records exported by older tooling into
//! [`ProductDraft`]s, so the ledger only ever sees one product shape.
//!
//! ## Accepted Shapes
//! ```text
//! Batch list (snake_case, Brazilian dates):
//!   { "nome": "Leite 1L", "valor": 4.99, "quantidade": 120,
//!     "data_entrada": "15/09/2025", "hora_entrada": "08:30",
//!     "data_saida": null, "hora_saida": null,
//!     "data_validade": "15/01/2026" }
//!
//! Dashboard export (camelCase, ISO dates):
//!   { "id": 6, "nome": "Leite 1L", "valor": 5.8,
//!     "dataEntrada": "2025-01-16T08:00:00", "dataSaida": null,
//!     "dataValidade": "2025-01-23" }
//! ```
//!
//! Times without an offset are read as UTC. An exit is only kept when both
//! its date and time are present. A record without `quantidade` counts as a
//! single unit. Ids in the input are ignored; the ledger assigns new ones.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::error::{CoreResult, ValidationError};
use crate::types::ProductDraft;
use crate::validation::{
    check_range, parse_date, parse_price, parse_timestamp, validate_product_name, ValidationResult,
};
use crate::{MAX_QUANTITY_ON_HAND, MAX_UNIT_PRICE_CENTS};

/// Quantity assumed when a record carries none.
pub const DEFAULT_LEGACY_QUANTITY: i64 = 1;

// =============================================================================
// Record Shapes
// =============================================================================

/// Price as either a JSON number or a formatted string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LegacyAmount {
    Number(f64),
    Text(String),
}

impl LegacyAmount {
    fn to_cents(&self) -> ValidationResult<i64> {
        match self {
            LegacyAmount::Number(value) => {
                let cents = (value * 100.0).round();
                if !(0.0..=MAX_UNIT_PRICE_CENTS as f64).contains(&cents) {
                    return Err(ValidationError::OutOfRange {
                        field: "valor".to_string(),
                        min: 0,
                        max: MAX_UNIT_PRICE_CENTS,
                    });
                }
                Ok(cents as i64)
            }
            LegacyAmount::Text(raw) => parse_price("valor", raw),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BatchRecord {
    nome: String,
    valor: LegacyAmount,
    #[serde(default)]
    quantidade: Option<i64>,
    data_entrada: String,
    #[serde(default)]
    hora_entrada: Option<String>,
    #[serde(default)]
    data_saida: Option<String>,
    #[serde(default)]
    hora_saida: Option<String>,
    data_validade: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportRecord {
    nome: String,
    valor: LegacyAmount,
    #[serde(default)]
    quantidade: Option<i64>,
    data_entrada: String,
    #[serde(default)]
    data_saida: Option<String>,
    data_validade: String,
}

/// One legacy product record, in either known shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LegacyRecord {
    Batch(BatchRecord),
    Export(ExportRecord),
}

// =============================================================================
// Normalization
// =============================================================================

fn non_blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Combines a `DD/MM/YYYY` date and an optional `HH:MM[:SS]` time.
fn parse_date_time(field: &str, date: &str, time: Option<&str>) -> ValidationResult<DateTime<Utc>> {
    let date: NaiveDate = parse_date(field, date)?;
    let time = match time {
        Some(raw) => NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|_| ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "expected HH:MM".to_string(),
            })?,
        None => NaiveTime::MIN,
    };
    Ok(date.and_time(time).and_utc())
}

fn checked_quantity(quantity: Option<i64>) -> ValidationResult<i64> {
    match quantity {
        Some(q) => check_range("quantidade", q, MAX_QUANTITY_ON_HAND).map(|()| q),
        None => Ok(DEFAULT_LEGACY_QUANTITY),
    }
}

impl LegacyRecord {
    /// Converts the record into a draft ready for `ProductLedger::add`.
    fn into_draft(self) -> ValidationResult<ProductDraft> {
        match self {
            LegacyRecord::Batch(record) => {
                let entry = parse_date_time(
                    "data_entrada",
                    &record.data_entrada,
                    non_blank(&record.hora_entrada),
                )?;
                let exit = match (non_blank(&record.data_saida), non_blank(&record.hora_saida)) {
                    (Some(date), Some(time)) => Some(parse_date_time("data_saida", date, Some(time))?),
                    _ => None,
                };

                Ok(ProductDraft {
                    name: validate_product_name(&record.nome)?,
                    unit_price_cents: record.valor.to_cents()?,
                    quantity_on_hand: checked_quantity(record.quantidade)?,
                    entry_timestamp: Some(entry),
                    exit_timestamp: exit,
                    expiry_date: parse_date("data_validade", &record.data_validade)?,
                })
            }
            LegacyRecord::Export(record) => {
                let exit = non_blank(&record.data_saida)
                    .map(|raw| parse_timestamp("dataSaida", raw))
                    .transpose()?;

                Ok(ProductDraft {
                    name: validate_product_name(&record.nome)?,
                    unit_price_cents: record.valor.to_cents()?,
                    quantity_on_hand: checked_quantity(record.quantidade)?,
                    entry_timestamp: Some(parse_timestamp("dataEntrada", &record.data_entrada)?),
                    exit_timestamp: exit,
                    expiry_date: parse_date("dataValidade", &record.data_validade)?,
                })
            }
        }
    }
}

/// Parses a JSON array of legacy records into drafts.
///
/// Fails on the first bad record; the error names its position.
///
/// ## Example
/// ```rust
/// use stockroom_core::import::import_legacy_json;
///
/// let drafts = import_legacy_json(r#"[{
///     "nome": "Leite 1L", "valor": 4.99, "quantidade": 120,
///     "data_entrada": "15/09/2025", "hora_entrada": "08:30",
///     "data_saida": null, "hora_saida": null,
///     "data_validade": "15/01/2026"
/// }]"#).unwrap();
/// assert_eq!(drafts[0].unit_price_cents, 499);
/// ```
pub fn import_legacy_json(json: &str) -> CoreResult<Vec<ProductDraft>> {
    let records: Vec<LegacyRecord> =
        serde_json::from_str(json).map_err(|e| ValidationError::InvalidFormat {
            field: "records".to_string(),
            reason: e.to_string(),
        })?;

    let drafts = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            record.into_draft().map_err(|e| ValidationError::InvalidFormat {
                field: format!("records[{}]", index),
                reason: e.to_string(),
            })
        })
        .collect::<ValidationResult<Vec<_>>>()?;

    Ok(drafts)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_batch_shape() {
        let json = r#"[
            {
                "nome": "Leite Integral 1L", "valor": 4.99, "quantidade": 120,
                "data_entrada": "15/09/2025", "hora_entrada": "08:30",
                "data_saida": "20/09/2025", "hora_saida": "17:45",
                "data_validade": "15/01/2026"
            },
            {
                "nome": "Pão de Forma", "valor": "7,50", "quantidade": 3,
                "data_entrada": "16/09/2025", "hora_entrada": "",
                "data_saida": "18/09/2025", "hora_saida": null,
                "data_validade": "21/09/2025"
            }
        ]"#;

        let drafts = import_legacy_json(json).unwrap();
        assert_eq!(drafts.len(), 2);

        let milk = &drafts[0];
        assert_eq!(milk.name, "Leite Integral 1L");
        assert_eq!(milk.unit_price_cents, 499);
        assert_eq!(milk.quantity_on_hand, 120);
        assert_eq!(
            milk.entry_timestamp,
            Some(Utc.with_ymd_and_hms(2025, 9, 15, 8, 30, 0).unwrap())
        );
        assert_eq!(
            milk.exit_timestamp,
            Some(Utc.with_ymd_and_hms(2025, 9, 20, 17, 45, 0).unwrap())
        );
        assert_eq!(milk.expiry_date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());

        let bread = &drafts[1];
        assert_eq!(bread.unit_price_cents, 750);
        // Missing time falls back to midnight; exit without a time is dropped
        assert_eq!(
            bread.entry_timestamp,
            Some(Utc.with_ymd_and_hms(2025, 9, 16, 0, 0, 0).unwrap())
        );
        assert_eq!(bread.exit_timestamp, None);
    }

    #[test]
    fn test_export_shape() {
        let json = r#"[{
            "id": 6, "nome": "Leite Integral 1L", "valor": 5.8,
            "dataEntrada": "2025-01-16T08:00:00", "dataSaida": null,
            "dataValidade": "2025-01-23",
            "createdAt": "2025-01-16T08:00:00", "updatedAt": "2025-01-16T08:00:00"
        }]"#;

        let drafts = import_legacy_json(json).unwrap();
        let draft = &drafts[0];
        assert_eq!(draft.unit_price_cents, 580);
        assert_eq!(draft.quantity_on_hand, DEFAULT_LEGACY_QUANTITY);
        assert_eq!(
            draft.entry_timestamp,
            Some(Utc.with_ymd_and_hms(2025, 1, 16, 8, 0, 0).unwrap())
        );
        assert_eq!(draft.expiry_date, NaiveDate::from_ymd_opt(2025, 1, 23).unwrap());
    }

    #[test]
    fn test_errors_name_the_record() {
        let json = r#"[
            {"nome": "Ok", "valor": 1, "dataEntrada": "2025-01-16T08:00:00", "dataValidade": "2025-02-01"},
            {"nome": "", "valor": 1, "dataEntrada": "2025-01-16T08:00:00", "dataValidade": "2025-02-01"}
        ]"#;

        let err = import_legacy_json(json).unwrap_err();
        assert!(err.to_string().contains("records[1]"));
    }

    #[test]
    fn test_rejects_unknown_shape_and_bad_json() {
        assert!(import_legacy_json(r#"[{"name": "Milk"}]"#).is_err());
        assert!(import_legacy_json("not json").is_err());
        assert!(import_legacy_json(r#"[{"nome": "X", "valor": -2, "dataEntrada": "2025-01-16T08:00:00", "dataValidade": "2025-02-01"}]"#).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_amounts() {
        let record = |valor: &str, quantidade: &str| {
            format!(
                r#"[{{"nome": "X", "valor": {}, "quantidade": {}, "dataEntrada": "2025-01-16T08:00:00", "dataValidade": "2025-02-01"}}]"#,
                valor, quantidade
            )
        };

        assert!(import_legacy_json(&record("1000000", "1000000")).is_ok());

        // Numbers past i64 must not saturate into a valid-looking price.
        for valor in ["1e300", "1000000.01", "\"2000000,00\""] {
            let err = import_legacy_json(&record(valor, "1")).unwrap_err();
            assert!(err.to_string().contains("valor"), "{}: {}", valor, err);
        }

        let err = import_legacy_json(&record("1", "1000001")).unwrap_err();
        assert!(err.to_string().contains("quantidade"));
    }
}
