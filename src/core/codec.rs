/// Rentals document codec
///
/// Converts between an in-memory `RecordCollection` and the JSON document the
/// file store persists: `{"rentals": [ {...}, ... ]}`.
///
/// Older files stored every field as a string and some used English field
/// names (`days`, `units`, `discount`). Decoding accepts both and normalizes
/// to typed values; encoding always writes the current typed form.

use crate::db::models::{RecordCollection, RentalRecord, RENTALS_KEY};
use crate::error::{RentalError, Result};
use serde_json::{json, Map, Value};

/// Legacy names tried when the primary field is absent
const DAYS_FIELDS: [&str; 2] = ["dias_alquiler", "days"];
const UNITS_FIELDS: [&str; 2] = ["num_vehi", "units"];
const DISCOUNT_FIELDS: [&str; 2] = ["descuento", "discount"];

pub struct RecordCodec;

impl RecordCodec {
    /// Build the document for a collection. Never fails.
    ///
    /// Entries use `RentalRecord`'s own serde shape; only decoding needs the
    /// legacy handling below.
    pub fn encode(records: &[RentalRecord]) -> Value {
        // A plain struct of strings and numbers always serializes.
        let rentals = records.iter().map(|record| json!(record)).collect();

        let mut doc = Map::new();
        doc.insert(RENTALS_KEY.to_string(), Value::Array(rentals));
        Value::Object(doc)
    }

    /// Read a collection back out of a document
    pub fn decode(doc: &Value) -> Result<RecordCollection> {
        let root = doc
            .as_object()
            .ok_or_else(|| malformed("document is not an object"))?;

        let rentals = root
            .get(RENTALS_KEY)
            .ok_or_else(|| malformed(format!("missing \"{}\" field", RENTALS_KEY)))?
            .as_array()
            .ok_or_else(|| malformed(format!("\"{}\" is not an array", RENTALS_KEY)))?;

        rentals
            .iter()
            .enumerate()
            .map(|(index, entry)| decode_record(index, entry))
            .collect()
    }

    /// Parse raw file contents and decode them
    pub fn decode_slice(bytes: &[u8]) -> Result<RecordCollection> {
        let doc: Value = serde_json::from_slice(bytes)
            .map_err(|e| malformed(format!("invalid JSON: {}", e)))?;
        Self::decode(&doc)
    }

    /// Encode to pretty-printed bytes ready to write
    pub fn to_bytes(records: &[RentalRecord]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&Self::encode(records))?)
    }
}

fn decode_record(index: usize, entry: &Value) -> Result<RentalRecord> {
    let fields = entry
        .as_object()
        .ok_or_else(|| malformed(format!("rental #{} is not an object", index)))?;

    let id = match fields.get("id") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_i64()
                .ok_or_else(|| malformed(format!("rental #{}: id is not an integer", index)))?,
        ),
    };

    let co2_rating = match pick(fields, &["co2_rating"]) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(malformed(format!("rental #{}: co2_rating is not text", index))),
        None => return Err(malformed(format!("rental #{}: missing co2_rating", index))),
    };

    let engine = match pick(fields, &["engine"]) {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(malformed(format!("rental #{}: missing engine", index))),
    };

    Ok(RentalRecord {
        id,
        co2_rating,
        engine,
        rental_days: count_field(index, fields, &DAYS_FIELDS)?,
        unit_count: count_field(index, fields, &UNITS_FIELDS)?,
        discount: discount_field(index, fields)?,
    })
}

/// First non-null value among `names`, in order
fn pick<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| fields.get(*name).filter(|v| !v.is_null()))
}

fn count_field(index: usize, fields: &Map<String, Value>, names: &[&str]) -> Result<u32> {
    let name = names[0];
    let value = pick(fields, names)
        .ok_or_else(|| malformed(format!("rental #{}: missing {}", index, name)))?;

    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            malformed(format!(
                "rental #{}: {} is not a non-negative integer: {}",
                index, name, value
            ))
        })
}

fn discount_field(index: usize, fields: &Map<String, Value>) -> Result<f64> {
    let value = pick(fields, &DISCOUNT_FIELDS)
        .ok_or_else(|| malformed(format!("rental #{}: missing descuento", index)))?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| {
            malformed(format!(
                "rental #{}: descuento is not a non-negative number: {}",
                index, value
            ))
        })
}

fn malformed(reason: impl Into<String>) -> RentalError {
    RentalError::MalformedDocument(reason.into())
}
