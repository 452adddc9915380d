//! Response normalization.
//!
//! Turns a raw vendor payload into flat `ProductRecord`s. Exactly two
//! response shapes exist:
//!
//! - **storefront**: a single product object at `data.product`
//! - **feed**: a list of product objects under `recommendedProducts`
//!
//! Dispatch probes the payload's structure directly; it never relies on a
//! failed parse of one shape to pick the other. Anything else is an
//! `UnrecognizedShape` error.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::ProductRecord;
use crate::error::AppError;

/// Mapping from flattened payload paths to canonical record fields.
///
/// Both vendors normalize into the same record, so mixed tables can never
/// end up with diverging column sets.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pub key: &'static str,
    pub name: &'static str,
    pub weight_unit: &'static str,
    pub price: &'static str,
}

/// Single-product storefront shape.
pub const STOREFRONT_FIELDS: FieldMap = FieldMap {
    key: "url_key",
    name: "name",
    weight_unit: "weight_base_unit",
    price: "price_range.maximum_price.regular_price.value",
};

/// Recommendation-feed shape.
pub const FEED_FIELDS: FieldMap = FieldMap {
    key: "id",
    name: "name",
    weight_unit: "unit.unitOfMeasure",
    price: "price.price",
};

enum ResponseShape<'a> {
    Storefront(&'a Value),
    Feed(&'a Vec<Value>),
}

/// Normalize a raw vendor response into product records.
///
/// `fallback_key` is the identifier that was fetched; it becomes the record
/// key when the payload does not carry one itself.
pub fn normalize(raw: &Value, fallback_key: &str) -> Result<Vec<ProductRecord>, AppError> {
    let records = match probe_shape(raw) {
        Some(ResponseShape::Storefront(product)) => {
            vec![record_from_value(product, &STOREFRONT_FIELDS, Some(fallback_key))?]
        }
        Some(ResponseShape::Feed(list)) => {
            let mut records = Vec::with_capacity(list.len());
            for entry in list {
                records.push(record_from_value(entry, &FEED_FIELDS, None)?);
            }
            records
        }
        None => return Err(AppError::UnrecognizedShape(describe(raw))),
    };

    debug!(records = records.len(), "normalized vendor response");
    Ok(records)
}

fn probe_shape(raw: &Value) -> Option<ResponseShape<'_>> {
    if let Some(product) = raw.pointer("/data/product") {
        if product.is_object() {
            return Some(ResponseShape::Storefront(product));
        }
    }
    if let Some(Value::Array(list)) = raw.get("recommendedProducts") {
        return Some(ResponseShape::Feed(list));
    }
    None
}

/// Flatten nested objects into dotted paths (`price.price`,
/// `price_range.maximum_price.regular_price.value`). Arrays and scalars are
/// kept as-is at their path.
pub fn flatten(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(&mut out, "", obj);
    out
}

fn flatten_into(out: &mut Map<String, Value>, prefix: &str, obj: &Map<String, Value>) {
    for (key, value) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(out, &path, nested),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

fn record_from_value(
    value: &Value,
    fields: &FieldMap,
    fallback_key: Option<&str>,
) -> Result<ProductRecord, AppError> {
    let Some(obj) = value.as_object() else {
        return Err(AppError::UnrecognizedShape(
            "Product entry is not an object.".to_string(),
        ));
    };
    let flat = flatten(obj);

    let name = match flat.get(fields.name).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            return Err(AppError::UnrecognizedShape(format!(
                "Product record is missing '{}'.",
                fields.name
            )));
        }
    };

    let Some(price) = flat.get(fields.price).and_then(number_value) else {
        return Err(AppError::UnrecognizedShape(format!(
            "Product record is missing a numeric '{}'.",
            fields.price
        )));
    };

    let weight_unit = flat.get(fields.weight_unit).and_then(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    });

    let item_key = match flat.get(fields.key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => match fallback_key {
            Some(key) => key.to_string(),
            None => {
                return Err(AppError::UnrecognizedShape(format!(
                    "Product record is missing '{}'.",
                    fields.key
                )));
            }
        },
    };

    Ok(ProductRecord {
        item_key,
        name,
        weight_unit,
        price,
    })
}

/// Price values arrive as JSON numbers from one vendor and numeric strings
/// from the other.
fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn describe(raw: &Value) -> String {
    match raw {
        Value::Object(obj) => {
            let keys: Vec<&str> = obj.keys().take(8).map(String::as_str).collect();
            format!(
                "payload matched neither vendor shape (top-level keys: [{}])",
                keys.join(", ")
            )
        }
        Value::Array(_) => "payload is a bare array".to_string(),
        other => format!("payload is not an object: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn storefront_payload() -> Value {
        json!({
            "data": {
                "product": {
                    "name": "Al Doha Sugar 1 Kg",
                    "url_key": "al-doha-sugar-1-kg",
                    "weight_base_unit": "KG",
                    "price_range": {
                        "maximum_price": {
                            "regular_price": { "value": 38.5, "currency": "EGP" }
                        }
                    }
                }
            }
        })
    }

    fn feed_payload() -> Value {
        json!({
            "recommendedProducts": [
                {
                    "id": 445800,
                    "name": "White Eggs 10 Pieces",
                    "unit": { "unitOfMeasure": "Piece" },
                    "price": { "price": 92.0, "currency": "EGP" }
                },
                {
                    "id": 445801,
                    "name": "Sunflower Oil",
                    "unit": { "unitOfMeasure": "700 ml" },
                    "price": { "price": "64.95", "currency": "EGP" }
                }
            ]
        })
    }

    #[test]
    fn storefront_shape_yields_one_record() {
        let records = normalize(&storefront_payload(), "al-doha-sugar-1-kg").unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.item_key, "al-doha-sugar-1-kg");
        assert_eq!(r.name, "Al Doha Sugar 1 Kg");
        assert_eq!(r.weight_unit.as_deref(), Some("KG"));
        assert_eq!(r.price, 38.5);
    }

    #[test]
    fn storefront_key_falls_back_to_fetched_identifier() {
        let mut payload = storefront_payload();
        payload["data"]["product"]
            .as_object_mut()
            .unwrap()
            .remove("url_key");
        let records = normalize(&payload, "fallback-slug").unwrap();
        assert_eq!(records[0].item_key, "fallback-slug");
    }

    #[test]
    fn feed_shape_yields_one_record_per_entry() {
        let records = normalize(&feed_payload(), "445800").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].item_key, "445800");
        assert_eq!(records[0].weight_unit.as_deref(), Some("Piece"));
        assert_eq!(records[0].price, 92.0);
        // Numeric-string prices are accepted.
        assert_eq!(records[1].price, 64.95);
        assert_eq!(records[1].item_key, "445801");
    }

    #[test]
    fn empty_feed_list_yields_no_records() {
        let records = normalize(&json!({ "recommendedProducts": [] }), "x").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn unmatched_shapes_are_rejected() {
        for payload in [
            json!({ "data": { "product": null } }),
            json!({ "data": {} }),
            json!({ "products": [] }),
            json!([1, 2, 3]),
            json!("nope"),
        ] {
            let err = normalize(&payload, "x").unwrap_err();
            assert!(matches!(err, AppError::UnrecognizedShape(_)), "payload: {payload}");
        }
    }

    #[test]
    fn missing_price_is_a_shape_error() {
        let mut payload = storefront_payload();
        payload["data"]["product"]
            .as_object_mut()
            .unwrap()
            .remove("price_range");
        let err = normalize(&payload, "x").unwrap_err();
        assert!(matches!(err, AppError::UnrecognizedShape(_)));
    }

    #[test]
    fn flatten_builds_dotted_paths() {
        let obj = json!({
            "a": { "b": { "c": 1 } },
            "d": "top",
            "e": [1, 2]
        });
        let flat = flatten(obj.as_object().unwrap());
        assert_eq!(flat.get("a.b.c"), Some(&json!(1)));
        assert_eq!(flat.get("d"), Some(&json!("top")));
        assert_eq!(flat.get("e"), Some(&json!([1, 2])));
    }
}
