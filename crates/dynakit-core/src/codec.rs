//! Conversion between native [`Value`]s and wire [`AttributeValue`]s.
//!
//! # Numbers
//!
//! The wire carries numbers as decimal strings. Integers are written as-is;
//! floats use the shortest representation that round-trips (`f64` `Display`),
//! which never uses exponent notation. On the way back a payload containing
//! `.` becomes a float, anything else an integer, falling back to a float when
//! the integer does not fit. This is a textual heuristic: `3.0_f64` is written
//! as `"3"` and reads back as the integer `3`.
//!
//! # Absent values
//!
//! `Null` and the empty string are "no value". [`encode_item`] drops such
//! attributes entirely, while [`encode`] and [`encode_attribute_value`] produce
//! an explicit `{"NULL": true}`.

use bytes::Bytes;
use serde::Deserialize;

use dynakit_model::types::AttributeType;
use dynakit_model::{AttributeValue, WireItem};

use crate::error::{Error, Result};
use crate::schema::AttributeDefinition;
use crate::value::{Item, Number, Value};

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Render a number in wire form.
pub fn format_number(number: Number) -> Result<String> {
    if number.is_finite() {
        Ok(number.to_string())
    } else {
        Err(Error::unsupported("non-finite float", "N"))
    }
}

/// Parse a wire number.
pub fn parse_number(payload: &str) -> Result<Number> {
    if !payload.contains('.') {
        if let Ok(i) = payload.parse::<i128>() {
            return Ok(Number::Int(i));
        }
    }
    payload
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Number::Float)
        .ok_or_else(|| Error::MalformedAttributeValue(format!("invalid number {payload:?}")))
}

fn is_number(payload: &str) -> bool {
    payload.parse::<f64>().is_ok_and(f64::is_finite)
}

// ---------------------------------------------------------------------------
// Kind-driven encoding
// ---------------------------------------------------------------------------

/// Encode a value, choosing the wire tag from the value's variant.
pub fn encode(value: &Value) -> Result<AttributeValue> {
    let av = match value {
        Value::Null => AttributeValue::Null(true),
        Value::S(s) if s.is_empty() => AttributeValue::Null(true),
        Value::S(s) => AttributeValue::S(s.clone()),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Int(i) => AttributeValue::N(i.to_string()),
        Value::Float(f) => AttributeValue::N(format_number(Number::Float(*f))?),
        Value::Binary(b) => AttributeValue::B(b.clone()),
        Value::StrSet(set) => AttributeValue::Ss(set.clone()),
        Value::NumSet(set) => AttributeValue::Ns(
            set.iter()
                .map(|n| format_number(*n))
                .collect::<Result<_>>()?,
        ),
        Value::BinSet(set) => AttributeValue::Bs(set.clone()),
        Value::List(list) => AttributeValue::L(list.iter().map(encode).collect::<Result<_>>()?),
        Value::Map(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), encode(v)?)))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(av)
}

/// Decode a wire value.
pub fn decode(av: &AttributeValue) -> Result<Value> {
    let value = match av {
        AttributeValue::S(s) => Value::S(s.clone()),
        AttributeValue::N(n) => parse_number(n)?.into(),
        AttributeValue::B(b) => Value::Binary(b.clone()),
        AttributeValue::Ss(set) => Value::StrSet(set.clone()),
        AttributeValue::Ns(set) => Value::NumSet(
            set.iter()
                .map(|n| parse_number(n))
                .collect::<Result<_>>()?,
        ),
        AttributeValue::Bs(set) => Value::BinSet(set.clone()),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::List(list.iter().map(decode).collect::<Result<_>>()?),
        AttributeValue::M(map) => Value::Map(decode_item(map)?),
    };
    Ok(value)
}

/// Decode a wire value that is still a raw JSON document.
pub fn decode_json(json: &serde_json::Value) -> Result<Value> {
    let av = AttributeValue::deserialize(json)
        .map_err(|e| Error::MalformedAttributeValue(e.to_string()))?;
    decode(&av)
}

/// Encode an item, dropping attributes whose value is absent.
pub fn encode_item(item: &Item) -> Result<WireItem> {
    item.iter()
        .filter(|(_, v)| !v.is_absent())
        .map(|(k, v)| Ok((k.clone(), encode(v)?)))
        .collect()
}

/// Decode a wire item into a fresh native item.
pub fn decode_item(item: &WireItem) -> Result<Item> {
    item.iter()
        .map(|(k, v)| Ok((k.clone(), decode(v)?)))
        .collect()
}

/// Encode `:value` placeholders. Unlike [`encode_item`], absent values are
/// kept and sent as `NULL`.
pub fn encode_expression_values(values: &Item) -> Result<WireItem> {
    values
        .iter()
        .map(|(k, v)| Ok((k.clone(), encode(v)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Type-driven encoding
// ---------------------------------------------------------------------------

/// Encode a value as the wire type declared by `definition`.
///
/// Lets a key given as `"42"` be sent as a number when the key is numeric.
/// Absent values become an explicit `{"NULL": true}` rather than a typed
/// `{"N": null}`-style payload.
pub fn encode_attribute_value(
    definition: &AttributeDefinition,
    value: &Value,
) -> Result<AttributeValue> {
    if value.is_absent() {
        return Ok(AttributeValue::Null(true));
    }
    let target = definition.attr_type;
    let av = match target {
        AttributeType::S => AttributeValue::S(string_payload(value, target)?),
        AttributeType::N => AttributeValue::N(number_payload(value, target)?),
        AttributeType::B => AttributeValue::B(binary_payload(value, target)?),
        AttributeType::Ss => AttributeValue::Ss(match value {
            Value::StrSet(set) => set.clone(),
            Value::List(list) => list
                .iter()
                .map(|v| string_payload(v, target))
                .collect::<Result<_>>()?,
            other => return Err(Error::unsupported(other.kind(), target.as_str())),
        }),
        AttributeType::Ns => AttributeValue::Ns(match value {
            Value::NumSet(set) => set
                .iter()
                .map(|n| format_number(*n))
                .collect::<Result<_>>()?,
            Value::List(list) => list
                .iter()
                .map(|v| number_payload(v, target))
                .collect::<Result<_>>()?,
            other => return Err(Error::unsupported(other.kind(), target.as_str())),
        }),
        AttributeType::Bs => AttributeValue::Bs(match value {
            Value::BinSet(set) => set.clone(),
            Value::List(list) => list
                .iter()
                .map(|v| binary_payload(v, target))
                .collect::<Result<_>>()?,
            other => return Err(Error::unsupported(other.kind(), target.as_str())),
        }),
    };
    Ok(av)
}

/// Encode a value as its declared type, paired with the attribute name.
pub fn encode_attribute(
    definition: &AttributeDefinition,
    value: &Value,
) -> Result<(String, AttributeValue)> {
    Ok((
        definition.name.clone(),
        encode_attribute_value(definition, value)?,
    ))
}

/// Encode several values as the declared type of one attribute.
pub fn encode_attribute_values(
    definition: &AttributeDefinition,
    values: &[Value],
) -> Result<Vec<AttributeValue>> {
    values
        .iter()
        .map(|v| encode_attribute_value(definition, v))
        .collect()
}

fn string_payload(value: &Value, target: AttributeType) -> Result<String> {
    match value {
        Value::S(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => format_number(Number::Float(*f)),
        other => Err(Error::unsupported(other.kind(), target.as_str())),
    }
}

fn number_payload(value: &Value, target: AttributeType) -> Result<String> {
    match value {
        Value::S(s) if is_number(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => format_number(Number::Float(*f)),
        other => Err(Error::unsupported(other.kind(), target.as_str())),
    }
}

fn binary_payload(value: &Value, target: AttributeType) -> Result<Bytes> {
    match value {
        Value::Binary(b) => Ok(b.clone()),
        Value::S(s) => Ok(Bytes::copy_from_slice(s.as_bytes())),
        other => Err(Error::unsupported(other.kind(), target.as_str())),
    }
}
