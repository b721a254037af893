// Copyright 2025 coScene
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Canonical sensor reading and payload normalization
//
// Client payloads are loose JSON; `Reading::from_json` is the single place
// they become typed. Everything past this boundary (backends, reports)
// works with fully-populated `Reading` values only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// One normalized sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    /// Capture time in epoch seconds
    pub recorded: i64,
    pub location: String,
    pub sensor: String,
    pub measurement: String,
    pub units: String,
    pub value: f64,
}

/// Wire shapes clients use for the `recorded` field
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordedStamp {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RecordedStamp {
    /// Collapse the wire shape into epoch seconds.
    ///
    /// Numeric strings and integral floats are accepted; a float with a
    /// fractional part is rejected rather than silently truncated.
    pub fn normalize(&self) -> Result<i64, StoreError> {
        match self {
            RecordedStamp::Integer(seconds) => Ok(*seconds),
            RecordedStamp::Float(seconds) => {
                if seconds.is_finite() && seconds.fract() == 0.0 {
                    Ok(*seconds as i64)
                } else {
                    Err(StoreError::MalformedInput(format!(
                        "'recorded' must be a whole number of epoch seconds, got {}",
                        seconds
                    )))
                }
            }
            RecordedStamp::Text(text) => text.parse::<i64>().map_err(|_| {
                StoreError::MalformedInput(format!(
                    "'recorded' string is not numeric: {:?}",
                    text
                ))
            }),
        }
    }
}

impl Reading {
    /// Normalize a loose JSON payload into a reading.
    ///
    /// `recorded` may arrive as a JSON number or a numeric string; the other
    /// five fields must already have the expected JSON type. Missing fields
    /// and type mismatches produce `StoreError::MalformedInput` naming the
    /// field and the JSON type that was found.
    pub fn from_json(payload: &Value) -> Result<Self, StoreError> {
        let fields = payload.as_object().ok_or_else(|| {
            StoreError::MalformedInput(format!(
                "payload must be a JSON object, got {}",
                json_type_name(payload)
            ))
        })?;

        let recorded_raw = fields
            .get("recorded")
            .ok_or_else(|| missing_field("recorded"))?;
        let stamp: RecordedStamp =
            serde_json::from_value(recorded_raw.clone()).map_err(|_| {
                StoreError::MalformedInput(format!(
                    "'recorded' must be a number or numeric string, got {}",
                    json_type_name(recorded_raw)
                ))
            })?;

        Ok(Reading {
            recorded: stamp.normalize()?,
            location: string_field(fields, "location")?,
            sensor: string_field(fields, "sensor")?,
            measurement: string_field(fields, "measurement")?,
            units: string_field(fields, "units")?,
            value: number_field(fields, "value")?,
        })
    }
}

fn missing_field(field: &str) -> StoreError {
    StoreError::MalformedInput(format!("missing required field '{}'", field))
}

fn string_field(
    fields: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<String, StoreError> {
    let value = fields.get(field).ok_or_else(|| missing_field(field))?;
    value.as_str().map(str::to_owned).ok_or_else(|| {
        StoreError::MalformedInput(format!(
            "'{}' must be a string, got {}",
            field,
            json_type_name(value)
        ))
    })
}

fn number_field(fields: &serde_json::Map<String, Value>, field: &str) -> Result<f64, StoreError> {
    let value = fields.get(field).ok_or_else(|| missing_field(field))?;
    value.as_f64().ok_or_else(|| {
        StoreError::MalformedInput(format!(
            "'{}' must be a number, got {}",
            field,
            json_type_name(value)
        ))
    })
}

/// Human-readable JSON type name for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
