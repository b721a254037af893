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

use sensor_store::error::StoreError;
use sensor_store::reading::Reading;
use serde_json::json;

fn sample_payload() -> serde_json::Value {
    json!({
        "recorded": 1768237200,
        "location": "den",
        "sensor": "bmp280",
        "measurement": "temperature",
        "units": "C",
        "value": 22.3
    })
}

#[test]
fn test_normalizes_canonical_payload() {
    let reading = Reading::from_json(&sample_payload()).unwrap();
    assert_eq!(reading.recorded, 1768237200);
    assert_eq!(reading.location, "den");
    assert_eq!(reading.sensor, "bmp280");
    assert_eq!(reading.measurement, "temperature");
    assert_eq!(reading.units, "C");
    assert_eq!(reading.value, 22.3);
}

#[test]
fn test_recorded_accepted_as_integer_string_and_float() {
    // The three encodings must normalize to the same reading
    let mut integer = sample_payload();
    integer["recorded"] = json!(1768237200);
    let mut text = sample_payload();
    text["recorded"] = json!("1768237200");
    let mut float = sample_payload();
    float["recorded"] = json!(1768237200.0);

    let from_integer = Reading::from_json(&integer).unwrap();
    let from_text = Reading::from_json(&text).unwrap();
    let from_float = Reading::from_json(&float).unwrap();

    assert_eq!(from_integer, from_text);
    assert_eq!(from_integer, from_float);
    assert_eq!(from_integer.recorded, 1768237200);
}

#[test]
fn test_negative_recorded_string_parses() {
    let mut payload = sample_payload();
    payload["recorded"] = json!("-86400");
    let reading = Reading::from_json(&payload).unwrap();
    assert_eq!(reading.recorded, -86400);
}

#[test]
fn test_fractional_recorded_is_rejected() {
    let mut payload = sample_payload();
    payload["recorded"] = json!(1768237200.5);
    let err = Reading::from_json(&payload).unwrap_err();
    assert!(matches!(err, StoreError::MalformedInput(_)));
    assert!(err.to_string().contains("recorded"), "got: {}", err);
}

#[test]
fn test_non_numeric_recorded_string_is_rejected() {
    let mut payload = sample_payload();
    payload["recorded"] = json!("yesterday");
    let err = Reading::from_json(&payload).unwrap_err();
    assert!(err.to_string().contains("recorded"), "got: {}", err);
    assert!(err.to_string().contains("yesterday"), "got: {}", err);
}

#[test]
fn test_error_names_unexpected_json_type() {
    let mut payload = sample_payload();
    payload["recorded"] = json!(true);
    let err = Reading::from_json(&payload).unwrap_err();
    assert!(err.to_string().contains("boolean"), "got: {}", err);
}

#[test]
fn test_missing_field_is_named() {
    for field in ["recorded", "location", "sensor", "measurement", "units", "value"] {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove(field);
        let err = Reading::from_json(&payload).unwrap_err();
        assert!(matches!(err, StoreError::MalformedInput(_)));
        assert!(
            err.to_string().contains(field),
            "error for missing '{}' was: {}",
            field,
            err
        );
    }
}

#[test]
fn test_non_string_location_is_rejected() {
    let mut payload = sample_payload();
    payload["location"] = json!(42);
    let err = Reading::from_json(&payload).unwrap_err();
    assert!(err.to_string().contains("location"), "got: {}", err);
    assert!(err.to_string().contains("number"), "got: {}", err);
}

#[test]
fn test_non_numeric_value_is_rejected() {
    let mut payload = sample_payload();
    payload["value"] = json!("22.3");
    let err = Reading::from_json(&payload).unwrap_err();
    assert!(err.to_string().contains("value"), "got: {}", err);
    assert!(err.to_string().contains("string"), "got: {}", err);
}

#[test]
fn test_integer_value_is_accepted_as_float() {
    let mut payload = sample_payload();
    payload["value"] = json!(22);
    let reading = Reading::from_json(&payload).unwrap();
    assert_eq!(reading.value, 22.0);
}

#[test]
fn test_non_object_payload_is_rejected() {
    let err = Reading::from_json(&json!([1, 2, 3])).unwrap_err();
    assert!(err.to_string().contains("object"), "got: {}", err);
    assert!(err.to_string().contains("array"), "got: {}", err);
}

#[test]
fn test_extra_keys_are_ignored() {
    let mut payload = sample_payload();
    payload["battery"] = json!(87);
    let reading = Reading::from_json(&payload).unwrap();
    assert_eq!(reading.value, 22.3);
}
