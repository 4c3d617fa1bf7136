//! The diagnostic response contract, defined once.
//!
//! Two renderings come out of the same field tables: the `responseSchema`
//! sent to Gemini with every request (its OpenAPI-flavored uppercase types),
//! and a JSON Schema the client validates responses against before trusting
//! them. Rendering both from one place keeps request and validator from
//! drifting apart.

use serde_json::{json, Map, Value};

/// The six scored dimensions, in wire order.
pub const METRIC_KEYS: [&str; 6] = [
    "focus",
    "memorability",
    "branding",
    "emotion",
    "pacing",
    "overlays",
];

/// Brand-lift fields constrained to a qualitative level.
pub const BRAND_LIFT_LEVEL_KEYS: [&str; 3] =
    ["recallStrength", "messageAssociation", "genericRisk"];

pub const BRAND_LIFT_LEVELS: [&str; 3] = ["Low", "Moderate", "High"];

pub const PERFORMANCE_TYPES: [&str; 3] =
    ["Short-term performance", "Balanced", "Brand-building"];

pub const RECOMMENDATION_KEYS: [&str; 5] = [
    "structural",
    "emotional",
    "branding",
    "platformSpecific",
    "revisedHook",
];

/// Top-level required keys of a diagnostic response.
pub fn top_level_required() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = METRIC_KEYS.to_vec();
    keys.push("brandLift");
    keys.push("recommendations");
    keys
}

/// The `responseSchema` embedded in every generateContent request.
pub fn response_schema() -> Value {
    let metric = json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER", "description": "Score from 1 to 10" },
            "explanation": { "type": "STRING" }
        },
        "required": ["score", "explanation"]
    });

    let mut brand_lift_props = Map::new();
    for key in BRAND_LIFT_LEVEL_KEYS {
        brand_lift_props.insert(key.into(), json!({ "type": "STRING" }));
    }
    brand_lift_props.insert("performanceType".into(), json!({ "type": "STRING" }));
    brand_lift_props.insert("reasoning".into(), json!({ "type": "STRING" }));

    let mut recommendation_props = Map::new();
    for key in RECOMMENDATION_KEYS {
        recommendation_props.insert(key.into(), json!({ "type": "STRING" }));
    }

    let mut properties = Map::new();
    for key in METRIC_KEYS {
        properties.insert(key.into(), metric.clone());
    }
    properties.insert(
        "brandLift".into(),
        json!({
            "type": "OBJECT",
            "properties": brand_lift_props,
            "required": brand_lift_required()
        }),
    );
    properties.insert(
        "recommendations".into(),
        json!({
            "type": "OBJECT",
            "properties": recommendation_props,
            "required": RECOMMENDATION_KEYS
        }),
    );

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": top_level_required()
    })
}

/// JSON Schema the client checks every response against before
/// deserializing. Stricter than the request schema: enforces the 1..=10
/// integer score range and the brand-lift enumerations.
pub fn validation_schema() -> Value {
    let metric = json!({
        "type": "object",
        "properties": {
            "score": { "type": "integer", "minimum": 1, "maximum": 10 },
            "explanation": { "type": "string" }
        },
        "required": ["score", "explanation"]
    });

    let mut brand_lift_props = Map::new();
    for key in BRAND_LIFT_LEVEL_KEYS {
        brand_lift_props.insert(key.into(), json!({ "enum": BRAND_LIFT_LEVELS }));
    }
    brand_lift_props.insert("performanceType".into(), json!({ "enum": PERFORMANCE_TYPES }));
    brand_lift_props.insert("reasoning".into(), json!({ "type": "string" }));

    let mut recommendation_props = Map::new();
    for key in RECOMMENDATION_KEYS {
        recommendation_props.insert(key.into(), json!({ "type": "string" }));
    }

    let mut properties = Map::new();
    for key in METRIC_KEYS {
        properties.insert(key.into(), metric.clone());
    }
    properties.insert(
        "brandLift".into(),
        json!({
            "type": "object",
            "properties": brand_lift_props,
            "required": brand_lift_required()
        }),
    );
    properties.insert(
        "recommendations".into(),
        json!({
            "type": "object",
            "properties": recommendation_props,
            "required": RECOMMENDATION_KEYS
        }),
    );

    json!({
        "type": "object",
        "properties": properties,
        "required": top_level_required()
    })
}

fn brand_lift_required() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = BRAND_LIFT_LEVEL_KEYS.to_vec();
    keys.push("performanceType");
    keys.push("reasoning");
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn required_set(schema: &Value, pointer: &str) -> BTreeSet<String> {
        schema
            .pointer(pointer)
            .and_then(Value::as_array)
            .expect("required array")
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_request_and_validator_require_same_keys() {
        let request = response_schema();
        let validator = validation_schema();

        for pointer in [
            "/required",
            "/properties/focus/required",
            "/properties/brandLift/required",
            "/properties/recommendations/required",
        ] {
            assert_eq!(
                required_set(&request, pointer),
                required_set(&validator, pointer),
                "required keys drifted at {pointer}"
            );
        }
    }

    #[test]
    fn test_every_metric_present_in_both() {
        let request = response_schema();
        let validator = validation_schema();
        for key in METRIC_KEYS {
            assert!(request["properties"][key].is_object());
            assert!(validator["properties"][key].is_object());
        }
    }

    #[test]
    fn test_validator_bounds_scores() {
        let validator = validation_schema();
        let score = &validator["properties"]["focus"]["properties"]["score"];
        assert_eq!(score["minimum"], 1);
        assert_eq!(score["maximum"], 10);
        assert_eq!(score["type"], "integer");
    }

    #[test]
    fn test_request_schema_uses_gemini_types() {
        let request = response_schema();
        assert_eq!(request["type"], "OBJECT");
        assert_eq!(
            request["properties"]["focus"]["properties"]["score"]["type"],
            "INTEGER"
        );
    }
}
