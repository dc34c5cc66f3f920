//! JSON-safe numeric output
//!
//! Nothing leaves the engine as NaN or ±infinity: every serialized float
//! goes through these helpers and becomes `null` when it is not finite.

use serde::Serializer;

/// `Some(x)` when `x` is finite, otherwise `None`
pub fn finite(x: f64) -> Option<f64> {
    if x.is_finite() {
        Some(x)
    } else {
        None
    }
}

/// Flatten an optional value, treating non-finite values as absent
pub fn finite_opt(x: Option<f64>) -> Option<f64> {
    x.and_then(finite)
}

/// Map a slice of floats to JSON-safe optionals
pub fn sanitize_list(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| finite(v)).collect()
}

/// Map a slice of optional floats to JSON-safe optionals
pub fn sanitize_opt_list(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values.iter().map(|&v| finite_opt(v)).collect()
}

/// `serialize_with` helper for `f64` fields
pub fn serialize_f64<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    match finite(*value) {
        Some(v) => serializer.serialize_f64(v),
        None => serializer.serialize_none(),
    }
}

/// `serialize_with` helper for `Option<f64>` fields
pub fn serialize_opt_f64<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match finite_opt(*value) {
        Some(v) => serializer.serialize_f64(v),
        None => serializer.serialize_none(),
    }
}

/// `serialize_with` helper for `Vec<f64>` fields
pub fn serialize_f64_seq<S: Serializer>(
    values: &[f64],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|&v| finite(v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Sample {
        #[serde(serialize_with = "serialize_f64")]
        plain: f64,
        #[serde(serialize_with = "serialize_opt_f64")]
        maybe: Option<f64>,
        #[serde(serialize_with = "serialize_f64_seq")]
        values: Vec<f64>,
    }

    #[test]
    fn test_sanitize_list() {
        let cleaned = sanitize_list(&[1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -2.5]);
        assert_eq!(cleaned, vec![Some(1.0), None, None, None, Some(-2.5)]);
    }

    #[test]
    fn test_non_finite_serializes_as_null() {
        let sample = Sample {
            plain: f64::NAN,
            maybe: Some(f64::INFINITY),
            values: vec![0.5, f64::NAN],
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"plain":null,"maybe":null,"values":[0.5,null]}"#);
    }

    #[test]
    fn test_finite_values_pass_through() {
        let sample = Sample {
            plain: 1.25,
            maybe: Some(-0.5),
            values: vec![],
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"plain":1.25,"maybe":-0.5,"values":[]}"#);
    }
}
