//! Serde helpers for `f64` fields that may legitimately hold infinity.
//!
//! JSON has no literal for infinity, so non-finite values travel as the
//! strings `"Infinity"`, `"-Infinity"` and `"NaN"`. Finite values stay numbers.
//!
//! ```ignore
//! #[serde(with = "core_types::float::non_finite")]
//! pub profit_factor: f64,
//! ```

pub mod non_finite {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    const POSITIVE_INFINITY: &str = "Infinity";
    const NEGATIVE_INFINITY: &str = "-Infinity";
    const NOT_A_NUMBER: &str = "NaN";

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str(NOT_A_NUMBER)
        } else if value.is_sign_positive() {
            serializer.serialize_str(POSITIVE_INFINITY)
        } else {
            serializer.serialize_str(NEGATIVE_INFINITY)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(f64),
        Label(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Wire::deserialize(deserializer)? {
            Wire::Number(value) => Ok(value),
            Wire::Label(label) => match label.as_str() {
                POSITIVE_INFINITY => Ok(f64::INFINITY),
                NEGATIVE_INFINITY => Ok(f64::NEG_INFINITY),
                NOT_A_NUMBER => Ok(f64::NAN),
                other => Err(de::Error::invalid_value(
                    de::Unexpected::Str(other),
                    &"a number, \"Infinity\", \"-Infinity\" or \"NaN\"",
                )),
            },
        }
    }
}
