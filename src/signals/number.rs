//! Numbers formatted the way browser JSON serialization formats them.
//!
//! `serde_json` writes an integral `f64` as `8.0`, while `JSON.stringify`
//! writes `8` and turns non-finite values into `null`. Records hashed here
//! must produce the same bytes as records hashed in a browser, so numeric
//! signal values go through this wrapper.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Integral values below this magnitude are written without exponent.
const PLAIN_INTEGER_LIMIT: f64 = 1e21;

/// A signal value that serializes like a JavaScript number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(pub f64);

impl Number {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number(v)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Self {
        Number(f64::from(v))
    }
}

impl From<u32> for Number {
    fn from(v: u32) -> Self {
        Number(f64::from(v))
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let v = self.0;
        if !v.is_finite() {
            serializer.serialize_unit()
        } else if v.fract() == 0.0 && v.abs() < PLAIN_INTEGER_LIMIT {
            // Also maps -0.0 to 0
            serializer.serialize_i128(v as i128)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `null` is how a non-finite value was written out
        let v = Option::<f64>::deserialize(deserializer)?;
        Ok(Number(v.unwrap_or(f64::NAN)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(v: f64) -> String {
        serde_json::to_string(&Number(v)).unwrap()
    }

    #[test]
    fn test_integral_values_have_no_fraction() {
        assert_eq!(json(8.0), "8");
        assert_eq!(json(-120.0), "-120");
        assert_eq!(json(-0.0), "0");
        assert_eq!(json(9007199254740993.0), "9007199254740992");
    }

    #[test]
    fn test_fractional_values() {
        assert_eq!(json(0.5), "0.5");
        assert_eq!(json(-100.25), "-100.25");
    }

    #[test]
    fn test_non_finite_values_are_null() {
        assert_eq!(json(f64::NEG_INFINITY), "null");
        assert_eq!(json(f64::NAN), "null");
    }

    #[test]
    fn test_null_reads_back_as_non_finite() {
        let n: Number = serde_json::from_str("null").unwrap();
        assert!(n.value().is_nan());
        assert_eq!(serde_json::to_string(&n).unwrap(), "null");
    }
}
