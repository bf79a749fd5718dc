//! Categorical cell values and the missing-data marker.

use std::{cmp::Ordering, fmt};

use polars::prelude::DataType;
use serde::Serialize;

/// A single categorical value read from an outcome or risk-factor column.
///
/// Levels have a total natural order: booleans, then numbers (integers and
/// floats compared exactly by value, `-0.0 == 0.0`, NaN last), then strings.
/// Equality follows that order, so `Level::Int(1) == Level::Float(1.0)`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Level {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Level {
    /// Type a raw text value the way CSV columns are typed on ingest.
    pub fn infer(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            Level::Int(v)
        } else if let Ok(v) = raw.parse::<f64>() {
            Level::Float(v)
        } else {
            Level::Str(raw.to_string())
        }
    }

    /// Type a raw text value to match a column of the given dtype: text
    /// columns keep it as a string even when it looks numeric.
    pub fn for_dtype(raw: &str, dtype: &DataType) -> Self {
        match dtype {
            DataType::Boolean => raw
                .parse::<bool>()
                .map(Level::Bool)
                .unwrap_or_else(|_| Level::infer(raw)),
            dt if dt.is_integer() || dt.is_float() => Level::infer(raw),
            _ => Level::Str(raw.to_string()),
        }
    }

    /// True for values that are always missing, whatever the sentinel.
    pub fn is_blank(&self) -> bool {
        match self {
            Level::Float(v) => v.is_nan(),
            Level::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Level::Bool(_) => 0,
            Level::Int(_) | Level::Float(_) => 1,
            Level::Str(_) => 2,
        }
    }
}

fn cmp_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Exact comparison of an integer with a float, without rounding the integer.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    const TWO_63: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() || f >= TWO_63 {
        return Ordering::Less;
    }
    if f < -TWO_63 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    i.cmp(&(whole as i64)).then_with(|| cmp_floats(whole, f))
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Level::Bool(a), Level::Bool(b)) => a.cmp(b),
            (Level::Int(a), Level::Int(b)) => a.cmp(b),
            (Level::Str(a), Level::Str(b)) => a.cmp(b),
            (Level::Float(a), Level::Float(b)) => cmp_floats(*a, *b),
            (Level::Int(a), Level::Float(b)) => cmp_int_float(*a, *b),
            (Level::Float(a), Level::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Level {}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Bool(v) => write!(f, "{v}"),
            Level::Int(v) => write!(f, "{v}"),
            Level::Float(v) => write!(f, "{v}"),
            Level::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        Level::Bool(value)
    }
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Level::Int(value)
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level::Int(i64::from(value))
    }
}

impl From<f64> for Level {
    fn from(value: f64) -> Self {
        Level::Float(value)
    }
}

impl From<&str> for Level {
    fn from(value: &str) -> Self {
        Level::Str(value.to_string())
    }
}

impl From<String> for Level {
    fn from(value: String) -> Self {
        Level::Str(value)
    }
}

/// Which values, beyond nulls, NaN and empty strings, count as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Missing {
    /// Only nulls, NaN and empty strings.
    #[default]
    NaN,
    /// A caller sentinel such as `"missing"` or `-999`.
    Value(Level),
    /// A sentinel given as text; matches any cell whose text form is identical,
    /// whatever the column type (`"-999"` matches `Int(-999)` and `Str("-999")`).
    Text(String),
}

impl Missing {
    /// Sentinel from an optional raw string; `NaN` or nothing means the default policy.
    pub fn from_sentinel(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if !s.is_empty() && !s.eq_ignore_ascii_case("nan") => {
                Missing::Text(s.to_string())
            }
            _ => Missing::NaN,
        }
    }

    /// Apply the policy to a value read from a column.
    pub fn filter(&self, value: Option<Level>) -> Option<Level> {
        let value = value?;
        if value.is_blank() {
            return None;
        }
        match self {
            Missing::Value(sentinel) if *sentinel == value => None,
            Missing::Text(sentinel) if *sentinel == value.to_string() => None,
            _ => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_levels_compare_across_int_and_float() {
        assert_eq!(Level::Int(1), Level::Float(1.0));
        assert!(Level::Int(2) > Level::Float(1.5));
        assert!(Level::Bool(true) < Level::Int(-10));
        assert!(Level::Int(1000) < Level::Str("a".into()));
    }

    #[test]
    fn infer_prefers_integers_then_floats() {
        assert_eq!(Level::infer("3"), Level::Int(3));
        assert!(matches!(Level::infer("2.5"), Level::Float(_)));
        assert!(matches!(Level::infer("yes"), Level::Str(_)));
    }

    #[test]
    fn sentinel_is_case_sensitive() {
        let missing = Missing::Value("missing".into());
        assert_eq!(missing.filter(Some("missing".into())), None);
        assert_eq!(
            missing.filter(Some("Missing".into())),
            Some(Level::from("Missing"))
        );
    }

    #[test]
    fn blanks_are_missing_under_every_policy() {
        for policy in [Missing::NaN, Missing::Value(Level::Int(-999))] {
            assert_eq!(policy.filter(Some(Level::Str(String::new()))), None);
            assert_eq!(policy.filter(Some(Level::Float(f64::NAN))), None);
            assert_eq!(policy.filter(None), None);
        }
        assert_eq!(Missing::Value(Level::Int(-999)).filter(Some(Level::Int(-999))), None);
    }

    #[test]
    fn nan_sentinel_string_means_default_policy() {
        assert_eq!(Missing::from_sentinel(Some("NaN")), Missing::NaN);
        assert_eq!(Missing::from_sentinel(None), Missing::NaN);
        assert_eq!(
            Missing::from_sentinel(Some("-1")),
            Missing::Text("-1".into())
        );
    }

    #[test]
    fn text_sentinel_matches_any_column_type() {
        let missing = Missing::from_sentinel(Some("-999"));
        assert_eq!(missing.filter(Some(Level::Int(-999))), None);
        assert_eq!(missing.filter(Some(Level::Float(-999.0))), None);
        assert_eq!(missing.filter(Some(Level::Str("-999".into()))), None);
        assert_eq!(missing.filter(Some(Level::Int(999))), Some(Level::Int(999)));
    }

    #[test]
    fn signed_zero_is_one_level() {
        assert_eq!(Level::Float(-0.0), Level::Float(0.0));
        assert_eq!(Level::Float(-0.0), Level::Int(0));
        assert!(Level::Float(-0.5) < Level::Float(0.0));
    }

    #[test]
    fn large_integers_compare_exactly_with_floats() {
        let big = 1i64 << 53;
        assert_eq!(Level::Int(big), Level::Float(big as f64));
        assert_ne!(Level::Int(big + 1), Level::Float(big as f64));
        assert!(Level::Int(big + 1) > Level::Float(big as f64));
        assert!(Level::Int(i64::MAX) < Level::Float(f64::MAX));
        assert!(Level::Int(-3) > Level::Float(-3.5));
        assert!(Level::Int(3) < Level::Float(3.5));
        assert!(Level::Float(f64::NAN) > Level::Int(i64::MAX));
    }

    #[test]
    fn values_typed_against_the_column_dtype() {
        assert_eq!(Level::for_dtype("0", &DataType::String), Level::Str("0".into()));
        assert_eq!(Level::for_dtype("0", &DataType::Int64), Level::Int(0));
        assert_eq!(Level::for_dtype("0.5", &DataType::Float64), Level::Float(0.5));
        assert_eq!(Level::for_dtype("true", &DataType::Boolean), Level::Bool(true));
    }
}
