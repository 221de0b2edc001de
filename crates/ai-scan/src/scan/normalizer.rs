use super::answers::RawAnswer;

/// Canonical form of a stored answer: a usable number or nothing at all.
///
/// Kept separate from `Option<f64>` so that "missing" can never be confused
/// with a numeric zero while scores are aggregated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    Value(f64),
    Missing,
}

impl Normalized {
    pub fn value(self) -> Option<f64> {
        match self {
            Normalized::Value(value) => Some(value),
            Normalized::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Normalized::Missing)
    }
}

/// Coerce a stored answer into a number. Never fails; garbage becomes `Missing`.
pub fn normalize(raw: Option<&RawAnswer>) -> Normalized {
    match raw {
        None => Normalized::Missing,
        Some(RawAnswer::Bool(true)) => Normalized::Value(1.0),
        Some(RawAnswer::Bool(false)) => Normalized::Value(0.0),
        Some(RawAnswer::Number(value)) => finite(*value),
        Some(RawAnswer::Text(text)) => parse_text(text),
        Some(RawAnswer::Other(value)) => match value {
            serde_json::Value::Number(number) => number.as_f64().map_or(Normalized::Missing, finite),
            serde_json::Value::String(text) => parse_text(text),
            serde_json::Value::Bool(flag) => normalize(Some(&RawAnswer::Bool(*flag))),
            _ => Normalized::Missing,
        },
    }
}

fn parse_text(text: &str) -> Normalized {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Normalized::Missing;
    }

    trimmed
        .parse::<f64>()
        .map_or(Normalized::Missing, finite)
}

fn finite(value: f64) -> Normalized {
    if value.is_finite() {
        Normalized::Value(value)
    } else {
        Normalized::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(raw: RawAnswer) -> Normalized {
        normalize(Some(&raw))
    }

    #[test]
    fn absent_and_null_are_missing() {
        assert_eq!(normalize(None), Normalized::Missing);
        assert_eq!(norm(RawAnswer::Other(serde_json::Value::Null)), Normalized::Missing);
    }

    #[test]
    fn booleans_map_to_one_and_zero() {
        assert_eq!(norm(RawAnswer::Bool(true)), Normalized::Value(1.0));
        assert_eq!(norm(RawAnswer::Bool(false)), Normalized::Value(0.0));
    }

    #[test]
    fn numeric_text_is_coerced() {
        assert_eq!(norm(RawAnswer::from(" 4 ")), Normalized::Value(4.0));
        assert_eq!(norm(RawAnswer::from("2.5")), Normalized::Value(2.5));
        assert_eq!(norm(RawAnswer::from("-1")), Normalized::Value(-1.0));
    }

    #[test]
    fn unusable_values_degrade_to_missing() {
        assert!(norm(RawAnswer::from("veel")).is_missing());
        assert!(norm(RawAnswer::from("   ")).is_missing());
        assert!(norm(RawAnswer::from("NaN")).is_missing());
        assert!(norm(RawAnswer::from("inf")).is_missing());
        assert!(norm(RawAnswer::Number(f64::NAN)).is_missing());
        assert!(norm(RawAnswer::Other(serde_json::json!([3]))).is_missing());
        assert!(norm(RawAnswer::Other(serde_json::json!({ "value": 3 }))).is_missing());
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(norm(RawAnswer::Number(3.0)).value(), Some(3.0));
    }
}
