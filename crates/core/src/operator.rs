//! Sort-key operators for the query surface.

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Operator applied to the sort key in a query condition.
///
/// `Contains` is part of the wire vocabulary but has no key-condition
/// translation; the condition builder rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    BeginsWith,
    Between,
    Contains,
}

impl Operator {
    /// The operator's wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::BeginsWith => "begins_with",
            Operator::Between => "between",
            Operator::Contains => "contains",
        }
    }

    /// Whether this is a plain comparison usable inline in a condition
    /// expression (`sk <op> :sk`).
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Operator, StoreError> {
        match s {
            "=" => Ok(Operator::Eq),
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            ">=" => Ok(Operator::Ge),
            "<=" => Ok(Operator::Le),
            "begins_with" => Ok(Operator::BeginsWith),
            "between" => Ok(Operator::Between),
            "contains" => Ok(Operator::Contains),
            other => Err(StoreError::InvalidOperator(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_operators() {
        for (text, expected) in [
            ("=", Operator::Eq),
            (">", Operator::Gt),
            ("<", Operator::Lt),
            (">=", Operator::Ge),
            ("<=", Operator::Le),
            ("begins_with", Operator::BeginsWith),
            ("between", Operator::Between),
            ("contains", Operator::Contains),
        ] {
            assert_eq!(text.parse::<Operator>().unwrap(), expected);
            assert_eq!(expected.as_str(), text);
        }
    }

    #[test]
    fn test_unknown_operator_fails() {
        assert_eq!(
            "like".parse::<Operator>(),
            Err(StoreError::InvalidOperator("like".to_string()))
        );
    }

    #[test]
    fn test_is_comparison() {
        assert!(Operator::Ge.is_comparison());
        assert!(!Operator::BeginsWith.is_comparison());
        assert!(!Operator::Between.is_comparison());
        assert!(!Operator::Contains.is_comparison());
    }
}
