use std::cmp::Ordering;
use crate::utils::types::{Row, Value};

/// Comparison operators accepted in WHERE conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl ComparisonOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(ComparisonOp::Equal),
            "!=" | "<>" => Some(ComparisonOp::NotEqual),
            ">" => Some(ComparisonOp::GreaterThan),
            ">=" => Some(ComparisonOp::GreaterThanOrEqual),
            "<" => Some(ComparisonOp::LessThan),
            "<=" => Some(ComparisonOp::LessThanOrEqual),
            _ => None,
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Equal => ordering == Ordering::Equal,
            ComparisonOp::NotEqual => ordering != Ordering::Equal,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
        }
    }
}

/// One segment of an AND-chain
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `<column> <op> $<n>`; `param_slot` is the position among comparisons,
    /// the digits after `$` are ignored
    Comparison {
        column: String,
        op: ComparisonOp,
        param_slot: usize,
    },
    /// Segment of any other shape. Always satisfied, so a typo in a WHERE
    /// clause widens the match instead of failing the statement.
    Unmatched(String),
}

impl Condition {
    fn matches(&self, row: &Row, params: &[Value]) -> bool {
        match self {
            Condition::Unmatched(_) => true,
            Condition::Comparison { column, op, param_slot } => {
                let Some(param) = params.get(*param_slot) else {
                    return false;
                };
                match row.get(column) {
                    // absent column: only `!=` holds
                    None => *op == ComparisonOp::NotEqual,
                    Some(value) => value
                        .compare(param)
                        .map(|ord| op.accepts(ord))
                        .unwrap_or(*op == ComparisonOp::NotEqual),
                }
            }
        }
    }
}

/// AND-chain of single-column comparisons
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Predicate {
    pub conditions: Vec<Condition>,
}

impl Predicate {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// True when every condition holds for `row`
    pub fn evaluate(&self, row: &Row, params: &[Value]) -> bool {
        self.conditions.iter().all(|condition| condition.matches(row, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison(column: &str, op: ComparisonOp, param_slot: usize) -> Condition {
        Condition::Comparison { column: column.to_string(), op, param_slot }
    }

    fn holds(op: ComparisonOp, row: &Row, params: &[Value]) -> bool {
        Predicate::new(vec![comparison("age", op, 0)]).evaluate(row, params)
    }

    fn person(name: &str, age: i64) -> Row {
        Row::from_pairs(vec![("name", Value::from(name)), ("age", Value::from(age))])
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(ComparisonOp::from_symbol("<>"), Some(ComparisonOp::NotEqual));
        assert_eq!(ComparisonOp::from_symbol("!="), Some(ComparisonOp::NotEqual));
        assert_eq!(ComparisonOp::from_symbol(">="), Some(ComparisonOp::GreaterThanOrEqual));
        assert_eq!(ComparisonOp::from_symbol("=="), None);
    }

    #[test]
    fn test_and_chain_requires_all_conditions() {
        let predicate = Predicate::new(vec![
            comparison("age", ComparisonOp::GreaterThan, 0),
            comparison("name", ComparisonOp::Equal, 1),
        ]);
        let params = vec![Value::from(30), Value::from("Bob")];

        assert!(predicate.evaluate(&person("Bob", 40), &params));
        assert!(!predicate.evaluate(&person("Bob", 20), &params));
        assert!(!predicate.evaluate(&person("Alice", 40), &params));
    }

    #[test]
    fn test_unmatched_segment_is_fail_open() {
        let predicate = Predicate::new(vec![Condition::Unmatched("name LIKE 'A%'".to_string())]);

        assert!(predicate.evaluate(&person("Zed", 1), &[]));
        assert_eq!(predicate.conditions.len(), 1);
    }

    #[test]
    fn test_missing_parameter_never_matches() {
        let predicate = Predicate::new(vec![comparison("age", ComparisonOp::Equal, 0)]);
        assert!(!predicate.evaluate(&person("Bob", 25), &[]));
    }

    #[test]
    fn test_missing_parameter_fails_not_equal_too() {
        // an unbound slot rejects the row for every operator, `!=` included
        let predicate = Predicate::new(vec![
            comparison("name", ComparisonOp::Equal, 0),
            comparison("age", ComparisonOp::NotEqual, 1),
        ]);

        assert!(!predicate.evaluate(&person("Bob", 25), &[Value::from("Bob")]));
        assert!(predicate.evaluate(&person("Bob", 25), &[Value::from("Bob"), Value::from(30)]));
    }

    #[test]
    fn test_absent_column_only_satisfies_not_equal() {
        let row = Row::from_pairs(vec![("name", Value::from("Bob"))]);
        let params = vec![Value::from(1)];

        assert!(!holds(ComparisonOp::Equal, &row, &params));
        assert!(!holds(ComparisonOp::LessThan, &row, &params));
        assert!(holds(ComparisonOp::NotEqual, &row, &params));
    }

    #[test]
    fn test_mixed_kinds_compare_unequal() {
        let predicate = Predicate::new(vec![comparison("age", ComparisonOp::NotEqual, 0)]);
        assert!(predicate.evaluate(&person("Bob", 25), &[Value::from("25")]));

        let predicate = Predicate::new(vec![comparison("age", ComparisonOp::GreaterThan, 0)]);
        assert!(!predicate.evaluate(&person("Bob", 25), &[Value::from("1")]));
    }

    #[test]
    fn test_inclusive_bounds() {
        let row = person("Bob", 25);
        let params = vec![Value::Float(25.0)];

        assert!(holds(ComparisonOp::GreaterThanOrEqual, &row, &params));
        assert!(holds(ComparisonOp::LessThanOrEqual, &row, &params));
        assert!(!holds(ComparisonOp::LessThan, &row, &params));
    }
}
