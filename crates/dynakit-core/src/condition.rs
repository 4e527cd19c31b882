//! Comparison conditions for key conditions and legacy filters.
//!
//! A [`Condition`] is an operator plus its already-encoded operands. Operand
//! counts are checked by [`Condition::validate`], which request assembly calls
//! for every condition it serializes.

use std::collections::HashMap;
use std::fmt;

use dynakit_model::AttributeValue;
use dynakit_model::types::{self, ComparisonOperator};

use crate::error::{Error, Result};

/// Wire conditions keyed by attribute name (`KeyConditions`, `ScanFilter`, ...).
pub type ConditionMap = HashMap<String, types::Condition>;

/// Operator plus operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    operator: ComparisonOperator,
    operands: Vec<AttributeValue>,
}

impl Condition {
    /// Build a condition without checking operands.
    #[must_use]
    pub fn new(operator: ComparisonOperator, operands: Vec<AttributeValue>) -> Self {
        Self { operator, operands }
    }

    fn unary(operator: ComparisonOperator, operand: AttributeValue) -> Self {
        Self::new(operator, vec![operand])
    }

    /// Equal to.
    #[must_use]
    pub fn eq(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::Eq, operand)
    }

    /// Not equal to.
    #[must_use]
    pub fn ne(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::Ne, operand)
    }

    /// Less than or equal to.
    #[must_use]
    pub fn le(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::Le, operand)
    }

    /// Less than.
    #[must_use]
    pub fn lt(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::Lt, operand)
    }

    /// Greater than or equal to.
    #[must_use]
    pub fn ge(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::Ge, operand)
    }

    /// Greater than.
    #[must_use]
    pub fn gt(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::Gt, operand)
    }

    /// Starts with.
    #[must_use]
    pub fn begins_with(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::BeginsWith, operand)
    }

    /// Contains (substring or set member).
    #[must_use]
    pub fn contains(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::Contains, operand)
    }

    /// Does not contain.
    #[must_use]
    pub fn not_contains(operand: AttributeValue) -> Self {
        Self::unary(ComparisonOperator::NotContains, operand)
    }

    /// Attribute does not exist.
    #[must_use]
    pub fn null() -> Self {
        Self::new(ComparisonOperator::Null, Vec::new())
    }

    /// Attribute exists.
    #[must_use]
    pub fn not_null() -> Self {
        Self::new(ComparisonOperator::NotNull, Vec::new())
    }

    /// Between `low` and `high`, inclusive. Both bounds must share a wire type.
    pub fn between(low: AttributeValue, high: AttributeValue) -> Result<Self> {
        let condition = Self::new(ComparisonOperator::Between, vec![low, high]);
        condition.validate()?;
        Ok(condition)
    }

    /// One of `values`. An empty list is accepted but can never match.
    #[must_use]
    pub fn in_list(values: impl IntoIterator<Item = AttributeValue>) -> Self {
        Self::new(ComparisonOperator::In, values.into_iter().collect())
    }

    /// The operator.
    #[must_use]
    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// The encoded operands.
    #[must_use]
    pub fn operands(&self) -> &[AttributeValue] {
        &self.operands
    }

    /// Whether the condition can never match (`IN` with no operands).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.operator == ComparisonOperator::In && self.operands.is_empty()
    }

    /// Check operand count and, for `BETWEEN`, that both bounds share a type.
    pub fn validate(&self) -> Result<()> {
        let count = self.operands.len();
        let expected = match self.operator {
            ComparisonOperator::Null | ComparisonOperator::NotNull => 0,
            ComparisonOperator::Between => 2,
            ComparisonOperator::In => return Ok(()),
            _ => 1,
        };
        if count != expected {
            return Err(Error::InvalidConditionOperands(format!(
                "{} takes {expected} operand(s), got {count}",
                self.operator
            )));
        }
        if let [low, high] = self.operands.as_slice() {
            if low.type_descriptor() != high.type_descriptor() {
                return Err(Error::InvalidConditionOperands(format!(
                    "BETWEEN bounds must share a type, got {} and {}",
                    low.type_descriptor(),
                    high.type_descriptor()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operator)?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}

impl From<Condition> for types::Condition {
    fn from(condition: Condition) -> Self {
        Self {
            comparison_operator: condition.operator,
            attribute_value_list: condition.operands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: &str) -> AttributeValue {
        AttributeValue::N(v.to_owned())
    }

    fn s(v: &str) -> AttributeValue {
        AttributeValue::S(v.to_owned())
    }

    #[test]
    fn test_should_build_between_with_matching_types() {
        let cond = Condition::between(n("1"), n("10")).unwrap();
        assert_eq!(cond.operator(), ComparisonOperator::Between);
        assert_eq!(cond.operands().len(), 2);
    }

    #[test]
    fn test_should_reject_between_with_mixed_types() {
        let err = Condition::between(n("1"), s("10")).unwrap_err();
        assert!(matches!(err, Error::InvalidConditionOperands(_)));
    }

    #[test]
    fn test_should_build_existence_checks_without_operands() {
        for cond in [Condition::null(), Condition::not_null()] {
            assert!(cond.operands().is_empty());
            cond.validate().unwrap();
        }
    }

    #[test]
    fn test_should_accept_empty_in_list_as_noop() {
        let cond = Condition::in_list(Vec::<AttributeValue>::new());
        cond.validate().unwrap();
        assert!(cond.is_noop());
        assert!(!Condition::in_list([s("a")]).is_noop());
    }

    #[test]
    fn test_should_check_arity_of_dynamic_conditions() {
        let err = Condition::new(ComparisonOperator::Null, vec![s("a")])
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid condition operands: NULL takes 0 operand(s), got 1"
        );
        assert!(Condition::new(ComparisonOperator::Gt, vec![]).validate().is_err());
        assert!(
            Condition::new(ComparisonOperator::Between, vec![n("1")])
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_should_convert_to_wire_condition() {
        let wire = types::Condition::from(Condition::begins_with(s("ab")));
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ComparisonOperator": "BEGINS_WITH", "AttributeValueList": [{"S": "ab"}]})
        );
    }

    #[test]
    fn test_should_display_operator_and_operands() {
        assert_eq!(Condition::ge(n("10")).to_string(), "GE {N: 10}");
        assert_eq!(Condition::not_null().to_string(), "NOT_NULL");
    }
}
