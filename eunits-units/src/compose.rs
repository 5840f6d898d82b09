//! Dimensional composition rules
//!
//! A rule says what dimension results from multiplying or dividing two
//! dimensions, and which operand's unit family names the result
//! (MW × h should give MWh, not a base-unit label scaled by 1000).

use serde::{Deserialize, Serialize};

use crate::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[serde(alias = "*", alias = "mul")]
    Multiply,
    #[serde(alias = "/", alias = "div")]
    Divide,
}

/// Where the preferred result unit comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSource {
    /// Corresponding unit of the left operand (MW → MWh)
    Lhs,
    /// Corresponding unit of the right operand
    Rhs,
    /// Base unit of the result dimension
    Base,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRule {
    pub lhs: Dimension,
    pub rhs: Dimension,
    pub op: Operator,
    pub result: Dimension,
    pub unit_source: UnitSource,
}

impl CompositionRule {
    pub fn new(
        lhs: Dimension,
        op: Operator,
        rhs: Dimension,
        result: Dimension,
        unit_source: UnitSource,
    ) -> Self {
        CompositionRule {
            lhs,
            rhs,
            op,
            result,
            unit_source,
        }
    }

    pub fn matches(&self, lhs: &Dimension, rhs: &Dimension, op: Operator) -> bool {
        self.op == op && self.lhs == *lhs && self.rhs == *rhs
    }
}

/// Rules for the power/energy/time triangle
pub fn default_rules() -> Vec<CompositionRule> {
    use Dimension as D;
    vec![
        CompositionRule::new(D::POWER, Operator::Multiply, D::TIME, D::ENERGY, UnitSource::Lhs),
        CompositionRule::new(D::TIME, Operator::Multiply, D::POWER, D::ENERGY, UnitSource::Rhs),
        CompositionRule::new(D::ENERGY, Operator::Divide, D::TIME, D::POWER, UnitSource::Lhs),
        CompositionRule::new(D::ENERGY, Operator::Divide, D::POWER, D::TIME, UnitSource::Base),
    ]
}

/// Resulting dimension of `a op b`, and the rule's unit source when a rule matched.
///
/// Resolution order: rule table, same-dimension division (dimensionless),
/// dimensionless identity, cancellation of a literal quotient tag, and
/// finally a literal compound tag. Never fails.
pub fn compose_dimension(
    rules: &[CompositionRule],
    a: &Dimension,
    b: &Dimension,
    op: Operator,
) -> (Dimension, Option<UnitSource>) {
    if let Some(rule) = rules.iter().rev().find(|r| r.matches(a, b, op)) {
        return (rule.result.clone(), Some(rule.unit_source));
    }

    match op {
        Operator::Divide if a == b => (Dimension::DIMENSIONLESS, None),
        Operator::Divide if b.is_dimensionless() => (a.clone(), None),
        Operator::Multiply if a.is_dimensionless() => (b.clone(), None),
        Operator::Multiply if b.is_dimensionless() => (a.clone(), None),
        Operator::Multiply => {
            // X_PER_Y × Y → X
            for (quotient, other) in [(a, b), (b, a)] {
                if let Some((num, den)) = quotient.split_per() {
                    if den == *other {
                        return (num, None);
                    }
                }
            }
            (a.times(b), None)
        }
        Operator::Divide => {
            // X / X_PER_Y → Y
            if let Some((num, den)) = b.split_per() {
                if num == *a {
                    return (den, None);
                }
            }
            (a.per(b), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table_power_time() {
        let rules = default_rules();
        let (dim, src) = compose_dimension(&rules, &Dimension::POWER, &Dimension::TIME, Operator::Multiply);
        assert_eq!(dim, Dimension::ENERGY);
        assert_eq!(src, Some(UnitSource::Lhs));

        let (dim, src) = compose_dimension(&rules, &Dimension::TIME, &Dimension::POWER, Operator::Multiply);
        assert_eq!(dim, Dimension::ENERGY);
        assert_eq!(src, Some(UnitSource::Rhs));

        let (dim, _) = compose_dimension(&rules, &Dimension::ENERGY, &Dimension::TIME, Operator::Divide);
        assert_eq!(dim, Dimension::POWER);

        let (dim, src) = compose_dimension(&rules, &Dimension::ENERGY, &Dimension::POWER, Operator::Divide);
        assert_eq!(dim, Dimension::TIME);
        assert_eq!(src, Some(UnitSource::Base));
    }

    #[test]
    fn test_same_dimension_divides_to_dimensionless() {
        let (dim, src) = compose_dimension(&[], &Dimension::MASS, &Dimension::MASS, Operator::Divide);
        assert!(dim.is_dimensionless());
        assert!(src.is_none());
    }

    #[test]
    fn test_literal_fallback() {
        let (dim, _) = compose_dimension(&[], &Dimension::ENERGY, &Dimension::MASS, Operator::Multiply);
        assert_eq!(dim.as_str(), "ENERGY·MASS");
        let (dim, _) = compose_dimension(&[], &Dimension::CURRENCY, &Dimension::ENERGY, Operator::Divide);
        assert_eq!(dim.as_str(), "CURRENCY_PER_ENERGY");
    }

    #[test]
    fn test_quotient_cancellation() {
        let price = Dimension::CURRENCY.per(&Dimension::POWER);
        let (dim, _) = compose_dimension(&[], &price, &Dimension::POWER, Operator::Multiply);
        assert_eq!(dim, Dimension::CURRENCY);
        let (dim, _) = compose_dimension(&[], &Dimension::POWER, &price, Operator::Multiply);
        assert_eq!(dim, Dimension::CURRENCY);
        let (dim, _) = compose_dimension(&[], &Dimension::CURRENCY, &price, Operator::Divide);
        assert_eq!(dim, Dimension::POWER);
    }

    #[test]
    fn test_dimensionless_identity() {
        let (dim, _) = compose_dimension(&[], &Dimension::DIMENSIONLESS, &Dimension::MASS, Operator::Multiply);
        assert_eq!(dim, Dimension::MASS);
        let (dim, _) = compose_dimension(&[], &Dimension::ENERGY, &Dimension::DIMENSIONLESS, Operator::Divide);
        assert_eq!(dim, Dimension::ENERGY);
    }

    #[test]
    fn test_operator_aliases() {
        let op: Operator = serde_json::from_str("\"*\"").unwrap();
        assert_eq!(op, Operator::Multiply);
        let rule: CompositionRule = serde_json::from_str(
            r#"{"lhs":"ENERGY","rhs":"TIME","op":"divide","result":"POWER","unit_source":"lhs"}"#,
        )
        .unwrap();
        assert_eq!(rule.unit_source, UnitSource::Lhs);
    }
}
