//! Custom bins: derived categorical columns
//!
//! A bin is compiled into `CASE WHEN .. THEN .. ELSE .. END`. Rules are tested
//! top to bottom and the first match wins, so rule order is never changed.

use crate::query_builder::filter::Predicate;
use crate::query_builder::literal::Literal;
use serde::{Deserialize, Serialize};

/// One `WHEN predicate THEN label` arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinRule {
    pub predicate: Predicate,
    pub label: Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBin {
    /// Output alias of the derived column
    pub name: String,
    /// Column every rule is tested against
    pub column: String,
    pub rules: Vec<BinRule>,
    /// Label when no rule matches
    #[serde(default = "null_label")]
    pub default_label: Literal,
}

fn null_label() -> Literal {
    Literal::Null
}

impl CustomBin {
    pub fn new(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            rules: Vec::new(),
            default_label: Literal::Null,
        }
    }

    /// Append a rule after the existing ones
    pub fn when(mut self, predicate: Predicate, label: impl Into<Literal>) -> Self {
        self.rules.push(BinRule {
            predicate,
            label: label.into(),
        });
        self
    }

    /// Set the ELSE label
    pub fn otherwise(mut self, label: impl Into<Literal>) -> Self {
        self.default_label = label.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::filter::ComparisonOperator;

    #[test]
    fn test_rules_keep_insertion_order() {
        let bin = CustomBin::new("size", "amount")
            .when(Predicate::comparison(ComparisonOperator::Lt, 10), "small")
            .when(Predicate::comparison(ComparisonOperator::Lt, 100), "medium")
            .otherwise("large");

        let labels: Vec<&Literal> = bin.rules.iter().map(|r| &r.label).collect();
        assert_eq!(labels, vec![&Literal::from("small"), &Literal::from("medium")]);
        assert_eq!(bin.default_label, Literal::from("large"));
    }

    #[test]
    fn test_default_label_is_null() {
        let bin: CustomBin = serde_json::from_value(serde_json::json!({
            "name": "b",
            "column": "c",
            "rules": []
        }))
        .unwrap();
        assert_eq!(bin.default_label, Literal::Null);
    }
}
