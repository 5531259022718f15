//! Visibility predicate parser and evaluator

use crate::error::{CoreError, Result};
use crate::types::{AnswerValue, Answers};
use std::fmt;
use std::str::FromStr;

/// One `node_id.expected_answer` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityClause {
    pub node_id: String,
    pub expected: String,
}

impl VisibilityClause {
    /// Check the clause against accumulated answers
    pub fn holds(&self, answers: &Answers) -> bool {
        match answers.get(&self.node_id) {
            Some(AnswerValue::List(items)) => items.iter().any(|item| item == &self.expected),
            Some(answer) => answer.render() == self.expected,
            None => false,
        }
    }
}

/// Parsed conjunction of clauses
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibilityPredicate {
    clauses: Vec<VisibilityClause>,
}

impl VisibilityPredicate {
    /// Parse a predicate string.
    ///
    /// Blank predicates parse to an empty conjunction, which always holds.
    pub fn parse(predicate: &str) -> Result<Self> {
        let trimmed = predicate.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut clauses = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        // Split on standalone AND tokens
        for token in trimmed.split_whitespace() {
            if token == "AND" {
                clauses.push(Self::parse_clause(predicate, &current)?);
                current.clear();
            } else {
                current.push(token);
            }
        }
        clauses.push(Self::parse_clause(predicate, &current)?);

        Ok(Self { clauses })
    }

    fn parse_clause(predicate: &str, tokens: &[&str]) -> Result<VisibilityClause> {
        let error = |message: &str| CoreError::InvalidPredicate {
            predicate: predicate.to_string(),
            message: message.to_string(),
        };

        match tokens {
            [] => Err(error("empty clause")),
            [clause] => {
                let (node_id, expected) = clause
                    .split_once('.')
                    .ok_or_else(|| error(&format!("clause '{}' is not node_id.answer", clause)))?;
                if node_id.is_empty() || expected.is_empty() {
                    return Err(error(&format!("clause '{}' is not node_id.answer", clause)));
                }
                Ok(VisibilityClause {
                    node_id: node_id.to_string(),
                    expected: expected.to_string(),
                })
            }
            _ => Err(error(&format!(
                "clauses must be joined with AND, found '{}'",
                tokens.join(" ")
            ))),
        }
    }

    pub fn clauses(&self) -> &[VisibilityClause] {
        &self.clauses
    }

    /// True when every clause holds
    pub fn holds(&self, answers: &Answers) -> bool {
        self.clauses.iter().all(|clause| clause.holds(answers))
    }
}

impl FromStr for VisibilityPredicate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VisibilityPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .clauses
            .iter()
            .map(|c| format!("{}.{}", c.node_id, c.expected))
            .collect();
        f.write_str(&rendered.join(" AND "))
    }
}
