//! Compliance reports shared by the OP1A and IMF validators
//!
//! Validators do not stop at the first problem. Every rule is evaluated and
//! each failure is recorded as a [`Violation`], so a single report describes
//! everything wrong with a file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation stage that produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Operational Pattern 1A (ST 378)
    Op1a,
    /// IMF essence component constraints (ST 2067-5)
    Imf,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Op1a => f.write_str("OP1A"),
            Stage::Imf => f.write_str("IMF"),
        }
    }
}

/// OP1A rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op1aRule {
    /// Exactly one header partition, listed first
    SingleHeaderPartition,
    /// Operational pattern label is OP1A
    OperationalPattern,
    /// Non-empty essence container batches match the header partition
    EssenceContainerConsistency,
    /// At most one footer partition, listed last
    FooterPosition,
    /// Header metadata was read from a header partition
    HeaderPartitionKind,
    /// Preface operational pattern is OP1A
    PrefaceOperationalPattern,
}

/// IMF rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImfRule {
    /// Exactly one CDCI, RGBA or wave audio essence descriptor
    DescriptorCount,
    /// Essence descriptor lacks a field IMF requires
    RequiredField,
    /// Essence container is not an allowed generic container mapping
    GenericContainer,
    /// Header partition declares exactly one essence container
    SingleEssenceContainer,
    /// Partition mixes essence and index table segments
    EssenceAndIndexMixed,
}

/// Rule that a violation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    Op1a(Op1aRule),
    Imf(ImfRule),
}

impl From<Op1aRule> for Rule {
    fn from(rule: Op1aRule) -> Self {
        Rule::Op1a(rule)
    }
}

impl From<ImfRule> for Rule {
    fn from(rule: ImfRule) -> Self {
        Rule::Imf(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Op1a(rule) => write!(f, "OP1A/{:?}", rule),
            Rule::Imf(rule) => write!(f, "IMF/{:?}", rule),
        }
    }
}

/// A single rule failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule that failed
    pub rule: Rule,
    /// Resource offset of the offending partition or descriptor
    pub offset: Option<u64>,
    /// Human-readable message
    pub message: String,
}

impl Violation {
    pub fn new(rule: impl Into<Rule>, offset: Option<u64>, message: impl Into<String>) -> Self {
        Violation {
            rule: rule.into(),
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "[{}] at offset {}: {}", self.rule, offset, self.message),
            None => write!(f, "[{}] {}", self.rule, self.message),
        }
    }
}

/// All violations found by one validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Stage that ran
    pub stage: Stage,
    /// Violations in the order they were found
    pub violations: Vec<Violation>,
}

impl ComplianceReport {
    pub fn new(stage: Stage) -> Self {
        ComplianceReport {
            stage,
            violations: Vec::new(),
        }
    }

    /// Record a violation
    pub fn push(&mut self, rule: impl Into<Rule>, offset: Option<u64>, message: impl Into<String>) {
        self.violations.push(Violation::new(rule, offset, message));
    }

    /// Whether no rule failed
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether a given rule failed at least once
    pub fn has_violation(&self, rule: impl Into<Rule>) -> bool {
        let rule = rule.into();
        self.violations.iter().any(|v| v.rule == rule)
    }

    /// Violations of a given rule
    pub fn violations_of(&self, rule: impl Into<Rule>) -> Vec<&Violation> {
        let rule = rule.into();
        self.violations.iter().filter(|v| v.rule == rule).collect()
    }
}

impl fmt::Display for ComplianceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "; {}", violation)?;
        }
        Ok(())
    }
}
