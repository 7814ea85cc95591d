//! Analyzer module - page audit engine

pub mod engine;
pub mod page_info;
pub mod rules;
pub mod scoring;

pub use engine::{AggregateStats, AuditEngine, AuditTarget};
pub use rules::{find_rule, rule_table, CategoryAnalyzer, RuleSpec};
pub use scoring::ScoreCalculator;
