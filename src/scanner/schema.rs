//! Vulnerability findings and the severity roll-up.

use crate::parser::primitives::{Address, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Finding severity, least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "INFO",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// A single heuristic finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    /// Stable tag, e.g. "REENTRANCY"
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub recommendation: String,
    pub affected_contracts: BTreeSet<Address>,
    pub affected_functions: BTreeSet<Selector>,
    pub occurrence_count: u32,
}

/// All findings for one transaction.
///
/// Counts are never stored: they are computed from `vulnerabilities` on
/// demand and when serializing, and ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ReportRepr", from = "ReportRepr")]
pub struct VulnerabilityReport {
    vulnerabilities: Vec<Vulnerability>,
}

impl VulnerabilityReport {
    pub fn new(vulnerabilities: Vec<Vulnerability>) -> Self {
        Self { vulnerabilities }
    }

    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        &self.vulnerabilities
    }

    pub fn total_issues(&self) -> usize {
        self.vulnerabilities.len()
    }

    pub fn critical_count(&self) -> usize {
        self.count(|s| s == Severity::Critical)
    }

    pub fn high_count(&self) -> usize {
        self.count(|s| s == Severity::High)
    }

    pub fn medium_count(&self) -> usize {
        self.count(|s| s == Severity::Medium)
    }

    /// LOW and INFO both roll up here
    pub fn low_count(&self) -> usize {
        self.count(|s| matches!(s, Severity::Low | Severity::Info))
    }

    pub fn is_clean(&self) -> bool {
        self.vulnerabilities.is_empty()
    }

    /// Highest severity present, if any
    pub fn max_severity(&self) -> Option<Severity> {
        self.vulnerabilities.iter().map(|v| v.severity).max()
    }

    fn count(&self, pred: impl Fn(Severity) -> bool) -> usize {
        self.vulnerabilities
            .iter()
            .filter(|v| pred(v.severity))
            .count()
    }
}

/// Wire shape of a report
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRepr {
    vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    total_issues: usize,
    #[serde(default)]
    critical_count: usize,
    #[serde(default)]
    high_count: usize,
    #[serde(default)]
    medium_count: usize,
    #[serde(default)]
    low_count: usize,
}

impl From<VulnerabilityReport> for ReportRepr {
    fn from(report: VulnerabilityReport) -> Self {
        Self {
            total_issues: report.total_issues(),
            critical_count: report.critical_count(),
            high_count: report.high_count(),
            medium_count: report.medium_count(),
            low_count: report.low_count(),
            vulnerabilities: report.vulnerabilities,
        }
    }
}

impl From<ReportRepr> for VulnerabilityReport {
    fn from(repr: ReportRepr) -> Self {
        Self::new(repr.vulnerabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(id: &str, severity: Severity) -> Vulnerability {
        Vulnerability {
            id: id.to_string(),
            name: id.to_string(),
            severity,
            description: String::new(),
            recommendation: String::new(),
            affected_contracts: BTreeSet::new(),
            affected_functions: BTreeSet::new(),
            occurrence_count: 1,
        }
    }

    #[test]
    fn test_counts_roll_up() {
        let report = VulnerabilityReport::new(vec![
            finding("A", Severity::Critical),
            finding("B", Severity::High),
            finding("C", Severity::High),
            finding("D", Severity::Medium),
            finding("E", Severity::Low),
            finding("F", Severity::Info),
        ]);

        assert_eq!(report.total_issues(), 6);
        assert_eq!(report.critical_count(), 1);
        assert_eq!(report.high_count(), 2);
        assert_eq!(report.medium_count(), 1);
        assert_eq!(report.low_count(), 2);
        assert_eq!(
            report.total_issues(),
            report.critical_count() + report.high_count() + report.medium_count() + report.low_count()
        );
        assert_eq!(report.max_severity(), Some(Severity::Critical));
    }

    #[test]
    fn test_serialized_counts() {
        let report = VulnerabilityReport::new(vec![finding("A", Severity::High)]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["totalIssues"], 1);
        assert_eq!(json["highCount"], 1);
        assert_eq!(json["lowCount"], 0);
        assert_eq!(json["vulnerabilities"][0]["severity"], "HIGH");
    }

    #[test]
    fn test_stale_counts_ignored_on_read() {
        let json = serde_json::json!({
            "vulnerabilities": [],
            "totalIssues": 7,
            "highCount": 7
        });
        let report: VulnerabilityReport = serde_json::from_value(json).unwrap();
        assert_eq!(report.total_issues(), 0);
        assert_eq!(report.high_count(), 0);
    }
}
