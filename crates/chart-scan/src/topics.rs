//! The canonical topic list.
//!
//! Topic columns appear left to right in this order on the chart, and every
//! [`AnalysisResult`](crate::AnalysisResult) reports them in this order.

use std::fmt;

/// One independently scored subject area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    EthicalAndProfessionalStandards,
    QuantitativeMethods,
    Economics,
    FinancialStatementAnalysis,
    CorporateIssues,
    EquityInvestments,
    FixedIncome,
    Derivatives,
    AlternativeInvestments,
    PortfolioManagement,
}

impl Topic {
    /// Number of topic columns on a chart.
    pub const COUNT: usize = 10;

    /// All topics in chart order.
    pub const ALL: [Topic; Topic::COUNT] = [
        Topic::EthicalAndProfessionalStandards,
        Topic::QuantitativeMethods,
        Topic::Economics,
        Topic::FinancialStatementAnalysis,
        Topic::CorporateIssues,
        Topic::EquityInvestments,
        Topic::FixedIncome,
        Topic::Derivatives,
        Topic::AlternativeInvestments,
        Topic::PortfolioManagement,
    ];

    /// Position of the topic column, counted from the left.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label as printed on the chart.
    pub fn label(self) -> &'static str {
        match self {
            Topic::EthicalAndProfessionalStandards => "Ethical and Professional Standards",
            Topic::QuantitativeMethods => "Quantitative Methods",
            Topic::Economics => "Economics",
            Topic::FinancialStatementAnalysis => "Financial Statement Analysis",
            Topic::CorporateIssues => "Corporate Issues",
            Topic::EquityInvestments => "Equity Investments",
            Topic::FixedIncome => "Fixed Income",
            Topic::Derivatives => "Derivatives",
            Topic::AlternativeInvestments => "Alternative Investments",
            Topic::PortfolioManagement => "Portfolio Management",
        }
    }

    /// Look a topic up by its label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Topic> {
        Topic::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
