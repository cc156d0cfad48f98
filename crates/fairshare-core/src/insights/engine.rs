//! Insight engine - runs every registered analyzer over one space snapshot

use chrono::{DateTime, Utc};

use crate::config::InsightConfig;
use crate::models::{Member, Task};

use super::activity::MemberActivityAnalyzer;
use super::habits::CategoryFrequencyAnalyzer;
use super::types::Insight;

/// Snapshot handed to analyzers
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub space_id: &'a str,
    /// Every task of the space, any status
    pub tasks: &'a [Task],
    pub members: &'a [Member],
    pub now: DateTime<Utc>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        space_id: &'a str,
        tasks: &'a [Task],
        members: &'a [Member],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            space_id,
            tasks,
            members,
            now,
        }
    }
}

/// A pure analysis over a space snapshot
pub trait Analyzer: Send + Sync {
    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Analyze data and produce insights
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// Runs analyzers in registration order
pub struct InsightEngine {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(&InsightConfig::default())
    }
}

impl InsightEngine {
    /// Create an engine with the built-in analyzers
    pub fn new(config: &InsightConfig) -> Self {
        let mut engine = Self::empty();

        engine.register(Box::new(CategoryFrequencyAnalyzer::new(config)));
        engine.register(Box::new(MemberActivityAnalyzer::new(config)));

        engine
    }

    /// Create an engine with no analyzers
    pub fn empty() -> Self {
        Self { analyzers: vec![] }
    }

    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    /// Run all analyzers and collect their insights
    ///
    /// Output keeps registration order: category predictions first, then
    /// member insights.
    pub fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut all_insights = vec![];

        for analyzer in &self.analyzers {
            let insights = analyzer.analyze(ctx);
            tracing::debug!(
                analyzer = analyzer.name(),
                space = ctx.space_id,
                count = insights.len(),
                "Insight analysis complete"
            );
            all_insights.extend(insights);
        }

        all_insights
    }

    /// Names of registered analyzers
    pub fn analyzer_names(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }
}
