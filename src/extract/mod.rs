// File: ./src/extract/mod.rs
//! Extraction strategies and the fixed-priority cascade over them.
pub mod lexicon;
pub mod rules;
pub mod sanitize;
pub mod segment;
pub mod ticket;

use crate::model::ParsedEvent;
use chrono::NaiveDate;

pub use rules::RuleExtractor;
pub use ticket::TicketExtractor;

/// Per-call extraction parameters.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext {
    /// "Today" in the user's timezone; relative dates resolve against this.
    pub base_date: NaiveDate,
    /// When set, a chunk with a time but no explicit date is dropped instead
    /// of defaulting to tomorrow.
    pub strict_dates: bool,
}

impl ExtractContext {
    pub fn new(base_date: NaiveDate) -> Self {
        Self {
            base_date,
            strict_dates: false,
        }
    }

    pub fn strict(base_date: NaiveDate) -> Self {
        Self {
            base_date,
            strict_dates: true,
        }
    }
}

/// A local extraction strategy. Strategies are tried in a fixed order by the
/// [`Cascade`]; adding a strategy does not touch the orchestration logic.
pub trait Extractor {
    fn label(&self) -> &'static str;
    fn extract(&self, text: &str, ctx: &ExtractContext) -> Vec<ParsedEvent>;
}

/// Ordered list of local strategies. The first strategy producing any raw
/// candidates wins; sanitization of the winner is the caller's concern so
/// that an all-garbage result escalates to the delegated extractor rather
/// than falling through to a lower-priority strategy.
pub struct Cascade {
    strategies: Vec<Box<dyn Extractor + Send + Sync>>,
}

impl Cascade {
    pub fn new(strategies: Vec<Box<dyn Extractor + Send + Sync>>) -> Self {
        Self { strategies }
    }

    /// Ticket heuristic first (it never partially matches), then the rule
    /// parser.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(TicketExtractor), Box::new(RuleExtractor)])
    }

    pub fn run(&self, text: &str, ctx: &ExtractContext) -> Vec<ParsedEvent> {
        for strategy in &self.strategies {
            let candidates = strategy.extract(text, ctx);
            if !candidates.is_empty() {
                log::debug!(
                    "extraction strategy '{}' produced {} candidate(s)",
                    strategy.label(),
                    candidates.len()
                );
                return candidates;
            }
        }
        Vec::new()
    }
}

impl Default for Cascade {
    fn default() -> Self {
        Self::standard()
    }
}
