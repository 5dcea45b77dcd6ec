//! Query processor pipeline.
//!
//! A processor is a semantics-preserving rewrite pass over a [`Query`]'s
//! expression trees. The pipeline runs its processors sequentially on the
//! same query; order is significant and fixed by the caller, and processors
//! share no mutable state. Each processor drives one bottom-up walk per
//! root expression - rules must converge in that single pass.

mod basic_functions;

pub use basic_functions::BasicFunctionsProcessor;

use crate::query::Query;
use crate::request::RequestSettings;

/// A single rewrite pass applied to a query before rendering.
///
/// The rewrite must be observationally equivalent, alias-preserving and
/// order-preserving; it mutates the query in place and returns nothing.
pub trait QueryProcessor {
    fn process_query(&self, query: &mut Query, settings: &RequestSettings);
}

/// An ordered list of processors applied in sequence.
pub struct Pipeline {
    processors: Vec<Box<dyn QueryProcessor>>,
}

impl Pipeline {
    pub fn new(processors: Vec<Box<dyn QueryProcessor>>) -> Self {
        Self { processors }
    }

    /// Run every processor over the query, in registration order.
    pub fn execute(&self, query: &mut Query, settings: &RequestSettings) {
        log::debug!(
            "running {} query processor(s) on table {}",
            self.processors.len(),
            query.table_source().table_name()
        );
        for processor in &self.processors {
            processor.process_query(query, settings);
        }
    }
}

impl Default for Pipeline {
    /// The standard pipeline: function normalization only.
    fn default() -> Self {
        Self::new(vec![Box::new(BasicFunctionsProcessor)])
    }
}
