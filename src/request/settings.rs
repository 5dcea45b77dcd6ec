//! Per-request execution settings.

use serde::{Deserialize, Serialize};

/// Free-form per-request context handed to every processor.
///
/// The core never inspects these; individual processors may use them to
/// gate optional rewrites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestSettings {
    /// Skip expensive normalizations where a processor offers that choice.
    pub turbo: bool,
    /// Request consistent reads from the query source.
    pub consistent: bool,
    /// Echo diagnostics back with the response.
    pub debug: bool,
}
