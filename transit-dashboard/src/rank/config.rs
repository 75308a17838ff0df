//! Ranking configuration.

/// City whose stops are preferred in search results.
pub const DEFAULT_PREFERRED_CITY: &str = "Dresden";

/// Configuration parameters for ranking and reconstruction.
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Stops in this city rank above equally good matches elsewhere.
    /// Also the default city for stops the provider returns without one.
    pub preferred_city: String,

    /// Maximum number of stop search results returned.
    pub max_stop_results: usize,

    /// Minimum query length (in characters) before a stop search is issued.
    pub min_query_chars: usize,
}

impl RankConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        preferred_city: impl Into<String>,
        max_stop_results: usize,
        min_query_chars: usize,
    ) -> Self {
        Self {
            preferred_city: preferred_city.into(),
            max_stop_results,
            min_query_chars,
        }
    }

    /// Whether `query` is long enough to be sent to the provider.
    pub fn accepts_query(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_chars
    }
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            preferred_city: DEFAULT_PREFERRED_CITY.to_string(),
            max_stop_results: 8,
            min_query_chars: 2,
        }
    }
}
