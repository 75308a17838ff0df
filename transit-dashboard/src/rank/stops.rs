//! Stop search ranking.
//!
//! Orders free-text search results so the stop the user most likely meant
//! comes first.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::domain::{Stop, StopCategory};
use crate::provider::{Outcome, TransitProvider};

use super::config::RankConfig;
use super::order::locale_cmp;

/// Compare two stops against a lowercased query.
///
/// Stops are ranked by:
/// 1. Exact (case-insensitive) name match
/// 2. Name starts with the query
/// 3. Located in the preferred city
/// 4. Category (stop, station, address, POI, coordinates)
/// 5. Name, locale-aware
pub fn compare_stops(query: &str, preferred_city: &str, a: &Stop, b: &Stop) -> Ordering {
    let a_name = a.name.to_lowercase();
    let b_name = b.name.to_lowercase();

    (a_name != query)
        .cmp(&(b_name != query))
        .then_with(|| (!a_name.starts_with(query)).cmp(&!b_name.starts_with(query)))
        .then_with(|| (a.city != preferred_city).cmp(&(b.city != preferred_city)))
        .then_with(|| StopCategory::priority(a.category).cmp(&StopCategory::priority(b.category)))
        .then_with(|| locale_cmp(&a.name, &b.name))
}

/// Rank stop search results best-first and keep at most
/// `config.max_stop_results`.
pub fn rank_stops(query: &str, mut stops: Vec<Stop>, config: &RankConfig) -> Vec<Stop> {
    let query = query.to_lowercase();
    stops.sort_by(|a, b| compare_stops(&query, &config.preferred_city, a, b));
    stops.truncate(config.max_stop_results);
    stops
}

/// Search the provider and rank the results.
///
/// Queries shorter than `config.min_query_chars` never reach the provider.
pub async fn search_stops<P: TransitProvider>(
    provider: &P,
    query: &str,
    config: &RankConfig,
) -> Outcome<Vec<Stop>> {
    if !config.accepts_query(query) {
        debug!(query, "stop query too short");
        return Outcome::Empty;
    }

    match provider.search_stops(query).await {
        Ok(stops) => {
            debug!(query, count = stops.len(), "stop search returned");
            Outcome::from_list(rank_stops(query, stops, config))
        }
        Err(e) => {
            warn!(query, error = %e, "stop search failed");
            Outcome::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coords;
    use crate::provider::{MockMethod, MockProvider};
    use proptest::prelude::*;

    fn stop(id: &str, name: &str, city: &str, category: Option<StopCategory>) -> Stop {
        let stop = Stop::new(id, name, city, Coords::default());
        match category {
            Some(c) => stop.with_category(c),
            None => stop,
        }
    }

    fn names(stops: &[Stop]) -> Vec<&str> {
        stops.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn exact_match_first() {
        let stops = vec![
            stop("1", "Postplatz Nord", "Dresden", Some(StopCategory::Stop)),
            stop("2", "Am Postplatz", "Dresden", Some(StopCategory::Stop)),
            stop("3", "Postplatz", "Dresden", Some(StopCategory::Stop)),
        ];
        let ranked = rank_stops("postplatz", stops, &RankConfig::default());
        assert_eq!(names(&ranked), vec!["Postplatz", "Postplatz Nord", "Am Postplatz"]);
    }

    #[test]
    fn exact_match_ignores_case() {
        let stops = vec![
            stop("1", "Postplatzweg", "Dresden", None),
            stop("2", "POSTPLATZ", "Freital", None),
        ];
        let ranked = rank_stops("Postplatz", stops, &RankConfig::default());
        assert_eq!(ranked[0].id, "2");
    }

    #[test]
    fn preferred_city_breaks_prefix_tie() {
        let stops = vec![
            stop("1", "Bahnhof", "Freital", Some(StopCategory::Stop)),
            stop("2", "Bahnhof", "Dresden", Some(StopCategory::Stop)),
        ];
        let ranked = rank_stops("bahn", stops, &RankConfig::default());
        assert_eq!(ranked[0].id, "2");
    }

    #[test]
    fn category_then_name() {
        let stops = vec![
            stop("1", "Zwinger", "Dresden", Some(StopCategory::Poi)),
            stop("2", "Zwingerteich", "Dresden", Some(StopCategory::Address)),
            stop("3", "Zwickauer Str.", "Dresden", Some(StopCategory::Stop)),
            stop("4", "Zwinger Nord", "Dresden", None),
        ];
        let ranked = rank_stops("zw", stops, &RankConfig::default());
        assert_eq!(
            names(&ranked),
            vec!["Zwickauer Str.", "Zwingerteich", "Zwinger", "Zwinger Nord"]
        );
    }

    #[test]
    fn truncates_to_limit() {
        let stops: Vec<Stop> = (0..20)
            .map(|i| stop(&i.to_string(), &format!("Halt {i}"), "Dresden", None))
            .collect();
        let ranked = rank_stops("halt", stops, &RankConfig::default());
        assert_eq!(ranked.len(), 8);
    }

    #[tokio::test]
    async fn short_query_skips_provider() {
        let provider = MockProvider::new();
        let result = search_stops(&provider, "P", &RankConfig::default()).await;
        assert!(result.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let provider = MockProvider::new().failing(MockMethod::SearchStops);
        let result = search_stops(&provider, "Post", &RankConfig::default()).await;
        assert!(result.is_failed());
        assert!(result.into_vec().is_empty());
    }

    #[tokio::test]
    async fn postplatz_ranks_first() {
        let provider = MockProvider::new().with_stops(
            "Postplatz",
            vec![
                stop("2", "Freital Postplatz", "Freital", Some(StopCategory::Stop)),
                stop("1", "Postplatz", "Dresden", Some(StopCategory::Stop)),
            ],
        );
        let result = search_stops(&provider, "Postplatz", &RankConfig::default())
            .await
            .into_vec();
        assert_eq!(result[0].name, "Postplatz");
        assert_eq!(result[0].city, "Dresden");
    }

    proptest! {
        #[test]
        fn ranking_is_bounded_permutation(
            names in prop::collection::vec("[A-Za-zäöüß ]{0,8}", 0..20),
            query in "[a-z]{0,3}",
        ) {
            let stops: Vec<Stop> = names
                .iter()
                .enumerate()
                .map(|(i, n)| stop(&i.to_string(), n, if i % 2 == 0 { "Dresden" } else { "Pirna" }, None))
                .collect();
            let total = stops.len();
            let ranked = rank_stops(&query, stops, &RankConfig::default());
            prop_assert_eq!(ranked.len(), total.min(8));

            // Exact matches always lead.
            let q = query.to_lowercase();
            if let Some(first_other) = ranked.iter().position(|s| s.name.to_lowercase() != q) {
                prop_assert!(ranked[first_other..].iter().all(|s| s.name.to_lowercase() != q));
            }
        }
    }
}
