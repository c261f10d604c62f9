//! Run several series requests against one listing provider.

use crate::listing::{ListingError, ListingProvider};
use anyhow::{Context, Result};
use madodl_parser::tags::TagRule;
use madodl_parser::{interpret_request, match_listing, DiagnosticSink, MatchResult, ParsedRequest};
use serde::Serialize;

/// What one request resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesOutcome {
    /// Series title as found in the listing.
    pub title: String,
    pub request: ParsedRequest,
    pub result: MatchResult,
}

/// Interpret and match each request in turn.
///
/// A bad request expression or a series the provider cannot find is logged
/// and skipped. A filename that cannot be parsed aborts the whole batch.
pub fn select_batch<S: AsRef<str>>(
    requests: &[Vec<S>],
    provider: &dyn ListingProvider,
    rules: &[TagRule],
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<SeriesOutcome>> {
    let mut outcomes = Vec::with_capacity(requests.len());

    for args in requests {
        let request = match interpret_request(args, &mut *sink) {
            Ok(request) => request,
            Err(e) if !e.is_fatal() => {
                tracing::warn!("Skipping request: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let listing = match provider.listing(&request.series_name) {
            Ok(listing) => listing,
            Err(e) if matches!(e.downcast_ref::<ListingError>(), Some(ListingError::NotFound(_))) => {
                tracing::warn!("{}", e);
                continue;
            }
            Err(e) => return Err(e),
        };
        tracing::info!(
            "{}: {} files in listing",
            listing.title,
            listing.files.len()
        );

        let result = match_listing(&request, &listing.title, &listing.files, rules, &mut *sink)
            .with_context(|| format!("Failed to match listing of {}", listing.title))?;

        outcomes.push(SeriesOutcome {
            title: listing.title,
            request,
            result,
        });
    }

    Ok(outcomes)
}
