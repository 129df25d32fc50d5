use chrono::Utc;
use tracing::debug;

use crate::{
    TravelError, TravelProvider, TravelResult,
    model::TravelBrief,
    parser::parse_travel_info,
};

/// Fetch and parse a travel brief for `location`.
///
/// An empty location is rejected before any request is made. Backend
/// failures come back as [`TravelError::Fetch`]; the markdown itself never
/// causes an error.
pub async fn fetch_brief(
    provider: &dyn TravelProvider,
    location: &str,
) -> TravelResult<TravelBrief> {
    let location = location.trim();
    if location.is_empty() {
        return Err(TravelError::validation("Location must not be empty."));
    }

    let response = provider.fetch(location).await?;

    let info = parse_travel_info(&response.text);
    debug!(
        location,
        clothing = info.clothing.len(),
        places = info.places_to_visit.len(),
        "parsed travel brief"
    );

    Ok(TravelBrief {
        location: location.to_string(),
        fetched_at: Utc::now(),
        info,
        sources: response.grounding_chunks,
    })
}
