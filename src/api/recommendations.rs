use crate::model::{
    DetailsPayload, RecommendationDetailsResponse, RecommendationRequest, RecommendationRow,
    ScoringPayload,
};

use super::{ApiClient, ApiError};

pub const RECOMMENDATIONS_PATH: &str = "/recommendations";
pub const DETAILS_PATH: &str = "/recommendations/details";

pub fn recommend(
    client: &ApiClient,
    request: &RecommendationRequest,
) -> Result<Vec<RecommendationRow>, ApiError> {
    client.post_list(RECOMMENDATIONS_PATH, &ScoringPayload::from(request))
}

pub fn details(
    client: &ApiClient,
    request: &RecommendationRequest,
    approach_iri: &str,
) -> Result<RecommendationDetailsResponse, ApiError> {
    client.post(
        DETAILS_PATH,
        &DetailsPayload {
            request,
            approach_iri,
        },
    )
}
