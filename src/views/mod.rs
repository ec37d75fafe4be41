pub mod details;
pub mod form;
pub mod main_page;
pub mod meta_state;
pub mod results;
pub mod router;

use anyhow::Result;

use crate::api::ApiError;
use crate::model::{
    MetaOptions, RecommendationDetailsResponse, RecommendationRequest, RecommendationRow,
};

pub enum Message {
    MetaLoaded(Result<MetaOptions>),
    RecommendationsLoaded {
        request: RecommendationRequest,
        outcome: Result<Vec<RecommendationRow>>,
    },
    DetailsLoaded(Result<RecommendationDetailsResponse>),
}

pub fn failure_text(err: &anyhow::Error, fallback: &str) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => api.to_string(),
        None => fallback.to_string(),
    }
}
