use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::model::RecommendationRequest;
use crate::util::encode_uri_component;

pub const MAIN_PATH: &str = "/";
pub const DETAILS_PREFIX: &str = "/recommendations/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavState {
    pub request: RecommendationRequest,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub state: Option<NavState>,
}

impl Navigation {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Main,
    Details { approach_segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub route: Route,
    pub path: String,
    pub redirected: bool,
}

pub fn details_path(approach_iri: &str) -> String {
    format!("{DETAILS_PREFIX}{}", encode_uri_component(approach_iri))
}

pub struct Router {
    details: Regex,
}

impl Router {
    pub fn new() -> Result<Self> {
        let details = Regex::new(r"^/recommendations/([^/]+)/?$")
            .context("failed to compile details route pattern")?;
        Ok(Self { details })
    }

    pub fn resolve(&self, raw_path: &str) -> Resolution {
        let path = normalize_path(raw_path);

        if path == MAIN_PATH {
            return Resolution {
                route: Route::Main,
                path,
                redirected: false,
            };
        }

        if let Some(segment) = self
            .details
            .captures(&path)
            .and_then(|captures| captures.get(1))
        {
            return Resolution {
                route: Route::Details {
                    approach_segment: segment.as_str().to_string(),
                },
                path,
                redirected: false,
            };
        }

        debug!(path = %path, "no route matched; redirecting to main page");
        Resolution {
            route: Route::Main,
            path: MAIN_PATH.to_string(),
            redirected: true,
        }
    }
}

fn normalize_path(raw_path: &str) -> String {
    let path = raw_path
        .trim()
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
