use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::info;

use crate::api::{ApiClient, recommendations};
use crate::cli::RecommendArgs;
use crate::config::ApiConfig;
use crate::model::RecommendationRequest;
use crate::util::{now_utc_string, write_json_stdout};
use crate::views::form::REQUIRED_HINT;
use crate::views::results::{ResultCard, build_cards, render_results};

use super::form_from_args;

#[derive(Debug, Serialize)]
struct RecommendReport<'a> {
    generated_at: String,
    request: &'a RecommendationRequest,
    returned: usize,
    results: Vec<ResultCard>,
}

pub fn run(config: ApiConfig, args: RecommendArgs) -> Result<()> {
    let Some(request) = form_from_args(&args.request).to_request() else {
        bail!(REQUIRED_HINT);
    };

    info!(
        phase = %request.phase_iri,
        cluster = %request.cluster_iri,
        paradigm = %request.paradigm_iri,
        "requesting recommendations"
    );
    let client = ApiClient::new(config);
    let rows = recommendations::recommend(&client, &request)?;
    let cards = build_cards(&rows, Some(&request));
    info!(returned = cards.len(), "recommendations received");

    if args.json {
        return write_json_stdout(&RecommendReport {
            generated_at: now_utc_string(),
            request: &request,
            returned: cards.len(),
            results: cards,
        });
    }

    let mut out = io::BufWriter::new(io::stdout().lock());
    render_results(&cards, &mut out).context("failed to write results")?;
    out.flush()?;
    Ok(())
}
