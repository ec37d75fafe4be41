use std::io::{self, Write};

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{ApiClient, meta};
use crate::cli::DetailsArgs;
use crate::config::ApiConfig;
use crate::effect::Effects;
use crate::model::{Matches, RecommendationRequest};
use crate::util::{now_utc_string, write_json_stdout};
use crate::views::Message;
use crate::views::details::{
    ArticleLink, ContextItem, DetailsPage, DetailsStatus, article_links,
};
use crate::views::form::REQUIRED_HINT;
use crate::views::router::{NavState, Route, Router, details_path};

use super::form_from_args;

#[derive(Debug, Serialize)]
struct DetailsReport<'a> {
    generated_at: String,
    title: &'a str,
    approach_iri: &'a str,
    request: Option<&'a RecommendationRequest>,
    context: Vec<ContextItem>,
    articles: Vec<ArticleLink>,
    matches: &'a Matches,
}

fn nav_state(args: &DetailsArgs) -> Result<Option<NavState>> {
    if args.request.is_unset() {
        return Ok(None);
    }
    let request = form_from_args(&args.request)
        .to_request()
        .ok_or_else(|| anyhow!(REQUIRED_HINT))?;
    Ok(Some(NavState {
        request,
        title: None,
    }))
}

pub fn run(config: ApiConfig, args: DetailsArgs) -> Result<()> {
    let state = nav_state(&args)?;
    let router = Router::new()?;
    let path = details_path(args.approach_iri.trim());
    let Route::Details { approach_segment } = router.resolve(&path).route else {
        bail!("'{}' does not address a details page", args.approach_iri);
    };

    info!(path = %path, with_context = state.is_some(), "opening details");
    let client = ApiClient::new(config);
    let mut effects = Effects::new();
    let mut page = DetailsPage::mount(&approach_segment, state.as_ref(), &client, &mut effects);
    while let Some(message) = effects.next() {
        if let Message::DetailsLoaded(outcome) = message {
            page.apply(outcome);
        }
    }
    if state.is_some() {
        match meta::load_meta(&client) {
            Ok(labels) => page.set_labels(labels),
            Err(err) => warn!(error = %err, "metadata unavailable; showing raw identifiers"),
        }
    }
    let search = args.search.unwrap_or_default();
    page.set_article_query(search.clone());

    if let Some(failure) = page.status().failure() {
        bail!("{failure}");
    }
    let DetailsStatus::Loaded(response) = page.status() else {
        bail!("details did not finish loading");
    };

    if args.json {
        return write_json_stdout(&DetailsReport {
            generated_at: now_utc_string(),
            title: page.title(),
            approach_iri: &response.approach_iri,
            request: state.as_ref().map(|state| &state.request),
            context: page.context(),
            articles: article_links(&response.articles, &search),
            matches: &response.matches,
        });
    }

    let mut out = io::BufWriter::new(io::stdout().lock());
    page.render(&mut out).context("failed to write details")?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};

    fn details_args(argv: &[&str]) -> DetailsArgs {
        let cli = Cli::try_parse_from(argv).expect("arguments parse");
        match cli.command {
            Commands::Details(args) => args,
            _ => panic!("expected details subcommand"),
        }
    }

    #[test]
    fn no_selections_means_no_request_context() {
        let args = details_args(&["mlguide", "details", "urn:a1"]);
        assert_eq!(nav_state(&args).expect("state"), None);
    }

    #[test]
    fn partial_selections_are_rejected() {
        let args = details_args(&["mlguide", "details", "urn:a1", "--phase", "P1"]);
        let err = nav_state(&args).expect_err("missing cluster and paradigm");
        assert_eq!(err.to_string(), REQUIRED_HINT);
    }

    #[test]
    fn full_selections_become_navigation_state() {
        let args = details_args(&[
            "mlguide",
            "details",
            "urn:a1",
            "--phase",
            "P1",
            "--cluster",
            "C1",
            "--paradigm",
            "Pa1",
            "--condition",
            "Co1",
        ]);
        let state = nav_state(&args).expect("state").expect("context present");
        assert_eq!(state.request.paradigm_iri, "Pa1");
        assert_eq!(state.request.conditions, ["Co1"]);
    }
}
