use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{ApiClient, recommendations};
use crate::effect::{CancelToken, Effects};
use crate::model::{
    ArticleItem, MatchItem, MetaOptions, OptionItem, RecommendationDetailsResponse,
    RecommendationRequest,
};
use crate::util::decode_uri_component;

use super::router::{MAIN_PATH, NavState};
use super::{Message, failure_text};

pub const DETAILS_FALLBACK: &str = "Failed to load details";
pub const MISSING_APPROACH: &str = "Missing approach IRI.";
pub const MISSING_CONTEXT: &str =
    "Missing context. Open details by clicking a result after running recommendations.";
pub const TITLE_FALLBACK: &str = "Selected method";
const DOI_RESOLVER: &str = "https://doi.org/";
const NO_VALUE: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailsStatus {
    MissingApproach,
    MissingContext,
    Loading,
    Loaded(RecommendationDetailsResponse),
    Failed(String),
}

impl DetailsStatus {
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::MissingApproach => Some(MISSING_APPROACH),
            Self::MissingContext => Some(MISSING_CONTEXT),
            Self::Failed(message) => Some(message),
            Self::Loading | Self::Loaded(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleLink {
    pub href: String,
    pub doi: String,
    pub label: Option<String>,
}

pub fn doi_url(doi: &str) -> String {
    format!("{DOI_RESOLVER}{doi}")
}

pub fn article_links(articles: &[ArticleItem], query: &str) -> Vec<ArticleLink> {
    let query = query.trim().to_lowercase();
    articles
        .iter()
        .filter(|article| {
            query.is_empty()
                || article
                    .label
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&query)
                || article.doi.to_lowercase().contains(&query)
        })
        .map(|article| ArticleLink {
            href: doi_url(&article.doi),
            doi: article.doi.clone(),
            label: article.label.clone().filter(|label| !label.is_empty()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextItem {
    pub field: &'static str,
    pub value: String,
}

fn label_or_raw(options: Option<&[OptionItem]>, iri: Option<&str>) -> String {
    match iri.filter(|iri| !iri.is_empty()) {
        None => NO_VALUE.to_string(),
        Some(iri) => options
            .and_then(|options| options.iter().find(|option| option.iri == iri))
            .map_or_else(|| iri.to_string(), |option| option.label.clone()),
    }
}

fn labels_or_raw(options: Option<&[OptionItem]>, iris: &[String]) -> String {
    if iris.is_empty() {
        return NO_VALUE.to_string();
    }
    iris.iter()
        .map(|iri| label_or_raw(options, Some(iri.as_str())))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn context_items(
    request: &RecommendationRequest,
    labels: Option<&MetaOptions>,
) -> Vec<ContextItem> {
    let phases = labels.map(|meta| meta.phases.as_slice());
    let clusters = labels.map(|meta| meta.clusters.as_slice());
    let paradigms = labels.map(|meta| meta.paradigms.as_slice());
    let tasks = labels.map(|meta| meta.tasks.as_slice());
    let dataset_types = labels.map(|meta| meta.dataset_types.as_slice());
    let conditions = labels.map(|meta| meta.conditions.as_slice());
    let performance = labels.map(|meta| meta.performance.as_slice());
    let problem_text = request
        .problem_text
        .clone()
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NO_VALUE.to_string());

    [
        ("Phase", label_or_raw(phases, Some(request.phase_iri.as_str()))),
        ("Cluster", label_or_raw(clusters, Some(request.cluster_iri.as_str()))),
        ("Paradigm", label_or_raw(paradigms, Some(request.paradigm_iri.as_str()))),
        ("Task", label_or_raw(tasks, request.task_iri.as_deref())),
        (
            "Dataset type",
            label_or_raw(dataset_types, request.dataset_type_iri.as_deref()),
        ),
        ("Conditions", labels_or_raw(conditions, &request.conditions)),
        (
            "Performance prefs",
            labels_or_raw(performance, &request.performance_prefs),
        ),
        ("Problem text", problem_text),
    ]
    .into_iter()
    .map(|(field, value)| ContextItem { field, value })
    .collect()
}

pub fn decode_approach_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }
    Some(decode_uri_component(segment).unwrap_or_else(|| segment.to_string()))
}

pub struct DetailsPage {
    approach_iri: Option<String>,
    request: Option<RecommendationRequest>,
    title: Option<String>,
    labels: Option<MetaOptions>,
    status: DetailsStatus,
    article_query: String,
    token: CancelToken,
}

impl DetailsPage {
    pub fn mount(
        segment: &str,
        state: Option<&NavState>,
        client: &ApiClient,
        effects: &mut Effects<Message>,
    ) -> Self {
        let mut page = Self {
            approach_iri: decode_approach_segment(segment),
            request: state.map(|state| state.request.clone()),
            title: state.and_then(|state| state.title.clone()),
            labels: None,
            status: DetailsStatus::Loading,
            article_query: String::new(),
            token: CancelToken::new(),
        };
        page.start(client, effects);
        page
    }

    pub fn update(
        &mut self,
        segment: &str,
        state: Option<&NavState>,
        client: &ApiClient,
        effects: &mut Effects<Message>,
    ) {
        let approach_iri = decode_approach_segment(segment);
        let request = state.map(|state| state.request.clone());
        self.title = state.and_then(|state| state.title.clone());
        if approach_iri == self.approach_iri && request == self.request {
            return;
        }

        self.token.cancel();
        self.token = CancelToken::new();
        self.approach_iri = approach_iri;
        self.request = request;
        self.start(client, effects);
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    fn start(&mut self, client: &ApiClient, effects: &mut Effects<Message>) {
        let Some(approach_iri) = self.approach_iri.clone() else {
            self.status = DetailsStatus::MissingApproach;
            return;
        };
        let Some(request) = self.request.clone() else {
            warn!(approach = %approach_iri, "details opened without request context");
            self.status = DetailsStatus::MissingContext;
            return;
        };

        info!(approach = %approach_iri, "loading details");
        self.status = DetailsStatus::Loading;
        let client = client.clone();
        effects.spawn(
            &self.token,
            move || Ok(recommendations::details(&client, &request, &approach_iri)?),
            Message::DetailsLoaded,
        );
    }

    pub fn apply(&mut self, outcome: Result<RecommendationDetailsResponse>) {
        self.status = match outcome {
            Ok(response) => {
                info!(
                    approach = %response.approach_iri,
                    articles = response.articles.len(),
                    "details loaded"
                );
                DetailsStatus::Loaded(response)
            }
            Err(err) => {
                warn!(error = %err, "details load failed");
                DetailsStatus::Failed(failure_text(&err, DETAILS_FALLBACK))
            }
        };
    }

    pub fn status(&self) -> &DetailsStatus {
        &self.status
    }

    #[cfg(test)]
    pub fn approach_iri(&self) -> Option<&str> {
        self.approach_iri.as_deref()
    }

    pub fn set_labels(&mut self, labels: MetaOptions) {
        self.labels = Some(labels);
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(TITLE_FALLBACK)
    }

    pub fn context(&self) -> Vec<ContextItem> {
        self.request
            .as_ref()
            .map(|request| context_items(request, self.labels.as_ref()))
            .unwrap_or_default()
    }

    pub fn set_article_query(&mut self, query: impl Into<String>) {
        self.article_query = query.into();
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        match &self.status {
            DetailsStatus::MissingApproach => writeln!(out, "{MISSING_APPROACH}"),
            DetailsStatus::MissingContext => {
                writeln!(out, "{MISSING_CONTEXT}")?;
                writeln!(out, "Back: {MAIN_PATH}")
            }
            DetailsStatus::Failed(message) => writeln!(out, "{message}"),
            DetailsStatus::Loading => writeln!(out, "Loading..."),
            DetailsStatus::Loaded(response) => self.render_loaded(response, out),
        }
    }

    fn render_loaded(
        &self,
        response: &RecommendationDetailsResponse,
        out: &mut impl Write,
    ) -> io::Result<()> {
        writeln!(out, "{}  (Back: {MAIN_PATH})", self.title())?;
        writeln!(out, "Approach: {}", response.approach_iri)?;
        writeln!(out)?;

        writeln!(out, "Request context")?;
        for item in self.context() {
            writeln!(out, "  {}: {}", item.field, item.value)?;
        }
        writeln!(out)?;

        if self.article_query.trim().is_empty() {
            writeln!(out, "Supporting articles")?;
        } else {
            writeln!(out, "Supporting articles (search: {})", self.article_query.trim())?;
        }
        render_articles(&article_links(&response.articles, &self.article_query), out)?;
        writeln!(out)?;

        writeln!(out, "Matches")?;
        render_matches("Tasks", &response.matches.tasks, out)?;
        render_matches("Conditions", &response.matches.conditions, out)?;
        render_matches("Performance", &response.matches.performance, out)
    }
}

pub fn render_articles(links: &[ArticleLink], out: &mut impl Write) -> io::Result<()> {
    if links.is_empty() {
        return writeln!(out, "  -");
    }
    for link in links {
        match &link.label {
            Some(label) => writeln!(out, "  {} <{}> — {label}", link.doi, link.href)?,
            None => writeln!(out, "  {} <{}>", link.doi, link.href)?,
        }
    }
    Ok(())
}

fn render_matches(title: &str, items: &[MatchItem], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  {title}")?;
    if items.is_empty() {
        return writeln!(out, "    -");
    }
    for item in items {
        writeln!(out, "    - {}", item.label)?;
    }
    Ok(())
}
