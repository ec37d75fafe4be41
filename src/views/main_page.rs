use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};

use crate::api::{ApiClient, meta, recommendations};
use crate::effect::{CancelToken, Effects};
use crate::model::{MetaOptions, RecommendationRequest, RecommendationRow};

use super::form::RecommendationForm;
use super::meta_state::MetaState;
use super::results::{activate, build_cards, render_results};
use super::router::Navigation;
use super::{Message, failure_text};

pub const RUN_FALLBACK: &str = "Failed to run recommendations";
pub const TITLE: &str = "ML Method Recommender";
pub const SUBTITLE: &str =
    "Uses phase/cluster/paradigm + ontology constraints to rank methods from articles.";

pub struct MainPage {
    meta: MetaState,
    form: RecommendationForm,
    restore: Option<RecommendationForm>,
    submitting: bool,
    rows: Vec<RecommendationRow>,
    run_error: Option<String>,
    last_request: Option<RecommendationRequest>,
    token: CancelToken,
}

impl MainPage {
    pub fn mount(
        client: &ApiClient,
        effects: &mut Effects<Message>,
        memory: Option<RecommendationForm>,
    ) -> Self {
        let token = CancelToken::new();
        let loader = client.clone();
        effects.spawn(&token, move || meta::load_meta(&loader), Message::MetaLoaded);

        Self {
            meta: MetaState::default(),
            form: RecommendationForm::default(),
            restore: memory,
            submitting: false,
            rows: Vec::new(),
            run_error: None,
            last_request: None,
            token,
        }
    }

    pub fn unmount(&self) -> RecommendationForm {
        self.token.cancel();
        self.restore.clone().unwrap_or_else(|| self.form.clone())
    }

    pub fn apply_meta(&mut self, outcome: Result<MetaOptions>) {
        self.meta.apply(outcome);
        if !self.meta.is_ready() {
            return;
        }
        if let Some(mut snapshot) = self.restore.take() {
            snapshot.reconcile(&self.meta.data);
            self.form = snapshot;
        }
    }

    pub fn meta(&self) -> &MetaState {
        &self.meta
    }

    #[cfg(test)]
    pub fn form(&self) -> &RecommendationForm {
        &self.form
    }

    #[cfg(test)]
    pub fn form_mut(&mut self) -> &mut RecommendationForm {
        &mut self.form
    }

    pub fn meta_and_form_mut(&mut self) -> (&MetaOptions, &mut RecommendationForm) {
        (&self.meta.data, &mut self.form)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[RecommendationRow] {
        &self.rows
    }

    #[cfg(test)]
    pub fn run_error(&self) -> Option<&str> {
        self.run_error.as_deref()
    }

    #[cfg(test)]
    pub fn last_request(&self) -> Option<&RecommendationRequest> {
        self.last_request.as_ref()
    }

    pub fn submit(&mut self, client: &ApiClient, effects: &mut Effects<Message>) -> bool {
        if !self.meta.is_ready() || !self.form.can_submit(self.submitting) {
            return false;
        }
        let Some(request) = self.form.to_request() else {
            return false;
        };

        info!(
            phase = %request.phase_iri,
            cluster = %request.cluster_iri,
            paradigm = %request.paradigm_iri,
            conditions = request.conditions.len(),
            performance_prefs = request.performance_prefs.len(),
            "submitting recommendation request"
        );
        self.submitting = true;
        self.run_error = None;

        let client = client.clone();
        let sent = request.clone();
        effects.spawn(
            &self.token,
            move || Ok(recommendations::recommend(&client, &sent)?),
            move |outcome| Message::RecommendationsLoaded { request, outcome },
        );
        true
    }

    pub fn apply_results(
        &mut self,
        request: RecommendationRequest,
        outcome: Result<Vec<RecommendationRow>>,
    ) {
        match outcome {
            Ok(rows) => {
                info!(rows = rows.len(), "recommendations received");
                self.rows = rows;
                self.last_request = Some(request);
            }
            Err(err) => {
                warn!(error = %err, "recommendation request failed");
                self.run_error = Some(failure_text(&err, RUN_FALLBACK));
            }
        }
        self.submitting = false;
    }

    pub fn open(&self, rank: usize) -> Option<Navigation> {
        let index = rank.checked_sub(1)?;
        activate(&self.rows, index, self.last_request.as_ref())
    }

    pub fn reset(&mut self) {
        self.form = RecommendationForm::default();
        self.restore = None;
        self.rows.clear();
        self.run_error = None;
        self.last_request = None;
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{TITLE}")?;
        writeln!(out, "{SUBTITLE}")?;
        writeln!(out)?;

        self.meta.render_banner(out)?;
        if !self.meta.is_ready() {
            return Ok(());
        }

        self.form.render(&self.meta.data, self.submitting, out)?;
        writeln!(out)?;
        writeln!(out, "Results")?;
        if let Some(error) = &self.run_error {
            writeln!(out, "{error}")?;
        }
        render_results(&build_cards(&self.rows, self.last_request.as_ref()), out)
    }
}
