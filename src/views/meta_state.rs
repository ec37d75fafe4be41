use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};

use crate::model::MetaOptions;

use super::failure_text;

pub const META_FALLBACK: &str = "Failed to load meta data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaState {
    pub data: MetaOptions,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for MetaState {
    fn default() -> Self {
        Self {
            data: MetaOptions::default(),
            loading: true,
            error: None,
        }
    }
}

impl MetaState {
    pub fn apply(&mut self, outcome: Result<MetaOptions>) {
        match outcome {
            Ok(data) => {
                info!(
                    phases = data.phases.len(),
                    clusters = data.clusters.len(),
                    paradigms = data.paradigms.len(),
                    tasks = data.tasks.len(),
                    dataset_types = data.dataset_types.len(),
                    conditions = data.conditions.len(),
                    performance = data.performance.len(),
                    "metadata loaded"
                );
                self.data = data;
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "metadata load failed");
                self.error = Some(failure_text(&err, META_FALLBACK));
            }
        }
        self.loading = false;
    }

    pub fn is_ready(&self) -> bool {
        !self.loading && self.error.is_none()
    }

    pub fn render_banner(&self, out: &mut impl Write) -> io::Result<()> {
        if self.loading {
            writeln!(out, "Loading metadata...")?;
        }
        if let Some(error) = &self.error {
            writeln!(out, "Meta load error: {error}")?;
        }
        Ok(())
    }
}
