use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::api::{ApiClient, meta};
use crate::cli::MetaArgs;
use crate::config::ApiConfig;
use crate::model::{MetaOptions, OptionItem};
use crate::util::{now_utc_string, write_json_stdout};
use crate::views::form::{EMPTY_OPTIONS, MultiField, SingleField};

#[derive(Debug, Serialize)]
struct MetaReport<'a> {
    generated_at: String,
    options: &'a MetaOptions,
}

pub fn run(config: ApiConfig, args: MetaArgs) -> Result<()> {
    let client = ApiClient::new(config);
    let options = meta::load_meta(&client)?;

    info!(
        phases = options.phases.len(),
        clusters = options.clusters.len(),
        paradigms = options.paradigms.len(),
        tasks = options.tasks.len(),
        dataset_types = options.dataset_types.len(),
        conditions = options.conditions.len(),
        performance = options.performance.len(),
        "metadata loaded"
    );

    if args.json {
        return write_json_stdout(&MetaReport {
            generated_at: now_utc_string(),
            options: &options,
        });
    }

    let mut out = io::BufWriter::new(io::stdout().lock());
    render_options(&options, &mut out).context("failed to write option lists")?;
    out.flush()?;
    Ok(())
}

fn render_options(options: &MetaOptions, out: &mut impl Write) -> io::Result<()> {
    let sections = SingleField::ALL
        .into_iter()
        .map(|field| (field.label(), field.options(options)))
        .chain(
            [MultiField::Conditions, MultiField::Performance]
                .into_iter()
                .map(|field| (field.label(), field.options(options))),
        );

    for (label, items) in sections {
        writeln!(out, "{label}")?;
        render_items(items, out)?;
    }
    Ok(())
}

fn render_items(items: &[OptionItem], out: &mut impl Write) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "  {EMPTY_OPTIONS}");
    }
    for (idx, item) in items.iter().enumerate() {
        writeln!(out, "  {}. {}\t{}", idx + 1, item.label, item.iri)?;
    }
    Ok(())
}
