pub mod details;
pub mod meta;
pub mod recommend;
pub mod shell;

use crate::cli::RequestArgs;
use crate::views::form::{MultiField, RecommendationForm, SingleField};

pub fn form_from_args(args: &RequestArgs) -> RecommendationForm {
    let mut form = RecommendationForm::default();
    if let Some(text) = &args.problem_text {
        form.set_problem_text(text.trim());
    }

    for (field, value) in [
        (SingleField::Phase, &args.phase),
        (SingleField::Cluster, &args.cluster),
        (SingleField::Paradigm, &args.paradigm),
        (SingleField::Task, &args.task),
        (SingleField::DatasetType, &args.dataset_type),
    ] {
        if let Some(iri) = value {
            form.select(field, iri.trim());
        }
    }

    for iri in &args.conditions {
        form.add(MultiField::Conditions, iri.trim());
    }
    for iri in &args.performance_prefs {
        form.add(MultiField::Performance, iri.trim());
    }
    form
}
