use std::io::{self, Write};

use crate::model::{MetaOptions, OptionItem, RecommendationRequest};

pub const SUBMIT_LABEL: &str = "Recommend methods";
pub const SUBMITTING_LABEL: &str = "Running...";
pub const REQUIRED_HINT: &str = "Select phase, cluster, and paradigm to run recommendations.";
pub const EMPTY_OPTIONS: &str = "No options";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleField {
    Phase,
    Cluster,
    Paradigm,
    Task,
    DatasetType,
}

impl SingleField {
    pub const ALL: [SingleField; 5] = [
        Self::Phase,
        Self::Cluster,
        Self::Paradigm,
        Self::Task,
        Self::DatasetType,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Phase => "Lifecycle phase",
            Self::Cluster => "Application cluster",
            Self::Paradigm => "Learning paradigm",
            Self::Task => "ML task (optional)",
            Self::DatasetType => "Dataset type (optional)",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Task => "No task filter",
            Self::DatasetType => "Not used in scoring yet",
            _ => "Select...",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Self::Phase | Self::Cluster | Self::Paradigm)
    }

    pub fn options(self, meta: &MetaOptions) -> &[OptionItem] {
        match self {
            Self::Phase => &meta.phases,
            Self::Cluster => &meta.clusters,
            Self::Paradigm => &meta.paradigms,
            Self::Task => &meta.tasks,
            Self::DatasetType => &meta.dataset_types,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiField {
    Conditions,
    Performance,
}

impl MultiField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Conditions => "Conditions",
            Self::Performance => "Performance preferences",
        }
    }

    pub fn options(self, meta: &MetaOptions) -> &[OptionItem] {
        match self {
            Self::Conditions => &meta.conditions,
            Self::Performance => &meta.performance,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelection(Vec<String>);

impl MultiSelection {
    pub fn toggle(&mut self, iri: &str) {
        if self.contains(iri) {
            self.0.retain(|value| value != iri);
        } else {
            self.0.push(iri.to_string());
        }
    }

    pub fn insert(&mut self, iri: &str) {
        if !self.contains(iri) {
            self.0.push(iri.to_string());
        }
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.0.iter().any(|value| value == iri)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    fn retain_known(&mut self, options: &[OptionItem]) {
        self.0
            .retain(|value| options.iter().any(|option| &option.iri == value));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationForm {
    problem_text: String,
    phase_iri: String,
    cluster_iri: String,
    paradigm_iri: String,
    task_iri: String,
    dataset_type_iri: String,
    conditions: MultiSelection,
    performance_prefs: MultiSelection,
}

impl RecommendationForm {
    #[cfg(test)]
    pub fn problem_text(&self) -> &str {
        &self.problem_text
    }

    pub fn set_problem_text(&mut self, text: impl Into<String>) {
        self.problem_text = text.into();
    }

    pub fn value(&self, field: SingleField) -> &str {
        match field {
            SingleField::Phase => &self.phase_iri,
            SingleField::Cluster => &self.cluster_iri,
            SingleField::Paradigm => &self.paradigm_iri,
            SingleField::Task => &self.task_iri,
            SingleField::DatasetType => &self.dataset_type_iri,
        }
    }

    pub fn select(&mut self, field: SingleField, iri: impl Into<String>) {
        let slot = match field {
            SingleField::Phase => &mut self.phase_iri,
            SingleField::Cluster => &mut self.cluster_iri,
            SingleField::Paradigm => &mut self.paradigm_iri,
            SingleField::Task => &mut self.task_iri,
            SingleField::DatasetType => &mut self.dataset_type_iri,
        };
        *slot = iri.into();
    }

    pub fn selection(&self, field: MultiField) -> &MultiSelection {
        match field {
            MultiField::Conditions => &self.conditions,
            MultiField::Performance => &self.performance_prefs,
        }
    }

    pub fn toggle(&mut self, field: MultiField, iri: &str) {
        match field {
            MultiField::Conditions => self.conditions.toggle(iri),
            MultiField::Performance => self.performance_prefs.toggle(iri),
        }
    }

    pub fn add(&mut self, field: MultiField, iri: &str) {
        match field {
            MultiField::Conditions => self.conditions.insert(iri),
            MultiField::Performance => self.performance_prefs.insert(iri),
        }
    }

    pub fn has_required(&self) -> bool {
        !self.phase_iri.is_empty() && !self.cluster_iri.is_empty() && !self.paradigm_iri.is_empty()
    }

    pub fn can_submit(&self, submitting: bool) -> bool {
        self.has_required() && !submitting
    }

    pub fn to_request(&self) -> Option<RecommendationRequest> {
        if !self.has_required() {
            return None;
        }

        Some(RecommendationRequest {
            problem_text: non_empty(&self.problem_text),
            phase_iri: self.phase_iri.clone(),
            cluster_iri: self.cluster_iri.clone(),
            paradigm_iri: self.paradigm_iri.clone(),
            task_iri: non_empty(&self.task_iri),
            dataset_type_iri: non_empty(&self.dataset_type_iri),
            conditions: self.conditions.as_slice().to_vec(),
            performance_prefs: self.performance_prefs.as_slice().to_vec(),
        })
    }

    pub fn reconcile(&mut self, meta: &MetaOptions) {
        for field in SingleField::ALL {
            let current = self.value(field);
            if !current.is_empty() && !field.options(meta).iter().any(|o| o.iri == current) {
                self.select(field, "");
            }
        }
        self.conditions.retain_known(&meta.conditions);
        self.performance_prefs.retain_known(&meta.performance);
    }

    pub fn render(
        &self,
        meta: &MetaOptions,
        submitting: bool,
        out: &mut impl Write,
    ) -> io::Result<()> {
        writeln!(out, "Problem description")?;
        if self.problem_text.is_empty() {
            writeln!(out, "  (empty)")?;
        } else {
            writeln!(out, "  {}", self.problem_text)?;
        }

        for field in SingleField::ALL {
            render_select(field, self.value(field), field.options(meta), out)?;
        }
        for field in [MultiField::Conditions, MultiField::Performance] {
            render_multi_select(field, self.selection(field), field.options(meta), out)?;
        }

        let label = if submitting { SUBMITTING_LABEL } else { SUBMIT_LABEL };
        let state = if self.can_submit(submitting) {
            "enabled"
        } else {
            "disabled"
        };
        writeln!(out, "[{label}] ({state})")?;
        if !self.has_required() {
            writeln!(out, "{REQUIRED_HINT}")?;
        }
        Ok(())
    }
}

pub fn resolve_choice(options: &[OptionItem], input: &str, label: &str) -> Result<String, String> {
    let input = input.trim();
    if input == "-" {
        return Ok(String::new());
    }

    if let Ok(rank) = input.parse::<usize>() {
        if let Some(option) = rank.checked_sub(1).and_then(|idx| options.get(idx)) {
            return Ok(option.iri.clone());
        }
    }

    options
        .iter()
        .find(|option| option.iri == input)
        .or_else(|| {
            options
                .iter()
                .find(|option| option.label.eq_ignore_ascii_case(input))
        })
        .map(|option| option.iri.clone())
        .ok_or_else(|| format!("no {label} option matches '{input}'"))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn render_select(
    field: SingleField,
    selected: &str,
    options: &[OptionItem],
    out: &mut impl Write,
) -> io::Result<()> {
    let current = options
        .iter()
        .find(|option| option.iri == selected)
        .map(|option| option.label.as_str())
        .unwrap_or(if selected.is_empty() {
            field.placeholder()
        } else {
            selected
        });
    let required = if field.is_required() { " *" } else { "" };
    writeln!(out, "{}{required} [{current}]", field.label())?;

    if options.is_empty() {
        return writeln!(out, "  {EMPTY_OPTIONS}");
    }
    for (idx, option) in options.iter().enumerate() {
        let marker = if option.iri == selected { '>' } else { ' ' };
        writeln!(out, "  {marker} {}. {}", idx + 1, option.label)?;
    }
    Ok(())
}

fn render_multi_select(
    field: MultiField,
    selection: &MultiSelection,
    options: &[OptionItem],
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "{}", field.label())?;

    if options.is_empty() {
        return writeln!(out, "  {EMPTY_OPTIONS}");
    }
    for (idx, option) in options.iter().enumerate() {
        let mark = if selection.contains(&option.iri) { 'x' } else { ' ' };
        writeln!(out, "  [{mark}] {}. {}", idx + 1, option.label)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(iri: &str, label: &str) -> OptionItem {
        OptionItem {
            iri: iri.to_string(),
            label: label.to_string(),
        }
    }

    fn one_of_each() -> MetaOptions {
        MetaOptions {
            phases: vec![option("P1", "Phase 1")],
            clusters: vec![option("C1", "Cluster 1")],
            paradigms: vec![option("Pa1", "Paradigm 1")],
            tasks: vec![option("T1", "Task 1")],
            dataset_types: vec![option("D1", "Dataset 1")],
            conditions: vec![option("Co1", "Condition 1"), option("Co2", "Condition 2")],
            performance: vec![option("Pe1", "Performance 1")],
        }
    }

    #[test]
    fn submit_enabled_iff_required_selected_and_idle() {
        for mask in 0_u8..32 {
            let mut form = RecommendationForm::default();
            if mask & 1 != 0 {
                form.select(SingleField::Phase, "P1");
            }
            if mask & 2 != 0 {
                form.select(SingleField::Cluster, "C1");
            }
            if mask & 4 != 0 {
                form.select(SingleField::Paradigm, "Pa1");
            }
            if mask & 8 != 0 {
                form.select(SingleField::Task, "T1");
                form.toggle(MultiField::Conditions, "Co1");
            }
            if mask & 16 != 0 {
                form.select(SingleField::DatasetType, "D1");
                form.set_problem_text("drift in sensor data");
                form.toggle(MultiField::Performance, "Pe1");
            }

            let required = mask & 7 == 7;
            assert_eq!(form.can_submit(false), required, "mask {mask:05b}");
            assert!(!form.can_submit(true), "mask {mask:05b}");
            assert_eq!(form.to_request().is_some(), required, "mask {mask:05b}");
        }
    }

    #[test]
    fn toggling_twice_restores_selection_and_order() {
        let mut selection = MultiSelection::default();
        selection.toggle("a");
        selection.toggle("b");
        selection.toggle("c");
        let before = selection.clone();

        selection.toggle("b");
        assert_eq!(selection.as_slice(), ["a", "c"]);
        selection.toggle("z");
        selection.toggle("z");
        assert_eq!(selection.as_slice(), ["a", "c"]);

        selection.toggle("b");
        assert_eq!(selection.as_slice(), ["a", "c", "b"]);
        assert_ne!(selection, before);

        let mut fresh = before.clone();
        fresh.toggle("q");
        fresh.toggle("q");
        assert_eq!(fresh, before);
    }

    #[test]
    fn request_normalizes_empty_optionals_to_none() {
        let mut form = RecommendationForm::default();
        form.select(SingleField::Phase, "P1");
        form.select(SingleField::Cluster, "C1");
        form.select(SingleField::Paradigm, "Pa1");
        form.toggle(MultiField::Conditions, "Co2");
        form.toggle(MultiField::Conditions, "Co1");

        let request = form.to_request().expect("required fields set");
        assert_eq!(request.problem_text, None);
        assert_eq!(request.task_iri, None);
        assert_eq!(request.dataset_type_iri, None);
        assert_eq!(request.conditions, vec!["Co2", "Co1"]);
        assert!(request.performance_prefs.is_empty());
    }

    #[test]
    fn empty_option_list_shows_message_and_keeps_other_selectors() {
        let meta = MetaOptions {
            tasks: Vec::new(),
            conditions: Vec::new(),
            ..one_of_each()
        };
        let mut form = RecommendationForm::default();
        form.select(SingleField::Phase, "P1");
        form.select(SingleField::Cluster, "C1");
        form.select(SingleField::Paradigm, "Pa1");

        let mut out = Vec::new();
        form.render(&meta, false, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("ML task (optional) [No task filter]\n  No options\n"));
        assert!(text.contains("Conditions\n  No options\n"));
        assert!(text.contains("  > 1. Phase 1"));
        assert!(text.contains("[Recommend methods] (enabled)"));
        assert!(!text.contains(REQUIRED_HINT));
    }

    #[test]
    fn render_shows_hint_and_running_label() {
        let form = RecommendationForm::default();
        let mut out = Vec::new();
        form.render(&one_of_each(), true, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("[Running...] (disabled)"));
        assert!(text.contains(REQUIRED_HINT));
    }

    #[test]
    fn resolve_choice_accepts_rank_iri_label_and_clear() {
        let options = vec![option("urn:p1", "Design"), option("urn:p2", "Deployment")];

        assert_eq!(resolve_choice(&options, "2", "phase"), Ok("urn:p2".to_string()));
        assert_eq!(resolve_choice(&options, "urn:p1", "phase"), Ok("urn:p1".to_string()));
        assert_eq!(resolve_choice(&options, "deployment", "phase"), Ok("urn:p2".to_string()));
        assert_eq!(resolve_choice(&options, "-", "phase"), Ok(String::new()));
        assert!(resolve_choice(&options, "3", "phase").is_err());
        assert!(resolve_choice(&options, "0", "phase").is_err());
    }

    #[test]
    fn reconcile_drops_values_missing_from_fresh_options() {
        let mut form = RecommendationForm::default();
        form.select(SingleField::Phase, "P1");
        form.select(SingleField::Cluster, "gone");
        form.select(SingleField::Task, "T1");
        form.toggle(MultiField::Conditions, "Co2");
        form.toggle(MultiField::Conditions, "old");
        form.toggle(MultiField::Conditions, "Co1");

        form.reconcile(&one_of_each());

        assert_eq!(form.value(SingleField::Phase), "P1");
        assert_eq!(form.value(SingleField::Cluster), "");
        assert_eq!(form.value(SingleField::Task), "T1");
        assert_eq!(form.selection(MultiField::Conditions).as_slice(), ["Co2", "Co1"]);
    }
}
