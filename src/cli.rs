use clap::{Args, Parser, Subcommand};

use crate::config::{API_BASE_URL_ENV, HTTP_TIMEOUT_ENV};

#[derive(Parser, Debug)]
#[command(
    name = "mlguide",
    version,
    about = "Terminal client for the ML method recommendation service"
)]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and print the selectable option lists.
    Meta(MetaArgs),
    /// Submit a recommendation request and print the ranked results.
    Recommend(RecommendArgs),
    /// Show supporting evidence for one approach.
    Details(DetailsArgs),
    /// Interactive session with the form, results and details pages.
    Shell,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ApiArgs {
    #[arg(long, global = true, env = API_BASE_URL_ENV)]
    pub api_base_url: Option<String>,

    #[arg(long, global = true, env = HTTP_TIMEOUT_ENV)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    #[arg(long)]
    pub problem_text: Option<String>,

    #[arg(long)]
    pub phase: Option<String>,

    #[arg(long)]
    pub cluster: Option<String>,

    #[arg(long)]
    pub paradigm: Option<String>,

    #[arg(long)]
    pub task: Option<String>,

    #[arg(long)]
    pub dataset_type: Option<String>,

    #[arg(long = "condition")]
    pub conditions: Vec<String>,

    #[arg(long = "performance")]
    pub performance_prefs: Vec<String>,
}

impl RequestArgs {
    /// True when none of the required selections were given.
    pub fn is_unset(&self) -> bool {
        self.phase.is_none() && self.cluster.is_none() && self.paradigm.is_none()
    }
}

#[derive(Args, Debug, Clone)]
pub struct MetaArgs {
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DetailsArgs {
    /// Approach IRI as returned in a result row (not percent-encoded).
    pub approach_iri: String,

    #[command(flatten)]
    pub request: RequestArgs,

    /// Only list supporting articles whose label or DOI contains this text.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
