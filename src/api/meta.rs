use std::thread::{self, Scope, ScopedJoinHandle};

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::model::{MetaOptions, OptionItem};

use super::{ApiClient, ApiError};

pub const PHASES_PATH: &str = "/meta/phases";
pub const CLUSTERS_PATH: &str = "/meta/clusters";
pub const PARADIGMS_PATH: &str = "/meta/paradigms";
pub const TASKS_PATH: &str = "/meta/tasks";
pub const DATASET_TYPES_PATH: &str = "/meta/enums/dataset-types";
pub const CONDITIONS_PATH: &str = "/meta/enums/conditions";
pub const PERFORMANCE_PATH: &str = "/meta/enums/performance";

type ListHandle<'scope> = ScopedJoinHandle<'scope, Result<Vec<OptionItem>, ApiError>>;

pub fn load_meta(client: &ApiClient) -> Result<MetaOptions> {
    thread::scope(|scope| {
        let phases = spawn_list(scope, client, PHASES_PATH);
        let clusters = spawn_list(scope, client, CLUSTERS_PATH);
        let paradigms = spawn_list(scope, client, PARADIGMS_PATH);
        let tasks = spawn_list(scope, client, TASKS_PATH);
        let dataset_types = spawn_list(scope, client, DATASET_TYPES_PATH);
        let conditions = spawn_list(scope, client, CONDITIONS_PATH);
        let performance = spawn_list(scope, client, PERFORMANCE_PATH);

        let phases = join_list(phases, PHASES_PATH);
        let clusters = join_list(clusters, CLUSTERS_PATH);
        let paradigms = join_list(paradigms, PARADIGMS_PATH);
        let tasks = join_list(tasks, TASKS_PATH);
        let dataset_types = join_list(dataset_types, DATASET_TYPES_PATH);
        let conditions = join_list(conditions, CONDITIONS_PATH);
        let performance = join_list(performance, PERFORMANCE_PATH);

        Ok(MetaOptions {
            phases: phases?,
            clusters: clusters?,
            paradigms: paradigms?,
            tasks: tasks?,
            dataset_types: dataset_types?,
            conditions: conditions?,
            performance: performance?,
        })
    })
}

fn spawn_list<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    client: &'env ApiClient,
    path: &'static str,
) -> ListHandle<'scope> {
    scope.spawn(move || client.get_list::<OptionItem>(path))
}

fn join_list(handle: ListHandle<'_>, path: &str) -> Result<Vec<OptionItem>> {
    let options = handle
        .join()
        .map_err(|_| anyhow!("metadata worker for {path} panicked"))??;
    debug!(path, count = options.len(), "loaded option list");
    Ok(options)
}
