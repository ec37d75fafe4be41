use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Value, json};

use super::http::{Method, RawResponse, Transport};
use super::meta;

#[derive(Debug, Clone)]
enum Scripted {
    Respond(RawResponse),
    Fail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: HashMap<(Method, String), Scripted>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_json(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.respond_text(method, path, status, &body.to_string())
    }

    pub fn respond_text(mut self, method: Method, path: &str, status: u16, text: &str) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            Scripted::Respond(RawResponse {
                status,
                text: text.to_string(),
            }),
        );
        self
    }

    pub fn fail(mut self, method: Method, path: &str, reason: &str) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            Scripted::Fail(reason.to_string()),
        );
        self
    }

    pub fn with_single_option_meta(self) -> Self {
        [
            (meta::PHASES_PATH, "P1", "Phase 1"),
            (meta::CLUSTERS_PATH, "C1", "Cluster 1"),
            (meta::PARADIGMS_PATH, "Pa1", "Paradigm 1"),
            (meta::TASKS_PATH, "T1", "Task 1"),
            (meta::DATASET_TYPES_PATH, "D1", "Dataset 1"),
            (meta::CONDITIONS_PATH, "Co1", "Condition 1"),
            (meta::PERFORMANCE_PATH, "Pe1", "Performance 1"),
        ]
        .into_iter()
        .fold(self, |transport, (path, iri, label)| {
            transport.respond_json(
                Method::Get,
                path,
                200,
                json!([{ "iri": iri, "label": label }]),
            )
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.path == path)
            .collect()
    }
}

impl Transport for FakeTransport {
    fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<RawResponse, String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                method,
                path: path.to_string(),
                payload: payload.cloned(),
            });
        }

        match self.routes.get(&(method, path.to_string())) {
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            Some(Scripted::Fail(reason)) => Err(reason.clone()),
            None => Err(format!("no scripted response for {method} {path}")),
        }
    }
}
