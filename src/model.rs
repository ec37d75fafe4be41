use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub iri: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetaOptions {
    pub phases: Vec<OptionItem>,
    pub clusters: Vec<OptionItem>,
    pub paradigms: Vec<OptionItem>,
    pub tasks: Vec<OptionItem>,
    pub dataset_types: Vec<OptionItem>,
    pub conditions: Vec<OptionItem>,
    pub performance: Vec<OptionItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub problem_text: Option<String>,
    pub phase_iri: String,
    pub cluster_iri: String,
    pub paradigm_iri: String,
    pub task_iri: Option<String>,
    #[serde(default)]
    pub dataset_type_iri: Option<String>,
    pub conditions: Vec<String>,
    pub performance_prefs: Vec<String>,
}

// Dataset type is not scored by the backend and is not sent.
#[derive(Debug, Serialize)]
pub struct ScoringPayload<'a> {
    pub problem_text: Option<&'a str>,
    pub phase_iri: &'a str,
    pub cluster_iri: &'a str,
    pub paradigm_iri: &'a str,
    pub task_iri: Option<&'a str>,
    pub conditions: &'a [String],
    pub performance_prefs: &'a [String],
}

impl<'a> From<&'a RecommendationRequest> for ScoringPayload<'a> {
    fn from(request: &'a RecommendationRequest) -> Self {
        Self {
            problem_text: request.problem_text.as_deref(),
            phase_iri: &request.phase_iri,
            cluster_iri: &request.cluster_iri,
            paradigm_iri: &request.paradigm_iri,
            task_iri: request.task_iri.as_deref(),
            conditions: &request.conditions,
            performance_prefs: &request.performance_prefs,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailsPayload<'a> {
    #[serde(flatten)]
    pub request: &'a RecommendationRequest,
    pub approach_iri: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRow {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub method_label: Option<String>,
    #[serde(default)]
    pub approach: Option<String>,
    #[serde(default)]
    pub approach_label: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub supporting_articles: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub possible_if_matches: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub performance_matches: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub task_matches: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub task_match: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleItem {
    #[serde(default)]
    pub article: Option<String>,
    pub doi: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchItem {
    pub iri: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matches {
    #[serde(default)]
    pub conditions: Vec<MatchItem>,
    #[serde(default)]
    pub performance: Vec<MatchItem>,
    #[serde(default)]
    pub tasks: Vec<MatchItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDetailsResponse {
    pub approach_iri: String,
    #[serde(default)]
    pub articles: Vec<ArticleItem>,
    #[serde(default)]
    pub matches: Matches,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.as_f64()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scoring_payload_omits_dataset_type_and_keeps_nulls() {
        let request = RecommendationRequest {
            problem_text: None,
            phase_iri: "P1".to_string(),
            cluster_iri: "C1".to_string(),
            paradigm_iri: "Pa1".to_string(),
            task_iri: None,
            dataset_type_iri: Some("D1".to_string()),
            conditions: Vec::new(),
            performance_prefs: Vec::new(),
        };

        let payload = serde_json::to_value(ScoringPayload::from(&request)).expect("serializes");
        assert_eq!(
            payload,
            json!({
                "problem_text": null,
                "phase_iri": "P1",
                "cluster_iri": "C1",
                "paradigm_iri": "Pa1",
                "task_iri": null,
                "conditions": [],
                "performance_prefs": []
            })
        );
    }

    #[test]
    fn details_payload_flattens_request_with_approach() {
        let request = RecommendationRequest {
            phase_iri: "P1".to_string(),
            cluster_iri: "C1".to_string(),
            paradigm_iri: "Pa1".to_string(),
            conditions: vec!["c2".to_string(), "c1".to_string()],
            ..RecommendationRequest::default()
        };

        let payload = serde_json::to_value(DetailsPayload {
            request: &request,
            approach_iri: "urn:a1",
        })
        .expect("serializes");

        assert_eq!(payload["approach_iri"], "urn:a1");
        assert_eq!(payload["phase_iri"], "P1");
        assert_eq!(payload["dataset_type_iri"], Value::Null);
        assert_eq!(payload["conditions"], json!(["c2", "c1"]));
    }

    #[test]
    fn row_tolerates_legacy_names_and_non_numeric_stats() {
        let row: RecommendationRow = serde_json::from_value(json!({
            "method": "urn:m1",
            "methodLabel": "Method One",
            "supportingArticles": "3",
            "performanceMatches": null,
            "taskMatch": 2
        }))
        .expect("legacy row should deserialize");

        assert_eq!(row.method_label.as_deref(), Some("Method One"));
        assert_eq!(row.supporting_articles, None);
        assert_eq!(row.performance_matches, None);
        assert_eq!(row.task_matches, None);
        assert_eq!(row.task_match, Some(2.0));
    }

    #[test]
    fn details_response_defaults_missing_collections() {
        let response: RecommendationDetailsResponse =
            serde_json::from_value(json!({ "approachIri": "urn:a1" })).expect("deserializes");
        assert!(response.articles.is_empty());
        assert_eq!(response.matches, Matches::default());
    }
}
