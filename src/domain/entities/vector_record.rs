use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted issue together with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: u64,
    pub jira_key: Option<String>,
    pub summary: String,
    pub description: Option<String>,
    pub vector: Vec<f32>,
    pub indexed_at: DateTime<Utc>,
}

/// A record waiting for the store to assign its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub jira_key: Option<String>,
    pub summary: String,
    pub description: Option<String>,
    pub vector: Vec<f32>,
}

impl NewRecord {
    pub fn into_record(self, id: u64, indexed_at: DateTime<Utc>) -> VectorRecord {
        VectorRecord {
            id,
            jira_key: self.jira_key,
            summary: self.summary,
            description: self.description,
            vector: self.vector,
            indexed_at,
        }
    }
}

/// Issue fields as handed to the service, before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueInput {
    #[serde(default)]
    pub jira_key: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl IssueInput {
    pub fn new(jira_key: Option<&str>, summary: &str, description: Option<&str>) -> Self {
        Self {
            jira_key: jira_key.map(String::from),
            summary: summary.to_string(),
            description: description.map(String::from),
        }
    }

    /// Text representation for embedding: summary and description on separate lines.
    pub fn embedding_text(&self) -> String {
        format!("{}\n{}", self.summary, self.description.as_deref().unwrap_or(""))
    }

    pub fn into_new_record(self, vector: Vec<f32>) -> NewRecord {
        NewRecord {
            jira_key: self.jira_key,
            summary: self.summary,
            description: self.description,
            vector,
        }
    }
}

/// A candidate paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: VectorRecord,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text_joins_fields() {
        let input = IssueInput::new(Some("PROJ-1"), "Login broken", Some("500 on submit"));
        assert_eq!(input.embedding_text(), "Login broken\n500 on submit");
    }

    #[test]
    fn test_embedding_text_without_description() {
        let input = IssueInput::new(None, "Login broken", None);
        assert_eq!(input.embedding_text(), "Login broken\n");
    }

    #[test]
    fn test_issue_input_optional_fields_default() {
        let input: IssueInput = serde_json::from_str(r#"{"summary":"Only summary"}"#).unwrap();
        assert_eq!(input.jira_key, None);
        assert_eq!(input.description, None);
    }
}
