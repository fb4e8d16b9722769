use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Server-assigned question identifier.
///
/// Parses from the string form carried in `data-id` metadata.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(QuestionId)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub full_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub body: String,
}

/// A question as the API returns it.
///
/// The collection endpoint omits `author` and `answers`, so both default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Question {
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.full_name.as_str())
            .unwrap_or("unknown")
    }
}

/// Body of `POST /questions`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
}

/// Body of `PATCH /questions/{id}`. Absent fields are left out of the JSON.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl QuestionPatch {
    /// Builds a patch holding only the fields that differ from `current`.
    pub fn diff(current: &Question, title: &str, body: &str) -> Self {
        Self {
            title: (current.title != title).then(|| title.to_string()),
            body: (current.body != body).then(|| body.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}

#[derive(Serialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Hand-written so the password never lands in a log line.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Whatever `POST /session` hands back. The client treats it as opaque.
pub type Session = serde_json::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_parses_from_data_attribute() {
        assert_eq!("31".parse::<QuestionId>(), Ok(QuestionId(31)));
        assert_eq!(" 7 ".parse::<QuestionId>(), Ok(QuestionId(7)));
        assert!("abc".parse::<QuestionId>().is_err());
        assert!("".parse::<QuestionId>().is_err());
    }

    #[test]
    fn test_list_entry_without_author_or_answers_decodes() {
        let json = r#"[{"id": 1, "title": "T", "body": "B", "created_at": "2019-01-01"}]"#;
        let questions: Vec<Question> = serde_json::from_str(json).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, QuestionId(1));
        assert!(questions[0].author.is_none());
        assert!(questions[0].answers.is_empty());
        assert_eq!(questions[0].author_name(), "unknown");
    }

    #[test]
    fn test_detail_decodes_nested_author_and_answers() {
        let json = r#"{
            "id": 31,
            "title": "Why?",
            "body": "Because.",
            "author": {"full_name": "Jon Snow"},
            "answers": [{"body": "first"}, {"body": "second"}]
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.author_name(), "Jon Snow");
        assert_eq!(question.answers[1].body, "second");
    }

    #[test]
    fn test_patch_omits_absent_fields() {
        let patch = QuestionPatch {
            title: Some("new".to_string()),
            body: None,
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"title": "new"}));
    }

    #[test]
    fn test_patch_diff_keeps_only_changed_fields() {
        let current = Question {
            id: QuestionId(1),
            title: "old".to_string(),
            body: "same".to_string(),
            author: None,
            answers: vec![],
        };
        let patch = QuestionPatch::diff(&current, "new", "same");
        assert_eq!(patch.title.as_deref(), Some("new"));
        assert!(patch.body.is_none());
        assert!(QuestionPatch::diff(&current, "old", "same").is_empty());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials {
            email: "hano@codecore.com".to_string(),
            password: "supersecret".to_string(),
        };
        let printed = format!("{:?}", creds);
        assert!(printed.contains("hano@codecore.com"));
        assert!(!printed.contains("supersecret"));
    }
}
