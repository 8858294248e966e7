//! Signup flow data model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FlowError;

/// What kind of input a question accepts, with the fields relevant to
/// that kind only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Select {
        #[serde(default)]
        options: Vec<String>,
    },
    Multiselect {
        #[serde(default)]
        options: Vec<String>,
    },
}

impl QuestionKind {
    /// The question's static option list, if it has one.
    pub fn static_options(&self) -> &[String] {
        match self {
            Self::Select { options } | Self::Multiselect { options } => options,
            Self::Text | Self::Number { .. } => &[],
        }
    }
}

/// Ties a question's option set to an earlier answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditional {
    /// Id of an earlier question in the same role's sequence.
    pub question_id: String,
    pub equals: String,
}

/// One question in a role's signup sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Conditional>,
    /// Option lists keyed by the trigger question's value.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub conditional_options: HashMap<String, Vec<String>>,
}

impl Question {
    pub fn text(id: &str, label: &str) -> Self {
        Self::new(id, label, QuestionKind::Text)
    }

    pub fn number(id: &str, label: &str, min: i64, max: i64) -> Self {
        Self::new(
            id,
            label,
            QuestionKind::Number {
                min: Some(min),
                max: Some(max),
            },
        )
    }

    pub fn select<S: Into<String>>(id: &str, label: &str, options: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            id,
            label,
            QuestionKind::Select {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn multiselect<S: Into<String>>(
        id: &str,
        label: &str,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            id,
            label,
            QuestionKind::Multiselect {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    fn new(id: &str, label: &str, kind: QuestionKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            conditional: None,
            conditional_options: HashMap::new(),
        }
    }

    pub fn with_conditional(mut self, question_id: &str, equals: &str) -> Self {
        self.conditional = Some(Conditional {
            question_id: question_id.to_string(),
            equals: equals.to_string(),
        });
        self
    }

    pub fn with_conditional_options<S: Into<String>>(
        mut self,
        trigger: &str,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        self.conditional_options.insert(
            trigger.to_string(),
            options.into_iter().map(Into::into).collect(),
        );
        self
    }
}

/// One signup persona and its question sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub label: String,
    pub questions: Vec<Question>,
    /// Template with `{fieldName}` placeholders, rendered on review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_template: Option<String>,
}

/// The full declarative signup flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupFlow {
    pub welcome_message: String,
    pub roles: Vec<Role>,
}

impl SignupFlow {
    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    /// Check the structural invariant: every conditional must reference an
    /// earlier question within the same role.
    pub fn validate(&self) -> Result<(), FlowError> {
        for role in &self.roles {
            for (idx, question) in role.questions.iter().enumerate() {
                let Some(cond) = &question.conditional else {
                    continue;
                };
                let referenced = role.questions[..idx]
                    .iter()
                    .any(|earlier| earlier.id == cond.question_id);
                if !referenced {
                    return Err(FlowError::BadConditionalReference {
                        question: question.id.clone(),
                        target: cond.question_id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A single accumulated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Number(i64),
    Multi(Vec<String>),
}

impl Answer {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Human-readable rendition: multi values joined with ", ".
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Multi(values) => values.join(", "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
            Self::Multi(values) => values.is_empty(),
        }
    }
}

impl From<&Answer> for Value {
    fn from(answer: &Answer) -> Self {
        match answer {
            Answer::Text(s) => Value::String(s.clone()),
            Answer::Number(n) => Value::from(*n),
            Answer::Multi(values) => Value::from(values.clone()),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
