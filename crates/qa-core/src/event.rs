//! Real-time event envelope.
//!
//! Every state change pushed to dashboard clients travels as
//! `{"type": "<kind>", "data": {...}}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::question::model::Question;
use crate::response::model::Response;

/// Kind of state change carried by an [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NewQuestion,
    QuestionUpdated,
    NewResponse,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewQuestion => "new_question",
            Self::QuestionUpdated => "question_updated",
            Self::NewResponse => "new_response",
        }
    }
}

/// Immutable `{type, data}` message sent over real-time connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    kind: EventKind,
    data: Value,
}

impl Envelope {
    pub fn new(kind: EventKind, data: Value) -> Self {
        Self { kind, data }
    }

    /// A question was created.
    pub fn new_question(question: &Question) -> Self {
        Self::new(EventKind::NewQuestion, question_payload(question))
    }

    /// A question's status changed.
    pub fn question_updated(question: &Question) -> Self {
        Self::new(EventKind::QuestionUpdated, question_payload(question))
    }

    /// A response was posted.
    pub fn new_response(response: &Response) -> Self {
        Self::new(
            EventKind::NewResponse,
            serde_json::json!({
                "response_id": response.response_id,
                "question_id": response.question_id,
                "message": response.message,
                "created_at": response.created_at.to_rfc3339(),
                "guest_name": response.guest_name,
                "username": response.username,
            }),
        )
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn question_payload(question: &Question) -> Value {
    serde_json::json!({
        "question_id": question.question_id,
        "message": question.message,
        "status": question.status.as_str(),
        "created_at": question.created_at.to_rfc3339(),
        "guest_name": question.guest_name,
        "username": question.username,
        "response_count": question.response_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::model::QuestionStatus;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_wire_shape() {
        let env = Envelope::new(EventKind::NewQuestion, serde_json::json!({"question_id": 1}));
        assert_eq!(
            env.to_json().unwrap(),
            r#"{"type":"new_question","data":{"question_id":1}}"#
        );
    }

    #[test]
    fn test_question_updated_payload() {
        let question = Question {
            question_id: 3,
            message: "Is lunch included?".to_string(),
            status: QuestionStatus::Answered,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            guest_name: None,
            username: Some("alice".to_string()),
            response_count: 2,
        };

        let env = Envelope::question_updated(&question);
        assert_eq!(env.kind(), EventKind::QuestionUpdated);
        assert_eq!(env.data()["status"], "Answered");
        assert_eq!(env.data()["created_at"], "2024-05-01T12:00:00+00:00");
        assert_eq!(env.data()["guest_name"], Value::Null);
        assert_eq!(env.data()["response_count"], 2);

        let parsed: Value = serde_json::from_str(&env.to_json().unwrap()).unwrap();
        assert_eq!(parsed["type"], "question_updated");
    }
}
