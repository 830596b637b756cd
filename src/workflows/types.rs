use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::priority::Priority;

pub type WorkflowId = i64;
pub type CardId = i64;
pub type SampleRequestId = i64;

/// Status of a single card. Also names the board column the card sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    Pending,
    Ready,
    InProgress,
    Completed,
    Blocked,
}

impl CardStatus {
    /// Column order on the board
    pub const ALL: [CardStatus; 5] = [
        CardStatus::Pending,
        CardStatus::Ready,
        CardStatus::InProgress,
        CardStatus::Completed,
        CardStatus::Blocked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CardStatus::Pending => "pending",
            CardStatus::Ready => "ready",
            CardStatus::InProgress => "in_progress",
            CardStatus::Completed => "completed",
            CardStatus::Blocked => "blocked",
        }
    }

    /// Column heading shown to operators
    pub fn label(self) -> &'static str {
        match self {
            CardStatus::Pending => "Pending",
            CardStatus::Ready => "Ready",
            CardStatus::InProgress => "In Progress",
            CardStatus::Completed => "Completed",
            CardStatus::Blocked => "Blocked",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown card status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for CardStatus {
    type Err = UnknownStatus;

    /// Accepts wire tags (`in_progress`), column labels (`In Progress`)
    /// and dashed variants (`in-progress`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        match normalized.as_str() {
            "pending" => Ok(CardStatus::Pending),
            "ready" => Ok(CardStatus::Ready),
            "in_progress" | "inprogress" => Ok(CardStatus::InProgress),
            "completed" | "complete" | "done" => Ok(CardStatus::Completed),
            "blocked" => Ok(CardStatus::Blocked),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Overall status of a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Active,
    Completed,
    Cancelled,
}

impl WorkflowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::Active => "active",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(WorkflowStatus::Active),
            "completed" => Ok(WorkflowStatus::Completed),
            "cancelled" | "canceled" => Ok(WorkflowStatus::Cancelled),
            other => Err(format!("unknown workflow status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub card_id: CardId,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub card_id: CardId,
    pub file_name: String,
    pub url: String,
    pub size_bytes: u64,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

/// One stage of a workflow (e.g. "Knitting")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub workflow_id: WorkflowId,
    pub stage_name: String,
    pub stage_order: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub status: CardStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blocked_reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub attachments: Vec<Attachment>,
}

impl Card {
    pub fn is_blocked(&self) -> bool {
        self.status == CardStatus::Blocked
    }

    /// `completed_at` must be present exactly when the card is completed.
    /// The server owns the timestamp; this only reports drift.
    pub fn completion_timestamp_consistent(&self) -> bool {
        (self.status == CardStatus::Completed) == self.completed_at.is_some()
    }
}

/// Denormalized sample-request fields carried for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRequestSummary {
    pub sample_id: String,
    pub sample_name: String,
    #[serde(default)]
    pub buyer_name: Option<String>,
}

/// One sample's development pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub sample_request_id: SampleRequestId,
    pub workflow_name: String,
    pub workflow_status: WorkflowStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub sample_request: Option<SampleRequestSummary>,
}

impl Workflow {
    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    /// Cards ordered by stage position
    pub fn cards_sorted(&self) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.iter().collect();
        cards.sort_by_key(|card| card.stage_order);
        cards
    }

    /// True when the workflow claims `completed` while some card is not.
    /// Not enforced as an invariant; surfaced as a diagnostic only.
    pub fn completion_mismatch(&self) -> bool {
        self.workflow_status == WorkflowStatus::Completed
            && self.cards.iter().any(|card| card.status != CardStatus::Completed)
    }
}

/// Deserializes a JSON array into `Vec<T>`; any other value (the API
/// sometimes sends `""` or `null`) becomes an empty sequence.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card_json(comments: serde_json::Value, attachments: serde_json::Value) -> serde_json::Value {
        json!({
            "id": 7,
            "workflow_id": 1,
            "stage_name": "Knitting",
            "stage_order": 2,
            "title": "Knit body panels",
            "status": "in_progress",
            "created_at": "2024-03-01T08:00:00Z",
            "updated_at": "2024-03-02T08:00:00Z",
            "comments": comments,
            "attachments": attachments
        })
    }

    #[test]
    fn test_status_parses_labels_and_tags() {
        assert_eq!("in_progress".parse::<CardStatus>(), Ok(CardStatus::InProgress));
        assert_eq!("In Progress".parse::<CardStatus>(), Ok(CardStatus::InProgress));
        assert_eq!("in-progress".parse::<CardStatus>(), Ok(CardStatus::InProgress));
        assert_eq!("BLOCKED".parse::<CardStatus>(), Ok(CardStatus::Blocked));
        assert!("archived".parse::<CardStatus>().is_err());
    }

    #[test]
    fn test_status_wire_tags_round_trip_through_labels() {
        for status in CardStatus::ALL {
            assert_eq!(status.label().parse::<CardStatus>(), Ok(status));
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                json!(status.as_str())
            );
        }
    }

    #[test]
    fn test_empty_string_collections_become_empty() {
        let card: Card = serde_json::from_value(card_json(json!(""), json!(""))).unwrap();
        assert!(card.comments.is_empty());
        assert!(card.attachments.is_empty());
    }

    #[test]
    fn test_null_and_object_collections_become_empty() {
        let card: Card = serde_json::from_value(card_json(json!(null), json!({"count": 0}))).unwrap();
        assert!(card.comments.is_empty());
        assert!(card.attachments.is_empty());
    }

    #[test]
    fn test_missing_collections_become_empty() {
        let mut value = card_json(json!([]), json!([]));
        let object = value.as_object_mut().unwrap();
        object.remove("comments");
        object.remove("attachments");
        let card: Card = serde_json::from_value(value).unwrap();
        assert!(card.comments.is_empty());
        assert!(card.attachments.is_empty());
    }

    #[test]
    fn test_array_collections_are_kept_in_order() {
        let comments = json!([
            {"id": 1, "card_id": 7, "body": "yarn arrived", "author": "Rina", "created_at": "2024-03-01T09:00:00Z"},
            {"id": 2, "card_id": 7, "body": "machine booked", "author": "Tomas", "created_at": "2024-03-01T10:00:00Z"}
        ]);
        let card: Card = serde_json::from_value(card_json(comments, json!(""))).unwrap();
        assert_eq!(card.comments.len(), 2);
        assert_eq!(card.comments[0].body, "yarn arrived");
        assert_eq!(card.comments[1].author, "Tomas");
    }

    #[test]
    fn test_completion_mismatch_detection() {
        let card: Card = serde_json::from_value(card_json(json!([]), json!([]))).unwrap();
        let workflow = Workflow {
            id: 1,
            sample_request_id: 10,
            workflow_name: "SR-10 pullover".to_string(),
            workflow_status: WorkflowStatus::Completed,
            priority: Priority::Medium,
            created_by: None,
            created_at: card.created_at,
            updated_at: card.updated_at,
            completed_at: None,
            due_date: None,
            cards: vec![card],
            sample_request: None,
        };
        assert!(workflow.completion_mismatch());
        assert!(workflow.cards[0].completion_timestamp_consistent());
    }
}
