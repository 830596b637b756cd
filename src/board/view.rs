//! Read-only lane, column and card views
//!
//! Views borrow the board's workflows and never mutate them. Interaction
//! is reported upward as [`BoardEvent`]s.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt::Write as _;

use super::events::BoardEvent;
use crate::workflows::{Card, CardId, CardStatus, Workflow};

/// `round(100 * completed / total)`, or 0 for an empty workflow
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // Integer form of floor(100k/n + 0.5)
    ((200 * completed + total) / (2 * total)) as u8
}

/// One workflow rendered across the five status columns
#[derive(Debug, Clone, Copy)]
pub struct LaneView<'a> {
    workflow: &'a Workflow,
}

impl<'a> LaneView<'a> {
    pub fn new(workflow: &'a Workflow) -> Self {
        Self { workflow }
    }

    pub fn workflow(&self) -> &'a Workflow {
        self.workflow
    }

    pub fn total_count(&self) -> usize {
        self.workflow.cards.len()
    }

    pub fn completed_count(&self) -> usize {
        self.workflow
            .cards
            .iter()
            .filter(|card| card.status == CardStatus::Completed)
            .count()
    }

    pub fn progress(&self) -> u8 {
        progress_percent(self.completed_count(), self.total_count())
    }

    /// Lane-level warning badge
    pub fn has_blocked(&self) -> bool {
        self.workflow.cards.iter().any(Card::is_blocked)
    }

    pub fn column(&self, status: CardStatus) -> ColumnView<'a> {
        let mut cards: Vec<&'a Card> = self
            .workflow
            .cards
            .iter()
            .filter(|card| card.status == status)
            .collect();
        cards.sort_by_key(|card| card.stage_order);
        ColumnView { status, cards }
    }

    /// Exactly five columns in board order
    pub fn columns(&self) -> [ColumnView<'a>; 5] {
        CardStatus::ALL.map(|status| self.column(status))
    }
}

/// One status bucket inside a lane. Also the drop target for that status.
#[derive(Debug, Clone)]
pub struct ColumnView<'a> {
    pub status: CardStatus,
    pub cards: Vec<&'a Card>,
}

impl<'a> ColumnView<'a> {
    pub fn label(&self) -> &'static str {
        self.status.label()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Report a drop onto this column. Validation happens in the board.
    pub fn dropped(&self, card_id: CardId, blocked_reason: Option<String>) -> BoardEvent {
        BoardEvent::CardDropped {
            card_id,
            target_label: self.label().to_string(),
            blocked_reason,
        }
    }
}

/// Display data for one card
#[derive(Debug, Clone, PartialEq)]
pub struct CardView<'a> {
    pub card_id: CardId,
    pub status: CardStatus,
    pub stage_name: &'a str,
    pub title: &'a str,
    pub description_preview: Option<String>,
    pub assignee: Option<&'a str>,
    pub assignee_initials: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub overdue: bool,
    pub comment_count: usize,
    pub attachment_count: usize,
    pub blocked: bool,
    pub blocked_reason: Option<&'a str>,
}

impl<'a> CardView<'a> {
    pub fn new(card: &'a Card, now: DateTime<Utc>, preview_chars: usize) -> Self {
        let today = now.date_naive();
        let assignee = card
            .assigned_to
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        Self {
            card_id: card.id,
            status: card.status,
            stage_name: &card.stage_name,
            title: &card.title,
            description_preview: card
                .description
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(|text| truncate(text, preview_chars)),
            assignee,
            assignee_initials: assignee.and_then(initials),
            due_date: card.due_date,
            overdue: card.status != CardStatus::Completed
                && card.due_date.is_some_and(|due| due < today),
            comment_count: card.comments.len(),
            attachment_count: card.attachments.len(),
            blocked: card.is_blocked(),
            blocked_reason: card
                .blocked_reason
                .as_deref()
                .filter(|_| card.is_blocked()),
        }
    }

    /// Drag source identity is the card id
    pub fn drag_started(&self) -> BoardEvent {
        BoardEvent::DragStarted {
            card_id: self.card_id,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{}...", kept.trim_end())
}

fn initials(name: &str) -> Option<String> {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    (!letters.is_empty()).then_some(letters)
}

/// Plain-text rendering of a lane for terminals
pub fn render_lane(lane: &LaneView<'_>, now: DateTime<Utc>, preview_chars: usize) -> String {
    let workflow = lane.workflow();
    let mut out = String::new();

    let _ = write!(
        out,
        "#{} {} [{}] priority {}",
        workflow.id, workflow.workflow_name, workflow.workflow_status, workflow.priority
    );
    if let Some(sample) = &workflow.sample_request {
        let _ = write!(out, " | {} {}", sample.sample_id, sample.sample_name);
        if let Some(buyer) = &sample.buyer_name {
            let _ = write!(out, " ({buyer})");
        }
    }
    let _ = writeln!(
        out,
        "\n  progress {}% ({}/{}){}",
        lane.progress(),
        lane.completed_count(),
        lane.total_count(),
        if lane.has_blocked() { "  ⚠ BLOCKED" } else { "" }
    );

    for column in lane.columns() {
        let _ = writeln!(out, "  {} ({})", column.label(), column.len());
        for card in &column.cards {
            let view = CardView::new(card, now, preview_chars);
            let _ = write!(out, "    [{}] {}: {}", view.card_id, view.stage_name, view.title);
            if let Some(initials) = &view.assignee_initials {
                let _ = write!(out, " @{initials}");
            }
            if let Some(due) = view.due_date {
                let _ = write!(out, " due {due}");
                if view.overdue {
                    let _ = write!(out, " (overdue)");
                }
            }
            if view.comment_count > 0 || view.attachment_count > 0 {
                let _ = write!(
                    out,
                    " 💬{} 📎{}",
                    view.comment_count, view.attachment_count
                );
            }
            let _ = writeln!(out);
            if let Some(preview) = &view.description_preview {
                let _ = writeln!(out, "        {preview}");
            }
            if view.blocked {
                let _ = writeln!(
                    out,
                    "        BLOCKED: {}",
                    view.blocked_reason.unwrap_or("no reason given")
                );
            }
        }
    }

    out
}
