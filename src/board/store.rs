// Board orchestration
//
// The store owns the displayed workflows. Displayed state is only ever
// replaced wholesale by a successful reload; mutations go to the server
// first and are never applied locally.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn, Instrument};

use super::events::{BoardError, BoardEvent, Notice, UpdateStep};
use crate::api::{
    AssigneeUpdate, CreateWorkflowRequest, StatusUpdate, WorkflowApi, WorkflowFilter,
};
use crate::telemetry::{create_board_span, generate_correlation_id};
use crate::workflows::{
    validate_transition, Card, CardId, CardStatus, TransitionError, Workflow, WorkflowId,
};

/// What the board is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardScope {
    /// Every workflow matching the filter
    All(WorkflowFilter),
    /// A single workflow, when the board is opened from one sample
    Workflow(WorkflowId),
}

impl Default for BoardScope {
    fn default() -> Self {
        BoardScope::All(WorkflowFilter::default())
    }
}

/// Partial card update. Status and assignee go to separate endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardUpdate {
    pub status: Option<CardStatus>,
    pub assignee: Option<String>,
    pub blocked_reason: Option<String>,
}

impl CardUpdate {
    pub fn status(status: CardStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn assignee(assignee: impl Into<String>) -> Self {
        Self {
            assignee: Some(assignee.into()),
            ..Default::default()
        }
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_blocked_reason(mut self, reason: impl Into<String>) -> Self {
        self.blocked_reason = Some(reason.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assignee.is_none()
    }
}

#[derive(Debug, Default)]
struct BoardState {
    scope: BoardScope,
    workflows: Vec<Workflow>,
    dragging: Option<CardId>,
    in_flight: HashSet<CardId>,
    notices: Vec<Notice>,
    loads_in_flight: usize,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl BoardState {
    fn card(&self, card_id: CardId) -> Option<&Card> {
        self.workflows
            .iter()
            .flat_map(|workflow| workflow.cards.iter())
            .find(|card| card.id == card_id)
    }

    fn prepare_transition(&mut self, card_id: CardId, target: CardStatus) -> Result<CardStatus, BoardError> {
        let from = self
            .card(card_id)
            .map(|card| card.status)
            .ok_or(BoardError::CardNotFound { card_id })?;
        if self.in_flight.contains(&card_id) {
            return Err(BoardError::CardBusy { card_id });
        }
        validate_transition(from, target)?;
        self.in_flight.insert(card_id);
        Ok(from)
    }

    /// Reserve a card for a combined update. An unchanged status is
    /// dropped; an invalid one is returned as a failed step so the
    /// assignee call still runs.
    fn prepare_update(
        &mut self,
        card_id: CardId,
        update: &CardUpdate,
    ) -> Result<Option<Result<CardStatus, TransitionError>>, BoardError> {
        if update.is_empty() {
            return Err(BoardError::EmptyUpdate { card_id });
        }
        let current = self
            .card(card_id)
            .map(|card| card.status)
            .ok_or(BoardError::CardNotFound { card_id })?;
        if self.in_flight.contains(&card_id) {
            return Err(BoardError::CardBusy { card_id });
        }

        let status_step = update
            .status
            .filter(|target| *target != current)
            .map(|target| validate_transition(current, target).map(|()| target));

        if update.assignee.is_none() {
            match status_step {
                None => return Err(TransitionError::SameStatus { status: current }.into()),
                Some(Err(err)) => return Err(err.into()),
                Some(Ok(_)) => {}
            }
        }

        self.in_flight.insert(card_id);
        Ok(status_step)
    }

    fn reject(&mut self, err: BoardError) -> BoardError {
        warn!(error = %err, "Board operation rejected");
        self.notices.push(Notice::error(err.to_string()));
        err
    }
}

/// Owner of the board's workflows, drag session and notices.
///
/// Cloning is cheap and shares state, so several user actions can be in
/// flight at once. Whichever reload finishes last is what the board shows.
#[derive(Clone)]
pub struct BoardStore {
    api: Arc<dyn WorkflowApi>,
    state: Arc<Mutex<BoardState>>,
}

impl std::fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardStore").finish_non_exhaustive()
    }
}

impl BoardStore {
    pub fn new(api: Arc<dyn WorkflowApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(BoardState::default())),
        }
    }

    pub fn with_scope(api: Arc<dyn WorkflowApi>, scope: BoardScope) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(BoardState {
                scope,
                ..Default::default()
            })),
        }
    }

    /// Show all workflows matching `filter`. Takes effect on the next load.
    pub async fn set_filter(&self, filter: WorkflowFilter) {
        self.state.lock().await.scope = BoardScope::All(filter);
    }

    /// Show a single workflow. Takes effect on the next load.
    pub async fn scope_to_workflow(&self, workflow_id: WorkflowId) {
        self.state.lock().await.scope = BoardScope::Workflow(workflow_id);
    }

    /// Fetch workflows for the current scope and replace the displayed set.
    /// On failure the last successfully loaded state stays on screen.
    pub async fn load(&self) -> Result<(), BoardError> {
        let scope = {
            let mut state = self.state.lock().await;
            state.loads_in_flight += 1;
            state.scope.clone()
        };

        let result = match &scope {
            BoardScope::All(filter) => self.api.list_workflows(filter).await,
            BoardScope::Workflow(workflow_id) => self
                .api
                .get_workflow(*workflow_id)
                .await
                .map(|workflow| vec![workflow]),
        };

        let mut state = self.state.lock().await;
        state.loads_in_flight -= 1;
        match result {
            Ok(workflows) => {
                for workflow in &workflows {
                    if workflow.completion_mismatch() {
                        warn!(
                            workflow_id = workflow.id,
                            "Workflow is marked completed but has unfinished cards"
                        );
                    }
                    for card in workflow.cards.iter().filter(|c| !c.completion_timestamp_consistent()) {
                        warn!(
                            workflow_id = workflow.id,
                            card_id = card.id,
                            status = %card.status,
                            completed_at = ?card.completed_at,
                            "Card completion timestamp does not match its status"
                        );
                    }
                }
                debug!(count = workflows.len(), "Board reloaded");
                state.workflows = workflows;
                state.last_loaded_at = Some(Utc::now());
                Ok(())
            }
            Err(err) => {
                let err = BoardError::Api(err);
                state.notices.push(Notice::error(format!("Failed to load workflows: {err}")));
                warn!(error = %err, "Board reload failed");
                Err(err)
            }
        }
    }

    /// Submit a new workflow, then reload
    pub async fn create_workflow(&self, request: CreateWorkflowRequest) -> Result<Workflow, BoardError> {
        if request.workflow_name.trim().is_empty() {
            let mut state = self.state.lock().await;
            return Err(state.reject(BoardError::InvalidRequest {
                message: "workflow name is required".to_string(),
            }));
        }

        let correlation_id = generate_correlation_id();
        let span = create_board_span("create_workflow", None, None, Some(&correlation_id));

        async {
            info!(
                sample_request_id = request.sample_request_id,
                priority = %request.priority,
                "Creating workflow"
            );
            let created = match self.api.create_workflow(&request).await {
                Ok(created) => created,
                Err(err) => {
                    let mut state = self.state.lock().await;
                    state.notices.push(Notice::error(format!("Failed to create workflow: {err}")));
                    return Err(BoardError::Api(err));
                }
            };

            self.state
                .lock()
                .await
                .notices
                .push(Notice::info(format!("Workflow '{}' created", created.workflow_name)));
            self.load().await?;
            Ok(created)
        }
        .instrument(span)
        .await
    }

    /// Move a card to `target` after checking the transition table.
    /// Invalid moves never reach the API.
    pub async fn transition_card(
        &self,
        card_id: CardId,
        target: CardStatus,
        blocked_reason: Option<String>,
    ) -> Result<(), BoardError> {
        let from = {
            let mut state = self.state.lock().await;
            match state.prepare_transition(card_id, target) {
                Ok(from) => from,
                Err(err) => return Err(state.reject(err)),
            }
        };

        let correlation_id = generate_correlation_id();
        let span = create_board_span("transition_card", None, Some(card_id), Some(&correlation_id));

        let result = async {
            info!(card_id, from = %from, to = %target, "Moving card");
            let update = StatusUpdate::new(target).with_blocked_reason(blocked_reason);
            if let Err(err) = self.api.update_card_status(card_id, &update).await {
                let mut state = self.state.lock().await;
                state
                    .notices
                    .push(Notice::error(format!("Failed to move card to {}: {err}", target.label())));
                return Err(BoardError::Api(err));
            }
            self.load().await?;
            self.state
                .lock()
                .await
                .notices
                .push(Notice::info(format!("Card moved to {}", target.label())));
            Ok(())
        }
        .instrument(span)
        .await;

        self.release(card_id).await;
        result
    }

    /// Apply a partial update. Status and assignee are two independent
    /// calls: either may fail while the other succeeds. A status equal to
    /// the card's current one is skipped, and a status the table forbids
    /// fails its step without a call. The board reloads after the calls
    /// regardless.
    pub async fn update_card(&self, card_id: CardId, update: CardUpdate) -> Result<(), BoardError> {
        let status_step = {
            let mut state = self.state.lock().await;
            match state.prepare_update(card_id, &update) {
                Ok(step) => step,
                Err(err) => return Err(state.reject(err)),
            }
        };

        let correlation_id = generate_correlation_id();
        let span = create_board_span("update_card", None, Some(card_id), Some(&correlation_id));

        let result = async {
            let mut succeeded = Vec::new();
            let mut failed: Vec<(UpdateStep, BoardError)> = Vec::new();

            match status_step {
                Some(Ok(target)) => {
                    let status_update =
                        StatusUpdate::new(target).with_blocked_reason(update.blocked_reason.clone());
                    match self.api.update_card_status(card_id, &status_update).await {
                        Ok(()) => succeeded.push(UpdateStep::Status),
                        Err(err) => failed.push((UpdateStep::Status, err.into())),
                    }
                }
                Some(Err(err)) => failed.push((UpdateStep::Status, err.into())),
                None => debug!(card_id, "Status unchanged, skipping status update"),
            }

            if let Some(assignee) = &update.assignee {
                let assignee_update = AssigneeUpdate {
                    assigned_to: assignee.trim().to_string(),
                };
                match self.api.update_card_assignee(card_id, &assignee_update).await {
                    Ok(()) => succeeded.push(UpdateStep::Assignee),
                    Err(err) => failed.push((UpdateStep::Assignee, err.into())),
                }
            }

            {
                let mut state = self.state.lock().await;
                for (step, err) in &failed {
                    state
                        .notices
                        .push(Notice::error(format!("Failed to update card {step}: {err}")));
                }
            }

            let reload = self.load().await;

            let mut failed = failed.into_iter();
            match (succeeded.first(), failed.next()) {
                (_, None) => {
                    info!(card_id, "Card updated");
                    reload
                }
                (Some(&succeeded), Some((failed, error))) => {
                    warn!(card_id, %succeeded, %failed, "Card partially updated");
                    Err(BoardError::PartialUpdate {
                        card_id,
                        succeeded,
                        failed,
                        error: Box::new(error),
                    })
                }
                (None, Some((_, error))) => Err(error),
            }
        }
        .instrument(span)
        .await;

        self.release(card_id).await;
        result
    }

    /// Entry point for drag-and-drop interaction
    pub async fn handle(&self, event: BoardEvent) -> Result<(), BoardError> {
        match event {
            BoardEvent::DragStarted { card_id } => {
                self.state.lock().await.dragging = Some(card_id);
                Ok(())
            }
            BoardEvent::DragCancelled => {
                self.state.lock().await.dragging = None;
                Ok(())
            }
            BoardEvent::CardDropped {
                card_id,
                target_label,
                blocked_reason,
            } => {
                let target = {
                    let mut state = self.state.lock().await;
                    state.dragging = None;
                    match target_label.parse::<CardStatus>() {
                        Ok(target) => target,
                        Err(_) => {
                            return Err(state.reject(BoardError::UnknownTarget { label: target_label }))
                        }
                    }
                };
                self.transition_card(card_id, target, blocked_reason).await
            }
        }
    }

    async fn release(&self, card_id: CardId) {
        self.state.lock().await.in_flight.remove(&card_id);
    }

    /// Card currently being dragged, for visual feedback
    pub async fn dragging(&self) -> Option<CardId> {
        self.state.lock().await.dragging
    }

    /// True while any load is outstanding
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loads_in_flight > 0
    }

    pub async fn is_card_busy(&self, card_id: CardId) -> bool {
        self.state.lock().await.in_flight.contains(&card_id)
    }

    pub async fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_loaded_at
    }

    /// Copy of the displayed workflows
    pub async fn snapshot(&self) -> Vec<Workflow> {
        self.state.lock().await.workflows.clone()
    }

    pub async fn workflow(&self, workflow_id: WorkflowId) -> Option<Workflow> {
        self.state
            .lock()
            .await
            .workflows
            .iter()
            .find(|workflow| workflow.id == workflow_id)
            .cloned()
    }

    pub async fn card(&self, card_id: CardId) -> Option<Card> {
        self.state.lock().await.card(card_id).cloned()
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.state.lock().await.notices.clone()
    }

    /// Drain pending notices once they have been shown
    pub async fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().await.notices)
    }
}
