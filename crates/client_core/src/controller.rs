//! User-initiated operations against the clock service.
//!
//! Each operation validates locally, calls the service, raises exactly one
//! outcome alert and only then starts any refresh it triggers. View state sits
//! behind a mutex that is released before every remote await, so a second
//! operation started while one is in flight runs independently.

use std::sync::Arc;

use shared::{
    domain::{Event, Process, ProcessId},
    protocol::{EventCreated, MessageDelivered},
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    directory::ProcessDirectory,
    error::{OperationError, RefreshTarget},
    notifications::NotificationCenter,
    timeline::{project, TimelineProjection},
    transport::ClockService,
};

const PROCESS_NAME_REQUIRED: &str = "Process name is required.";
const SEND_FIELDS_REQUIRED: &str = "Select the sender and receiver and enter a message.";
const FETCH_PROCESSES_FAILED: &str = "Failed to fetch processes!";
const FETCH_EVENTS_FAILED: &str = "Failed to fetch events!";
const CREATE_PROCESS_FAILED: &str = "Failed to create process!";
const CREATE_EVENT_FAILED: &str = "Failed to create event!";
const SEND_MESSAGE_FAILED: &str = "Failed to send message!";

/// Sender/receiver chosen for the next message. Set from the process table or
/// the message form; both write the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub source: Option<ProcessId>,
    pub destination: Option<ProcessId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub process_name: String,
    pub message_content: String,
}

struct ViewState {
    directory: ProcessDirectory,
    events: Arc<[Event]>,
    timeline: Arc<TimelineProjection>,
    selection: Selection,
    forms: FormInputs,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            directory: ProcessDirectory::new(),
            events: Arc::from(Vec::new()),
            timeline: Arc::new(TimelineProjection::default()),
            selection: Selection::default(),
            forms: FormInputs::default(),
        }
    }
}

pub struct InteractionController {
    service: Arc<dyn ClockService>,
    notifications: NotificationCenter,
    state: Mutex<ViewState>,
}

impl InteractionController {
    pub fn new(service: Arc<dyn ClockService>, notifications: NotificationCenter) -> Self {
        Self {
            service,
            notifications,
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub async fn directory(&self) -> ProcessDirectory {
        self.state.lock().await.directory.clone()
    }

    pub async fn processes(&self) -> Arc<[Process]> {
        self.state.lock().await.directory.snapshot()
    }

    pub async fn events(&self) -> Arc<[Event]> {
        Arc::clone(&self.state.lock().await.events)
    }

    pub async fn timeline(&self) -> Arc<TimelineProjection> {
        Arc::clone(&self.state.lock().await.timeline)
    }

    pub async fn selection(&self) -> Selection {
        self.state.lock().await.selection
    }

    pub async fn forms(&self) -> FormInputs {
        self.state.lock().await.forms.clone()
    }

    pub async fn select_sender(&self, process_id: ProcessId) {
        self.state.lock().await.selection.source = Some(process_id);
    }

    pub async fn select_receiver(&self, process_id: ProcessId) {
        self.state.lock().await.selection.destination = Some(process_id);
    }

    pub async fn set_selection(&self, selection: Selection) {
        self.state.lock().await.selection = selection;
    }

    pub async fn set_process_name(&self, name: impl Into<String>) {
        self.state.lock().await.forms.process_name = name.into();
    }

    pub async fn set_message_content(&self, content: impl Into<String>) {
        self.state.lock().await.forms.message_content = content.into();
    }

    /// Initial fetch of both mirrors. Reports the first failure, if any.
    pub async fn load(&self) -> Result<(), OperationError> {
        let (processes, events) =
            futures::join!(self.refresh_processes(), self.refresh_events());
        processes.and(events)
    }

    pub async fn refresh_processes(&self) -> Result<(), OperationError> {
        match self.service.list_processes().await {
            Ok(processes) => {
                debug!(count = processes.len(), "process list refreshed");
                self.state.lock().await.directory.replace(processes);
                Ok(())
            }
            Err(source) => {
                error!(error = %source, "failed to fetch processes");
                self.notifications.danger(FETCH_PROCESSES_FAILED);
                Err(OperationError::Fetch {
                    target: RefreshTarget::Processes,
                    source,
                })
            }
        }
    }

    pub async fn refresh_events(&self) -> Result<(), OperationError> {
        match self.service.list_events().await {
            Ok(events) => {
                debug!(count = events.len(), "event list refreshed");
                let timeline = Arc::new(project(&events));
                let mut state = self.state.lock().await;
                state.events = Arc::from(events);
                state.timeline = timeline;
                Ok(())
            }
            Err(source) => {
                error!(error = %source, "failed to fetch events");
                self.notifications.danger(FETCH_EVENTS_FAILED);
                Err(OperationError::Fetch {
                    target: RefreshTarget::Events,
                    source,
                })
            }
        }
    }

    /// Creates a process from the name currently typed into the form.
    pub async fn submit_process_form(&self) -> Result<Process, OperationError> {
        let name = self.state.lock().await.forms.process_name.clone();
        self.create_process(&name).await
    }

    pub async fn create_process(&self, name: &str) -> Result<Process, OperationError> {
        if name.trim().is_empty() {
            warn!("create process rejected: blank name");
            self.notifications.warning(PROCESS_NAME_REQUIRED);
            return Err(OperationError::Validation(PROCESS_NAME_REQUIRED));
        }

        let process = match self.service.create_process(name).await {
            Ok(process) => process,
            Err(source) => {
                error!(error = %source, name, "failed to create process");
                self.notifications.danger(CREATE_PROCESS_FAILED);
                return Err(OperationError::Remote(source));
            }
        };

        {
            let mut state = self.state.lock().await;
            state.directory.append(process.clone());
            state.forms.process_name.clear();
        }
        info!(process_id = %process.id, name = %process.name, "process created");
        self.notifications
            .success(format!("Process \"{}\" created successfully!", process.name));
        Ok(process)
    }

    pub async fn create_event(
        &self,
        process_id: ProcessId,
    ) -> Result<EventCreated, OperationError> {
        if !self.state.lock().await.directory.contains(process_id) {
            debug!(%process_id, "creating event for process missing from local mirror");
        }

        let created = match self.service.create_event(process_id).await {
            Ok(created) => created,
            Err(source) => {
                error!(error = %source, %process_id, "failed to create event");
                self.notifications.danger(CREATE_EVENT_FAILED);
                return Err(OperationError::Remote(source));
            }
        };

        info!(
            %process_id,
            logical_clock = ?created.logical_clock,
            description = %created.description,
            "event created"
        );
        self.notifications
            .success(format!("Event created: {}", created.description));
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Sends the form's message between the selected processes. The content
    /// and selection are left in place so the same message can be resent.
    pub async fn send_message(&self) -> Result<MessageDelivered, OperationError> {
        let (selection, content) = {
            let state = self.state.lock().await;
            (state.selection, state.forms.message_content.clone())
        };
        self.send_message_between(selection.source, selection.destination, &content)
            .await
    }

    pub async fn send_message_between(
        &self,
        source: Option<ProcessId>,
        destination: Option<ProcessId>,
        content: &str,
    ) -> Result<MessageDelivered, OperationError> {
        let (Some(source), Some(destination)) = (source, destination) else {
            return Err(self.reject_send());
        };
        if content.trim().is_empty() {
            return Err(self.reject_send());
        }

        let delivered = match self
            .service
            .send_message(source, destination, content)
            .await
        {
            Ok(delivered) => delivered,
            Err(source_err) => {
                error!(error = %source_err, %source, %destination, "failed to send message");
                self.notifications.danger(SEND_MESSAGE_FAILED);
                return Err(OperationError::Remote(source_err));
            }
        };

        info!(
            %source,
            %destination,
            logical_clock = ?delivered.logical_clock,
            "message delivered"
        );
        self.notifications
            .success(format!("Message sent: {}", delivered.message));
        self.refresh_after_mutation().await;
        Ok(delivered)
    }

    fn reject_send(&self) -> OperationError {
        warn!("send message rejected: missing sender, receiver or content");
        self.notifications.warning(SEND_FIELDS_REQUIRED);
        OperationError::Validation(SEND_FIELDS_REQUIRED)
    }

    /// Refetches both mirrors after a successful mutation. Failures are
    /// already surfaced as alerts and do not undo the mutation.
    async fn refresh_after_mutation(&self) {
        if let Err(err) = self.load().await {
            warn!(error = %err, "refresh after mutation failed");
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
