use crate::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// One unit of dispatched work. Only the dispatcher moves it through its
/// states; everyone else gets read access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    label: String,
    state: WorkState,
    message: String,
    slot: Option<usize>,
}

impl WorkItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: WorkState::Pending,
            message: String::new(),
            slot: None,
        }
    }

    pub fn batch<I, S>(labels: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels.into_iter().map(Self::new).collect()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> WorkState {
        self.state
    }

    /// Success text or error text, empty until the item finishes.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Row the caller registered for this item when it started.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, WorkState::Succeeded | WorkState::Failed)
    }

    /// The failure as an error value, for items that failed.
    pub fn failure(&self) -> Option<DashboardError> {
        (self.state == WorkState::Failed).then(|| DashboardError::OperationFailure {
            label: self.label.clone(),
            message: self.message.clone(),
        })
    }

    pub(super) fn mark_running(&mut self) {
        self.state = WorkState::Running;
    }

    pub(super) fn assign_slot(&mut self, slot: Option<usize>) {
        self.slot = slot;
    }

    pub(super) fn finish(&mut self, outcome: Result<String, String>) {
        match outcome {
            Ok(message) => {
                self.state = WorkState::Succeeded;
                self.message = message;
            }
            Err(message) => {
                self.state = WorkState::Failed;
                self.message = message;
            }
        }
    }
}
