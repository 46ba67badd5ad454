use shared::domain::{LinkStatus, NavigationState};

/// Tracks the committed location and any navigation still loading.
#[derive(Debug, Clone)]
pub struct Navigator {
    location: String,
    state: NavigationState,
}

impl Navigator {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            state: NavigationState::Idle,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Starting a new navigation replaces any pending one.
    pub fn begin(&mut self, target: impl Into<String>) {
        self.state = NavigationState::Pending {
            target: target.into(),
        };
    }

    /// Commits the pending target. Does nothing when idle.
    pub fn complete(&mut self) {
        if let NavigationState::Pending { target } =
            std::mem::replace(&mut self.state, NavigationState::Idle)
        {
            self.location = target;
        }
    }

    pub fn cancel(&mut self) {
        self.state = NavigationState::Idle;
    }

    pub fn link_status(&self, link: &str) -> LinkStatus {
        LinkStatus::for_link(link, &self.location, &self.state)
    }
}
