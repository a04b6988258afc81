//! Mobile disclosure panel state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
        }
    }
}

/// Two-state machine behind the hamburger button.
///
/// Only two transitions exist: `toggle` flips, and `on_route_changed`
/// forces `Closed`. A fresh machine starts `Closed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuStateMachine {
    state: MenuState,
}

impl MenuStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn toggle(&mut self) -> MenuState {
        self.state = match self.state {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        };
        self.state
    }

    pub fn on_route_changed(&mut self) -> MenuState {
        self.state = MenuState::Closed;
        self.state
    }
}
