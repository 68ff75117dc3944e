//! Competition window, exposed to views as `gametime`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    NotStarted,
    Running,
    Over,
}

/// Start and end of the game as unix timestamps; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameTime {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// What views receive.
#[derive(Debug, Clone, Serialize)]
pub struct GameTimeView {
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub state: GameState,
}

impl From<&GameConfig> for GameTime {
    fn from(config: &GameConfig) -> Self {
        Self {
            start: config.start,
            end: config.end,
        }
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl GameTime {
    pub fn state_at(&self, at: u64) -> GameState {
        if self.start.is_some_and(|start| at < start) {
            GameState::NotStarted
        } else if self.end.is_some_and(|end| at >= end) {
            GameState::Over
        } else {
            GameState::Running
        }
    }

    pub fn state(&self) -> GameState {
        self.state_at(now())
    }

    pub fn started(&self) -> bool {
        self.state() != GameState::NotStarted
    }

    pub fn over(&self) -> bool {
        self.state() == GameState::Over
    }

    pub fn view(&self) -> GameTimeView {
        GameTimeView {
            start: self.start,
            end: self.end,
            state: self.state(),
        }
    }
}
