//! Color theme for CLI output

use crate::domain::cluster::ClusterState;
use colored::{Color, Colorize};

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

impl ColorTheme {
    /// Get color based on cluster state
    pub fn state_color(&self, state: &ClusterState) -> Option<Color> {
        match state {
            ClusterState::Running | ClusterState::Waiting => Some(self.success),
            ClusterState::Starting | ClusterState::Bootstrapping => Some(self.warning),
            ClusterState::Terminating
            | ClusterState::Terminated
            | ClusterState::TerminatedWithErrors => Some(self.error),
            ClusterState::Unknown(_) => None,
        }
    }
}

/// State label colored with the default theme
pub fn paint_state(state: &ClusterState) -> String {
    match ColorTheme::default().state_color(state) {
        Some(color) => state.as_str().color(color).to_string(),
        None => state.to_string(),
    }
}
