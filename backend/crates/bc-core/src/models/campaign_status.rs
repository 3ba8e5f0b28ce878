use crate::{CoreError, JobAction, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Campaign lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Created, recipients not yet materialized
    #[default]
    Draft,
    /// Snapshot materialized, waiting for a worker slot
    Queued,
    /// A worker is delivering
    Running,
    /// Halted by the user (or by an empty sender pool); resumable
    Paused,
    /// Halted for good; remaining records stay pending
    Stopped,
    Completed,
    CompletedWithErrors,
    /// Aborted by a resolution or infrastructure error
    Failed,
}

/// What a control action does to a campaign in a given status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Move the campaign to the given status
    Apply(CampaignStatus),
    /// The campaign is already where the action would take it
    NoOp,
}

impl CampaignStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Completed => "completed",
            Self::CompletedWithErrors => "completed_with_errors",
            Self::Failed => "failed",
        }
    }

    /// No further transitions are possible from a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Stopped | Self::Completed | Self::CompletedWithErrors | Self::Failed
        )
    }

    /// Whether the worker loop must stop picking up recipients
    pub fn halts_dispatch(&self) -> bool {
        matches!(self, Self::Paused) || self.is_terminal()
    }

    /// Final status of a run that drained every pending record
    pub fn finished(failed_count: i64) -> Self {
        if failed_count > 0 {
            Self::CompletedWithErrors
        } else {
            Self::Completed
        }
    }

    /// Resolve a control action against the current status.
    ///
    /// `start` and `resume` on a campaign that is already queued or running are
    /// no-ops, so a duplicated request never spawns a second worker.
    #[track_caller]
    pub fn check_action(&self, action: JobAction) -> CoreErrorResult<ActionOutcome> {
        use ActionOutcome::{Apply, NoOp};

        let outcome = match (action, self) {
            (JobAction::Start, Self::Draft) => Some(Apply(Self::Queued)),
            (JobAction::Start, Self::Queued | Self::Running) => Some(NoOp),

            (JobAction::Pause, Self::Queued | Self::Running) => Some(Apply(Self::Paused)),
            (JobAction::Pause, Self::Paused) => Some(NoOp),

            (JobAction::Resume, Self::Paused) => Some(Apply(Self::Queued)),
            (JobAction::Resume, Self::Queued | Self::Running) => Some(NoOp),

            (JobAction::Stop, Self::Queued | Self::Running | Self::Paused) => {
                Some(Apply(Self::Stopped))
            }
            (JobAction::Stop, Self::Stopped) => Some(NoOp),

            _ => None,
        };

        outcome.ok_or_else(|| CoreError::InvalidTransition {
            action: action.as_str().to_string(),
            status: self.as_str().to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl FromStr for CampaignStatus {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "draft" => Ok(Self::Draft),
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "stopped" => Ok(Self::Stopped),
            "completed" => Ok(Self::Completed),
            "completed_with_errors" => Ok(Self::CompletedWithErrors),
            "failed" => Ok(Self::Failed),
            _ => Err(CoreError::InvalidCampaignStatus {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
