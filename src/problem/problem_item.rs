use super::task_item::TaskItem;
use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a problem item
pub type ProblemId = Uuid;

/// Get the current time in UTC
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Which list a problem is filed in
///
/// Every state can be reached from every other state through an explicit status
/// change. There is no terminal state: completed problems can be reactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemStatus {
    /// Deferred for later
    Backlog,
    /// Currently being worked on
    Active,
    /// Done; all of its steps are done too
    Completed,
}

impl ProblemStatus {
    pub const ALL: [ProblemStatus; 3] = [
        ProblemStatus::Backlog,
        ProblemStatus::Active,
        ProblemStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemStatus::Backlog => "backlog",
            ProblemStatus::Active => "active",
            ProblemStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(ProblemStatus::Backlog),
            "active" => Ok(ProblemStatus::Active),
            "completed" => Ok(ProblemStatus::Completed),
            _ => Err(format!(
                "Invalid status '{}'. Valid options are: backlog, active, completed",
                s
            )),
        }
    }
}

/// What appending a step does to the steps already on a problem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Mark the previous last step done before appending, so only one step is open
    #[default]
    AdvanceOnAppend,
    /// Leave earlier steps alone; they are closed with an explicit toggle
    ManualToggle,
}

/// A captured problem and the steps planned for it
///
/// Two items are equal when their ids are equal, whatever their other fields hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemItem {
    /// Unique identifier, fixed at creation
    pub id: ProblemId,
    /// Free-text description of the problem
    pub problem: String,
    /// Steps in the order they were added
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
    /// Current list
    pub status: ProblemStatus,
    /// When the problem last moved into `completed`; absent otherwise
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "timestamp::deserialize_option"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    /// When the problem was captured
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// When the problem was last changed; never earlier than `created_at`
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl PartialEq for ProblemItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProblemItem {}

impl Hash for ProblemItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl ProblemItem {
    /// File a problem for later: backlog status, no steps
    pub fn new(problem: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem: problem.into(),
            tasks: Vec::new(),
            status: ProblemStatus::Backlog,
            completed_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Start on a problem now: active status with its first step
    pub fn start(
        problem: impl Into<String>,
        first_step: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            tasks: vec![TaskItem::new(first_step)],
            status: ProblemStatus::Active,
            ..Self::new(problem, at)
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProblemStatus::Completed
    }

    /// The most recently added step
    pub fn current_task(&self) -> Option<&TaskItem> {
        self.tasks.last()
    }

    /// Number of done steps and total number of steps
    pub fn progress(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|t| t.is_done).count();
        (done, self.tasks.len())
    }

    /// Refresh `updated_at`, keeping it no earlier than `created_at`
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at.max(self.created_at);
    }

    /// Move the problem to another list
    ///
    /// Completing a problem marks every step done and stamps `completed_at`;
    /// leaving `completed` clears the stamp. Setting `completed` again keeps the
    /// original stamp.
    pub fn set_status(&mut self, status: ProblemStatus, at: DateTime<Utc>) {
        match status {
            ProblemStatus::Completed => {
                for task in self.tasks.iter_mut() {
                    task.is_done = true;
                }
                if !self.is_completed() || self.completed_at.is_none() {
                    self.completed_at = Some(at.max(self.created_at));
                }
            }
            ProblemStatus::Backlog | ProblemStatus::Active => {
                self.completed_at = None;
            }
        }
        self.status = status;
        self.touch(at);
    }

    /// Append a new open step at the end
    pub fn append_task(&mut self, text: impl Into<String>, policy: StepPolicy, at: DateTime<Utc>) {
        if policy == StepPolicy::AdvanceOnAppend
            && let Some(last) = self.tasks.last_mut()
        {
            last.is_done = true;
        }
        self.tasks.push(TaskItem::new(text));
        self.touch(at);
    }

    /// Flip the done flag of the last step
    ///
    /// # Returns
    /// `false` when the problem has no steps, in which case nothing changes
    pub fn toggle_last_task_done(&mut self, at: DateTime<Utc>) -> bool {
        match self.tasks.last_mut() {
            Some(last) => {
                last.is_done = !last.is_done;
                self.touch(at);
                true
            }
            None => false,
        }
    }
}
