use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TaskId = i64;
pub type TaskListId = i64;

/// Task priority. Travels over the wire as the bare integer 0, 1 or 2.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn value(self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        priority.value()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Priority::Low),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::High),
            other => Err(format!("invalid priority {}, expected 0, 1 or 2", other)),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "l" | "low" => Ok(Priority::Low),
            "1" | "m" | "med" | "medium" => Ok(Priority::Medium),
            "2" | "h" | "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority: '{}'", other)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[serde(rename = "PENDENTE")]
    Pending,
    #[serde(rename = "EM_ANDAMENTO")]
    InProgress,
    #[serde(rename = "CONCLUIDA")]
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Done,
    ];

    /// The value the backend stores and expects in query strings and bodies.
    pub fn as_wire(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDENTE",
            TaskStatus::InProgress => "EM_ANDAMENTO",
            TaskStatus::Done => "CONCLUIDA",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Pending -> InProgress -> Done -> Pending.
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Pending,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "PENDENTE" | "PENDING" | "P" => Ok(TaskStatus::Pending),
            "EM_ANDAMENTO" | "IN_PROGRESS" | "INPROGRESS" | "I" => Ok(TaskStatus::InProgress),
            "CONCLUIDA" | "DONE" | "D" => Ok(TaskStatus::Done),
            _ => Err(format!("Unknown status: '{}'", s.trim())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub responsible: String,
    // Owning list; None means the task is global.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_list_id: Option<TaskListId>,
}

impl Task {
    pub fn new(description: String, responsible: String) -> Self {
        Self {
            id: None,
            description,
            priority: Priority::default(),
            status: TaskStatus::default(),
            responsible,
            task_list_id: None,
        }
    }

    pub fn is_global(&self) -> bool {
        self.task_list_id.is_none()
    }
}
