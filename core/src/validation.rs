use crate::error::ValidationErrors;
use crate::model::task::{Priority, Task, TaskListId, TaskStatus};
use crate::model::task_list::MIN_LIST_NAME_LEN;

const MIN_DESCRIPTION_LEN: usize = 3;
const REQUIRED: &str = "This field is required.";

/// Task form input before validation. Defaults match a fresh form: Medium, Pending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub description: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub responsible: String,
    pub task_list_id: Option<TaskListId>,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            responsible: task.responsible.clone(),
            task_list_id: task.task_list_id,
        }
    }

    /// Checks every field and reports all violations together.
    pub fn validate(&self) -> Result<Task, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let description = self.description.trim();
        if description.is_empty() {
            errors.add("description", REQUIRED);
        } else if description.chars().count() < MIN_DESCRIPTION_LEN {
            errors.add("description", format!("Min length is {}.", MIN_DESCRIPTION_LEN));
        }

        let responsible = self.responsible.trim();
        if responsible.is_empty() {
            errors.add("responsible", REQUIRED);
        }

        errors.into_result()?;

        Ok(Task {
            id: None,
            description: description.to_string(),
            priority: self.priority,
            status: self.status,
            responsible: responsible.to_string(),
            task_list_id: self.task_list_id,
        })
    }
}

/// Returns the trimmed name when it is long enough to submit.
pub fn validate_list_name(name: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.add("name", "Name is required.");
    } else if trimmed.chars().count() < MIN_LIST_NAME_LEN {
        errors.add(
            "name",
            format!("Name must be at least {} characters.", MIN_LIST_NAME_LEN),
        );
    }
    errors.into_result()?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_draft_becomes_task() {
        let draft = TaskDraft {
            description: "  Buy milk ".to_string(),
            responsible: "Alice".to_string(),
            task_list_id: Some(4),
            ..Default::default()
        };
        let task = draft.validate().unwrap();
        assert_eq!(task.id, None);
        assert_eq!(task.description, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.task_list_id, Some(4));
    }

    #[test]
    fn test_reports_every_field() {
        let errors = TaskDraft::default().validate().unwrap_err();
        assert_eq!(errors.errors().len(), 2);
        assert_eq!(errors.for_field("description"), Some(REQUIRED));
        assert_eq!(errors.for_field("responsible"), Some(REQUIRED));
    }

    #[test]
    fn test_short_description() {
        let draft = TaskDraft {
            description: "ab".to_string(),
            responsible: "Bob".to_string(),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.for_field("description"), Some("Min length is 3."));
        assert_eq!(errors.for_field("responsible"), None);
    }

    #[test]
    fn test_list_name_rules() {
        assert_eq!(validate_list_name("  Groceries ").unwrap(), "Groceries");
        assert_eq!(validate_list_name("abc").unwrap(), "abc");

        let errors = validate_list_name(" ab ").unwrap_err();
        assert_eq!(errors.for_field("name"), Some("Name must be at least 3 characters."));

        let errors = validate_list_name("   ").unwrap_err();
        assert_eq!(errors.for_field("name"), Some("Name is required."));
    }
}
