use serde::{Deserialize, Serialize};

use crate::model::task::{Task, TaskListId};

pub const MIN_LIST_NAME_LEN: usize = 3;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskList {
    pub id: TaskListId,
    pub name: String,
    // Only some backend versions embed the member tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

impl TaskList {
    pub fn task_count(&self) -> Option<usize> {
        self.tasks.as_ref().map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_without_embedded_tasks() {
        let list: TaskList = serde_json::from_value(json!({"id": 1, "name": "Groceries"})).unwrap();
        assert_eq!(list.name, "Groceries");
        assert_eq!(list.task_count(), None);
    }

    #[test]
    fn test_list_with_embedded_tasks() {
        let list: TaskList = serde_json::from_value(json!({
            "id": 1,
            "name": "Groceries",
            "tasks": [{
                "id": 10,
                "description": "Buy milk",
                "priority": 1,
                "status": "PENDENTE",
                "responsible": "Alice",
                "taskListId": 1
            }]
        }))
        .unwrap();
        assert_eq!(list.task_count(), Some(1));
    }
}
