use crate::model::task::{Priority, Task, TaskStatus};

/// One active filter dimension. Listing without a filter is `None` at the call site.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskFilter {
    Status(TaskStatus),
    Priority(Priority),
    Responsible(String),
}

/// Whether plain task listings keep tasks that belong to a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingScope {
    #[default]
    GlobalOnly,
    All,
}

impl ListingScope {
    pub fn admits(self, task: &Task) -> bool {
        match self {
            ListingScope::GlobalOnly => task.is_global(),
            ListingScope::All => true,
        }
    }
}

/// Raw filter inputs as a user fills them in; any combination may be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterForm {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub responsible: Option<String>,
}

impl FilterForm {
    /// Picks the single dimension honored by the global listing: priority, then
    /// responsible, then status.
    pub fn resolve(&self) -> Option<TaskFilter> {
        self.priority_filter()
            .or_else(|| self.responsible_filter())
            .or_else(|| self.status_filter())
    }

    /// Inside one list the order is status, then priority, then responsible.
    pub fn resolve_for_list(&self) -> Option<TaskFilter> {
        self.status_filter()
            .or_else(|| self.priority_filter())
            .or_else(|| self.responsible_filter())
    }

    fn status_filter(&self) -> Option<TaskFilter> {
        self.status.map(TaskFilter::Status)
    }

    fn priority_filter(&self) -> Option<TaskFilter> {
        self.priority.map(TaskFilter::Priority)
    }

    fn responsible_filter(&self) -> Option<TaskFilter> {
        let responsible = self.responsible.as_deref()?.trim();
        if responsible.is_empty() {
            None
        } else {
            Some(TaskFilter::Responsible(responsible.to_string()))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resolve().is_none()
    }
}

/// Local status predicate for endpoints that cannot filter by status. Order is preserved.
pub fn filter_by_status(tasks: Vec<Task>, status: TaskStatus, scope: ListingScope) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|t| t.status == status && scope.admits(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, status: TaskStatus, list: Option<i64>) -> Task {
        let mut t = Task::new(format!("task {}", id), "Alice".to_string());
        t.id = Some(id);
        t.status = status;
        t.task_list_id = list;
        t
    }

    #[test]
    fn test_filter_by_status_preserves_order() {
        let tasks = vec![
            task(1, TaskStatus::Done, None),
            task(2, TaskStatus::Pending, None),
            task(3, TaskStatus::Done, Some(9)),
            task(4, TaskStatus::Done, None),
        ];

        let all = filter_by_status(tasks.clone(), TaskStatus::Done, ListingScope::All);
        let ids: Vec<_> = all.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);

        let global = filter_by_status(tasks, TaskStatus::Done, ListingScope::GlobalOnly);
        let ids: Vec<_> = global.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_filter_by_status_no_match() {
        let tasks = vec![task(1, TaskStatus::Pending, None)];
        assert!(filter_by_status(tasks, TaskStatus::Done, ListingScope::All).is_empty());
    }

    #[test]
    fn test_resolve_precedence() {
        let form = FilterForm {
            status: Some(TaskStatus::Done),
            priority: Some(Priority::High),
            responsible: Some("Bob".to_string()),
        };
        assert_eq!(form.resolve(), Some(TaskFilter::Priority(Priority::High)));

        let form = FilterForm {
            status: Some(TaskStatus::Done),
            priority: None,
            responsible: Some("  Bob ".to_string()),
        };
        assert_eq!(form.resolve(), Some(TaskFilter::Responsible("Bob".to_string())));

        let form = FilterForm {
            status: Some(TaskStatus::Done),
            priority: None,
            responsible: Some("   ".to_string()),
        };
        assert_eq!(form.resolve(), Some(TaskFilter::Status(TaskStatus::Done)));

        assert!(FilterForm::default().is_empty());
    }

    #[test]
    fn test_resolve_for_list_precedence() {
        let form = FilterForm {
            status: Some(TaskStatus::Done),
            priority: Some(Priority::High),
            responsible: Some("Bob".to_string()),
        };
        assert_eq!(form.resolve_for_list(), Some(TaskFilter::Status(TaskStatus::Done)));

        let form = FilterForm {
            status: None,
            priority: Some(Priority::Low),
            responsible: Some("Bob".to_string()),
        };
        assert_eq!(form.resolve_for_list(), Some(TaskFilter::Priority(Priority::Low)));

        let form = FilterForm {
            status: None,
            priority: None,
            responsible: Some(" Mary Ann ".to_string()),
        };
        assert_eq!(
            form.resolve_for_list(),
            Some(TaskFilter::Responsible("Mary Ann".to_string()))
        );

        let blank = FilterForm {
            responsible: Some("  ".to_string()),
            ..FilterForm::default()
        };
        assert_eq!(blank.resolve_for_list(), None);
    }
}
