use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use taskdesk_core::{priority_option, Task, TaskList};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const DESCRIPTION_WIDTH: usize = 40;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Responsible")]
    responsible: String,
    #[tabled(rename = "List")]
    list: String,
}

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tasks")]
    tasks: String,
}

/// Cuts `text` to at most `max` terminal columns, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

fn dash_or<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn render_tasks(tasks: &[Task]) -> String {
    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| TaskRow {
            id: dash_or(task.id),
            description: truncate(&task.description, DESCRIPTION_WIDTH),
            status: task.status.label().to_string(),
            priority: priority_option(task.priority).label.to_string(),
            responsible: task.responsible.clone(),
            list: dash_or(task.task_list_id),
        })
        .collect();
    styled(Table::new(rows))
}

pub fn render_lists(lists: &[TaskList]) -> String {
    let rows: Vec<ListRow> = lists
        .iter()
        .map(|list| ListRow {
            id: list.id,
            name: list.name.clone(),
            tasks: dash_or(list.task_count()),
        })
        .collect();
    styled(Table::new(rows))
}

pub fn describe_task(task: &Task) -> String {
    let option = priority_option(task.priority);
    format!(
        "Task {}: {}\n  Status: {} ({})\n  Priority: {}\n  Responsible: {}\n  List: {}",
        dash_or(task.id),
        task.description,
        task.status.label(),
        task.status.as_wire(),
        option.label,
        task.responsible,
        task.task_list_id.map(|id| id.to_string()).unwrap_or_else(|| "global".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a longer description", 8), "a longe…");
        // Wide characters count double.
        assert_eq!(truncate("日本語のタスク", 6), "日本…");
    }

    #[test]
    fn test_render_tasks_includes_rows() {
        let mut task = Task::new("Buy milk".to_string(), "Alice".to_string());
        task.id = Some(5);
        let out = render_tasks(&[task]);
        assert!(out.contains("Buy milk"));
        assert!(out.contains("Medium"));
        assert!(out.contains("Pending"));
    }
}
