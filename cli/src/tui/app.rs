use std::sync::Arc;

use ratatui::widgets::TableState;
use taskdesk_core::{
    apply_args, directories, filter_from_args, split_line, ApiError, FilterForm, HttpGateway, Task,
    TaskDirectory, TaskDraft, TaskId, TaskList, TaskListDirectory, TaskListId, TaskQuery,
    TaskQueryRunner, TaskView, ViewScope,
};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Tasks,
    Lists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    Task(TaskId),
    List(TaskListId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Modifying,
    Filtering,
    CreatingList,
    RenamingList,
    Confirm(PendingDelete),
}

pub struct App<G: HttpGateway + 'static> {
    pub tasks: Arc<TaskDirectory<G>>,
    pub lists: Arc<TaskListDirectory<G>>,
    pub view: TaskView<G>,
    pub task_lists: Vec<TaskList>,
    pub task_state: TableState,
    pub list_state: TableState,
    pub pane: Pane,
    pub filter: FilterForm,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
    pub should_quit: bool,
}

fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

fn clamp(state: &mut TableState, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        Some(_) => {}
    }
}

impl<G: HttpGateway + Clone + 'static> App<G> {
    /// Must be called inside a tokio runtime; the first fetch starts right away.
    pub fn new(gateway: G) -> Self {
        let (tasks, lists) = directories(gateway);
        let tasks = Arc::new(tasks);
        let lists = Arc::new(lists);
        let runner = TaskQueryRunner::new(Arc::clone(&tasks), Arc::clone(&lists));
        let mut view = TaskView::new(runner, TaskQuery::global());
        view.refresh();

        App {
            tasks,
            lists,
            view,
            task_lists: Vec::new(),
            task_state: TableState::default(),
            list_state: TableState::default(),
            pane: Pane::Tasks,
            filter: FilterForm::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
            should_quit: false,
        }
    }
}

impl<G: HttpGateway + 'static> App<G> {
    /// Picks up a finished fetch, if any.
    pub fn tick(&mut self) {
        if self.view.poll() {
            clamp(&mut self.task_state, self.view.rows().len());
        }
    }

    pub fn current_list(&self) -> Option<TaskListId> {
        match self.view.query().scope {
            ViewScope::List(id) => Some(id),
            ViewScope::Global => None,
        }
    }

    pub fn scope_title(&self) -> String {
        match self.current_list() {
            Some(id) => match self.task_lists.iter().find(|l| l.id == id) {
                Some(list) => format!("List: {}", list.name),
                None => format!("List #{}", id),
            },
            None => "Global tasks".to_string(),
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.task_state.selected().and_then(|i| self.view.rows().get(i))
    }

    pub fn selected_list(&self) -> Option<&TaskList> {
        self.list_state.selected().and_then(|i| self.task_lists.get(i))
    }

    fn report(&mut self, err: impl ToString) {
        let text = err.to_string();
        warn!(error = %text, "action failed");
        self.message = Some(text);
    }

    pub fn next(&mut self) {
        match self.pane {
            Pane::Tasks => step(&mut self.task_state, self.view.rows().len(), true),
            Pane::Lists => step(&mut self.list_state, self.task_lists.len(), true),
        }
    }

    pub fn previous(&mut self) {
        match self.pane {
            Pane::Tasks => step(&mut self.task_state, self.view.rows().len(), false),
            Pane::Lists => step(&mut self.list_state, self.task_lists.len(), false),
        }
    }

    pub fn refresh(&mut self) {
        self.message = None;
        self.view.refresh();
    }

    pub fn show_global(&mut self) {
        self.pane = Pane::Tasks;
        self.view.set_query(TaskQuery::global().with_form(&self.filter));
    }

    pub async fn show_lists(&mut self) {
        self.pane = Pane::Lists;
        self.reload_lists().await;
    }

    async fn reload_lists(&mut self) {
        match self.lists.list().await {
            Ok(lists) => {
                self.task_lists = lists;
                clamp(&mut self.list_state, self.task_lists.len());
            }
            Err(err) => {
                self.task_lists.clear();
                self.list_state.select(None);
                self.report(err);
            }
        }
    }

    pub fn open_selected_list(&mut self) {
        if let Some(id) = self.selected_list().map(|l| l.id) {
            self.pane = Pane::Tasks;
            self.task_state.select(None);
            self.view.set_query(TaskQuery::list(id).with_form(&self.filter));
        }
    }

    /// Moves the selected task to the next status and swaps in the server's copy.
    pub async fn cycle_status(&mut self) {
        let Some((id, status)) = self
            .selected_task()
            .and_then(|t| Some((t.id?, t.status.next())))
        else {
            return;
        };
        match self.tasks.update_status(id, status).await {
            Ok(task) => {
                self.message = Some(format!("Task {} is now {}", id, task.status.label()));
                self.view.replace_row(task);
            }
            Err(err) => self.report(err),
        }
    }

    /// Detaches the selected task from the open list; the task itself survives.
    pub async fn remove_from_list(&mut self) {
        let (Some(list_id), Some(task_id)) = (
            self.current_list(),
            self.selected_task().and_then(|t| t.id),
        ) else {
            return;
        };
        match self.lists.remove_task(list_id, task_id).await {
            Ok(()) => {
                self.message = Some(format!("Task {} removed from list", task_id));
                self.view.refresh();
            }
            Err(err) => self.report(err),
        }
    }

    pub fn ask_delete(&mut self) {
        let target = match self.pane {
            Pane::Tasks => self.selected_task().and_then(|t| t.id).map(PendingDelete::Task),
            Pane::Lists => self.selected_list().map(|l| PendingDelete::List(l.id)),
        };
        if let Some(target) = target {
            self.input_mode = InputMode::Confirm(target);
        }
    }

    pub async fn confirm_delete(&mut self, target: PendingDelete) {
        self.input_mode = InputMode::Normal;
        match target {
            PendingDelete::Task(id) => match self.tasks.delete(id).await {
                Ok(()) => {
                    self.message = Some(format!("Task {} deleted", id));
                    self.view.refresh();
                }
                Err(err) => self.report(err),
            },
            PendingDelete::List(id) => match self.lists.delete(id).await {
                Ok(()) => {
                    self.message = Some(format!("Task list {} deleted", id));
                    if self.current_list() == Some(id) {
                        self.view.set_query(TaskQuery::global().with_form(&self.filter));
                    }
                    self.reload_lists().await;
                }
                Err(err) => self.report(err),
            },
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    fn enter_input(&mut self, mode: InputMode, prefill: String) {
        self.input_mode = mode;
        self.cursor_position = prefill.chars().count();
        self.input = prefill;
    }

    pub fn enter_add_mode(&mut self) {
        self.enter_input(InputMode::Adding, String::new());
    }

    pub fn enter_modify_mode(&mut self) {
        if self.selected_task().is_some() {
            self.enter_input(InputMode::Modifying, String::new());
        }
    }

    pub fn enter_filter_mode(&mut self) {
        let mut words = Vec::new();
        if let Some(status) = self.filter.status {
            words.push(format!("st:{}", status.as_wire()));
        }
        if let Some(priority) = self.filter.priority {
            words.push(format!("pri:{}", priority.value()));
        }
        if let Some(responsible) = &self.filter.responsible {
            words.push(format!("resp:{}", responsible.replace(' ', "_")));
        }
        self.enter_input(InputMode::Filtering, words.join(" "));
    }

    pub fn enter_create_list_mode(&mut self) {
        self.enter_input(InputMode::CreatingList, String::new());
    }

    pub fn enter_rename_list_mode(&mut self) {
        if let Some(name) = self.selected_list().map(|l| l.name.clone()) {
            self.enter_input(InputMode::RenamingList, name);
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self
                .input
                .chars()
                .take(self.cursor_position - 1)
                .map(|c| c.len_utf8())
                .sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub async fn submit_command(&mut self) {
        let line = std::mem::take(&mut self.input);
        let mode = self.input_mode;
        self.cursor_position = 0;
        self.exit_input_mode();

        // An empty filter line clears the filter; other modes ignore empty input.
        if line.trim().is_empty() && mode != InputMode::Filtering {
            return;
        }

        match mode {
            InputMode::Adding => self.submit_add(&line).await,
            InputMode::Modifying => self.submit_modify(&line).await,
            InputMode::Filtering => self.submit_filter(&line),
            InputMode::CreatingList => self.submit_create_list(&line).await,
            InputMode::RenamingList => self.submit_rename_list(&line).await,
            InputMode::Normal | InputMode::Confirm(_) => {}
        }
    }

    async fn submit_add(&mut self, line: &str) {
        let mut draft = TaskDraft {
            task_list_id: self.current_list(),
            ..TaskDraft::default()
        };
        if let Err(err) = apply_args(&mut draft, &split_line(line)) {
            return self.report(err);
        }
        let task = match draft.validate() {
            Ok(task) => task,
            Err(errors) => return self.report(ApiError::Validation(errors)),
        };
        match self.tasks.create(&task).await {
            Ok(created) => {
                self.message = Some(format!("Task {} created", created.id.unwrap_or_default()));
                self.view.refresh();
            }
            Err(err) => self.report(err),
        }
    }

    async fn submit_modify(&mut self, line: &str) {
        let Some(current) = self.selected_task().cloned() else {
            return;
        };
        let Some(id) = current.id else {
            return;
        };
        let mut draft = TaskDraft::from_task(&current);
        if let Err(err) = apply_args(&mut draft, &split_line(line)) {
            return self.report(err);
        }
        let mut task = match draft.validate() {
            Ok(task) => task,
            Err(errors) => return self.report(ApiError::Validation(errors)),
        };
        task.id = Some(id);
        match self.tasks.update(id, &task).await {
            Ok(updated) => {
                self.message = Some(format!("Task {} updated", id));
                // A task moved out of the open list no longer belongs in the rows.
                if updated.task_list_id != current.task_list_id {
                    self.view.refresh();
                } else {
                    self.view.replace_row(updated);
                }
            }
            Err(err) => self.report(err),
        }
    }

    fn submit_filter(&mut self, line: &str) {
        match filter_from_args(&split_line(line)) {
            Ok(form) => {
                self.filter = form;
                self.message = None;
                self.task_state.select(None);
                self.view.set_form(&self.filter);
            }
            Err(err) => self.report(err),
        }
    }

    async fn submit_create_list(&mut self, line: &str) {
        match self.lists.create(line).await {
            Ok(list) => {
                self.message = Some(format!("Task list '{}' created", list.name));
                self.reload_lists().await;
                if let Some(i) = self.task_lists.iter().position(|l| l.id == list.id) {
                    self.list_state.select(Some(i));
                }
            }
            Err(err) => self.report(err),
        }
    }

    async fn submit_rename_list(&mut self, line: &str) {
        let Some(id) = self.selected_list().map(|l| l.id) else {
            return;
        };
        match self.lists.rename(id, line).await {
            Ok(list) => {
                self.message = Some(format!("Task list renamed to '{}'", list.name));
                self.reload_lists().await;
            }
            Err(err) => self.report(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_wraps_around() {
        let mut state = TableState::default();
        step(&mut state, 3, true);
        assert_eq!(state.selected(), Some(0));
        step(&mut state, 3, false);
        assert_eq!(state.selected(), Some(2));
        step(&mut state, 3, true);
        assert_eq!(state.selected(), Some(0));
        step(&mut state, 0, true);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_clamp_after_rows_shrink() {
        let mut state = TableState::default();
        state.select(Some(5));
        clamp(&mut state, 2);
        assert_eq!(state.selected(), Some(1));
        clamp(&mut state, 0);
        assert_eq!(state.selected(), None);
        clamp(&mut state, 4);
        assert_eq!(state.selected(), Some(0));
    }
}
