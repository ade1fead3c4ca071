use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::gateway::HttpGateway;
use crate::model::filter::{FilterForm, TaskFilter};
use crate::model::task::{Task, TaskListId};
use crate::service::task_directory::TaskDirectory;
use crate::service::task_list_directory::TaskListDirectory;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    Global,
    List(TaskListId),
}

/// What the task table should currently show.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskQuery {
    pub scope: ViewScope,
    pub filter: Option<TaskFilter>,
}

impl TaskQuery {
    pub fn global() -> Self {
        Self { scope: ViewScope::Global, filter: None }
    }

    pub fn list(id: TaskListId) -> Self {
        Self { scope: ViewScope::List(id), filter: None }
    }

    pub fn with_filter(mut self, filter: Option<TaskFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Resolves `form` with the precedence of this query's scope.
    pub fn with_form(self, form: &FilterForm) -> Self {
        let filter = match self.scope {
            ViewScope::Global => form.resolve(),
            ViewScope::List(_) => form.resolve_for_list(),
        };
        self.with_filter(filter)
    }
}

#[derive(Debug)]
pub struct QueryOutcome {
    pub generation: u64,
    pub query: TaskQuery,
    pub result: ApiResult<Vec<Task>>,
}

/// Runs the fetch for the current query. A newer `submit` aborts the older fetch,
/// and outcomes from earlier generations are dropped if they still arrive.
pub struct TaskQueryRunner<G: HttpGateway + 'static> {
    tasks: Arc<TaskDirectory<G>>,
    lists: Arc<TaskListDirectory<G>>,
    debounce: Duration,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    tx: UnboundedSender<QueryOutcome>,
    rx: UnboundedReceiver<QueryOutcome>,
}

impl<G: HttpGateway + 'static> TaskQueryRunner<G> {
    pub fn new(tasks: Arc<TaskDirectory<G>>, lists: Arc<TaskListDirectory<G>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tasks,
            lists,
            debounce: DEFAULT_DEBOUNCE,
            generation: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, query: TaskQuery) -> u64 {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.generation += 1;
        let generation = self.generation;
        debug!(generation, ?query, "submitting task query");

        let tasks = Arc::clone(&self.tasks);
        let lists = Arc::clone(&self.lists);
        let tx = self.tx.clone();
        let debounce = self.debounce;

        self.in_flight = Some(tokio::spawn(async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            let result = fetch(&tasks, &lists, &query).await;
            // The receiver lives as long as the runner.
            let _ = tx.send(QueryOutcome { generation, query, result });
        }));
        generation
    }

    /// Non-blocking; returns the outcome of the current query once it has arrived.
    pub fn poll(&mut self) -> Option<QueryOutcome> {
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.generation == self.generation {
                return Some(outcome);
            }
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "dropping superseded outcome"
            );
        }
        None
    }

    /// Waits for the outcome of the current query.
    pub async fn next(&mut self) -> Option<QueryOutcome> {
        while let Some(outcome) = self.rx.recv().await {
            if outcome.generation == self.generation {
                return Some(outcome);
            }
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "dropping superseded outcome"
            );
        }
        None
    }
}

impl<G: HttpGateway + 'static> Drop for TaskQueryRunner<G> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

pub async fn fetch<G: HttpGateway>(
    tasks: &TaskDirectory<G>,
    lists: &TaskListDirectory<G>,
    query: &TaskQuery,
) -> ApiResult<Vec<Task>> {
    match query.scope {
        ViewScope::Global => tasks.list(query.filter.as_ref()).await,
        ViewScope::List(id) => lists.list_tasks_filtered(id, query.filter.as_ref()).await,
    }
}

/// Rows shown for the current query. Every outcome replaces them wholesale.
pub struct TaskView<G: HttpGateway + 'static> {
    runner: TaskQueryRunner<G>,
    query: TaskQuery,
    rows: Vec<Task>,
    loading: bool,
    last_error: Option<ApiError>,
}

impl<G: HttpGateway + 'static> TaskView<G> {
    pub fn new(runner: TaskQueryRunner<G>, query: TaskQuery) -> Self {
        Self {
            runner,
            query,
            rows: Vec::new(),
            loading: false,
            last_error: None,
        }
    }

    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    pub fn rows(&self) -> &[Task] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn set_query(&mut self, query: TaskQuery) {
        self.query = query;
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: Option<TaskFilter>) {
        let query = self.query.clone().with_filter(filter);
        self.set_query(query);
    }

    pub fn set_form(&mut self, form: &FilterForm) {
        let query = self.query.clone().with_form(form);
        self.set_query(query);
    }

    pub fn refresh(&mut self) {
        self.loading = true;
        self.runner.submit(self.query.clone());
    }

    /// Applies a finished fetch, if any. Returns true when the rows changed.
    pub fn poll(&mut self) -> bool {
        match self.runner.poll() {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(outcome) = self.runner.next().await {
            self.apply(outcome);
        }
    }

    /// Swaps in a single row returned by a mutation without refetching.
    pub fn replace_row(&mut self, task: Task) {
        if let Some(row) = self.rows.iter_mut().find(|t| t.id.is_some() && t.id == task.id) {
            *row = task;
        }
    }

    fn apply(&mut self, outcome: QueryOutcome) {
        self.loading = false;
        match outcome.result {
            Ok(tasks) => {
                self.rows = tasks;
                self.last_error = None;
            }
            Err(err) => {
                self.rows.clear();
                self.last_error = Some(err);
            }
        }
    }
}
