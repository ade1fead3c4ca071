use futures::future::try_join_all;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::error::ApiResult;
use crate::gateway::{HttpGateway, HttpRequest, HttpResponse};
use crate::model::filter::TaskFilter;
use crate::model::task::{Priority, Task, TaskId, TaskListId, TaskStatus};
use crate::model::task_list::TaskList;
use crate::service::error_translator::ErrorTranslator;
use crate::validation::validate_list_name;

pub const TASK_LIST_SERVICE_NAME: &str = "TaskListDirectory";

/// Network operations on task lists and list membership.
pub struct TaskListDirectory<G: HttpGateway> {
    gateway: G,
    translator: ErrorTranslator,
}

fn list_path(id: TaskListId) -> String {
    format!("/lists/{}", id)
}

fn tasks_path(id: TaskListId, suffix: &str) -> String {
    format!("/lists/{}/tasks{}", id, suffix)
}

impl<G: HttpGateway> TaskListDirectory<G> {
    pub fn new(gateway: G, translator: ErrorTranslator) -> Self {
        Self { gateway, translator }
    }

    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.gateway
            .send(request)
            .await
            .map_err(|e| self.translator.transport(e))
    }

    async fn fetch_tasks(&self, request: HttpRequest) -> ApiResult<Vec<Task>> {
        let tasks: Vec<Task> = self.translator.decode(self.send(request).await?)?;
        debug!(count = tasks.len(), "fetched list tasks");
        Ok(tasks)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> ApiResult<Vec<TaskList>> {
        self.translator.decode(self.send(HttpRequest::get("/lists")).await?)
    }

    /// The backend is expected to echo the created list; an empty body is an error.
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> ApiResult<TaskList> {
        let name = validate_list_name(name)?;
        let response = self.send(HttpRequest::post("/lists", json!({ "name": name }))).await?;
        self.translator.decode(response)
    }

    #[instrument(skip(self))]
    pub async fn rename(&self, id: TaskListId, new_name: &str) -> ApiResult<TaskList> {
        let name = validate_list_name(new_name)?;
        let path = format!("{}/name", list_path(id));
        let response = self.send(HttpRequest::patch(path, json!({ "name": name }))).await?;
        self.translator.decode(response)
    }

    /// The backend also deletes the tasks owned only by this list.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: TaskListId) -> ApiResult<()> {
        let response = self.send(HttpRequest::delete(list_path(id))).await?;
        self.translator.check(response)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_tasks(&self, list_id: TaskListId) -> ApiResult<Vec<Task>> {
        self.fetch_tasks(HttpRequest::get(tasks_path(list_id, "/allTasks"))).await
    }

    #[instrument(skip(self))]
    pub async fn list_tasks_filtered_by_status(
        &self,
        list_id: TaskListId,
        status: TaskStatus,
    ) -> ApiResult<Vec<Task>> {
        let request = HttpRequest::get(tasks_path(list_id, "/filterByStatus"))
            .with_query("status", status.as_wire());
        self.fetch_tasks(request).await
    }

    #[instrument(skip(self))]
    pub async fn list_tasks_filtered_by_priority(
        &self,
        list_id: TaskListId,
        priority: Priority,
    ) -> ApiResult<Vec<Task>> {
        let request = HttpRequest::get(tasks_path(list_id, "/filterByPriority"))
            .with_query("priority", priority.value());
        self.fetch_tasks(request).await
    }

    #[instrument(skip(self))]
    pub async fn list_tasks_filtered_by_responsible(
        &self,
        list_id: TaskListId,
        responsible: &str,
    ) -> ApiResult<Vec<Task>> {
        let request = HttpRequest::get(tasks_path(list_id, "/filterByResponsible"))
            .with_query("responsible", responsible.trim());
        self.fetch_tasks(request).await
    }

    /// Dispatches to the matching server-side filter; a blank responsible lists everything.
    pub async fn list_tasks_filtered(
        &self,
        list_id: TaskListId,
        filter: Option<&TaskFilter>,
    ) -> ApiResult<Vec<Task>> {
        match filter {
            Some(TaskFilter::Status(status)) => {
                self.list_tasks_filtered_by_status(list_id, *status).await
            }
            Some(TaskFilter::Priority(priority)) => {
                self.list_tasks_filtered_by_priority(list_id, *priority).await
            }
            Some(TaskFilter::Responsible(name)) if !name.trim().is_empty() => {
                self.list_tasks_filtered_by_responsible(list_id, name).await
            }
            _ => self.list_tasks(list_id).await,
        }
    }

    /// Body is the bare task id, e.g. `42`.
    #[instrument(skip(self))]
    pub async fn add_task(&self, list_id: TaskListId, task_id: TaskId) -> ApiResult<()> {
        let response = self
            .send(HttpRequest::post(tasks_path(list_id, ""), Value::from(task_id)))
            .await?;
        self.translator.check(response)?;
        Ok(())
    }

    /// One request per task, issued concurrently; fails as a whole if any one fails.
    #[instrument(skip(self))]
    pub async fn add_tasks(&self, list_id: TaskListId, task_ids: &[TaskId]) -> ApiResult<()> {
        try_join_all(task_ids.iter().map(|&task_id| self.add_task(list_id, task_id))).await?;
        Ok(())
    }

    /// Drops the association only; the task itself survives.
    #[instrument(skip(self))]
    pub async fn remove_task(&self, list_id: TaskListId, task_id: TaskId) -> ApiResult<()> {
        let path = tasks_path(list_id, &format!("/{}", task_id));
        let response = self.send(HttpRequest::delete(path)).await?;
        self.translator.check(response)?;
        Ok(())
    }
}
