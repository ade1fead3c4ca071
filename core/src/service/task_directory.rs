use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::gateway::{HttpGateway, HttpRequest, HttpResponse};
use crate::model::filter::{filter_by_status, ListingScope, TaskFilter};
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::service::error_translator::ErrorTranslator;

pub const TASK_SERVICE_NAME: &str = "TaskDirectory";

/// Network operations on individual tasks.
pub struct TaskDirectory<G: HttpGateway> {
    gateway: G,
    translator: ErrorTranslator,
    scope: ListingScope,
}

impl<G: HttpGateway> TaskDirectory<G> {
    pub fn new(gateway: G, translator: ErrorTranslator) -> Self {
        Self {
            gateway,
            translator,
            scope: ListingScope::default(),
        }
    }

    pub fn with_scope(mut self, scope: ListingScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> ListingScope {
        self.scope
    }

    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.gateway
            .send(request)
            .await
            .map_err(|e| self.translator.transport(e))
    }

    /// Priority and responsible filters go to dedicated endpoints and are never
    /// scope-restricted; status filtering and plain listing happen locally.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: Option<&TaskFilter>) -> ApiResult<Vec<Task>> {
        match filter {
            Some(TaskFilter::Priority(priority)) => {
                let request =
                    HttpRequest::get("/by-priority").with_query("priority", priority.value());
                self.translator.decode(self.send(request).await?)
            }
            Some(TaskFilter::Responsible(name)) if !name.trim().is_empty() => {
                let request =
                    HttpRequest::get("/by-responsible").with_query("responsible", name.trim());
                self.translator.decode(self.send(request).await?)
            }
            Some(TaskFilter::Status(status)) => {
                let tasks = self.fetch_all().await?;
                Ok(filter_by_status(tasks, *status, self.scope))
            }
            _ => {
                let scope = self.scope;
                let tasks = self.fetch_all().await?;
                Ok(tasks.into_iter().filter(|t| scope.admits(t)).collect())
            }
        }
    }

    async fn fetch_all(&self) -> ApiResult<Vec<Task>> {
        let tasks: Vec<Task> = self.translator.decode(self.send(HttpRequest::get("")).await?)?;
        debug!(count = tasks.len(), "fetched task collection");
        Ok(tasks)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: TaskId) -> ApiResult<Task> {
        let response = self.send(HttpRequest::get(format!("/{}", id))).await?;
        self.translator.decode(response)
    }

    /// The server assigns the id; a task that already carries one is rejected.
    #[instrument(skip(self, task), fields(list_id = ?task.task_list_id))]
    pub async fn create(&self, task: &Task) -> ApiResult<Task> {
        if task.id.is_some() {
            let mut errors = ValidationErrors::new();
            errors.add("id", "A new task must not carry an id.");
            return Err(ApiError::Validation(errors));
        }
        debug!(payload = ?task, "creating task");
        let response = self.send(HttpRequest::post("", to_body(task)?)).await?;
        self.translator.decode(response)
    }

    #[instrument(skip(self, task))]
    pub async fn update(&self, id: TaskId, task: &Task) -> ApiResult<Task> {
        debug!(payload = ?task, "replacing task");
        let response = self.send(HttpRequest::put(format!("/{}", id), to_body(task)?)).await?;
        self.translator.decode(response)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: TaskId) -> ApiResult<()> {
        let response = self.send(HttpRequest::delete(format!("/{}", id))).await?;
        self.translator.check(response)?;
        Ok(())
    }

    /// Body is the bare JSON string, e.g. `"CONCLUIDA"`.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: TaskId, status: TaskStatus) -> ApiResult<Task> {
        let body = Value::String(status.as_wire().to_string());
        let response = self.send(HttpRequest::patch(format!("/{}/status", id), body)).await?;
        self.translator.decode(response)
    }
}

pub(crate) fn to_body<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Client {
        message: format!("[CLIENT_ERROR] Could not serialize request body: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Method;
    use crate::model::task::Priority;
    use crate::service::testing::MockGateway;
    use serde_json::json;

    fn directory(gateway: MockGateway) -> TaskDirectory<MockGateway> {
        TaskDirectory::new(gateway, ErrorTranslator::new(TASK_SERVICE_NAME))
    }

    fn sample_tasks() -> Value {
        json!([
            {
                "id": 1,
                "description": "Buy milk",
                "priority": 1,
                "status": "PENDENTE",
                "responsible": "Alice"
            },
            {
                "id": 2,
                "description": "Pay rent",
                "priority": 2,
                "status": "CONCLUIDA",
                "responsible": "Bob",
                "taskListId": 9
            },
            {
                "id": 3,
                "description": "Call mom",
                "priority": 0,
                "status": "CONCLUIDA",
                "responsible": "Alice",
                "taskListId": null
            }
        ])
    }

    #[tokio::test]
    async fn test_unfiltered_listing_is_global_only_by_default() {
        let gateway = MockGateway::new().respond(200, sample_tasks());
        let dir = directory(gateway.clone());

        let tasks = dir.list(None).await.unwrap();
        let ids: Vec<_> = tasks.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let request = gateway.single_request();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "");
    }

    #[tokio::test]
    async fn test_all_scope_keeps_list_tasks() {
        let gateway = MockGateway::new().respond(200, sample_tasks());
        let dir = directory(gateway).with_scope(ListingScope::All);

        let tasks = dir.list(None).await.unwrap();
        assert_eq!(tasks.len(), 3);
    }

    #[tokio::test]
    async fn test_status_filter_is_local() {
        let gateway = MockGateway::new().respond(200, sample_tasks());
        let dir = directory(gateway.clone());

        let tasks = dir.list(Some(&TaskFilter::Status(TaskStatus::Done))).await.unwrap();
        let ids: Vec<_> = tasks.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(gateway.single_request().path, "");
    }

    #[tokio::test]
    async fn test_priority_filter_uses_endpoint() {
        let gateway = MockGateway::new().respond(
            200,
            json!([{
                "id": 2,
                "description": "Pay rent",
                "priority": 2,
                "status": "PENDENTE",
                "responsible": "Bob",
                "taskListId": 9
            }]),
        );
        let dir = directory(gateway.clone());

        let tasks = dir.list(Some(&TaskFilter::Priority(Priority::High))).await.unwrap();
        assert!(tasks.iter().all(|t| t.priority == Priority::High));
        // Not restricted to global tasks.
        assert_eq!(tasks.len(), 1);

        let request = gateway.single_request();
        assert_eq!(request.path, "/by-priority");
        assert_eq!(request.query, vec![("priority".to_string(), "2".to_string())]);
    }

    #[tokio::test]
    async fn test_responsible_filter_trims_and_blank_means_unfiltered() {
        let gateway = MockGateway::new().respond(200, json!([]));
        let dir = directory(gateway.clone());
        dir.list(Some(&TaskFilter::Responsible(" Alice ".to_string()))).await.unwrap();
        let request = gateway.single_request();
        assert_eq!(request.path, "/by-responsible");
        assert_eq!(request.query, vec![("responsible".to_string(), "Alice".to_string())]);

        let gateway = MockGateway::new().respond(200, json!([]));
        let dir = directory(gateway.clone());
        dir.list(Some(&TaskFilter::Responsible("   ".to_string()))).await.unwrap();
        assert_eq!(gateway.single_request().path, "");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let gateway = MockGateway::new().respond(404, json!({"message": "Task 42 not found"}));
        let err = directory(gateway).get_by_id(42).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Task 42 not found"));
    }

    #[tokio::test]
    async fn test_create_rejects_preassigned_id() {
        let gateway = MockGateway::new();
        let mut task = Task::new("Buy milk".to_string(), "Alice".to_string());
        task.id = Some(5);

        let err = directory(gateway.clone()).create(&task).await.unwrap_err();
        assert!(err.is_validation());
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_task_and_returns_assigned_id() {
        let gateway = MockGateway::new().respond(
            201,
            json!({
                "id": 11,
                "description": "Buy milk",
                "priority": 1,
                "status": "PENDENTE",
                "responsible": "Alice",
                "taskListId": 4
            }),
        );
        let mut task = Task::new("Buy milk".to_string(), "Alice".to_string());
        task.task_list_id = Some(4);

        let created = directory(gateway.clone()).create(&task).await.unwrap();
        assert_eq!(created.id, Some(11));

        let request = gateway.single_request();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body.unwrap()["taskListId"], json!(4));
    }

    #[tokio::test]
    async fn test_update_status_sends_bare_string() {
        let gateway = MockGateway::new().respond(
            200,
            json!({
                "id": 7,
                "description": "Buy milk",
                "priority": 1,
                "status": "CONCLUIDA",
                "responsible": "Alice"
            }),
        );
        let updated = directory(gateway.clone())
            .update_status(7, TaskStatus::Done)
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);

        let request = gateway.single_request();
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.path, "/7/status");
        assert_eq!(request.body, Some(json!("CONCLUIDA")));
    }

    #[tokio::test]
    async fn test_delete_ignores_empty_body() {
        let gateway = MockGateway::new().respond_raw(204, "");
        directory(gateway.clone()).delete(3).await.unwrap();
        let request = gateway.single_request();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(request.path, "/3");
    }

    #[tokio::test]
    async fn test_network_failure_is_translated() {
        let gateway = MockGateway::new().fail_connect();
        let err = directory(gateway).list(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }));
    }
}
