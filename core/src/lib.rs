pub mod config;
pub mod error;
pub mod gateway;
pub mod input;
pub mod model;
pub mod service;
pub mod usecase;
pub mod validation;

pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, FieldError, ValidationErrors};
pub use gateway::{HttpGateway, ReqwestGateway};
pub use input::{
    apply_args, draft_from_args, expand_key, filter_from_args, parse_args, split_line, ParsedInput,
};
pub use model::filter::{filter_by_status, FilterForm, ListingScope, TaskFilter};
pub use model::priority::{priority_option, PriorityOption, PRIORITIES};
pub use model::task::{Priority, Task, TaskId, TaskListId, TaskStatus};
pub use model::task_list::TaskList;
pub use service::error_translator::ErrorTranslator;
pub use service::task_directory::{TaskDirectory, TASK_SERVICE_NAME};
pub use service::task_list_directory::{TaskListDirectory, TASK_LIST_SERVICE_NAME};
pub use usecase::task_view::{TaskQuery, TaskQueryRunner, TaskView, ViewScope};
pub use validation::{validate_list_name, TaskDraft};

/// Both directories wired to one shared gateway.
pub fn directories<G: HttpGateway + Clone>(gateway: G) -> (TaskDirectory<G>, TaskListDirectory<G>) {
    (
        TaskDirectory::new(gateway.clone(), ErrorTranslator::new(TASK_SERVICE_NAME)),
        TaskListDirectory::new(gateway, ErrorTranslator::new(TASK_LIST_SERVICE_NAME)),
    )
}
