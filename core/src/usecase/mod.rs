pub mod task_view;
