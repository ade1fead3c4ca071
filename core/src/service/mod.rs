pub mod error_translator;
pub mod task_directory;
pub mod task_list_directory;

#[cfg(test)]
pub(crate) mod testing;
