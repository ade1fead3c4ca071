use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use dialoguer::Confirm;
use taskdesk_core::{
    apply_args, draft_from_args, ApiError, ErrorTranslator, FilterForm, HttpGateway, ListingScope,
    Priority, TaskDirectory, TaskDraft, TaskId, TaskListDirectory, TaskListId, TaskStatus,
    TASK_LIST_SERVICE_NAME, TASK_SERVICE_NAME,
};

use crate::table::{describe_task, render_lists, render_tasks};

/// At most one of these may be given.
#[derive(Args, Debug, Default)]
#[group(required = false, multiple = false)]
pub struct FilterArgs {
    /// PENDENTE, EM_ANDAMENTO, CONCLUIDA (or pending, in_progress, done)
    #[arg(long)]
    status: Option<TaskStatus>,
    /// 0/low, 1/medium, 2/high
    #[arg(long)]
    priority: Option<Priority>,
    #[arg(long)]
    responsible: Option<String>,
}

impl FilterArgs {
    fn into_form(self) -> FilterForm {
        FilterForm {
            status: self.status,
            priority: self.priority,
            responsible: self.responsible,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// List global tasks, optionally filtered
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Include tasks that belong to a list
        #[arg(long)]
        all: bool,
    },
    /// Show one task
    Get { id: TaskId },
    /// Add a task (usage: add Buy milk resp:Alice pri:h st:pending list:3)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Replace a task, changing only the given fields (usage: update 5 pri:l resp:Bob)
    Update {
        id: TaskId,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Delete a task
    Delete {
        id: TaskId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Change only the status of a task
    Status { id: TaskId, status: TaskStatus },
}

#[derive(Subcommand)]
pub enum ListCommand {
    /// Show all task lists
    List,
    /// Create a task list
    Create {
        #[arg(trailing_var_arg = true, required = true)]
        name: Vec<String>,
    },
    /// Rename a task list
    Rename {
        id: TaskListId,
        #[arg(trailing_var_arg = true, required = true)]
        name: Vec<String>,
    },
    /// Delete a task list together with the tasks it owns
    Delete {
        id: TaskListId,
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the tasks of one list, optionally filtered
    Tasks {
        id: TaskListId,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Attach existing tasks to a list (all or nothing)
    Add {
        id: TaskListId,
        #[arg(required = true)]
        task_ids: Vec<TaskId>,
    },
    /// Detach a task from a list without deleting it
    Remove { id: TaskListId, task_id: TaskId },
}

fn confirm(prompt: String, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn validated(draft: &TaskDraft) -> Result<taskdesk_core::Task> {
    draft
        .validate()
        .map_err(|errors| anyhow!(ApiError::Validation(errors)))
}

pub async fn run_tasks<G: HttpGateway>(command: TaskCommand, gateway: G) -> Result<()> {
    let scope = match &command {
        TaskCommand::List { all: true, .. } => ListingScope::All,
        _ => ListingScope::GlobalOnly,
    };
    let tasks =
        TaskDirectory::new(gateway, ErrorTranslator::new(TASK_SERVICE_NAME)).with_scope(scope);

    match command {
        TaskCommand::List { filter, .. } => {
            let found = tasks.list(filter.into_form().resolve().as_ref()).await?;
            if found.is_empty() {
                println!("No tasks found.");
            } else {
                println!("{}", render_tasks(&found));
            }
        }
        TaskCommand::Get { id } => {
            let task = tasks.get_by_id(id).await?;
            println!("{}", describe_task(&task));
        }
        TaskCommand::Add { args } => {
            let draft = draft_from_args(&args)?;
            let created = tasks.create(&validated(&draft)?).await?;
            println!("Task created.");
            println!("{}", describe_task(&created));
        }
        TaskCommand::Update { id, args } => {
            let current = tasks.get_by_id(id).await?;
            let mut draft = TaskDraft::from_task(&current);
            apply_args(&mut draft, &args)?;
            let mut task = validated(&draft)?;
            task.id = Some(id);
            let updated = tasks.update(id, &task).await?;
            println!("Task updated.");
            println!("{}", describe_task(&updated));
        }
        TaskCommand::Delete { id, yes } => {
            let task = tasks.get_by_id(id).await?;
            if !confirm(format!("Delete task \"{}\"?", task.description), yes)? {
                return Ok(());
            }
            tasks.delete(id).await?;
            println!("Task {} deleted.", id);
        }
        TaskCommand::Status { id, status } => {
            let updated = tasks.update_status(id, status).await?;
            println!("Task status updated to {}.", updated.status.label());
        }
    }
    Ok(())
}

pub async fn run_lists<G: HttpGateway>(command: ListCommand, gateway: G) -> Result<()> {
    let lists = TaskListDirectory::new(gateway, ErrorTranslator::new(TASK_LIST_SERVICE_NAME));

    match command {
        ListCommand::List => {
            let found = lists.list().await?;
            if found.is_empty() {
                println!("No task lists found.");
            } else {
                println!("{}", render_lists(&found));
            }
        }
        ListCommand::Create { name } => {
            let created = lists.create(&name.join(" ")).await?;
            println!("Task list created: {} (ID: {})", created.name, created.id);
        }
        ListCommand::Rename { id, name } => {
            let renamed = lists.rename(id, &name.join(" ")).await?;
            println!("Task list {} renamed to {}.", renamed.id, renamed.name);
        }
        ListCommand::Delete { id, yes } => {
            if !confirm(format!("Delete task list {} and the tasks it owns?", id), yes)? {
                return Ok(());
            }
            lists.delete(id).await?;
            println!("Task list {} deleted.", id);
        }
        ListCommand::Tasks { id, filter } => {
            let found = lists
                .list_tasks_filtered(id, filter.into_form().resolve_for_list().as_ref())
                .await?;
            if found.is_empty() {
                println!("No tasks in list {}.", id);
            } else {
                println!("{}", render_tasks(&found));
            }
        }
        ListCommand::Add { id, task_ids } => {
            lists.add_tasks(id, &task_ids).await?;
            println!("Added {} task(s) to list {}.", task_ids.len(), id);
        }
        ListCommand::Remove { id, task_id } => {
            lists.remove_task(id, task_id).await?;
            println!("Task {} removed from list {}.", task_id, id);
        }
    }
    Ok(())
}
