//! Task commands: list, show, add, edit, rm

use crate::api::Task;
use crate::cli::args::{OutputFormat, TaskAction, TasksArgs};
use crate::client::TaskClient;
use crate::error::TaskdeckResult;
use crate::ui::{self, Level, TaskSpinner, UiContext};
use console::style;

/// Execute the tasks command
pub async fn execute(args: TasksArgs, client: &TaskClient) -> TaskdeckResult<()> {
    match args.action {
        TaskAction::List { format, refresh } => list(client, format, refresh).await,
        TaskAction::Show { id, format } => show(client, &id, format).await,
        TaskAction::Add { title, description } => add(client, &title, &description).await,
        TaskAction::Edit {
            id,
            title,
            description,
        } => edit(client, &id, title, description).await,
        TaskAction::Rm { id, yes } => remove(client, &id, yes).await,
    }
}

async fn list(client: &TaskClient, format: OutputFormat, refresh: bool) -> TaskdeckResult<()> {
    let tasks = if refresh {
        client.refresh_tasks().await?
    } else {
        client.tasks().await?
    };

    if tasks.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::notify(&ctx, Level::Info, "No tasks yet");
                ui::remark(&ctx, "Add one with: taskdeck tasks add --title <T> --description <D>");
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&tasks),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
        OutputFormat::Plain => {
            for task in &tasks {
                println!("{}\t{}", task.id, task.title);
            }
        }
    }

    Ok(())
}

async fn show(client: &TaskClient, id: &str, format: OutputFormat) -> TaskdeckResult<()> {
    let task = client.task(id).await?;

    match format {
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            ui::key_value(&ctx, "ID", &task.id);
            ui::key_value(&ctx, "Title", &task.title);
            ui::key_value(&ctx, "Description", &task.description);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&task)?),
        OutputFormat::Plain => println!("{}\t{}\t{}", task.id, task.title, task.description),
    }

    Ok(())
}

async fn add(client: &TaskClient, title: &str, description: &str) -> TaskdeckResult<()> {
    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Creating task...");

    let result = client.create_task(title, description).await;
    spinner.clear();
    result?;

    ui::notify(&ctx, Level::Success, "Task created successfully!");
    Ok(())
}

async fn edit(
    client: &TaskClient,
    id: &str,
    title: Option<String>,
    description: Option<String>,
) -> TaskdeckResult<()> {
    let ctx = UiContext::detect();

    // Omitted fields keep what the server has
    let (title, description) = match (title, description) {
        (Some(title), Some(description)) => (title, description),
        (title, description) => {
            let current = client.task(id).await?;
            (
                title.unwrap_or(current.title),
                description.unwrap_or(current.description),
            )
        }
    };

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Updating task...");
    let result = client.update_task(id, &title, &description).await;
    spinner.clear();
    result?;

    ui::notify(&ctx, Level::Success, "Task updated successfully!");
    Ok(())
}

async fn remove(client: &TaskClient, id: &str, yes: bool) -> TaskdeckResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);

    if !ui::confirm(&ctx, "Are you sure you want to delete the task?", false).await? {
        ui::notify(&ctx, Level::Info, "Delete cancelled");
        ui::remark(&ctx, "Pass --yes to skip the confirmation");
        return Ok(());
    }

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Deleting task...");
    let result = client.delete_task(id).await;
    spinner.clear();
    result?;

    ui::notify(&ctx, Level::Success, "Task deleted successfully!");
    Ok(())
}

fn print_table(tasks: &[Task]) {
    let title_width = tasks
        .iter()
        .map(|t| t.title.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(5, 40);

    println!(
        "{:<26} {:<width$} {}",
        style("ID").bold(),
        style("TITLE").bold(),
        style("DESCRIPTION").bold(),
        width = title_width
    );
    println!("{}", "-".repeat(26 + title_width + 14));

    for task in tasks {
        println!(
            "{:<26} {:<width$} {}",
            task.id,
            truncate(&task.title, title_width),
            style(truncate(&task.description, 60)).dim(),
            width = title_width
        );
    }

    println!();
    println!("{} task(s)", tasks.len());
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
