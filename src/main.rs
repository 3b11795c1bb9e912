//! `taskdeck` command-line front end.
//!
//! Drives the task store end to end: local tasks live in the data directory, remote
//! tasks come from the configured REST endpoint.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use taskdeck_lib::auth::{self, AuthError};
use taskdeck_lib::config::{AppConfig, API_URL_ENV};
use taskdeck_lib::debounce::Debouncer;
use taskdeck_lib::logging::init_logging;
use taskdeck_lib::notify::{Notice, Notifier, NotifyKind};
use taskdeck_lib::reorder::move_task;
use taskdeck_lib::validation::{validate_title, ValidationError};
use taskdeck_lib::view::{find_task, local_view, LocalQuery, SortDirection, SortKey, SortSpec};
use taskdeck_lib::{
    FileStore, Filter, HttpTaskService, NewTask, RemoteError, StorageError, Task, TaskActions,
    TaskPatch, TaskState, TaskStore,
};

type Actions = TaskActions<FileStore, HttpTaskService>;

#[derive(Parser, Debug)]
#[command(version, about = "Personal task tracker with local and remote task lists")]
struct Cli {
    /// Directory holding tasks, session, config and logs.
    #[arg(long, env = "TASKDECK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Remote task endpoint (overrides config and TASKDECK_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Mirror info-level logs to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with the demo account.
    Login { username: String, password: String },
    /// Forget the stored session.
    Logout,
    /// Tasks kept on this machine.
    #[command(subcommand)]
    Local(LocalCommand),
    /// Tasks kept by the remote service.
    #[command(subcommand)]
    Api(ApiCommand),
    /// Show one task, looked up locally first.
    Show { id: String },
}

#[derive(Subcommand, Debug)]
enum LocalCommand {
    List(ListArgs),
    Add { title: String },
    Rename { id: String, title: String },
    Toggle { id: String },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a task to a 0-based position.
    Move { id: String, position: usize },
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, default_value = "all")]
    filter: Filter,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "order")]
    sort: SortKey,
    #[arg(long)]
    desc: bool,
}

#[derive(Subcommand, Debug)]
enum ApiCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add { title: String },
    Rename { id: String, title: String },
    Toggle { id: String },
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a task to a 0-based position in the displayed order.
    Move { id: String, position: usize },
    /// Read search terms from stdin and refetch as you type.
    Watch,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no data directory available; pass --data-dir")]
    NoDataDir,
    #[error("not logged in; run `taskdeck login`")]
    NotLoggedIn,
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(#[from] ValidationError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
    #[error("{0}")]
    Failed(String),
    #[error("logger error: {0}")]
    Logging(#[from] flexi_logger::FlexiLoggerError),
}

struct TerminalNotifier {
    assume_yes: bool,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NotifyKind, title: &str, message: &str) -> bool {
        match kind {
            NotifyKind::Success => {
                println!("{title} {message}");
                true
            }
            NotifyKind::Warning | NotifyKind::Error => {
                eprintln!("{title} {message}");
                true
            }
            NotifyKind::Confirm => {
                if self.assume_yes {
                    return true;
                }
                print!("{title} {message} [y/N] ");
                let _ = std::io::stdout().flush();
                let mut answer = String::new();
                if std::io::stdin().lock().read_line(&mut answer).is_err() {
                    return false;
                }
                matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("command failed: {error}");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .map(|dir| dir.join("taskdeck"))
            .ok_or(CliError::NoDataDir)?,
    };
    let _logger = init_logging(&data_dir, cli.verbose)?;

    let storage = FileStore::new(data_dir);
    storage.ensure_dirs()?;
    let config = AppConfig::load(&storage)
        .with_env()
        .with_api_url(cli.api_url);
    log::info!(
        "starting data_dir={} api_url={} ({API_URL_ENV} overrides)",
        storage.root().display(),
        config.api_url
    );

    match cli.command {
        Command::Login { username, password } => {
            return match auth::login(&storage, &username, &password) {
                Ok(session) => {
                    println!("Logged in as {}", session.username);
                    Ok(())
                }
                Err(error) => {
                    TerminalNotifier { assume_yes: false }
                        .show(&Notice::login_failed(&error.to_string()));
                    Err(error.into())
                }
            };
        }
        Command::Logout => {
            auth::logout(&storage)?;
            println!("Logged out");
            return Ok(());
        }
        _ => {}
    }

    if auth::check_auth(&storage).is_none() {
        return Err(CliError::NotLoggedIn);
    }

    let remote = HttpTaskService::new(config.api_url.clone(), config.request_timeout())?;
    let actions = Arc::new(TaskActions::new(TaskStore::new(), storage, remote));

    match cli.command {
        Command::Local(command) => run_local(&actions, command),
        Command::Api(command) => run_api(actions, command, &config).await,
        Command::Show { id } => show(&actions, &id).await,
        Command::Login { .. } | Command::Logout => Ok(()),
    }
}

fn run_local(actions: &Actions, command: LocalCommand) -> Result<(), CliError> {
    actions.load_local_tasks();
    let store = actions.store();

    match command {
        LocalCommand::List(args) => {
            actions.set_filter(args.filter);
            let direction = if args.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let query = LocalQuery {
                search: args.search,
                sort: SortSpec {
                    key: args.sort,
                    direction,
                },
            };
            let tasks = local_view(&store.state(), &query);
            print_tasks(&tasks);
            Ok(())
        }
        LocalCommand::Add { title } => {
            let notifier = TerminalNotifier { assume_yes: false };
            check_title(&notifier, &title)?;
            let task = Task::new_local(title, &store.local_tasks());
            if let Err(error) = actions.add_local_task(task) {
                notifier.show(&Notice::save_failed());
                return Err(error.into());
            }
            notifier.show(&Notice::added());
            Ok(())
        }
        LocalCommand::Rename { id, title } => {
            let notifier = TerminalNotifier { assume_yes: false };
            check_title(&notifier, &title)?;
            local_task(store, &id)?;
            actions.update_local_task(&id, TaskPatch::title(title))?;
            notifier.show(&Notice::updated());
            Ok(())
        }
        LocalCommand::Toggle { id } => {
            let task = local_task(store, &id)?;
            let completed = !task.completed;
            actions.update_local_task(&id, TaskPatch::completed(completed))?;
            TerminalNotifier { assume_yes: false }.show(&Notice::status_changed(completed));
            Ok(())
        }
        LocalCommand::Delete { id, yes } => {
            local_task(store, &id)?;
            let notifier = TerminalNotifier { assume_yes: yes };
            if !notifier.show(&Notice::confirm_delete()) {
                return Ok(());
            }
            actions.delete_local_task(&id)?;
            notifier.show(&Notice::deleted());
            Ok(())
        }
        LocalCommand::Move { id, position } => {
            local_task(store, &id)?;
            if let Some(reordered) = move_task(&store.local_tasks(), &id, position) {
                actions.reorder_local_tasks(reordered)?;
            }
            print_tasks(&local_view(&store.state(), &LocalQuery::default()));
            Ok(())
        }
    }
}

async fn run_api(
    actions: Arc<Actions>,
    command: ApiCommand,
    config: &AppConfig,
) -> Result<(), CliError> {
    let notifier = TerminalNotifier { assume_yes: false };
    match command {
        ApiCommand::List { search } => {
            actions.fetch_api_tasks(search.as_deref()).await;
            render_api(&actions, &actions.store().state());
            Ok(())
        }
        ApiCommand::Add { title } => {
            check_title(&notifier, &title)?;
            if !actions.add_api_task(NewTask::new(title)).await {
                notifier.show(&Notice::save_failed());
                return Err(CliError::Failed("could not add task".to_string()));
            }
            notifier.show(&Notice::added());
            Ok(())
        }
        ApiCommand::Rename { id, title } => {
            check_title(&notifier, &title)?;
            if !actions.update_api_task(&id, TaskPatch::title(title)).await {
                notifier.show(&Notice::save_failed());
                return Err(CliError::Failed("could not update task".to_string()));
            }
            notifier.show(&Notice::updated());
            Ok(())
        }
        ApiCommand::Toggle { id } => {
            let task = fetched_api_task(&actions, &id).await?;
            let completed = !task.completed;
            if !actions
                .update_api_task(&id, TaskPatch::completed(completed))
                .await
            {
                notifier.show(&Notice::update_failed());
                return Err(CliError::Failed("could not update task".to_string()));
            }
            notifier.show(&Notice::status_changed(completed));
            Ok(())
        }
        ApiCommand::Delete { id, yes } => {
            let notifier = TerminalNotifier { assume_yes: yes };
            if !notifier.show(&Notice::confirm_delete()) {
                return Ok(());
            }
            if !actions.delete_api_task(&id).await {
                notifier.show(&Notice::delete_failed());
                return Err(CliError::Failed("could not delete task".to_string()));
            }
            actions.forget_api_order(&id)?;
            notifier.show(&Notice::deleted());
            Ok(())
        }
        ApiCommand::Move { id, position } => {
            fetched_api_task(&actions, &id).await?;
            actions.reorder_api_tasks(&id, position)?;
            print_tasks(&actions.api_tasks_view());
            Ok(())
        }
        ApiCommand::Watch => watch_api(actions, config).await,
    }
}

/// Each stdin line is a search term; fetches are debounced and every state change
/// is rendered.
async fn watch_api(actions: Arc<Actions>, config: &AppConfig) -> Result<(), CliError> {
    let mut changes = actions.store().subscribe();
    let mut debouncer = Debouncer::new(config.search_debounce());

    let (line_tx, mut lines) = tokio::sync::mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    actions.fetch_api_tasks(None).await;
    render_api(&actions, &changes.borrow_and_update().clone());

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(term) = line else {
                    debouncer.flush().await;
                    render_api(&actions, &actions.store().state());
                    return Ok(());
                };
                let actions = Arc::clone(&actions);
                debouncer.schedule(async move {
                    let term = term.trim().to_string();
                    actions.fetch_api_tasks(Some(&term)).await;
                });
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = changes.borrow_and_update().clone();
                render_api(&actions, &state);
            }
        }
    }
}

async fn show(actions: &Actions, id: &str) -> Result<(), CliError> {
    actions.load_local_tasks();
    actions.fetch_api_tasks(None).await;
    let state = actions.store().state();
    let (task, local) = find_task(&state, id).ok_or_else(|| CliError::NotFound(id.to_string()))?;
    println!("{}", task.title);
    println!("  id:      {}", task.id);
    println!("  source:  {}", if local { "local" } else { "api" });
    println!(
        "  status:  {}",
        if task.completed { "completed" } else { "pending" }
    );
    if let Some(order) = task.order {
        println!("  order:   {order}");
    }
    if let Some(created_at) = &task.created_at {
        println!("  created: {created_at}");
    }
    Ok(())
}

fn check_title(notifier: &impl Notifier, title: &str) -> Result<(), CliError> {
    validate_title(title).map_err(|error| {
        notifier.show(&Notice::invalid(&error));
        CliError::from(error)
    })
}

fn local_task(store: &TaskStore, id: &str) -> Result<Task, CliError> {
    store
        .local_tasks()
        .into_iter()
        .find(|task| task.id == id)
        .ok_or_else(|| CliError::NotFound(id.to_string()))
}

async fn fetched_api_task(actions: &Actions, id: &str) -> Result<Task, CliError> {
    actions.fetch_api_tasks(None).await;
    let state = actions.store().state();
    if let Some(message) = state.error {
        return Err(CliError::Failed(message));
    }
    state
        .api_tasks
        .into_iter()
        .find(|task| task.id == id)
        .ok_or_else(|| CliError::NotFound(id.to_string()))
}

fn render_api(actions: &Actions, state: &TaskState) {
    if state.loading {
        println!("Loading...");
        return;
    }
    if let Some(error) = &state.error {
        TerminalNotifier { assume_yes: false }.show(&Notice::load_failed(error));
        println!("Run the command again to retry.");
        return;
    }
    print_tasks(&actions.api_tasks_view());
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found");
        return;
    }
    for (position, task) in tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        println!("{position:>3}. [{mark}] {}  ({})", task.title, task.id);
    }
}
