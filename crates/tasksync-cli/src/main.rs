mod render;
mod transport;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use tasksync_core::models::{PromptId, QueueResponse};
use tasksync_core::{
    ACTIVE_BACKEND, DEFAULT_MAX_ITEMS, HistoryQuery, Transport, fetch_history_page, fetch_queue,
    get_outputs_from_history, get_workflow_from_history,
};

use crate::transport::UreqTransport;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8188/api";

#[derive(Debug, Parser)]
#[command(
    name = "tasksync",
    version,
    about = "Inspect and cancel tasks on a generation server"
)]
struct Cli {
    /// API root that request paths are appended to.
    #[arg(long, env = "TASKSYNC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout enforced by the HTTP agent.
    #[arg(
        long,
        env = "TASKSYNC_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Print canonical records as JSON instead of one line per task.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Running and pending tasks.
    Queue,
    /// Finished tasks, newest first.
    History {
        #[arg(long, default_value_t = DEFAULT_MAX_ITEMS)]
        max_items: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Workflow document of a finished task.
    Workflow { prompt_id: String },
    /// Full outputs of a finished task.
    Outputs { prompt_id: String },
    /// Interrupt a running task.
    Cancel { prompt_id: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    tracing::debug!(backend = %ACTIVE_BACKEND, base_url = %cli.base_url, "starting");
    let transport: Arc<dyn Transport> = Arc::new(UreqTransport::new(
        &cli.base_url,
        Duration::from_secs(cli.timeout_secs),
    ));

    match run(&cli, &transport).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: failed to encode output: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, transport: &Arc<dyn Transport>) -> Result<ExitCode, serde_json::Error> {
    match &cli.command {
        Command::Queue => {
            let queue = fetch_queue(transport).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&queue)?);
            } else {
                println!("{}", render::header("queue", OffsetDateTime::now_utc()));
                for line in render::queue_lines(&queue) {
                    println!("{line}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::History { max_items, offset } => {
            let query = HistoryQuery::new(*max_items).offset(*offset);
            let history = fetch_history_page(transport, query).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                println!("{}", render::header("history", OffsetDateTime::now_utc()));
                for line in render::history_lines(&history) {
                    println!("{line}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Workflow { prompt_id } => {
            let prompt_id = PromptId::from(prompt_id.as_str());
            match get_workflow_from_history(transport, &prompt_id).await {
                Some(workflow) => {
                    println!("{}", serde_json::to_string_pretty(&workflow)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("no workflow available for {prompt_id}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Outputs { prompt_id } => {
            let prompt_id = PromptId::from(prompt_id.as_str());
            match get_outputs_from_history(transport, &prompt_id).await {
                Some(outputs) => {
                    println!("{}", serde_json::to_string_pretty(&outputs)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("no outputs available for {prompt_id}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Cancel { prompt_id } => {
            let prompt_id = PromptId::from(prompt_id.as_str());
            let queue = fetch_queue(transport).await;
            Ok(cancel(&queue, &prompt_id).await.report(&prompt_id))
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
enum CancelOutcome {
    Interrupted,
    StillPending,
    NotRunning,
    InterruptFailed,
}

impl CancelOutcome {
    fn report(&self, prompt_id: &PromptId) -> ExitCode {
        match self {
            Self::Interrupted => {
                println!("interrupt sent for {prompt_id}; re-run `queue` to confirm it stopped");
                ExitCode::SUCCESS
            }
            Self::StillPending => {
                eprintln!("{prompt_id} is still pending; only running tasks can be cancelled");
                ExitCode::FAILURE
            }
            Self::NotRunning => {
                eprintln!("{prompt_id} is not running");
                ExitCode::FAILURE
            }
            Self::InterruptFailed => {
                eprintln!("failed to interrupt {prompt_id}");
                ExitCode::FAILURE
            }
        }
    }
}

async fn cancel(queue: &QueueResponse, prompt_id: &PromptId) -> CancelOutcome {
    let Some(task) = queue.find_running(prompt_id) else {
        if queue.pending.iter().any(|task| task.prompt_id() == prompt_id) {
            return CancelOutcome::StillPending;
        }
        return CancelOutcome::NotRunning;
    };

    match task.remove.invoke().await {
        Ok(()) => CancelOutcome::Interrupted,
        Err(error) => {
            tracing::error!(
                task_id = %prompt_id,
                kind = ?error.kind,
                message = %error.message,
                "failed to interrupt task"
            );
            CancelOutcome::InterruptFailed
        }
    }
}
