use clap::{Parser, Subcommand};
use docquery::config::ApiConfig;
use docquery::events::EventBus;
use docquery::health::HealthMonitor;
use docquery::workflows::manager::DocumentManager;
use docquery::workflows::query::QueryWorkflow;
use docquery::workflows::selector::DocumentSelector;
use docquery::workflows::upload::{self, UploadStatus, UploadWorkflow};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "docquery")]
#[command(about = "Console client for a document question-answering service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides DOCQUERY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot backend health check
    Status,
    /// Poll backend health until interrupted
    Watch {
        /// Poll interval in seconds
        #[arg(long, default_value = "30")]
        interval: u64,
    },
    /// Upload one or more files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the document library
    List,
    /// Delete a document by id
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Ask questions against selected documents
    Ask {
        /// A question; repeat for a batch
        #[arg(short, long = "question", required = true)]
        questions: Vec<String>,
        /// Restrict context to these document ids (default: all documents)
        #[arg(short, long = "doc")]
        docs: Vec<i64>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let config = match &cli.api_url {
        Some(url) => ApiConfig::new(url.clone()),
        None => ApiConfig::from_env(),
    };

    let outcome = match cli.command {
        Commands::Status => status(&config).await,
        Commands::Watch { interval } => watch(&config, interval).await,
        Commands::Upload { files } => upload_files(&config, files).await,
        Commands::List => list(&config).await,
        Commands::Delete { id, yes } => delete(&config, id, yes).await,
        Commands::Ask { questions, docs } => ask(&config, questions, docs).await,
    };

    if let Err(message) = outcome {
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}

async fn status(config: &ApiConfig) -> Result<(), String> {
    let health = docquery::api::health_check(config)
        .await
        .map_err(|e| e.to_string())?;
    println!(
        "{} v{} (database: {})",
        health.service,
        health.version,
        if health.database_enabled {
            "connected"
        } else {
            "disabled"
        }
    );
    Ok(())
}

async fn watch(config: &ApiConfig, interval: u64) -> Result<(), String> {
    let monitor = HealthMonitor::start(config.clone(), Duration::from_secs(interval));
    let mut status = monitor.subscribe();
    println!("watching {} (ctrl-c to stop)", config.base_url);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                match status.borrow().clone() {
                    Some(Ok(h)) => println!("{} v{} ok", h.service, h.version),
                    Some(Err(e)) => println!("backend unavailable: {}", e),
                    None => {}
                }
            }
        }
    }
    monitor.stop().await;
    Ok(())
}

async fn upload_files(config: &ApiConfig, files: Vec<PathBuf>) -> Result<(), String> {
    let state = Arc::new(Mutex::new(UploadWorkflow::new()));
    upload::upload_batch(state.clone(), config, files).await;

    let state = state.lock().unwrap();
    let mut failures = 0;
    for item in state.items() {
        match item.status {
            UploadStatus::Success => println!(
                "{} -> document {}",
                item.filename,
                item.document_id.unwrap_or_default()
            ),
            UploadStatus::Error => {
                failures += 1;
                println!(
                    "{} failed: {}",
                    item.filename,
                    item.error.as_deref().unwrap_or("unknown error")
                );
            }
            UploadStatus::Uploading => {}
        }
    }
    if failures > 0 {
        Err(format!("{} upload(s) failed", failures))
    } else {
        Ok(())
    }
}

async fn list(config: &ApiConfig) -> Result<(), String> {
    let events = EventBus::new();
    let mut manager = DocumentManager::new(config.clone(), events);
    manager.load().await?;
    if manager.documents().is_empty() {
        println!("no documents uploaded yet");
        return Ok(());
    }
    for doc in manager.documents() {
        println!(
            "{:>6}  {:<40}  {:<6}  {:>5} chunks  {}",
            doc.id, doc.filename, doc.file_type, doc.chunks_count, doc.upload_date
        );
    }
    Ok(())
}

async fn delete(config: &ApiConfig, id: i64, yes: bool) -> Result<(), String> {
    let events = EventBus::new();
    let mut manager = DocumentManager::new(config.clone(), events);
    manager.load().await?;
    let filename = manager
        .documents()
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.filename.clone())
        .ok_or_else(|| format!("no document with id {}", id))?;

    if !yes && !confirm(&format!("Delete \"{}\"? This cannot be undone.", filename)) {
        println!("aborted");
        return Ok(());
    }

    let response = manager.delete(id).await?;
    println!(
        "deleted {} ({} chunks removed)",
        response.filename, response.chunks_deleted
    );
    Ok(())
}

async fn ask(config: &ApiConfig, questions: Vec<String>, docs: Vec<i64>) -> Result<(), String> {
    let mut selector = DocumentSelector::new(config.clone());
    selector.load().await?;

    if !docs.is_empty() {
        selector.deselect_all();
        for id in docs {
            if !selector.toggle(id) {
                return Err(format!("no document with id {}", id));
            }
        }
    }

    let mut workflow = QueryWorkflow::new(config.clone());
    for (i, question) in questions.iter().enumerate() {
        if i > 0 {
            workflow.add_question();
        }
        workflow.update_question(i, question.clone());
    }

    let selection: Vec<i64> = selector.selected().to_vec();
    let produced = workflow.submit(&selection).await?;
    for result in workflow.results().iter().take(produced) {
        println!("Q: {}", result.question);
        println!("A: {}", result.answer);
        println!();
    }
    Ok(())
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}
