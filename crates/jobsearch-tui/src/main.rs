use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use jobsearch_core::{Config, JobSearchClient, ResumeFile};

mod app;
mod cli;
mod handler;
mod logging;
mod picker;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "jobsearch")]
#[command(about = "Match your resume against job listings and draft cover letters")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides JOBSEARCH_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    Tui {
        /// Resume to preselect on startup
        #[arg(short, long)]
        resume: Option<PathBuf>,
    },
    /// Upload a resume and print matching jobs
    Search {
        /// Resume file (.pdf, .doc, .docx)
        resume: PathBuf,
    },
    /// Upload a resume and generate a cover letter for one matching job
    CoverLetter {
        /// Resume file (.pdf, .doc, .docx)
        resume: PathBuf,
        /// Id of the job to write for
        #[arg(short, long)]
        job: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui { resume: None });

    match &command {
        Commands::Tui { .. } => logging::init_file(),
        _ => logging::init_stderr(),
    }

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "could not load config, using defaults");
        Config::default()
    });
    let base_url = config.resolve_base_url(cli.api_url.as_deref());
    tracing::info!(base_url = %base_url, "using backend");
    let client = JobSearchClient::with_timeout(&base_url, config.request_timeout());

    match command {
        Commands::Tui { resume } => run_tui(client, &config, resume).await,
        Commands::Search { resume } => cli::search(&client, &resume).await,
        Commands::CoverLetter { resume, job } => cli::cover_letter(&client, &resume, &job).await,
    }
}

async fn run_tui(client: JobSearchClient, config: &Config, resume: Option<PathBuf>) -> Result<()> {
    let picker_dir = match &config.last_resume_dir {
        Some(dir) if dir.is_dir() => dir.clone(),
        _ => std::env::current_dir()?,
    };
    let mut app = App::new(client, picker_dir);
    app.clipboard = config.clipboard();

    // Load before entering raw mode so a bad path is reported plainly
    if let Some(path) = resume {
        let file = ResumeFile::load(&path).await?;
        app.view.select_file(file);
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let tx = events.sender();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            let Some(event) = events.next().await else {
                break;
            };
            handler::handle_event(&mut app, event, &tx)?;
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}
