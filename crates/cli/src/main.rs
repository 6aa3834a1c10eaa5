mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use runtime::{Backend, Registry, Session, ToolHost};
use storage::Database;
use tools::prompts;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::Result;

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(about = "Function-calling sessions against Gemini", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./deckhand.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for the current time in a location
    Time,
    /// Get directions to a destination
    Directions {
        /// Include mode of transportation and departure time
        #[arg(long)]
        detailed: bool,
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Look up coordinates for several places at once
    Coordinates {
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Create a product listing from a description
    Listing {
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Let the model write a project into a workspace directory
    Scaffold {
        #[arg(long, default_value = "ai-project")]
        workspace: PathBuf,
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Ask questions about the course database
    Sql {
        #[arg(long, default_value = "db.sqlite")]
        db: PathBuf,
    },
    /// Recreate and seed the course database
    InitDb {
        #[arg(long, default_value = "db.sqlite")]
        db: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,runtime={level},tools={level},storage={level},deckhand={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::InitDb { db } = &cli.command {
        return cmd_init_db(db);
    }

    let config = Config::discover(cli.config.as_deref())?.with_env();

    match cli.command {
        Commands::Time => {
            let session = session(&config, None, None, tools::time_tools()?)?;
            repl(session, "Enter a location in format \"City, Country\": ").await
        }
        Commands::Directions { detailed, prompt } => {
            let default = if detailed {
                prompts::DETAILED_DIRECTIONS_PROMPT
            } else {
                prompts::DIRECTIONS_PROMPT
            };
            let session = session(&config, None, None, tools::direction_tools(detailed)?)?;
            one_shot(session, prompt.as_deref().unwrap_or(default)).await
        }
        Commands::Coordinates { prompt } => {
            let session = session(&config, None, None, tools::coordinate_tools()?)?;
            one_shot(
                session,
                prompt.as_deref().unwrap_or(prompts::COORDINATES_PROMPT),
            )
            .await
        }
        Commands::Listing { prompt } => {
            let session = session(&config, None, None, tools::listing_tools()?)?;
            one_shot(session, prompt.as_deref().unwrap_or(prompts::LISTING_PROMPT)).await
        }
        Commands::Scaffold { workspace, prompt } => {
            std::fs::create_dir_all(&workspace)?;
            println!("Workspace: {}", workspace.display());
            let session = session(
                &config,
                Some(prompts::SCAFFOLD_INSTRUCTION),
                Some(0.0),
                tools::scaffold_tools(workspace)?,
            )?;
            one_shot(session, prompt.as_deref().unwrap_or(prompts::SCAFFOLD_PROMPT)).await
        }
        Commands::Sql { db } => {
            let database = Database::open(&db)?;
            if database.seed()? {
                println!("Seeded {}", db.display());
            }
            let session = session(
                &config,
                Some(prompts::SQL_INSTRUCTION),
                Some(0.0),
                tools::sql_tools(Arc::new(database))?,
            )?;
            repl(session, "Ask your question about the database: ").await
        }
        Commands::InitDb { .. } => Ok(()),
    }
}

fn session(
    config: &Config,
    instruction: Option<&str>,
    temperature: Option<f32>,
    tools: Registry,
) -> Result<Session<runtime::GeminiBackend>> {
    let backend = config.backend(temperature)?;
    println!("deckhand v{} ({backend})", env!("CARGO_PKG_VERSION"));

    Ok(Session::new(backend, tools)
        .with_config(config.session_config(instruction))
        .with_executor(config.executor()))
}

async fn one_shot<B: Backend, H: ToolHost>(mut session: Session<B, H>, prompt: &str) -> Result<()> {
    println!("> {prompt}\n");
    let reply = session.chat(prompt).await?;
    println!("{}", reply.text);
    info!(
        rounds = reply.rounds,
        tool_calls = reply.tool_calls,
        input_tokens = reply.usage.input_tokens,
        output_tokens = reply.usage.output_tokens,
        "done"
    );
    session.end();
    Ok(())
}

async fn repl<B: Backend, H: ToolHost>(mut session: Session<B, H>, question: &str) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("Enter \"exit\" or \"q\" to quit.\n{question}");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim_end_matches(['\r', '\n']);
        if input == "exit" || input == "q" {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        match session.chat(input).await {
            Ok(reply) => println!("\n{}\n", reply.text),
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    session.end();
    println!("\nSession ended.");
    Ok(())
}

fn cmd_init_db(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    let db = Database::open(path)?;
    db.seed()?;
    for table in db.tables()? {
        println!("{table}: {} rows", db.count_rows(&table)?);
    }
    println!("Created {}", path.display());
    Ok(())
}
