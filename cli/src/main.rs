use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use raildesk_core::handler::ComplaintHandler;
use raildesk_core::llm::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL, OllamaClient};
use raildesk_core::stats::complaint_stats;
use raildesk_core::store::LogStore;

#[derive(Parser)]
#[command(
    name = "raildesk",
    version,
    about = "Raildesk terminal client — passenger complaint intake and dashboard stats"
)]
struct Cli {
    /// Directory holding the JSON log files
    #[arg(long, env = "RAILDESK_LOG_DIR", default_value = "logs")]
    log_dir: String,

    /// Ollama server URL
    #[arg(long, env = "RAILDESK_OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,

    /// Model used for replies
    #[arg(long, env = "RAILDESK_OLLAMA_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Timeout for a single reply request, in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive complaint intake (the default)
    Chat,
    /// Print dashboard counts derived from the general log
    Stats,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let store = LogStore::new(&cli.log_dir);
    if let Err(err) = store.init() {
        eprintln!("Failed to initialize log store: {err}");
        std::process::exit(1);
    }

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Stats => {
            let stats = complaint_stats(&store);
            match serde_json::to_string_pretty(&stats) {
                Ok(body) => println!("{body}"),
                Err(err) => {
                    eprintln!("Failed to encode stats: {err}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Chat => {
            let client = match OllamaClient::new(
                cli.ollama_url,
                cli.model.clone(),
                Duration::from_secs(cli.timeout_secs),
            ) {
                Ok(client) => client,
                Err(err) => {
                    eprintln!("Failed to build Ollama HTTP client: {err}");
                    std::process::exit(1);
                }
            };
            let handler = ComplaintHandler::new(store, Arc::new(client));
            run_chat(&handler, &cli.model).await;
        }
    }
}

async fn run_chat(handler: &ComplaintHandler, model: &str) {
    println!("Railway Complaint Analyzer (using {model}). Type 'exit' to quit.\n");

    let stdin = io::stdin();
    loop {
        print!("Passenger: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(err) => {
                eprintln!("Error reading input: {err}");
                break;
            }
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text.to_lowercase().as_str(), "exit" | "quit" | "bye") {
            println!("Analyzer: Thank you. Stay safe.");
            break;
        }

        match handler.handle(text).await {
            Ok(outcome) => {
                println!("Analyzer: {}\n", outcome.response);
                if outcome.urgent {
                    println!("FLAGGED AS URGENT: {}\n", outcome.reason);
                }
            }
            Err(err) => eprintln!("Error: {err}\n"),
        }
    }
}
