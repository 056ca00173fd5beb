use clap::Parser;
use issuesim::cli::commands::{Cli, Commands};
use issuesim::config::Config;
use issuesim::domain::entities::vector_record::IssueInput;
use issuesim::IssueSim;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    let sim = match IssueSim::new(&config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error initializing issuesim: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(&sim, &config, cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_command(sim: &IssueSim, config: &Config, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Index { json } => {
            let data: serde_json::Value = serde_json::from_str(&json)?;

            let summary = data["summary"]
                .as_str()
                .ok_or("Missing required field: summary")?;
            let jira_key = data["jira_key"].as_str();
            let description = data["description"].as_str();

            let record = sim.index_one(IssueInput::new(jira_key, summary, description))?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Bulk { file } => {
            let records = sim.import_file(&file)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Similar {
            summary,
            description,
            jira_key,
            top_k,
            min_score,
            no_store,
        } => {
            let issue = IssueInput {
                jira_key,
                summary,
                description,
            };
            let result = sim.query_similar(
                issue,
                top_k.unwrap_or(config.top_k),
                min_score.unwrap_or(config.min_score),
                !no_store,
            )?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::List { limit } => {
            let records = sim.list_indexed(limit)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Stats => {
            let stats = sim.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
