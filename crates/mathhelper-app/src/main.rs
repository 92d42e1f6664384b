//! Math Helper: command-line front-end for an equations server.

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mathhelper_app::{render, EquationList, ListState, SolutionOutcome};
use mathhelper_common::{Config, EquationId};
use mathhelper_filters::FilterUpdate;
use mathhelper_gateway::{EquationGateway, HttpEquationGateway, ListQuery};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mathhelper", version, about = "Browse and edit equations on a Math Helper server")]
struct Cli {
    /// API base URL; overrides the config file and MATHHELPER_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List equations, optionally filtered
    List {
        /// Keep equations whose text starts with this prefix
        #[arg(long)]
        search: Option<String>,
        /// Keep equations that know this solution; repeatable
        #[arg(long = "solution", allow_negative_numbers = true)]
        solutions: Vec<String>,
        #[arg(long)]
        min_solutions: Option<usize>,
        #[arg(long)]
        max_solutions: Option<usize>,
        /// Print JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Show a single equation
    Show {
        id: EquationId,
        #[arg(long)]
        json: bool,
    },
    /// Submit a new equation
    Create { equation: String },
    /// Delete an equation
    Delete { id: EquationId },
    /// Propose a solution for an equation
    AddSolution {
        id: EquationId,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load().context("Could not load configuration")?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
        config.validate()?;
    }

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(base_url = %config.api.base_url, "Math Helper starting");

    let gateway: Arc<dyn EquationGateway> = Arc::new(HttpEquationGateway::new(&config.api)?);
    let list = EquationList::with_query(gateway.clone(), ListQuery::from_config(&config.list));

    match cli.command {
        Command::List { search, solutions, min_solutions, max_solutions, json } => {
            load(&list).await?;

            if let Some(prefix) = search {
                list.update_filters(FilterUpdate::Search(prefix)).await;
            }
            for value in solutions {
                list.update_filters(FilterUpdate::AddSolution(value)).await;
            }
            list.init_count_filter().await;
            if let Some(min) = min_solutions {
                list.update_filters(FilterUpdate::CountMin(min)).await;
            }
            if let Some(max) = max_solutions {
                list.update_filters(FilterUpdate::CountMax(max)).await;
            }

            let visible = list.visible().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                print!("{}", render::cards(&visible));
            }
        }
        Command::Show { id, json } => {
            let equation = gateway.fetch_by_id(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&equation)?);
            } else {
                print!("{}", render::card(&equation));
            }
        }
        Command::Create { equation } => {
            let created = list.create(&equation).await?;
            print!("{}", render::card(&created));
        }
        Command::Delete { id } => {
            load(&list).await?;
            list.delete(id).await?;
            println!("Deleted equation {id}");
        }
        Command::AddSolution { id, value } => {
            load(&list).await?;
            match list.add_solution(id, value).await? {
                SolutionOutcome::Appended => {
                    match list.equations().await.into_iter().find(|e| e.id == id) {
                        Some(equation) => print!("{}", render::card(&equation)),
                        None => println!("Solution added to equation {id}"),
                    }
                }
                SolutionOutcome::Discarded => {
                    println!("Solution accepted, but equation {id} is not in the list");
                }
            }
        }
    }

    Ok(())
}

/// Initial fetch with one retry out of the error state.
async fn load(list: &EquationList) -> anyhow::Result<()> {
    if let ListState::Error(first) = list.activate().await {
        warn!(error = %first, "Initial fetch failed, retrying once");
        if let ListState::Error(message) = list.reload().await {
            bail!("Could not load equations: {message}");
        }
    }
    Ok(())
}
