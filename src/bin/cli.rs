use std::env;

use biobank_store::client::{RestClient, ShipmentService, StudyService, UserService};
use biobank_store::domain::SearchParams;
use biobank_store::store::{run_get, run_search, Store};
use biobank_store::{EntityApi, EntityModel};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the backend API.
    #[arg(short, long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SearchArgs {
    #[arg(short, long)]
    filter: Option<String>,

    #[arg(short, long)]
    sort: Option<String>,

    #[arg(short, long)]
    page: Option<u32>,

    #[arg(short, long)]
    limit: Option<u32>,
}

impl SearchArgs {
    fn params(&self) -> SearchParams {
        SearchParams {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Search studies.
    Studies(SearchArgs),
    /// Show one study by slug.
    Study { slug: String },
    /// Show study counts by state.
    Counts,
    /// Search users.
    Users(SearchArgs),
    /// Search shipments.
    Shipments(SearchArgs),
    /// Fetch the first page of every entity type.
    Overview,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let base_url = cli
        .url
        .or_else(|| env::var("BIOBANK_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:9000/api".to_string());
    let client = RestClient::new(base_url);

    match cli.command {
        Commands::Studies(args) => {
            search_and_print(&StudyService::new(client), args.params()).await?;
        }
        Commands::Study { slug } => {
            let store = Store::new();
            run_get(&store, &StudyService::new(client), &slug).await;
            let state = store.state();
            if let Some(err) = &state.error {
                anyhow::bail!("{} ({:?})", err.error.message, err.action);
            }
            for study in state.table.all() {
                println!("{}", serde_json::to_string_pretty(study)?);
            }
        }
        Commands::Counts => {
            let counts = StudyService::new(client).counts().await?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        Commands::Users(args) => {
            search_and_print(&UserService::new(client), args.params()).await?;
        }
        Commands::Shipments(args) => {
            search_and_print(&ShipmentService::new(client), args.params()).await?;
        }
        Commands::Overview => {
            let studies = StudyService::new(client.clone());
            let users = UserService::new(client.clone());
            let shipments = ShipmentService::new(client);
            let study_store = Store::new();
            let user_store = Store::new();
            let shipment_store = Store::new();
            let params = SearchParams::new().with_page(1);

            futures::join!(
                run_search(&study_store, &studies, params.clone()),
                run_search(&user_store, &users, params.clone()),
                run_search(&shipment_store, &shipments, params),
            );

            println!("studies:");
            print_view(&study_store)?;
            println!("users:");
            print_view(&user_store)?;
            println!("shipments:");
            print_view(&shipment_store)?;
        }
    }

    Ok(())
}

async fn search_and_print<T, A>(api: &A, params: SearchParams) -> anyhow::Result<()>
where
    T: EntityModel + Clone + Serialize,
    A: EntityApi<T>,
{
    let store = Store::new();
    run_search(&store, api, params).await;
    print_view(&store)
}

fn print_view<T: EntityModel + Clone + Serialize>(store: &Store<T>) -> anyhow::Result<()> {
    match store.search_view() {
        Some(view) => {
            println!("total: {} (pages: {})", view.total, view.max_pages);
            for entity in &view.entities {
                println!("{}", serde_json::to_string_pretty(entity)?);
            }
            if view.has_no_results_to_display {
                println!("no matches");
            }
        }
        None => {
            let state = store.state();
            if let Some(err) = &state.error {
                anyhow::bail!("{} ({:?})", err.error.message, err.action);
            }
            println!("no results");
        }
    }
    Ok(())
}
