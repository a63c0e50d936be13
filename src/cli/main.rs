use anyhow::Context;
use chunk_search_client::client::{SearchApiClient, SearchResults, SearchSession};
use chunk_search_client::config::ClientConfig;
use chunk_search_client::filter::FilterSet;
use chunk_search_client::options::{SearchOptions, SortBy, SortByField};
use chunk_search_client::request::SearchRequest;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "chunk-search")]
#[command(about = "CLI for the chunk search API", long_about = None)]
struct Cli {
    /// API base URL (overrides configuration)
    #[arg(short, long, env = "CHUNK_SEARCH__API_URL")]
    endpoint: Option<String>,

    /// Dataset id (overrides configuration)
    #[arg(short, long, env = "CHUNK_SEARCH__DATASET_ID")]
    dataset: Option<String>,

    /// Print raw JSON responses
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single search
    Search {
        /// Query text
        query: String,

        #[arg(short, long, default_value = "hybrid")]
        search_type: String,

        #[arg(short, long, default_value = "1")]
        page: u64,

        #[arg(short = 's', long, default_value = "10")]
        page_size: u64,

        /// Filters as a JSON object ({"must": [...], ...})
        #[arg(short, long)]
        filters: Option<String>,

        #[arg(long, default_value = "0.0")]
        score_threshold: f32,

        /// Cluster results by their parent group
        #[arg(short, long)]
        grouped: bool,

        /// Load every option from a shareable query string first
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Non-ranked listing of chunks
    Scroll {
        #[arg(short = 's', long, default_value = "10")]
        page_size: u64,

        /// Sort by this field
        #[arg(long)]
        sort_field: Option<String>,

        /// Filters as a JSON object
        #[arg(short, long)]
        filters: Option<String>,

        /// Continue after this chunk id (cursor from a previous page)
        #[arg(long)]
        after: Option<uuid::Uuid>,
    },

    /// Print the shareable query string for the given options
    Link {
        query: String,

        #[arg(short, long, default_value = "hybrid")]
        search_type: String,

        #[arg(short = 's', long, default_value = "10")]
        page_size: u64,
    },

    /// Read queries from stdin and search through the debounced pipeline
    Watch {
        #[arg(short, long, default_value = "hybrid")]
        search_type: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chunk_search_client=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load().unwrap_or_else(|e| {
        tracing::warn!("failed to load configuration: {e}, using defaults");
        ClientConfig::default()
    });
    if let Some(endpoint) = &cli.endpoint {
        config.api_url = endpoint.clone();
    }
    if let Some(dataset) = &cli.dataset {
        config.dataset_id = dataset.clone();
    }

    match &cli.command {
        Commands::Search {
            query,
            search_type,
            page,
            page_size,
            filters,
            score_threshold,
            grouped,
            url,
        } => {
            let client = SearchApiClient::new(config)?;

            let mut options = match url {
                Some(url) => SearchOptions::from_query_string(url),
                None => SearchOptions::default(),
            };
            options.query = query.clone();
            options.search_type = search_type.clone();
            options.page_size = *page_size;
            options.score_threshold = *score_threshold;
            options.group_unique_search = *grouped;
            options.get_total_pages = true;
            if let Some(raw) = filters {
                options.filters =
                    Some(serde_json::from_str::<FilterSet>(raw).context("invalid --filters JSON")?);
            }

            let request = SearchRequest::from_options(&options, *page);
            let outcome = client.execute(&request).await?;
            print_outcome(&outcome.results, &outcome.timings, cli.json)?;
        }

        Commands::Scroll {
            page_size,
            sort_field,
            filters,
            after,
        } => {
            let client = SearchApiClient::new(config)?;

            let mut options = SearchOptions {
                page_size: *page_size,
                ..SearchOptions::default()
            };
            if let Some(field) = sort_field {
                options.sort_by = SortBy::Field(SortByField {
                    field: field.clone(),
                });
            }
            if let Some(raw) = filters {
                options.filters =
                    Some(serde_json::from_str::<FilterSet>(raw).context("invalid --filters JSON")?);
            }

            let request = SearchRequest::scroll_after(&options, *after);
            let outcome = client.execute(&request).await?;
            print_outcome(&outcome.results, &outcome.timings, cli.json)?;
        }

        Commands::Link {
            query,
            search_type,
            page_size,
        } => {
            let options = SearchOptions {
                query: query.clone(),
                search_type: search_type.clone(),
                page_size: *page_size,
                ..SearchOptions::default()
            };
            println!("?{}", options.to_query_string());
        }

        Commands::Watch { search_type } => {
            let client = Arc::new(SearchApiClient::new(config)?);
            let session = SearchSession::new(
                client,
                SearchOptions {
                    search_type: search_type.clone(),
                    get_total_pages: true,
                    ..SearchOptions::default()
                },
            );

            let mut results = session.results();
            let printer = tokio::spawn({
                let json = cli.json;
                async move {
                    while results.changed().await.is_ok() {
                        let Some(result) = results.borrow_and_update().clone() else {
                            continue;
                        };
                        match result.outcome {
                            Ok(outcome) => {
                                if let Err(e) =
                                    print_outcome(&outcome.results, &outcome.timings, json)
                                {
                                    tracing::error!("failed to print results: {e}");
                                }
                            }
                            Err(error) => eprintln!("search failed: {}", error.user_message()),
                        }
                    }
                }
            });

            eprintln!("type a query and press enter (ctrl-d to quit):");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                session.set(|options| options.query = line.trim().to_string());
            }

            printer.abort();
        }
    }

    Ok(())
}

fn print_outcome(
    results: &SearchResults,
    timings: &[chunk_search_client::timing::ServerTiming],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let value = match results {
            SearchResults::Chunks(response) => serde_json::to_value(response)?,
            SearchResults::Grouped(response) => serde_json::to_value(response)?,
            SearchResults::Scroll(response) => serde_json::to_value(response)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match results {
        SearchResults::Chunks(response) => {
            for hit in &response.chunks {
                if let Some(chunk) = hit.chunk() {
                    println!(
                        "{:.4}  {}  {}",
                        hit.score,
                        chunk.id,
                        chunk.tracking_id.as_deref().unwrap_or("-")
                    );
                }
            }
            if let Some(corrected) = &response.corrected_query {
                println!("corrected query: {corrected}");
            }
            println!("total pages: {}", response.total_pages);
        }
        SearchResults::Grouped(response) => {
            for group in &response.results {
                println!(
                    "group {} ({})",
                    group.group_id,
                    group.group_name.as_deref().unwrap_or("unnamed")
                );
                for hit in &group.metadata {
                    if let Some(chunk) = hit.chunk() {
                        println!("  {:.4}  {}", hit.score, chunk.id);
                    }
                }
            }
            println!("total pages: {}", response.total_pages);
        }
        SearchResults::Scroll(response) => {
            for chunk in &response.chunks {
                println!("{}  {}", chunk.id, chunk.tracking_id.as_deref().unwrap_or("-"));
            }
        }
    }

    if !timings.is_empty() {
        let breakdown: Vec<String> = timings
            .iter()
            .map(|t| format!("{}={}ms", t.name, t.duration))
            .collect();
        println!("server timing: {}", breakdown.join(" "));
    }

    Ok(())
}
