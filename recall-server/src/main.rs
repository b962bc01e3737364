use clap::{Parser, Subcommand};
use recall_index::{SqliteVectorStore, VectorStore};
use recall_server::{CommandServer, RecallContext};
use std::path::PathBuf;
use std::process;

/// Semantic memory for workspace files: index text files into a local
/// vector store and search them by meaning.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite vector store
    #[arg(long, default_value = ".recall/recall.db")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the JSON command protocol on stdin/stdout
    Serve,
    /// Index a file or directory
    Index {
        /// File or directory to index
        path: PathBuf,
        /// Re-index even if content is unchanged
        #[arg(short, long)]
        force: bool,
        /// Override the default extension set (comma-separated)
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,
    },
    /// Search the index
    Search {
        /// Query text
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Show the number of indexed chunks
    Stats,
    /// Delete everything in the index
    Clear,
}

#[tokio::main]
async fn main() {
    // Protocol output owns stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Serve => {
            let mut server = CommandServer::new(args.db_path);
            server.run(tokio::io::stdin(), tokio::io::stdout()).await
        }
        Commands::Index {
            path,
            force,
            extensions,
        } => {
            let context = RecallContext::open(&args.db_path).await?;
            let metadata = tokio::fs::metadata(&path).await?;
            if metadata.is_dir() {
                let summary = context
                    .indexer()
                    .index_directory(&path, extensions.as_deref(), force)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let outcome = context.indexer().index_file(&path, force).await?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            Ok(())
        }
        Commands::Search { query, limit } => {
            let context = RecallContext::open(&args.db_path).await?;
            let hits = context.search().search(&query, limit).await?;
            println!("{}", serde_json::to_string_pretty(&hits)?);
            Ok(())
        }
        // Stats and clear only touch the store; no need to load the model.
        Commands::Stats => {
            let store = SqliteVectorStore::open(&args.db_path).await?;
            println!("{} chunks indexed", store.count().await?);
            Ok(())
        }
        Commands::Clear => {
            let store = SqliteVectorStore::open(&args.db_path).await?;
            store.clear().await?;
            println!("Index cleared");
            Ok(())
        }
    }
}
