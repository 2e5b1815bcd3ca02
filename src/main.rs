use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod error;
mod registry;
mod store;
mod ui;
mod upload;
mod vault;

use registry::ImageRegistry;
use store::backend::SqliteBackend;
use store::images::ImageStore;
use ui::{TerminalFeedback, UserFeedback};
use upload::pipeline::Uploader;
use upload::transport::{HttpTransport, UploadTarget};
use vault::FileVault;

/// Local photo roll with one-tap upload to a clinical document store.
#[derive(Parser)]
#[command(name = "photo-courier", version)]
struct Cli {
    /// Managed storage directory (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy a photo into the managed roll
    Add {
        /// Photo to import
        source: PathBuf,
    },
    /// Show the roll, newest first
    List {
        /// Emit the roll as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload one entry to the document store
    Upload {
        /// Entry name as shown by `list`
        name: String,
    },
    /// Delete one entry from the roll
    Remove {
        /// Entry name as shown by `list`
        name: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let vault = match cli.data_dir {
        Some(dir) => FileVault::at(dir),
        None => FileVault::open(),
    };
    // The app cannot function without its storage.
    let backend = SqliteBackend::open(&vault.root().join("courier.db"))
        .expect("Failed to initialize storage. Check permissions and disk space.");
    let store = ImageStore::new(Box::new(backend));
    let feedback: Arc<dyn UserFeedback> = Arc::new(TerminalFeedback);

    let mut registry = ImageRegistry::new(store, vault, Arc::clone(&feedback));

    // Storage and files are in place; load the roll before anything else
    // runs.
    registry.reload().await;

    match cli.command {
        Command::Add { source } => {
            if let Some(name) = registry.import(&source).await {
                println!("📷 Imported as {}", name);
            }
        }
        Command::List { json } => {
            if json {
                let encoded =
                    serde_json::to_string_pretty(registry.images()).expect("roll serialization");
                println!("{}", encoded);
            } else {
                print_roll(&registry);
            }
        }
        Command::Upload { name } => {
            let uploader = Uploader::new(
                Box::new(HttpTransport::new()),
                UploadTarget::default(),
                Arc::clone(&feedback),
            );
            uploader.upload(&mut registry, &name).await;
        }
        Command::Remove { name } => match registry.images().iter().position(|e| e.name == name) {
            Some(index) => registry.remove(index).await,
            None => eprintln!("⚠️  No roll entry named {}", name),
        },
    }
}

/// Print the roll the way the list screen shows it: newest first.
fn print_roll(registry: &ImageRegistry) {
    if registry.images().is_empty() {
        println!("🗂️  Roll is empty.");
        return;
    }

    for (index, entry) in registry.images().iter().enumerate() {
        println!("{:>3}  {}  {}", index, entry.name, entry.path);
    }
}
