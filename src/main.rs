//! CLI entry point for bytecron

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bytecron")]
#[command(author = "Steve Boby George")]
#[command(version = "0.1.0")]
#[command(about = "A personal blog engine: markdown in, website out", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new draft post
    New {
        /// Title of the new post
        title: String,
    },

    /// Build the static site
    #[command(alias = "b")]
    Build {
        /// Watch for file changes and rebuild
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a live-reloading dev server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the output directory
    Clean,

    /// List site content
    List {
        /// Type of content to list (posts, tags)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "bytecron=debug,info"
    } else {
        "bytecron=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog site in {:?}", target_dir);
            bytecron::commands::init::init_site(&target_dir)?;
            println!("Initialized empty blog site in {:?}", target_dir);
        }

        Commands::New { title } => {
            let site = bytecron::Site::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            bytecron::commands::new::create_post(&site, &title)?;
        }

        Commands::Build { watch } => {
            let site = bytecron::Site::new(&base_dir)?;

            site.build()?;
            println!("Built successfully!");

            if watch {
                bytecron::commands::build::watch(&site).await?;
            }
        }

        Commands::Serve { port, ip, open } => {
            let site = bytecron::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            bytecron::server::start(&site, &ip, port, open).await?;
        }

        Commands::Clean => {
            let site = bytecron::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = bytecron::Site::new(&base_dir)?;
            bytecron::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("bytecron version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
