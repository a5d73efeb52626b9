//! CLI entry point for blogpost-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogpost-rs")]
#[command(version)]
#[command(about = "Server-rendered blog post pages backed by a headless content store", long_about = None)]
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
    /// Serve post pages and accept comments
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Export every known post as static HTML
    #[command(alias = "g")]
    Generate,

    /// List known post slugs
    List,

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogpost_rs=debug,info"
    } else {
        "blogpost_rs=info"
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
        Commands::Serve { port, ip } => {
            let blog = blogpost_rs::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            blogpost_rs::server::start(&blog, &ip, port).await?;
        }

        Commands::Generate => {
            let blog = blogpost_rs::Blog::new(&base_dir)?;
            tracing::info!("Generating static pages...");
            blog.generate().await?;
        }

        Commands::List => {
            let blog = blogpost_rs::Blog::new(&base_dir)?;
            blogpost_rs::commands::list::run(&blog).await?;
        }

        Commands::Clean => {
            let blog = blogpost_rs::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("blogpost-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
