//! CLI entry point for blogfeed

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogfeed")]
#[command(version)]
#[command(about = "Post listing and Atom feed generation for a markdown blog", long_about = None)]
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
    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name for the new post (defaults to the slugified title)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Write posts.json and the Atom feed
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Remove generated files
    Clean,

    /// List dated posts, newest first
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "blogfeed=debug,info"
    } else {
        "blogfeed=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::New { title, path } => {
            let blog = blogfeed::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            blogfeed::commands::new::create_post(&blog, &title, path.as_deref())?;
        }

        Commands::Generate { watch } => {
            let blog = blogfeed::Blog::new(&base_dir)?;
            tracing::info!("Generating posts data and feed...");

            blog.generate()?;
            println!("Generated successfully!");

            if watch {
                blogfeed::commands::generate::watch(&blog).await?;
            }
        }

        Commands::Clean => {
            let blog = blogfeed::Blog::new(&base_dir)?;
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let blog = blogfeed::Blog::new(&base_dir)?;
            blogfeed::commands::list::run(&blog)?;
        }

        Commands::Version => {
            println!("blogfeed version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
