use clap::{Parser, Subcommand};
use simple_folio::{collection::Store, config, generate, output};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "simple-folio")]
#[command(about = "Static blog and portfolio generator")]
#[command(long_about = "\
Static blog and portfolio generator

Posts are plain files in a flat directory. The file name is the slug, a
YAML header carries the metadata, and the rest is markdown.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── assets/                      # Copied verbatim to the output root
  │   └── images/placeholder.svg   # Cover image fallback
  └── posts/
      ├── hello-world.mdx          # → /blog/hello-world/
      └── on-writing.mdx

Post header:

  ---
  title: Hello World               # required
  date: 2024-03-01                 # required, newest first
  description: A first post
  tags: [rust, notes]              # first tag shown on the index
  image: /images/hello.png         # cover, falls back on load error
  keywords: [static, site]
  ---

Run 'simple-folio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every post, newest first
    List {
        /// Print the collection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one post by slug
    Show {
        slug: String,
        /// Print the document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Produce the final HTML site
    Build,
    /// Validate every post without writing output
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("simple_folio=info"))?)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::List { json } => {
            let store = load_store(&cli.source)?;
            let documents = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else {
                output::print_list_output(&documents, &store);
            }
        }
        Command::Show { slug, json } => {
            let store = load_store(&cli.source)?;
            let document = store
                .get(&slug)?
                .ok_or_else(|| format!("no post with slug '{slug}' in {}", store.root().display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                output::print_show_output(&document, &store);
            }
        }
        Command::Build => {
            println!("==> Generating {} → {}", cli.source.display(), cli.output.display());
            let report = generate::generate(&cli.source, &cli.output)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let store = load_store(&cli.source)?;
            let documents = store.list()?;
            output::print_list_output(&documents, &store);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_store(source: &std::path::Path) -> Result<Store, config::ConfigError> {
    let site_config = config::load_config(source)?;
    Ok(Store::from_config(source, &site_config))
}
