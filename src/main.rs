use clap::{Parser, Subcommand};
use sketch_index::contributions::group_by_category;
use sketch_index::filter::{SearchCache, filter_array, filter_tree};
use sketch_index::generate::{self, GenerateOptions};
use sketch_index::tree::build_tree;
use sketch_index::{config, output, scan};
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "sketch-index")]
#[command(about = "Browse, search and publish a sketch documentation site")]
#[command(long_about = "\
Browse, search and publish a sketch documentation site

Examples are filed into a category tree by their directory. Searching keeps
every category on the way to a match and drops the rest.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── overview.md                  # Overview page (optional)
  ├── examples/
  │   └── Basics/Arrays/Array2D/
  │       ├── Array2D.json         # {\"name\", \"title\"}
  │       ├── Array2D.es.json      # Translation (not used for the tree)
  │       └── Array2D.png          # Preview image
  ├── contributions/
  │   ├── en/fisica.json           # Library listing (type = library)
  │   └── es/fisica.json           # Localized sentence
  ├── libraries/core.json          # Core libraries
  └── reference/
      └── processing/              # One directory per library
          ├── PVector.json
          ├── PVector.es.json
          └── examples/PVector.pde

A search term matches an example's name, title or any of its categories,
ignoring case and surrounding whitespace.

Set RUST_LOG=debug for detailed logs on stderr.
Run 'sketch-index gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
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
    /// Scan the content directory and print what was found
    Scan {
        /// Print the manifest as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Search examples; reads one term per line from stdin when TERM is omitted
    Search {
        /// Search term
        term: Option<String>,
    },
    /// List library contributions grouped by category
    Libraries {
        /// Only show libraries whose name or description matches
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Render the HTML site
    Build {
        /// Only include examples and libraries matching this term
        #[arg(long, default_value = "")]
        filter: String,
        /// Top-level example category to render expanded (repeatable)
        #[arg(long)]
        open: Vec<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan { json } => {
            let manifest = scan::scan(&cli.source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                let tree = build_tree(&manifest.examples);
                output::print_scan_output(&manifest, &tree, &cli.source);
            }
        }
        Command::Search { term } => {
            let manifest = scan::scan(&cli.source)?;
            let tree = build_tree(&manifest.examples);
            match term {
                Some(term) => {
                    let result = filter_tree(&tree, &term);
                    output::print_search_output(&term, result.as_deref());
                }
                None => {
                    let mut cache = SearchCache::new(&tree);
                    for line in std::io::stdin().lock().lines() {
                        let term = line?;
                        output::print_search_output(&term, cache.search(&term));
                    }
                    tracing::debug!(hits = cache.hits(), "search session ended");
                }
            }
        }
        Command::Libraries { filter } => {
            let manifest = scan::scan(&cli.source)?;
            let matched = filter_array(&manifest.contributions, &filter);
            let groups = matched.as_deref().map(group_by_category);
            output::print_libraries_output(&filter, groups.as_deref());
        }
        Command::Build { filter, open } => {
            println!("==> Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let tree = build_tree(&manifest.examples);
            output::print_scan_output(&manifest, &tree, &cli.source);

            println!("==> Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let options = GenerateOptions { filter, open };
            let summary = generate::generate(&manifest, &cli.source, &cli.output, &options)?;
            output::print_generate_output(&summary);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
