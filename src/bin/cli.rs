//! bloomd CLI
//!
//! Command-line wrapper around the client library.

use clap::{Parser, Subcommand};
use bloomd::{Client, Config, FilterSpec};
use tracing_subscriber::{fmt, EnvFilter};

/// bloomd CLI
#[derive(Parser, Debug)]
#[command(name = "bloomd-cli")]
#[command(about = "CLI for the bloomd bloom-filter server")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8673")]
    server: String,

    /// Connect, read and write timeout in milliseconds (0 disables)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Send SHA-256 digests of keys instead of the keys themselves
    #[arg(long)]
    hash_keys: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List filters
    List,

    /// Create a filter
    Create {
        name: String,

        /// Initial capacity
        #[arg(short, long)]
        capacity: Option<u64>,

        /// False positive probability (needs --capacity)
        #[arg(short, long)]
        prob: Option<f64>,

        /// Keep the filter in memory only
        #[arg(long)]
        in_memory: bool,
    },

    /// Show a filter's info dictionary
    Info { name: String },

    /// Flush one filter, or all of them
    Flush { name: Option<String> },

    /// Add a key
    Set { name: String, key: String },

    /// Check a key
    Check { name: String, key: String },

    /// Add several keys
    Bulk {
        name: String,
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Check several keys
    Multi {
        name: String,
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Delete a filter
    Drop { name: String },

    /// Unload a filter from memory
    Close { name: String },

    /// Remove a filter from the server's list
    Clear { name: String },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .server_addr(&args.server)
        .timeout_ms(args.timeout_ms)
        .hash_keys(args.hash_keys)
        .build();

    tracing::debug!("bloomd-cli v{} -> {}", bloomd::VERSION, config.server_addr);

    let client = Client::new(config);
    if let Err(e) = run(&client, args.command) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(client: &Client, command: Commands) -> bloomd::Result<()> {
    match command {
        Commands::List => {
            for (name, status) in client.list_filters()?.iter() {
                println!("{} {}", name, status);
            }
        }
        Commands::Create { name, capacity, prob, in_memory } => {
            let mut spec = FilterSpec::new(name).in_memory(in_memory);
            spec.capacity = capacity;
            spec.probability = prob;
            client.create_filter(&spec)?;
            println!("Done");
        }
        Commands::Info { name } => {
            for (key, value) in client.filter(&name).info()?.iter() {
                println!("{} {}", key, value);
            }
        }
        Commands::Flush { name: Some(name) } => {
            client.filter(&name).flush()?;
            println!("Done");
        }
        Commands::Flush { name: None } => {
            client.flush()?;
            println!("Done");
        }
        Commands::Set { name, key } => print_bool(client.filter(&name).set(&key)?),
        Commands::Check { name, key } => print_bool(client.filter(&name).check(&key)?),
        Commands::Bulk { name, keys } => {
            for (key, added) in keys.iter().zip(client.filter(&name).bulk(&keys)?) {
                println!("{} {}", key, yes_no(added));
            }
        }
        Commands::Multi { name, keys } => {
            for (key, present) in keys.iter().zip(client.filter(&name).multi(&keys)?) {
                println!("{} {}", key, yes_no(present));
            }
        }
        Commands::Drop { name } => {
            client.filter(&name).drop()?;
            println!("Done");
        }
        Commands::Close { name } => {
            client.filter(&name).close()?;
            println!("Done");
        }
        Commands::Clear { name } => {
            client.filter(&name).clear()?;
            println!("Done");
        }
    }

    Ok(())
}

fn print_bool(value: bool) {
    println!("{}", yes_no(value));
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}
