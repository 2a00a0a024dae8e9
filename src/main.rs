//! Tether CLI entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tether::{
    AiClassifier, ApiKeyStore, ClassifierChain, CommandBuilder, CommandInterpreter, Config,
    Contact, ContactResolver, HeuristicClassifier, MemoryEntityStore,
};

/// Tether: natural-language commands for a relationship calendar
#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a line of text and print the resulting command
    Parse {
        /// The text to interpret
        text: String,
        /// Path to a JSON file with the contact catalog
        #[arg(long)]
        contacts: Option<String>,
        /// Target scope identifier
        #[arg(short, long)]
        scope: Option<String>,
    },
    /// Parse a line of text and execute it against an in-memory store
    Run {
        /// The text to interpret
        text: String,
        /// Path to a JSON file with the contact catalog
        #[arg(long)]
        contacts: Option<String>,
        /// Target scope identifier
        #[arg(short, long, default_value = "personal")]
        scope: String,
    },
    /// Manage the stored API credential
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeyCommand {
    /// Validate and store an API key
    Set { api_key: String },
    /// Remove the stored API key
    Clear,
    /// Show whether an API key is configured
    Status,
    /// Validate a key (the stored one when none is given)
    Test { api_key: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let keys = Arc::new(ApiKeyStore::default_location());

    match args.command {
        Command::Parse {
            text,
            contacts,
            scope,
        } => {
            let catalog = load_catalog(contacts.as_deref())?;
            let store = Arc::new(MemoryEntityStore::new());
            let interpreter = build_interpreter(&config, keys, store)?;
            let command = interpreter
                .parse(&text, &catalog, scope.as_deref())
                .await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&command)?);
            } else {
                println!("{command}");
            }
        }

        Command::Run {
            text,
            contacts,
            scope,
        } => {
            let catalog = load_catalog(contacts.as_deref())?;
            let store = Arc::new(MemoryEntityStore::new());
            for contact in &catalog {
                store.add_contact(contact.clone()).await;
            }

            let interpreter = build_interpreter(&config, keys, store)?;
            let result = interpreter.submit(&text, &catalog, Some(&scope)).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.message);
                for warning in &result.warnings {
                    println!("  warning: {warning}");
                }
            }

            if !result.success {
                std::process::exit(1);
            }
        }

        Command::Key { action } => {
            let ai = AiClassifier::new(config.ai.clone(), keys.clone())?;
            match action {
                KeyCommand::Set { api_key } => {
                    if ai.validate_key(&api_key).await {
                        keys.set(&api_key)?;
                        println!("API key validated and stored");
                    } else {
                        eprintln!("API key failed validation; not stored");
                        std::process::exit(1);
                    }
                }
                KeyCommand::Clear => {
                    keys.clear()?;
                    println!("API key cleared");
                }
                KeyCommand::Status => {
                    if keys.has_key() {
                        println!("API key configured");
                    } else {
                        println!("No API key configured");
                    }
                }
                KeyCommand::Test { api_key } => {
                    let Some(key) = api_key.or_else(|| keys.get()) else {
                        eprintln!("No API key to test");
                        std::process::exit(1);
                    };
                    if ai.validate_key(&key).await {
                        println!("API key is valid");
                    } else {
                        eprintln!("API key is invalid");
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Read a contact catalog from a JSON file, or use an empty one.
fn load_catalog(path: Option<&str>) -> anyhow::Result<Vec<Contact>> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(Vec::new()),
    }
}

/// Assemble the AI-then-heuristic interpreter from configuration.
fn build_interpreter(
    config: &Config,
    keys: Arc<ApiKeyStore>,
    store: Arc<MemoryEntityStore>,
) -> anyhow::Result<CommandInterpreter> {
    let builder = CommandBuilder::new()
        .with_resolver(ContactResolver::with_threshold(config.parser.fuzzy_threshold));
    let chain = ClassifierChain::new()
        .push(Arc::new(AiClassifier::new(config.ai.clone(), keys)?))
        .push(Arc::new(HeuristicClassifier::from_builder(builder)));
    Ok(CommandInterpreter::with_chain(store, chain))
}
