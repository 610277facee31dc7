mod orders;
mod reviews;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use drinkorder_core::SentimentBackend;
use drinkorder_sentiment::{build_review_classifier, ClassifierConfig};
use tracing_subscriber::EnvFilter;

use crate::orders::OrdersCommands;
use crate::reviews::ReviewsCommands;

#[derive(Debug, Parser)]
#[command(name = "drinkorder-cli")]
#[command(about = "Drink ordering service command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Classify one piece of text and print the label
    Classify {
        /// Review text to classify
        text: String,

        /// Use a TEI classifier at this URL instead of the built-in lexicon
        #[arg(long, env = "DRINKORDER_SENTIMENT_TEI_URL")]
        tei_url: Option<String>,

        /// JSON `{word: weight}` lexicon to use instead of the built-in one
        #[arg(long, env = "DRINKORDER_SENTIMENT_LEXICON_PATH")]
        lexicon: Option<PathBuf>,
    },
    /// Review queries and maintenance
    Reviews {
        #[command(subcommand)]
        command: ReviewsCommands,
    },
    /// Bartender order queue
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => {
            let pool = connect().await?;
            match command {
                DbCommands::Ping => {
                    drinkorder_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = drinkorder_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
        Some(Commands::Classify {
            text,
            tei_url,
            lexicon,
        }) => run_classify(&text, tei_url, lexicon).await?,
        Some(Commands::Reviews { command }) => {
            let config = drinkorder_core::load_app_config()?;
            let pool = connect_with(&config).await?;
            reviews::run(&pool, &config, command).await?;
        }
        Some(Commands::Orders { command }) => {
            let pool = connect().await?;
            orders::run(&pool, command).await?;
        }
        None => println!("drinkorder-cli: run with --help to list commands"),
    }

    Ok(())
}

async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let config = drinkorder_core::load_app_config()?;
    connect_with(&config).await
}

async fn connect_with(config: &drinkorder_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = drinkorder_db::PoolConfig::from_app_config(config);
    let pool = drinkorder_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

fn classify_config(tei_url: Option<String>, lexicon: Option<PathBuf>) -> ClassifierConfig {
    let tei_url = tei_url
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty());
    ClassifierConfig {
        backend: if tei_url.is_some() {
            SentimentBackend::Tei
        } else {
            SentimentBackend::Lexicon
        },
        tei_url,
        lexicon_path: lexicon,
        ..ClassifierConfig::default()
    }
}

async fn run_classify(
    text: &str,
    tei_url: Option<String>,
    lexicon: Option<PathBuf>,
) -> anyhow::Result<()> {
    let classifier = build_review_classifier(&classify_config(tei_url, lexicon))?;
    let label = classifier.classify(text).await;
    println!("{label}");
    tracing::debug!(
        backend = classifier.loader().name(),
        engine = classifier.status().as_str(),
        "classified"
    );
    Ok(())
}
