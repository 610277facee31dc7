//! Review command handlers for the CLI.

use clap::Subcommand;
use drinkorder_core::{AppConfig, SentimentLabel};
use drinkorder_db::ReviewFilter;
use drinkorder_sentiment::{build_review_classifier, ClassifierConfig, EngineStatus};

/// Sub-commands available under `reviews`.
#[derive(Debug, Subcommand)]
pub enum ReviewsCommands {
    /// List recent reviews
    List {
        /// Only reviews of this drink
        #[arg(long)]
        drink: Option<i64>,

        /// Only reviews with this sentiment (positive, negative, neutral)
        #[arg(long)]
        sentiment: Option<SentimentLabel>,

        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Re-run the classifier over every stored review
    Reclassify {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Reviews fetched per page
        #[arg(long, default_value_t = 200)]
        batch_size: i64,
    },
}

/// Dispatch a `reviews` sub-command.
///
/// # Errors
///
/// Returns an error if a database query fails or, for `reclassify`, if the
/// sentiment engine cannot be loaded.
pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: ReviewsCommands,
) -> anyhow::Result<()> {
    match command {
        ReviewsCommands::List {
            drink,
            sentiment,
            limit,
        } => run_reviews_list(pool, drink, sentiment, limit).await,
        ReviewsCommands::Reclassify {
            dry_run,
            batch_size,
        } => run_reviews_reclassify(pool, config, dry_run, batch_size).await,
    }
}

async fn run_reviews_list(
    pool: &sqlx::PgPool,
    drink_id: Option<i64>,
    sentiment: Option<SentimentLabel>,
    limit: i64,
) -> anyhow::Result<()> {
    let filter = ReviewFilter {
        drink_id,
        sentiment,
    };
    let reviews = drinkorder_db::list_reviews(pool, filter, limit.clamp(1, 200)).await?;

    if reviews.is_empty() {
        println!("no reviews found");
        return Ok(());
    }

    println!("{:<8}{:<8}{:<8}{:<10}TEXT", "ID", "DRINK", "RATING", "SENTIMENT");
    for review in &reviews {
        println!(
            "{:<8}{:<8}{:<8}{:<10}{}",
            review.id,
            review.drink_id,
            review.rating,
            review.sentiment,
            preview(review.text.as_deref().unwrap_or(""), 60)
        );
    }

    Ok(())
}

/// Counts reported by a re-classification pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ReclassifySummary {
    pub scanned: usize,
    pub changed: usize,
}

/// Re-classify every review and store labels that changed.
///
/// Aborts before writing anything if the engine fails to load, since an
/// unavailable engine labels everything neutral.
async fn run_reviews_reclassify(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    dry_run: bool,
    batch_size: i64,
) -> anyhow::Result<()> {
    let classifier = build_review_classifier(&ClassifierConfig::from_app_config(config))?;
    let batch_size = batch_size.clamp(1, 1_000);

    let mut summary = ReclassifySummary::default();
    let mut after_id = 0_i64;

    loop {
        let page =
            drinkorder_db::list_reviews_for_reclassification(pool, after_id, batch_size).await?;
        let Some(last) = page.last() else {
            break;
        };
        after_id = last.id;

        for review in &page {
            let label = classifier
                .classify(review.text.as_deref().unwrap_or(""))
                .await;
            if classifier.status() == EngineStatus::Unavailable {
                anyhow::bail!(
                    "sentiment engine ({}) is unavailable; stored labels left unchanged",
                    classifier.loader().name()
                );
            }

            summary.scanned += 1;
            if review.sentiment == label.as_str() {
                continue;
            }
            summary.changed += 1;
            tracing::info!(
                review_id = review.id,
                previous = %review.sentiment,
                new = %label,
                dry_run,
                "review sentiment changed"
            );
            if !dry_run {
                drinkorder_db::update_review_sentiment(pool, review.id, label).await?;
            }
        }
    }

    println!("{}", summary_line(&summary, dry_run));
    Ok(())
}

pub(crate) fn summary_line(summary: &ReclassifySummary, dry_run: bool) -> String {
    let verb = if dry_run { "would change" } else { "changed" };
    format!(
        "scanned {} review(s); {verb} {}",
        summary.scanned, summary.changed
    )
}

/// Truncate to `max_chars` characters, appending `...` when cut.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
