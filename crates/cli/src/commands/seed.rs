//! Catalog seeding command.
//!
//! Inserts a small set of approved audiobooks with chapters and one
//! subscription plan. Safe to run repeatedly; rows already present by
//! title or plan name are skipped.

use sqlx::PgPool;

use super::{CliError, connect};

struct SampleBook {
    title: &'static str,
    author: &'static str,
    description: &'static str,
    price_cents: i64,
    is_free: bool,
    chapters: &'static [(&'static str, i32, bool)],
}

const SAMPLE_BOOKS: &[SampleBook] = &[
    SampleBook {
        title: "The Clockwork Archivist",
        author: "Mira Holloway",
        description: "A librarian discovers the card catalog is indexing the future.",
        price_cents: 1499,
        is_free: false,
        chapters: &[
            ("The Misfiled Drawer", 1834, true),
            ("Tomorrow's Returns", 2101, false),
            ("Overdue", 1987, false),
        ],
    },
    SampleBook {
        title: "Salt and Circuitry",
        author: "Dev Okafor",
        description: "Deep-sea welders keep an ancient machine from waking.",
        price_cents: 1999,
        is_free: false,
        chapters: &[
            ("Pressure", 2450, true),
            ("The Hum", 2210, false),
            ("Ballast", 2033, false),
            ("Surfacing", 2390, false),
        ],
    },
    SampleBook {
        title: "A Field Guide to Vanishing",
        author: "Imogen Cole",
        description: "Short essays on places that no longer exist.",
        price_cents: 0,
        is_free: true,
        chapters: &[("Foreword", 612, true), ("The Tide Pools", 1480, false)],
    },
];

/// Seed the database with sample catalog data.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    for book in SAMPLE_BOOKS {
        seed_book(&pool, book).await?;
    }
    seed_plan(&pool).await?;

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn seed_book(pool: &PgPool, book: &SampleBook) -> Result<(), CliError> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM audiobooks WHERE title = $1)")
            .bind(book.title)
            .fetch_one(pool)
            .await?;
    if exists {
        tracing::info!(title = book.title, "already seeded, skipping");
        return Ok(());
    }

    let (audiobook_id,): (i32,) = sqlx::query_as(
        "INSERT INTO audiobooks (title, author, description, price_cents, currency, is_free, status)
         VALUES ($1, $2, $3, $4, 'USD', $5, 'APPROVED')
         RETURNING id",
    )
    .bind(book.title)
    .bind(book.author)
    .bind(book.description)
    .bind(book.price_cents)
    .bind(book.is_free)
    .fetch_one(pool)
    .await?;

    for (number, (title, duration_seconds, is_sample)) in (1i32..).zip(book.chapters.iter()) {
        sqlx::query(
            "INSERT INTO chapters
                 (audiobook_id, chapter_number, title, duration_seconds, is_sample, audio_url)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(audiobook_id)
        .bind(number)
        .bind(title)
        .bind(duration_seconds)
        .bind(is_sample)
        .bind(format!("https://cdn.fable.example/audio/{audiobook_id}/{number}.mp3"))
        .execute(pool)
        .await?;
    }

    tracing::info!(title = book.title, audiobook_id, "seeded audiobook");
    Ok(())
}

async fn seed_plan(pool: &PgPool) -> Result<(), CliError> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM plans WHERE name = 'Fable Unlimited')")
            .fetch_one(pool)
            .await?;
    if exists {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO plans (name, description, price_cents, currency, billing_interval, paypal_plan_id, active)
         VALUES ('Fable Unlimited', 'Every audiobook in the catalog, billed monthly.',
                 999, 'USD', 'MONTH', 'P-UNSET', true)",
    )
    .execute(pool)
    .await?;

    tracing::info!("seeded subscription plan");
    Ok(())
}
