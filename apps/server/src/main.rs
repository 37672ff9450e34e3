use airnest_api::{build_router, AppState};
use airnest_auth::AuthError;
use airnest_config::{load as load_config, AppConfig};
use airnest_database::{ListingRepository, NewListing};
use airnest_runtime::{telemetry, BackendServices};
use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::info;

const DEMO_EMAIL: &str = "demo@airnest.dev";
const DEMO_PASSWORD: &str = "airnest-demo";

#[derive(Parser)]
#[command(name = "airnest")]
#[command(about = "Airnest rental listings backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Print users and listings stored in the database
    DumpData,
    /// Insert a demo host with a handful of listings
    SeedData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::DumpData => dump_data(config).await,
        Commands::SeedData => seed_data(config).await,
    }
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!("starting Airnest backend");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = AppState::new(
        services.db_pool.clone(),
        services.authenticator.clone(),
        config.listings.clone(),
    );
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(airnest_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.shutdown().await;
    info!("backend shut down");
    Ok(())
}

async fn dump_data(config: AppConfig) -> anyhow::Result<()> {
    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = sqlx::query(
        r#"
        SELECT public_id, email, name, favorite_ids, created_at
        FROM users
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch users")?;

    println!("=== USERS ===");
    if users.is_empty() {
        println!("No users found in database");
    } else {
        println!("Found {} users:", users.len());
        println!(
            "{:<26} {:<30} {:<20} {:<30} {:<28}",
            "Public ID", "Email", "Name", "Favorites", "Created At"
        );
        println!("{}", "-".repeat(136));

        for user in users {
            let public_id: String = user.get("public_id");
            let email: Option<String> = user.get("email");
            let name: Option<String> = user.get("name");
            let favorite_ids: String = user.get("favorite_ids");
            let created_at: String = user.get("created_at");

            println!(
                "{:<26} {:<30} {:<20} {:<30} {:<28}",
                public_id,
                email.as_deref().unwrap_or("NULL"),
                name.as_deref().unwrap_or("NULL"),
                favorite_ids,
                created_at
            );
        }
    }

    let listings = ListingRepository::new(services.db_pool.clone())
        .list_all()
        .await
        .context("failed to fetch listings")?;

    println!("\n=== LISTINGS ===");
    if listings.is_empty() {
        println!("No listings found in database");
    } else {
        println!("Found {} listings:", listings.len());
        println!(
            "{:<26} {:<30} {:<14} {:<8} {:<8} {:<26} {:<28}",
            "Public ID", "Title", "Category", "Price", "Where", "Owner", "Created At"
        );
        println!("{}", "-".repeat(146));

        for listing in listings {
            println!(
                "{:<26} {:<30} {:<14} {:<8} {:<8} {:<26} {:<28}",
                listing.public_id,
                listing.title,
                listing.category,
                listing.price,
                listing.location_value,
                listing.owner_public_id,
                listing.created_at
            );
        }
    }

    services.shutdown().await;
    Ok(())
}

async fn seed_data(config: AppConfig) -> anyhow::Result<()> {
    info!("seeding database with demo data");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let host = match services
        .authenticator
        .register_with_password(DEMO_EMAIL, Some("Demo Host"), DEMO_PASSWORD)
        .await
    {
        Ok(user) => user,
        Err(AuthError::UserExists) => services
            .authenticator
            .users()
            .find_by_email(DEMO_EMAIL)
            .await?
            .context("demo user vanished while seeding")?,
        Err(error) => {
            return Err(anyhow::Error::new(error).context("failed to create demo user"))
        }
    };

    let listings = ListingRepository::new(services.db_pool.clone());
    let samples = [
        ("Lakeside cabin", "Lake", "FI", 2, 1, 4, 120),
        ("Canal house loft", "Modern", "NL", 1, 1, 2, 180),
        ("Cliffside villa", "Beach", "PT", 4, 3, 8, 420),
    ];

    for (title, category, location, rooms, bathrooms, guests, price) in samples {
        listings
            .create(
                host.id,
                &NewListing {
                    title: title.to_string(),
                    description: format!("{title} hosted by the Airnest demo account"),
                    image_src: format!(
                        "https://images.airnest.dev/{}.jpg",
                        title.to_lowercase().replace(' ', "-")
                    ),
                    category: category.to_string(),
                    room_count: rooms,
                    bathroom_count: bathrooms,
                    guest_count: guests,
                    location_value: location.to_string(),
                    price,
                },
            )
            .await
            .with_context(|| format!("failed to insert listing {title}"))?;
    }

    println!("Database seeded with demo data:");
    println!("- user {DEMO_EMAIL} (password: {DEMO_PASSWORD})");
    println!("- {} listings", samples.len());
    println!("Run 'dump-data' to see the inserted data");

    services.shutdown().await;
    Ok(())
}
