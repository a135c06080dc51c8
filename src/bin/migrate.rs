use anyhow::{anyhow, Result};
use guesthouse_bot::config::database_url_from_env;
use guesthouse_bot::database::connection::DatabaseManager;
use guesthouse_bot::database::models::Room;
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "add-room" => match (args.get(2), args.get(3)) {
            (Some(description), Some(photo_url)) => add_room(description, photo_url).await,
            _ => Err(anyhow!("Usage: migrate add-room <description> <photo-url>")),
        },
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

/// File path of a `sqlite:` URL, if it is one.
fn sqlite_path(url: &str) -> Option<&str> {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .filter(|path| !path.is_empty() && !path.starts_with(":memory:"))
}

async fn connect() -> Result<DatabaseManager> {
    let database_url = database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    if let Some(parent) = sqlite_path(&database_url).and_then(|path| Path::new(path).parent()) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            println!("📁 Creating directory: {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }

    DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Guesthouse Bot - Database Migration Tool");
    println!("===========================================");

    let db_manager = connect().await?;
    println!("🚀 Running database migrations...");

    match db_manager.run_migrations().await {
        Ok(_) => {
            println!("✅ Migrations completed successfully!");
            println!("\n🏠 Add rooms with: migrate add-room <description> <photo-url>");
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let db_manager = connect().await?;

    match check_tables(&db_manager).await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for (table, rows) in tables {
                println!("  • {table} ({rows} rows)");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL bookings, guests and payments!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = database_url_from_env();
    let Some(db_path) = sqlite_path(&database_url) else {
        return Err(anyhow!("Reset is only supported for SQLite database files"));
    };

    if Path::new(db_path).exists() {
        std::fs::remove_file(db_path)?;
        println!("🗑️  Deleted database file: {db_path}");
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");
    Ok(())
}

async fn add_room(description: &str, photo_url: &str) -> Result<()> {
    let description = description.trim();
    if description.is_empty() {
        return Err(anyhow!("Room description cannot be empty"));
    }

    let db_manager = connect().await?;
    db_manager.run_migrations().await?;

    let room = Room::create(&db_manager.pool, description, photo_url.trim()).await?;
    println!("✅ Added room #{}: {}", room.id, room.description);
    Ok(())
}

async fn check_tables(db_manager: &DatabaseManager) -> Result<Vec<(String, i64)>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&db_manager.pool)
    .await?;

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let rows = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM \"{name}\""))
            .fetch_one(&db_manager.pool)
            .await?;
        tables.push((name, rows));
    }
    Ok(tables)
}

fn mask_url(url: &str) -> String {
    match sqlite_path(url).and_then(|path| Path::new(path).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🏠 Guesthouse Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up                       Run database migrations (default)");
    println!("    check                             Check database connection and schema");
    println!("    reset                             Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    add-room <description> <url>      Add a room with a link to its photos");
    println!("    help                              Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/guesthouse.db)");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                                        # Run migrations");
    println!("    migrate add-room \"Double, sea view\" https://example.com/room-1");
    println!("    migrate check                                  # Check database status");
    println!();
}
