//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    cors_origins: Vec<String>,
) -> Result<()> {
    // Merge origins from flags and environment (comma-separated)
    let mut origins = cors_origins;
    if let Ok(env_origins) = std::env::var("GASTOTRACK_CORS_ORIGINS") {
        origins.extend(
            env_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );
    }

    println!("🚀 Starting GastoTrack web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS origins: {}", origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = gastotrack_server::ServerConfig {
        allowed_origins: origins,
    };

    let static_dir_str = static_dir.map(|p| p.to_string_lossy().to_string());
    gastotrack_server::serve(db, host, port, static_dir_str.as_deref(), config).await?;

    Ok(())
}
