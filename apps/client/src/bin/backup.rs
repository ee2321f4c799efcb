//! Copies every stored application and resume from a running server into
//! `./backup/<YYYY-MM-DD>/`.
//!
//! Usage: `backup <SERVER_URL>`

use std::process::ExitCode;

use anyhow::{Context, Result};
use jobfair_client::{BackupJob, BackupReport};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const OUTPUT_ROOT: &str = "backup";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobfair_client=info,backup=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(base_url) = std::env::args().nth(1) else {
        eprintln!("Uso: backup <URL_DEL_SERVIDOR>");
        eprintln!("Ejemplo: backup https://mi-app.example.com");
        return ExitCode::FAILURE;
    };

    info!("Starting backup from {base_url}");
    match run(&base_url).await {
        Ok(report) => {
            info!("Backup written to {}", report.directory.display());
            info!("Total applications: {}", report.total);
            info!("Resumes downloaded: {}", report.downloaded);
            if !report.failed.is_empty() {
                info!("Resumes missing: {}", report.failed.join(", "));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Backup failed: {e:#}");
            eprintln!();
            eprintln!("Asegúrate de:");
            eprintln!("1. Que la URL del servidor sea correcta");
            eprintln!("2. Que la aplicación esté funcionando");
            eprintln!("3. Que tengas conexión a internet");
            ExitCode::FAILURE
        }
    }
}

async fn run(base_url: &str) -> Result<BackupReport> {
    let job = BackupJob::new(base_url, OUTPUT_ROOT).context("Could not prepare the backup")?;
    job.run()
        .await
        .with_context(|| format!("Could not back up {base_url}"))
}
