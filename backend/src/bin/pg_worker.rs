//! Lifecycle worker for the embedded PostgreSQL test cluster.
//!
//! `pg-embed-setup-unpriv` drops root privileges before touching the cluster
//! and re-launches this binary as `pg_worker <operation> <payload.json>`. The
//! payload is the library's own [`WorkerPayload`], so the worker only rebuilds
//! the settings, applies the environment, and runs one step.

use std::fs;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
use postgresql_embedded::{PostgreSQL, Settings};
use tokio::runtime::Builder;

#[derive(Debug, Parser)]
#[command(name = "pg_worker", about = "Run one embedded PostgreSQL lifecycle step")]
struct Cli {
    operation: Operation,
    /// JSON payload written by the privileged parent.
    payload: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Operation {
    Setup,
    Start,
    Stop,
    Cleanup,
    CleanupFull,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let payload = read_payload(&cli.payload)?;
    run(cli.operation, payload)
}

fn read_payload(path: &Path) -> Result<WorkerPayload> {
    let raw = fs::read(path)
        .wrap_err_with(|| format!("read worker payload {}", path.display()))?;
    serde_json::from_slice(&raw)
        .wrap_err_with(|| format!("parse worker payload {}", path.display()))
}

fn run(operation: Operation, payload: WorkerPayload) -> Result<()> {
    let settings = payload
        .settings
        .into_settings()
        .wrap_err("rebuild embedded PostgreSQL settings")?;
    apply_environment(&payload.environment);

    match operation {
        Operation::Setup => {
            let mut postgres = PostgreSQL::new(settings);
            block_on("setup", postgres.setup())
        }
        Operation::Start => {
            let mut postgres = PostgreSQL::new(settings);
            block_on("start", postgres.start())?;
            // Dropping a started handle stops the server; it must outlive us.
            std::mem::forget(postgres);
            Ok(())
        }
        Operation::Stop => {
            let postgres = PostgreSQL::new(settings);
            block_on("stop", postgres.stop())
        }
        Operation::Cleanup => remove_dir(&settings.data_dir),
        Operation::CleanupFull => remove_cluster_dirs(&settings),
    }
}

fn block_on<F>(step: &str, work: F) -> Result<()>
where
    F: Future<Output = postgresql_embedded::Result<()>>,
{
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build worker runtime")?;
    runtime
        .block_on(work)
        .wrap_err_with(|| format!("embedded PostgreSQL {step} failed"))
}

fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: runs before the worker starts any other thread.
        match value {
            Some(value) => unsafe { std::env::set_var(key, value.expose()) },
            None => unsafe { std::env::remove_var(key) },
        }
    }
}

fn remove_cluster_dirs(settings: &Settings) -> Result<()> {
    remove_dir(&settings.data_dir)?;
    remove_dir(&settings.installation_dir)
}

fn remove_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.parent().is_none() {
        bail!("refusing to remove {:?}", path.display().to_string());
    }
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).wrap_err_with(|| format!("remove {}", path.display())),
    }
}
