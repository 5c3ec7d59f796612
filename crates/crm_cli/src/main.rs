//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `crm_core` linkage with deterministic output.
//! - Print dashboard and contact pipeline figures for the configured store.
//!
//! Config comes from `CRM_CONFIG_PATH`; an optional first argument
//! overrides the seed directory.

use crm_core::config::CoreConfig;
use crm_core::db::{open_db, Connection};
use crm_core::repo::seed::{load_collection, seeded_memory};
use crm_core::{
    Campaign, Contact, DashboardStats, Form, PipelineBoard, Record, RecordRepository,
    ResourceService, SqliteRecordRepository, StorageConfig, Workflow,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("crm_core ping={}", crm_core::ping());
    println!("crm_core version={}", crm_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut config = CoreConfig::from_env()?;
    if let Some(seed_dir) = std::env::args_os().nth(1) {
        config.seed_dir = Some(PathBuf::from(seed_dir));
    }
    config.init_logging()?;

    match config.storage.clone() {
        StorageConfig::Memory { .. } => report(
            &ResourceService::new(seeded_memory::<Contact>(&config)?),
            &ResourceService::new(seeded_memory::<Campaign>(&config)?),
            &ResourceService::new(seeded_memory::<Form>(&config)?),
            &ResourceService::new(seeded_memory::<Workflow>(&config)?),
        ),
        StorageConfig::Sqlite { path } => {
            let conn = open_db(&path)?;
            let contacts = ResourceService::new(sqlite_repo::<Contact>(&conn, &config)?);
            let campaigns = ResourceService::new(sqlite_repo::<Campaign>(&conn, &config)?);
            let forms = ResourceService::new(sqlite_repo::<Form>(&conn, &config)?);
            let workflows = ResourceService::new(sqlite_repo::<Workflow>(&conn, &config)?);
            report(&contacts, &campaigns, &forms, &workflows)
        }
    }
}

/// SQLite repository with seed files imported on top.
fn sqlite_repo<'conn, R: Record>(
    conn: &'conn Connection,
    config: &CoreConfig,
) -> Result<SqliteRecordRepository<'conn, R>, Box<dyn Error>> {
    let repo = SqliteRecordRepository::new(conn);
    if let Some(dir) = &config.seed_dir {
        repo.import_records(&load_collection::<R>(dir)?)?;
    }
    Ok(repo)
}

fn report<C, M, F, W>(
    contacts: &ResourceService<Contact, C>,
    campaigns: &ResourceService<Campaign, M>,
    forms: &ResourceService<Form, F>,
    workflows: &ResourceService<Workflow, W>,
) -> Result<(), Box<dyn Error>>
where
    C: RecordRepository<Contact>,
    M: RecordRepository<Campaign>,
    F: RecordRepository<Form>,
    W: RecordRepository<Workflow>,
{
    let stats = DashboardStats::load(contacts, campaigns, forms, workflows)?;
    println!("contacts={}", stats.total_contacts);
    println!("active_campaigns={}", stats.active_campaigns);
    println!("forms={}", stats.total_forms);
    println!("active_workflows={}", stats.active_workflows);
    println!("avg_conversion_rate={:.1}", stats.average_conversion_rate);
    println!("avg_open_rate={:.1}", stats.average_open_rate);

    let board = PipelineBoard::load(contacts)?;
    for column in board.columns() {
        println!("pipeline {:?}={}", column.stage, column.records.len());
    }
    info!(
        "event=cli_report module=cli status=ok contacts={}",
        stats.total_contacts
    );
    Ok(())
}
