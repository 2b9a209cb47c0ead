mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use repo_snapshot::exchange::{
    list_bundle_heads, run_blocking, verify_bundle, ArchiveExporter, BundleExporter,
    BundleImporter, ExchangeConfig, VerboseProgress,
};
use repo_snapshot::model::ImportOutcome;
use repo_snapshot::repository::ObjectStore;
use repo_snapshot::util::format_size;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let repo = cli.repo.clone();
    let verbose = cli.verbose;
    let json = cli.json;

    match cli.command {
        Command::Archive {
            commit,
            output,
            tuning,
        } => {
            let mut config = ExchangeConfig::default();
            tuning.apply(&mut config);
            let target = output.clone();
            let files = run_blocking(repo, move |store| {
                let oid = store.resolve_revision(&commit)?;
                let progress = VerboseProgress::new(verbose);
                ArchiveExporter::new(store, &config)
                    .with_progress(&progress)
                    .export(oid, &target)
            })
            .await
            .context("Archive export failed")?;

            let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
            if json {
                print_json(&serde_json::json!({ "file_count": files, "output_file": output }))?;
            } else {
                println!("Wrote {} files to {} ({})", files, output.display(), format_size(size));
            }
        }
        Command::Bundle { commit, output } => {
            let result = run_blocking(repo, move |store| {
                let oid = store.resolve_revision(&commit)?;
                let config = ExchangeConfig::default();
                let progress = VerboseProgress::new(verbose);
                BundleExporter::new(store, &config)
                    .with_progress(&progress)
                    .export(oid, &output)
            })
            .await
            .context("Bundle export failed")?;

            if json {
                print_json(&result)?;
            } else {
                println!(
                    "Wrote {} ref(s) to {}",
                    result.included_refs_count,
                    result.output_file.display()
                );
            }
        }
        Command::Import { artifact, tuning } => {
            let mut config = ExchangeConfig::default();
            tuning.apply(&mut config);
            let outcome = run_blocking(repo, move |store| {
                BundleImporter::new(store, &config).import(&artifact)
            })
            .await
            .context("Bundle import failed")?;

            if json {
                print_json(&outcome)?;
            } else {
                println!("{}", describe_outcome(&outcome));
            }
        }
        Command::Verify { artifact } => {
            let verification = run_blocking(repo, move |store| verify_bundle(store, &artifact))
                .await
                .context("Bundle verification failed")?;

            if json {
                let missing: Vec<String> =
                    verification.missing.iter().map(|p| p.id.to_string()).collect();
                print_json(&serde_json::json!({
                    "complete": verification.is_complete(),
                    "refs": verification.header.refs,
                    "missing_prerequisites": missing,
                }))?;
            } else if verification.is_complete() {
                println!("Bundle is complete for this repository");
            } else {
                println!("Repository lacks {} prerequisite commit(s):", verification.missing.len());
                for prereq in &verification.missing {
                    println!("  {} {}", prereq.id, prereq.comment);
                }
            }
            if !verification.is_complete() {
                std::process::exit(1);
            }
        }
        Command::ListHeads { artifact } => {
            let heads = list_bundle_heads(&artifact)
                .with_context(|| format!("Could not read {}", artifact.display()))?;
            if json {
                print_json(&heads)?;
            } else {
                for head in heads {
                    println!("{} {}", head.target, head.name);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe_outcome(outcome: &ImportOutcome) -> String {
    let count = outcome.imported_count();
    match outcome {
        ImportOutcome::AppliedClean { branch, .. } => {
            format!("Imported {count} branch(es); checked out new branch '{branch}'")
        }
        ImportOutcome::AppliedDetached { branch, .. } => {
            format!("Imported {count} branch(es); detached HEAD at '{branch}'")
        }
        ImportOutcome::ImportedNotApplied { .. } => format!(
            "Imported {count} branch(es); working copy has changes, so nothing was checked out"
        ),
        ImportOutcome::NoBranchesFound => "Bundle contains no branches".to_string(),
    }
}
