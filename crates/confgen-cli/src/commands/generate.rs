use crate::cli::GenerateArgs;
use crate::config::PartialGenerationConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use confgen::{
    core::io::{sdf::SdfFile, traits::MolecularFile},
    core::models::molecule::Molecule,
    engine::progress::ProgressReporter,
    workflows::{self, generate::GenerationSummary},
};
use serde::Serialize;
use std::path::Path;
use tracing::info;

const REPORT_HEADER: [&str; 5] = [
    "conformer",
    "energy",
    "initial_energy",
    "iterations",
    "converged",
];

#[derive(Debug, Serialize, PartialEq)]
struct ReportRow {
    conformer: u32,
    energy: Option<f64>,
    initial_energy: Option<f64>,
    iterations: Option<usize>,
    converged: Option<bool>,
}

pub fn run(args: GenerateArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialGenerationConfig::load(&args)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    info!("Loading input molecule from {:?}", &args.input);
    let mut molecule =
        SdfFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;
    if molecule.name().trim().is_empty() {
        if let Some(stem) = args.input.file_stem().and_then(|s| s.to_str()) {
            molecule.set_name(stem);
        }
    }

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the conformer generation workflow...");
    let summary = workflows::generate::run(&mut molecule, &config, &reporter).inspect_err(|_| {
        progress_handler.abandon();
    })?;

    info!("Writing {} conformer(s) to {:?}", summary.conformer_count(), &args.output);
    let written =
        SdfFile::write_to_path(&molecule, &args.output).map_err(|e| CliError::FileWriting {
            path: args.output.clone(),
            source: e.into(),
        })?;

    if let Some(report_path) = &args.report {
        info!("Writing energy report to {:?}", report_path);
        write_report(report_path, &report_rows(&molecule, &summary))?;
    }

    println!(
        "Generated {} conformers in {}",
        written,
        args.output.display()
    );
    Ok(())
}

fn report_rows(molecule: &Molecule, summary: &GenerationSummary) -> Vec<ReportRow> {
    molecule
        .conformers()
        .map(|conformer| {
            let outcome = summary
                .optimization
                .iter()
                .find(|o| o.id == conformer.id());
            ReportRow {
                conformer: conformer.id().0,
                energy: conformer.energy(),
                initial_energy: outcome.map(|o| o.initial_energy),
                iterations: outcome.map(|o| o.iterations),
                converged: outcome.map(|o| o.converged),
            }
        })
        .collect()
}

fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
