use crate::cli::ScanArgs;
use crate::config::PartialScanConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use cathscan::{
    core::{io::backbone_csv::read_protein, models::protein::Protein},
    engine::{
        action::RecordScoresScanAction, cancel::CancellationToken, progress::ProgressReporter,
    },
    workflows::{all_vs_all, single_pair},
};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(args: ScanArgs, show_progress: bool) -> Result<()> {
    info!("Resolving scan policy from configuration and CLI arguments...");
    let policy = PartialScanConfig::load(&args)?.merge_with_cli(&args)?;

    let queries = load_proteins(&args.queries)?;
    let loaded_matches;
    let matches: &[Protein] = if args.matches.is_empty() {
        info!("No match structures given; scanning the query structures against themselves.");
        &queries
    } else {
        loaded_matches = load_proteins(&args.matches)?;
        &loaded_matches
    };

    let handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(handler.get_callback());
    let cancel = CancellationToken::new();

    let (scores, metrics) = if args.all_vs_all {
        info!("Invoking the all-vs-all scan workflow...");
        all_vs_all::run_with_policy(&policy, &queries, matches, &reporter, &cancel)?
    } else {
        info!("Invoking the single-pair scan workflow...");
        single_pair::run_with_policy(&policy, &queries, matches, &reporter, &cancel)?
    };
    info!(%metrics, "Scan finished.");

    if scores.total_matches() == 0.0 {
        warn!("Scan completed but found no matching residue pairs.");
    }

    let query_names: Vec<&str> = queries.iter().map(Protein::name).collect();
    let match_names: Vec<&str> = matches.iter().map(Protein::name).collect();

    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            write_score_matrix(file, &scores, &query_names, &match_names, args.normalised)?;
            eprintln!("✓ Score matrix written to: {}", path.display());
        }
        None => write_score_matrix(
            std::io::stdout().lock(),
            &scores,
            &query_names,
            &match_names,
            args.normalised,
        )?,
    }
    Ok(())
}

fn load_proteins(paths: &[PathBuf]) -> Result<Vec<Protein>> {
    paths
        .iter()
        .map(|path| {
            info!("Loading backbone from {:?}", path);
            read_protein(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })
        })
        .collect()
}

/// Writes one CSV row per query structure with one column per match structure.
pub fn write_score_matrix<W: Write>(
    writer: W,
    scores: &RecordScoresScanAction,
    query_names: &[&str],
    match_names: &[&str],
    normalised: bool,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(std::iter::once("query").chain(match_names.iter().copied()))?;

    for (query_index, query_name) in query_names.iter().enumerate() {
        let cells = (0..match_names.len()).map(|match_index| {
            let score = if normalised {
                scores.normalised_score(query_index, match_index)
            } else {
                scores.score(query_index, match_index)
            };
            score.to_string()
        });
        let mut record = vec![query_name.to_string()];
        record.extend(cells);
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use cathscan::engine::error::ScanError;
    use clap::Parser;
    use std::fmt::Write as _;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    /// An idealised α-helix: 100° and 1.5 Å per residue.
    fn write_helix_csv(path: &Path, num_residues: usize) {
        let point = |radius: f64, degrees: f64, z: f64| {
            let phase = degrees.to_radians();
            (radius * phase.cos(), radius * phase.sin(), z)
        };
        let mut out = String::from("residue,n_x,n_y,n_z,ca_x,ca_y,ca_z,c_x,c_y,c_z\n");
        for i in 0..num_residues {
            let turn = 100.0 * i as f64;
            let rise = 1.5 * i as f64;
            let n = point(1.55, turn - 28.0, rise - 0.95);
            let ca = point(2.30, turn, rise);
            let c = point(1.65, turn + 27.0, rise + 0.95);
            writeln!(
                out,
                "ALA{},{},{},{},{},{},{},{},{},{}",
                i + 1,
                n.0,
                n.1,
                n.2,
                ca.0,
                ca.1,
                ca.2,
                c.0,
                c.1,
                c.2
            )
            .unwrap();
        }
        fs::write(path, out).unwrap();
    }

    fn scan_args(argv: &[&str]) -> ScanArgs {
        let mut full = vec!["cath-scan", "scan"];
        full.extend_from_slice(argv);
        let Commands::Scan(args) = Cli::try_parse_from(full).unwrap().command;
        args
    }

    #[test]
    fn score_matrix_has_a_header_and_one_row_per_query() {
        let scores = RecordScoresScanAction::new(vec![30, 40], vec![50]);
        let mut buffer = Vec::new();
        write_score_matrix(&mut buffer, &scores, &["q1", "q2"], &["m1"], false).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "query,m1\nq1,0\nq2,0\n");

        let mut buffer = Vec::new();
        write_score_matrix(&mut buffer, &scores, &["q1", "q2"], &["m1"], true).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "query,m1\nq1,-15\nq2,-15\n");
    }

    #[test]
    fn all_vs_all_scan_writes_square_matrix_to_output_file() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        let output = dir.path().join("scores.csv");
        write_helix_csv(&first, 40);
        write_helix_csv(&second, 32);

        let args = scan_args(&[
            "--query",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "--all-vs-all",
            "--output",
            output.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["query", "first", "second"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "first");
        let self_score: f64 = rows[0][1].parse().unwrap();
        assert!(self_score > 0.0);
    }

    #[test]
    fn single_pair_mode_rejects_more_than_one_query() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        write_helix_csv(&first, 20);
        write_helix_csv(&second, 20);

        let args = scan_args(&[
            "--query",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "--match",
            first.to_str().unwrap(),
        ]);
        let result = run(args, false);
        assert!(matches!(
            result,
            Err(CliError::Scan(ScanError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn unreadable_structure_reports_the_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let args = scan_args(&["--query", missing.to_str().unwrap()]);
        match run(args, false) {
            Err(CliError::FileParsing { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected a file parsing error, got {other:?}"),
        }
    }
}
