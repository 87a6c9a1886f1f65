use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "cath-scan - Fast structural comparison of protein backbones by residue-pair scanning.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for scanning.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan query structures against match structures and print the score matrix as CSV.
    Scan(ScanArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    // --- Inputs ---
    /// Backbone CSV files of the query structures.
    #[arg(long = "query", required = true, num_args = 1.., value_name = "PATH")]
    pub queries: Vec<PathBuf>,

    /// Backbone CSV files of the match structures. Defaults to the query structures.
    #[arg(long = "match", num_args = 1.., value_name = "PATH")]
    pub matches: Vec<PathBuf>,

    /// Compare every query with every match instead of exactly one with one.
    #[arg(short = 'a', long)]
    pub all_vs_all: bool,

    /// Path to a scan configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Overrides ---
    /// Override the match criteria, e.g.
    /// 'dist_co=40,dirn_co=1,index_dist_co=-11,frame_ang_co=22.5,phi_ang_co=67.5,psi_ang_co=67.5'.
    #[arg(long, value_name = "CRITERIA")]
    pub criteria: Option<String>,

    /// Override the four strides: query-from, query-to, index-from, index-to.
    #[arg(long, value_name = "QF,QT,IF,IT", value_delimiter = ',', num_args = 4)]
    pub stride: Option<Vec<u32>>,

    /// Override the lattice store used by the index.
    #[arg(long, value_enum, value_name = "KIND")]
    pub store: Option<StoreArg>,

    // --- Output ---
    /// Write normalised scores instead of raw match counts.
    #[arg(long)]
    pub normalised: bool,

    /// Write the score matrix to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreArg {
    Sparse,
    Dense,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_args_parse_repeated_inputs_and_stride() {
        let cli = Cli::try_parse_from([
            "cath-scan",
            "-vv",
            "scan",
            "--query",
            "a.csv",
            "b.csv",
            "--match",
            "c.csv",
            "--stride",
            "1,2,3,4",
            "--store",
            "dense",
            "-a",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Scan(args) = cli.command;
        assert_eq!(args.queries, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(args.matches, vec![PathBuf::from("c.csv")]);
        assert_eq!(args.stride, Some(vec![1, 2, 3, 4]));
        assert_eq!(args.store, Some(StoreArg::Dense));
        assert!(args.all_vs_all);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["cath-scan", "-q", "-v", "scan", "--query", "a.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn stride_needs_four_values() {
        let result =
            Cli::try_parse_from(["cath-scan", "scan", "--query", "a.csv", "--stride", "1,2"]);
        assert!(result.is_err());
    }
}
