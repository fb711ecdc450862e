// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{info, warn};

use crate::api::HttpService;
use crate::assembler::SearchResult;
use crate::config::{find_config, FetchConfig};
use crate::driver::JobDriver;
use crate::errors::MsaFetchError;
use crate::job::SearchOptions;
use crate::retry::SystemClock;
use crate::search::run_search;
use crate::seq::fasta::read_fasta_file;
use crate::seq::file::sequences;
use crate::shutdown::install_interrupt_handler;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
struct Cli {
    /// Query sequences (FastA)
    fasta_fname: String,

    /// Output directory (also holds the downloaded archive and extracted files)
    #[arg(short, long = "out-dir")]
    out_dir: PathBuf,

    /// Do not search the environmental databases
    #[arg(long = "no-env")]
    no_env: bool,

    /// Do not filter the alignment
    #[arg(long = "no-filter")]
    no_filter: bool,

    /// Also fetch template structures
    #[arg(short = 'T', long)]
    templates: bool,

    /// Paired alignment (disables env databases and templates)
    #[arg(short, long)]
    pairing: bool,

    /// Configuration file (default: ~/.msafetchconfig or ./.msafetchconfig)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// MSA server URL
    #[arg(long)]
    host: Option<String>,

    /// Template server URL
    #[arg(long = "template-host")]
    template_host: Option<String>,

    /// Give up after this many rate-limited submissions
    #[arg(long = "max-submit-attempts")]
    max_submit_attempts: Option<u32>,

    /// Give up after waiting this long for the server [s]
    #[arg(long = "max-wait")]
    max_wait: Option<u64>,
}

impl Cli {
    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            use_env: !self.no_env,
            use_filter: !self.no_filter,
            use_templates: self.templates,
            use_pairing: self.pairing,
        }
    }

    fn apply_overrides(&self, config: &mut FetchConfig) {
        if let Some(host) = &self.host {
            config.host_url = host.clone();
        }
        if let Some(host) = &self.template_host {
            config.template_host_url = host.clone();
        }
        if let Some(n) = self.max_submit_attempts {
            config.retry.max_submit_attempts = Some(n);
        }
        if let Some(secs) = self.max_wait {
            config.retry.max_elapsed_secs = Some(secs);
        }
    }
}

// An explicitly named config must be readable; a discovered one only produces a warning.
fn load_config(
    explicit: Option<&Path>,
    discovered: Option<PathBuf>,
) -> Result<FetchConfig, MsaFetchError> {
    if let Some(path) = explicit {
        return FetchConfig::from_file(path);
    }
    match discovered {
        Some(path) => match FetchConfig::from_file(&path) {
            Ok(cfg) => {
                info!("Using config {}", path.display());
                Ok(cfg)
            }
            Err(e) => {
                warn!("Error reading {}: {}; using defaults", path.display(), e);
                Ok(FetchConfig::default())
            }
        },
        None => Ok(FetchConfig::default()),
    }
}

/// Writes `query_<n>.a3m` (1-based, input order) for each alignment; returns the paths.
fn write_results(out_dir: &Path, result: &SearchResult) -> Result<Vec<PathBuf>, MsaFetchError> {
    let mut written = Vec::with_capacity(result.a3m_lines.len());
    for (i, text) in result.a3m_lines.iter().enumerate() {
        let path = out_dir.join(format!("query_{}.a3m", i + 1));
        fs::write(&path, text)?;
        written.push(path);
    }
    Ok(written)
}

pub fn run() -> Result<(), MsaFetchError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref(), find_config())?;
    cli.apply_overrides(&mut config);

    let records = read_fasta_file(&cli.fasta_fname)?;
    let service = HttpService::new(&config)?;
    let clock = SystemClock;
    let mut driver = JobDriver::new(&service, &clock).with_policy(config.retry_policy());
    install_interrupt_handler(driver.cancel_token())?;

    let result = run_search(
        &sequences(&records),
        &cli.out_dir,
        &cli.search_options(),
        &mut driver,
        &service,
    )?;

    let written = write_results(&cli.out_dir, &result)?;
    for (record, path) in records.iter().zip(written.iter()) {
        println!("{}\t{}", record.header, path.display());
    }
    if let Some(paths) = &result.template_paths {
        for (record, tmpl) in records.iter().zip(paths.iter()) {
            match tmpl {
                Some(dir) => println!("{}\ttemplates\t{}", record.header, dir.display()),
                None => println!("{}\ttemplates\t-", record.header),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["msafetch", "q.fas", "-o", "out"]).unwrap();
        assert_eq!(cli.search_options(), SearchOptions::default());
        assert_eq!(cli.out_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "msafetch",
            "q.fas",
            "--out-dir",
            "out",
            "--no-env",
            "--host",
            "http://localhost:8000",
            "--max-wait",
            "600",
        ])
        .unwrap();
        assert!(!cli.search_options().use_env);
        let mut config = FetchConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.host_url, "http://localhost:8000");
        assert_eq!(config.retry.max_elapsed_secs, Some(600));
        assert_eq!(config.retry.max_submit_attempts, None);
    }

    #[test]
    fn test_out_dir_required() {
        assert!(Cli::try_parse_from(["msafetch", "q.fas"]).is_err());
    }

    #[test]
    fn test_explicit_config_must_be_readable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_config(Some(&missing), None).is_err());

        let malformed = dir.path().join("bad.json");
        fs::write(&malformed, "{ not json").unwrap();
        assert!(matches!(
            load_config(Some(&malformed), None),
            Err(MsaFetchError::Format(_))
        ));
    }

    #[test]
    fn test_discovered_malformed_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".msafetchconfig");
        fs::write(&path, r#"{"retry": {"max_delay_secs": 0}}"#).unwrap();
        assert_eq!(load_config(None, Some(path)).unwrap(), FetchConfig::default());
    }

    #[test]
    fn test_discovered_config_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".msafetchconfig");
        fs::write(&path, r#"{"host_url": "http://localhost:9000"}"#).unwrap();
        let config = load_config(None, Some(path)).unwrap();
        assert_eq!(config.host_url, "http://localhost:9000");
    }

    #[test]
    fn test_no_config_gives_defaults() {
        assert_eq!(load_config(None, None).unwrap(), FetchConfig::default());
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let result = SearchResult {
            a3m_lines: vec![String::from(">101\nAAA\n"), String::from(">101\nAAA\n")],
            template_paths: None,
        };
        let written = write_results(dir.path(), &result).unwrap();
        assert_eq!(written[1], dir.path().join("query_2.a3m"));
        assert_eq!(fs::read_to_string(&written[1]).unwrap(), ">101\nAAA\n");
    }
}
