use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use serde::Deserialize;

use bamstats_collectors::DEFAULT_COVERAGE_SKIP;
use bamstats_io::STDIN_PATH;

pub const DEFAULT_UPDATE_RATE: u64 = 1000;
pub const DEFAULT_INTERVAL_TOLERANCE_MS: u64 = 100;

///
/// Everything a run needs to know. Loaded from an optional TOML file, then overridden by
/// whichever flags were given on the command line.
///
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StatsConfig {
    pub input: String,
    pub update_rate: u64,
    pub first_update: Option<u64>,
    pub coverage_skip: u32,
    pub regions: Option<String>,
    pub regions_file: Option<PathBuf>,
    pub map_start: i64,
    pub map_length: u64,
    pub target_interval_ms: Option<u64>,
    pub interval_tolerance_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        StatsConfig {
            input: STDIN_PATH.to_string(),
            update_rate: DEFAULT_UPDATE_RATE,
            first_update: None,
            coverage_skip: DEFAULT_COVERAGE_SKIP,
            regions: None,
            regions_file: None,
            map_start: 0,
            map_length: 0,
            target_interval_ms: None,
            interval_tolerance_ms: DEFAULT_INTERVAL_TOLERANCE_MS,
        }
    }
}

impl TryFrom<&Path> for StatsConfig {
    type Error = anyhow::Error;

    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&toml_str)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}

impl StatsConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => StatsConfig::try_from(path.as_path())?,
            None => StatsConfig::default(),
        };

        config.apply_matches(matches);
        config.validate()?;

        Ok(config)
    }

    fn apply_matches(&mut self, matches: &ArgMatches) {
        if let Some(file) = matches.get_one::<String>("file") {
            self.input = file.clone();
        }
        if let Some(rate) = matches.get_one::<u64>("update-rate") {
            self.update_rate = *rate;
        }
        if let Some(first) = matches.get_one::<u64>("first-update") {
            self.first_update = Some(*first);
        }
        if let Some(skip) = matches.get_one::<u32>("coverage-skip") {
            self.coverage_skip = *skip;
        }

        // one region source on the command line replaces either source from the file
        if let Some(payload) = matches.get_one::<String>("regions") {
            self.regions = Some(payload.clone());
            self.regions_file = None;
        }
        if let Some(path) = matches.get_one::<PathBuf>("regions-file") {
            self.regions = None;
            self.regions_file = Some(path.clone());
        }

        if let Some(start) = matches.get_one::<i64>("region-start") {
            self.map_start = *start;
        }
        if let Some(length) = matches.get_one::<u64>("region-length") {
            self.map_length = *length;
        }
        if let Some(target) = matches.get_one::<u64>("target-interval-ms") {
            self.target_interval_ms = Some(*target);
        }
        if let Some(tolerance) = matches.get_one::<u64>("interval-tolerance-ms") {
            self.interval_tolerance_ms = *tolerance;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.update_rate == 0 {
            bail!("update_rate must be at least 1");
        }
        if self.first_update == Some(0) {
            bail!("first_update must be at least 1");
        }
        if self.regions.is_some() && self.regions_file.is_some() {
            bail!("regions and regions_file are mutually exclusive");
        }
        Ok(())
    }
}
