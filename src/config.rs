use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "recall")]
#[command(about = "Collects reading highlights and samples a few for the daily report", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Extract, import and merge as configured, then write the daily report
    Run,
    /// Print a random sample of the final store as JSON
    Sample {
        #[arg(short = 'n', long)]
        count: Option<usize>,
        #[arg(short, long)]
        pretty: bool,
    },
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".recall")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Sources {
    pub use_kobo: bool,
    pub use_manual: bool,
}

impl Default for Sources {
    fn default() -> Self {
        Sources {
            use_kobo: true,
            use_manual: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Paths {
    pub kobo_db: PathBuf,
    pub manual_quotes: PathBuf,
    pub extracted_db: PathBuf,
    pub extracted_text: PathBuf,
    pub manual_db: PathBuf,
    pub merged_db: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            kobo_db: PathBuf::from("KoboReader.sqlite"),
            manual_quotes: PathBuf::from("manual_quotes.csv"),
            extracted_db: PathBuf::from("extracted_highlights.db"),
            extracted_text: PathBuf::from("extracted_highlights.txt"),
            manual_db: PathBuf::from("manual_quotes.db"),
            merged_db: PathBuf::from("merged_highlights.db"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Report {
    pub sample_count: usize,
    pub output: PathBuf,
}

impl Default for Report {
    fn default() -> Self {
        Report {
            sample_count: 4,
            output: PathBuf::from("recall_daily.html"),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub sources: Sources,
    pub paths: Paths,
    pub report: Report,
}

impl Config {
    /// Loads the YAML file at `path`. Relative paths inside it are taken
    /// relative to the file's directory.
    pub fn new(path: &Path) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(cfg.resolve_paths(base_dir))
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn load_config(path: &Path) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Config::from_yaml(&yaml_str)
    }

    pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base_dir.join(&*p);
            }
        };

        resolve(&mut self.paths.kobo_db);
        resolve(&mut self.paths.manual_quotes);
        resolve(&mut self.paths.extracted_db);
        resolve(&mut self.paths.extracted_text);
        resolve(&mut self.paths.manual_db);
        resolve(&mut self.paths.merged_db);
        resolve(&mut self.report.output);
        self
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        tracing::warn!("environment variable '{}' not found", var_name);
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}
