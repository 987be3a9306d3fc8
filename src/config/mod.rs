pub mod toml_config;

pub use toml_config::FortuneConfig;

#[cfg(feature = "cli")]
use crate::domain::model::Gender;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fortune")]
#[command(about = "Ask an LLM for a saju or daily fortune reading")]
pub struct CliConfig {
    /// Path to a TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Birth date in YYYY-MM-DD form
    #[arg(long)]
    pub birth_date: String,

    /// Birth time in HH:mm form; omit when unknown
    #[arg(long)]
    pub birth_time: Option<String>,

    /// MALE or FEMALE
    #[arg(long)]
    pub gender: Gender,

    /// SAJU, DAILY or TAROT
    #[arg(long, default_value = "SAJU")]
    pub fortune_type: String,

    /// Echo the birth info in the response, overriding the config file
    #[arg(long)]
    pub extended: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}
