use clap::{Parser, Subcommand};
use flags::{Feature, Gate};

#[derive(Parser, Debug)]
#[command(
    name = "flagctl",
    version,
    about = "Inspect and change feature flags held by a remote store"
)]
pub struct Cli {
    /// Base URL the feature-flag API is mounted under
    #[arg(long, env = "FLAGS_API_MOUNT")]
    pub mount: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List every feature key
    List,
    /// Show the value of every gate of a feature
    Get {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
    },
    /// Register a feature
    Add {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
    },
    /// Remove a feature and its gate values
    Remove {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
    },
    /// Clear every gate of a feature
    Clear {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
    },
    /// Enable a gate for a value (actor id, group name, percentage)
    Enable {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
        #[arg(value_parser = parse_gate)]
        gate: Gate,
        /// Defaults to `true` for the boolean gate
        value: Option<String>,
    },
    /// Disable a gate for a value
    Disable {
        #[arg(value_parser = parse_feature)]
        feature: Feature,
        #[arg(value_parser = parse_gate)]
        gate: Gate,
        value: Option<String>,
    },
}

fn parse_feature(s: &str) -> Result<Feature, String> {
    Feature::new(s).ok_or_else(|| "feature key must not be empty".to_string())
}

fn parse_gate(s: &str) -> Result<Gate, String> {
    Gate::new(s).ok_or_else(|| "gate must not be empty".to_string())
}
