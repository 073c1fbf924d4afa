//! Command-line interface definitions.
//!
//! `serve` runs the line-delimited JSON listener, `migrate` brings the
//! database schema up to date, and `report` materializes one report and
//! prints it as JSON.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::id::RestaurantNumber;
use crate::domain::period::{MonthYear, QuarterPeriod};
use crate::domain::report::ReportKey;
use crate::error::Result;

/// Order commit and report service
#[derive(Parser, Debug)]
#[command(name = "orderdesk")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve requests over TCP until interrupted
    Serve(ConfigPathArg),

    /// Apply pending database migrations
    Migrate(ConfigPathArg),

    /// Materialize one report and print it as JSON
    Report(ReportArgs),
}

/// Shared argument for commands that only need a configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigPathArg {
    /// Path to the configuration file; defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for `orderdesk report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Discard any cached row and recompute.
    #[arg(long)]
    pub refresh: bool,

    #[command(subcommand)]
    pub kind: ReportCommand,
}

/// Report kinds and their keys.
#[derive(Subcommand, Debug, Clone)]
pub enum ReportCommand {
    /// Category quantities for one district, restaurant and month
    OrderMix {
        #[arg(long)]
        district: String,
        #[arg(long)]
        restaurant: RestaurantNumber,
        /// Month as M/YYYY
        #[arg(long)]
        month: String,
    },
    /// Weekly income for one restaurant, month and district
    Income {
        #[arg(long)]
        restaurant: RestaurantNumber,
        #[arg(long)]
        month: String,
        #[arg(long)]
        district: String,
    },
    /// Weekly on-time percentage for one district and month
    Performance {
        #[arg(long)]
        district: String,
        #[arg(long)]
        month: String,
    },
    /// Distribution of daily order counts over a quarter
    QuarterDistribution {
        #[arg(long)]
        restaurant: RestaurantNumber,
        /// Quarter as Qn/YYYY
        #[arg(long)]
        quarter: String,
    },
    /// Total and weekly income over a quarter
    QuarterIncome {
        #[arg(long)]
        restaurant: RestaurantNumber,
        #[arg(long)]
        quarter: String,
    },
}

impl ReportCommand {
    /// Build the report key, validating the period.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidPeriod`](crate::domain::error::DomainError::InvalidPeriod)
    /// for a malformed month or quarter.
    pub fn key(&self) -> Result<ReportKey> {
        Ok(match self.clone() {
            Self::OrderMix {
                district,
                restaurant,
                month,
            } => ReportKey::OrderMix {
                district,
                restaurant,
                period: month.parse::<MonthYear>()?,
            },
            Self::Income {
                restaurant,
                month,
                district,
            } => ReportKey::Income {
                restaurant,
                period: month.parse::<MonthYear>()?,
                district,
            },
            Self::Performance { district, month } => ReportKey::Performance {
                district,
                period: month.parse::<MonthYear>()?,
            },
            Self::QuarterDistribution {
                restaurant,
                quarter,
            } => ReportKey::QuarterDistribution {
                restaurant,
                period: quarter.parse::<QuarterPeriod>()?,
            },
            Self::QuarterIncome {
                restaurant,
                quarter,
            } => ReportKey::QuarterIncome {
                restaurant,
                period: quarter.parse::<QuarterPeriod>()?,
            },
        })
    }
}
