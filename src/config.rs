use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::{
    domain::{DEFAULT_GRADUATION_YEAR, GRADUATION_YEAR_OPTIONS},
    state::DirectoryInit,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "roster",
    about = "Student directory roster service",
    version = crate::version::VERSION,
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: Config,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the roster HTTP server (default).
    Run,

    /// Print the initial roster as JSON and exit.
    Roster,
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    #[arg(
        long,
        global = true,
        env = "ROSTER_BIND",
        value_name = "ADDR",
        default_value = "127.0.0.1:62480"
    )]
    pub bind: SocketAddr,

    #[arg(
        long,
        global = true,
        env = "ROSTER_SEED",
        value_name = "BOOL",
        default_value_t = true,
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub seed: bool,

    #[arg(
        long = "default-graduation-year",
        global = true,
        env = "ROSTER_DEFAULT_GRADUATION_YEAR",
        value_name = "YEAR",
        default_value_t = DEFAULT_GRADUATION_YEAR
    )]
    pub default_graduation_year: i32,

    /// Years offered to the entry form. Not enforced on submit.
    #[arg(
        long = "graduation-years",
        global = true,
        env = "ROSTER_GRADUATION_YEARS",
        value_name = "YEARS",
        value_delimiter = ',',
        default_values_t = GRADUATION_YEAR_OPTIONS
    )]
    pub graduation_years: Vec<i32>,
}

impl Config {
    pub fn directory_init(&self) -> DirectoryInit {
        DirectoryInit {
            seed: self.seed,
            default_graduation_year: self.default_graduation_year,
        }
    }
}
