//! A module for the command line interface of the demo binary.
//!
//! See [`Cli`] for more information.

use std::path::PathBuf;

use clap::builder::{PathBufValueParser, TypedValueParser};
use clap::{ArgAction, Subcommand};
pub use clap::{CommandFactory, Parser};

use crate::config::{Config, Validate};

/// [`clap`] command line interface.
///
/// The config file is parsed with [`toml`], then validated with [`Config::validate`].
///
/// # Example
///
/// ```no_run
/// use safebooru::cli::{Cli, Parser as _};
///
/// let cli = Cli::parse();
/// ```
#[non_exhaustive]
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// The config file to use, see `src/config/default.toml`.
    #[arg(long, global = true, value_name = "PATH")]
    #[arg(value_parser = PathBufValueParser::new().try_map(Self::parse_config_from_filepath))]
    pub config: Option<Config>,

    /// Increase the log level, can be repeated.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// The subcommand.
    #[command(subcommand)]
    pub action: Action,
}

/// What to do.
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Print the ID of a random post.
    Random,
    /// Print a post as JSON.
    Post {
        /// The post ID.
        id: u64,
    },
    /// Print the posts of a query as JSON.
    Posts {
        /// Tags separated by `+`.
        #[arg(long, default_value = "")]
        tags: String,
        /// How many posts to retrieve, at most 100.
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..=100))]
        limit: u64,
        /// The page number.
        #[arg(long, default_value_t = 0)]
        pid: u64,
    },
    /// Print the tags of a query as JSON.
    Tags {
        /// The exact tag name.
        name: Option<String>,
        /// How many tags to retrieve.
        #[arg(long, default_value_t = 100)]
        limit: u64,
    },
    /// Print the comments of a post as JSON.
    Comments {
        /// The post ID.
        #[arg(required_unless_present = "all")]
        post_id: Option<u64>,
        /// List the whole comment index instead.
        #[arg(long)]
        all: bool,
    },
    /// Download the image of a post.
    Download {
        /// The post ID.
        #[arg(long, conflicts_with_all = ["tags", "random"])]
        id: Option<u64>,
        /// Tags separated by `+`, the `--post-num`-th result is downloaded.
        #[arg(long, conflicts_with = "random")]
        tags: Option<String>,
        /// Download a random post.
        #[arg(long)]
        random: bool,
        /// The zero-based index of the post among the results.
        #[arg(long, default_value_t = 0)]
        post_num: usize,
        /// The file stem, default to the post ID.
        #[arg(long)]
        filename: Option<String>,
        /// An existing directory to write into.
        #[arg(long)]
        directory: Option<PathBuf>,
    },
}

impl Cli {
    #[inline]
    fn parse_config_from_filepath(path: PathBuf) -> anyhow::Result<Config> {
        let config = std::fs::read_to_string(path)?;
        let config = toml::from_str::<Config>(&config)?;
        config.validate()?;
        Ok(config)
    }
}
