use std::path::PathBuf;

use clap::Parser;

use crate::domain::{PAGE_SIZES, PageSize, TVConfig, TVError};

#[derive(Debug, Parser)]
#[command(version, about = "Browse the user table with search, column toggles, sorting and pagination")]
pub struct Args {
    /// Records per page (5, 10 or 20)
    #[arg(short = 's', long, default_value_t = 5, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Initial search on the name column
    #[arg(short = 'f', long)]
    pub search: Option<String>,

    /// Column to sort by
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long, requires = "sort")]
    pub descending: bool,

    /// Columns to hide
    #[arg(long, value_name = "FIELD", num_args = 1..)]
    pub hide: Vec<String>,

    /// Cells longer than this are cut
    #[arg(long, default_value_t = 40)]
    pub max_column_width: usize,

    /// Event poll time in ms
    #[arg(long = "poll", default_value_t = 100)]
    pub event_poll_time: u64,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<String>,

    /// Log filter used when TABVIEW_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print the current page and exit
    #[arg(long)]
    pub print: bool,
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("{e}"))?;
    if PAGE_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(format!("must be one of {PAGE_SIZES:?}"))
    }
}

fn expand_path(path: &str) -> Result<PathBuf, TVError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| TVError::LoggingFailed(format!("can not expand {path}: {e}")))
}

impl TryFrom<Args> for TVConfig {
    type Error = TVError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mut cfg = TVConfig::default()
            .with_page_size(PageSize::try_from(args.page_size)?)
            .with_descending(args.descending)
            .with_hidden(args.hide)
            .with_max_column_width(args.max_column_width)
            .with_event_poll_time(args.event_poll_time)
            .with_log_level(args.log_level)
            .with_print(args.print);
        if let Some(search) = args.search {
            cfg = cfg.with_search(search);
        }
        if let Some(sort) = args.sort {
            cfg = cfg.with_sort(sort);
        }
        if let Some(path) = args.log_file {
            cfg = cfg.with_log_file(expand_path(&path)?);
        }
        Ok(cfg)
    }
}
