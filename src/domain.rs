use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;

/// Page sizes the user can choose from.
pub const PAGE_SIZES: [usize; 3] = [5, 10, 20];

/// The search box only ever matches against this field.
pub const SEARCHABLE_FIELD: &str = "name";

pub const HELP_TEXT: &str = "\
q           Quit
?           Show this help
Esc         Close popup / clear search
/           Search by name
Left/h      Focus previous column
Right/l     Focus next column
Space/x     Show/hide focused column
Enter/s     Sort by focused column
Home/g      First page
PageUp/p    Previous page
PageDown/n  Next page
End/G       Last page
z           Change page size";

#[derive(Debug)]
pub enum TVError {
    IoError(Error),
    LoggingFailed(String),
    UnknownColumn(String),
    UnsortableColumn(String),
    InvalidPageSize(usize),
}

impl fmt::Display for TVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TVError::IoError(e) => write!(f, "io error: {e}"),
            TVError::LoggingFailed(msg) => write!(f, "failed to set up logging: {msg}"),
            TVError::UnknownColumn(field) => write!(f, "unknown column \"{field}\""),
            TVError::UnsortableColumn(field) => write!(f, "column \"{field}\" can not be sorted"),
            TVError::InvalidPageSize(size) => {
                write!(f, "invalid page size {size}, allowed are {PAGE_SIZES:?}")
            }
        }
    }
}

impl std::error::Error for TVError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TVError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for TVError {
    fn from(err: Error) -> Self {
        TVError::IoError(err)
    }
}

/// Number of records shown per page. Only values from [`PAGE_SIZES`] can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    pub fn get(self) -> usize {
        self.0
    }

    /// The following allowed size, wrapping around after the largest one.
    pub fn next(self) -> Self {
        let pos = PAGE_SIZES.iter().position(|&s| s == self.0).unwrap_or(0);
        PageSize(PAGE_SIZES[(pos + 1) % PAGE_SIZES.len()])
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(PAGE_SIZES[0])
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TVError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        if PAGE_SIZES.contains(&size) {
            Ok(PageSize(size))
        } else {
            Err(TVError::InvalidPageSize(size))
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TVConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
    pub page_size: PageSize,
    #[setters(strip_option, into)]
    pub search: Option<String>,
    #[setters(strip_option, into)]
    pub sort: Option<String>,
    pub descending: bool,
    pub hidden: Vec<String>,
    #[setters(strip_option)]
    pub log_file: Option<PathBuf>,
    #[setters(into)]
    pub log_level: String,
    pub print: bool,
}

impl Default for TVConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            max_column_width: 40,
            page_size: PageSize::default(),
            search: None,
            sort: None,
            descending: false,
            hidden: Vec::new(),
            log_file: None,
            log_level: "info".to_string(),
            print: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Help,
    Exit,
    Search,
    MoveLeft,
    MoveRight,
    ToggleColumnState,
    SortColumn,
    MoveBeginning,
    MovePageUp,
    MovePageDown,
    MoveEnd,
    CyclePageSize,
    RawKey(KeyEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_only_accepts_allowed_values() {
        assert_eq!(PageSize::try_from(10).unwrap().get(), 10);
        assert!(matches!(
            PageSize::try_from(7),
            Err(TVError::InvalidPageSize(7))
        ));
        assert_eq!(PageSize::default().get(), 5);
    }

    #[test]
    fn page_size_cycles() {
        let size = PageSize::default();
        assert_eq!(size.next().get(), 10);
        assert_eq!(size.next().next().get(), 20);
        assert_eq!(size.next().next().next(), size);
    }

    #[test]
    fn config_setters() {
        let cfg = TVConfig::default()
            .with_search("ma")
            .with_descending(true)
            .with_event_poll_time(50);
        assert_eq!(cfg.search.as_deref(), Some("ma"));
        assert!(cfg.descending);
        assert_eq!(cfg.event_poll_time, 50);
        assert_eq!(cfg.sort, None);
    }
}
