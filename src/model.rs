use ratatui::crossterm::event::KeyEvent;
use tracing::{debug, info, trace};

use crate::domain::{HELP_TEXT, Message, TVConfig, TVError};
use crate::inputter::{InputResult, Inputter};
use crate::table::Table;

pub const SORT_ASCENDING: &str = " ▲";
pub const SORT_DESCENDING: &str = " ▼";

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
    CMDINPUT,
}

/// Checkbox entry of the column toggle list.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnToggle {
    pub label: String,
    pub visible: bool,
    pub sortable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub name: String,
    pub width: usize,
    pub data: Vec<String>,
}

/// Everything the UI needs to render one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UIData {
    pub name: String,
    pub table: Vec<ColumnView>,
    pub toggles: Vec<ColumnToggle>,
    pub selected_column: usize,
    pub search: InputResult,
    pub active_cmdinput: bool,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub nrows: usize, // Rows matching the search
    pub total_rows: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
}

pub struct Model<R> {
    config: TVConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    table: Table<R>,
    curser_column: usize, // Index into all columns, hidden ones included
    input: Inputter,
    last_input: InputResult,
    status_message: String,
}

impl<R> Model<R> {
    pub fn init(config: &TVConfig, mut table: Table<R>) -> Result<Self, TVError> {
        table.apply_options(
            config.search.as_deref(),
            config.sort.as_deref(),
            config.descending,
            &config.hidden,
            config.page_size,
        )?;
        info!(
            "Showing {} records in {} columns",
            table.len(),
            table.columns().len()
        );

        let mut input = Inputter::default();
        input.set(&table.state().search_text);
        let last_input = input.get();

        Ok(Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            table,
            curser_column: 0,
            input,
            last_input,
            status_message: "Press ? for help".to_string(),
        })
    }

    pub fn table(&self) -> &Table<R> {
        &self.table
    }

    /// If true, key events are passed through as [`Message::RawKey`].
    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::CMDINPUT
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), TVError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);

        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::Help => self.show_help(),
                Message::Search => self.enter_cmd_mode(),
                Message::MoveLeft => self.move_column_selection_left(),
                Message::MoveRight => self.move_column_selection_right(),
                Message::ToggleColumnState => self.toggle_column(),
                Message::SortColumn => self.sort_column(),
                Message::MoveBeginning => {
                    self.table.first_page();
                    self.set_page_status_message();
                }
                Message::MovePageUp => {
                    if self.table.previous_page() {
                        self.set_page_status_message();
                    } else {
                        self.set_status_message("Already on the first page");
                    }
                }
                Message::MovePageDown => {
                    if self.table.next_page() {
                        self.set_page_status_message();
                    } else {
                        self.set_status_message("Already on the last page");
                    }
                }
                Message::MoveEnd => {
                    self.table.last_page();
                    self.set_page_status_message();
                }
                Message::CyclePageSize => {
                    let size = self.table.state().page_size.next();
                    self.table.set_page_size(size);
                    self.set_status_message(format!("Showing {size} records per page"));
                }
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.exit(),
                _ => (),
            },
            Modus::CMDINPUT => {
                if let Message::RawKey(key) = msg {
                    self.raw_input(key)
                }
            }
        }
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    fn exit(&mut self) {
        match self.modus {
            Modus::POPUP => {
                trace!("Close popup ...");
                self.modus = self.previous_modus;
                self.previous_modus = Modus::POPUP;
            }
            Modus::TABLE | Modus::CMDINPUT => {}
        }
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
    }

    fn enter_cmd_mode(&mut self) {
        trace!("Entering search mode ...");
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.input.set(&self.table.state().search_text);
        self.last_input = self.input.get();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        self.last_input = self.input.read(key);
        // Filter while typing, escape drops the search.
        self.table.set_search(&self.last_input.input);

        if self.last_input.finished {
            self.modus = self.previous_modus;
            self.previous_modus = Modus::CMDINPUT;
            if self.last_input.canceled {
                self.set_status_message("Search cleared");
            } else {
                let found = self.table.filtered_rows().len();
                self.set_status_message(format!("Found {found} records"));
            }
        }
    }

    fn move_column_selection_left(&mut self) {
        self.curser_column = self.curser_column.saturating_sub(1);
    }

    fn move_column_selection_right(&mut self) {
        let ncolumns = self.table.columns().len();
        if self.curser_column + 1 < ncolumns {
            self.curser_column += 1;
        }
    }

    fn selected_field(&self) -> Option<&'static str> {
        self.table.columns().get(self.curser_column).map(|c| c.field)
    }

    fn toggle_column(&mut self) {
        if let Some(field) = self.selected_field() {
            self.table.toggle_column(field);
            let state = if self.table.is_hidden(field) { "hidden" } else { "visible" };
            self.set_status_message(format!("Column {field} is {state}"));
        }
    }

    fn sort_column(&mut self) {
        let Some(field) = self.selected_field() else {
            return;
        };
        if self.table.request_sort(field) {
            let direction = match self.table.state().sort.as_ref() {
                Some(spec) if spec.descending => "descending",
                _ => "ascending",
            };
            self.set_status_message(format!("Sorted by {field} {direction}"));
        } else {
            self.set_status_message(format!("Column {field} can not be sorted"));
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        debug!("Status: {}", self.status_message);
    }

    fn set_page_status_message(&mut self) {
        let message = format!(
            "Page {} of {}",
            self.table.page_index() + 1,
            self.table.page_count()
        );
        self.set_status_message(message);
    }

    // ------------------------- Render data ---------------------------- //

    fn get_visible_name(name: &str, width: usize) -> String {
        if width < 3 {
            return String::new();
        }
        if name.chars().count() > width {
            let mut reduced_name: String = name.chars().take(width - 3).collect();
            reduced_name.push_str("...");
            reduced_name
        } else {
            name.to_string()
        }
    }

    /// Builds the render snapshot from scratch.
    pub fn uidata(&self) -> UIData {
        let table = &self.table;
        let page = table.page();
        let sort = table.state().sort.as_ref();
        let max_width = self.config.max_column_width;

        let columns = table
            .visible_columns()
            .into_iter()
            .map(|column| {
                let indicator = match sort {
                    Some(spec) if column.sortable && spec.field == column.field => {
                        if spec.descending { SORT_DESCENDING } else { SORT_ASCENDING }
                    }
                    _ => "",
                };
                let name = format!("{}{}", column.label, indicator);
                let data: Vec<String> = page
                    .rows
                    .iter()
                    .filter_map(|&ridx| table.record(ridx))
                    .map(|record| Self::get_visible_name(&column.display(record), max_width))
                    .collect();
                let width = data
                    .iter()
                    .map(|s| s.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0);
                ColumnView { name, width, data }
            })
            .collect();

        let toggles = table
            .columns()
            .iter()
            .map(|c| ColumnToggle {
                label: c.label.to_string(),
                visible: !table.is_hidden(c.field),
                sortable: c.sortable,
            })
            .collect();

        UIData {
            name: "Users".to_string(),
            table: columns,
            toggles,
            selected_column: self.curser_column,
            search: if self.modus == Modus::CMDINPUT {
                self.last_input.clone()
            } else {
                InputResult {
                    input: table.state().search_text.clone(),
                    ..InputResult::default()
                }
            },
            active_cmdinput: self.modus == Modus::CMDINPUT,
            page_index: page.page_index,
            page_count: page.page_count,
            page_size: table.state().page_size.get(),
            nrows: page.total,
            total_rows: table.len(),
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            show_popup: self.modus == Modus::POPUP,
            popup_message: HELP_TEXT.to_string(),
            status_message: self.status_message.clone(),
        }
    }
}
