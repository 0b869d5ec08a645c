use std::collections::HashSet;

use tracing::debug;

use crate::domain::{PageSize, TVError};
use crate::pipeline::{self, Page, SortSpec};
use crate::record::Column;

/// User controlled parameters of the display pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub search_text: String,
    pub hidden_fields: HashSet<String>,
    pub sort: Option<SortSpec>,
    pub page_index: usize,
    pub page_size: PageSize,
}

/// Fixed records and columns plus the view state that decides what is shown of them.
///
/// Filtered, sorted and paged rows are derived on every read, nothing is kept
/// between transitions.
pub struct Table<R> {
    columns: Vec<Column<R>>,
    data: Vec<R>,
    state: ViewState,
}

impl<R> Table<R> {
    pub fn new(columns: Vec<Column<R>>, data: Vec<R>) -> Self {
        Self {
            columns,
            data,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn record(&self, ridx: usize) -> Option<&R> {
        self.data.get(ridx)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn column(&self, field: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn is_hidden(&self, field: &str) -> bool {
        self.state.hidden_fields.contains(field)
    }

    pub fn visible_columns(&self) -> Vec<&Column<R>> {
        self.columns.iter().filter(|c| !self.is_hidden(c.field)).collect()
    }

    pub fn filtered_rows(&self) -> Vec<usize> {
        pipeline::filter_rows(&self.data, &self.columns, &self.state.search_text)
    }

    pub fn sorted_rows(&self) -> Vec<usize> {
        pipeline::sort_rows(
            &self.data,
            &self.columns,
            self.filtered_rows(),
            self.state.sort.as_ref(),
        )
    }

    pub fn page(&self) -> Page {
        pipeline::paginate(&self.sorted_rows(), self.state.page_index, self.state.page_size)
    }

    pub fn page_count(&self) -> usize {
        pipeline::page_count(self.filtered_rows().len(), self.state.page_size)
    }

    /// The page index in effect, clamped to the pages that exist.
    pub fn page_index(&self) -> usize {
        pipeline::clamp_page_index(
            self.state.page_index,
            self.filtered_rows().len(),
            self.state.page_size,
        )
    }

    pub fn has_previous(&self) -> bool {
        self.page_index() > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index() + 1 < self.page_count()
    }

    // ------------------------- Transitions --------------------------- //

    pub fn set_search(&mut self, text: &str) {
        debug!("Search \"{}\" -> \"{}\"", self.state.search_text, text);
        self.state.search_text = text.to_string();
        self.state.page_index = 0;
    }

    /// Shows a hidden column or hides a visible one. Unknown fields are ignored.
    pub fn toggle_column(&mut self, field: &str) -> bool {
        if self.column(field).is_none() {
            debug!("Ignoring toggle of unknown column {field}");
            return false;
        }
        if !self.state.hidden_fields.remove(field) {
            self.state.hidden_fields.insert(field.to_string());
        }
        debug!("Hidden columns: {:?}", self.state.hidden_fields);
        true
    }

    /// Sorts ascending by a new column, or flips the direction of the current one.
    pub fn request_sort(&mut self, field: &str) -> bool {
        if !self.column(field).is_some_and(|c| c.sortable) {
            debug!("Ignoring sort request for {field}");
            return false;
        }
        self.state.sort = match self.state.sort.take() {
            Some(spec) if spec.field == field => Some(SortSpec {
                descending: !spec.descending,
                ..spec
            }),
            _ => Some(SortSpec {
                field: field.to_string(),
                descending: false,
            }),
        };
        debug!("Sort: {:?}", self.state.sort);
        true
    }

    pub fn goto_page(&mut self, page_index: usize) {
        let total = self.filtered_rows().len();
        self.state.page_index = pipeline::clamp_page_index(page_index, total, self.state.page_size);
        debug!("Page index {} (requested {})", self.state.page_index, page_index);
    }

    pub fn first_page(&mut self) {
        self.goto_page(0);
    }

    pub fn last_page(&mut self) {
        self.goto_page(self.page_count().saturating_sub(1));
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.goto_page(self.page_index() + 1);
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.goto_page(self.page_index() - 1);
        true
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        debug!("Page size {} -> {}", self.state.page_size, size);
        self.state.page_size = size;
        self.state.page_index = 0;
    }

    /// Applies the initial view options given on the command line.
    ///
    /// Unlike the interactive transitions, unknown or unsortable fields are reported as errors here.
    pub fn apply_options(
        &mut self,
        search: Option<&str>,
        sort: Option<&str>,
        descending: bool,
        hidden: &[String],
        page_size: PageSize,
    ) -> Result<(), TVError> {
        self.set_page_size(page_size);
        for field in hidden {
            if self.column(field).is_none() {
                return Err(TVError::UnknownColumn(field.clone()));
            }
            if !self.is_hidden(field) {
                self.toggle_column(field);
            }
        }
        if let Some(field) = sort {
            match self.column(field) {
                None => return Err(TVError::UnknownColumn(field.to_string())),
                Some(c) if !c.sortable => return Err(TVError::UnsortableColumn(field.to_string())),
                Some(_) => {
                    self.request_sort(field);
                    if descending {
                        self.request_sort(field);
                    }
                }
            }
        }
        if let Some(text) = search {
            self.set_search(text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{User, sample_users, user_columns};

    fn users() -> Table<User> {
        Table::new(user_columns(), sample_users())
    }

    fn page_ids(table: &Table<User>) -> Vec<i64> {
        table
            .page()
            .rows
            .iter()
            .filter_map(|&r| table.record(r))
            .map(|u| u.id)
            .collect()
    }

    fn size(n: usize) -> PageSize {
        PageSize::try_from(n).unwrap()
    }

    #[test]
    fn defaults() {
        let table = users();
        assert_eq!(table.state(), &ViewState::default());
        assert_eq!(table.state().page_size.get(), 5);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn six_records_on_pages_of_five() {
        let mut table = users();
        assert_eq!(page_ids(&table), vec![1, 2, 3, 4, 5]);
        assert_eq!(table.page_count(), 2);
        assert!(table.has_next());
        assert!(!table.has_previous());

        assert!(table.next_page());
        assert_eq!(page_ids(&table), vec![6]);
        assert!(!table.has_next());
        assert!(table.has_previous());

        assert!(!table.next_page());
        assert_eq!(table.page_index(), 1);

        assert!(table.previous_page());
        assert!(!table.previous_page());
        assert_eq!(table.page_index(), 0);
    }

    #[test]
    fn search_resets_page() {
        let mut table = users();
        table.next_page();
        table.set_search("ma");
        assert_eq!(table.state().page_index, 0);
        assert_eq!(page_ids(&table), vec![2]);
        assert_eq!(table.filtered_rows().len(), 1);
        assert_eq!(table.page_count(), 1);
    }

    #[test]
    fn search_without_matches_has_no_pages() {
        let mut table = users();
        table.set_search("zzz");
        assert_eq!(table.page_count(), 0);
        assert!(page_ids(&table).is_empty());
        assert!(!table.has_next());
        assert!(!table.has_previous());
        table.last_page();
        assert_eq!(table.state().page_index, 0);
    }

    #[test]
    fn toggle_column_is_symmetric_and_leaves_pipeline_alone() {
        let mut table = users();
        table.request_sort("name");
        let before = (table.filtered_rows().len(), table.page_count(), page_ids(&table));

        assert!(table.toggle_column("age"));
        assert!(table.is_hidden("age"));
        let fields: Vec<_> = table.visible_columns().iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["id", "name", "email"]);
        assert_eq!(
            (table.filtered_rows().len(), table.page_count(), page_ids(&table)),
            before
        );

        assert!(table.toggle_column("age"));
        assert!(!table.is_hidden("age"));
        assert_eq!(table.visible_columns().len(), 4);

        assert!(!table.toggle_column("nope"));
        assert!(table.state().hidden_fields.is_empty());
    }

    #[test]
    fn sorting_a_hidden_column_still_works() {
        let mut table = users();
        table.toggle_column("id");
        assert!(table.request_sort("id"));
        assert!(table.request_sort("id"));
        assert_eq!(page_ids(&table), vec![6, 5, 4, 3, 2]);
    }

    #[test]
    fn request_sort_flips_direction() {
        let mut table = users();
        let mut directions = Vec::new();
        for _ in 0..4 {
            assert!(table.request_sort("name"));
            directions.push(table.state().sort.as_ref().map(|s| s.descending));
        }
        assert_eq!(
            directions,
            vec![Some(false), Some(true), Some(false), Some(true)]
        );

        table.request_sort("name");
        assert_eq!(page_ids(&table), vec![4, 6, 1, 5, 2]);

        table.request_sort("email");
        assert_eq!(
            table.state().sort,
            Some(SortSpec {
                field: "email".into(),
                descending: false
            })
        );
    }

    #[test]
    fn unsortable_column_never_becomes_sort_field() {
        let mut table = users();
        assert!(!table.request_sort("age"));
        assert_eq!(table.state().sort, None);

        table.request_sort("id");
        assert!(!table.request_sort("age"));
        assert_eq!(table.state().sort.as_ref().map(|s| s.field.as_str()), Some("id"));
        assert!(!table.request_sort("unknown"));
    }

    #[test]
    fn goto_page_clamps() {
        let mut table = users();
        table.goto_page(7);
        assert_eq!(table.state().page_index, 1);
        table.first_page();
        assert_eq!(table.state().page_index, 0);
        table.last_page();
        assert_eq!(page_ids(&table), vec![6]);
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut table = users();
        table.last_page();
        table.set_page_size(size(10));
        assert_eq!(table.state().page_index, 0);
        assert_eq!(table.page_count(), 1);
        assert_eq!(page_ids(&table), vec![1, 2, 3, 4, 5, 6]);
        assert!(!table.has_next());
    }

    #[test]
    fn apply_options() {
        let mut table = users();
        table
            .apply_options(Some("a"), Some("name"), true, &["email".to_string()], size(10))
            .unwrap();
        assert_eq!(table.state().search_text, "a");
        assert!(table.is_hidden("email"));
        assert_eq!(page_ids(&table), vec![2, 5, 6, 4]);
    }

    #[test]
    fn apply_options_rejects_bad_fields() {
        let mut table = users();
        assert!(matches!(
            table.apply_options(None, Some("age"), false, &[], size(5)),
            Err(TVError::UnsortableColumn(_))
        ));
        assert!(matches!(
            table.apply_options(None, None, false, &["phone".to_string()], size(5)),
            Err(TVError::UnknownColumn(_))
        ));
    }
}
