//! The three stages that turn raw records into the rows of the current page.
//!
//! All stages work on row mappings: vectors of indices into the record slice,
//! so records are never copied or reordered in place.

use crate::domain::{PageSize, SEARCHABLE_FIELD};
use crate::record::Column;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

/// Indices of the records whose searchable field contains `search`, ignoring case.
pub fn filter_rows<R>(data: &[R], columns: &[Column<R>], search: &str) -> Vec<usize> {
    let all = || (0..data.len()).collect::<Vec<usize>>();
    if search.is_empty() {
        return all();
    }
    let Some(column) = columns.iter().find(|c| c.field == SEARCHABLE_FIELD) else {
        return all();
    };

    let term = search.to_lowercase();
    data.iter()
        .enumerate()
        .filter(|(_, record)| match column.value(record) {
            Some(value) => value.to_string().to_lowercase().contains(&term),
            None => true,
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Orders `rows` by the column named in `sort`. Equal keys keep their input order.
pub fn sort_rows<R>(
    data: &[R],
    columns: &[Column<R>],
    rows: Vec<usize>,
    sort: Option<&SortSpec>,
) -> Vec<usize> {
    let Some(spec) = sort else {
        return rows;
    };
    let Some(column) = columns.iter().find(|c| c.field == spec.field && c.sortable) else {
        return rows;
    };

    let mut keyed: Vec<_> = rows.into_iter().map(|ridx| (column.value(&data[ridx]), ridx)).collect();
    if spec.descending {
        keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
    } else {
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    keyed.into_iter().map(|(_, ridx)| ridx).collect()
}

/// One page of a row mapping plus the navigation values derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub rows: Vec<usize>,
    pub page_index: usize,
    pub page_count: usize,
    pub total: usize,
}

impl Page {
    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

pub fn page_count(total: usize, page_size: PageSize) -> usize {
    total.div_ceil(page_size.get())
}

/// Clamps `page_index` to the last page that exists for `total` rows.
pub fn clamp_page_index(page_index: usize, total: usize, page_size: PageSize) -> usize {
    page_index.min(page_count(total, page_size).saturating_sub(1))
}

pub fn paginate(rows: &[usize], page_index: usize, page_size: PageSize) -> Page {
    let page_index = clamp_page_index(page_index, rows.len(), page_size);
    let rbegin = std::cmp::min(page_index * page_size.get(), rows.len());
    let rend = std::cmp::min(rbegin + page_size.get(), rows.len());

    Page {
        rows: rows[rbegin..rend].to_vec(),
        page_index,
        page_count: page_count(rows.len(), page_size),
        total: rows.len(),
    }
}
