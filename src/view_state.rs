// src/view_state.rs

//! Sorting, filtering and visibility state, changed only through `reduce`.

use std::collections::HashMap;

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_desc(desc: bool) -> Self {
        if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

pub type SortingState = Vec<ColumnSort>;
pub type VisibilityState = HashMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SetGlobalFilter(String),
    PushFilterChar(char),
    PopFilterChar,
    ClearFilter,
    SetSorting {
        column: String,
        desc: bool,
        multi: bool,
    },
    /// Cycles none, first direction, opposite direction, none.
    ToggleSorting {
        column: String,
        first_desc: bool,
        multi: bool,
    },
    ClearSorting {
        column: String,
    },
    SetVisibility {
        column: String,
        visible: bool,
    },
    ToggleVisibility(String),
    ShowAllColumns,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub sorting: SortingState,
    pub global_filter: String,
    pub visibility: VisibilityState,
}

impl ViewState {
    pub fn new<I, S>(columns_hidden: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ViewState {
            sorting: Vec::new(),
            global_filter: String::new(),
            visibility: columns_hidden
                .into_iter()
                .map(|c| (c.into(), false))
                .collect(),
        }
    }

    pub fn is_visible(&self, column: &str) -> bool {
        self.visibility.get(column).copied().unwrap_or(true)
    }

    pub fn sort_direction(&self, column: &str) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|s| s.id == column)
            .map(|s| SortDirection::from_desc(s.desc))
    }

    pub fn reduce(mut self, action: ViewAction) -> Self {
        debug!("view action {:?}", action);
        match action {
            ViewAction::SetGlobalFilter(text) => self.global_filter = text,
            ViewAction::PushFilterChar(c) => self.global_filter.push(c),
            ViewAction::PopFilterChar => {
                self.global_filter.pop();
            }
            ViewAction::ClearFilter => self.global_filter.clear(),
            ViewAction::SetSorting {
                column,
                desc,
                multi,
            } => self.set_sort(column, Some(desc), multi),
            ViewAction::ToggleSorting {
                column,
                first_desc,
                multi,
            } => {
                let next = match self.sort_direction(&column) {
                    None => Some(first_desc),
                    Some(dir) if (dir == SortDirection::Desc) == first_desc => Some(!first_desc),
                    Some(_) => None,
                };
                self.set_sort(column, next, multi);
            }
            ViewAction::ClearSorting { column } => self.sorting.retain(|s| s.id != column),
            ViewAction::SetVisibility { column, visible } => {
                self.visibility.insert(column, visible);
            }
            ViewAction::ToggleVisibility(column) => {
                let visible = self.is_visible(&column);
                self.visibility.insert(column, !visible);
            }
            ViewAction::ShowAllColumns => {
                for visible in self.visibility.values_mut() {
                    *visible = true;
                }
            }
        }
        self
    }

    fn set_sort(&mut self, column: String, desc: Option<bool>, multi: bool) {
        match (desc, multi) {
            (None, true) => self.sorting.retain(|s| s.id != column),
            (None, false) => self.sorting.clear(),
            (Some(desc), false) => self.sorting = vec![ColumnSort { id: column, desc }],
            (Some(desc), true) => match self.sorting.iter_mut().find(|s| s.id == column) {
                Some(existing) => existing.desc = desc,
                None => self.sorting.push(ColumnSort { id: column, desc }),
            },
        }
    }
}
