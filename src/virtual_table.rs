// src/virtual_table.rs

use std::cmp::Ordering;

use crate::column::{CellKind, ColumnDef, HeaderContext};
use crate::data_loader::TableData;
use crate::view_state::ViewState;

/// Finite numbers sort before text; `NaN` and `inf` count as text.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(value: &str) -> Self {
        match value.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => SortKey::Number(n),
            _ => SortKey::Text(value.to_lowercase()),
        }
    }

    fn cmp(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        }
    }
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

/// Columns and rows, plus the derived row and column models.
pub struct VirtualTable {
    pub columns: Vec<ColumnDef>,
    pub data: TableData,
    // Backing field of each column, `None` for display-only columns.
    fields: Vec<Option<usize>>,
}

impl VirtualTable {
    pub fn new(columns: Vec<ColumnDef>, data: TableData) -> Self {
        let fields = columns
            .iter()
            .map(|c| match c.cell {
                CellKind::Value => data.field_index(&c.id),
                CellKind::Actions => None,
            })
            .collect();
        VirtualTable {
            columns,
            data,
            fields,
        }
    }

    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn column_can_global_filter(&self, col: usize) -> bool {
        self.columns[col].enable_global_filter && self.fields[col].is_some()
    }

    pub fn column_can_sort(&self, col: usize) -> bool {
        self.columns[col].enable_sorting && self.fields[col].is_some()
    }

    pub fn column_can_hide(&self, col: usize) -> bool {
        self.columns[col].enable_hiding
    }

    /// Numbers sort high-to-low on the first toggle, text A-Z.
    pub fn first_sort_desc(&self, col: usize) -> bool {
        self.fields[col]
            .and_then(|f| self.data.value(0, f))
            .is_some_and(|v| matches!(SortKey::of(v), SortKey::Number(_)))
    }

    pub fn cell_value(&self, row: usize, col: usize) -> &str {
        self.fields[col]
            .and_then(|f| self.data.value(row, f))
            .unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.data.rows.len()
    }

    /// Indices into `data.rows`: filtered by the global filter, then sorted.
    pub fn row_model(&self, state: &ViewState) -> Vec<usize> {
        let mut rows: Vec<usize> = (0..self.row_count())
            .filter(|&row| self.matches_global_filter(row, &state.global_filter))
            .collect();

        let sorts: Vec<(usize, bool)> = state
            .sorting
            .iter()
            .filter_map(|s| {
                let col = self.column_index(&s.id)?;
                self.column_can_sort(col).then_some((col, s.desc))
            })
            .collect();

        if !sorts.is_empty() {
            // Stable sort keeps the original order between equal rows.
            rows.sort_by(|&i, &j| {
                for &(col, desc) in &sorts {
                    let ord = compare_cells(self.cell_value(i, col), self.cell_value(j, col));
                    let ord = if desc { ord.reverse() } else { ord };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }

        rows
    }

    fn matches_global_filter(&self, row: usize, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        let needle = filter.to_lowercase();
        (0..self.columns.len())
            .filter(|&col| self.column_can_global_filter(col))
            .any(|col| self.cell_value(row, col).to_lowercase().contains(&needle))
    }

    pub fn visible_columns(&self, state: &ViewState) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&col| state.is_visible(&self.columns[col].id))
            .collect()
    }

    pub fn hideable_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&col| self.column_can_hide(col))
            .collect()
    }

    pub fn heading(&self, col: usize, state: &ViewState) -> String {
        let column = &self.columns[col];
        column.heading(&HeaderContext {
            column_id: &column.id,
            sorted: state.sort_direction(&column.id),
            can_sort: self.column_can_sort(col),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::column::{column_header, sample_columns, Header};
    use crate::data_loader::{sample_data, Record};
    use crate::view_state::ViewAction;

    fn people() -> VirtualTable {
        VirtualTable::new(sample_columns(), sample_data())
    }

    fn ids(table: &VirtualTable, rows: &[usize]) -> Vec<String> {
        rows.iter().map(|&r| table.cell_value(r, 0).to_string()).collect()
    }

    #[test]
    fn test_excluded_field_is_not_searched() {
        let data = TableData::new(
            vec!["email".into()],
            vec![
                Record::new(["JuanPerez@gmail.com"]),
                Record::new(["Maria@outlook.com"]),
            ],
        );
        let table = VirtualTable::new(
            vec![ColumnDef::new("email", column_header("Email")).global_filter(false)],
            data,
        );
        let state = ViewState::default().reduce(ViewAction::SetGlobalFilter("gmail".into()));
        assert!(table.row_model(&state).is_empty());
    }

    #[test]
    fn test_global_filter_is_case_insensitive() {
        let table = people();
        let state = ViewState::default().reduce(ViewAction::SetGlobalFilter("MARÍA".into()));
        assert_eq!(ids(&table, &table.row_model(&state)), vec!["2"]);

        let state = state.reduce(ViewAction::SetGlobalFilter("ar".into()));
        // Argentina, María, Martínez
        assert_eq!(ids(&table, &table.row_model(&state)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_filter_keeps_all_rows() {
        let table = people();
        assert_eq!(table.row_model(&ViewState::default()), vec![0, 1, 2]);
    }

    #[test]
    fn test_hidden_columns_are_still_searched() {
        let table = people();
        let state = ViewState::new(["pais"]).reduce(ViewAction::SetGlobalFilter("perú".into()));
        assert_eq!(ids(&table, &table.row_model(&state)), vec!["3"]);
    }

    #[test]
    fn test_hidden_by_default_column_excluded_until_enabled() {
        let table = people();
        let state = ViewState::new(["pais"]);
        let pais = table.column_index("pais").unwrap();
        assert!(!table.visible_columns(&state).contains(&pais));

        let state = state.reduce(ViewAction::ToggleVisibility("pais".into()));
        assert!(table.visible_columns(&state).contains(&pais));
        assert_eq!(table.visible_columns(&state).len(), table.columns.len());
    }

    #[test]
    fn test_sorting_numeric_and_text() {
        let data = TableData::new(
            vec!["n".into(), "name".into()],
            vec![
                Record::new(["10", "bob"]),
                Record::new(["9", "Alice"]),
                Record::new(["100", "carl"]),
            ],
        );
        let table = VirtualTable::new(
            vec![
                ColumnDef::new("n", Header::literal("N")),
                ColumnDef::new("name", Header::literal("Name")),
            ],
            data,
        );
        assert!(table.first_sort_desc(0));
        assert!(!table.first_sort_desc(1));

        let by_n = ViewState::default().reduce(ViewAction::SetSorting {
            column: "n".into(),
            desc: false,
            multi: false,
        });
        assert_eq!(table.row_model(&by_n), vec![1, 0, 2]);

        let by_name = ViewState::default().reduce(ViewAction::SetSorting {
            column: "name".into(),
            desc: true,
            multi: false,
        });
        assert_eq!(table.row_model(&by_name), vec![2, 0, 1]);
    }

    #[test]
    fn test_mixed_column_sorts_consistently() {
        let codes = ["123", "12a", "NaN", "9", "10", "1a", "inf", "N", "Na", "-3.5", "b", "0"];
        let rows: Vec<Record> = (0..5000)
            .map(|i| Record::new([codes[(i * 7 + i / 13) % codes.len()]]))
            .collect();
        let table = VirtualTable::new(
            vec![ColumnDef::new("code", Header::literal("Code"))],
            TableData::new(vec!["code".into()], rows),
        );

        for desc in [false, true] {
            let state = ViewState::default().reduce(ViewAction::SetSorting {
                column: "code".into(),
                desc,
                multi: false,
            });
            let sorted = table.row_model(&state);
            assert_eq!(sorted.len(), 5000);
            for pair in sorted.windows(2) {
                let ord = compare_cells(table.cell_value(pair[0], 0), table.cell_value(pair[1], 0));
                let expected = if desc { Ordering::Less } else { Ordering::Greater };
                assert_ne!(ord, expected);
            }
        }

        assert_eq!(compare_cells("9", "10"), Ordering::Less);
        assert_eq!(compare_cells("10", "1a"), Ordering::Less);
        assert_eq!(compare_cells("9", "1a"), Ordering::Less);
        assert_eq!(compare_cells("NaN", "0"), Ordering::Greater);
        assert_eq!(compare_cells("NaN", "nan"), Ordering::Equal);
    }

    #[test]
    fn test_multi_sort_and_stable_ties() {
        let data = TableData::new(
            vec!["team".into(), "score".into()],
            vec![
                Record::new(["b", "1"]),
                Record::new(["a", "2"]),
                Record::new(["b", "2"]),
                Record::new(["a", "2"]),
            ],
        );
        let table = VirtualTable::new(
            vec![
                ColumnDef::new("team", Header::literal("Team")),
                ColumnDef::new("score", Header::literal("Score")),
            ],
            data,
        );
        let state = ViewState::default()
            .reduce(ViewAction::SetSorting {
                column: "team".into(),
                desc: false,
                multi: false,
            })
            .reduce(ViewAction::SetSorting {
                column: "score".into(),
                desc: true,
                multi: true,
            });
        assert_eq!(table.row_model(&state), vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_display_columns_cannot_sort_or_filter() {
        let table = people();
        let acciones = table.column_index("acciones").unwrap();
        assert!(!table.column_can_sort(acciones));
        assert!(!table.column_can_global_filter(acciones));
        assert!(table.column_can_hide(acciones));
        assert_eq!(table.cell_value(0, acciones), "");

        let state = ViewState::default().reduce(ViewAction::SetSorting {
            column: "acciones".into(),
            desc: true,
            multi: false,
        });
        assert_eq!(table.row_model(&state), vec![0, 1, 2]);
    }

    #[test]
    fn test_hideable_columns_respect_flag() {
        let table = VirtualTable::new(
            vec![
                ColumnDef::new("id", Header::literal("Id")).hiding(false),
                ColumnDef::new("nombre", Header::literal("Nombre")),
            ],
            sample_data(),
        );
        assert_eq!(table.hideable_columns(), vec![1]);
    }

    #[test]
    fn test_heading_reflects_sort_state() {
        let table = people();
        let state = ViewState::default().reduce(ViewAction::SetSorting {
            column: "nombre".into(),
            desc: false,
            multi: false,
        });
        assert_eq!(table.heading(1, &state), "Nombre ▲");
        assert_eq!(table.heading(2, &state), "Apellido");
        assert_eq!(table.heading(5, &state), "Acciones");
    }
}
