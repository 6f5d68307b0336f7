// src/card.rs

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::column::ColumnDef;
use crate::data_loader::TableData;
use crate::error::{DataTableError, Result};
use crate::virtual_table::VirtualTable;

/// Renders one row as a card when the terminal is too narrow for the table.
pub trait CardRenderer {
    fn render(&self, table: &VirtualTable, row: usize) -> Vec<Line<'static>>;
}

/// Card showing some fields as a bold title and the rest as `label: value` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCard {
    pub title: Vec<String>,
    pub details: Vec<String>,
}

impl FieldCard {
    pub fn new(title: Vec<String>, details: Vec<String>) -> Self {
        FieldCard { title, details }
    }

    /// Fails on a field that is neither a column nor a data field.
    pub fn check(&self, columns: &[ColumnDef], data: &TableData) -> Result<()> {
        for field in self.title.iter().chain(&self.details) {
            if !columns.iter().any(|c| &c.id == field) && data.field_index(field).is_none() {
                return Err(DataTableError::UnknownCardField(field.clone()));
            }
        }
        Ok(())
    }

    fn value(table: &VirtualTable, row: usize, field: &str) -> String {
        match table.column_index(field) {
            Some(col) => table.cell_value(row, col).to_string(),
            None => table
                .data
                .field_index(field)
                .and_then(|f| table.data.value(row, f))
                .unwrap_or("")
                .to_string(),
        }
    }
}

impl CardRenderer for FieldCard {
    fn render(&self, table: &VirtualTable, row: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if !self.title.is_empty() {
            let title = self
                .title
                .iter()
                .map(|f| Self::value(table, row, f))
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(Line::from(Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }

        for field in &self.details {
            let label = match table.column_index(field) {
                Some(col) => table.columns[col].label(),
                None => field.clone(),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::DIM)),
                Span::raw(Self::value(table, row, field)),
            ]));
        }

        lines
    }
}

/// Card of the people demo.
pub fn sample_card() -> FieldCard {
    FieldCard::new(
        vec!["nombre".into(), "apellido".into()],
        vec!["email".into(), "pais".into()],
    )
}
