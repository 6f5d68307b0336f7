// src/options.rs

//! What a host passes to the data table, and the TOML file describing it.

use std::fs;

use log::{debug, info, warn};
use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{BorderType, Borders},
};
use serde::Deserialize;

use crate::card::{sample_card, CardRenderer, FieldCard};
use crate::column::{column_header, sample_columns, CellKind, ColumnDef, Header};
use crate::data_loader::{sample_data, TableData};
use crate::error::Result;
use crate::responsive::Breakpoint;

pub const DEFAULT_PLACEHOLDER_FILTER: &str = "Filter...";

pub struct DataTableOptions {
    pub columns: Vec<ColumnDef>,
    pub data: TableData,
    pub class_name: Option<String>,
    pub card: Option<Box<dyn CardRenderer>>,
    pub placeholder_filter: String,
    pub columns_hidden: Vec<String>,
    pub breakpoint: Breakpoint,
}

impl DataTableOptions {
    /// With no columns, one literal column per data field is shown.
    pub fn new(columns: Vec<ColumnDef>, data: TableData) -> Self {
        let columns = if columns.is_empty() {
            columns_from_fields(&data)
        } else {
            columns
        };
        DataTableOptions {
            columns,
            data,
            class_name: None,
            card: None,
            placeholder_filter: DEFAULT_PLACEHOLDER_FILTER.to_string(),
            columns_hidden: Vec::new(),
            breakpoint: Breakpoint::default(),
        }
    }

    /// The people table, with email left out of the filter and country hidden.
    pub fn demo() -> Self {
        DataTableOptions::new(sample_columns(), sample_data())
            .placeholder_filter("Filter everything except email")
            .columns_hidden(["pais"])
            .class_name("rounded")
            .card(sample_card())
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn card(mut self, card: impl CardRenderer + 'static) -> Self {
        self.card = Some(Box::new(card));
        self
    }

    pub fn placeholder_filter(mut self, text: impl Into<String>) -> Self {
        self.placeholder_filter = text.into();
        self
    }

    pub fn columns_hidden<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns_hidden = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Hidden column names that match a column; the rest are dropped.
    pub fn known_hidden_columns(&self) -> Vec<String> {
        self.columns_hidden
            .iter()
            .filter(|name| {
                let known = self.columns.iter().any(|c| &c.id == *name);
                if !known {
                    warn!("ignoring unknown hidden column '{}'", name);
                }
                known
            })
            .cloned()
            .collect()
    }

    pub fn container_style(&self) -> ContainerStyle {
        ContainerStyle::parse(self.class_name.as_deref().unwrap_or(""))
    }
}

fn columns_from_fields(data: &TableData) -> Vec<ColumnDef> {
    data.fields
        .iter()
        .map(|f| ColumnDef::new(f.clone(), Header::literal(f.clone())))
        .collect()
}

/// Block styling derived from a `class_name` token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStyle {
    pub borders: Borders,
    pub border_type: BorderType,
    pub border_style: Style,
    pub title_style: Style,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        ContainerStyle {
            borders: Borders::ALL,
            border_type: BorderType::Plain,
            border_style: Style::default(),
            title_style: Style::default(),
        }
    }
}

impl ContainerStyle {
    pub fn parse(class_name: &str) -> Self {
        let mut style = ContainerStyle::default();
        for token in class_name.split_whitespace() {
            match token {
                "rounded" => style.border_type = BorderType::Rounded,
                "double" => style.border_type = BorderType::Double,
                "thick" => style.border_type = BorderType::Thick,
                "borderless" => style.borders = Borders::NONE,
                "bold" => style.title_style = style.title_style.add_modifier(Modifier::BOLD),
                _ => {
                    if let Some(color) = token.strip_prefix("border-").and_then(parse_color) {
                        style.border_style = style.border_style.fg(color);
                    } else if let Some(color) = token.strip_prefix("title-").and_then(parse_color) {
                        style.title_style = style.title_style.fg(color);
                    } else {
                        debug!("unknown class token '{}'", token);
                    }
                }
            }
        }
        style
    }
}

fn parse_color(name: &str) -> Option<Color> {
    name.parse::<Color>().ok()
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub placeholder_filter: Option<String>,
    #[serde(default)]
    pub columns_hidden: Vec<String>,
    pub class_name: Option<String>,
    pub breakpoint: Option<u16>,
    pub card: Option<CardConfig>,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CardConfig {
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnConfig {
    pub id: String,
    pub header: Option<HeaderConfig>,
    #[serde(default)]
    pub cell: CellKind,
    #[serde(default = "enabled")]
    pub global_filter: bool,
    #[serde(default = "enabled")]
    pub sorting: bool,
    #[serde(default = "enabled")]
    pub hiding: bool,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HeaderConfig {
    Literal(String),
    Titled { title: String },
    Other(toml::Value),
}

impl ColumnConfig {
    fn into_column(self) -> ColumnDef {
        let header = match self.header {
            Some(HeaderConfig::Literal(text)) => Some(Header::literal(text)),
            Some(HeaderConfig::Titled { title }) => Some(column_header(title)),
            Some(HeaderConfig::Other(value)) => {
                warn!("column '{}' has an unsupported header {}", self.id, value);
                None
            }
            None => None,
        };
        ColumnDef {
            header,
            ..ColumnDef::without_header(self.id)
        }
        .cell(self.cell)
        .global_filter(self.global_filter)
        .sorting(self.sorting)
        .hiding(self.hiding)
    }
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::parse(&text)?;
        info!("loaded config from {}", path);
        Ok(config)
    }

    /// Overrides `options` with whatever the file sets.
    pub fn apply(self, mut options: DataTableOptions) -> Result<DataTableOptions> {
        if !self.columns.is_empty() {
            options.columns = self.columns.into_iter().map(ColumnConfig::into_column).collect();
        }
        if let Some(text) = self.placeholder_filter {
            options.placeholder_filter = text;
        }
        if !self.columns_hidden.is_empty() {
            options.columns_hidden = self.columns_hidden;
        }
        if let Some(class_name) = self.class_name {
            options.class_name = Some(class_name);
        }
        if let Some(width) = self.breakpoint {
            options.breakpoint = Breakpoint::new(width);
        }
        if let Some(card) = self.card {
            let card = FieldCard::new(card.title, card.details);
            card.check(&options.columns, &options.data)?;
            options.card = Some(Box::new(card));
        }
        Ok(options)
    }
}
