// src/column.rs

//! Column definitions and header descriptors.

use std::fmt;

use serde::Deserialize;

use crate::view_state::SortDirection;

/// Label used when a header cannot be turned into text.
pub const HEADER_UNAVAILABLE: &str = "header unavailable";

/// What a header render function gets to look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderContext<'a> {
    pub column_id: &'a str,
    pub sorted: Option<SortDirection>,
    pub can_sort: bool,
}

impl<'a> HeaderContext<'a> {
    /// Context with nothing but the column id, used outside the table header.
    pub fn detached(column_id: &'a str) -> Self {
        HeaderContext {
            column_id,
            sorted: None,
            can_sort: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderElement {
    pub title: Option<String>,
    pub sorted: Option<SortDirection>,
    pub can_sort: bool,
}

/// Output of a header render function.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderNode {
    Element(HeaderElement),
    Text(String),
    Number(f64),
    Empty,
}

impl HeaderNode {
    /// Text drawn in the table heading.
    pub fn display(&self, fallback: &str) -> String {
        match self {
            HeaderNode::Element(el) => {
                let title = el.title.as_deref().unwrap_or(fallback);
                match el.sorted {
                    Some(SortDirection::Asc) => format!("{} ▲", title),
                    Some(SortDirection::Desc) => format!("{} ▼", title),
                    None if el.can_sort => format!("{} ↕", title),
                    None => title.to_string(),
                }
            }
            HeaderNode::Text(text) => text.clone(),
            HeaderNode::Number(n) => n.to_string(),
            HeaderNode::Empty => String::new(),
        }
    }
}

pub type RenderHeader = Box<dyn Fn(&HeaderContext<'_>) -> HeaderNode>;

pub enum Header {
    Literal(String),
    Rendered(RenderHeader),
}

impl Header {
    pub fn literal(text: impl Into<String>) -> Self {
        Header::Literal(text.into())
    }

    pub fn rendered<F>(f: F) -> Self
    where
        F: Fn(&HeaderContext<'_>) -> HeaderNode + 'static,
    {
        Header::Rendered(Box::new(f))
    }

    pub fn render(&self, ctx: &HeaderContext<'_>) -> HeaderNode {
        match self {
            Header::Literal(text) => HeaderNode::Text(text.clone()),
            Header::Rendered(f) => f(ctx),
        }
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Header::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Header::Rendered(_) => f.write_str("Rendered(..)"),
        }
    }
}

/// Sortable heading carrying `title`, reflecting the column's sort state.
pub fn column_header(title: impl Into<String>) -> Header {
    let title = title.into();
    Header::rendered(move |ctx| {
        HeaderNode::Element(HeaderElement {
            title: Some(title.clone()),
            sorted: ctx.sorted,
            can_sort: ctx.can_sort,
        })
    })
}

/// Plain label for a header, as listed in the column visibility menu.
pub fn resolve_header_label(header: Option<&Header>, column_id: &str) -> String {
    match header {
        Some(Header::Literal(text)) => text.clone(),
        Some(Header::Rendered(render)) => match render(&HeaderContext::detached(column_id)) {
            HeaderNode::Element(HeaderElement {
                title: Some(title), ..
            }) if !title.is_empty() => title,
            _ => HEADER_UNAVAILABLE.to_string(),
        },
        None => HEADER_UNAVAILABLE.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Value,
    /// Row action trigger; has no backing field.
    Actions,
}

#[derive(Debug)]
pub struct ColumnDef {
    pub id: String,
    pub header: Option<Header>,
    pub cell: CellKind,
    pub enable_global_filter: bool,
    pub enable_sorting: bool,
    pub enable_hiding: bool,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, header: Header) -> Self {
        ColumnDef {
            id: id.into(),
            header: Some(header),
            cell: CellKind::Value,
            enable_global_filter: true,
            enable_sorting: true,
            enable_hiding: true,
        }
    }

    pub fn without_header(id: impl Into<String>) -> Self {
        ColumnDef {
            header: None,
            ..ColumnDef::new(id, Header::literal(""))
        }
    }

    pub fn global_filter(mut self, enabled: bool) -> Self {
        self.enable_global_filter = enabled;
        self
    }

    pub fn sorting(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    pub fn hiding(mut self, enabled: bool) -> Self {
        self.enable_hiding = enabled;
        self
    }

    pub fn cell(mut self, kind: CellKind) -> Self {
        self.cell = kind;
        self
    }

    pub fn label(&self) -> String {
        resolve_header_label(self.header.as_ref(), &self.id)
    }

    pub fn heading(&self, ctx: &HeaderContext<'_>) -> String {
        match &self.header {
            Some(header) => header.render(ctx).display(&self.id),
            None => self.id.clone(),
        }
    }
}

/// Columns of the people demo.
pub fn sample_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("id", column_header("Id")),
        ColumnDef::new("nombre", column_header("Nombre")),
        ColumnDef::new("apellido", Header::literal("Apellido")),
        ColumnDef::new("email", column_header("Email")).global_filter(false),
        ColumnDef::new("pais", column_header("País")),
        ColumnDef::new("acciones", Header::literal("Acciones"))
            .global_filter(false)
            .cell(CellKind::Actions),
    ]
}
