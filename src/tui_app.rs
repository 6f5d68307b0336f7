use std::error::Error;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
    },
    Terminal,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use log::info;

use crate::card::CardRenderer;
use crate::column::CellKind;
use crate::options::{ContainerStyle, DataTableOptions};
use crate::responsive::{Breakpoint, LayoutMode};
use crate::view_state::{ViewAction, ViewState};
use crate::virtual_table::VirtualTable;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, Display)]
pub enum RowAction {
    Edit,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Table,
    Filter,
    ColumnMenu,
    RowActions,
}

pub struct TuiApp {
    pub table: VirtualTable,
    pub view: ViewState,
    pub placeholder_filter: String,
    pub card: Option<Box<dyn CardRenderer>>,
    pub breakpoint: Breakpoint,
    pub container: ContainerStyle,

    pub focus: Focus,
    /// Position in the current row model.
    pub selected_row: usize,
    /// Position among the visible columns.
    pub selected_column: usize,
    pub table_state: TableState,
    pub card_state: ListState,
    pub menu_state: ListState,

    pub toast: Option<String>,
    pub layout: LayoutMode,
}

impl TuiApp {
    pub fn new(options: DataTableOptions) -> Self {
        let view = ViewState::new(options.known_hidden_columns());
        let container = options.container_style();
        let table = VirtualTable::new(options.columns, options.data);

        info!(
            "data table with {} columns, {} rows",
            table.columns.len(),
            table.row_count()
        );

        TuiApp {
            table,
            view,
            placeholder_filter: options.placeholder_filter,
            card: options.card,
            breakpoint: options.breakpoint,
            container,

            focus: Focus::Table,
            selected_row: 0,
            selected_column: 0,
            table_state: TableState::default(),
            card_state: ListState::default(),
            menu_state: ListState::default(),

            toast: None,
            layout: LayoutMode::Table,
        }
    }

    pub fn main_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), Box<dyn Error>> {
        loop {
            self.draw_ui(terminal)?;

            if crossterm::event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if !self.handle_key(key) {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Returns false once the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.focus {
            Focus::Filter => match key.code {
                KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
                KeyCode::Char(c) => self.dispatch(ViewAction::PushFilterChar(c)),
                KeyCode::Backspace => self.dispatch(ViewAction::PopFilterChar),
                KeyCode::Esc => {
                    self.dispatch(ViewAction::ClearFilter);
                    self.focus = Focus::Table;
                }
                KeyCode::Enter => self.focus = Focus::Table,
                _ => {}
            },
            Focus::ColumnMenu => {
                let count = self.table.hideable_columns().len();
                match key.code {
                    KeyCode::Up => self.menu_up(count),
                    KeyCode::Down => self.menu_down(count),
                    KeyCode::Char(' ') => {
                        let hideable = self.table.hideable_columns();
                        if let Some(&col) = self.menu_state.selected().and_then(|i| hideable.get(i)) {
                            let id = self.table.columns[col].id.clone();
                            self.dispatch(ViewAction::ToggleVisibility(id));
                        }
                    }
                    KeyCode::Char('a') => self.dispatch(ViewAction::ShowAllColumns),
                    KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                        self.focus = Focus::Table;
                    }
                    _ => {}
                }
            }
            Focus::RowActions => {
                let count = RowAction::iter().count();
                match key.code {
                    KeyCode::Up => self.menu_up(count),
                    KeyCode::Down => self.menu_down(count),
                    KeyCode::Enter => {
                        let index = self.menu_state.selected().unwrap_or(0);
                        if let Some(action) = RowAction::iter().nth(index) {
                            self.run_row_action(action);
                        }
                        self.focus = Focus::Table;
                    }
                    KeyCode::Esc | KeyCode::Char('q') => self.focus = Focus::Table,
                    _ => {}
                }
            }
            Focus::Table => match key.code {
                KeyCode::Char('q') => return false,
                KeyCode::Char('/') => self.focus = Focus::Filter,
                KeyCode::Char('c') => {
                    self.focus = Focus::ColumnMenu;
                    self.menu_state.select(Some(0));
                }
                KeyCode::Enter => {
                    if self.current_row().is_some() {
                        self.focus = Focus::RowActions;
                        self.menu_state.select(Some(0));
                    }
                }
                KeyCode::Up => {
                    self.selected_row = self.selected_row.saturating_sub(1);
                }
                KeyCode::Down => {
                    let num_rows = self.table.row_model(&self.view).len();
                    if self.selected_row + 1 < num_rows {
                        self.selected_row += 1;
                    }
                }
                KeyCode::Left => {
                    self.selected_column = self.selected_column.saturating_sub(1);
                }
                KeyCode::Right => {
                    let num_columns = self.table.visible_columns(&self.view).len();
                    if self.selected_column + 1 < num_columns {
                        self.selected_column += 1;
                    }
                }
                KeyCode::Char('[') => self.sort_selected(Some(false), false),
                KeyCode::Char(']') => self.sort_selected(Some(true), false),
                KeyCode::Char('s') => self.sort_selected(None, false),
                KeyCode::Char('S') => self.sort_selected(None, true),
                KeyCode::Char('x') => {
                    if let Some(col) = self.current_column() {
                        let column = self.table.columns[col].id.clone();
                        self.dispatch(ViewAction::ClearSorting { column });
                    }
                }
                KeyCode::Char('h') => {
                    if let Some(col) = self.current_column() {
                        if self.table.column_can_hide(col) {
                            let column = self.table.columns[col].id.clone();
                            self.dispatch(ViewAction::SetVisibility {
                                column,
                                visible: false,
                            });
                        }
                    }
                }
                KeyCode::Esc => self.toast = None,
                _ => {}
            },
        }
        true
    }

    pub fn dispatch(&mut self, action: ViewAction) {
        let resets_rows = matches!(
            action,
            ViewAction::SetGlobalFilter(_)
                | ViewAction::PushFilterChar(_)
                | ViewAction::PopFilterChar
                | ViewAction::ClearFilter
        );
        let view = std::mem::take(&mut self.view);
        self.view = view.reduce(action);

        if resets_rows {
            self.selected_row = 0;
        }
        let num_rows = self.table.row_model(&self.view).len();
        self.selected_row = self.selected_row.min(num_rows.saturating_sub(1));
        let num_columns = self.table.visible_columns(&self.view).len();
        self.selected_column = self.selected_column.min(num_columns.saturating_sub(1));
    }

    fn menu_up(&mut self, count: usize) {
        let i = match self.menu_state.selected() {
            Some(0) | None => count.saturating_sub(1),
            Some(i) => i - 1,
        };
        self.menu_state.select(Some(i));
    }

    fn menu_down(&mut self, count: usize) {
        let i = match self.menu_state.selected() {
            Some(i) if i + 1 < count => i + 1,
            _ => 0,
        };
        self.menu_state.select(Some(i));
    }

    /// Data index of the selected row.
    pub fn current_row(&self) -> Option<usize> {
        self.table.row_model(&self.view).get(self.selected_row).copied()
    }

    /// Column index of the selected column.
    pub fn current_column(&self) -> Option<usize> {
        self.table
            .visible_columns(&self.view)
            .get(self.selected_column)
            .copied()
    }

    fn sort_selected(&mut self, desc: Option<bool>, multi: bool) {
        let Some(col) = self.current_column() else {
            return;
        };
        if !self.table.column_can_sort(col) {
            self.toast = Some(format!("{} cannot be sorted", self.table.columns[col].label()));
            return;
        }
        let column = self.table.columns[col].id.clone();
        let action = match desc {
            Some(desc) => ViewAction::SetSorting {
                column,
                desc,
                multi,
            },
            None => ViewAction::ToggleSorting {
                column,
                first_desc: self.table.first_sort_desc(col),
                multi,
            },
        };
        self.dispatch(action);
    }

    fn run_row_action(&mut self, action: RowAction) {
        let Some(row) = self.current_row() else {
            return;
        };
        let id = self
            .table
            .data
            .field_index("id")
            .and_then(|f| self.table.data.value(row, f))
            .map(String::from)
            .unwrap_or_else(|| (row + 1).to_string());
        info!("{} requested for row {}", action, id);
        self.toast = Some(format!(
            "{} requested for row id {}. Demo only, nothing changes",
            action, id
        ));
    }

    fn container_block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .borders(self.container.borders)
            .border_type(self.container.border_type)
            .border_style(self.container.border_style)
            .title(Span::styled(title, self.container.title_style))
    }

    pub fn draw_ui<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), Box<dyn Error>> {
        terminal.draw(|f| {
            let size = f.area();

            f.render_widget(Block::default(), size);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ])
                .split(size);

            let top = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(16)])
                .split(chunks[0]);

            {
                let filter_line = if self.view.global_filter.is_empty() && self.focus != Focus::Filter {
                    Line::from(Span::styled(
                        self.placeholder_filter.clone(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else if self.focus == Focus::Filter {
                    Line::from(format!("{}_", self.view.global_filter))
                } else {
                    Line::from(self.view.global_filter.clone())
                };
                let border_style = if self.focus == Focus::Filter {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                let filter = Paragraph::new(filter_line).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border_style)
                        .title("Search (/)"),
                );
                f.render_widget(filter, top[0]);

                let button = Paragraph::new("More columns")
                    .block(Block::default().borders(Borders::ALL).title("c"));
                f.render_widget(button, top[1]);
            }

            let rows = self.table.row_model(&self.view);
            self.layout = LayoutMode::for_width(self.breakpoint, size.width, self.card.is_some());

            match (self.layout, self.card.as_ref()) {
                (LayoutMode::Cards, Some(card)) => {
                    let block = self.container_block("Cards");
                    if rows.is_empty() {
                        let empty = Paragraph::new("No results").block(block);
                        f.render_widget(empty, chunks[1]);
                    } else {
                        let items: Vec<ListItem> = rows
                            .iter()
                            .map(|&row| {
                                let mut lines = card.render(&self.table, row);
                                lines.push(Line::from(""));
                                ListItem::new(Text::from(lines))
                            })
                            .collect();
                        let list = List::new(items)
                            .block(block)
                            .highlight_style(Style::default().bg(Color::Blue))
                            .highlight_symbol("> ");
                        self.card_state.select(Some(self.selected_row));
                        f.render_stateful_widget(list, chunks[1], &mut self.card_state);
                    }
                }
                _ => {
                    let visible = self.table.visible_columns(&self.view);

                    let header_cells = visible.iter().enumerate().map(|(i, &col)| {
                        let style = if i == self.selected_column {
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                                .bg(Color::Blue)
                        } else {
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                        };
                        Cell::from(self.table.heading(col, &self.view)).style(style)
                    });
                    let header = Row::new(header_cells).height(1).bottom_margin(0);

                    let body: Vec<Row> = if rows.is_empty() {
                        vec![Row::new(vec![Cell::from("No results")])]
                    } else {
                        rows.iter()
                            .enumerate()
                            .map(|(pos, &row)| {
                                let cells = visible.iter().enumerate().map(|(i, &col)| {
                                    let text = match self.table.columns[col].cell {
                                        CellKind::Actions => "⋮".to_string(),
                                        CellKind::Value => self.table.cell_value(row, col).to_string(),
                                    };
                                    let mut cell = Cell::from(text);
                                    if pos == self.selected_row && i == self.selected_column {
                                        cell = cell.style(Style::default().bg(Color::LightBlue));
                                    }
                                    cell
                                });
                                Row::new(cells).height(1).bottom_margin(0)
                            })
                            .collect()
                    };

                    let widths = visible
                        .iter()
                        .enumerate()
                        .map(|(i, &col)| {
                            let heading = self.table.heading(col, &self.view).chars().count();
                            let content = if rows.is_empty() && i == 0 {
                                "No results".len()
                            } else {
                                rows.iter()
                                    .map(|&row| self.table.cell_value(row, col).chars().count())
                                    .max()
                                    .unwrap_or(0)
                            };
                            Constraint::Length((heading.max(content) + 2) as u16)
                        })
                        .collect::<Vec<_>>();

                    let table = Table::new(body, &widths)
                        .header(header)
                        .block(self.container_block("Table"))
                        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                        .highlight_symbol("-> ")
                        .column_spacing(2);

                    self.table_state
                        .select(if rows.is_empty() { None } else { Some(self.selected_row) });
                    f.render_stateful_widget(table, chunks[1], &mut self.table_state);
                }
            }

            let status = match &self.toast {
                Some(toast) => Line::from(Span::styled(toast.clone(), Style::default().fg(Color::Green))),
                None => Line::from(format!(
                    "{} of {} rows | / search  c columns  s sort  [ ] asc/desc  x unsort  h hide  enter actions  q quit",
                    rows.len(),
                    self.table.row_count()
                )),
            };
            f.render_widget(Paragraph::new(status), chunks[2]);

            match self.focus {
                Focus::ColumnMenu => {
                    let items: Vec<ListItem> = self
                        .table
                        .hideable_columns()
                        .into_iter()
                        .map(|col| {
                            let column = &self.table.columns[col];
                            let checkbox = if self.view.is_visible(&column.id) { "[x]" } else { "[ ]" };
                            ListItem::new(format!("{} {}", checkbox, column.label()))
                        })
                        .collect();
                    Self::render_popup(
                        f,
                        size,
                        "Columns (space toggle, a all, q close)",
                        items,
                        &mut self.menu_state,
                    );
                }
                Focus::RowActions => {
                    let items: Vec<ListItem> = RowAction::iter()
                        .map(|action| ListItem::new(action.to_string()))
                        .collect();
                    Self::render_popup(f, size, "Actions", items, &mut self.menu_state);
                }
                Focus::Table | Focus::Filter => {}
            }
        })?;
        Ok(())
    }

    fn render_popup(
        f: &mut ratatui::Frame,
        size: Rect,
        title: &str,
        items: Vec<ListItem>,
        state: &mut ListState,
    ) {
        let popup_area = Self::centered_rect(60, 40, size);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Black));

        let inner_area = block.inner(popup_area);

        f.render_widget(Clear, popup_area);
        f.render_widget(block, popup_area);

        let list_height = items.len() as u16;
        let top_padding = (inner_area.height.saturating_sub(list_height)) / 2;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(top_padding),
                Constraint::Length(list_height),
                Constraint::Min(0),
            ])
            .split(inner_area);

        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Yellow).bg(Color::Blue))
            .highlight_symbol(">> ");

        f.render_stateful_widget(list, layout[1], state);
    }

    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Percentage((100 - percent_y) / 2),
                    Constraint::Percentage(percent_y),
                    Constraint::Percentage((100 - percent_y) / 2),
                ]
                .as_ref(),
            )
            .split(r);
        let vertical_chunk = popup_layout[1];
        let horizontal_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                [
                    Constraint::Percentage((100 - percent_x) / 2),
                    Constraint::Percentage(percent_x),
                    Constraint::Percentage((100 - percent_x) / 2),
                ]
                .as_ref(),
            )
            .split(vertical_chunk);
        horizontal_layout[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut TuiApp, codes: &[KeyCode]) {
        for &code in codes {
            assert!(app.handle_key(key(code)));
        }
    }

    fn type_text(app: &mut TuiApp, text: &str) {
        for c in text.chars() {
            assert!(app.handle_key(key(KeyCode::Char(c))));
        }
    }

    fn screen(app: &mut TuiApp, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        app.draw_ui(&mut terminal).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn first_ids(app: &TuiApp) -> Vec<String> {
        app.table
            .row_model(&app.view)
            .iter()
            .map(|&r| app.table.cell_value(r, 0).to_string())
            .collect()
    }

    #[test]
    fn test_wide_terminal_shows_table_without_hidden_column() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        let text = screen(&mut app, 120, 16);
        assert_eq!(app.layout, LayoutMode::Table);
        assert!(text.contains("Nombre"));
        assert!(text.contains("Apellido"));
        assert!(text.contains("Juan"));
        assert!(!text.contains("País"));
        assert!(text.contains("Filter everything except email"));
    }

    #[test]
    fn test_narrow_terminal_shows_cards() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        let text = screen(&mut app, 60, 30);
        assert_eq!(app.layout, LayoutMode::Cards);
        assert!(text.contains("María Gómez"));
        assert!(text.contains("Email: JuanPerez@gmail.com"));
    }

    #[test]
    fn test_narrow_terminal_without_card_keeps_table() {
        let mut app = TuiApp::new(DataTableOptions::new(
            Vec::new(),
            crate::data_loader::sample_data(),
        ));
        screen(&mut app, 60, 16);
        assert_eq!(app.layout, LayoutMode::Table);
    }

    #[test]
    fn test_filter_skips_excluded_email() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        press(&mut app, &[KeyCode::Char('/')]);
        type_text(&mut app, "gmail");
        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(app.view.global_filter, "gmail");
        assert!(first_ids(&app).is_empty());
        assert!(screen(&mut app, 120, 16).contains("No results"));

        press(&mut app, &[KeyCode::Char('/'), KeyCode::Esc]);
        assert_eq!(first_ids(&app), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_filter_ignores_control_chords() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        press(&mut app, &[KeyCode::Char('/')]);
        type_text(&mut app, "ju");
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL)));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::ALT)));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)));
        assert_eq!(app.view.global_filter, "juA");
        assert_eq!(app.focus, Focus::Filter);
    }

    #[test]
    fn test_cards_follow_sorted_and_filtered_rows() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        press(&mut app, &[KeyCode::Right, KeyCode::Char(']')]);
        let text = screen(&mut app, 60, 30);
        assert_eq!(app.layout, LayoutMode::Cards);
        let pedro = text.find("Pedro Martínez").unwrap();
        let maria = text.find("María Gómez").unwrap();
        let juan = text.find("Juan Pérez").unwrap();
        assert!(pedro < maria && maria < juan);

        press(&mut app, &[KeyCode::Char('/')]);
        type_text(&mut app, "brasil");
        let text = screen(&mut app, 60, 30);
        assert!(text.contains("María Gómez"));
        assert!(!text.contains("Pedro Martínez"));
        assert!(!text.contains("Juan Pérez"));
    }

    #[test]
    fn test_sort_selected_column() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        press(&mut app, &[KeyCode::Right, KeyCode::Char(']')]);
        assert_eq!(first_ids(&app), vec!["3", "2", "1"]);

        press(&mut app, &[KeyCode::Char('[')]);
        assert_eq!(first_ids(&app), vec!["1", "2", "3"]);
        assert!(screen(&mut app, 120, 16).contains("Nombre ▲"));

        press(&mut app, &[KeyCode::Char('x')]);
        assert!(app.view.sorting.is_empty());
    }

    #[test]
    fn test_actions_column_cannot_sort() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        // id, nombre, apellido, email, acciones
        press(&mut app, &[KeyCode::Right; 4]);
        press(&mut app, &[KeyCode::Char('s')]);
        assert!(app.view.sorting.is_empty());
        assert_eq!(app.toast.as_deref(), Some("Acciones cannot be sorted"));
    }

    #[test]
    fn test_column_menu_toggles_visibility() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        press(&mut app, &[KeyCode::Char('c')]);
        assert!(screen(&mut app, 120, 30).contains("[ ] País"));

        press(&mut app, &[KeyCode::Down; 4]);
        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.view.is_visible("pais"));
        press(&mut app, &[KeyCode::Char('q')]);
        assert_eq!(app.focus, Focus::Table);
        assert!(screen(&mut app, 120, 16).contains("Perú"));
    }

    #[test]
    fn test_hide_selected_column() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        press(&mut app, &[KeyCode::Right, KeyCode::Char('h')]);
        assert!(!app.view.is_visible("nombre"));
        assert_eq!(app.current_column(), app.table.column_index("apellido"));
    }

    #[test]
    fn test_row_action_shows_toast() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.focus, Focus::RowActions);
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(
            app.toast.as_deref(),
            Some("Delete requested for row id 2. Demo only, nothing changes")
        );
        assert_eq!(app.table.row_count(), 3);
    }

    #[test]
    fn test_quit() {
        let mut app = TuiApp::new(DataTableOptions::demo());
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
    }
}
