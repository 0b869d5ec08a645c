use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table},
};
use tracing::trace;

use crate::model::UIData;

pub const SEARCH_HEIGHT: u16 = 3;
pub const TOGGLES_HEIGHT: u16 = 3;
pub const PAGINATION_HEIGHT: u16 = 1;
pub const STATUSLINE_HEIGHT: u16 = 1;
pub const COLUMN_WIDTH_MARGIN: usize = 1;
const SEARCH_PLACEHOLDER: &str = "Search by name...";

#[derive(Debug, Default)]
pub struct TableUI;

impl TableUI {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, uidata: &UIData, frame: &mut Frame) {
        let [search_area, toggles_area, table_area, pagination_area, status_area] =
            Layout::vertical([
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Length(TOGGLES_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(PAGINATION_HEIGHT),
                Constraint::Length(STATUSLINE_HEIGHT),
            ])
            .areas(frame.area());
        trace!("Table area {:?}", table_area);

        self.draw_search(uidata, frame, search_area);
        self.draw_toggles(uidata, frame, toggles_area);
        self.draw_table(uidata, frame, table_area);
        frame.render_widget(Paragraph::new(Self::pagination_line(uidata)), pagination_area);
        frame.render_widget(
            Paragraph::new(uidata.status_message.as_str()).style(Style::default().fg(Color::Gray)),
            status_area,
        );

        if uidata.show_popup {
            self.draw_popup(uidata, frame);
        }
    }

    fn draw_search(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(" Search ");
        let search = &uidata.search;
        let line = if search.input.is_empty() && !uidata.active_cmdinput {
            Line::from(SEARCH_PLACEHOLDER.dark_gray())
        } else {
            Line::from(search.input.as_str())
        };
        let block = if uidata.active_cmdinput {
            block.border_style(Style::default().fg(Color::Yellow))
        } else {
            block
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if uidata.active_cmdinput {
            let x = area.x + 1 + search.curser_pos as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }

    fn draw_toggles(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::with_capacity(uidata.toggles.len() * 2);
        for (idx, toggle) in uidata.toggles.iter().enumerate() {
            let check = if toggle.visible { "[x] " } else { "[ ] " };
            let mut style = Style::default();
            if idx == uidata.selected_column {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if !toggle.sortable {
                style = style.add_modifier(Modifier::ITALIC);
            }
            spans.push(Span::styled(format!("{check}{}", toggle.label), style));
            spans.push(Span::raw("  "));
        }
        let block = Block::bordered().title(" Columns ");
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn draw_table(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let title = Line::from(Span::from(format!(" {} ", uidata.name)).bold());
        let block = Block::bordered()
            .title(title.centered())
            .border_set(border::THICK);

        if uidata.table.is_empty() || uidata.nrows == 0 {
            let message = if uidata.table.is_empty() {
                "All columns are hidden"
            } else {
                "No records found"
            };
            frame.render_widget(
                Paragraph::new(message.yellow()).centered().block(block),
                area,
            );
            return;
        }

        // The focused column is only highlighted if it is visible
        let selected = uidata
            .toggles
            .get(uidata.selected_column)
            .filter(|t| t.visible)
            .map(|_| {
                uidata.toggles[..uidata.selected_column]
                    .iter()
                    .filter(|t| t.visible)
                    .count()
            });

        let header = Row::new(uidata.table.iter().enumerate().map(|(cidx, column)| {
            let style = if Some(cidx) == selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            };
            Cell::from(column.name.clone()).style(style)
        }));

        let nrows = uidata.table[0].data.len();
        let rows = (0..nrows).map(|ridx| {
            Row::new(
                uidata
                    .table
                    .iter()
                    .map(|column| Cell::from(column.data[ridx].clone())),
            )
        });

        let widths: Vec<Constraint> = uidata
            .table
            .iter()
            .map(|c| Constraint::Length((c.width + COLUMN_WIDTH_MARGIN) as u16))
            .collect();

        let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
        frame.render_widget(table, area);
    }

    fn draw_popup(&self, uidata: &UIData, frame: &mut Frame) {
        let text = Text::from(uidata.popup_message.as_str());
        let height = text.height() as u16 + 2;
        let width = text.width() as u16 + 4;
        let area = Self::popup_area(frame.area(), width, height);

        let block = Block::bordered()
            .title(Line::from(" Help ".bold()).centered())
            .title_bottom(Line::from(" <Esc> close ".blue()).centered())
            .border_set(border::ROUNDED);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
        let [area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        area
    }

    fn button(label: &'static str, enabled: bool) -> Span<'static> {
        if enabled {
            label.blue().bold()
        } else {
            label.dark_gray()
        }
    }

    fn pagination_line(uidata: &UIData) -> Line<'static> {
        // An empty result reads "page 1 of 0"
        let current = uidata.page_index + 1;
        Line::from(vec![
            Self::button("<<", uidata.has_previous),
            " ".into(),
            Self::button("<", uidata.has_previous),
            " ".into(),
            Self::button(">", uidata.has_next),
            " ".into(),
            Self::button(">>", uidata.has_next),
            "  Page ".into(),
            Span::from(format!("{current} of {}", uidata.page_count)).bold(),
            Span::from(format!("  Show {}", uidata.page_size)),
            Span::from(format!("  ({} of {} records)", uidata.nrows, uidata.total_rows)).dark_gray(),
        ])
    }
}

/// Renders the current page as plain text, one line per row.
pub fn render_plain(uidata: &UIData) -> String {
    let mut lines = Vec::new();
    let pad = |s: &str, width: usize| format!("{s:<width$}");

    let header: Vec<String> = uidata.table.iter().map(|c| pad(&c.name, c.width)).collect();
    lines.push(header.join(" ").trim_end().to_string());

    let nrows = uidata.table.first().map(|c| c.data.len()).unwrap_or(0);
    for ridx in 0..nrows {
        let row: Vec<String> = uidata
            .table
            .iter()
            .map(|c| pad(&c.data[ridx], c.width))
            .collect();
        lines.push(row.join(" ").trim_end().to_string());
    }

    lines.push(format!(
        "Page {} of {} ({} of {} records)",
        uidata.page_index + 1,
        uidata.page_count,
        uidata.nrows,
        uidata.total_rows
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{User, sample_users, user_columns};
    use crate::domain::{Message, TVConfig};
    use crate::model::Model;
    use crate::table::Table;
    use ratatui::{Terminal, backend::TestBackend};

    fn model() -> Model<User> {
        Model::init(&TVConfig::default(), Table::new(user_columns(), sample_users())).unwrap()
    }

    fn screen(uidata: &UIData) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| TableUI::new().draw(uidata, f)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_first_page() {
        let out = screen(&model().uidata());
        assert!(out.contains(SEARCH_PLACEHOLDER));
        assert!(out.contains("[x] ID"));
        assert!(out.contains("[x] Idade"));
        assert!(out.contains("maria@example.com"));
        assert!(out.contains("lucas@example.com"));
        assert!(!out.contains("carla@example.com"));
        assert!(out.contains("Page 1 of 2"));
        assert!(out.contains("Show 5"));
    }

    #[test]
    fn hidden_column_is_not_rendered() {
        let mut model = model();
        model.update(Some(Message::MoveRight)).unwrap();
        model.update(Some(Message::MoveRight)).unwrap();
        model.update(Some(Message::ToggleColumnState)).unwrap();
        let out = screen(&model.uidata());
        assert!(out.contains("[ ] Idade"));
        assert_eq!(out.matches("Idade").count(), 1);
        assert!(out.contains("Page 1 of 2"));
    }

    #[test]
    fn renders_help_popup() {
        let mut model = model();
        model.update(Some(Message::Help)).unwrap();
        let out = screen(&model.uidata());
        assert!(out.contains(" Help "));
        assert!(out.contains("Change page size"));
    }

    #[test]
    fn renders_empty_result() {
        let cfg = TVConfig::default().with_search("zzz");
        let model = Model::init(&cfg, Table::new(user_columns(), sample_users())).unwrap();
        let out = screen(&model.uidata());
        assert!(out.contains("No records found"));
        assert!(out.contains("Page 1 of 0"));
    }

    #[test]
    fn plain_rendering() {
        let cfg = TVConfig::default().with_sort("name").with_hidden(vec!["email".to_string()]);
        let model = Model::init(&cfg, Table::new(user_columns(), sample_users())).unwrap();
        let text = render_plain(&model.uidata());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID Nome ▲ Idade");
        assert_eq!(lines[1], "4  Ana    28");
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[6], "Page 1 of 2 (6 of 6 records)");
    }
}
