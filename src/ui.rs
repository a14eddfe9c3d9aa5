use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Rows needed to show `text` wrapped at `width` columns
fn occupied_lines(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let cols = text.width().max(1) as f64;
    (cols / width as f64).ceil().max(1.0) as u16
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let player = session.player();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let flash = session.display_text().trim();
        let usable_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
        let flash_lines = occupied_lines(flash, usable_width).min(area.height);
        let padding = area.height.saturating_sub(flash_lines + 2 + VERTICAL_MARGIN) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(flash_lines),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let flash_style = match self.state() {
            AppState::Paused => bold_style.add_modifier(Modifier::DIM),
            _ => bold_style,
        };

        Paragraph::new(Span::styled(flash, flash_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);

        let status = match self.state() {
            AppState::Reading => Span::styled("reading", Style::default().fg(Color::Green)),
            AppState::Paused => Span::styled("paused", Style::default().fg(Color::Yellow)),
            AppState::Finished => Span::styled("done", Style::default().fg(Color::Cyan)),
        };

        let progress = Line::from(vec![
            status,
            Span::styled(
                format!(
                    "  {}/{}  ·  {} words  ·  {} wpm  ·  {} per flash",
                    player.index(),
                    player.len(),
                    player.flashes().word_count(),
                    session.config.words_per_minute,
                    session.config.words_per_flash
                ),
                dim_style,
            ),
        ]);

        Paragraph::new(progress)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let legend = match self.state() {
            AppState::Finished => "(r)estart / (esc)ape",
            AppState::Paused => "(space) resume / (r)estart / (esc)ape",
            AppState::Reading => "(space) pause / (r)estart / (esc)ape",
        };

        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::FlushMode;
    use crate::session::{Session, SessionConfig, PLACEHOLDER};

    fn render(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app(text: &str) -> App {
        let config = SessionConfig::new(2, 300.0, FlushMode::Drop).unwrap();
        App::new(Session::new(Some(text), config).unwrap())
    }

    #[test]
    fn shows_placeholder_before_first_tick() {
        let screen = render(&app("alpha beta"), 80, 12);
        assert!(screen.contains(PLACEHOLDER));
        assert!(screen.contains("0/1"));
    }

    #[test]
    fn shows_current_flash_and_progress() {
        let mut app = app("alpha beta gamma delta");
        app.on_tick(app.session.generation());

        let screen = render(&app, 80, 12);
        assert!(screen.contains("alpha beta"));
        assert!(screen.contains("1/2"));
        assert!(screen.contains("300 wpm"));
    }

    #[test]
    fn shows_done_status() {
        let mut app = app("alpha");
        app.on_tick(app.session.generation());

        let screen = render(&app, 80, 12);
        assert!(screen.contains("done"));
        assert!(screen.contains("(r)estart"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let mut app = app("alpha beta");
        app.on_tick(app.session.generation());
        render(&app, 4, 2);
    }

    #[test]
    fn occupied_lines_wraps() {
        assert_eq!(occupied_lines("", 10), 1);
        assert_eq!(occupied_lines("abcdefghij", 10), 1);
        assert_eq!(occupied_lines("abcdefghijk", 10), 2);
        assert_eq!(occupied_lines("abc", 0), 1);
    }
}
