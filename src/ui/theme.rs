use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    pub title_style: Style,

    // Answer pane
    pub answer_text_style: Style,
    pub strong_modifier: Modifier,
    pub emphasis_modifier: Modifier,
    pub failure_style: Style,
    pub hint_style: Style,
    pub sample_query_style: Style,

    // Citations
    pub citation_heading_style: Style,
    pub citation_quote_style: Style,
    pub citation_source_style: Style,
    pub citation_selected_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_disabled_style: Style,
    pub input_cursor_style: Style,

    pub status_style: Style,
    pub status_error_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            title_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            answer_text_style: Style::default().fg(Color::White),
            strong_modifier: Modifier::BOLD,
            emphasis_modifier: Modifier::ITALIC,
            failure_style: Style::default().fg(Color::LightRed),
            hint_style: Style::default().fg(Color::DarkGray),
            sample_query_style: Style::default().fg(Color::Gray),

            citation_heading_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            citation_quote_style: Style::default().fg(Color::Gray),
            citation_source_style: Style::default().fg(Color::LightBlue),
            citation_selected_style: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),

            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            input_disabled_style: Style::default().fg(Color::DarkGray),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),

            status_style: Style::default().fg(Color::Green),
            status_error_style: Style::default().fg(Color::LightRed),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            title_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            answer_text_style: Style::default().fg(Color::Black),
            strong_modifier: Modifier::BOLD,
            emphasis_modifier: Modifier::ITALIC,
            failure_style: Style::default().fg(Color::Red),
            hint_style: Style::default().fg(Color::Gray),
            sample_query_style: Style::default().fg(Color::DarkGray),

            citation_heading_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            citation_quote_style: Style::default().fg(Color::DarkGray),
            citation_source_style: Style::default().fg(Color::Blue),
            citation_selected_style: Style::default()
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),

            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
            input_disabled_style: Style::default().fg(Color::Gray),
            input_cursor_style: Style::default().add_modifier(Modifier::REVERSED),

            status_style: Style::default().fg(Color::Green),
            status_error_style: Style::default().fg(Color::Red),
        }
    }

    /// Resolve a configured theme name, falling back to dark.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|name| name.trim().to_ascii_lowercase()).as_deref() {
            Some("light") => Theme::light(),
            _ => Theme::dark_default(),
        }
    }
}
