use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::core::answer::CitationRegistry;
use crate::core::constants::SAMPLE_QUERY;
use crate::core::markup::{RunKind, StyledRun};
use crate::core::session::{Displayed, QuerySession, RenderedAnswer};
use crate::ui::theme::Theme;
use crate::ui::view::{Focus, ViewState};
use crate::utils::input::sanitize_display_text;

pub const INPUT_TITLE_READY: &str =
    "Ask a legal question (Enter to submit, Alt+Enter for new line, Ctrl+C to quit)";
pub const INPUT_TITLE_BUSY: &str = "Processing...";
const MAX_INPUT_LINES: u16 = 6;

pub fn run_style(kind: RunKind, theme: &Theme) -> Style {
    match kind {
        RunKind::Plain => theme.answer_text_style,
        RunKind::Strong => theme.answer_text_style.add_modifier(theme.strong_modifier),
        RunKind::Emphasis => theme
            .answer_text_style
            .add_modifier(theme.emphasis_modifier),
    }
}

/// Turn styled runs into terminal lines, breaking at embedded newlines.
/// Control characters in the runs are dropped.
pub fn runs_to_lines(runs: &[StyledRun], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for run in runs {
        let style = run_style(run.kind, theme);
        for (idx, piece) in run.text.split('\n').enumerate() {
            if idx > 0 {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
            let piece = sanitize_display_text(piece);
            if !piece.is_empty() {
                current.push(Span::styled(piece, style));
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

/// One list entry per citation: the quote, then its source and paragraph.
pub fn citation_items(citations: CitationRegistry<'_>, theme: &Theme) -> Vec<ListItem<'static>> {
    citations
        .iter()
        .enumerate()
        .map(|(idx, citation)| {
            let quote = Line::from(vec![
                Span::styled(format!("[{}] ", idx + 1), theme.citation_heading_style),
                Span::styled(
                    format!("\"{}\"", sanitize_display_text(citation.quoted_text())),
                    theme.citation_quote_style,
                ),
            ]);
            let source = Line::from(Span::styled(
                format!(
                    "    {} • {}",
                    sanitize_display_text(citation.source_document_id()),
                    sanitize_display_text(citation.paragraph_label())
                ),
                theme.citation_source_style,
            ));
            ListItem::new(vec![quote, source])
        })
        .collect()
}

pub fn input_title(session: &QuerySession) -> &'static str {
    if session.is_busy() {
        INPUT_TITLE_BUSY
    } else {
        INPUT_TITLE_READY
    }
}

/// Inner height of the input box for the current query.
pub fn input_area_height(view: &ViewState) -> u16 {
    u16::try_from(view.input.lines().len())
        .unwrap_or(MAX_INPUT_LINES)
        .clamp(1, MAX_INPUT_LINES)
}

fn answer_paragraph(answer: &RenderedAnswer, theme: &Theme) -> Paragraph<'static> {
    Paragraph::new(Text::from(runs_to_lines(answer.runs(), theme))).wrap(Wrap { trim: false })
}

/// Largest useful scroll offset for an answer shown in a `width` x `height` pane.
///
/// Rows are counted with the same word wrapping the answer pane renders with.
pub fn max_answer_scroll(answer: &RenderedAnswer, theme: &Theme, width: u16, height: u16) -> u16 {
    let total = answer_paragraph(answer, theme).line_count(width.max(1));
    u16::try_from(total)
        .unwrap_or(u16::MAX)
        .saturating_sub(height)
}

/// Inner size of the answer pane for a terminal of the given size.
pub fn answer_pane_size(view: &ViewState, has_citations: bool, term_width: u16, term_height: u16) -> (u16, u16) {
    let body = term_height.saturating_sub(1 + 1 + input_area_height(view) + 2);
    let pane = if has_citations { body * 3 / 5 } else { body };
    (term_width.saturating_sub(2), pane.saturating_sub(2))
}

pub fn ui(f: &mut Frame, view: &ViewState, session: &QuerySession, theme: &Theme, backend: &str) {
    let input_height = input_area_height(view);
    let [title_area, body_area, status_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(input_height + 2),
    ])
    .areas(f.area());

    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let title = format!("Lexi v{} - {}", env!("CARGO_PKG_VERSION"), backend);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(title, theme.title_style))),
        title_area,
    );

    match session.displayed() {
        Displayed::Nothing => render_sample_hint(f, body_area, session, theme),
        Displayed::Answer(answer) => render_answer(f, body_area, view, session, answer, theme),
        Displayed::Failure(reason) => {
            let failure = Paragraph::new(format!("Error: {}", sanitize_display_text(reason)))
                .style(theme.failure_style)
                .block(Block::default().borders(Borders::ALL).title("Answer"))
                .wrap(Wrap { trim: false });
            f.render_widget(failure, body_area);
        }
    }

    if let Some(status) = &view.status {
        let style = if status.is_error {
            theme.status_error_style
        } else {
            theme.status_style
        };
        f.render_widget(
            Paragraph::new(Span::styled(status.text.clone(), style)),
            status_area,
        );
    }

    render_input(f, input_area, view, session, theme);
}

fn render_sample_hint(f: &mut Frame, area: Rect, session: &QuerySession, theme: &Theme) {
    let mut lines = vec![
        Line::from(Span::styled("Try the sample query:", theme.hint_style)),
        Line::from(""),
        Line::from(Span::styled(SAMPLE_QUERY, theme.sample_query_style)),
        Line::from(""),
    ];
    if session.is_busy() {
        lines.push(Line::from(Span::styled(
            "Waiting for the answer...",
            theme.hint_style,
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Press Ctrl+S to use this query.",
            theme.hint_style,
        )));
    }

    let hint = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Answer"))
        .wrap(Wrap { trim: false });
    f.render_widget(hint, area);
}

fn render_answer(
    f: &mut Frame,
    area: Rect,
    view: &ViewState,
    session: &QuerySession,
    answer: &RenderedAnswer,
    theme: &Theme,
) {
    let citations = answer.citations();
    let (answer_area, citations_area) = if citations.is_empty() {
        (area, None)
    } else {
        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
        (top, Some(bottom))
    };

    let title = if session.is_busy() {
        "Answer (previous)"
    } else {
        "Answer"
    };
    let paragraph = answer_paragraph(answer, theme)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((view.answer_scroll, 0));
    f.render_widget(paragraph, answer_area);

    if let Some(citations_area) = citations_area {
        let focused = view.focus == Focus::Citations;
        let hint = if focused {
            "Citations (Up/Down to select, Enter to open, Tab to return)"
        } else {
            "Citations (Tab to select)"
        };
        let mut list = List::new(citation_items(citations, theme))
            .block(Block::default().borders(Borders::ALL).title(hint));
        if focused {
            list = list
                .highlight_style(theme.citation_selected_style)
                .highlight_symbol("> ");
        }
        let mut state = ListState::default().with_selected(Some(view.selected_citation));
        f.render_stateful_widget(list, citations_area, &mut state);
    }
}

fn render_input(
    f: &mut Frame,
    area: Rect,
    view: &ViewState,
    session: &QuerySession,
    theme: &Theme,
) {
    let border_style = if session.is_busy() {
        theme.input_disabled_style
    } else {
        theme.input_border_style
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(input_title(session), theme.input_title_style));
    let inner = block.inner(area);

    f.render_widget(block, area);
    f.render_widget(&view.input, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::answer::{Answer, Citation};
    use crate::core::markup::format_answer;
    use crate::core::session::SessionCommand;
    use ratatui::{backend::TestBackend, style::Modifier, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
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

    fn answered_session() -> QuerySession {
        let mut session = QuerySession::new();
        let Some(SessionCommand::Dispatch(params)) = session.submit("q") else {
            panic!("expected dispatch");
        };
        session.resolve(
            params.submission_id,
            Answer::new(
                "The Court held **10%** applies.",
                vec![Citation::new(
                    "10% of annual income",
                    "Dani_Devi_v_Pritam_Singh.pdf",
                    "Para 7",
                    "https://example.com/doc.pdf",
                )],
            ),
        );
        session
    }

    #[test]
    fn runs_map_to_styled_spans() {
        let theme = Theme::dark_default();
        let lines = runs_to_lines(&format_answer("a **b** *c*"), &theme);

        assert_eq!(lines.len(), 1);
        let spans = &lines[0].spans;
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[1].content, "b");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].content, "c");
        assert!(spans[3].style.add_modifier.contains(Modifier::ITALIC));
        assert!(!spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn embedded_newlines_start_new_lines() {
        let theme = Theme::dark_default();
        let lines = runs_to_lines(&format_answer("first\r\n**second**\n\nlast"), &theme);

        let texts: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(texts, vec!["first", "second", "", "last"]);
    }

    #[test]
    fn empty_answer_still_yields_a_line() {
        let theme = Theme::dark_default();
        assert_eq!(runs_to_lines(&[], &theme).len(), 1);
    }

    #[test]
    fn scroll_limit_follows_word_wrapping() {
        let theme = Theme::dark_default();
        let answer = RenderedAnswer::new(Answer::new("aaa bbb ccc ddd\n**end**", Vec::new()));

        // One word per row at width 5, where splitting by characters gives three.
        assert_eq!(max_answer_scroll(&answer, &theme, 5, 1), 4);
        assert_eq!(max_answer_scroll(&answer, &theme, 80, 1), 1);
        assert_eq!(max_answer_scroll(&answer, &theme, 80, 10), 0);
    }

    #[test]
    fn backend_control_characters_never_reach_spans() {
        let theme = Theme::dark_default();
        let lines = runs_to_lines(&format_answer("ok \u{1b}]0;x\u{7} **bold\u{1b}[2J**"), &theme);
        let text: String = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(text, "ok ]0;x bold[2J");

        let registry_answer = RenderedAnswer::new(Answer::new(
            "a",
            vec![Citation::new(
                "quote\u{1b}]0;x\u{7}",
                "doc\u{1b}[31m.pdf",
                "Para 1\u{8}",
                "https://example.com/a.pdf",
            )],
        ));
        let items = citation_items(registry_answer.citations(), &theme);
        assert_eq!(items.len(), 1);

        let mut terminal = Terminal::new(TestBackend::new(60, 4)).expect("terminal");
        terminal
            .draw(|f| {
                f.render_widget(
                    List::new(citation_items(registry_answer.citations(), &theme)),
                    f.area(),
                )
            })
            .expect("draw");
        let rendered = buffer_text(&terminal);
        assert!(!rendered.contains(|c: char| c.is_control() && c != '\n'));
        assert!(rendered.contains("\"quote]0;x\""));
        assert!(rendered.contains("doc[31m.pdf • Para 1"));
    }

    #[test]
    fn typed_query_is_rendered_in_the_input_box() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        let mut view = ViewState::new();
        view.set_query("Is the claimant entitled?\nSecond line");
        let session = QuerySession::new();
        let theme = Theme::dark_default();
        view.style_input(&theme, true);

        terminal
            .draw(|f| ui(f, &view, &session, &theme, "sample"))
            .expect("draw");

        let text = buffer_text(&terminal);
        assert!(text.contains("Is the claimant entitled?"));
        assert!(text.contains("Second line"));
        assert_eq!(input_area_height(&view), 2);
    }

    #[test]
    fn input_title_reflects_busy_state() {
        let mut session = QuerySession::new();
        assert_eq!(input_title(&session), INPUT_TITLE_READY);
        session.submit("q");
        assert_eq!(input_title(&session), INPUT_TITLE_BUSY);
    }

    #[test]
    fn idle_frame_offers_sample_query() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        let view = ViewState::new();
        let session = QuerySession::new();
        let theme = Theme::dark_default();

        terminal
            .draw(|f| ui(f, &view, &session, &theme, "sample"))
            .expect("draw");

        let text = buffer_text(&terminal);
        assert!(text.contains("Try the sample query"));
        assert!(text.contains("Ctrl+S"));
    }

    #[test]
    fn answered_frame_lists_citation_source_and_paragraph() {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("terminal");
        let view = ViewState::new();
        let session = answered_session();
        let theme = Theme::dark_default();

        terminal
            .draw(|f| ui(f, &view, &session, &theme, "sample"))
            .expect("draw");

        let text = buffer_text(&terminal);
        assert!(text.contains("The Court held 10% applies."));
        assert!(text.contains("Dani_Devi_v_Pritam_Singh.pdf • Para 7"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn busy_frame_shows_processing_title() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).expect("terminal");
        let view = ViewState::new();
        let mut session = answered_session();
        session.submit("another");
        let theme = Theme::dark_default();

        terminal
            .draw(|f| ui(f, &view, &session, &theme, "sample"))
            .expect("draw");

        let text = buffer_text(&terminal);
        assert!(text.contains("Processing..."));
        assert!(text.contains("Answer (previous)"));
    }
}
