//! Event polling, command handling, and redraws for the chat screen.
//!
//! Terminal input is read on a blocking thread and forwarded over a
//! channel, so the runtime stays free for backend calls and redraws.
//! Backend outcomes arrive on the [`QueryService`] channel tagged with
//! their submission id; the session decides whether they still apply.

use std::{error::Error, io, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tui_textarea::CursorMove;

use crate::backend::SharedBackend;
use crate::core::config::data::Config;
use crate::core::constants::SAMPLE_QUERY;
use crate::core::links::{LinkDispatcher, LinkError, LinkOpener};
use crate::core::query_service::{QueryOutcome, QueryService};
use crate::core::session::{apply_action, Displayed, QuerySession, SessionAction, SessionCommand};
use crate::ui::renderer::{answer_pane_size, max_answer_scroll, ui};
use crate::ui::theme::Theme;
use crate::ui::view::{StatusMessage, ViewState};
use crate::utils::input::{sanitize_display_text, sanitize_text_input};

use super::keybindings::{resolve_key, UiCommand};
use super::lifecycle::{restore_terminal, setup_terminal};

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// Terminal dimensions used for scroll limits.
#[derive(Debug, Clone, Copy)]
pub struct TermSize {
    pub width: u16,
    pub height: u16,
}

fn citation_count(session: &QuerySession) -> usize {
    match session.displayed() {
        Displayed::Answer(answer) => answer.citations().len(),
        _ => 0,
    }
}

fn answer_scroll_limit(view: &ViewState, session: &QuerySession, theme: &Theme, size: TermSize) -> (u16, u16) {
    match session.displayed() {
        Displayed::Answer(answer) => {
            let (width, height) =
                answer_pane_size(view, !answer.citations().is_empty(), size.width, size.height);
            (max_answer_scroll(answer, theme, width, height), height.max(1))
        }
        _ => (0, 1),
    }
}

fn open_selected<O: LinkOpener>(
    view: &mut ViewState,
    session: &QuerySession,
    links: &LinkDispatcher<O>,
) {
    let Displayed::Answer(answer) = session.displayed() else {
        return;
    };
    let Some(citation) = answer.citations().get(view.selected_citation) else {
        return;
    };

    view.status = Some(match links.open(citation) {
        Ok(opened) => StatusMessage::info(sanitize_display_text(&format!(
            "Opened {} • {} ({})",
            citation.source_document_id(),
            citation.paragraph_label(),
            opened.url
        ))),
        Err(err @ LinkError::Invalid(_)) => {
            StatusMessage::error(sanitize_display_text(&format!("Cannot open citation: {err}")))
        }
        Err(err) => StatusMessage::error(sanitize_display_text(&err.to_string())),
    });
}

/// Apply one UI command. Returns the backend work the session asked for.
pub fn handle_ui_command<O: LinkOpener>(
    command: UiCommand,
    view: &mut ViewState,
    session: &mut QuerySession,
    links: &LinkDispatcher<O>,
    theme: &Theme,
    size: TermSize,
) -> Option<SessionCommand> {
    if command.edits_input() && session.is_busy() {
        debug!(?command, "Input is disabled while a query is processing");
        return None;
    }

    match command {
        UiCommand::Quit => view.exit_requested = true,
        UiCommand::Submit => {
            let query = view.query_text();
            let dispatch = apply_action(session, SessionAction::Submit { query });
            if dispatch.is_some() {
                view.status = None;
            }
            return dispatch;
        }
        UiCommand::InsertSample => view.set_query(SAMPLE_QUERY),
        UiCommand::Insert(c) => view.input.insert_char(c),
        UiCommand::Newline => view.input.insert_newline(),
        UiCommand::Backspace => {
            view.input.delete_char();
        }
        UiCommand::Delete => {
            view.input.delete_next_char();
        }
        UiCommand::CursorLeft => view.input.move_cursor(CursorMove::Back),
        UiCommand::CursorRight => view.input.move_cursor(CursorMove::Forward),
        UiCommand::CursorHome => view.input.move_cursor(CursorMove::Head),
        UiCommand::CursorEnd => view.input.move_cursor(CursorMove::End),
        UiCommand::ToggleFocus => view.toggle_focus(citation_count(session)),
        UiCommand::SelectPrevious => view.select_previous(),
        UiCommand::SelectNext => view.select_next(citation_count(session)),
        UiCommand::OpenSelected => open_selected(view, session, links),
        UiCommand::ScrollUp => view.scroll_up(1),
        UiCommand::ScrollDown => {
            let (max_scroll, _) = answer_scroll_limit(view, session, theme, size);
            view.scroll_down(1, max_scroll);
        }
        UiCommand::PageUp => {
            let (_, page) = answer_scroll_limit(view, session, theme, size);
            view.scroll_up(page);
        }
        UiCommand::PageDown => {
            let (max_scroll, page) = answer_scroll_limit(view, session, theme, size);
            view.scroll_down(page, max_scroll);
        }
    }
    None
}

/// Hand backend outcomes to the session as actions. The view only resets
/// for the outcome of the submission in flight.
fn process_query_outcomes(
    rx: &mut mpsc::UnboundedReceiver<(QueryOutcome, u64)>,
    view: &mut ViewState,
    session: &mut QuerySession,
) -> bool {
    let mut received_any = false;
    while let Ok((outcome, submission_id)) = rx.try_recv() {
        received_any = true;
        let current = session.in_flight() == Some(submission_id);
        apply_action(session, outcome.into_action(submission_id));
        if current {
            view.reset_for_outcome(citation_count(session));
        }
    }
    received_any
}

fn poll_terminal_event() -> io::Result<Option<Event>> {
    if event::poll(Duration::from_millis(10))? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Forward events from `next_event` until the receiver goes away.
///
/// `next_event` blocks, so it runs on the blocking pool rather than on a
/// runtime worker.
fn spawn_event_reader<F>(
    event_tx: mpsc::UnboundedSender<UiEvent>,
    mut next_event: F,
) -> tokio::task::JoinHandle<()>
where
    F: FnMut() -> io::Result<Option<Event>> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        while !event_tx.is_closed() {
            match next_event() {
                Ok(Some(ev)) => {
                    if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => warn!(error = %err, "Failed to read terminal event"),
            }
        }
    })
}

pub async fn run_chat(config: &Config, backend: SharedBackend) -> Result<(), Box<dyn Error>> {
    let theme = Theme::from_name(config.theme.as_deref());
    let (query_service, mut outcome_rx) = QueryService::new(backend);
    let backend_name = query_service.backend_name().to_string();
    let links = LinkDispatcher::system();
    let mut session = QuerySession::new();
    let mut view = ViewState::new();

    info!(backend = %backend_name, "Starting chat session");

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx, poll_terminal_event);

    let mut request_redraw = true;
    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if request_redraw {
            view.style_input(&theme, !session.is_busy());
            if let Err(err) =
                terminal.draw(|f| ui(f, &view, &session, &theme, &backend_name))
            {
                break 'main_loop Err(err.into());
            }
            request_redraw = false;
        }

        let size = match terminal.size() {
            Ok(size) => TermSize {
                width: size.width,
                height: size.height,
            },
            Err(err) => break 'main_loop Err(err.into()),
        };

        let mut events_processed = false;
        while let Ok(UiEvent::Crossterm(ev)) = event_rx.try_recv() {
            events_processed = true;
            let command = match ev {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match resolve_key(&key, view.focus) {
                        Some(command) => {
                            handle_ui_command(command, &mut view, &mut session, &links, &theme, size)
                        }
                        None => None,
                    }
                }
                Event::Paste(text) if !session.is_busy() => {
                    view.insert_text(&sanitize_text_input(&text));
                    None
                }
                _ => None,
            };

            if let Some(SessionCommand::Dispatch(params)) = command {
                query_service.spawn_query(params);
            }
            if view.exit_requested {
                break 'main_loop Ok(());
            }
        }

        let received_any = process_query_outcomes(&mut outcome_rx, &mut view, &mut session);
        if events_processed || received_any {
            request_redraw = true;
        } else {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    };

    // The reader stops once it sees the closed channel.
    drop(event_rx);
    if let Err(err) = event_reader_handle.await {
        debug!(error = %err, "Event reader ended abnormally");
    }
    restore_terminal(&mut terminal)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::answer::{Answer, Citation};
    use crate::core::links::test_support::RecordingOpener;
    use crate::ui::view::Focus;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Instant;

    const SIZE: TermSize = TermSize {
        width: 80,
        height: 24,
    };

    fn run(
        commands: impl IntoIterator<Item = UiCommand>,
        view: &mut ViewState,
        session: &mut QuerySession,
        links: &LinkDispatcher<RecordingOpener>,
    ) -> Vec<SessionCommand> {
        let theme = Theme::dark_default();
        commands
            .into_iter()
            .filter_map(|command| handle_ui_command(command, view, session, links, &theme, SIZE))
            .collect()
    }

    fn answer_with_links(links: &[&str]) -> Answer {
        let citations = links
            .iter()
            .enumerate()
            .map(|(idx, link)| {
                Citation::new(
                    format!("quote {idx}"),
                    format!("doc{idx}.pdf"),
                    format!("Para {}", idx + 1),
                    *link,
                )
            })
            .collect();
        Answer::new("The **holding**.", citations)
    }

    fn answered(
        view: &mut ViewState,
        session: &mut QuerySession,
        links: &LinkDispatcher<RecordingOpener>,
        answer: Answer,
    ) {
        let dispatched = run(
            [UiCommand::Insert('q'), UiCommand::Submit],
            view,
            session,
            links,
        );
        let [SessionCommand::Dispatch(params)] = dispatched.as_slice() else {
            panic!("expected one dispatch");
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send((QueryOutcome::Answered(answer), params.submission_id))
            .expect("send");
        assert!(process_query_outcomes(&mut rx, view, session));
    }

    #[test]
    fn sample_query_fills_input_and_submits() {
        let links = LinkDispatcher::new(RecordingOpener::default());
        let mut view = ViewState::new();
        let mut session = QuerySession::new();

        let dispatched = run(
            [UiCommand::InsertSample, UiCommand::Submit],
            &mut view,
            &mut session,
            &links,
        );

        match dispatched.as_slice() {
            [SessionCommand::Dispatch(params)] => assert_eq!(params.request.query, SAMPLE_QUERY),
            other => panic!("unexpected commands {other:?}"),
        }
        assert_eq!(view.query_text(), SAMPLE_QUERY);
    }

    #[test]
    fn blank_submit_dispatches_nothing() {
        let links = LinkDispatcher::new(RecordingOpener::default());
        let mut view = ViewState::new();
        let mut session = QuerySession::new();

        let dispatched = run(
            [UiCommand::Insert(' '), UiCommand::Newline, UiCommand::Submit],
            &mut view,
            &mut session,
            &links,
        );
        assert!(dispatched.is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn input_is_frozen_while_processing() {
        let links = LinkDispatcher::new(RecordingOpener::default());
        let mut view = ViewState::new();
        let mut session = QuerySession::new();

        let dispatched = run(
            [
                UiCommand::Insert('q'),
                UiCommand::Submit,
                UiCommand::Insert('x'),
                UiCommand::Backspace,
                UiCommand::InsertSample,
                UiCommand::Submit,
            ],
            &mut view,
            &mut session,
            &links,
        );

        assert_eq!(dispatched.len(), 1);
        assert_eq!(view.query_text(), "q");
        assert!(session.is_busy());
    }

    #[test]
    fn opening_selected_citation_reports_status_without_touching_session() {
        let links = LinkDispatcher::new(RecordingOpener::default());
        let mut view = ViewState::new();
        let mut session = QuerySession::new();
        answered(
            &mut view,
            &mut session,
            &links,
            answer_with_links(&["https://a.test/0.pdf", "https://a.test/1.pdf"]),
        );
        let before = session.state().clone();

        run(
            [
                UiCommand::ToggleFocus,
                UiCommand::SelectNext,
                UiCommand::SelectNext,
                UiCommand::OpenSelected,
            ],
            &mut view,
            &mut session,
            &links,
        );

        assert_eq!(view.focus, Focus::Citations);
        assert_eq!(
            *links.opener().opened.borrow(),
            vec!["https://a.test/1.pdf".to_string()]
        );
        let status = view.status.clone().expect("status");
        assert!(!status.is_error);
        assert!(status.text.contains("doc1.pdf • Para 2"));
        assert_eq!(*session.state(), before);
    }

    #[test]
    fn invalid_citation_link_shows_error_status() {
        let links = LinkDispatcher::new(RecordingOpener::default());
        let mut view = ViewState::new();
        let mut session = QuerySession::new();
        answered(
            &mut view,
            &mut session,
            &links,
            answer_with_links(&["javascript:alert(1)"]),
        );
        let before = session.state().clone();

        run(
            [UiCommand::ToggleFocus, UiCommand::OpenSelected],
            &mut view,
            &mut session,
            &links,
        );

        let status = view.status.clone().expect("status");
        assert!(status.is_error);
        assert!(status.text.starts_with("Cannot open citation"));
        assert!(links.opener().opened.borrow().is_empty());
        assert_eq!(*session.state(), before);
    }

    #[test]
    fn stale_outcomes_do_not_reset_view() {
        let links = LinkDispatcher::new(RecordingOpener::default());
        let mut view = ViewState::new();
        let mut session = QuerySession::new();
        answered(
            &mut view,
            &mut session,
            &links,
            answer_with_links(&["https://a.test/0.pdf", "https://a.test/1.pdf"]),
        );
        view.selected_citation = 1;

        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send((QueryOutcome::Failed("late".into()), 99)).expect("send");
        assert!(process_query_outcomes(&mut rx, &mut view, &mut session));

        assert_eq!(view.selected_citation, 1);
        assert!(matches!(session.displayed(), Displayed::Answer(_)));
    }

    #[test]
    fn editing_commands_drive_the_textarea() {
        let links = LinkDispatcher::new(RecordingOpener::default());
        let mut view = ViewState::new();
        let mut session = QuerySession::new();

        run(
            "aged 54–55"
                .chars()
                .map(UiCommand::Insert)
                .chain([
                    UiCommand::CursorLeft,
                    UiCommand::CursorLeft,
                    UiCommand::Backspace,
                    UiCommand::Delete,
                    UiCommand::CursorHome,
                    UiCommand::Insert('>'),
                    UiCommand::CursorEnd,
                    UiCommand::Newline,
                    UiCommand::Insert('x'),
                ]),
            &mut view,
            &mut session,
            &links,
        );

        assert_eq!(view.query_text(), ">aged 545\nx");
    }

    #[tokio::test]
    async fn event_reader_does_not_block_the_runtime() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reader = spawn_event_reader(tx, || {
            std::thread::sleep(Duration::from_millis(100));
            Ok(Some(Event::Key(KeyEvent::new(
                KeyCode::Char('q'),
                KeyModifiers::NONE,
            ))))
        });

        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(started.elapsed() < Duration::from_millis(80));

        let UiEvent::Crossterm(ev) = rx.recv().await.expect("event");
        assert!(matches!(ev, Event::Key(key) if key.code == KeyCode::Char('q')));

        drop(rx);
        reader.await.expect("reader stops once the receiver is gone");
    }
}
