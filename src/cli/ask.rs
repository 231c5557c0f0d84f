//! TUI-less `ask` command: one query, printed answer, optional citation open.

use std::error::Error;
use std::io::{self, IsTerminal, Write};

use ratatui::crossterm::style::Stylize;

use crate::backend::SharedBackend;
use crate::core::links::{LinkDispatcher, LinkOpener, Opened};
use crate::core::markup::RunKind;
use crate::core::query_service::run_query;
use crate::core::session::{
    apply_action, Displayed, QuerySession, RenderedAnswer, SessionAction, SessionCommand,
};
use crate::utils::input::sanitize_display_text;

/// Print the narrative runs followed by numbered citations.
///
/// Backend text is written with control characters removed.
pub fn write_answer<W: Write>(out: &mut W, answer: &RenderedAnswer, styled: bool) -> io::Result<()> {
    for run in answer.runs() {
        let text = sanitize_display_text(&run.text);
        let text = text.as_str();
        match (run.kind, styled) {
            (RunKind::Strong, true) => write!(out, "{}", text.bold())?,
            (RunKind::Emphasis, true) => write!(out, "{}", text.italic())?,
            _ => write!(out, "{text}")?,
        }
    }
    writeln!(out)?;

    let citations = answer.citations();
    if citations.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Citations:")?;
    for (idx, citation) in citations.iter().enumerate() {
        writeln!(
            out,
            "[{}] \"{}\"",
            idx + 1,
            sanitize_display_text(citation.quoted_text())
        )?;
        writeln!(
            out,
            "    {} • {}",
            sanitize_display_text(citation.source_document_id()),
            sanitize_display_text(citation.paragraph_label())
        )?;
        writeln!(out, "    {}", sanitize_display_text(citation.external_link()))?;
    }
    Ok(())
}

/// Open the 1-based citation `number` of `answer`.
pub fn open_citation<O: LinkOpener>(
    answer: &RenderedAnswer,
    number: usize,
    links: &LinkDispatcher<O>,
) -> Result<Opened, Box<dyn Error>> {
    let citations = answer.citations();
    let citation = number
        .checked_sub(1)
        .and_then(|idx| citations.get(idx))
        .ok_or_else(|| {
            format!(
                "Citation {number} does not exist (the answer has {})",
                citations.len()
            )
        })?;
    Ok(links.open(citation)?)
}

pub async fn run_ask(
    query: Vec<String>,
    open: Option<usize>,
    backend: SharedBackend,
) -> Result<(), Box<dyn Error>> {
    let query = query.join(" ");
    let mut session = QuerySession::new();
    let Some(SessionCommand::Dispatch(params)) =
        apply_action(&mut session, SessionAction::Submit { query })
    else {
        return Err("Usage: lexi ask <query>".into());
    };

    let outcome = run_query(backend, params.request).await;
    apply_action(&mut session, outcome.into_action(params.submission_id));

    match session.displayed() {
        Displayed::Answer(answer) => {
            let stdout = io::stdout();
            let styled = stdout.is_terminal();
            let mut out = stdout.lock();
            write_answer(&mut out, answer, styled)?;
            out.flush()?;

            if let Some(number) = open {
                let opened = open_citation(answer, number, &LinkDispatcher::system())?;
                println!("Opened {}", sanitize_display_text(&opened.url));
            }
            Ok(())
        }
        Displayed::Failure(reason) => Err(sanitize_display_text(reason).into()),
        Displayed::Nothing => Err("The query produced no answer".into()),
    }
}
