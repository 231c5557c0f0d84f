//! Opening citation links outside the session.
//!
//! A citation's link is only trusted after it parses as an absolute
//! `http`/`https` URL. Opening hands the link, exactly as the citation
//! carries it, to a [`LinkOpener`]. In production that launches the
//! platform browser as a separate process; a background task waits on the
//! launcher so it is reaped once it exits.

use std::io;
use std::process::Stdio;

use reqwest::Url;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::core::answer::Citation;

const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

#[derive(Debug, thiserror::Error)]
pub enum InvalidLinkError {
    #[error("citation link {link:?} is not a valid absolute URL: {reason}")]
    Malformed { link: String, reason: String },
    #[error("citation link {link:?} uses unsupported scheme '{scheme}'")]
    UnsupportedScheme { link: String, scheme: String },
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error(transparent)]
    Invalid(#[from] InvalidLinkError),
    #[error("failed to open {url}: {source}")]
    Launch {
        url: String,
        #[source]
        source: io::Error,
    },
}

impl LinkError {
    pub fn is_invalid(&self) -> bool {
        matches!(self, LinkError::Invalid(_))
    }
}

/// Confirmation that a link was handed off to the opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub url: String,
}

/// Something that can show a validated link to the user.
pub trait LinkOpener {
    fn open(&self, link: &str) -> io::Result<()>;
}

/// Launches the system browser without waiting for it to exit.
///
/// Must be called from inside a Tokio runtime, which reaps the launcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOpener;

impl LinkOpener for BrowserOpener {
    fn open(&self, link: &str) -> io::Result<()> {
        spawn_reaped(launcher_command(link)).map(|_| ())
    }
}

/// Start `command` detached from the terminal and wait for it on a task.
/// Returns the child's process id.
fn spawn_reaped(mut command: Command) -> io::Result<Option<u32>> {
    let handle = tokio::runtime::Handle::try_current().map_err(io::Error::other)?;
    let _guard = handle.enter();

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();

    handle.spawn(async move {
        match child.wait().await {
            Ok(status) => debug!(?pid, %status, "Link launcher exited"),
            Err(err) => warn!(?pid, error = %err, "Failed to wait for link launcher"),
        }
    });
    Ok(pid)
}

#[cfg(target_os = "macos")]
fn launcher_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn launcher_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

/// Parse and check a raw citation link.
pub fn validate_link(link: &str) -> Result<Url, InvalidLinkError> {
    let url = Url::parse(link.trim()).map_err(|err| InvalidLinkError::Malformed {
        link: link.to_string(),
        reason: err.to_string(),
    })?;

    if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
        return Err(InvalidLinkError::UnsupportedScheme {
            link: link.to_string(),
            scheme: url.scheme().to_string(),
        });
    }

    Ok(url)
}

/// Validates citation links and passes them to an opener.
#[derive(Debug, Clone, Default)]
pub struct LinkDispatcher<O = BrowserOpener> {
    opener: O,
}

impl LinkDispatcher<BrowserOpener> {
    pub fn system() -> Self {
        Self {
            opener: BrowserOpener,
        }
    }
}

impl<O: LinkOpener> LinkDispatcher<O> {
    pub fn new(opener: O) -> Self {
        Self { opener }
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Open the citation's link as written, once it validates.
    pub fn open(&self, citation: &Citation) -> Result<Opened, LinkError> {
        let link = citation.external_link().trim();
        validate_link(link).inspect_err(|err| {
            warn!(document = %citation.source_document_id(), error = %err, "Rejected citation link");
        })?;

        debug!(link, "Opening citation link");
        self.opener
            .open(link)
            .map_err(|source| LinkError::Launch {
                url: link.to_string(),
                source,
            })?;
        Ok(Opened {
            url: link.to_string(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingOpener;
    use super::*;

    fn citation_with_link(link: &str) -> Citation {
        Citation::new("quote", "doc.pdf", "Para 1", link)
    }

    #[test]
    fn valid_https_link_is_dispatched_verbatim() {
        let link = "https://lexisingapore-my.sharepoint.com/:b:/g/personal/doc?e=TEu4vz";
        let dispatcher = LinkDispatcher::new(RecordingOpener::default());

        let opened = dispatcher
            .open(&citation_with_link(link))
            .expect("link should open");

        assert_eq!(opened.url, link);
        assert_eq!(*dispatcher.opener().opened.borrow(), vec![link.to_string()]);
    }

    #[test]
    fn non_canonical_link_is_dispatched_as_written() {
        let dispatcher = LinkDispatcher::new(RecordingOpener::default());

        for link in [
            "https://Example.com",
            "https://example.com/Dani Devi.pdf",
            "HTTPS://example.com:443/a/../b.pdf?q=a b",
        ] {
            let opened = dispatcher
                .open(&citation_with_link(&format!("  {link}\n")))
                .expect("link should open");
            assert_eq!(opened.url, link);
        }
        assert_eq!(
            *dispatcher.opener().opened.borrow(),
            vec![
                "https://Example.com".to_string(),
                "https://example.com/Dani Devi.pdf".to_string(),
                "HTTPS://example.com:443/a/../b.pdf?q=a b".to_string(),
            ]
        );
    }

    #[test]
    fn browser_opener_needs_a_runtime() {
        let err = BrowserOpener
            .open("https://example.com/doc.pdf")
            .expect_err("no runtime");
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn launched_processes_are_reaped() {
        let mut pids = Vec::new();
        for _ in 0..3 {
            let pid = spawn_reaped(Command::new("true"))
                .expect("spawn")
                .expect("pid");
            pids.push(pid);
        }

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        for pid in pids {
            assert!(
                !std::path::Path::new(&format!("/proc/{pid}")).exists(),
                "process {pid} was not reaped"
            );
        }
    }

    #[test]
    fn malformed_link_is_rejected_before_opening() {
        let dispatcher = LinkDispatcher::new(RecordingOpener::default());

        for link in ["", "not a url", "/relative/path.pdf", "https://"] {
            let err = dispatcher
                .open(&citation_with_link(link))
                .expect_err("link should be rejected");
            assert!(err.is_invalid(), "{link:?} gave {err}");
        }
        assert!(dispatcher.opener().opened.borrow().is_empty());
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let dispatcher = LinkDispatcher::new(RecordingOpener::default());

        let err = dispatcher
            .open(&citation_with_link("javascript:alert(1)"))
            .expect_err("scheme should be rejected");
        match err {
            LinkError::Invalid(InvalidLinkError::UnsupportedScheme { scheme, .. }) => {
                assert_eq!(scheme, "javascript")
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = dispatcher
            .open(&citation_with_link("file:///etc/passwd"))
            .expect_err("file scheme should be rejected");
        assert!(err.is_invalid());
        assert!(dispatcher.opener().opened.borrow().is_empty());
    }

    #[test]
    fn launcher_failure_is_not_an_invalid_link() {
        let dispatcher = LinkDispatcher::new(RecordingOpener {
            fail_with: Some(io::ErrorKind::NotFound),
            ..Default::default()
        });

        let err = dispatcher
            .open(&citation_with_link("https://example.com/doc.pdf"))
            .expect_err("launch should fail");
        assert!(!err.is_invalid());
        assert!(err.to_string().contains("https://example.com/doc.pdf"));
    }

    #[test]
    fn validate_link_trims_surrounding_whitespace() {
        let url = validate_link("  https://example.com/a.pdf \n").expect("valid");
        assert_eq!(url.as_str(), "https://example.com/a.pdf");
    }
}
