//! Lexi is a terminal client for a legal question-answering assistant.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the query session state machine, answer markup
//!   formatting, citations, citation link dispatch, and configuration.
//! - [`backend`] defines the question-answering service seam with an HTTP
//!   implementation and a built-in sample.
//! - [`api`] defines the request/response payloads exchanged with the
//!   service.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop.
//! - [`utils`] holds URL joining and logging setup.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions or [`cli::ask`] for one-shot queries.

pub mod api;
pub mod backend;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
