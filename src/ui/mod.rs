//! Terminal UI layer for the interactive query screen.
//!
//! - [`chat_loop`]: terminal lifecycle and the event loop that feeds key
//!   presses to the [`crate::core::session`] state machine.
//! - [`renderer`]: frame composition from the session and [`view`] state.
//! - [`view`] and [`theme`]: query editor, focus, selection and color policy.
//!
//! This layer only presents and captures interaction state; query
//! lifecycle decisions belong to [`crate::core`].

pub mod chat_loop;
pub mod renderer;
pub mod theme;
pub mod view;
