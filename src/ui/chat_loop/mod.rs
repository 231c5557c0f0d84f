//! Interactive chat screen: terminal lifecycle, key handling, event loop.

mod event_loop;
mod keybindings;
mod lifecycle;

pub use event_loop::run_chat;
