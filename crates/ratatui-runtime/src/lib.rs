//! Small runtime for terminal applications built on `ratatui`.
//!
//! An [`App`] receives ticks with the elapsed time, terminal events and
//! render requests from a [`Runtime`]. [`Countdown`] turns ticks into
//! one-shot delays.

pub use self::{app::App, countdown::Countdown, event_loop::RenderMode, runtime::Runtime};

mod app;
mod countdown;
mod event;
mod event_loop;
mod runtime;
