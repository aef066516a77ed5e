use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Trait for TUI applications.
///
/// Applications executed by `Runtime::run()` must implement this trait.
pub trait App {
    /// Initializes the application.
    ///
    /// Called at the start of `Runtime::run()`. Use this to configure the
    /// tick interval, render mode and mouse capture.
    fn init(&mut self, runtime: &mut Runtime);

    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, mouse, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Draws the screen.
    ///
    /// Takes `&mut self` so the application can remember where widgets were
    /// laid out, e.g. to map mouse positions back to them.
    fn draw(&mut self, frame: &mut Frame);

    /// Advances time-based state; `elapsed` is the time since the previous tick.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);
}
