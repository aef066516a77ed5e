use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Redraw after every tick or terminal event.
    #[default]
    OnDirty,
    /// Like `OnDirty`, but at most once per interval.
    ///
    /// Bursts of events (mouse motion while dragging) are batched into one
    /// redraw.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Schedules ticks and redraws around blocking terminal reads.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl EventLoop {
    /// Ticks are disabled until an interval is set; the first call to
    /// `next()` renders.
    pub(super) fn new(now: Instant) -> Self {
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: now,
            last_render: now,
            dirty: true,
        }
    }

    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick or render is due or a terminal event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// The tick or render that is due at `now`, if any. Ticks win.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(interval) = self.tick_interval {
            let elapsed = now.saturating_duration_since(self.last_tick);
            if elapsed >= interval {
                self.last_tick = now;
                self.dirty = true;
                return Some(TuiEvent::Tick(elapsed));
            }
        }

        let render_due = match self.render_mode {
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.saturating_duration_since(self.last_render) >= interval
            }
        };
        if render_due {
            self.last_render = now;
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    /// How long terminal input may be awaited; `None` waits forever.
    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = match self.render_mode {
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let deadline = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_first_event_is_render() {
        let start = Instant::now();
        let mut events = EventLoop::new(start);
        assert!(events.due_event(start).is_some_and(|e| e.is_render()));
        assert!(events.due_event(start).is_none());
        assert_eq!(events.timeout(start), None, "nothing scheduled");
    }

    #[test]
    fn test_tick_reports_elapsed_time() {
        let start = Instant::now();
        let mut events = EventLoop::new(start);
        events.set_tick_interval(Some(MS * 50));
        events.due_event(start);

        assert_eq!(events.timeout(start + MS * 20), Some(MS * 30));
        assert!(events.due_event(start + MS * 20).is_none());

        match events.due_event(start + MS * 70) {
            Some(TuiEvent::Tick(elapsed)) => assert_eq!(elapsed, MS * 70),
            other => panic!("expected tick, got {other:?}"),
        }
        // the tick dirtied the screen
        assert!(
            events
                .due_event(start + MS * 70)
                .is_some_and(|e| e.is_render())
        );
    }

    #[test]
    fn test_throttled_render_waits_for_interval() {
        let start = Instant::now();
        let mut events = EventLoop::new(start);
        events.set_render_mode(RenderMode::Throttled(MS * 16));
        events.set_tick_interval(Some(MS * 20));
        // the initial render also waits for the interval
        assert!(events.due_event(start).is_none());
        assert!(
            events
                .due_event(start + MS * 16)
                .is_some_and(|e| e.is_render())
        );

        // a tick dirties the screen, but the redraw waits for the interval
        assert!(
            events
                .due_event(start + MS * 20)
                .is_some_and(|e| e.is_tick())
        );
        assert!(events.due_event(start + MS * 20).is_none());
        assert_eq!(events.timeout(start + MS * 20), Some(MS * 12));
        assert!(
            events
                .due_event(start + MS * 32)
                .is_some_and(|e| e.is_render())
        );
    }
}
