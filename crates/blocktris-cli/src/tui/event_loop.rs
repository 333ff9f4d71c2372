use std::time::{Duration, Instant};

use crossterm::event::{self, Event};

/// What woke the loop.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    Tick,
    Render,
    Terminal(Event),
}

/// Event loop state management.
///
/// Produces a `Tick` every tick interval, a `Render` whenever a tick or a
/// terminal event has happened since the last render, and terminal events in
/// between. Without a tick interval only terminal events wake the loop.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            dirty: true, // Initial render is required on startup
        }
    }

    /// Sets the tick interval.
    ///
    /// Pass `None` to suspend tick events. Re-enabling ticks starts counting
    /// from now, so no burst of overdue ticks is produced.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        if self.tick_interval.is_none() && interval.is_some() {
            self.last_tick = Instant::now();
        }
        self.tick_interval = interval;
    }

    pub(super) fn tick_interval(&self) -> Option<Duration> {
        self.tick_interval
    }

    /// Returns the next event.
    ///
    /// Blocks until the next tick is due, a render is pending, or a crossterm
    /// event occurs.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.last_tick + self.tick_interval?;
        Some(next_tick_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_render() {
        let mut events = EventLoop::new();
        assert!(events.next().unwrap().is_render());
    }

    #[test]
    fn test_timeout_follows_tick_interval() {
        let mut events = EventLoop::new();
        let now = events.last_tick;
        assert_eq!(events.compute_timeout(now), None);

        events.set_tick_interval(Some(Duration::from_millis(16)));
        let now = events.last_tick;
        assert_eq!(events.compute_timeout(now), Some(Duration::from_millis(16)));
        assert_eq!(
            events.compute_timeout(now + Duration::from_millis(20)),
            Some(Duration::ZERO)
        );

        events.set_tick_interval(None);
        assert_eq!(events.tick_interval(), None);
        assert_eq!(events.compute_timeout(now), None);
    }
}
