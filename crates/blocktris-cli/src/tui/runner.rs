use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::event_loop::{EventLoop, TuiEvent};

/// A screen driven by [`Tui::run`].
///
/// `update` runs only while a tick interval is set; a screen that waits for
/// input clears it and is woken by key presses alone.
pub trait App {
    /// Called once before the loop starts.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    fn draw(&self, frame: &mut Frame);

    fn update(&mut self, tui: &mut Tui);
}

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the `App` trait.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick interval; `None` suspends ticks until set again.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    pub fn is_ticking(&self) -> bool {
        self.events.tick_interval().is_some()
    }

    /// Runs the application.
    ///
    /// Calls `init`, then dispatches ticks to `update`, renders to `draw` and
    /// terminal events to `handle_event` until `should_exit` holds.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Terminal(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }
}
