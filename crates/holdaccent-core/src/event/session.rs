// Holdaccent Session
// Host-side driver: serializes key events and timer firings for one engine,
// tracks the focused input context and routes output to a sink.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::event::script::{Script, ScriptCommand, ScriptError, ScriptStep};
use crate::event::TimerQueue;
use crate::input::KeyEvent;
use crate::output::CommitSink;
use crate::transform::{Decision, SubstitutionEngine};
use crate::Action;

/// Name of the context focused when a session starts
pub const DEFAULT_CONTEXT: &str = "default";

/// Single-threaded host simulation.
///
/// Before every event the session fires all timers that came due, in
/// deadline order, so timeout commits land in whichever context is focused
/// at fire time.
pub struct Session<O: CommitSink> {
    engine: SubstitutionEngine<TimerQueue>,
    origin: Instant,
    now: Instant,
    focus: String,
    sink: O,
}

impl<O: CommitSink> Session<O> {
    /// Start a session whose clock begins now
    pub fn new(config: &Config, sink: O) -> Self {
        Self::with_origin(config, sink, Instant::now())
    }

    /// Start a session whose clock begins at `origin`
    pub fn with_origin(config: &Config, sink: O, origin: Instant) -> Self {
        Self {
            engine: SubstitutionEngine::new(config),
            origin,
            now: origin,
            focus: DEFAULT_CONTEXT.to_string(),
            sink,
        }
    }

    pub fn engine(&self) -> &SubstitutionEngine<TimerQueue> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SubstitutionEngine<TimerQueue> {
        &mut self.engine
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    pub fn into_sink(self) -> O {
        self.sink
    }

    /// Currently focused input context
    pub fn focus(&self) -> &str {
        &self.focus
    }

    /// Session clock
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Instant at `offset` from the session origin
    pub fn at(&self, offset: Duration) -> Instant {
        self.origin + offset
    }

    /// Move the clock forward, firing every timer due on the way.
    /// Instants earlier than the current clock leave it unchanged.
    pub fn advance_to(&mut self, at: Instant) {
        loop {
            match self.engine.scheduler().next_deadline() {
                Some(deadline) if deadline <= at => {
                    self.now = self.now.max(deadline);
                    if let Some(text) = self.engine.poll_timers(deadline) {
                        self.sink.commit_string(&self.focus, &text);
                    }
                }
                _ => break,
            }
        }
        self.now = self.now.max(at);
    }

    /// Fire every remaining timer
    pub fn drain_timers(&mut self) {
        if let Some(deadline) = self.engine.scheduler().next_deadline() {
            self.advance_to(deadline);
        }
    }

    /// Deliver one key event and apply the engine's decision
    pub fn dispatch(&mut self, event: KeyEvent) -> Decision {
        self.advance_to(event.time);

        let decision = self.engine.handle_key_event(&event);
        if let Some(text) = decision.commit_text() {
            self.sink.commit_string(&self.focus, text);
        }
        if decision.forwards_event() {
            self.sink.forward_key(&self.focus, &event);
        }
        decision
    }

    /// Input focus moved: drop any pending key and switch contexts
    pub fn focus_changed(&mut self, context: &str) {
        self.engine.reset();
        if self.focus != context {
            log::debug!("Focus {} -> {}", self.focus, context);
            self.focus = context.to_string();
        }
    }

    /// Execute one script step at its offset
    pub fn run_step(&mut self, step: &ScriptStep) -> Result<(), ScriptError> {
        let at = self.at(step.at);
        self.advance_to(at);

        match &step.command {
            ScriptCommand::Key { key, text, action } => {
                self.dispatch(KeyEvent::new(*key, *text, *action, at));
            }
            ScriptCommand::Tap { key, text } => {
                self.dispatch(KeyEvent::new(*key, *text, Action::Press, at));
                self.dispatch(KeyEvent::new(*key, *text, Action::Release, at));
            }
            ScriptCommand::Focus(context) => self.focus_changed(context),
            ScriptCommand::Enable => self.engine.enable(),
            ScriptCommand::Disable => self.engine.disable(),
            ScriptCommand::Reload(path) => {
                let config = Config::from_toml_path(path)?;
                self.engine.reconfigure(&config);
            }
            ScriptCommand::Wait => {}
        }
        Ok(())
    }

    /// Run a whole script, then let any pending timeout fire
    pub fn run_script(&mut self, script: &Script) -> Result<(), ScriptError> {
        for step in script.steps() {
            self.run_step(step)?;
        }
        self.drain_timers();
        Ok(())
    }
}
