// Holdaccent Interactive Mode
// Raw-mode terminal front end: key events in, committed text echoed out

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent as TermKeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement};

use holdaccent_core::{Action, CommitSink, Config, Decision, Key, KeyEvent, Session};

/// Poll interval while no timer is pending
const IDLE_POLL: Duration = Duration::from_millis(500);

const CONTEXT: &str = "terminal";

/// Echoes committed and forwarded text to stdout
struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    fn write(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            log::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> CommitSink for TerminalSink<W> {
    fn commit_string(&mut self, _context: &str, text: &str) {
        self.write(text);
    }

    fn forward_key(&mut self, _context: &str, event: &KeyEvent) {
        if !event.action.is_pressed() {
            return;
        }
        if event.key == Key::ENTER {
            self.write("\r\n");
        } else if let Some(ch) = event.text {
            let mut buf = [0u8; 4];
            self.write(ch.encode_utf8(&mut buf));
        }
    }
}

/// Translate a terminal key event; `None` for keys the engine never sees
fn translate(key: &TermKeyEvent, now: Instant) -> Option<KeyEvent> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    let action = match key.kind {
        KeyEventKind::Press => Action::Press,
        KeyEventKind::Release => Action::Release,
        KeyEventKind::Repeat => Action::Repeat,
    };

    let event = match key.code {
        KeyCode::Char(' ') => KeyEvent::for_key(Key::SPACE, action, now),
        KeyCode::Char(ch) => KeyEvent::for_char(ch, action, now),
        KeyCode::Left => KeyEvent::for_key(Key::LEFT, action, now),
        KeyCode::Right => KeyEvent::for_key(Key::RIGHT, action, now),
        KeyCode::Enter => KeyEvent::for_key(Key::ENTER, action, now),
        _ => return None,
    };
    Some(event)
}

fn is_exit(key: &TermKeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Deliver one terminal key event to the session.
///
/// Without release reporting every keystroke arrives as a press, so a press
/// of the pending character is a second keystroke rather than auto-repeat.
/// The pending one is released first so doubled letters ("dass") survive.
fn feed<O: CommitSink>(
    session: &mut Session<O>,
    event: KeyEvent,
    reports_releases: bool,
) -> Decision {
    if !reports_releases && event.action == Action::Press {
        let repeated = match (event.text, session.engine().pending().input()) {
            (Some(ch), Some(input)) => {
                let mut buf = [0u8; 4];
                *input == *ch.encode_utf8(&mut buf)
            }
            _ => false,
        };
        if repeated {
            session.dispatch(KeyEvent::new(event.key, event.text, Action::Release, event.time));
        }
    }
    session.dispatch(event)
}

fn event_loop<W: Write>(
    session: &mut Session<TerminalSink<W>>,
    reports_releases: bool,
) -> Result<()> {
    loop {
        let now = Instant::now();
        let timeout = session
            .engine()
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL);

        if !event::poll(timeout)? {
            session.advance_to(Instant::now());
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if is_exit(&key) {
            return Ok(());
        }

        if let Some(event) = translate(&key, Instant::now()) {
            let decision = feed(session, event, reports_releases);
            log::trace!("{:?} -> {:?}", key.code, decision);
        }
    }
}

/// Run the interactive loop until Esc or Ctrl+C
pub fn run(config: &Config) -> Result<()> {
    let mut session = Session::new(config, TerminalSink { out: io::stdout() });
    session.focus_changed(CONTEXT);

    println!("holdaccent: hold an accent key, then tap {}. Esc quits.", config.leader_key);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        log::debug!("Terminal does not report key releases; repeated presses count as new keys");
    }

    let result = event_loop(&mut session, enhanced);
    session.drain_timers();

    if enhanced {
        execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    println!();

    result
}
