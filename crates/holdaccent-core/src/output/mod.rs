// Holdaccent Output Layer
// Where committed text and forwarded key events go

use crate::input::KeyEvent;
use crate::{Action, Key};

/// Receiver for engine output against a named input context
pub trait CommitSink {
    /// Commit UTF-8 text to `context`
    fn commit_string(&mut self, context: &str, text: &str);

    /// The host let a key event through to `context` unchanged
    fn forward_key(&mut self, _context: &str, _event: &KeyEvent) {}
}

impl<T: CommitSink + ?Sized> CommitSink for &mut T {
    fn commit_string(&mut self, context: &str, text: &str) {
        (**self).commit_string(context, text)
    }

    fn forward_key(&mut self, context: &str, event: &KeyEvent) {
        (**self).forward_key(context, event)
    }
}

/// One observable output of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Text committed by the engine
    Commit { context: String, text: String },
    /// Key event the application received unchanged
    Forward {
        context: String,
        key: Key,
        action: Action,
        text: Option<char>,
    },
}

/// Recording sink, used for replays and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    outputs: Vec<Output>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Committed strings in order
    pub fn commits(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Commit { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text an application would show: commits plus forwarded presses that type
    pub fn typed_text(&self) -> String {
        self.typed_text_for(None)
    }

    /// Like [`Transcript::typed_text`], restricted to one context
    pub fn typed_text_in(&self, context: &str) -> String {
        self.typed_text_for(Some(context))
    }

    fn typed_text_for(&self, only: Option<&str>) -> String {
        let mut typed = String::new();
        for output in &self.outputs {
            match output {
                Output::Commit { context, text } if only.map_or(true, |c| c == context.as_str()) => {
                    typed.push_str(text);
                }
                Output::Forward {
                    context,
                    action,
                    text: Some(ch),
                    ..
                } if action.is_pressed() && only.map_or(true, |c| c == context.as_str()) => {
                    typed.push(*ch);
                }
                _ => {}
            }
        }
        typed
    }
}

impl CommitSink for Transcript {
    fn commit_string(&mut self, context: &str, text: &str) {
        self.outputs.push(Output::Commit {
            context: context.to_string(),
            text: text.to_string(),
        });
    }

    fn forward_key(&mut self, context: &str, event: &KeyEvent) {
        self.outputs.push(Output::Forward {
            context: context.to_string(),
            key: event.key,
            action: event.action,
            text: event.text,
        });
    }
}
