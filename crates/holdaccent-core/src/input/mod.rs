// Holdaccent Input Layer
// Key events as delivered by the host

pub mod event;

pub use event::KeyEvent;
