pub mod controller;
pub mod input;
pub mod matcher;
pub mod position;

pub use controller::{FrameController, FrameSnapshot, KeyOutcome, TypingError};
pub use input::KeyEvent;
pub use position::{Advance, Position};
