//! File I/O, validation, and serialization for the tracematch pipeline.

mod domain;
mod error;
mod gesture_reader;
mod reader;
mod replay;
mod writer;

pub use domain::{ReferenceLibrary, SessionName};
pub use error::IoError;
pub use gesture_reader::GestureReader;
pub use reader::ReferenceReader;
pub use replay::{Replay, ReplayRound, replay};
pub use writer::ResultWriter;
