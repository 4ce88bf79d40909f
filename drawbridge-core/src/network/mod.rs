//! Control-channel I/O: frame reader and reply emitter.

pub mod reader;
pub mod writer;

pub use reader::{FrameReader, MAX_FRAME_SIZE, MIN_FRAME_CAPACITY};
pub use writer::ReplyWriter;
