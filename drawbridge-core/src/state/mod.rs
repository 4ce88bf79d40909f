mod session;

pub use session::{CursorState, Session};
