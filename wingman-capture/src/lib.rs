pub mod recorder;
pub mod scripted;
pub mod source;

// Keep the public surface small and intentional.
pub use recorder::*;
pub use scripted::*;
pub use source::*;
