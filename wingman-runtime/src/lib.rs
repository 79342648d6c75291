pub mod assemble;
pub mod completion;
pub mod recognizer;
pub mod settings_store;
pub mod transcription;

// Keep the public surface small and intentional.
pub use assemble::*;
pub use completion::*;
pub use recognizer::*;
pub use settings_store::*;
pub use transcription::*;
