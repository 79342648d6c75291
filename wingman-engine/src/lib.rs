pub mod engine;
pub mod session;
pub mod suggest;
pub mod traits;
pub mod transcribe;
