pub mod completions;
pub mod multipart;
pub mod parse;
pub mod request;
pub mod runtime;
pub mod transcription;

pub use completions::*;
pub use multipart::*;
pub use parse::*;
pub use request::*;
pub use runtime::*;
pub use transcription::*;
