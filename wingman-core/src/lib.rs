pub mod cleanup;
pub mod markup;
pub mod phrases;
pub mod prompt;
pub mod settings;
pub mod transcript;
pub mod types;

// Keep the public surface small and intentional.
pub use cleanup::*;
pub use markup::*;
pub use phrases::*;
pub use prompt::*;
pub use settings::*;
pub use transcript::*;
pub use types::*;
