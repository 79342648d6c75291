pub mod service;

// Keep the public surface small and intentional.
pub use service::*;
