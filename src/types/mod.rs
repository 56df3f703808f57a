//! Wire types for the hosted agent service.

pub mod message;
pub mod run;
pub mod thread;

pub use message::*;
pub use run::*;
pub use thread::*;
