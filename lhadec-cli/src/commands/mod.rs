//! Command implementations for the lhadec CLI.

pub mod decode;
pub mod methods;

pub use decode::cmd_decode;
pub use methods::cmd_methods;
