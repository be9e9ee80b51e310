//! Note emission: lowering, layout and a verification round trip.

mod emitter;
mod error;
mod layout;
mod lower;

#[cfg(test)]
mod emit_tests;

pub use emitter::emit_function;
pub use error::EmitError;
