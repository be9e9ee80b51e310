pub mod check;
pub mod compile;
pub mod dump;
mod error;
mod json;
mod source;

#[cfg(test)]
mod compile_tests;

pub use error::CliError;
