//! Module synthesis: identifier normalization and artifact emission

mod emit;
mod ident;

pub use emit::{GeneratorProfile, ModuleSynthesizer, SynthError};
pub use ident::normalize_identifier;
