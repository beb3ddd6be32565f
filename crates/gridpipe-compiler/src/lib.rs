mod filter;
mod lookup;
mod pipeline;
mod rollup;

pub use bson::Document;
pub use filter::match_document;
pub use lookup::{lookup_stages, required_lookups};
pub use pipeline::{CompiledQuery, Compiler, compile};
pub use rollup::{CompositeKey, rollup_stages};
