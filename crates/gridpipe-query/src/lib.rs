mod decode;
mod error;
mod filter;
mod group;
mod lookup;
mod operator;
mod params;
mod query;
mod sort;
mod value;

pub use decode::{Decoder, TOKENS_PER_CONDITION, decode};
pub use error::DecodeError;
pub use filter::{Condition, Filter, LogicalOp};
pub use group::{Aggregate, AggregateKind, Group};
pub use lookup::Lookup;
pub use operator::Operator;
pub use params::QueryParams;
pub use query::{QuerySpec, sanitize_key};
pub use sort::{Sort, SortDirection};
pub use value::{QueryValue, TIMESTAMP_LAYOUT};
