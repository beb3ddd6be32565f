use std::num::{ParseFloatError, ParseIntError};
use std::string::FromUtf8Error;

/// Failure while turning wire tokens into a [`QuerySpec`](crate::QuerySpec).
///
/// Any error aborts the whole decode; callers never see a partial spec.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid integer for `{param}`: {value:?}")]
    Integer {
        param: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid datetime literal {literal:?}")]
    Date {
        literal: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid number literal {literal:?}")]
    Number {
        literal: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("malformed `{param}` token: {token:?}")]
    Malformed { param: String, token: String },

    #[error("query string is not valid utf-8: {0}")]
    QueryString(#[from] FromUtf8Error),
}
