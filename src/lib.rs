//! rcse - configuration-driven syntax annotation
//!
//! A grammar document (keyword lists and regex patterns, each bound to
//! a semantic type and a display style) drives three consumers:
//! - [`Highlighter`]: HTML span markup for display
//! - [`Prettifier`]: operator-aware re-spacing
//! - [`IdentifierExtractor`]: the bare identifiers left over

pub mod error;
pub mod extract;
pub mod prettify;
pub mod remote;
pub mod settings;
pub mod syntax;

pub use error::{Result, SyntaxError};
pub use extract::IdentifierExtractor;
pub use prettify::Prettifier;
pub use syntax::{ConfigModel, Highlighter, SyntaxConfig};
