//! akbarc-util - Foundation types shared by every compiler phase.
//!
//! This crate holds the pieces that more than one phase needs: source
//! positions ([`Span`]) and the diagnostic accumulator ([`Handler`]) the
//! semantic analyzer batches its findings through. Phases that fail fast
//! (lexer, parser) carry their own error types and only borrow [`Span`].

mod diagnostic;
mod span;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use span::Span;
