//! # memcore-context
//!
//! The Context Builder: assembles a token-budgeted working
//! context by composing the Episodic Memory Manager's episodic context
//! with the Cascading Memory Cache's tiered selection.

mod builder;
mod header;
mod working_context;

pub use builder::ContextBuilder;
pub use working_context::WorkingContext;
