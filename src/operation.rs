//! The `Execute` trait - operations are structs whose fields ARE the parameters
//!
//! Each command module defines one struct per operation (`CreateTask`,
//! `MoveTask`, ...) with builder-style constructors, and implements
//! [`Execute`] against the board context. Commands return typed outputs;
//! controllers decide how to render them.

use async_trait::async_trait;

/// A command that can be executed against a context
#[async_trait]
pub trait Execute<C, E> {
    /// The typed result of a successful execution
    type Output;

    /// Run the command against the given context
    async fn execute(&self, ctx: &C) -> std::result::Result<Self::Output, E>;
}
