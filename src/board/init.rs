//! InitBoard command

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::operation::Execute;
use crate::types::Index;
use async_trait::async_trait;

/// Initialise a new board
#[derive(Debug, Clone)]
pub struct InitBoard {
    /// The board name
    pub name: String,
    /// Optional board description
    pub description: Option<String>,
}

impl InitBoard {
    /// Create a new InitBoard command
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for InitBoard {
    type Output = Index;

    async fn execute(&self, ctx: &BoardContext) -> Result<Index> {
        if ctx.store().initialised() {
            return Err(BoardError::AlreadyInitialised {
                path: ctx.store().board_path(),
            });
        }

        ctx.store().initialise().await?;

        let mut index = Index::new(&self.name, Index::default_columns());
        if let Some(description) = &self.description {
            index = index.with_description(description);
        }

        ctx.store().save_index(&index).await?;
        tracing::debug!(name = %self.name, "initialised board");
        Ok(index)
    }
}
