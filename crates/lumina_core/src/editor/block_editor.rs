//! Block sequence editor.
//!
//! # Responsibility
//! - Apply insert/update/delete/reorder/convert operations to one page's
//!   ordered blocks.
//! - Notify an optional change listener with the full new sequence after
//!   every successful mutation.
//!
//! # Invariants
//! - The sequence always holds at least one block.
//! - `reorder` is a stable move: all other blocks keep relative order.
//! - `insert_after` with an unknown reference id is rejected, never
//!   silently appended.

use crate::editor::table::{TableEdit, TableGrid};
use crate::editor::EditorError;
use crate::model::block::{Block, BlockId, BlockKind, BlockPatch};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

type ChangeListener = Box<dyn FnMut(&[Block]) + Send>;

/// One editor operation, in transport-friendly form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BlockOperation {
    InsertAfter {
        block_id: BlockId,
        #[serde(default, rename = "type")]
        kind: Option<BlockKind>,
    },
    Update {
        block_id: BlockId,
        patch: BlockPatch,
    },
    Delete {
        block_id: BlockId,
    },
    Reorder {
        block_id: BlockId,
        target_index: usize,
    },
    ConvertType {
        block_id: BlockId,
        #[serde(rename = "type")]
        kind: BlockKind,
    },
    ToggleTodo {
        block_id: BlockId,
    },
    EditTable {
        block_id: BlockId,
        edit: TableEdit,
    },
}

/// Editor over the block sequence of one page.
pub struct BlockEditor {
    blocks: Vec<Block>,
    on_change: Option<ChangeListener>,
}

impl Debug for BlockEditor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockEditor")
            .field("blocks", &self.blocks)
            .field("has_listener", &self.on_change.is_some())
            .finish()
    }
}

impl BlockEditor {
    /// Creates an editor over `blocks`.
    ///
    /// An empty input is seeded with one empty text block.
    pub fn new(mut blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            blocks.push(Block::new(BlockKind::Text));
        }
        Self {
            blocks,
            on_change: None,
        }
    }

    /// Registers the listener invoked with the full sequence after each change.
    pub fn with_on_change(mut self, listener: impl FnMut(&[Block]) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Inserts an empty block of `kind` right after `block_id`.
    ///
    /// Returns the id of the new block.
    pub fn insert_after(
        &mut self,
        block_id: &str,
        kind: BlockKind,
    ) -> Result<BlockId, EditorError> {
        let index = self.position(block_id)?;
        let block = Block::new(kind);
        let new_id = block.id.clone();
        self.blocks.insert(index + 1, block);
        self.notify();
        Ok(new_id)
    }

    /// Shallow-merges `patch` into the matching block.
    pub fn update_block(&mut self, block_id: &str, patch: &BlockPatch) -> Result<(), EditorError> {
        let index = self.position(block_id)?;
        patch.apply(&mut self.blocks[index]);
        self.notify();
        Ok(())
    }

    /// Removes the matching block unless it is the only one left.
    pub fn delete_block(&mut self, block_id: &str) -> Result<(), EditorError> {
        let index = self.position(block_id)?;
        if self.blocks.len() <= 1 {
            return Err(EditorError::LastBlock(block_id.to_string()));
        }
        self.blocks.remove(index);
        self.notify();
        Ok(())
    }

    /// Moves the matching block to `target_index` (clamped into range).
    pub fn reorder(&mut self, block_id: &str, target_index: usize) -> Result<(), EditorError> {
        let index = self.position(block_id)?;
        let block = self.blocks.remove(index);
        let target = target_index.min(self.blocks.len());
        self.blocks.insert(target, block);
        self.notify();
        Ok(())
    }

    /// Changes the block kind and clears its content (slash-command flow).
    pub fn convert_type(&mut self, block_id: &str, kind: BlockKind) -> Result<(), EditorError> {
        let index = self.position(block_id)?;
        let block = &mut self.blocks[index];
        block.kind = kind;
        block.content.clear();
        self.notify();
        Ok(())
    }

    /// Flips the checked state of a todo block and returns the new state.
    pub fn toggle_todo(&mut self, block_id: &str) -> Result<bool, EditorError> {
        let index = self.position(block_id)?;
        let block = &mut self.blocks[index];
        let checked = block
            .checked()
            .ok_or_else(|| EditorError::NotATodo(block_id.to_string()))?;
        block.metadata_mut().checked = Some(!checked);
        self.notify();
        Ok(!checked)
    }

    /// Applies one grid edit to a table block.
    pub fn edit_table(&mut self, block_id: &str, edit: TableEdit) -> Result<(), EditorError> {
        let index = self.position(block_id)?;
        let block = &mut self.blocks[index];
        if block.kind != BlockKind::Table {
            return Err(EditorError::NotATable(block_id.to_string()));
        }
        let mut grid = TableGrid::from_metadata(block.metadata.as_ref());
        grid.apply(edit)?;
        grid.write_to(block.metadata_mut());
        self.notify();
        Ok(())
    }

    /// Dispatches one [`BlockOperation`].
    pub fn apply(&mut self, operation: BlockOperation) -> Result<(), EditorError> {
        match operation {
            BlockOperation::InsertAfter { block_id, kind } => self
                .insert_after(&block_id, kind.unwrap_or(BlockKind::Text))
                .map(|_| ()),
            BlockOperation::Update { block_id, patch } => self.update_block(&block_id, &patch),
            BlockOperation::Delete { block_id } => self.delete_block(&block_id),
            BlockOperation::Reorder {
                block_id,
                target_index,
            } => self.reorder(&block_id, target_index),
            BlockOperation::ConvertType { block_id, kind } => self.convert_type(&block_id, kind),
            BlockOperation::ToggleTodo { block_id } => self.toggle_todo(&block_id).map(|_| ()),
            BlockOperation::EditTable { block_id, edit } => self.edit_table(&block_id, edit),
        }
    }

    fn position(&self, block_id: &str) -> Result<usize, EditorError> {
        self.blocks
            .iter()
            .position(|block| block.id == block_id)
            .ok_or_else(|| EditorError::BlockNotFound(block_id.to_string()))
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.blocks);
        }
    }
}
