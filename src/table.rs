//! The table: root handle tying a pager to the root leaf.

pub mod cursor;

use crate::row::Row;
use crate::storage::page::leaf_node::{self, LeafNode, Layout, LEAF_NODE_MAX_CELLS};
use crate::storage::{PageId, Pager, StorageError, StorageResult};
use cursor::{Cursor, Rows};
use log::error;
use std::fmt::Write as _;
use std::path::Path;

/// A single-table database backed by one file.
///
/// The table exclusively owns its pager; page 0 is the root leaf and, in
/// this unsplit design, the entire tree.
pub struct Table {
    pager: Pager,
    root_page: PageId,
}

impl Table {
    /// Open the table stored in `path`, creating the file if absent.
    ///
    /// A brand-new file gets its root leaf materialized immediately, so an
    /// opened table always has a well-formed page 0.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let mut pager = Pager::open(path)?;
        let root_page = PageId(0);

        if pager.num_pages() == 0 {
            let page = pager.get_page(root_page)?;
            let mut root = LeafNode::new(page);
            root.initialize();
            root.set_is_root(true);
        }

        Ok(Self { pager, root_page })
    }

    /// Append a row at the end of the root leaf.
    ///
    /// The row's id is the cell key. Cells are stored in insertion order;
    /// there is no key-ordered position search. A full leaf is a hard
    /// stop: node splitting is not implemented, so the insert is rejected
    /// with [`StorageError::TableFull`] and the leaf is left untouched.
    pub fn insert(&mut self, row: &Row) -> StorageResult<()> {
        let page = self.pager.get_page(self.root_page)?;
        if LeafNode::new(page).cell_count() as usize >= LEAF_NODE_MAX_CELLS {
            return Err(StorageError::TableFull);
        }

        let mut cursor = self.end()?;
        cursor.insert(row.id, row)
    }

    /// A lazy forward scan over every row, in cell order.
    pub fn select(&mut self) -> StorageResult<Rows<'_>> {
        Ok(Rows::new(self.start()?))
    }

    /// Cursor at the first cell of the root leaf.
    pub fn start(&mut self) -> StorageResult<Cursor<'_>> {
        let root_page = self.root_page;
        let page = self.pager.get_page(root_page)?;
        let cell_count = LeafNode::new(page).cell_count();
        Ok(Cursor::new(self, root_page, 0, cell_count == 0))
    }

    /// Cursor one past the last cell: the append point for inserts.
    pub fn end(&mut self) -> StorageResult<Cursor<'_>> {
        let root_page = self.root_page;
        let page = self.pager.get_page(root_page)?;
        let cell_count = LeafNode::new(page).cell_count();
        Ok(Cursor::new(self, root_page, cell_count, true))
    }

    /// Textual listing of the tree: the root leaf's size and one
    /// `- index : key` line per cell.
    pub fn dump_tree(&mut self) -> StorageResult<String> {
        let page = self.pager.get_page(self.root_page)?;
        let node = LeafNode::new(page);

        let mut out = format!("leaf (size {})\n", node.cell_count());
        for cell_num in 0..node.cell_count() {
            let _ = writeln!(out, " - {} : {}", cell_num, node.key(cell_num));
        }
        Ok(out)
    }

    /// Structural size constants of the storage format.
    pub fn layout() -> Layout {
        leaf_node::layout()
    }

    /// Flush all loaded pages, sync, and release them.
    ///
    /// This is the table's only durability point; rows inserted since open
    /// are not guaranteed to be on disk until it runs.
    pub fn close(mut self) -> StorageResult<()> {
        self.pager.close()
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        // Best-effort flush for tables dropped without an orderly close.
        if let Err(err) = self.pager.close() {
            error!("failed to flush table on drop: {}", err);
        }
    }
}
