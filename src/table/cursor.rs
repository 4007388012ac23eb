//! Cursors: traversal positions over a table's cells.

use crate::row::{deserialize_row, serialize_row, Row};
use crate::storage::page::leaf_node::LeafNode;
use crate::storage::{PageId, StorageResult};
use crate::table::Table;

/// A position within a table: a page number plus a cell index.
///
/// A cursor makes a single forward pass. Once `end_of_table` is set no
/// transition leaves that state; request a fresh cursor to scan again.
pub struct Cursor<'a> {
    table: &'a mut Table,
    page_id: PageId,
    cell_num: u32,
    end_of_table: bool,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(
        table: &'a mut Table,
        page_id: PageId,
        cell_num: u32,
        end_of_table: bool,
    ) -> Self {
        Self {
            table,
            page_id,
            cell_num,
            end_of_table,
        }
    }

    pub fn end_of_table(&self) -> bool {
        self.end_of_table
    }

    /// The serialized-row region of the cell under the cursor.
    pub fn value(&mut self) -> StorageResult<&[u8]> {
        let cell_num = self.cell_num;
        let page = self.table.pager.get_page(self.page_id)?;
        Ok(LeafNode::new(page).into_value(cell_num))
    }

    /// Mutable access to the cell region, for serializing in place.
    pub fn value_mut(&mut self) -> StorageResult<&mut [u8]> {
        let cell_num = self.cell_num;
        let page = self.table.pager.get_page(self.page_id)?;
        Ok(LeafNode::new(page).into_value_mut(cell_num))
    }

    /// Move one cell forward, entering `end_of_table` when the leaf's
    /// cells are exhausted. There is no cross-page advance: the tree is a
    /// single leaf.
    pub fn advance(&mut self) -> StorageResult<()> {
        let page = self.table.pager.get_page(self.page_id)?;
        let cell_count = LeafNode::new(page).cell_count();

        self.cell_num += 1;
        if self.cell_num >= cell_count {
            self.end_of_table = true;
        }
        Ok(())
    }

    /// Write a keyed row into the cell under the cursor and grow the cell
    /// count past it. Used at the append point produced by
    /// [`Table::end`].
    pub(crate) fn insert(&mut self, key: u32, row: &Row) -> StorageResult<()> {
        let cell_num = self.cell_num;
        let page = self.table.pager.get_page(self.page_id)?;
        let mut node = LeafNode::new(page);

        node.set_key(cell_num, key);
        serialize_row(row, node.value_mut(cell_num));
        node.set_cell_count(node.cell_count() + 1);
        Ok(())
    }
}

/// Lazy iterator over a table's rows, decoding one cell per step.
pub struct Rows<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(cursor: Cursor<'a>) -> Self {
        Self { cursor }
    }
}

impl Iterator for Rows<'_> {
    type Item = StorageResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.end_of_table() {
            return None;
        }

        let row = match self.cursor.value() {
            Ok(buf) => deserialize_row(buf),
            Err(err) => return Some(Err(err)),
        };
        if let Err(err) = self.cursor.advance() {
            return Some(Err(err));
        }
        Some(Ok(row))
    }
}
