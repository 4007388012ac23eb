//! The on-page leaf node format.
//!
//! A leaf holds rows directly, as a run of fixed-size (key, row) cells
//! behind a small header. All offset arithmetic for the format lives in
//! this module.

use crate::row::ROW_SIZE;
use crate::storage::page::Page;
use crate::storage::pager::PAGE_SIZE;

// Common node header layout.
pub const NODE_TYPE_SIZE: usize = 1;
pub const NODE_TYPE_OFFSET: usize = 0;
pub const IS_ROOT_SIZE: usize = 1;
pub const IS_ROOT_OFFSET: usize = NODE_TYPE_OFFSET + NODE_TYPE_SIZE;
pub const PARENT_POINTER_SIZE: usize = 4;
pub const PARENT_POINTER_OFFSET: usize = IS_ROOT_OFFSET + IS_ROOT_SIZE;
pub const COMMON_NODE_HEADER_SIZE: usize = NODE_TYPE_SIZE + IS_ROOT_SIZE + PARENT_POINTER_SIZE;

// Leaf node header layout.
pub const LEAF_NODE_NUM_CELLS_SIZE: usize = 4;
pub const LEAF_NODE_NUM_CELLS_OFFSET: usize = COMMON_NODE_HEADER_SIZE;
pub const LEAF_NODE_HEADER_SIZE: usize = COMMON_NODE_HEADER_SIZE + LEAF_NODE_NUM_CELLS_SIZE;

// Leaf node body layout.
pub const LEAF_NODE_KEY_SIZE: usize = 4;
pub const LEAF_NODE_VALUE_SIZE: usize = ROW_SIZE;
pub const LEAF_NODE_CELL_SIZE: usize = LEAF_NODE_KEY_SIZE + LEAF_NODE_VALUE_SIZE;
pub const LEAF_NODE_SPACE_FOR_CELLS: usize = PAGE_SIZE - LEAF_NODE_HEADER_SIZE;
pub const LEAF_NODE_MAX_CELLS: usize = LEAF_NODE_SPACE_FOR_CELLS / LEAF_NODE_CELL_SIZE;

/// Tag stored in the first header byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Internal = 0,
    Leaf = 1,
}

impl NodeType {
    fn from_byte(value: u8) -> Self {
        if value == NodeType::Leaf as u8 {
            NodeType::Leaf
        } else {
            NodeType::Internal
        }
    }
}

/// Typed view of a page laid out as a leaf node.
///
/// No bounds checking is done against `cell_count`; callers address cells
/// they know to exist (or, for an insert, the one slot past the end).
pub struct LeafNode<'a> {
    data: &'a mut [u8; PAGE_SIZE],
}

impl<'a> LeafNode<'a> {
    pub fn new(page: &'a mut Page) -> Self {
        Self {
            data: page.data_mut(),
        }
    }

    /// Tag the page as an empty, non-root leaf.
    pub fn initialize(&mut self) {
        self.set_node_type(NodeType::Leaf);
        self.set_is_root(false);
        self.set_parent(0);
        self.set_cell_count(0);
    }

    pub fn node_type(&self) -> NodeType {
        NodeType::from_byte(self.data[NODE_TYPE_OFFSET])
    }

    fn set_node_type(&mut self, node_type: NodeType) {
        self.data[NODE_TYPE_OFFSET] = node_type as u8;
    }

    pub fn is_root(&self) -> bool {
        self.data[IS_ROOT_OFFSET] != 0
    }

    pub fn set_is_root(&mut self, is_root: bool) {
        self.data[IS_ROOT_OFFSET] = is_root as u8;
    }

    /// Page number of the parent node. Meaningless while the tree is a
    /// single root leaf, but the slot is part of the format.
    pub fn parent(&self) -> u32 {
        self.read_u32(PARENT_POINTER_OFFSET)
    }

    pub fn set_parent(&mut self, parent: u32) {
        self.write_u32(PARENT_POINTER_OFFSET, parent);
    }

    /// Number of populated cells; authoritative for the whole page.
    pub fn cell_count(&self) -> u32 {
        self.read_u32(LEAF_NODE_NUM_CELLS_OFFSET)
    }

    pub fn set_cell_count(&mut self, count: u32) {
        self.write_u32(LEAF_NODE_NUM_CELLS_OFFSET, count);
    }

    pub fn key(&self, cell_num: u32) -> u32 {
        self.read_u32(Self::cell_offset(cell_num))
    }

    pub fn set_key(&mut self, cell_num: u32, key: u32) {
        self.write_u32(Self::cell_offset(cell_num), key);
    }

    /// The serialized-row region of a cell.
    pub fn value(&self, cell_num: u32) -> &[u8] {
        let offset = Self::value_offset(cell_num);
        &self.data[offset..offset + LEAF_NODE_VALUE_SIZE]
    }

    pub fn value_mut(&mut self, cell_num: u32) -> &mut [u8] {
        let offset = Self::value_offset(cell_num);
        &mut self.data[offset..offset + LEAF_NODE_VALUE_SIZE]
    }

    /// Like [`value`](Self::value), but keeps the full page borrow so the
    /// slice can outlive this view.
    pub fn into_value(self, cell_num: u32) -> &'a [u8] {
        let offset = Self::value_offset(cell_num);
        let data: &'a [u8; PAGE_SIZE] = self.data;
        &data[offset..offset + LEAF_NODE_VALUE_SIZE]
    }

    /// Mutable variant of [`into_value`](Self::into_value).
    pub fn into_value_mut(self, cell_num: u32) -> &'a mut [u8] {
        let offset = Self::value_offset(cell_num);
        let data: &'a mut [u8; PAGE_SIZE] = self.data;
        &mut data[offset..offset + LEAF_NODE_VALUE_SIZE]
    }

    fn cell_offset(cell_num: u32) -> usize {
        LEAF_NODE_HEADER_SIZE + cell_num as usize * LEAF_NODE_CELL_SIZE
    }

    fn value_offset(cell_num: u32) -> usize {
        Self::cell_offset(cell_num) + LEAF_NODE_KEY_SIZE
    }

    fn read_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    fn write_u32(&mut self, offset: usize, value: u32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// Structural size constants of the on-page format, for diagnostic display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub row_size: usize,
    pub common_node_header_size: usize,
    pub leaf_node_header_size: usize,
    pub leaf_node_cell_size: usize,
    pub leaf_node_space_for_cells: usize,
    pub leaf_node_max_cells: usize,
}

pub fn layout() -> Layout {
    Layout {
        row_size: ROW_SIZE,
        common_node_header_size: COMMON_NODE_HEADER_SIZE,
        leaf_node_header_size: LEAF_NODE_HEADER_SIZE,
        leaf_node_cell_size: LEAF_NODE_CELL_SIZE,
        leaf_node_space_for_cells: LEAF_NODE_SPACE_FOR_CELLS,
        leaf_node_max_cells: LEAF_NODE_MAX_CELLS,
    }
}
