pub mod leaf_node;

use crate::storage::pager::PAGE_SIZE;

/// Zero-based index of a page within the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub u32);

/// An opaque page-sized byte buffer, owned by the pager once allocated.
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    pub(crate) fn zeroed() -> Self {
        Self {
            data: [0; PAGE_SIZE],
        }
    }

    pub fn data(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }
}

pub use leaf_node::LeafNode;
