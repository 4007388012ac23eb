//! Storage layer: the page cache and the on-page node format.
//!
//! Everything on disk is page-based. Key components:
//!
//! - **Page**: fixed-size (4KB) blocks of data, the basic unit of I/O
//! - **Pager**: lazily loads pages from the backing file and caches them
//!   for the lifetime of the process; nothing reaches disk until close
//! - **LeafNode**: the B-tree leaf format interpreting a page as a header
//!   plus fixed-size (key, row) cells
//!
//! Durability is deliberately coarse: the pager flushes every loaded page
//! at close and nowhere else.

pub mod error;
pub mod page;
pub mod pager;

pub use error::{StorageError, StorageResult};
pub use page::{Page, PageId};
pub use pager::{Pager, MAX_PAGES, PAGE_SIZE};
