use crate::storage::error::{StorageError, StorageResult};
use crate::storage::page::{Page, PageId};
use log::error;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Size in bytes of a single page, the unit of all file I/O.
pub const PAGE_SIZE: usize = 4096;

/// Hard ceiling on the number of pages a table may occupy.
pub const MAX_PAGES: u32 = 100;

/// Page cache over the backing file.
///
/// Pages load lazily on first access and stay cached for the lifetime of
/// the pager; nothing is evicted. The ceiling of [`MAX_PAGES`] keeps the
/// cache bounded. Loaded pages reach the file only through [`flush`], and
/// [`close`] flushes everything the pager holds — the only durability
/// point.
///
/// [`flush`]: Pager::flush
/// [`close`]: Pager::close
pub struct Pager {
    file: File,
    file_length: u64,
    num_pages: u32,
    pages: HashMap<u32, Page>,
}

impl Pager {
    /// Open (creating if absent) the backing file in read/write mode.
    ///
    /// A file length that is not a whole number of pages means a partial
    /// page was persisted, which this format cannot represent; the file is
    /// rejected as corrupt.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let file_length = file.metadata()?.len();
        if file_length % PAGE_SIZE as u64 != 0 {
            return Err(StorageError::Corrupt { file_length });
        }

        let num_pages = (file_length / PAGE_SIZE as u64) as u32;
        Ok(Self {
            file,
            file_length,
            num_pages,
            pages: HashMap::new(),
        })
    }

    /// Number of pages the pager accounts for, on disk or loaded.
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Fetch a page, reading it from the file on first touch.
    ///
    /// Pages beyond the end of the file are handed out zero-initialized;
    /// they join the file once flushed.
    pub fn get_page(&mut self, page_id: PageId) -> StorageResult<&mut Page> {
        let page_num = page_id.0;
        if page_num >= MAX_PAGES {
            return Err(StorageError::PageOutOfRange {
                page_num,
                max_pages: MAX_PAGES,
            });
        }

        let pages_on_disk = (self.file_length / PAGE_SIZE as u64) as u32;
        match self.pages.entry(page_num) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut page = Page::zeroed();
                if page_num < pages_on_disk {
                    self.file
                        .seek(SeekFrom::Start(Self::page_offset(page_num)))?;
                    self.file.read_exact(page.data_mut())?;
                }
                self.num_pages = self.num_pages.max(page_num + 1);
                Ok(entry.insert(page))
            }
        }
    }

    /// Write one loaded page back to its offset in the file.
    pub fn flush(&mut self, page_id: PageId) -> StorageResult<()> {
        let page_num = page_id.0;
        let page = match self.pages.get(&page_num) {
            Some(page) => page,
            None => {
                // A caller asking to flush a page it never touched is a
                // bug in the caller, not a reason to fail the flush.
                error!("flush of page {} that was never loaded", page_num);
                return Ok(());
            }
        };

        self.file
            .seek(SeekFrom::Start(Self::page_offset(page_num)))?;
        self.file.write_all(page.data())?;
        Ok(())
    }

    /// Flush every loaded page, sync the file, and release the buffers.
    pub fn close(&mut self) -> StorageResult<()> {
        let mut loaded: Vec<u32> = self.pages.keys().copied().collect();
        loaded.sort_unstable();
        for page_num in loaded {
            self.flush(PageId(page_num))?;
        }
        self.file.sync_all()?;
        self.pages.clear();
        Ok(())
    }

    fn page_offset(page_num: u32) -> u64 {
        page_num as u64 * PAGE_SIZE as u64
    }
}
