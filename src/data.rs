//! Access to the raw tensor payload region.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use log::debug;
use memmap2::Mmap;

use crate::error::{Error, Result};
use crate::model::TensorDescriptor;

/// Read-only view over the data dump. Tensors are addressed by
/// `(offset, size)` only; slices borrow the region, nothing is copied.
#[derive(Debug, Clone, Copy)]
pub struct DataRegion<'a> {
    bytes: &'a [u8],
}

impl<'a> DataRegion<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes `[offset, offset + size)` of the region
    pub fn slice(&self, name: &str, offset: u64, size: u64) -> Result<&'a [u8]> {
        let out_of_range = || Error::OutOfRange {
            name: name.to_string(),
            offset,
            size,
            len: self.bytes.len(),
        };
        let start = usize::try_from(offset).map_err(|_| out_of_range())?;
        let len = usize::try_from(size).map_err(|_| out_of_range())?;
        let end = start.checked_add(len).ok_or_else(out_of_range)?;
        self.bytes.get(start..end).ok_or_else(out_of_range)
    }

    /// Payload of a tensor descriptor
    pub fn tensor(&self, tensor: &TensorDescriptor) -> Result<&'a [u8]> {
        self.slice(&tensor.name, tensor.offset, tensor.size)
    }
}

/// A file mapped read-only into memory. Empty files are not mapped.
pub enum MappedFile {
    Mapped(Mmap),
    Empty,
}

impl MappedFile {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            Error::ModelLoadError(path.to_path_buf(), format!("Failed to open file: {}", e))
        })?;
        let len = file.metadata()?.len();
        if len == 0 {
            debug!("{} is empty, nothing to map", path.display());
            return Ok(MappedFile::Empty);
        }

        // SAFETY: the mapping is read-only and the dumps are not modified while converting.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| {
            Error::ModelLoadError(path.to_path_buf(), format!("mmap failed: {}", e))
        })?;
        debug!("mapped {} ({} bytes)", path.display(), len);
        Ok(MappedFile::Mapped(mmap))
    }
}

impl Deref for MappedFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            MappedFile::Mapped(mmap) => &mmap[..],
            MappedFile::Empty => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_in_bounds() {
        let bytes: Vec<u8> = (0..16).collect();
        let region = DataRegion::new(&bytes);
        let slice = region.slice("w", 4, 8).unwrap();
        assert_eq!(slice, &bytes[4..12]);
        assert_eq!(slice.as_ptr(), bytes[4..].as_ptr());
    }

    #[test]
    fn test_slice_up_to_end() {
        let bytes = [1u8, 2, 3, 4];
        let region = DataRegion::new(&bytes);
        assert_eq!(region.slice("w", 0, 4).unwrap(), &bytes);
        assert!(region.slice("w", 4, 0).unwrap().is_empty());
    }

    #[test]
    fn test_slice_out_of_range() {
        let bytes = [0u8; 8];
        let region = DataRegion::new(&bytes);
        match region.slice("w", 4, 8).unwrap_err() {
            Error::OutOfRange { name, offset, size, len } => {
                assert_eq!(name, "w");
                assert_eq!((offset, size, len), (4, 8, 8));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(region.slice("w", 9, 0).is_err());
        assert!(region.slice("w", u64::MAX, 2).is_err());
    }

    #[test]
    fn test_mapped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.data");
        std::fs::write(&path, [7u8, 8, 9]).unwrap();
        let mapped = MappedFile::open(&path).unwrap();
        assert_eq!(&*mapped, &[7u8, 8, 9]);

        let empty = dir.path().join("empty.data");
        std::fs::write(&empty, b"").unwrap();
        assert!(MappedFile::open(&empty).unwrap().is_empty());
    }
}
