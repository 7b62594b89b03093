//! Loaded content and the ownership of its bytes.

use std::fs::File;
use std::io;

use memmap2::Mmap;

/// Bytes loaded for one side of a delta, tagged by provenance.
///
/// The variant encodes the release obligation: owned buffers free, maps
/// unmap, and blob-backed content keeps its blob handle alive. Replacing
/// the value with [`ContentMap::Empty`] is the single release path and is
/// idempotent.
#[derive(Debug, Default)]
pub(crate) enum ContentMap {
    /// No content; the borrowed empty sentinel.
    #[default]
    Empty,
    /// A heap buffer the engine owns (symlink targets, filtered reads).
    Owned(Vec<u8>),
    /// A read-only memory map of a working-directory file.
    Mapped(Mmap),
    /// Content borrowed from a blob handle retained until unload.
    Blob(odb::Blob),
}

impl ContentMap {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Owned(bytes) => bytes,
            Self::Mapped(map) => map,
            Self::Blob(blob) => blob.content(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Releases whatever the map holds. Idempotent.
    pub(crate) fn release(&mut self) {
        *self = Self::Empty;
    }
}

/// Maps a file read-only; empty files skip the map entirely.
#[allow(unsafe_code)]
pub(crate) fn map_file(file: &File) -> io::Result<ContentMap> {
    if file.metadata()?.len() == 0 {
        return Ok(ContentMap::Empty);
    }
    // SAFETY: the file is opened read-only and the map is released at
    // unload; mutation of the file while a diff is running is outside the
    // engine's contract.
    let map = unsafe { Mmap::map(file)? };
    Ok(ContentMap::Mapped(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_map_has_no_bytes() {
        let map = ContentMap::default();
        assert!(map.is_empty());
        assert_eq!(map.as_bytes(), b"");
    }

    #[test]
    fn release_is_idempotent() {
        let mut map = ContentMap::Owned(b"data".to_vec());
        assert_eq!(map.len(), 4);
        map.release();
        assert!(map.is_empty());
        map.release();
        assert!(map.is_empty());
    }

    #[test]
    fn blob_backed_map_borrows_blob_content() {
        let blob = odb::Blob::new(b"blob bytes".to_vec());
        let map = ContentMap::Blob(blob.clone());
        assert_eq!(map.as_bytes(), blob.content());
    }

    #[test]
    fn mapping_a_real_file_reads_its_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"mapped content\n").unwrap();
        tmp.flush().unwrap();

        let file = File::open(tmp.path()).unwrap();
        let map = map_file(&file).unwrap();
        assert_eq!(map.as_bytes(), b"mapped content\n");
        assert!(matches!(map, ContentMap::Mapped(_)));
    }

    #[test]
    fn mapping_an_empty_file_yields_the_empty_sentinel() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let file = File::open(tmp.path()).unwrap();
        let map = map_file(&file).unwrap();
        assert!(matches!(map, ContentMap::Empty));
    }
}
