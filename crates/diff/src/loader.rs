//! Content loading for delta sides: blobs, working-directory files, and
//! symbolic links.

use std::fs::File;
use std::io::Read;

use filters::FilterDirection;
use odb::ObjectKind;

use crate::binary;
use crate::content::{map_file, ContentMap};
use crate::delta::{BinaryVerdict, Delta, DeltaSide, FileFlags, FileMode};
use crate::error::{DiffResult, Error};
use crate::options::DiffOptions;
use crate::repo::Repository;

/// Loads a tree/index side from the object database.
///
/// A zero oid means the side has nothing to load and succeeds empty. When
/// the size is unknown, the object header is peeked first so the size
/// classifier can declare the side binary before any content is read; the
/// peek also guards against ids that do not name blobs.
pub(crate) fn load_from_blob(
    repo: &Repository,
    options: &DiffOptions,
    delta: &mut Delta,
    side: DeltaSide,
) -> DiffResult<ContentMap> {
    if delta.file(side).oid.is_zero() {
        return Ok(ContentMap::Empty);
    }

    if delta.file(side).size == 0 {
        let oid = delta.file(side).oid;
        let (kind, size) = repo.odb().read_header(&oid)?;
        if kind != ObjectKind::Blob {
            return Err(Error::CorruptObject { oid, kind });
        }
        delta.file_mut(side).size = size;
    }

    binary::classify_by_size(options, delta, side);
    if delta.binary == BinaryVerdict::Yes {
        return Ok(ContentMap::Empty);
    }

    let blob = repo.odb().read(&delta.file(side).oid)?;
    delta.file_mut(side).flags |= FileFlags::VALID_OID;
    let map = ContentMap::Blob(blob);
    binary::classify_by_content(delta, side, map.as_bytes());
    Ok(map)
}

/// Loads a working-directory side from disk.
///
/// Symbolic links load their target bytes; regular files are memory-mapped
/// when no filter applies and read-and-filtered otherwise. Once content is
/// present, a side without an authoritative oid gets one by hashing, which
/// is what later lets provisional Modified deltas collapse to Unmodified.
pub(crate) fn load_from_workdir(
    repo: &Repository,
    options: &DiffOptions,
    delta: &mut Delta,
    side: DeltaSide,
) -> DiffResult<ContentMap> {
    let relative = delta.file(side).path.clone();
    let full = repo.resolve_workdir(&relative)?;

    let map = match delta.file(side).mode {
        FileMode::Link => {
            let target = std::fs::read_link(&full)?;
            ContentMap::Owned(target.into_os_string().into_encoded_bytes())
        }
        FileMode::Blob | FileMode::BlobExecutable => {
            let mut file = File::open(&full)?;
            if delta.file(side).size == 0 {
                delta.file_mut(side).size = file.metadata()?.len();
            }
            binary::classify_by_size(options, delta, side);
            if delta.binary == BinaryVerdict::Yes {
                return Ok(ContentMap::Empty);
            }

            let chain = repo
                .filters()
                .load(&relative, FilterDirection::ToObjectDatabase);
            if chain.is_empty() {
                tracing::trace!(path = %relative.display(), "mapping unfiltered workdir file");
                map_file(&file)?
            } else {
                tracing::trace!(
                    path = %relative.display(),
                    filters = chain.len(),
                    "filtering workdir file"
                );
                let mut raw = Vec::new();
                file.read_to_end(&mut raw)?;
                ContentMap::Owned(chain.apply(&raw)?)
            }
        }
        mode => {
            return Err(Error::UnsupportedMode {
                path: relative,
                mode,
            })
        }
    };

    if !delta.file(side).flags.contains(FileFlags::VALID_OID) {
        let oid = odb::hash_object(ObjectKind::Blob, map.as_bytes());
        let file = delta.file_mut(side);
        file.oid = oid;
        file.flags |= FileFlags::VALID_OID;
    }

    binary::classify_by_content(delta, side, map.as_bytes());
    Ok(map)
}
