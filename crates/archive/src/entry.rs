use std::io::{Read, Seek};
use zip::ZipArchive;
use zip::result::ZipResult;

/// One record of an archive's central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Position in the central directory, used to reopen the entry.
    pub index: usize,
    /// Entry name exactly as stored in the archive (not yet validated).
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    pub is_dir: bool,
    /// Unix permission bits, if the archive was created on a unix system.
    pub mode: Option<u32>,
}

/// Reads every entry's metadata without decompressing anything.
pub(crate) fn enumerate<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ZipResult<Vec<ArchiveEntry>> {
    (0..archive.len())
        .map(|index| {
            let entry = archive.by_index_raw(index)?;
            Ok(ArchiveEntry {
                index,
                name: entry.name().to_string(),
                size: entry.size(),
                is_dir: entry.is_dir(),
                mode: entry.unix_mode(),
            })
        })
        .collect()
}
