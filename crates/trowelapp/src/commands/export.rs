//! Survey bundle export: one `.tar.gz` holding the full record collection
//! plus every referenced blob payload. Blobs referenced by several finds are
//! written once; refs whose blob is missing are skipped with a warning and
//! counted, the export still succeeds.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::warn;

use crate::error::{Result, TrowelError};
use crate::store::{BlobStore, RecordStore};

pub(crate) const ARCHIVE_FINDS: &str = "trowel/finds.json";
pub(crate) const ARCHIVE_MEDIA_DIR: &str = "trowel/media/";

#[derive(Debug)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub finds: usize,
    pub blobs: usize,
    pub missing_blobs: usize,
}

pub fn run<R: RecordStore, B: BlobStore>(
    records: &R,
    blobs: &B,
    output: Option<PathBuf>,
) -> Result<ExportSummary> {
    let finds = records.list()?;

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "trowel-{}.tar.gz",
            Utc::now().format("%Y-%m-%d_%H%M%S")
        ))
    });
    let file = File::create(&path).map_err(TrowelError::Io)?;

    let mut summary = ExportSummary {
        path,
        finds: finds.len(),
        blobs: 0,
        missing_blobs: 0,
    };
    write_archive(file, &finds, blobs, &mut summary)?;
    Ok(summary)
}

fn write_archive<W: Write, B: BlobStore>(
    writer: W,
    finds: &[crate::model::Find],
    blobs: &B,
    summary: &mut ExportSummary,
) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    let json = serde_json::to_vec_pretty(finds).map_err(TrowelError::Serialization)?;
    append_entry(&mut tar, ARCHIVE_FINDS, &json)?;

    let mut written: HashSet<&str> = HashSet::new();
    for find in finds {
        for reference in &find.media {
            if !written.insert(reference.id.as_str()) {
                continue;
            }
            match blobs.get(&reference.id) {
                Ok(Some(entry)) => {
                    let name = format!("{}{}.bin", ARCHIVE_MEDIA_DIR, reference.id);
                    append_entry(&mut tar, &name, &entry.bytes)?;
                    summary.blobs += 1;
                }
                Ok(None) => {
                    warn!(media_id = %reference.id, "blob missing, skipped in export");
                    summary.missing_blobs += 1;
                }
                Err(err) => {
                    warn!(media_id = %reference.id, error = %err, "blob unreadable, skipped in export");
                    summary.missing_blobs += 1;
                }
            }
        }
    }

    tar.finish().map_err(TrowelError::Io)?;
    Ok(())
}

fn append_entry<W: Write>(
    tar: &mut tar::Builder<W>,
    name: &str,
    contents: &[u8],
) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, Path::new(name), contents)
        .map_err(TrowelError::Io)?;
    Ok(())
}
