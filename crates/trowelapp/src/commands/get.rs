use crate::error::Result;
use crate::model::{Find, MediaRef};
use crate::store::{BlobStore, RecordStore};

/// One media ref paired with whether its blob is actually present: the
/// degraded-read view the UI renders as "preview unavailable".
#[derive(Debug, Clone)]
pub struct MediaView {
    pub reference: MediaRef,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct FindView {
    pub find: Find,
    pub media: Vec<MediaView>,
}

pub fn run<R: RecordStore, B: BlobStore>(
    records: &R,
    blobs: &B,
    id: &str,
) -> Result<Option<FindView>> {
    let Some(find) = records.get(id)? else {
        return Ok(None);
    };

    let media = find
        .media
        .iter()
        .map(|reference| MediaView {
            reference: reference.clone(),
            // A store error here is the same as a miss: no preview.
            available: matches!(blobs.get(&reference.id), Ok(Some(_))),
        })
        .collect();

    Ok(Some(FindView { find, media }))
}
