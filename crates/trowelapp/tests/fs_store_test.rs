use std::fs;

use chrono::Utc;
use tempfile::TempDir;
use trowelapp::media::{MediaKind, StagedMedia};
use trowelapp::model::Find;
use trowelapp::store::fs::{FsBlobStore, FsRecordStore};
use trowelapp::store::{BlobStore, RecordStore};

fn find(id: &str) -> Find {
    Find {
        id: id.to_string(),
        site: "תל מגידו".to_string(),
        plot: "א".to_string(),
        layer: "1".to_string(),
        description: "חרס".to_string(),
        location: "32.5856,35.1825".to_string(),
        datetime_text: "01/08/2026 09:15:00".to_string(),
        created_at: Utc::now(),
        created_by: "dig@example.org".to_string(),
        updated_at: None,
        media: Vec::new(),
    }
}

fn staged(id: &str, bytes: Vec<u8>) -> StagedMedia {
    StagedMedia {
        id: id.to_string(),
        kind: MediaKind::Image,
        mime: "image/jpeg".to_string(),
        name: format!("{}.jpg", id),
        payload: Some(bytes),
        stored: false,
    }
}

#[test]
fn test_record_store_crud_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut store = FsRecordStore::new(dir.path().to_path_buf());

    assert!(store.list().unwrap().is_empty());

    store.add(&find("FIND-1")).unwrap();
    store.add(&find("FIND-2")).unwrap();

    let ids: Vec<String> = store.list().unwrap().into_iter().map(|f| f.id).collect();
    assert_eq!(ids, vec!["FIND-2", "FIND-1"]);

    let mut changed = find("FIND-1");
    changed.description = "מטבע".to_string();
    store.update(&changed).unwrap();

    let reloaded = store.get("FIND-1").unwrap().unwrap();
    assert_eq!(reloaded.description, "מטבע");

    assert!(store.delete("FIND-1").unwrap());
    assert!(store.get("FIND-1").unwrap().is_none());
    assert!(!store.delete("FIND-1").unwrap());
}

#[test]
fn test_record_store_survives_process_boundaries() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = FsRecordStore::new(dir.path().to_path_buf());
        store.add(&find("FIND-1")).unwrap();
    }
    // A fresh handle over the same directory sees the data.
    let store = FsRecordStore::new(dir.path().to_path_buf());
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_record_store_treats_corrupt_file_as_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("finds.json"), "{{{ not json").unwrap();

    let mut store = FsRecordStore::new(dir.path().to_path_buf());
    assert!(store.list().unwrap().is_empty());

    // And the next write repairs it.
    store.add(&find("FIND-1")).unwrap();
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_record_store_leaves_no_tmp_artifacts() {
    let dir = TempDir::new().unwrap();
    let mut store = FsRecordStore::new(dir.path().to_path_buf());
    store.add(&find("FIND-1")).unwrap();
    store.delete("FIND-1").unwrap();

    for entry in fs::read_dir(dir.path()).unwrap() {
        let name = entry.unwrap().file_name().to_string_lossy().into_owned();
        assert!(!name.ends_with(".tmp"), "leftover tmp file: {}", name);
    }
}

#[test]
fn test_blob_store_put_get_delete() {
    let dir = TempDir::new().unwrap();
    let mut blobs = FsBlobStore::new(dir.path().join("media"));

    blobs
        .put(&[staged("M-1", vec![1, 2, 3]), staged("M-2", vec![4])])
        .unwrap();

    let entry = blobs.get("M-1").unwrap().unwrap();
    assert_eq!(entry.bytes, vec![1, 2, 3]);
    assert_eq!(entry.kind, MediaKind::Image);
    assert_eq!(entry.name, "M-1.jpg");

    blobs.delete("M-1").unwrap();
    assert!(blobs.get("M-1").unwrap().is_none());
    assert!(blobs.get("M-2").unwrap().is_some());

    // Idempotent delete.
    blobs.delete("M-1").unwrap();
}

#[test]
fn test_blob_store_missing_id_is_none() {
    let dir = TempDir::new().unwrap();
    let blobs = FsBlobStore::new(dir.path().join("media"));
    assert!(blobs.get("M-404").unwrap().is_none());
}

#[test]
fn test_blob_batch_with_missing_payload_commits_nothing() {
    let dir = TempDir::new().unwrap();
    let mut blobs = FsBlobStore::new(dir.path().join("media"));

    let mut bad = staged("M-2", vec![9]);
    bad.payload = None;

    assert!(blobs.put(&[staged("M-1", vec![1]), bad]).is_err());
    assert!(blobs.get("M-1").unwrap().is_none());
}

#[test]
fn test_blob_payload_files_on_disk() {
    let dir = TempDir::new().unwrap();
    let media_dir = dir.path().join("media");
    let mut blobs = FsBlobStore::new(media_dir.clone());

    blobs.put(&[staged("M-1", vec![7, 7])]).unwrap();

    assert!(media_dir.join("media-M-1.bin").exists());
    assert!(media_dir.join("media.json").exists());

    blobs.delete("M-1").unwrap();
    assert!(!media_dir.join("media-M-1.bin").exists());
}
