//! End-to-end lifecycle flows against the real filesystem stores.

use tempfile::TempDir;
use trowelapp::api::FindsApi;
use trowelapp::error::TrowelError;
use trowelapp::location::{FixedLocation, UnavailableLocation};
use trowelapp::media::PickedFile;
use trowelapp::model::FindInput;
use trowelapp::store::fs::{FsBlobStore, FsRecordStore};
use trowelapp::user::User;

fn api(dir: &TempDir) -> FindsApi<FsRecordStore, FsBlobStore> {
    FindsApi::new(
        FsRecordStore::new(dir.path().to_path_buf()),
        FsBlobStore::new(dir.path().join("media")),
        User::new("דנה", "dana@dig.org", "חופרת", "תל מגידו").unwrap(),
    )
}

fn input(desc: &str) -> FindInput {
    FindInput::new("א".into(), "1".into(), desc.into()).unwrap()
}

fn image(name: &str, bytes: Vec<u8>) -> PickedFile {
    PickedFile {
        name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        bytes,
    }
}

#[test]
fn test_create_list_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut api = api(&dir);

    let session = api.open_new(Some("FIND-1".into()));
    api.save_find(session, input("חרס"), &UnavailableLocation)
        .unwrap();

    let finds = api.list_finds().unwrap();
    assert_eq!(finds.len(), 1);
    assert_eq!(finds[0].id, "FIND-1");
    assert_eq!(finds[0].site, "תל מגידו");
    assert_eq!(finds[0].plot, "א");
    assert_eq!(finds[0].layer, "1");
    assert_eq!(finds[0].description, "חרס");
    assert!(finds[0].media.is_empty());
}

#[test]
fn test_edit_adds_image_and_blob_is_readable() {
    let dir = TempDir::new().unwrap();
    let mut api = api(&dir);

    let session = api.open_new(Some("FIND-1".into()));
    api.save_find(session, input("חרס"), &UnavailableLocation)
        .unwrap();

    let mut session = api.open_edit("FIND-1").unwrap();
    session.attach(vec![image("sherd.jpg", vec![3, 1, 4])]).unwrap();
    api.save_find(session, input("חרס"), &UnavailableLocation)
        .unwrap();

    let view = api.get_find("FIND-1").unwrap().unwrap();
    assert_eq!(view.find.media.len(), 1);
    assert!(view.media[0].available);
    assert!(view.find.updated_at.is_some());
}

#[test]
fn test_edit_keeps_location_and_datetime() {
    let dir = TempDir::new().unwrap();
    let mut api = api(&dir);

    let session = api.open_new(None);
    let created = api
        .save_find(session, input("חרס"), &FixedLocation("32.58,35.18".into()))
        .unwrap();

    let session = api.open_edit(&created.id).unwrap();
    let edited = api
        .save_find(session, input("מטבע"), &FixedLocation("0,0".into()))
        .unwrap();

    assert_eq!(edited.location, "32.58,35.18");
    assert_eq!(edited.datetime_text, created.datetime_text);
    assert_eq!(edited.description, "מטבע");
}

#[test]
fn test_remove_media_cascades_on_save() {
    let dir = TempDir::new().unwrap();
    let mut api = api(&dir);

    let mut session = api.open_new(Some("FIND-1".into()));
    session
        .attach(vec![image("keep.jpg", vec![1]), image("drop.jpg", vec![2])])
        .unwrap();
    let created = api
        .save_find(session, input("חרס"), &UnavailableLocation)
        .unwrap();
    let dropped = created.media[1].id.clone();

    let mut session = api.open_edit("FIND-1").unwrap();
    assert!(session.detach(&dropped));
    api.save_find(session, input("חרס"), &UnavailableLocation)
        .unwrap();

    let view = api.get_find("FIND-1").unwrap().unwrap();
    assert_eq!(view.find.media.len(), 1);
    assert_eq!(view.find.media[0].name, "keep.jpg");
}

#[test]
fn test_delete_find_removes_record_and_blobs() {
    let dir = TempDir::new().unwrap();
    let mut api = api(&dir);

    let mut session = api.open_new(Some("FIND-1".into()));
    session.attach(vec![image("sherd.jpg", vec![9])]).unwrap();
    api.save_find(session, input("חרס"), &UnavailableLocation)
        .unwrap();

    let outcome = api.delete_find("FIND-1").unwrap();
    assert!(outcome.failed_blob_ids.is_empty());

    assert!(api.get_find("FIND-1").unwrap().is_none());
    assert!(!dir
        .path()
        .join("media")
        .join(format!("media-{}.bin", outcome.removed.media[0].id))
        .exists());
}

#[test]
fn test_open_edit_of_unknown_find_fails() {
    let dir = TempDir::new().unwrap();
    let api = api(&dir);
    assert!(matches!(
        api.open_edit("FIND-404"),
        Err(TrowelError::FindNotFound(_))
    ));
}

#[test]
fn test_export_import_roundtrip() {
    let source_dir = TempDir::new().unwrap();
    let mut source = api(&source_dir);

    let mut session = source.open_new(Some("FIND-1".into()));
    session.attach(vec![image("sherd.jpg", vec![1, 2, 3])]).unwrap();
    source
        .save_find(session, input("חרס"), &UnavailableLocation)
        .unwrap();

    let session = source.open_new(Some("FIND-2".into()));
    source
        .save_find(session, input("מטבע"), &UnavailableLocation)
        .unwrap();

    let bundle = source_dir.path().join("bundle.tar.gz");
    let summary = source.export(Some(bundle.clone())).unwrap();
    assert_eq!(summary.finds, 2);
    assert_eq!(summary.blobs, 1);
    assert_eq!(summary.missing_blobs, 0);

    // Import into a fresh store.
    let target_dir = TempDir::new().unwrap();
    let mut target = api(&target_dir);
    let imported = target.import(&bundle).unwrap();
    assert_eq!(imported.added, 2);
    assert_eq!(imported.skipped, 0);
    assert_eq!(imported.blobs, 1);

    let finds = target.list_finds().unwrap();
    let ids: Vec<&str> = finds.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["FIND-2", "FIND-1"]);

    let view = target.get_find("FIND-1").unwrap().unwrap();
    assert!(view.media[0].available);

    // Importing the same bundle again skips everything.
    let again = target.import(&bundle).unwrap();
    assert_eq!(again.added, 0);
    assert_eq!(again.skipped, 2);
}
