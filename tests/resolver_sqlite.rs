use std::path::PathBuf;

use wear_image_bridge::locator::{
    ContentAddress, DeviceEnv, LocatorResolver, MediaFamily, ResolveError, ResourceLocator,
    SqliteContentStore,
};

fn seeded_env() -> DeviceEnv<SqliteContentStore> {
    let store = SqliteContentStore::open_in_memory().expect("in-memory store");
    store.register_standard_collections().expect("register collections");
    store
        .insert_row(
            &MediaFamily::Image.address().with_appended_id(42),
            "/storage/emulated/0/DCIM/Camera/IMG_0042.jpg",
        )
        .expect("insert image row");
    store
        .insert_row(
            &ContentAddress::downloads().with_appended_id(7),
            "/storage/emulated/0/Download/cat.png",
        )
        .expect("insert download row");
    DeviceEnv::new("/storage/emulated/0", store)
}

fn resolve(uri: &str, env: &DeviceEnv<SqliteContentStore>) -> Result<PathBuf, ResolveError> {
    let locator = ResourceLocator::parse(uri).expect("parse uri");
    LocatorResolver::default().resolve(&locator, env)
}

#[test]
fn media_document_resolves_through_store() {
    let env = seeded_env();
    let path = resolve(
        "content://com.android.providers.media.documents/document/image%3A42",
        &env,
    )
    .expect("resolve");

    assert_eq!(path, PathBuf::from("/storage/emulated/0/DCIM/Camera/IMG_0042.jpg"));
}

#[test]
fn downloads_document_resolves_appended_row() {
    let env = seeded_env();
    let path = resolve(
        "content://com.android.providers.downloads.documents/document/7",
        &env,
    )
    .expect("resolve");

    assert_eq!(path, PathBuf::from("/storage/emulated/0/Download/cat.png"));
}

#[test]
fn raw_downloads_document_skips_store() {
    let env = seeded_env();
    let path = resolve(
        "content://com.android.providers.downloads.documents/document/raw%3A%2Fstorage%2Femulated%2F0%2FDownload%2Fa.jpg",
        &env,
    )
    .expect("resolve");

    assert_eq!(path, PathBuf::from("/storage/emulated/0/Download/a.jpg"));
}

#[test]
fn primary_external_document_joins_storage_root() {
    let env = seeded_env();
    let path = resolve(
        "content://com.android.externalstorage.documents/document/primary%3APictures%2Fa.jpg",
        &env,
    )
    .expect("resolve");

    assert_eq!(path, PathBuf::from("/storage/emulated/0/Pictures/a.jpg"));
}

#[test]
fn plain_content_uri_reads_data_column() {
    let env = seeded_env();
    let path = resolve("content://media/external/images/media/42", &env).expect("resolve");

    assert_eq!(path, PathBuf::from("/storage/emulated/0/DCIM/Camera/IMG_0042.jpg"));
}

#[test]
fn unregistered_root_address_falls_back_to_stripped_path() {
    let env = seeded_env();
    let path = resolve(
        "content://com.example.fileprovider/root/storage/emulated/0/Pictures/b.jpg",
        &env,
    )
    .expect("resolve");

    assert_eq!(path, PathBuf::from("/storage/emulated/0/Pictures/b.jpg"));
}

#[test]
fn missing_media_row_is_not_found() {
    let env = seeded_env();
    let result = resolve(
        "content://com.android.providers.media.documents/document/image%3A999",
        &env,
    );

    assert!(matches!(result, Err(ResolveError::NotFound(_))));
}

#[test]
fn unsupported_document_variants_are_rejected() {
    let env = seeded_env();

    assert!(matches!(
        resolve("content://com.android.externalstorage.documents/document/1234-5678%3Aa.jpg", &env),
        Err(ResolveError::UnsupportedDocumentType(_))
    ));
    assert!(matches!(
        resolve("content://com.android.providers.media.documents/document/document%3A1", &env),
        Err(ResolveError::UnsupportedMediaType(_))
    ));
    assert!(matches!(
        resolve("content://com.android.providers.downloads.documents/document/abc", &env),
        Err(ResolveError::InvalidRowId(_))
    ));
    assert!(matches!(
        resolve("content://com.example.docs/document/x%3A1", &env),
        Err(ResolveError::UnknownProvider(_))
    ));
    assert!(matches!(
        resolve("https://example.com/a.jpg", &env),
        Err(ResolveError::UnsupportedScheme(_))
    ));
}

#[test]
fn store_on_disk_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("media.db");
    {
        let store = SqliteContentStore::open(&db_path).expect("open store");
        store
            .insert_row(&MediaFamily::Video.address().with_appended_id(3), "/sdcard/Movies/v.mp4")
            .expect("insert");
    }

    let env = DeviceEnv::new("/sdcard", SqliteContentStore::open(&db_path).expect("reopen"));
    let path = resolve(
        "content://com.android.providers.media.documents/document/video%3A3",
        &env,
    )
    .expect("resolve");

    assert_eq!(path, PathBuf::from("/sdcard/Movies/v.mp4"));
}
