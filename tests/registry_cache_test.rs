use fdic_probe::core::registry::{RegistryLoader, ARCHIVE_FILE, CACHE_FILE, DATA_FILE};
use fdic_probe::{LocalStorage, ProbeError};
use httpmock::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use zip::write::{SimpleFileOptions, ZipWriter};

const REGISTRY_CSV: &str = "\
NAME,CERT,STNAME,CITY,ACTIVE
Bank A,101,Texas,Austin,1
Bank B,102,Ohio,Dayton,1
Old Bank,103,Maine,Bangor,0
";

fn registry_zip(csv: &str) -> Vec<u8> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file(DATA_FILE, SimpleFileOptions::default()).unwrap();
    zip.write_all(csv.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

fn set_modified(path: &Path, time: SystemTime) {
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

#[tokio::test]
async fn test_fresh_cache_skips_extraction_and_download() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let archive_mock = server.mock(|when, then| {
        when.method(GET).path("/Institutions2.zip");
        then.status(200).body(registry_zip(REGISTRY_CSV));
    });

    // an archive that would fail to extract proves the cache is what gets read
    let archive_path = temp_dir.path().join(ARCHIVE_FILE);
    std::fs::write(&archive_path, b"not a zip").unwrap();
    set_modified(&archive_path, SystemTime::now() - Duration::from_secs(3600));
    std::fs::write(
        temp_dir.path().join(CACHE_FILE),
        "{\"Cert\":555,\"Name\":\"Cached Bank\",\"City\":\"Reno\",\"State\":\"Nevada\",\"Active\":true}\n",
    )
    .unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let loader = RegistryLoader::new(&storage, Client::new(), server.url("/Institutions2.zip"));
    let records = loader.load().await.unwrap();

    archive_mock.assert_hits(0);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identifier, Some(555));
    assert_eq!(records[0].name, "Cached Bank");
}

#[tokio::test]
async fn test_missing_archive_is_downloaded_and_cached() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let archive_mock = server.mock(|when, then| {
        when.method(GET).path("/Institutions2.zip");
        then.status(200).body(registry_zip(REGISTRY_CSV));
    });

    let storage = LocalStorage::new(temp_dir.path());
    let loader = RegistryLoader::new(&storage, Client::new(), server.url("/Institutions2.zip"));
    let records = loader.load().await.unwrap();

    archive_mock.assert_hits(1);
    assert_eq!(records.len(), 3);
    assert!(temp_dir.path().join(ARCHIVE_FILE).exists());

    let cache = std::fs::read_to_string(temp_dir.path().join(CACHE_FILE)).unwrap();
    assert_eq!(cache.lines().count(), 3);
    assert!(cache.contains("\"Name\":\"Old Bank\""));
}

#[tokio::test]
async fn test_stale_cache_is_rebuilt_from_archive() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join(CACHE_FILE);
    std::fs::write(&cache_path, "{\"Cert\":1,\"Name\":\"Stale\",\"City\":\"\",\"State\":\"\",\"Active\":true}\n").unwrap();
    set_modified(&cache_path, SystemTime::now() - Duration::from_secs(7200));
    std::fs::write(temp_dir.path().join(ARCHIVE_FILE), registry_zip(REGISTRY_CSV)).unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let loader = RegistryLoader::new(&storage, Client::new(), "http://127.0.0.1:9/unused.zip");
    let records = loader.load().await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, "Bank A");
    let cache = std::fs::read_to_string(&cache_path).unwrap();
    assert!(!cache.contains("Stale"));
}

#[tokio::test]
async fn test_corrupt_archive_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(ARCHIVE_FILE), b"garbage").unwrap();

    let storage = LocalStorage::new(temp_dir.path());
    let loader = RegistryLoader::new(&storage, Client::new(), "http://127.0.0.1:9/unused.zip");
    let err = loader.load().await.unwrap_err();

    assert!(matches!(err, ProbeError::RegistryUnavailable { .. }));
    assert_ne!(err.exit_code(), 0);
}
