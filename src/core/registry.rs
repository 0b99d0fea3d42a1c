use crate::domain::model::InstitutionRecord;
use crate::domain::ports::Storage;
use crate::utils::error::{ProbeError, Result};
use chrono::{DateTime, Local};
use reqwest::Client;
use std::io::{Cursor, Read};
use std::time::SystemTime;

pub const DEFAULT_ARCHIVE_URL: &str = "http://www2.fdic.gov/idasp/Institutions2.zip";
pub const ARCHIVE_FILE: &str = "Institutions2.zip";
pub const DATA_FILE: &str = "INSTITUTIONS2.CSV";
pub const CACHE_FILE: &str = "fdic_certs.json";

/// Loads the FDIC institution list, keeping a JSON-lines projection of the
/// archive's CSV in the data directory.
pub struct RegistryLoader<'s, S: Storage> {
    storage: &'s S,
    client: Client,
    archive_url: String,
}

impl<'s, S: Storage> RegistryLoader<'s, S> {
    pub fn new(storage: &'s S, client: Client, archive_url: impl Into<String>) -> Self {
        Self {
            storage,
            client,
            archive_url: archive_url.into(),
        }
    }

    /// Every institution in the registry, active or not.
    ///
    /// Any failure here means there is nothing to probe, so it surfaces as
    /// [`ProbeError::RegistryUnavailable`] (network failures fetching the
    /// archive keep their own category).
    pub async fn load(&self) -> Result<Vec<InstitutionRecord>> {
        let mut archive_modified = self.modified(ARCHIVE_FILE).await?;
        if archive_modified.is_none() {
            self.download_archive().await?;
            archive_modified = self.modified(ARCHIVE_FILE).await?;
        }
        let archive_modified = archive_modified
            .ok_or_else(|| self.unavailable(ARCHIVE_FILE, "archive missing after download"))?;

        if let Some(cache_modified) = self.modified(CACHE_FILE).await? {
            if cache_modified > archive_modified {
                tracing::info!(
                    "{} ({}) is more recent than {} ({}). Skipping extraction.",
                    CACHE_FILE,
                    format_time(cache_modified),
                    ARCHIVE_FILE,
                    format_time(archive_modified)
                );
                return self.read_cache().await;
            }
        }

        let records = self.extract_archive().await?;
        self.write_cache(&records).await?;
        Ok(records)
    }

    async fn modified(&self, path: &str) -> Result<Option<SystemTime>> {
        self.storage
            .modified(path)
            .await
            .map_err(|e| self.unavailable(path, e))
    }

    async fn download_archive(&self) -> Result<()> {
        tracing::info!("Downloading FDIC master list at {}...", self.archive_url);
        let response = self
            .client
            .get(&self.archive_url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;

        self.storage
            .write_file(ARCHIVE_FILE, &bytes)
            .await
            .map_err(|e| self.unavailable(ARCHIVE_FILE, e))?;
        tracing::info!("Downloaded {} bytes to {}", bytes.len(), ARCHIVE_FILE);
        Ok(())
    }

    async fn extract_archive(&self) -> Result<Vec<InstitutionRecord>> {
        let bytes = self
            .storage
            .read_file(ARCHIVE_FILE)
            .await
            .map_err(|e| self.unavailable(ARCHIVE_FILE, e))?;

        let csv_data = read_zip_member(&bytes, DATA_FILE)
            .map_err(|e| self.unavailable(ARCHIVE_FILE, e))?;
        let records = parse_registry_csv(&csv_data)
            .map_err(|e| self.unavailable(DATA_FILE, e))?;

        tracing::info!("Extracted {} institutions from {}", records.len(), DATA_FILE);
        Ok(records)
    }

    async fn read_cache(&self) -> Result<Vec<InstitutionRecord>> {
        let bytes = self
            .storage
            .read_file(CACHE_FILE)
            .await
            .map_err(|e| self.unavailable(CACHE_FILE, e))?;
        let records = parse_cache(&bytes).map_err(|e| self.unavailable(CACHE_FILE, e))?;
        tracing::debug!("Read {} institutions from {}", records.len(), CACHE_FILE);
        Ok(records)
    }

    async fn write_cache(&self, records: &[InstitutionRecord]) -> Result<()> {
        let data = render_cache(records)?;
        self.storage
            .write_file(CACHE_FILE, &data)
            .await
            .map_err(|e| self.unavailable(CACHE_FILE, e))?;
        tracing::debug!("Wrote {} institutions to {}", records.len(), CACHE_FILE);
        Ok(())
    }

    fn unavailable(&self, path: &str, reason: impl ToString) -> ProbeError {
        ProbeError::RegistryUnavailable {
            path: self.storage.full_path(path).display().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Active institutions only, unless `include_inactive` is set.
pub fn select_institutions(
    records: Vec<InstitutionRecord>,
    include_inactive: bool,
) -> Vec<InstitutionRecord> {
    if include_inactive {
        return records;
    }
    records.into_iter().filter(|record| record.active).collect()
}

fn read_zip_member(archive_bytes: &[u8], member: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive_bytes))?;
    let mut file = archive.by_name(member)?;
    // the declared size comes from the archive header and is not trusted
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

/// Parse the registry CSV. Columns are located by header name; text that is
/// not valid UTF-8 is decoded lossily.
pub fn parse_registry_csv(data: &[u8]) -> Result<Vec<InstitutionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data);

    let headers = reader.byte_headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}').trim() == name)
            .ok_or_else(|| ProbeError::RegistryUnavailable {
                path: DATA_FILE.to_string(),
                reason: format!("no {} column", name),
            })
    };
    let name_col = column("NAME")?;
    let cert_col = column("CERT")?;
    let state_col = column("STNAME")?;
    let city_col = column("CITY")?;
    let active_col = column("ACTIVE")?;

    let mut records = Vec::new();
    for row in reader.byte_records() {
        let row = row?;
        let field = |idx: usize| {
            row.get(idx)
                .map(|value| String::from_utf8_lossy(value).trim().to_string())
                .unwrap_or_default()
        };

        let cert = field(cert_col);
        let identifier = match cert.parse::<i64>() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Invalid CERT {:?} for {}: {}", cert, field(name_col), e);
                None
            }
        };

        records.push(InstitutionRecord {
            identifier,
            name: field(name_col),
            city: field(city_col),
            state: field(state_col),
            active: field(active_col) == "1",
        });
    }

    Ok(records)
}

fn parse_cache(data: &[u8]) -> Result<Vec<InstitutionRecord>> {
    serde_json::Deserializer::from_slice(data)
        .into_iter::<InstitutionRecord>()
        .map(|record| record.map_err(ProbeError::from))
        .collect()
}

fn render_cache(records: &[InstitutionRecord]) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    for record in records {
        serde_json::to_writer(&mut data, record)?;
        data.push(b'\n');
    }
    Ok(data)
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
