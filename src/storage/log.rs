use crate::storage::KeyValueStore;
use anyhow::{anyhow, bail, Context, Result};
use dashmap::DashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// One `SET|key|hex(value)` line of the storage log
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub key: String,
    pub value: String,
}

impl LogRecord {
    fn encode(&self) -> String {
        format!("SET|{}|{}", self.key, hex::encode(&self.value))
    }

    fn decode(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('|').collect();

        match parts.as_slice() {
            ["SET", key, value] => {
                let bytes = hex::decode(value).context("Invalid value hex")?;
                let value = String::from_utf8(bytes).context("Value is not valid UTF-8")?;
                Ok(LogRecord {
                    key: key.to_string(),
                    value,
                })
            }
            ["SET", ..] => bail!("Invalid SET format"),
            _ => bail!("Unknown record type"),
        }
    }
}

/// File-backed key-value storage
///
/// Every write is appended to the log and flushed before the in-memory view
/// is updated. On open the log is replayed, and replaced by a log with one
/// record per live key when it holds superseded records.
pub struct FileStorage {
    file: Mutex<File>,
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileStorage {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create storage directory: {}", parent.display()))?;
        }

        let storage = FileStorage {
            file: Mutex::new(open_append(&path)?),
            path,
            entries: DashMap::new(),
        };

        let records = storage.replay()?;
        let record_count = records.len();
        for record in records {
            storage.entries.insert(record.key, record.value);
        }

        if record_count > storage.entries.len() {
            // A failed compaction leaves the full log in place
            match storage.compact() {
                Ok(()) => tracing::debug!(
                    records_before = record_count,
                    records_after = storage.entries.len(),
                    "Storage log compacted"
                ),
                Err(e) => tracing::warn!(
                    error = %e,
                    path = %storage.path.display(),
                    "Storage log compaction failed, keeping the full log"
                ),
            }
        }

        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every valid record in the log, in write order
    pub fn replay(&self) -> Result<Vec<LogRecord>> {
        let file = File::open(&self.path).context("Failed to open storage log for replay")?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from storage log")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match LogRecord::decode(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse storage log line, skipping"
                    );
                }
            }
        }

        Ok(records)
    }

    /// Replace the log with one SET record per live key
    ///
    /// The records go to a sibling file that is synced and then renamed over
    /// the log, so the log on disk is always either the old one or the new one.
    pub fn compact(&self) -> Result<()> {
        let mut file = self.lock_file()?;
        let compact_path = self.compact_path();

        let result = self.write_compacted(&compact_path);
        if result.is_err() {
            let _ = std::fs::remove_file(&compact_path);
        }
        result?;

        std::fs::rename(&compact_path, &self.path).context(format!(
            "Failed to replace storage log: {}",
            self.path.display()
        ))?;

        *file = open_append(&self.path)?;
        Ok(())
    }

    fn write_compacted(&self, compact_path: &Path) -> Result<()> {
        let file = File::create(compact_path).context(format!(
            "Failed to create compacted storage log: {}",
            compact_path.display()
        ))?;
        let mut writer = BufWriter::new(file);

        for entry in self.entries.iter() {
            let record = LogRecord {
                key: entry.key().clone(),
                value: entry.value().clone(),
            };
            writeln!(writer, "{}", record.encode()).context("Failed to write compacted storage log")?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush compacted storage log: {}", e.error()))?;
        file.sync_all().context("Failed to sync compacted storage log")?;
        Ok(())
    }

    fn compact_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".compact");
        PathBuf::from(name)
    }

    fn append(&self, record: &LogRecord) -> Result<()> {
        let mut file = self.lock_file()?;
        writeln!(file, "{}", record.encode()).context("Failed to write storage log")?;
        file.flush().context("Failed to flush storage log")?;
        Ok(())
    }

    fn lock_file(&self) -> Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| anyhow!("Storage log lock poisoned"))
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context(format!("Failed to open storage log: {}", path.display()))
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains('|') || key.contains('\n') {
        bail!("Invalid storage key: {:?}", key);
    }
    Ok(())
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        check_key(key)?;
        self.append(&LogRecord {
            key: key.to_string(),
            value: value.clone(),
        })?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
