use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::history::TimingHistory;
use crate::store::schema::HistoryData;

const HISTORY_FILE: &str = "history.json";

/// Owns the single persisted slot holding the lifetime TimingHistory. The
/// core never touches this; the session controller loads at startup and
/// saves once per completed session.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typedrill");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self) -> PathBuf {
        self.base_dir.join(HISTORY_FILE)
    }

    /// Load the persisted history. A missing, unparseable, or
    /// schema-mismatched slot all come back as a fresh empty history — a
    /// corrupt record is treated as absent, never surfaced as an error.
    pub fn load_history(&self) -> TimingHistory {
        let path = self.file_path();
        if !path.exists() {
            return TimingHistory::default();
        }
        let data: HistoryData = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => HistoryData::default(),
        };
        if data.needs_reset() {
            return TimingHistory::default();
        }
        data.history
    }

    /// Atomic save: write to a temp file, sync, then rename over the slot.
    pub fn save_history(&self, history: &TimingHistory) -> Result<()> {
        let path = self.file_path();
        let tmp_path = path.with_extension("tmp");

        let data = HistoryData {
            history: history.clone(),
            ..HistoryData::default()
        };
        let json = serde_json::to_string_pretty(&data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// User-initiated "delete data": remove the slot entirely.
    pub fn delete_history(&self) -> Result<()> {
        let path = self.file_path();
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
