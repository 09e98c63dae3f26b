use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use eyre::{Result, eyre};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Segment;

const VIDEOS_KEY: &str = "videos";
const PAYMENTS_KEY: &str = "payments";

/// Fixed amount recorded by the demo payment stub
const SIMULATED_AMOUNT: f64 = 1.0;

/// Key-value slots backing the ledger. Implementations only provide
/// whole-value get/set; the ledger does read-modify-write on top, so a
/// write is atomic only at the granularity of one slot.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key under the user's local data dir
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn open_default() -> Self {
        Self { root: default_store_dir() }
    }

    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

fn default_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("subtrans")
        .join("store")
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path(key);
        std::fs::write(&path, value)?;
        debug!("Wrote storage slot: {}", path.display());
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().map_err(|_| eyre!("storage mutex poisoned"))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| eyre!("storage mutex poisoned"))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedVideo {
    pub id: String,
    pub title: String,
    pub language: String,
    pub subtitles: Vec<Segment>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub video_id: String,
    pub payment_id: String,
    pub amount: f64,
    pub timestamp: String,
}

/// Local record of translated videos and payment events.
///
/// Storage and serialization failures never escape: writes report a
/// boolean outcome, reads fall back to empty values. Corrupt slots are
/// logged and discarded.
pub struct Ledger<S> {
    storage: S,
}

impl<S: Storage> Ledger<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn video_key(video_id: &str, language: &str) -> String {
        format!("{video_id}_{language}")
    }

    /// Upsert the translated subtitles for a (video, language) pair
    pub fn save_translated_video(
        &self,
        video_id: &str,
        title: &str,
        language: &str,
        subtitles: &[Segment],
    ) -> bool {
        let mut videos = self.saved_videos();
        videos.insert(
            Self::video_key(video_id, language),
            SavedVideo {
                id: video_id.to_string(),
                title: if title.is_empty() { format!("Video {video_id}") } else { title.to_string() },
                language: language.to_string(),
                subtitles: subtitles.to_vec(),
                timestamp: Utc::now().to_rfc3339(),
            },
        );
        self.write_slot(VIDEOS_KEY, &videos)
    }

    pub fn saved_videos(&self) -> HashMap<String, SavedVideo> {
        self.read_slot(VIDEOS_KEY)
    }

    pub fn is_video_translated(&self, video_id: &str, language: &str) -> bool {
        self.saved_videos().contains_key(&Self::video_key(video_id, language))
    }

    pub fn translated_subtitles(&self, video_id: &str, language: &str) -> Option<Vec<Segment>> {
        self.saved_videos()
            .remove(&Self::video_key(video_id, language))
            .map(|v| v.subtitles)
    }

    /// Append a payment event; a video may accumulate several
    pub fn record_payment(&self, video_id: &str, payment_id: &str, amount: f64) -> bool {
        let mut payments = self.payments();
        payments.push(Payment {
            video_id: video_id.to_string(),
            payment_id: payment_id.to_string(),
            amount,
            timestamp: Utc::now().to_rfc3339(),
        });
        self.write_slot(PAYMENTS_KEY, &payments)
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.read_slot(PAYMENTS_KEY)
    }

    pub fn is_video_paid(&self, video_id: &str) -> bool {
        self.payments().iter().any(|p| p.video_id == video_id)
    }

    /// Demo payment stub: synthetic id, fixed amount, not a real integration
    pub fn simulate_payment(&self, video_id: &str) -> bool {
        let payment_id = format!("demo_{}", Uuid::new_v4().simple());
        self.record_payment(video_id, &payment_id, SIMULATED_AMOUNT)
    }

    fn read_slot<T: Default + serde::de::DeserializeOwned>(&self, key: &str) -> T {
        match self.storage.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    error!("Discarding unreadable {key} slot: {e}");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                error!("Storage read failed for {key}: {e}");
                T::default()
            }
        }
    }

    fn write_slot<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Could not serialize {key} slot: {e}");
                return false;
            }
        };
        match self.storage.set(key, &raw) {
            Ok(()) => true,
            Err(e) => {
                error!("Storage write failed for {key}: {e}");
                false
            }
        }
    }
}
