//! Save slot on top of a small key-value store.
//!
//! A save is four entries: a magic number, a format version, the pet record
//! encoded with bincode (fixed-width integers, so the blob has a fixed
//! length), and the clock reading at save time. Anything that does not
//! match exactly is reported as [`LoadError`] and treated by callers as
//! "no usable save".

use crate::clock::Millis;
use crate::config::atomic_rename;
use crate::model::PetState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub const SAVE_MAGIC: u32 = 0x5354_4147; // "STAG"
pub const SAVE_VERSION: u8 = 1;

const KEY_MAGIC: &str = "magic";
const KEY_VERSION: &str = "version";
const KEY_PET: &str = "petdata";
const KEY_SAVED_AT: &str = "save_ms";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not encode pet record: {0}")]
    Encode(#[from] bincode::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no save data")]
    NoSave,
    #[error("save magic {0:#010x} does not match")]
    BadMagic(u32),
    #[error("save version {found} is not {expected}")]
    BadVersion { expected: u8, found: u8 },
    #[error("pet record is {found} bytes, expected {expected}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("pet record could not be decoded: {0}")]
    Decode(#[from] bincode::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredValue {
    U8(u8),
    U32(u32),
    U64(u64),
    Bytes(Vec<u8>),
}

/// Namespaced preferences-style storage. Writes are staged until
/// [`KeyValueStore::commit`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<StoredValue>;
    fn put(&mut self, key: &str, value: StoredValue);
    fn clear(&mut self);
    fn commit(&mut self) -> Result<(), StoreError>;

    fn get_u8(&self, key: &str) -> Option<u8> {
        match self.get(key)? {
            StoredValue::U8(v) => Some(v),
            _ => None,
        }
    }

    fn get_u32(&self, key: &str) -> Option<u32> {
        match self.get(key)? {
            StoredValue::U32(v) => Some(v),
            _ => None,
        }
    }

    fn get_u64(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            StoredValue::U64(v) => Some(v),
            _ => None,
        }
    }

    fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        match self.get(key)? {
            StoredValue::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, StoredValue>,
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the store has been committed.
    pub fn commits(&self) -> usize {
        self.commits
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        self.entries.insert(key.to_string(), value);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.commits += 1;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    written_utc: DateTime<Utc>,
    entries: BTreeMap<String, StoredValue>,
}

/// JSON document on disk, replaced atomically on every commit.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, StoredValue>,
}

impl FileStore {
    /// Opens the store at `path`. A missing or unreadable document starts
    /// out empty.
    pub fn open(path: &Path) -> Self {
        let entries = fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str::<StoreFile>(&s).ok())
            .map(|f| f.entries)
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        self.entries.insert(key.to_string(), value);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        let doc = StoreFile {
            written_utc: Utc::now(),
            entries: self.entries.clone(),
        };
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&doc)?)?;
        atomic_rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Encoded length of a pet record. Every field is fixed-width.
pub fn snapshot_len() -> usize {
    bincode::serialized_size(&PetState::default()).map_or(0, |n| n as usize)
}

pub fn has_save(store: &dyn KeyValueStore) -> bool {
    store.get_u32(KEY_MAGIC) == Some(SAVE_MAGIC)
}

pub fn save_game(
    store: &mut dyn KeyValueStore,
    pet: &PetState,
    now: Millis,
) -> Result<(), StoreError> {
    let blob = bincode::serialize(pet)?;
    store.put(KEY_MAGIC, StoredValue::U32(SAVE_MAGIC));
    store.put(KEY_VERSION, StoredValue::U8(SAVE_VERSION));
    store.put(KEY_PET, StoredValue::Bytes(blob));
    store.put(KEY_SAVED_AT, StoredValue::U64(u64::from(now.0)));
    store.commit()?;
    debug!(at = now.0, character = ?pet.character, "game saved");
    Ok(())
}

/// Reads the save slot and re-anchors every timer at `now`.
pub fn load_game(store: &dyn KeyValueStore, now: Millis) -> Result<PetState, LoadError> {
    let magic = store.get_u32(KEY_MAGIC).ok_or(LoadError::NoSave)?;
    if magic != SAVE_MAGIC {
        return Err(LoadError::BadMagic(magic));
    }
    let version = store.get_u8(KEY_VERSION).unwrap_or(0);
    if version != SAVE_VERSION {
        return Err(LoadError::BadVersion {
            expected: SAVE_VERSION,
            found: version,
        });
    }
    let blob = store.get_bytes(KEY_PET).unwrap_or_default();
    let expected = snapshot_len();
    if blob.len() != expected {
        return Err(LoadError::SizeMismatch {
            expected,
            found: blob.len(),
        });
    }
    let mut pet: PetState = bincode::deserialize(&blob)?;
    let saved_at = store.get_u64(KEY_SAVED_AT).unwrap_or(0);
    pet.rebase_timers(now);
    info!(saved_at, now = now.0, character = ?pet.character, "game loaded");
    Ok(pet)
}

pub fn clear_save(store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
    store.clear();
    store.commit()?;
    info!("save cleared");
    Ok(())
}

/// Logs and swallows a failed write; persistence never stops the game.
pub fn report(result: Result<(), StoreError>) {
    if let Err(e) = result {
        warn!(error = %e, "save slot write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterId, LifeStage};
    use crate::model::Attention;

    fn sample_pet() -> PetState {
        let mut p = PetState::new_egg(Millis(500));
        p.character = CharacterId::Rover;
        p.stage = LifeStage::Adult;
        p.hunger = 1;
        p.happiness = 3;
        p.discipline = 62;
        p.weight = 33;
        p.age = 12;
        p.poop_count = 2;
        p.sick = true;
        p.sickness_level = 2;
        p.care_mistakes = 1;
        p.total_care_mistakes = 4;
        p.attention = Attention::Hungry;
        p.ready_to_evolve = true;
        p
    }

    #[test]
    fn snapshot_has_fixed_length() {
        let a = bincode::serialize(&PetState::default()).unwrap();
        let b = bincode::serialize(&sample_pet()).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.len(), snapshot_len());
    }

    #[test]
    fn empty_store_has_no_save() {
        let store = MemoryStore::new();
        assert!(!has_save(&store));
        assert!(matches!(load_game(&store, Millis(0)), Err(LoadError::NoSave)));
    }

    #[test]
    fn load_rebases_and_keeps_stats() {
        let mut store = MemoryStore::new();
        let before = sample_pet();
        save_game(&mut store, &before, Millis(9_000)).unwrap();
        assert!(has_save(&store));

        let now = Millis(42);
        let after = load_game(&store, now).unwrap();
        assert_eq!(after.hunger, before.hunger);
        assert_eq!(after.happiness, before.happiness);
        assert_eq!(after.discipline, before.discipline);
        assert_eq!(after.weight, before.weight);
        assert_eq!(after.age, before.age);
        assert_eq!(after.poop_count, before.poop_count);
        assert_eq!(after.sick, before.sick);
        assert_eq!(after.character, before.character);
        assert_eq!(after.stage, before.stage);
        assert_eq!(after.total_care_mistakes, before.total_care_mistakes);
        assert_eq!(after.stage_start, now);
        assert_eq!(after.last_sick_check, now);
        assert_eq!(after.attention, Attention::None);
        assert!(!after.ready_to_evolve);
    }

    #[test]
    fn header_mismatches_are_rejected() {
        let mut store = MemoryStore::new();
        save_game(&mut store, &sample_pet(), Millis(0)).unwrap();

        store.put(KEY_VERSION, StoredValue::U8(2));
        assert!(matches!(
            load_game(&store, Millis(0)),
            Err(LoadError::BadVersion { found: 2, .. })
        ));

        store.put(KEY_VERSION, StoredValue::U8(SAVE_VERSION));
        store.put(KEY_MAGIC, StoredValue::U32(0xDEAD_BEEF));
        assert!(!has_save(&store));
        assert!(matches!(load_game(&store, Millis(0)), Err(LoadError::BadMagic(_))));
    }

    #[test]
    fn short_blob_is_rejected() {
        let mut store = MemoryStore::new();
        save_game(&mut store, &sample_pet(), Millis(0)).unwrap();
        let mut blob = store.get_bytes(KEY_PET).unwrap();
        blob.truncate(blob.len() - 1);
        store.put(KEY_PET, StoredValue::Bytes(blob));
        assert!(matches!(
            load_game(&store, Millis(0)),
            Err(LoadError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn clear_drops_the_slot() {
        let mut store = MemoryStore::new();
        save_game(&mut store, &sample_pet(), Millis(0)).unwrap();
        clear_save(&mut store).unwrap();
        assert!(!has_save(&store));
        assert_eq!(store.commits(), 2);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("pocketpet-store-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("save.json");

        let mut store = FileStore::open(&path);
        save_game(&mut store, &sample_pet(), Millis(7)).unwrap();

        let reopened = FileStore::open(&path);
        assert!(has_save(&reopened));
        let pet = load_game(&reopened, Millis(1)).unwrap();
        assert_eq!(pet.weight, 33);

        fs::remove_dir_all(&dir).ok();
    }
}
