use crate::error::{PlannerError, Result};
use crate::readiness::ReadinessMap;
use crate::schema::{Card, Payment};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CARDS_KEY: &str = "cards";
pub const PAYMENTS_KEY: &str = "payments";
pub const READINESS_KEY: &str = "readiness";

const TMP_SUFFIX: &str = "tmp";

/// Durable home of the three planner collections. Every save replaces the whole collection.
pub trait Storage {
    fn load_cards(&self) -> Result<Vec<Card>>;
    fn save_cards(&mut self, cards: &[Card]) -> Result<()>;
    fn load_payments(&self) -> Result<Vec<Payment>>;
    fn save_payments(&mut self, payments: &[Payment]) -> Result<()>;
    fn load_readiness(&self) -> Result<ReadinessMap>;
    fn save_readiness(&mut self, readiness: &ReadinessMap) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub cards: Vec<Card>,
    pub payments: Vec<Payment>,
    pub readiness: ReadinessMap,
    /// Number of collection writes performed.
    pub writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            ..Self::default()
        }
    }
}

impl Storage for MemoryStorage {
    fn load_cards(&self) -> Result<Vec<Card>> {
        Ok(self.cards.clone())
    }

    fn save_cards(&mut self, cards: &[Card]) -> Result<()> {
        self.cards = cards.to_vec();
        self.writes += 1;
        Ok(())
    }

    fn load_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.clone())
    }

    fn save_payments(&mut self, payments: &[Payment]) -> Result<()> {
        self.payments = payments.to_vec();
        self.writes += 1;
        Ok(())
    }

    fn load_readiness(&self) -> Result<ReadinessMap> {
        Ok(self.readiness.clone())
    }

    fn save_readiness(&mut self, readiness: &ReadinessMap) -> Result<()> {
        self.readiness = readiness.clone();
        self.writes += 1;
        Ok(())
    }
}

/// One pretty-printed JSON document per collection inside `root`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let path = self.collection_path(key);
        if !path.exists() {
            return Ok(T::default());
        }
        let data = fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&data).map_err(|e| {
            PlannerError::Storage(format!("`{}` is not valid: {}", path.display(), e))
        })
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.collection_path(key);
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&path, &json)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn load_cards(&self) -> Result<Vec<Card>> {
        self.read(CARDS_KEY)
    }

    fn save_cards(&mut self, cards: &[Card]) -> Result<()> {
        self.write(CARDS_KEY, cards)
    }

    fn load_payments(&self) -> Result<Vec<Payment>> {
        self.read(PAYMENTS_KEY)
    }

    fn save_payments(&mut self, payments: &[Payment]) -> Result<()> {
        self.write(PAYMENTS_KEY, payments)
    }

    fn load_readiness(&self) -> Result<ReadinessMap> {
        self.read(READINESS_KEY)
    }

    fn save_readiness(&mut self, readiness: &ReadinessMap) -> Result<()> {
        self.write(READINESS_KEY, readiness)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
