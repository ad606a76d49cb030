#![cfg(feature = "std")]

//! Snapshot persistence behind a small trait so sessions never touch the
//! filesystem directly.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use crate::config::DEFAULT_MAX_SAVES;
use crate::snapshot::GameSnapshot;

/// Numbered save slots; a higher number is a newer save.
pub trait SnapshotStore {
    /// Write `snapshot` into `slot`, replacing whatever was there.
    fn write(&mut self, slot: u64, snapshot: &GameSnapshot) -> anyhow::Result<()>;

    /// Read and validate the snapshot in `slot`.
    fn load(&self, slot: u64) -> anyhow::Result<GameSnapshot>;

    fn remove(&mut self, slot: u64) -> anyhow::Result<()>;

    /// Slots holding a valid snapshot, newest first.
    fn slots(&self) -> anyhow::Result<Vec<u64>>;

    /// Slots kept after a save; 0 keeps everything.
    fn max_saves(&self) -> usize;

    /// Save a game. An ongoing game in the newest slot is overwritten,
    /// otherwise a new slot is opened. Old slots beyond
    /// [`max_saves`](Self::max_saves) are then pruned.
    fn save(&mut self, snapshot: &GameSnapshot) -> anyhow::Result<u64> {
        let slot = match self.latest_ongoing()? {
            Some((slot, _)) => slot,
            None => self.slots()?.first().map_or(1, |latest| latest + 1),
        };
        self.write(slot, snapshot)?;
        log::info!("saved game to slot {}", slot);

        let max = self.max_saves();
        if max > 0 {
            for old in self.slots()?.into_iter().skip(max) {
                log::debug!("pruning save slot {}", old);
                self.remove(old)?;
            }
        }
        Ok(slot)
    }

    /// The newest save if that game is still in progress.
    fn latest_ongoing(&self) -> anyhow::Result<Option<(u64, GameSnapshot)>> {
        let Some(&latest) = self.slots()?.first() else {
            return Ok(None);
        };
        let snapshot = self.load(latest)?;
        Ok(snapshot.is_ongoing().then_some((latest, snapshot)))
    }

    /// Completed games, newest first.
    fn finished(&self) -> anyhow::Result<Vec<(u64, GameSnapshot)>> {
        let mut done = Vec::new();
        for slot in self.slots()? {
            let snapshot = self.load(slot)?;
            if !snapshot.is_ongoing() {
                done.push((slot, snapshot));
            }
        }
        Ok(done)
    }
}

/// Store kept in memory, encoded with bincode.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    slots: BTreeMap<u64, Vec<u8>>,
    max_saves: usize,
}

impl MemoryStore {
    pub fn new(max_saves: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            max_saves,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAVES)
    }
}

impl SnapshotStore for MemoryStore {
    fn write(&mut self, slot: u64, snapshot: &GameSnapshot) -> anyhow::Result<()> {
        self.slots.insert(slot, snapshot.to_bytes()?);
        Ok(())
    }

    fn load(&self, slot: u64) -> anyhow::Result<GameSnapshot> {
        let bytes = self
            .slots
            .get(&slot)
            .ok_or_else(|| anyhow!("no save in slot {}", slot))?;
        GameSnapshot::from_bytes(bytes).with_context(|| format!("slot {}", slot))
    }

    fn remove(&mut self, slot: u64) -> anyhow::Result<()> {
        self.slots.remove(&slot);
        Ok(())
    }

    fn slots(&self) -> anyhow::Result<Vec<u64>> {
        Ok(self
            .slots
            .iter()
            .rev()
            .filter(|(_, bytes)| GameSnapshot::from_bytes(bytes).is_ok())
            .map(|(&slot, _)| slot)
            .collect())
    }

    fn max_saves(&self) -> usize {
        self.max_saves
    }
}

/// One JSON file per slot (`save<N>.json`) in a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
    max_saves: usize,
}

const FILE_PREFIX: &str = "save";
const FILE_EXT: &str = "json";

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>, max_saves: usize) -> Self {
        Self {
            dir: dir.into(),
            max_saves,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, slot: u64) -> PathBuf {
        self.dir.join(format!("{}{}.{}", FILE_PREFIX, slot, FILE_EXT))
    }

    fn slot_of(path: &Path) -> Option<u64> {
        if path.extension()? != FILE_EXT {
            return None;
        }
        path.file_stem()?
            .to_str()?
            .strip_prefix(FILE_PREFIX)?
            .parse()
            .ok()
    }
}

impl SnapshotStore for DirStore {
    fn write(&mut self, slot: u64, snapshot: &GameSnapshot) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating save directory {}", self.dir.display()))?;
        let path = self.path(slot);
        fs::write(&path, snapshot.to_json()?)
            .with_context(|| format!("writing {}", path.display()))
    }

    fn load(&self, slot: u64) -> anyhow::Result<GameSnapshot> {
        let path = self.path(slot);
        let json =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        GameSnapshot::from_json(&json).with_context(|| format!("loading {}", path.display()))
    }

    fn remove(&mut self, slot: u64) -> anyhow::Result<()> {
        let path = self.path(slot);
        fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))
    }

    fn slots(&self) -> anyhow::Result<Vec<u64>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Some(slot) = Self::slot_of(&path) else {
                continue;
            };
            match self.load(slot) {
                Ok(_) => slots.push(slot),
                Err(err) => log::warn!("skipping {}: {:#}", path.display(), err),
            }
        }
        slots.sort_unstable_by(|a, b| b.cmp(a));
        Ok(slots)
    }

    fn max_saves(&self) -> usize {
        self.max_saves
    }
}
