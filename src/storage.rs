use crate::schedule::WorkSchedule;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tempfile::NamedTempFile;
use tracing::debug;

/// Mutation appliquée à un planning stocké.
pub type Mutation<'a> = &'a mut dyn FnMut(&mut WorkSchedule) -> anyhow::Result<()>;

/// Support de stockage des plannings, indexés par nom.
pub trait ScheduleStore: Send + Sync {
    /// Tous les plannings, triés par nom.
    fn list(&self) -> anyhow::Result<Vec<WorkSchedule>>;
    fn get(&self, name: &str) -> anyhow::Result<Option<WorkSchedule>>;
    /// Insère si le nom est libre ; `false` sinon.
    fn create(&self, schedule: WorkSchedule) -> anyhow::Result<bool>;
    /// Supprime ; `false` si absent.
    fn delete(&self, name: &str) -> anyhow::Result<bool>;
    /// Lecture-modification-écriture sérialisée. `None` si absent ; rien
    /// n'est écrit si `f` échoue.
    fn update(&self, name: &str, f: Mutation<'_>) -> anyhow::Result<Option<WorkSchedule>>;
}

/// Stockage en mémoire, pour les tests et l'usage embarqué.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    schedules: RwLock<BTreeMap<String, WorkSchedule>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("schedule store lock poisoned")
}

impl ScheduleStore for InMemoryStore {
    fn list(&self) -> anyhow::Result<Vec<WorkSchedule>> {
        let map = self.schedules.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn get(&self, name: &str) -> anyhow::Result<Option<WorkSchedule>> {
        let map = self.schedules.read().map_err(poisoned)?;
        Ok(map.get(name).cloned())
    }

    fn create(&self, schedule: WorkSchedule) -> anyhow::Result<bool> {
        let mut map = self.schedules.write().map_err(poisoned)?;
        if map.contains_key(schedule.name()) {
            return Ok(false);
        }
        map.insert(schedule.name().to_string(), schedule);
        Ok(true)
    }

    fn delete(&self, name: &str) -> anyhow::Result<bool> {
        let mut map = self.schedules.write().map_err(poisoned)?;
        Ok(map.remove(name).is_some())
    }

    fn update(&self, name: &str, f: Mutation<'_>) -> anyhow::Result<Option<WorkSchedule>> {
        let mut map = self.schedules.write().map_err(poisoned)?;
        let Some(current) = map.get(name) else {
            return Ok(None);
        };
        let mut next = current.clone();
        f(&mut next)?;
        map.insert(name.to_string(), next.clone());
        Ok(Some(next))
    }
}

/// Fichier JSON unique contenant un tableau de plannings. Chaque écriture
/// passe par un fichier temporaire renommé. Un fichier absent vaut une
/// liste vide.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        })
    }

    fn load(&self) -> anyhow::Result<BTreeMap<String, WorkSchedule>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "store file missing, starting empty");
            return Ok(BTreeMap::new());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let list: Vec<WorkSchedule> = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(list
            .into_iter()
            .map(|s| (s.name().to_string(), s))
            .collect())
    }

    fn save(&self, map: &BTreeMap<String, WorkSchedule>) -> anyhow::Result<()> {
        let list: Vec<&WorkSchedule> = map.values().collect();
        let json = serde_json::to_vec_pretty(&list)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        debug!(path = %self.path.display(), count = list.len(), "store saved");
        Ok(())
    }
}

impl ScheduleStore for JsonStore {
    fn list(&self) -> anyhow::Result<Vec<WorkSchedule>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        Ok(self.load()?.into_values().collect())
    }

    fn get(&self, name: &str) -> anyhow::Result<Option<WorkSchedule>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        Ok(self.load()?.remove(name))
    }

    fn create(&self, schedule: WorkSchedule) -> anyhow::Result<bool> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut map = self.load()?;
        if map.contains_key(schedule.name()) {
            return Ok(false);
        }
        map.insert(schedule.name().to_string(), schedule);
        self.save(&map)?;
        Ok(true)
    }

    fn delete(&self, name: &str) -> anyhow::Result<bool> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut map = self.load()?;
        if map.remove(name).is_none() {
            return Ok(false);
        }
        self.save(&map)?;
        Ok(true)
    }

    fn update(&self, name: &str, f: Mutation<'_>) -> anyhow::Result<Option<WorkSchedule>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut map = self.load()?;
        let Some(current) = map.get_mut(name) else {
            return Ok(None);
        };
        let mut next = current.clone();
        f(&mut next)?;
        *current = next.clone();
        self.save(&map)?;
        Ok(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Schedule;
    use tempfile::tempdir;

    fn schedule(name: &str) -> WorkSchedule {
        WorkSchedule::new(Schedule::new(name, "")).unwrap()
    }

    fn exercise(store: &dyn ScheduleStore) {
        assert!(store.list().unwrap().is_empty());
        assert!(store.create(schedule("b")).unwrap());
        assert!(store.create(schedule("a")).unwrap());
        assert!(!store.create(schedule("a")).unwrap());

        let names: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert!(store.get("missing").unwrap().is_none());

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn in_memory_store_basics() {
        exercise(&InMemoryStore::new());
    }

    #[test]
    fn json_store_basics_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schedules.json");
        exercise(&JsonStore::open(&path).unwrap());

        let reopened = JsonStore::open(&path).unwrap();
        assert!(reopened.get("b").unwrap().is_some());
    }

    #[test]
    fn failed_update_leaves_store_untouched() {
        let store = InMemoryStore::new();
        store.create(schedule("s")).unwrap();
        let err = store
            .update("s", &mut |ws: &mut WorkSchedule| {
                ws.add_non_working_periods(Vec::new())?;
                anyhow::bail!("boom")
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(store.update("missing", &mut |_| Ok(())).unwrap().is_none());
    }
}
