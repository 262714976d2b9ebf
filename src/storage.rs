//! 永続化ストア
//!
//! 名前付きレコードに対する get/set/remove だけを持つキー・バリューストア。
//! 履歴ストアはこのトレイト越しに保存するので、ファイル・組み込みDB・
//! リモートのどれでも差し替えられる。

use crate::error::{PlantDoctorError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub trait KeyValueStore {
    /// レコードを読む。存在しなければ None
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// レコードを上書き保存
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// レコードを削除。存在しなくてもエラーにしない
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// ディレクトリ内に `<key>.json` として保存するストア
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// I/O失敗を対象パス付きの Persistence エラーにする
fn persistence(action: &str, path: &Path, e: std::io::Error) -> PlantDoctorError {
    PlantDoctorError::Persistence(format!("failed to {action} {}: {e}", path.display()))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(persistence("read", &path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| persistence("create", &self.dir, e))?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|e| persistence("write", &path, e))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(persistence("remove", &path, e)),
        }
    }
}

/// メモリ上のストア（テスト・一時実行用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_missing_record() {
        let dir = tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut store = FileStore::new(dir.path().join("nested").join("data"));

        // ディレクトリが無くても set で作成される
        store.set("history", "[1,2,3]").unwrap();
        assert!(store.path_for("history").exists());
        assert_eq!(store.get("history").unwrap().as_deref(), Some("[1,2,3]"));

        store.set("history", "[]").unwrap();
        assert_eq!(store.get("history").unwrap().as_deref(), Some("[]"));

        store.remove("history").unwrap();
        assert_eq!(store.get("history").unwrap(), None);

        // 二重削除もOK
        store.remove("history").unwrap();
    }

    #[test]
    fn test_file_store_failures_are_persistence_errors() {
        let dir = tempdir().expect("Failed to create temp dir");
        // 保存先ディレクトリの位置に通常ファイルがある
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();

        let mut store = FileStore::new(&blocker);
        let err = store.set("history", "[]").unwrap_err();
        assert!(matches!(&err, PlantDoctorError::Persistence(msg) if msg.contains("blocked")));

        // レコードの位置にディレクトリがあると読めない
        let store = FileStore::new(dir.path());
        fs::create_dir(store.path_for("history")).unwrap();
        assert!(matches!(store.get("history"), Err(PlantDoctorError::Persistence(_))));
    }

    #[test]
    fn test_file_store_path_for() {
        let store = FileStore::new("/tmp/plant-doctor");
        assert_eq!(
            store.path_for("plant_doctor_ai_history"),
            PathBuf::from("/tmp/plant-doctor/plant_doctor_ai_history.json")
        );
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.len(), 1);
    }
}
