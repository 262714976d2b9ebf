//! 履歴ストアの永続化テスト
//!
//! ファイルストアでの読み書き・破損データ・保存失敗を検証

use plant_doctor::error::{PlantDoctorError, Result};
use plant_doctor::history::{HistoryStore, CLEAR_HISTORY_PROMPT, HISTORY_STORAGE_KEY};
use plant_doctor::storage::{FileStore, KeyValueStore};
use plant_doctor_common::{AnalysisHistoryItem, AnalysisResult, HealthStatus};
use std::cell::RefCell;
use tempfile::tempdir;

fn analysis(name: &str) -> AnalysisResult {
    AnalysisResult {
        plant_name: name.to_string(),
        health_status: HealthStatus::Unhealthy,
        confidence: 0.42,
        potential_issues: vec![],
        care_recommendations: vec!["Move to a brighter spot".to_string()],
    }
}

/// 保存した履歴が再起動後も読める
#[test]
fn test_history_survives_restart() {
    let dir = tempdir().expect("Failed to create temp dir");

    {
        let mut history = HistoryStore::open(FileStore::new(dir.path()));
        assert!(history.is_empty());
        history.record("data:image/jpeg;base64,AAAA", analysis("Snake Plant"));
        history.record("data:image/jpeg;base64,BBBB", analysis("Peace Lily"));
    }

    let history = HistoryStore::open(FileStore::new(dir.path()));
    assert_eq!(history.len(), 2);
    assert_eq!(history.items()[0].analysis.plant_name, "Peace Lily");
    assert_eq!(history.items()[1].image, "data:image/jpeg;base64,AAAA");
    assert!(dir.path().join(format!("{HISTORY_STORAGE_KEY}.json")).exists());
}

/// 保存形式は camelCase の JSON 配列
#[test]
fn test_persisted_layout() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut history = HistoryStore::open(FileStore::new(dir.path()));
    history.record("data:image/png;base64,AAAA", analysis("Pothos"));

    let raw = history.store().get(HISTORY_STORAGE_KEY).unwrap().expect("レコードがない");
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json[0];
    assert!(first["id"].is_string());
    assert!(first["date"].is_string());
    assert_eq!(first["analysis"]["plantName"], "Pothos");
    assert_eq!(first["analysis"]["healthStatus"], "Unhealthy");
}

/// 既存の記録（他の実装で保存されたもの）もそのまま読める
#[test]
fn test_loads_existing_records() {
    let dir = tempdir().expect("Failed to create temp dir");
    let raw = r#"[{"id":"1718000000000","image":"data:image/jpeg;base64,AAAA","date":"2024-06-10T06:13:20.000Z","analysis":{"plantName":"Rose","healthStatus":"Needs Care","confidence":0.7,"potentialIssues":[{"issue":"Aphids","description":"Small green insects","remedy":"Spray with soapy water"}],"careRecommendations":["Prune regularly"]}}]"#;
    std::fs::write(dir.path().join(format!("{HISTORY_STORAGE_KEY}.json")), raw).unwrap();

    let history = HistoryStore::open(FileStore::new(dir.path()));
    assert_eq!(history.len(), 1);
    let item: &AnalysisHistoryItem = history.get("1718000000000").expect("記録がない");
    assert_eq!(item.analysis.health_status, HealthStatus::NeedsCare);
    assert_eq!(item.analysis.potential_issues[0].issue, "Aphids");
}

/// 壊れた保存データは空の履歴として扱う
#[test]
fn test_corrupt_history_loads_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join(format!("{HISTORY_STORAGE_KEY}.json")),
        r#"[{"id":"1","image":"x"#,
    )
    .unwrap();

    let mut history = HistoryStore::open(FileStore::new(dir.path()));
    assert!(history.is_empty());

    // 次の追加で正しいデータに置き換わる
    history.record("data:image/jpeg;base64,AAAA", analysis("Cactus"));
    assert_eq!(HistoryStore::load_all(history.store()).len(), 1);
}

/// 全削除でファイルも消える
#[test]
fn test_clear_removes_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut history = HistoryStore::open(FileStore::new(dir.path()));
    for name in ["A", "B", "C"] {
        history.record("data:image/jpeg;base64,AAAA", analysis(name));
    }

    assert!(history.clear(&true));
    assert!(history.is_empty());
    assert!(!dir.path().join(format!("{HISTORY_STORAGE_KEY}.json")).exists());
    assert!(HistoryStore::open(FileStore::new(dir.path())).is_empty());
}

/// 確認には決まった文言が渡される
#[test]
fn test_clear_asks_with_prompt() {
    struct Recorder(RefCell<Vec<String>>);
    impl plant_doctor::confirm::Confirm for Recorder {
        fn confirm(&self, prompt: &str) -> bool {
            self.0.borrow_mut().push(prompt.to_string());
            false
        }
    }

    let dir = tempdir().expect("Failed to create temp dir");
    let mut history = HistoryStore::open(FileStore::new(dir.path()));
    history.record("data:image/jpeg;base64,AAAA", analysis("Fern"));

    let recorder = Recorder(RefCell::new(Vec::new()));
    assert!(!history.clear(&recorder));
    assert_eq!(*recorder.0.borrow(), vec![CLEAR_HISTORY_PROMPT.to_string()]);
    assert_eq!(history.len(), 1);
}

/// 保存先に書けなくても診断履歴はメモリに残る
#[test]
fn test_unwritable_file_store_keeps_memory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let blocker = dir.path().join("history");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut store = FileStore::new(&blocker);
    assert!(matches!(
        store.set(HISTORY_STORAGE_KEY, "[]"),
        Err(PlantDoctorError::Persistence(_))
    ));

    let mut history = HistoryStore::open(store);
    history.record("data:image/jpeg;base64,AAAA", analysis("Monstera"));
    assert_eq!(history.len(), 1);
    assert_eq!(history.items()[0].analysis.plant_name, "Monstera");
}

/// 書き込みに失敗するストア
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(PlantDoctorError::Persistence("storage is full".to_string()))
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Err(PlantDoctorError::Persistence("storage is read-only".to_string()))
    }
}

/// 保存に失敗してもメモリ上の履歴は更新される
#[test]
fn test_failing_store_keeps_memory() {
    let mut history = HistoryStore::open(ReadOnlyStore);
    history.record("data:image/jpeg;base64,AAAA", analysis("Orchid"));
    history.record("data:image/jpeg;base64,BBBB", analysis("Tulip"));
    assert_eq!(history.len(), 2);

    assert!(history.clear(&true));
    assert!(history.is_empty());
}

/// 読み込みに失敗するストアは空の履歴
#[test]
fn test_unreadable_store_loads_empty() {
    struct BrokenStore;
    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(PlantDoctorError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    assert!(HistoryStore::load_all(&BrokenStore).is_empty());
}
