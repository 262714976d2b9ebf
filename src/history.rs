//! 診断履歴ストア
//!
//! 新しい順に並んだ追記専用のログ。KeyValueStore の1レコードに
//! JSON配列として保存する。
//!
//! - 追加はメモリを先に更新し、保存失敗はログに残すだけ（ロールバックしない）
//! - 読み込み失敗・破損データは空の履歴として扱う
//! - 削除は全件一括のみ。事前に確認を取る

use crate::confirm::Confirm;
use crate::storage::KeyValueStore;
use chrono::{SecondsFormat, Utc};
use plant_doctor_common::{AnalysisHistoryItem, AnalysisResult};
use tracing::{debug, error, info, warn};

/// 履歴を保存するレコード名
pub const HISTORY_STORAGE_KEY: &str = "plant_doctor_ai_history";

/// 全削除の確認メッセージ
pub const CLEAR_HISTORY_PROMPT: &str =
    "Are you sure you want to clear your entire analysis history? This cannot be undone.";

pub struct HistoryStore<S> {
    store: S,
    items: Vec<AnalysisHistoryItem>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// ストアから履歴を読み込んで開く
    pub fn open(store: S) -> Self {
        let items = Self::load_all(&store);
        info!(count = items.len(), "history loaded");
        Self { store, items }
    }

    /// 保存済みの履歴をすべて読む
    ///
    /// レコードが無い・読めない・壊れている場合は空を返す
    pub fn load_all(store: &S) -> Vec<AnalysisHistoryItem> {
        let json = match store.get(HISTORY_STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!(error = %e, "failed to read history");
                return Vec::new();
            }
        };

        match serde_json::from_str(&json) {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "stored history is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    pub fn items(&self) -> &[AnalysisHistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AnalysisHistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 診断成功時のレコードを作って先頭に追加
    pub fn record(&mut self, image: &str, analysis: AnalysisResult) -> &AnalysisHistoryItem {
        let now = Utc::now();
        let item = AnalysisHistoryItem {
            id: self.next_id(now.timestamp_millis()),
            image: image.to_string(),
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            analysis,
        };
        self.append(item);
        &self.items[0]
    }

    /// 先頭に追加して即保存
    pub fn append(&mut self, item: AnalysisHistoryItem) {
        debug!(id = %item.id, "history append");
        self.items.insert(0, item);
        self.persist();
    }

    /// 確認が取れたら全件削除
    ///
    /// # Returns
    /// 削除した場合は true、確認で断られた場合は false
    pub fn clear(&mut self, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm(CLEAR_HISTORY_PROMPT) {
            info!("history clear declined");
            return false;
        }

        self.items.clear();
        if let Err(e) = self.store.remove(HISTORY_STORAGE_KEY) {
            error!(error = %e, "failed to clear stored history");
        }
        info!("history cleared");
        true
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "failed to serialize history");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_STORAGE_KEY, &json) {
            error!(error = %e, "failed to save history");
        }
    }

    /// 作成時刻由来のID。先頭（最新）のIDより必ず大きくする
    ///
    /// 保存データ由来のIDは任意の大きさになり得るので i128 で比較する。
    /// それでも桁あふれする場合は時刻をそのまま使う
    fn next_id(&self, now_millis: i64) -> String {
        let now = i128::from(now_millis);
        let newest = self
            .items
            .first()
            .and_then(|item| item.id.parse::<i128>().ok());
        match newest {
            Some(newest) if now <= newest => match newest.checked_add(1) {
                Some(next) => next.to_string(),
                None => {
                    warn!(newest = %newest, "newest history id cannot be incremented");
                    now.to_string()
                }
            },
            _ => now.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use plant_doctor_common::HealthStatus;

    fn analysis(name: &str) -> AnalysisResult {
        AnalysisResult {
            plant_name: name.to_string(),
            health_status: HealthStatus::Healthy,
            confidence: 0.9,
            potential_issues: vec![],
            care_recommendations: vec![],
        }
    }

    fn item(id: &str) -> AnalysisHistoryItem {
        AnalysisHistoryItem {
            id: id.to_string(),
            image: "data:image/jpeg;base64,AAAA".to_string(),
            date: "2025-01-01T00:00:00.000Z".to_string(),
            analysis: analysis("Fern"),
        }
    }

    #[test]
    fn test_next_id_uses_clock() {
        let history = HistoryStore::open(MemoryStore::new());
        assert_eq!(history.next_id(1_700_000_000_000), "1700000000000");
    }

    #[test]
    fn test_next_id_never_repeats_within_same_millisecond() {
        let mut history = HistoryStore::open(MemoryStore::new());
        history.append(item("1700000000000"));
        assert_eq!(history.next_id(1_700_000_000_000), "1700000000001");
        // 時計が戻っても先頭より大きい
        assert_eq!(history.next_id(1_600_000_000_000), "1700000000001");
        assert_eq!(history.next_id(1_700_000_000_005), "1700000000005");
    }

    #[test]
    fn test_next_id_past_i64_max() {
        let mut history = HistoryStore::open(MemoryStore::new());
        history.append(item(&i64::MAX.to_string()));
        assert_eq!(history.next_id(1_700_000_000_000), "9223372036854775808");
    }

    #[test]
    fn test_next_id_unincrementable_falls_back_to_clock() {
        let mut history = HistoryStore::open(MemoryStore::new());
        history.append(item(&i128::MAX.to_string()));
        assert_eq!(history.next_id(1_700_000_000_000), "1700000000000");
    }

    #[test]
    fn test_record_after_stored_max_id() {
        let mut store = MemoryStore::new();
        let stored = vec![item(&i64::MAX.to_string())];
        store
            .set(HISTORY_STORAGE_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let mut history = HistoryStore::open(store);
        let id = history.record("data:image/jpeg;base64,BBBB", analysis("Cactus")).id.clone();
        assert_eq!(id, "9223372036854775808");
        assert_eq!(history.len(), 2);
        assert_eq!(HistoryStore::load_all(history.store())[0].id, id);
    }

    #[test]
    fn test_record_prepends_and_persists() {
        let mut history = HistoryStore::open(MemoryStore::new());
        history.record("data:image/jpeg;base64,AAAA", analysis("Fern"));
        let second_id = history.record("data:image/jpeg;base64,BBBB", analysis("Cactus")).id.clone();

        assert_eq!(history.len(), 2);
        assert_eq!(history.items()[0].id, second_id);
        assert_eq!(history.items()[0].analysis.plant_name, "Cactus");
        assert_ne!(history.items()[0].id, history.items()[1].id);

        let stored = HistoryStore::load_all(history.store());
        assert_eq!(stored, history.items());
    }

    #[test]
    fn test_record_date_is_rfc3339() {
        let mut history = HistoryStore::open(MemoryStore::new());
        let date = history.record("data:image/png;base64,AAAA", analysis("Ivy")).date.clone();
        assert!(chrono::DateTime::parse_from_rfc3339(&date).is_ok(), "{}", date);
        assert!(date.ends_with('Z'));
    }

    #[test]
    fn test_get_by_id() {
        let mut history = HistoryStore::open(MemoryStore::new());
        history.append(item("42"));
        assert!(history.get("42").is_some());
        assert!(history.get("43").is_none());
    }

    #[test]
    fn test_clear_declined_keeps_everything() {
        let mut history = HistoryStore::open(MemoryStore::new());
        history.append(item("1"));
        assert!(!history.clear(&false));
        assert_eq!(history.len(), 1);
        assert_eq!(HistoryStore::load_all(history.store()).len(), 1);
    }
}
