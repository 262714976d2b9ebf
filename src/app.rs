//! 非同期コントローラ
//!
//! `Session` と履歴ストア・ゲートウェイを束ねる。
//! 非同期の操作はすべて begin → ゲートウェイ呼び出し → settle の順で進み、
//! ゲートウェイのエラーはここで握りつぶされて画面状態（またはログ）になる。
//! 呼び出し元へ返るのは遷移違反・処理中・未対応言語などの操作エラーのみ。

use crate::confirm::Confirm;
use crate::error::{PlantDoctorError, Result};
use crate::gateway::{InferenceGateway, TranslationGateway};
use crate::history::HistoryStore;
use crate::render::{render, Frame};
use crate::session::{LanguageChange, Session, TranslationRequest, WorkflowResult};
use crate::storage::KeyValueStore;
use crate::view::{ScanMode, View};
use plant_doctor_common::{AnalysisHistoryItem, Translatable};

pub struct PlantDoctor<I, T, S> {
    session: Session,
    history: HistoryStore<S>,
    inference: I,
    translator: T,
}

impl<I, T, S> PlantDoctor<I, T, S>
where
    I: InferenceGateway,
    T: TranslationGateway,
    S: KeyValueStore,
{
    /// 履歴を読み込んでホーム画面から開始
    pub fn new(inference: I, translator: T, store: S) -> Self {
        Self {
            session: Session::new(),
            history: HistoryStore::open(store),
            inference,
            translator,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn history(&self) -> &[AnalysisHistoryItem] {
        self.history.items()
    }

    pub fn history_store(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn inference(&self) -> &I {
        &self.inference
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// 現在の画面
    pub fn frame(&self) -> Frame {
        render(&self.session, self.history.items())
    }

    // =============================================
    // 同期的な遷移
    // =============================================

    pub fn start_plant_scan(&mut self) -> Result<()> {
        self.session.start_plant_scan()
    }

    pub fn start_soil_scan(&mut self) -> Result<()> {
        self.session.start_soil_scan()
    }

    pub fn open_camera(&mut self) -> Result<()> {
        self.session.open_camera()
    }

    pub fn back_from_camera(&mut self) -> Result<()> {
        self.session.back_from_camera()
    }

    pub fn open_history(&mut self) {
        self.session.open_history();
    }

    pub fn navigate_home(&mut self) -> Result<()> {
        self.session.navigate_home()
    }

    pub fn done(&mut self) -> Result<()> {
        self.session.done()
    }

    pub fn select_history_item(&mut self, id: &str) -> Result<()> {
        let item = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| PlantDoctorError::HistoryItemNotFound(id.to_string()))?;
        self.session.select_history_item(item)
    }

    /// 確認のうえ履歴を全削除
    ///
    /// # Returns
    /// 削除した場合は true
    pub fn clear_history(&mut self, confirm: &dyn Confirm) -> Result<bool> {
        if self.session.view() != View::History {
            return Err(PlantDoctorError::InvalidTransition {
                from: self.session.view(),
                trigger: "clear history",
            });
        }
        Ok(self.history.clear(confirm))
    }

    // =============================================
    // 非同期の操作
    // =============================================

    /// 現在のスキャンモードで画像を診断
    pub async fn submit_image(&mut self, image: String) -> Result<()> {
        match self.session.scan_mode() {
            ScanMode::Plant => self.analyze_plant(image).await,
            ScanMode::Soil => self.analyze_soil(image).await,
        }
    }

    /// 植物を診断し、成功したら履歴に記録
    pub async fn analyze_plant(&mut self, image: String) -> Result<()> {
        let ticket = self.session.begin_plant_analysis(image)?;
        let outcome = self.inference.analyze_plant(ticket.image()).await;
        if let Some(result) = self.session.settle_plant_analysis(&ticket, outcome) {
            self.history.record(ticket.image(), result);
        }
        Ok(())
    }

    /// 土壌を診断（履歴には残さない）
    pub async fn analyze_soil(&mut self, image: String) -> Result<()> {
        let ticket = self.session.begin_soil_analysis(image)?;
        let outcome = self.inference.analyze_soil(ticket.image()).await;
        self.session.settle_soil_analysis(&ticket, outcome);
        Ok(())
    }

    /// 栽培のコツ画面を開く。未取得なら取得する
    pub async fn open_care_tips(&mut self) {
        if let Some(ticket) = self.session.open_care_tips() {
            let outcome = self.inference.fetch_care_tips().await;
            self.session.settle_care_tips(ticket, outcome);
        }
    }

    /// 表示中の結果を指定言語に切り替える
    pub async fn change_language(&mut self, language: &str) -> Result<()> {
        let TranslationRequest { ticket, source } =
            match self.session.begin_change_language(language)? {
                LanguageChange::Translate(request) => request,
                LanguageChange::Cleared | LanguageChange::Unavailable => return Ok(()),
            };

        let outcome = match &source {
            WorkflowResult::Plant(result) => self
                .translate_checked(result, ticket.language())
                .await
                .map(WorkflowResult::Plant),
            WorkflowResult::Soil(result) => self
                .translate_checked(result, ticket.language())
                .await
                .map(WorkflowResult::Soil),
            WorkflowResult::Tips(tips) => self
                .translate_checked(tips, ticket.language())
                .await
                .map(WorkflowResult::Tips),
        };
        self.session.settle_translation(ticket, outcome);
        Ok(())
    }

    /// 翻訳して構造が保たれているか検査
    async fn translate_checked<R: Translatable>(&self, original: &R, language: &str) -> Result<R> {
        let translated = self.translator.translate(original, language).await?;
        original.check_translation(&translated)?;
        Ok(translated)
    }
}
