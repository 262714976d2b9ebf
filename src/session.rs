//! 画面状態機械
//!
//! 現在の画面・表示中の画像・ワークフロー別の結果/エラー/読み込み中フラグ・
//! 選択言語・翻訳中フラグを一か所で持つ。
//!
//! 同期的な遷移はそのままメソッド。非同期の操作は2段階に分ける:
//! - `begin_*`: 読み込み状態へ遷移し、ゲートウェイ呼び出しに必要なチケットを返す
//! - `settle_*`: ゲートウェイの結果を反映する
//!
//! ゲートウェイの失敗は `settle_*` で固定メッセージかログに変換し、外へは出さない。

use crate::error::{PlantDoctorError, Result};
use crate::view::{ScanMode, View, Workflow};
use plant_doctor_common::{
    find_language, is_base_language, AnalysisHistoryItem, AnalysisResult, CareTip,
    SoilAnalysisResult, BASE_LANGUAGE,
};
use tracing::{debug, info, warn};

pub const PLANT_ANALYSIS_ERROR: &str = "Sorry, we couldn't analyze your plant. Please try again.";
pub const SOIL_ANALYSIS_ERROR: &str = "Sorry, we couldn't analyze your soil. Please try again.";
pub const CARE_TIPS_ERROR: &str = "Could not fetch care tips. Please try again later.";

/// ワークフロー1つ分の状態
#[derive(Debug, Clone)]
pub struct WorkflowSlot<T> {
    /// 基本言語の結果
    pub result: Option<T>,
    /// 翻訳済みの結果（元の結果は上書きしない）
    pub translated: Option<T>,
    pub error: Option<String>,
    pub loading: bool,
}

impl<T> Default for WorkflowSlot<T> {
    fn default() -> Self {
        Self {
            result: None,
            translated: None,
            error: None,
            loading: false,
        }
    }
}

impl<T> WorkflowSlot<T> {
    /// 翻訳があれば翻訳、なければ元の結果
    pub fn displayed(&self) -> Option<&T> {
        self.translated.as_ref().or(self.result.as_ref())
    }

    fn clear_result(&mut self) {
        self.result = None;
        self.translated = None;
        self.error = None;
    }
}

/// ワークフローごとの結果
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowResult {
    Plant(AnalysisResult),
    Soil(SoilAnalysisResult),
    Tips(Vec<CareTip>),
}

impl WorkflowResult {
    pub fn workflow(&self) -> Workflow {
        match self {
            WorkflowResult::Plant(_) => Workflow::Plant,
            WorkflowResult::Soil(_) => Workflow::Soil,
            WorkflowResult::Tips(_) => Workflow::Tips,
        }
    }
}

/// 診断リクエストのチケット
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct AnalysisTicket {
    workflow: Workflow,
    image: String,
}

impl AnalysisTicket {
    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    /// ゲートウェイへ渡す画像（data URI）
    pub fn image(&self) -> &str {
        &self.image
    }
}

/// 栽培のコツ取得のチケット
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct TipsTicket {
    _private: (),
}

/// 翻訳リクエストのチケット
///
/// 発行時の世代番号を持つ。言語のリセットで世代が進むと、
/// 遅れて届いた翻訳は破棄される。
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct TranslationTicket {
    workflow: Workflow,
    language: String,
    generation: u64,
}

impl TranslationTicket {
    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

/// 翻訳が必要な場合の依頼内容
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub ticket: TranslationTicket,
    /// 翻訳する元の結果（常に基本言語の結果）
    pub source: WorkflowResult,
}

/// 言語変更の結果
#[derive(Debug, Clone)]
pub enum LanguageChange {
    /// 基本言語に戻した。翻訳キャッシュはローカルで破棄済み
    Cleared,
    /// 画面に翻訳できる結果がない
    Unavailable,
    /// ゲートウェイで翻訳する
    Translate(TranslationRequest),
}

#[derive(Debug, Clone)]
pub struct Session {
    view: View,
    scan_mode: ScanMode,
    image: Option<String>,
    plant: WorkflowSlot<AnalysisResult>,
    soil: WorkflowSlot<SoilAnalysisResult>,
    tips: WorkflowSlot<Vec<CareTip>>,
    language: String,
    is_translating: bool,
    translation_generation: u64,
    viewing_history_detail: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            view: View::Home,
            scan_mode: ScanMode::Plant,
            image: None,
            plant: WorkflowSlot::default(),
            soil: WorkflowSlot::default(),
            tips: WorkflowSlot::default(),
            language: BASE_LANGUAGE.to_string(),
            is_translating: false,
            translation_generation: 0,
            viewing_history_detail: false,
        }
    }

    // =============================================
    // 参照
    // =============================================

    pub fn view(&self) -> View {
        self.view
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn plant(&self) -> &WorkflowSlot<AnalysisResult> {
        &self.plant
    }

    pub fn soil(&self) -> &WorkflowSlot<SoilAnalysisResult> {
        &self.soil
    }

    pub fn tips(&self) -> &WorkflowSlot<Vec<CareTip>> {
        &self.tips
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_translating(&self) -> bool {
        self.is_translating
    }

    pub fn is_viewing_history_detail(&self) -> bool {
        self.viewing_history_detail
    }

    pub fn is_loading(&self, workflow: Workflow) -> bool {
        match workflow {
            Workflow::Plant => self.plant.loading,
            Workflow::Soil => self.soil.loading,
            Workflow::Tips => self.tips.loading,
        }
    }

    // =============================================
    // 同期的な遷移
    // =============================================

    pub fn start_plant_scan(&mut self) -> Result<()> {
        self.ensure_view(&[View::Home], "start a plant scan")?;
        self.enter_plant_scan();
        Ok(())
    }

    pub fn start_soil_scan(&mut self) -> Result<()> {
        self.ensure_view(&[View::Home], "start a soil scan")?;
        self.enter_soil_scan();
        Ok(())
    }

    pub fn open_camera(&mut self) -> Result<()> {
        self.ensure_view(&[View::Scan, View::SoilScan], "open the camera")?;
        self.plant.error = None;
        self.soil.error = None;
        self.view = View::Camera;
        Ok(())
    }

    /// カメラを開いたスキャン画面へ戻る
    pub fn back_from_camera(&mut self) -> Result<()> {
        self.ensure_view(&[View::Camera], "leave the camera")?;
        self.view = match self.scan_mode {
            ScanMode::Plant => View::Scan,
            ScanMode::Soil => View::SoilScan,
        };
        Ok(())
    }

    pub fn open_history(&mut self) {
        self.view = View::History;
    }

    /// 履歴の1件を結果画面で表示
    pub fn select_history_item(&mut self, item: AnalysisHistoryItem) -> Result<()> {
        self.ensure_view(&[View::History], "open a history item")?;
        self.plant.result = Some(item.analysis);
        self.plant.error = None;
        self.image = Some(item.image);
        self.viewing_history_detail = true;
        self.reset_language();
        self.view = View::Result;
        Ok(())
    }

    pub fn navigate_home(&mut self) -> Result<()> {
        if !self.view.shows_back_button() {
            return Err(self.invalid("go home"));
        }
        self.view = View::Home;
        Ok(())
    }

    /// 結果画面の完了ボタン
    ///
    /// - 履歴から開いた植物の結果 → 履歴
    /// - 植物の結果 → 新しい植物スキャン
    /// - 土壌の結果 → 新しい土壌スキャン
    pub fn done(&mut self) -> Result<()> {
        match self.view {
            View::Result if self.viewing_history_detail => self.view = View::History,
            View::Result => self.enter_plant_scan(),
            View::SoilResult => self.enter_soil_scan(),
            _ => return Err(self.invalid("finish")),
        }
        Ok(())
    }

    // =============================================
    // 植物・土壌の診断
    // =============================================

    pub fn begin_plant_analysis(&mut self, image: String) -> Result<AnalysisTicket> {
        self.ensure_submit(ScanMode::Plant, View::Scan, "analyze a plant")?;
        if self.plant.loading {
            return Err(PlantDoctorError::Busy(Workflow::Plant));
        }

        self.image = Some(image.clone());
        self.plant.clear_result();
        self.plant.loading = true;
        self.viewing_history_detail = false;
        self.reset_language();
        self.view = View::Analyzing;
        info!("plant analysis started");
        Ok(AnalysisTicket { workflow: Workflow::Plant, image })
    }

    /// 植物診断の結果を反映
    ///
    /// # Returns
    /// 成功時は履歴に記録する結果
    pub fn settle_plant_analysis(
        &mut self,
        ticket: &AnalysisTicket,
        outcome: Result<AnalysisResult>,
    ) -> Option<AnalysisResult> {
        debug_assert_eq!(ticket.workflow, Workflow::Plant);
        self.plant.loading = false;

        let settled = match outcome {
            Ok(result) => {
                info!(plant = %result.plant_name, status = %result.health_status, "plant analysis finished");
                // 待っている間に履歴の表示へ切り替えていたらスロットは譲る
                if !self.viewing_history_detail {
                    self.plant.result = Some(result.clone());
                }
                Some(result)
            }
            Err(e) => {
                warn!(error = %e, "plant analysis failed");
                if !self.viewing_history_detail {
                    self.plant.error = Some(PLANT_ANALYSIS_ERROR.to_string());
                }
                None
            }
        };

        if self.view == View::Analyzing {
            self.view = View::Result;
        } else {
            debug!(view = %self.view, "plant analysis settled off screen");
        }
        settled
    }

    pub fn begin_soil_analysis(&mut self, image: String) -> Result<AnalysisTicket> {
        self.ensure_submit(ScanMode::Soil, View::SoilScan, "analyze soil")?;
        if self.soil.loading {
            return Err(PlantDoctorError::Busy(Workflow::Soil));
        }

        self.image = Some(image.clone());
        self.soil.clear_result();
        self.soil.loading = true;
        self.reset_language();
        self.view = View::AnalyzingSoil;
        info!("soil analysis started");
        Ok(AnalysisTicket { workflow: Workflow::Soil, image })
    }

    pub fn settle_soil_analysis(
        &mut self,
        ticket: &AnalysisTicket,
        outcome: Result<SoilAnalysisResult>,
    ) {
        debug_assert_eq!(ticket.workflow, Workflow::Soil);
        self.soil.loading = false;

        match outcome {
            Ok(result) => {
                info!(soil = %result.soil_type, "soil analysis finished");
                self.soil.result = Some(result);
            }
            Err(e) => {
                warn!(error = %e, "soil analysis failed");
                self.soil.error = Some(SOIL_ANALYSIS_ERROR.to_string());
            }
        }

        if self.view == View::AnalyzingSoil {
            self.view = View::SoilResult;
        } else {
            debug!(view = %self.view, "soil analysis settled off screen");
        }
    }

    // =============================================
    // 栽培のコツ
    // =============================================

    /// 栽培のコツ画面を開く
    ///
    /// # Returns
    /// 取得が必要な場合のみチケット。取得済み・取得中なら None
    pub fn open_care_tips(&mut self) -> Option<TipsTicket> {
        self.view = View::CareTips;
        self.reset_language();

        if self.tips.result.is_some() {
            debug!("care tips cached");
            return None;
        }
        if self.tips.loading {
            return None;
        }

        self.tips.loading = true;
        self.tips.error = None;
        info!("fetching care tips");
        Some(TipsTicket { _private: () })
    }

    pub fn settle_care_tips(&mut self, _ticket: TipsTicket, outcome: Result<Vec<CareTip>>) {
        self.tips.loading = false;

        match outcome {
            Ok(tips) => {
                info!(count = tips.len(), "care tips fetched");
                self.tips.result = Some(tips);
            }
            Err(e) => {
                warn!(error = %e, "care tips fetch failed");
                self.tips.error = Some(CARE_TIPS_ERROR.to_string());
            }
        }
    }

    // =============================================
    // 翻訳
    // =============================================

    /// 言語を切り替える
    ///
    /// 基本言語ならローカルで翻訳キャッシュを捨てて終わり（ゲートウェイは呼ばない）。
    /// それ以外は画面に出ているワークフローの元の結果だけを翻訳対象にし、
    /// 他の2つの翻訳スロットは空にする。
    pub fn begin_change_language(&mut self, language: &str) -> Result<LanguageChange> {
        self.ensure_view(
            &[View::Result, View::CareTips, View::SoilResult],
            "change the language",
        )?;
        let language = find_language(language)
            .ok_or_else(|| PlantDoctorError::UnsupportedLanguage(language.to_string()))?;
        let Some(workflow) = self.view.active_workflow() else {
            return Err(self.invalid("change the language"));
        };
        if self.is_translating {
            return Err(PlantDoctorError::Busy(workflow));
        }

        self.language = language.to_string();

        if is_base_language(language) {
            self.clear_translations();
            debug!("back to base language");
            return Ok(LanguageChange::Cleared);
        }

        let source = match workflow {
            Workflow::Plant => self.plant.result.clone().map(WorkflowResult::Plant),
            Workflow::Soil => self.soil.result.clone().map(WorkflowResult::Soil),
            Workflow::Tips => self.tips.result.clone().map(WorkflowResult::Tips),
        };
        let Some(source) = source else {
            debug!(%workflow, "nothing to translate");
            return Ok(LanguageChange::Unavailable);
        };

        if workflow != Workflow::Plant {
            self.plant.translated = None;
        }
        if workflow != Workflow::Soil {
            self.soil.translated = None;
        }
        if workflow != Workflow::Tips {
            self.tips.translated = None;
        }

        self.is_translating = true;
        info!(%workflow, language, "translation started");
        Ok(LanguageChange::Translate(TranslationRequest {
            ticket: TranslationTicket {
                workflow,
                language: language.to_string(),
                generation: self.translation_generation,
            },
            source,
        }))
    }

    /// 翻訳結果を反映
    ///
    /// 失敗・世代切れ・種類違いは何も書き換えずログのみ
    pub fn settle_translation(
        &mut self,
        ticket: TranslationTicket,
        outcome: Result<WorkflowResult>,
    ) {
        self.is_translating = false;

        if ticket.generation != self.translation_generation {
            info!(workflow = %ticket.workflow, language = %ticket.language, "discarding superseded translation");
            return;
        }

        let translated = match outcome {
            Ok(translated) => translated,
            Err(e) => {
                warn!(workflow = %ticket.workflow, language = %ticket.language, error = %e, "translation failed");
                return;
            }
        };

        if translated.workflow() != ticket.workflow {
            warn!(
                expected = %ticket.workflow,
                got = %translated.workflow(),
                "translation returned the wrong result kind"
            );
            return;
        }

        match translated {
            WorkflowResult::Plant(result) => self.plant.translated = Some(result),
            WorkflowResult::Soil(result) => self.soil.translated = Some(result),
            WorkflowResult::Tips(tips) => self.tips.translated = Some(tips),
        }
        info!(workflow = %ticket.workflow, language = %ticket.language, "translation applied");
    }

    // =============================================
    // 内部
    // =============================================

    fn enter_plant_scan(&mut self) {
        self.scan_mode = ScanMode::Plant;
        self.image = None;
        self.plant.clear_result();
        self.viewing_history_detail = false;
        self.translation_generation += 1;
        self.view = View::Scan;
    }

    fn enter_soil_scan(&mut self) {
        self.scan_mode = ScanMode::Soil;
        self.image = None;
        self.soil.clear_result();
        self.translation_generation += 1;
        self.view = View::SoilScan;
    }

    /// 基本言語へ戻し、翻訳中のものも含めて翻訳を無効にする
    fn reset_language(&mut self) {
        self.language = BASE_LANGUAGE.to_string();
        self.clear_translations();
    }

    fn clear_translations(&mut self) {
        self.plant.translated = None;
        self.soil.translated = None;
        self.tips.translated = None;
        self.translation_generation += 1;
    }

    fn ensure_view(&self, allowed: &[View], trigger: &'static str) -> Result<()> {
        if allowed.contains(&self.view) {
            Ok(())
        } else {
            Err(self.invalid(trigger))
        }
    }

    /// 画像送信はスキャン画面か、同じモードで開いたカメラ画面から
    fn ensure_submit(&self, mode: ScanMode, scan_view: View, trigger: &'static str) -> Result<()> {
        let allowed = self.view == scan_view || (self.view == View::Camera && self.scan_mode == mode);
        if allowed {
            Ok(())
        } else {
            Err(self.invalid(trigger))
        }
    }

    fn invalid(&self, trigger: &'static str) -> PlantDoctorError {
        PlantDoctorError::InvalidTransition {
            from: self.view,
            trigger,
        }
    }
}
