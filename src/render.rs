//! 画面描画
//!
//! `render` はセッションと履歴から、その時点で表示すべき内容を組み立てる純粋関数。
//! 端末への出力は `Frame` の Display 実装が担当する。

use crate::session::Session;
use crate::view::{ScanMode, View};
use chrono::{DateTime, Local};
use plant_doctor_common::{
    AnalysisHistoryItem, AnalysisResult, CareTip, HealthStatus, SoilAnalysisResult,
};
use std::fmt;

/// 1画面分の描画内容
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub view: View,
    /// ホームへ戻るボタン
    pub show_back_button: bool,
    pub screen: Screen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home,
    Scan {
        mode: ScanMode,
        error: Option<String>,
    },
    Camera {
        mode: ScanMode,
    },
    PlantAnalysis(AnalysisPanel<AnalysisResult>),
    SoilAnalysis(AnalysisPanel<SoilAnalysisResult>),
    CareTips(TipsPanel),
    History {
        entries: Vec<HistoryEntry>,
    },
}

/// 診断中・診断結果の画面
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPanel<T> {
    pub loading: bool,
    /// 翻訳があれば翻訳、なければ元の結果
    pub result: Option<T>,
    pub image: Option<String>,
    pub error: Option<String>,
    pub done: DoneAction,
    pub language: LanguageBar,
}

impl<T> AnalysisPanel<T> {
    /// 言語セレクタを出すか（結果が表示されているときだけ）
    pub fn can_translate(&self) -> bool {
        !self.loading && self.error.is_none() && self.result.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TipsPanel {
    pub loading: bool,
    pub tips: Option<Vec<CareTip>>,
    pub error: Option<String>,
    pub language: LanguageBar,
}

impl TipsPanel {
    pub fn can_translate(&self) -> bool {
        !self.loading && self.error.is_none() && self.tips.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageBar {
    pub language: String,
    pub is_translating: bool,
}

/// 履歴一覧の1行
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub plant_name: String,
    pub health_status: HealthStatus,
    pub date: String,
}

impl From<&AnalysisHistoryItem> for HistoryEntry {
    fn from(item: &AnalysisHistoryItem) -> Self {
        Self {
            id: item.id.clone(),
            plant_name: item.analysis.plant_name.clone(),
            health_status: item.analysis.health_status,
            date: item.date.clone(),
        }
    }
}

/// 結果画面の完了ボタン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneAction {
    BackToHistory,
    ScanAnotherPlant,
    ScanAnotherSample,
}

impl DoneAction {
    pub fn label(&self) -> &'static str {
        match self {
            DoneAction::BackToHistory => "Back to History",
            DoneAction::ScanAnotherPlant => "Scan Another Plant",
            DoneAction::ScanAnotherSample => "Scan Another Sample",
        }
    }
}

/// 画面で選べる操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartPlantScan,
    StartSoilScan,
    OpenCareTips,
    OpenHistory,
    SubmitImage,
    OpenCamera,
    BackFromCamera,
    ChangeLanguage,
    Done(DoneAction),
    SelectHistoryItem,
    ClearHistory,
    NavigateHome,
    Quit,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::StartPlantScan => "Scan Plant",
            Action::StartSoilScan => "Analyze Soil",
            Action::OpenCareTips => "Plant Care Tips",
            Action::OpenHistory => "Analysis History",
            Action::SubmitImage => "Upload Image",
            Action::OpenCamera => "Use Camera",
            Action::BackFromCamera => "Back",
            Action::ChangeLanguage => "Change Language",
            Action::Done(done) => done.label(),
            Action::SelectHistoryItem => "View Analysis",
            Action::ClearHistory => "Clear History",
            Action::NavigateHome => "Back to Home",
            Action::Quit => "Quit",
        }
    }
}

/// 現在の状態から描画内容を組み立てる
pub fn render(session: &Session, history: &[AnalysisHistoryItem]) -> Frame {
    let view = session.view();
    let language = LanguageBar {
        language: session.language().to_string(),
        is_translating: session.is_translating(),
    };
    let image = session.image().map(str::to_string);

    let screen = match view {
        View::Home => Screen::Home,
        View::Scan => Screen::Scan {
            mode: ScanMode::Plant,
            error: session.plant().error.clone(),
        },
        View::SoilScan => Screen::Scan {
            mode: ScanMode::Soil,
            error: session.soil().error.clone(),
        },
        View::Camera => Screen::Camera {
            mode: session.scan_mode(),
        },
        View::Analyzing | View::Result => {
            let slot = session.plant();
            Screen::PlantAnalysis(AnalysisPanel {
                loading: view == View::Analyzing,
                result: slot.displayed().cloned(),
                image,
                error: slot.error.clone(),
                done: if session.is_viewing_history_detail() {
                    DoneAction::BackToHistory
                } else {
                    DoneAction::ScanAnotherPlant
                },
                language,
            })
        }
        View::AnalyzingSoil | View::SoilResult => {
            let slot = session.soil();
            Screen::SoilAnalysis(AnalysisPanel {
                loading: view == View::AnalyzingSoil,
                result: slot.displayed().cloned(),
                image,
                error: slot.error.clone(),
                done: DoneAction::ScanAnotherSample,
                language,
            })
        }
        View::CareTips => {
            let slot = session.tips();
            Screen::CareTips(TipsPanel {
                loading: slot.loading,
                tips: slot.displayed().cloned(),
                error: slot.error.clone(),
                language,
            })
        }
        View::History => Screen::History {
            entries: history.iter().map(HistoryEntry::from).collect(),
        },
    };

    Frame {
        view,
        show_back_button: view.shows_back_button(),
        screen,
    }
}

impl Frame {
    /// この画面で選べる操作（表示順）
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = match &self.screen {
            Screen::Home => vec![
                Action::StartPlantScan,
                Action::StartSoilScan,
                Action::OpenCareTips,
                Action::OpenHistory,
            ],
            Screen::Scan { .. } => vec![Action::SubmitImage, Action::OpenCamera],
            Screen::Camera { .. } => vec![Action::SubmitImage, Action::BackFromCamera],
            Screen::PlantAnalysis(panel) => panel_actions(panel.loading, panel.can_translate(), panel.done),
            Screen::SoilAnalysis(panel) => panel_actions(panel.loading, panel.can_translate(), panel.done),
            Screen::CareTips(panel) if panel.can_translate() => vec![Action::ChangeLanguage],
            Screen::CareTips(_) => Vec::new(),
            Screen::History { entries } if entries.is_empty() => Vec::new(),
            Screen::History { .. } => vec![Action::SelectHistoryItem, Action::ClearHistory],
        };

        if self.show_back_button {
            actions.push(Action::NavigateHome);
        }
        actions.push(Action::Quit);
        actions
    }
}

fn panel_actions(loading: bool, can_translate: bool, done: DoneAction) -> Vec<Action> {
    if loading {
        return Vec::new();
    }
    let mut actions = vec![Action::Done(done)];
    if can_translate {
        actions.push(Action::ChangeLanguage);
    }
    actions
}

/// 履歴の日時を端末のローカル時刻で表示（解釈できなければそのまま）
pub fn format_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(parsed) => parsed.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => date.to_string(),
    }
}

fn confidence_percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

// =============================================
// テキスト表示
// =============================================

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.screen {
            Screen::Home => {
                writeln!(f, "Welcome! 🌱")?;
                writeln!(f, "Diagnose a plant, check your soil, or brush up on plant care.")
            }
            Screen::Scan { mode, error } => {
                match mode {
                    ScanMode::Plant => writeln!(f, "Scan Your Plant")?,
                    ScanMode::Soil => writeln!(f, "Analyze Your Soil")?,
                }
                writeln!(f, "Upload a clear photo or use the camera.")?;
                if let Some(error) = error {
                    writeln!(f, "\n⚠ {error}")?;
                }
                Ok(())
            }
            Screen::Camera { mode } => match mode {
                ScanMode::Plant => writeln!(f, "Camera: point at the plant and capture."),
                ScanMode::Soil => writeln!(f, "Camera: point at the soil and capture."),
            },
            Screen::PlantAnalysis(panel) => write_plant_panel(f, panel),
            Screen::SoilAnalysis(panel) => write_soil_panel(f, panel),
            Screen::CareTips(panel) => write_tips_panel(f, panel),
            Screen::History { entries } => {
                writeln!(f, "Analysis History")?;
                if entries.is_empty() {
                    writeln!(f, "\nNo Analyses Yet")?;
                    return writeln!(f, "Your past plant analyses will appear here.");
                }
                for entry in entries {
                    writeln!(
                        f,
                        "  {}  {} ({})  [{}]",
                        format_date(&entry.date),
                        entry.plant_name,
                        entry.health_status,
                        entry.id
                    )?;
                }
                Ok(())
            }
        }
    }
}

fn write_language_bar(f: &mut fmt::Formatter<'_>, bar: &LanguageBar) -> fmt::Result {
    if bar.is_translating {
        writeln!(f, "Language: {} (translating...)", bar.language)
    } else {
        writeln!(f, "Language: {}", bar.language)
    }
}

fn write_plant_panel(
    f: &mut fmt::Formatter<'_>,
    panel: &AnalysisPanel<AnalysisResult>,
) -> fmt::Result {
    if panel.loading {
        return writeln!(f, "Analyzing Your Plant...");
    }
    if let Some(error) = &panel.error {
        writeln!(f, "Analysis Failed")?;
        return writeln!(f, "{error}");
    }
    let Some(result) = &panel.result else {
        return writeln!(f, "No Result");
    };

    write_language_bar(f, &panel.language)?;
    writeln!(f, "\n{}  [{}]", result.plant_name, result.health_status)?;
    writeln!(f, "Confidence: {}", confidence_percent(result.confidence))?;

    writeln!(f, "\nPotential Issues")?;
    if result.potential_issues.is_empty() {
        writeln!(f, "  None detected.")?;
    }
    for issue in &result.potential_issues {
        writeln!(f, "  • {}: {}", issue.issue, issue.description)?;
        writeln!(f, "    Remedy: {}", issue.remedy)?;
    }

    writeln!(f, "\nCare Recommendations")?;
    for recommendation in &result.care_recommendations {
        writeln!(f, "  • {recommendation}")?;
    }
    Ok(())
}

fn write_soil_panel(
    f: &mut fmt::Formatter<'_>,
    panel: &AnalysisPanel<SoilAnalysisResult>,
) -> fmt::Result {
    if panel.loading {
        return writeln!(f, "Analyzing Your Soil...");
    }
    if let Some(error) = &panel.error {
        writeln!(f, "Analysis Failed")?;
        return writeln!(f, "{error}");
    }
    let Some(result) = &panel.result else {
        return writeln!(f, "No Result");
    };

    write_language_bar(f, &panel.language)?;
    writeln!(f, "\nSoil Type: {}", result.soil_type)?;
    writeln!(f, "{}", result.description)?;
    writeln!(f, "\nRecommended Plants")?;
    for plant in &result.recommended_plants {
        writeln!(f, "  • {}: {}", plant.plant_name, plant.reasoning)?;
    }
    Ok(())
}

fn write_tips_panel(f: &mut fmt::Formatter<'_>, panel: &TipsPanel) -> fmt::Result {
    writeln!(f, "Plant Care Tips")?;
    if panel.loading {
        return writeln!(f, "Loading tips...");
    }
    if let Some(error) = &panel.error {
        return writeln!(f, "{error}");
    }
    let Some(tips) = &panel.tips else {
        return Ok(());
    };

    write_language_bar(f, &panel.language)?;
    for (i, tip) in tips.iter().enumerate() {
        writeln!(f, "\n{}. {}", i + 1, tip.title)?;
        writeln!(f, "   {}", tip.content)?;
        writeln!(f, "   Key takeaway: {}", tip.key_takeaway)?;
    }
    Ok(())
}
