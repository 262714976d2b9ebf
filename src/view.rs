//! 画面・スキャンモード・ワークフローの列挙

use std::fmt;

/// 現在の画面（状態機械の唯一の真実）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Home,
    Scan,
    Camera,
    Analyzing,
    Result,
    CareTips,
    History,
    SoilScan,
    AnalyzingSoil,
    SoilResult,
}

impl View {
    pub const ALL: [View; 10] = [
        View::Home,
        View::Scan,
        View::Camera,
        View::Analyzing,
        View::Result,
        View::CareTips,
        View::History,
        View::SoilScan,
        View::AnalyzingSoil,
        View::SoilResult,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Scan => "scan",
            View::Camera => "camera",
            View::Analyzing => "analyzing",
            View::Result => "result",
            View::CareTips => "careTips",
            View::History => "history",
            View::SoilScan => "soilScan",
            View::AnalyzingSoil => "analyzingSoil",
            View::SoilResult => "soilResult",
        }
    }

    /// 画面に表示されているワークフロー（翻訳対象の判定に使う）
    pub fn active_workflow(&self) -> Option<Workflow> {
        match self {
            View::Analyzing | View::Result => Some(Workflow::Plant),
            View::AnalyzingSoil | View::SoilResult => Some(Workflow::Soil),
            View::CareTips => Some(Workflow::Tips),
            _ => None,
        }
    }

    /// ホームへ戻るボタンを出す画面か
    pub fn shows_back_button(&self) -> bool {
        !matches!(self, View::Home | View::Camera)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// カメラ画面がどちらのスキャンから開かれたか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScanMode {
    #[default]
    Plant,
    Soil,
}

/// 読み込み・翻訳の排他単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    Plant,
    Soil,
    Tips,
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workflow::Plant => f.write_str("plant analysis"),
            Workflow::Soil => f.write_str("soil analysis"),
            Workflow::Tips => f.write_str("care tips"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_home() {
        assert_eq!(View::default(), View::Home);
    }

    #[test]
    fn test_active_workflow() {
        assert_eq!(View::Result.active_workflow(), Some(Workflow::Plant));
        assert_eq!(View::Analyzing.active_workflow(), Some(Workflow::Plant));
        assert_eq!(View::SoilResult.active_workflow(), Some(Workflow::Soil));
        assert_eq!(View::CareTips.active_workflow(), Some(Workflow::Tips));
        assert_eq!(View::History.active_workflow(), None);
        assert_eq!(View::Home.active_workflow(), None);
    }

    #[test]
    fn test_back_button_hidden_on_home_and_camera() {
        for view in View::ALL {
            let expected = !matches!(view, View::Home | View::Camera);
            assert_eq!(view.shows_back_button(), expected, "{}", view);
        }
    }

    #[test]
    fn test_view_display() {
        assert_eq!(View::CareTips.to_string(), "careTips");
        assert_eq!(Workflow::Soil.to_string(), "soil analysis");
    }
}
