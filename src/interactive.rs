//! 対話メニュー
//!
//! 画面を表示し、その画面で選べる操作を `dialoguer::Select` で選ばせるループ。
//! 操作エラー（処理中・遷移違反など）は表示して続行し、
//! プロンプト自体の失敗だけでループを抜ける。

use crate::app::PlantDoctor;
use crate::confirm::TerminalConfirm;
use crate::error::{PlantDoctorError, Result};
use crate::gateway::{InferenceGateway, TranslationGateway};
use crate::image_input::load_image;
use crate::render::{format_date, Action};
use crate::storage::KeyValueStore;
use dialoguer::{Input, Select};
use plant_doctor_common::language::language_index;
use plant_doctor_common::SUPPORTED_LANGUAGES;
use tracing::debug;

pub async fn run<I, T, S>(app: &mut PlantDoctor<I, T, S>) -> Result<()>
where
    I: InferenceGateway,
    T: TranslationGateway,
    S: KeyValueStore,
{
    loop {
        let frame = app.frame();
        println!("\n{}", frame);

        let actions = frame.actions();
        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let selection = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        let action = actions[selection];
        debug!(?action, view = %frame.view, "menu action");
        match handle(app, action).await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e @ PlantDoctorError::Prompt(_)) => return Err(e),
            Err(e) => println!("⚠ {e}"),
        }
    }
}

/// 操作を1つ実行。終了なら true
async fn handle<I, T, S>(app: &mut PlantDoctor<I, T, S>, action: Action) -> Result<bool>
where
    I: InferenceGateway,
    T: TranslationGateway,
    S: KeyValueStore,
{
    match action {
        Action::StartPlantScan => app.start_plant_scan()?,
        Action::StartSoilScan => app.start_soil_scan()?,
        Action::OpenCareTips => app.open_care_tips().await,
        Action::OpenHistory => app.open_history(),
        Action::OpenCamera => app.open_camera()?,
        Action::BackFromCamera => app.back_from_camera()?,
        Action::SubmitImage => {
            let path: String = Input::new()
                .with_prompt("Image file or data URI")
                .interact_text()?;
            let image = load_image(path.trim())?;
            println!("Analyzing...");
            app.submit_image(image).await?;
        }
        Action::ChangeLanguage => {
            let current = language_index(app.session().language()).unwrap_or(0);
            let selection = Select::new()
                .with_prompt("Language")
                .items(SUPPORTED_LANGUAGES)
                .default(current)
                .interact()?;
            app.change_language(SUPPORTED_LANGUAGES[selection]).await?;
        }
        Action::Done(_) => app.done()?,
        Action::SelectHistoryItem => {
            let labels: Vec<String> = app
                .history()
                .iter()
                .map(|item| format!("{}  {}", format_date(&item.date), item.analysis.plant_name))
                .collect();
            let selection = Select::new()
                .with_prompt("Analysis")
                .items(&labels)
                .default(0)
                .interact()?;
            let id = app.history()[selection].id.clone();
            app.select_history_item(&id)?;
        }
        Action::ClearHistory => {
            if app.clear_history(&TerminalConfirm)? {
                println!("✔ History cleared");
            }
        }
        Action::NavigateHome => app.navigate_home()?,
        Action::Quit => return Ok(true),
    }
    Ok(false)
}
