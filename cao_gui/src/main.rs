//! # Assistant de CAO
//!
//! Desktop window for the mechanical design calculators in `cao_core`.
//! Built with Iced.
//!
//! ## Layout
//!
//! ```text
//! ┌ toolbar ─────────────────────────────────────────────┐
//! │ pages │ form / settings / home  │ plan + schematic    │
//! └ status bar ──────────────────────────────────────────┘
//! ```

mod ui;
mod update;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use iced::widget::{column, container, image, row, rule};
use iced::{Element, Length, Size, Task};
use tracing_subscriber::EnvFilter;

use cao_core::file_io::FileLock;
use cao_core::forms::FieldValues;
use cao_core::pages::{Navigator, Page};
use cao_core::session::{Session, Settings};
use cao_core::CalculationOutput;

const WINDOW_TITLE: &str = "Assistant de CAO";

fn main() -> iced::Result {
    init_logging();
    tracing::info!("starting {}", WINDOW_TITLE);

    iced::application(App::new, App::update, App::view)
        .title(App::title)
        .window_size(Size::new(1200.0, 780.0))
        .run()
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cao_core=info,cao_gui=info,warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Messages the window reacts to.
#[derive(Debug, Clone)]
pub enum Message {
    // Session file
    NewSession,
    OpenSession,
    SaveSession,
    SaveSessionAs,
    ResetSession,

    // Navigation
    ShowPage(Page),
    Back,
    Home,

    // Calculator form
    FieldChanged(String, String),
    Calculate,
    ResetForm,
    ExportCsv,
    ExportSvg,

    // Mass to force converter on the RDM page
    MassChanged(String),
    ConvertMass,

    // Settings page
    SettingChanged(String, String),
    ApplySettings,
}

/// Application state.
pub struct App {
    pub session: Session,
    pub current_file: Option<PathBuf>,
    /// Held while the session file is open for writing
    pub lock: Option<FileLock>,
    /// Set when another user holds the lock; the session is then read-only
    pub lock_holder: Option<String>,
    pub is_modified: bool,

    pub navigator: Navigator,
    /// Raw form values per page, kept while navigating
    pub forms: HashMap<Page, FieldValues>,
    pub output: Option<CalculationOutput>,
    pub error_message: Option<String>,
    pub status: String,

    pub settings_form: FieldValues,
    pub mass_input: String,
    pub conversion: Option<String>,

    pub logo: Option<image::Handle>,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let session = Session::new(whoami::username());
        let logo = load_logo(&session.settings);
        let app = App {
            settings_form: settings_form(&session.settings),
            session,
            current_file: None,
            lock: None,
            lock_holder: None,
            is_modified: false,
            navigator: Navigator::default(),
            forms: HashMap::new(),
            output: None,
            error_message: None,
            status: "Prêt".to_string(),
            mass_input: String::new(),
            conversion: None,
            logo,
        };
        (app, Task::none())
    }

    fn title(&self) -> String {
        let file = self
            .current_file
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sans titre".to_string());
        let modified = if self.is_modified { " *" } else { "" };
        format!("{} - {}{}", WINDOW_TITLE, file, modified)
    }

    pub fn page(&self) -> Page {
        self.navigator.current()
    }

    /// Form of the current page, if it has been opened.
    pub fn form(&self) -> Option<&FieldValues> {
        self.forms.get(&self.page())
    }

    fn view(&self) -> Element<'_, Message> {
        let body = row![
            ui::nav_panel::view_nav_panel(self.page()),
            ui::input_panel::view_input_panel(self),
            ui::results_panel::view_results_panel(self),
        ]
        .spacing(8)
        .height(Length::Fill);

        let content = column![
            ui::toolbar::view_toolbar(self),
            rule::horizontal(1),
            body,
            rule::horizontal(1),
            ui::status_bar::view_status_bar(
                self.page(),
                &self.current_file,
                self.is_modified,
                &self.lock_holder,
                &self.status,
            ),
        ]
        .spacing(4)
        .padding(8);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(ui::shared::palette::background)
            .into()
    }
}

/// Settings as editable text.
pub fn settings_form(settings: &Settings) -> FieldValues {
    Settings::KEYS
        .iter()
        .map(|key| (key.to_string(), settings.get(key).unwrap_or_default()))
        .collect()
}

/// Logo from the settings path; a missing file is silently ignored.
pub fn load_logo(settings: &Settings) -> Option<image::Handle> {
    let path = Path::new(&settings.logo_path);
    if path.is_file() {
        tracing::debug!(path = %path.display(), "logo loaded");
        Some(image::Handle::from_path(path))
    } else {
        None
    }
}
