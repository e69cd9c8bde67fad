//! Message handling.
//!
//! Calculations run synchronously inside `update`; any `CalcError` replaces
//! the result with `Erreur : ...`. File dialogs are blocking `rfd` dialogs.

use std::path::{Path, PathBuf};

use iced::Task;

use cao_core::calculations::rdm::mass_to_force;
use cao_core::export;
use cao_core::file_io::{load_session, load_session_with_lock_check, save_session, FileLock, SESSION_EXTENSION};
use cao_core::pages::{submit, Page};
use cao_core::session::{Session, Settings};
use cao_core::{CalcError, CalcResult};

use crate::{load_logo, settings_form, App, Message};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NewSession => {
                self.lock = None;
                self.lock_holder = None;
                self.current_file = None;
                self.replace_session(Session::new(whoami::username()));
                self.status = "Nouvelle session".to_string();
            }
            Message::OpenSession => {
                if let Some(path) = session_dialog().pick_file() {
                    self.open_session(path);
                }
            }
            Message::SaveSession => match self.current_file.clone() {
                Some(path) => self.save_to(path),
                None => self.save_as(),
            },
            Message::SaveSessionAs => self.save_as(),
            Message::ResetSession => {
                self.session.reset();
                self.forms.clear();
                self.output = None;
                self.error_message = None;
                self.is_modified = true;
                self.status = "Mémoire moteur et historique effacés".to_string();
            }

            Message::ShowPage(page) => self.show_page(page),
            Message::Back => {
                let page = self.navigator.back();
                self.open_form(page);
                self.clear_result();
            }
            Message::Home => {
                self.navigator.home();
                self.clear_result();
            }

            Message::FieldChanged(key, value) => {
                let page = self.page();
                self.forms
                    .entry(page)
                    .or_insert_with(|| page.defaults(&self.session.context()))
                    .set(key, value);
            }
            Message::Calculate => self.calculate(),
            Message::ResetForm => {
                let page = self.page();
                self.forms.insert(page, page.defaults(&self.session.context()));
                self.clear_result();
            }
            Message::ExportCsv => self.export_csv(),
            Message::ExportSvg => self.export_svg(),

            Message::MassChanged(value) => self.mass_input = value,
            Message::ConvertMass => {
                let parsed = self.mass_input.trim().replace(',', ".").parse::<f64>();
                self.conversion = Some(match parsed {
                    Ok(mass) => match mass_to_force(mass, self.session.settings.gravity) {
                        Ok(c) => c.to_string(),
                        Err(e) => e.user_message(),
                    },
                    Err(_) => CalcError::invalid_input("masse", self.mass_input.clone(), "Nombre attendu").user_message(),
                });
            }

            Message::SettingChanged(key, value) => self.settings_form.set(key, value),
            Message::ApplySettings => self.apply_settings(),
        }
        Task::none()
    }

    fn show_page(&mut self, page: Page) {
        let engine_form = self
            .forms
            .get(&Page::Engine)
            .cloned()
            .unwrap_or_else(|| Page::Engine.defaults(&self.session.context()));
        let from_engine = self.page() == Page::Engine && page.is_stirling_detail();

        let engine_error = self.navigator.show(page, &engine_form, &mut self.session);
        if from_engine && engine_error.is_none() {
            // Detail forms start again from the fresh memo
            for detail in Page::STIRLING_DETAILS {
                self.forms.remove(&detail);
            }
            self.is_modified = true;
        }
        if page == Page::Settings {
            self.settings_form = settings_form(&self.session.settings);
        }
        self.open_form(page);
        self.clear_result();
        if let Some(e) = engine_error {
            self.fail(e);
        }
    }

    fn open_form(&mut self, page: Page) {
        if page.is_calculator() && !self.forms.contains_key(&page) {
            let values = page.defaults(&self.session.context());
            self.forms.insert(page, values);
        }
    }

    fn calculate(&mut self) {
        let page = self.page();
        let Some(values) = self.forms.get(&page).cloned() else {
            return;
        };
        match submit(page, &values, &mut self.session) {
            Ok(Some(output)) => {
                tracing::debug!(page = page.slug(), "calculation shown");
                self.status = format!("{} calculé", page.title());
                self.output = Some(output);
                self.error_message = None;
                self.is_modified = true;
            }
            Ok(None) => {}
            Err(e) => self.fail(e),
        }
    }

    fn apply_settings(&mut self) {
        let mut settings = self.session.settings.clone();
        for key in Settings::KEYS {
            let value = self.settings_form.raw(key).to_string();
            if settings.get(key).as_deref() == Some(value.as_str()) {
                continue;
            }
            if let Err(e) = settings.apply(key, &value) {
                self.fail(e);
                return;
            }
        }
        if settings.logo_path != self.session.settings.logo_path {
            self.logo = load_logo(&settings);
        }
        self.session.settings = settings;
        self.session.touch();
        self.settings_form = settings_form(&self.session.settings);
        self.error_message = None;
        self.is_modified = true;
        self.status = "Paramètres enregistrés".to_string();
    }

    fn export_csv(&mut self) {
        let Some((header, points)) = self.output.as_ref().and_then(|o| o.curve()) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(format!("{}.csv", self.page().slug()))
            .save_file()
        else {
            return;
        };
        match export::write_csv(&path, header, &points, self.session.settings.csv_decimals) {
            Ok(()) => self.status = format!("CSV exporté : {}", path.display()),
            Err(e) => self.fail(e),
        }
    }

    fn export_svg(&mut self) {
        let Some(schematic) = self.output.as_ref().and_then(|o| o.schematic()) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name(format!("{}.svg", self.page().slug()))
            .save_file()
        else {
            return;
        };
        match export::write_svg(&path, &schematic) {
            Ok(()) => self.status = format!("Schéma exporté : {}", path.display()),
            Err(e) => self.fail(e),
        }
    }

    /// Open a session file, read-only when someone else holds its lock.
    fn open_session(&mut self, path: PathBuf) {
        // Release our own lock first so reopening the same file works
        self.lock = None;
        match FileLock::acquire(&path, whoami::username()) {
            Ok(lock) => match load_session(&path) {
                Ok(session) => {
                    self.lock = Some(lock);
                    self.lock_holder = None;
                    self.opened(path, session);
                }
                Err(e) => self.fail(e),
            },
            Err(CalcError::FileLocked { .. }) => match load_session_with_lock_check(&path) {
                Ok((session, info)) => {
                    self.lock_holder = info.map(|i| i.user_id);
                    self.opened(path, session);
                    self.status = "Ouvert en lecture seule".to_string();
                }
                Err(e) => self.fail(e),
            },
            Err(e) => self.fail(e),
        }
    }

    fn opened(&mut self, path: PathBuf, session: Session) {
        tracing::info!(path = %path.display(), "session opened");
        self.status = format!("Ouvert : {}", path.display());
        self.current_file = Some(path);
        self.replace_session(session);
        self.is_modified = false;
    }

    fn replace_session(&mut self, session: Session) {
        self.logo = load_logo(&session.settings);
        self.settings_form = settings_form(&session.settings);
        self.session = session;
        self.forms.clear();
        self.navigator.home();
        self.clear_result();
        self.is_modified = false;
    }

    fn save_as(&mut self) {
        if let Some(path) = session_dialog().set_file_name(format!("session.{}", SESSION_EXTENSION)).save_file() {
            self.lock_holder = None;
            self.save_to(path);
        }
    }

    fn save_to(&mut self, path: PathBuf) {
        if let Some(holder) = &self.lock_holder {
            self.status = format!("Lecture seule : verrouillé par {}", holder);
            return;
        }
        if self.lock.as_ref().map(FileLock::session_path) != Some(path.as_path()) {
            self.lock = None;
            match FileLock::acquire(&path, whoami::username()) {
                Ok(lock) => self.lock = Some(lock),
                Err(e) => return self.fail(e),
            }
        }
        match write_session(&self.session, &path) {
            Ok(()) => {
                self.status = format!("Enregistré : {}", path.display());
                self.current_file = Some(path);
                self.is_modified = false;
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: CalcError) {
        tracing::warn!(code = error.error_code(), "{}", error);
        if error.is_recoverable() {
            self.status = "Fichier verrouillé, réessayez plus tard".to_string();
        }
        self.error_message = Some(error.user_message());
        self.output = None;
    }

    fn clear_result(&mut self) {
        self.output = None;
        self.error_message = None;
        self.conversion = None;
    }
}

fn session_dialog() -> rfd::FileDialog {
    rfd::FileDialog::new().add_filter("Session CAO", &[SESSION_EXTENSION])
}

fn write_session(session: &Session, path: &Path) -> CalcResult<()> {
    let mut session = session.clone();
    session.touch();
    save_session(&session, path)
}
