//! Status Bar (Bottom)
//!
//! Displays:
//! - Current page
//! - Current session file
//! - Modified indicator (*)
//! - Lock holder (if read-only)
//! - Status messages

use std::path::PathBuf;

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use cao_core::pages::Page;

use super::shared::palette;
use crate::Message;

/// Render the status bar
pub fn view_status_bar<'a>(
    page: Page,
    current_file: &'a Option<PathBuf>,
    is_modified: bool,
    lock_holder: &'a Option<String>,
    status: &'a str,
) -> Element<'a, Message> {
    let file_info = match current_file {
        Some(path) => path.display().to_string(),
        None => "Session sans titre".to_string(),
    };

    let lock_info = match lock_holder {
        Some(holder) => format!(" [Verrouillé par : {}]", holder),
        None => String::new(),
    };

    let modified_indicator = if is_modified { " *" } else { "" };

    row![
        text(page.title()).size(10).color(palette::PRIMARY),
        text(" | ").size(10),
        text(format!("{}{}", file_info, modified_indicator)).size(10),
        text(lock_info).size(10).color([0.6, 0.3, 0.0]),
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
