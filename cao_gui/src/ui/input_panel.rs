//! Input Panel (Center)
//!
//! Dispatches on the current page:
//! - Home -> home (logo, shortcuts)
//! - Materials -> materials (tables)
//! - Settings -> input_settings
//! - any calculator -> input_form

use iced::widget::{container, scrollable, Column};
use iced::{Element, Length};

use cao_core::pages::Page;

use super::shared::palette;
use super::{home, input_form, input_settings, materials};
use crate::{App, Message};

/// Render the input panel for the current page
pub fn view_input_panel(app: &App) -> Element<'_, Message> {
    let panel: Column<'_, Message> = match app.page() {
        Page::Home => home::view(app),
        Page::Materials => materials::view(),
        Page::Settings => input_settings::view(app),
        _ => input_form::view(app),
    };

    container(scrollable(panel.padding(8)))
        .width(Length::FillPortion(45))
        .height(Length::Fill)
        .style(palette::card)
        .padding(5)
        .into()
}
