//! Settings page: one text input per setting, applied together.

use iced::widget::{button, column, row, rule, text, text_input, Column, Space};
use iced::{Alignment, Length, Padding};

use cao_core::session::Settings;

use super::shared::palette;
use crate::{App, Message};

fn label(key: &str) -> &'static str {
    match key {
        "tol" => "Tolérance de sécurité par défaut (%)",
        "gravite" => "Gravité (m/s²)",
        "logo" => "Logo (chemin relatif)",
        "csv_decimales" => "Décimales CSV",
        "latitude" => "Base mission : latitude (°)",
        "longitude" => "Base mission : longitude (°)",
        _ => "",
    }
}

pub fn view(app: &App) -> Column<'_, Message> {
    let mut content = column![
        text("Paramètres").size(18).color(palette::PRIMARY),
        text("Enregistrés dans la session").size(10).color(palette::MUTED),
        rule::horizontal(1),
    ]
    .spacing(6);

    for key in Settings::KEYS {
        content = content.push(
            row![
                text(label(key)).size(11).width(Length::Fixed(230.0)),
                text_input("", app.settings_form.raw(key))
                    .on_input(move |s| Message::SettingChanged(key.to_string(), s))
                    .on_submit(Message::ApplySettings)
                    .size(11)
                    .width(Length::Fixed(150.0)),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        );
    }

    content.push(Space::new().height(8)).push(
        button(text("Appliquer").size(12))
            .on_press(Message::ApplySettings)
            .padding(Padding::from([6, 14]))
            .style(palette::page_button(true)),
    )
}
