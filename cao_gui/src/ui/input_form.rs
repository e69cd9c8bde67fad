//! Calculator form
//!
//! Built from the page's field list: a text input per numeric or text
//! field, a pick list per choice or material field.

use iced::widget::{button, column, pick_list, row, rule, text, text_input, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use cao_core::forms::{FieldKind, FieldSpec, FieldValues};
use cao_core::materials::MATERIALS;
use cao_core::pages::Page;

use super::shared::palette;
use crate::{App, Message};

const LABEL_WIDTH: f32 = 230.0;
const INPUT_WIDTH: f32 = 150.0;

pub fn view(app: &App) -> Column<'_, Message> {
    let page = app.page();
    let mut content = column![text(page.title()).size(18).color(palette::PRIMARY)].spacing(6);

    if page.is_stirling_detail() || page == Page::Gearbox {
        let note = if app.session.memo.is_some() {
            "Valeurs pré-remplies depuis le dernier moteur calculé"
        } else {
            "Calculez d'abord le moteur Stirling pour pré-remplir ce formulaire"
        };
        content = content.push(text(note).size(10).color(palette::MUTED));
    }
    content = content.push(rule::horizontal(1));

    let Some(values) = app.form() else {
        return content;
    };
    for spec in page.fields() {
        content = content.push(field_row(spec, values));
    }

    content = content.push(Space::new().height(8)).push(
        row![
            button(text("Calculer").size(12))
                .on_press(Message::Calculate)
                .padding(Padding::from([6, 14]))
                .style(palette::page_button(true)),
            button(text("Valeurs par défaut").size(11))
                .on_press(Message::ResetForm)
                .padding(Padding::from([6, 10]))
                .style(button::secondary),
        ]
        .spacing(8),
    );

    if page == Page::Rdm {
        content = content.push(Space::new().height(12)).push(view_converter(app));
    }
    content
}

fn field_row(spec: FieldSpec, values: &FieldValues) -> Element<'_, Message> {
    let key = spec.key;
    let value = values.raw(key);
    let on_change = move |s: String| Message::FieldChanged(key.to_string(), s);

    let input: Element<'_, Message> = match spec.kind {
        FieldKind::Choice(options) => pick_list(options, options.iter().copied().find(|o| *o == value), move |s: &str| {
            Message::FieldChanged(key.to_string(), s.to_string())
        })
        .text_size(11)
        .width(Length::Fixed(INPUT_WIDTH))
        .into(),
        FieldKind::Material => {
            let names: Vec<&'static str> = MATERIALS.iter().map(|m| m.name).collect();
            let selected = names.iter().copied().find(|n| *n == value);
            pick_list(names, selected, move |s: &str| Message::FieldChanged(key.to_string(), s.to_string()))
                .text_size(11)
                .width(Length::Fixed(INPUT_WIDTH))
                .into()
        }
        FieldKind::Number | FieldKind::Integer | FieldKind::Text => text_input(spec.default, value)
            .on_input(on_change)
            .on_submit(Message::Calculate)
            .size(11)
            .width(Length::Fixed(INPUT_WIDTH))
            .into(),
    };

    row![text(spec.label).size(11).width(Length::Fixed(LABEL_WIDTH)), input]
        .spacing(8)
        .align_y(Alignment::Center)
        .into()
}

/// Mass to force converter shown under the RDM form.
fn view_converter(app: &App) -> Column<'_, Message> {
    let mut block = column![
        text("Conversion masse → force").size(13).color(palette::PRIMARY),
        row![
            text("Masse (kg)").size(11).width(Length::Fixed(LABEL_WIDTH)),
            text_input("0", &app.mass_input)
                .on_input(Message::MassChanged)
                .on_submit(Message::ConvertMass)
                .size(11)
                .width(Length::Fixed(INPUT_WIDTH)),
            button(text("Convertir").size(11))
                .on_press(Message::ConvertMass)
                .padding(Padding::from([4, 8]))
                .style(button::secondary),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    ]
    .spacing(6);

    if let Some(conversion) = &app.conversion {
        let color = if conversion.starts_with("Erreur") {
            palette::ERROR
        } else {
            palette::PRIMARY
        };
        block = block.push(text(conversion).size(11).color(color));
    }
    block
}
