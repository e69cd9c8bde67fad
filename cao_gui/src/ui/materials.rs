//! Materials page: the property table used by the calculators, then the
//! catalogue cards.

use iced::widget::{column, container, row, rule, text, Column, Row};
use iced::{Element, Length};

use cao_core::materials::{CatalogueCard, CATALOGUE, MATERIALS};

use super::shared::palette;
use crate::Message;

const CARDS_PER_ROW: usize = 3;

pub fn view() -> Column<'static, Message> {
    let header = row![
        text("Matériau").size(11).width(Length::Fixed(160.0)),
        text("E (MPa)").size(11).width(Length::Fixed(90.0)),
        text("Re (MPa)").size(11).width(Length::Fixed(90.0)),
    ];
    let mut table = column![header, rule::horizontal(1)].spacing(2);
    for m in MATERIALS.iter() {
        table = table.push(row![
            text(m.name).size(10).width(Length::Fixed(160.0)),
            text(format!("{:.0}", m.e_mpa)).size(10).width(Length::Fixed(90.0)),
            text(format!("{:.0}", m.re_mpa)).size(10).width(Length::Fixed(90.0)),
        ]);
    }

    let mut cards = column![].spacing(8);
    for chunk in CATALOGUE.chunks(CARDS_PER_ROW) {
        let line: Row<'static, Message> = chunk.iter().fold(row![].spacing(8), |line, card| line.push(view_card(card)));
        cards = cards.push(line);
    }

    column![
        text("Matériaux").size(18).color(palette::PRIMARY),
        table,
        rule::horizontal(1),
        text("Catalogue").size(14).color(palette::PRIMARY),
        cards,
    ]
    .spacing(8)
}

fn view_card(card: &CatalogueCard) -> Element<'static, Message> {
    container(column![text(card.name).size(12).color(palette::PRIMARY), text(card.body()).size(10)].spacing(4))
        .padding(8)
        .width(Length::Fill)
        .style(palette::card)
        .into()
}
