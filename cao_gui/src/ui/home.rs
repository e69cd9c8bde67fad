//! Home page: logo and one shortcut per domain.

use iced::widget::{button, column, image, row, text, Column, Space};
use iced::{Length, Padding};

use cao_core::pages::Page;

use super::shared::palette;
use crate::{App, Message};

const SHORTCUTS: [Page; 6] = [
    Page::Rdm,
    Page::Engine,
    Page::Gearbox,
    Page::DroneStructure,
    Page::IsoFit,
    Page::Mission,
];

pub fn view(app: &App) -> Column<'_, Message> {
    let mut content = column![].spacing(10);

    if let Some(logo) = &app.logo {
        content = content.push(image(logo.clone()).height(Length::Fixed(120.0)));
    }
    content = content.push(text("Assistant de CAO").size(24).color(palette::PRIMARY)).push(
        text("Calculs de conception mécanique : RDM, moteur Stirling, transmission, drone, ajustements ISO")
            .size(11)
            .color(palette::MUTED),
    );
    content = content.push(Space::new().height(8));

    for pair in SHORTCUTS.chunks(2) {
        let mut line = row![].spacing(8);
        for &page in pair {
            line = line.push(
                button(text(page.title()).size(13))
                    .on_press(Message::ShowPage(page))
                    .padding(Padding::from([12, 16]))
                    .width(Length::Fill)
                    .style(palette::page_button(false)),
            );
        }
        content = content.push(line);
    }

    content.push(Space::new().height(8)).push(
        text(format!("{} calcul(s) dans l'historique", app.session.history.len()))
            .size(10)
            .color(palette::MUTED),
    )
}
