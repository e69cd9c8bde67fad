//! Toolbar component
//!
//! Session file operations (New, Open, Save, Save As, Reset) on the left,
//! navigation (Back, Home) on the right.

use iced::widget::{button, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use cao_core::pages::Page;

use crate::{App, Message};

fn tool_button(label: &str, message: Message) -> button::Button<'_, Message> {
    button(text(label).size(11))
        .on_press(message)
        .padding(Padding::from([4, 8]))
        .style(button::secondary)
}

/// Render the toolbar with session operations and navigation
pub fn view_toolbar(app: &App) -> Element<'_, Message> {
    let file_buttons = row![
        tool_button("Nouveau", Message::NewSession),
        tool_button("Ouvrir", Message::OpenSession),
        tool_button("Enregistrer", Message::SaveSession),
        tool_button("Enregistrer sous", Message::SaveSessionAs),
        tool_button("Effacer la mémoire", Message::ResetSession),
    ]
    .spacing(4);

    let memo_info = match &app.session.memo {
        Some(m) => format!(
            "Moteur : {:.0} W, {} cyl., Ø{:.1} x {:.1} mm",
            m.power_w, m.cylinders, m.bore_mm, m.stroke_mm
        ),
        None => "Aucun moteur mémorisé".to_string(),
    };

    let mut back = button(text("◀ Retour").size(11))
        .padding(Padding::from([4, 8]))
        .style(button::secondary);
    if app.page() != Page::Home {
        back = back.on_press(Message::Back);
    }

    row![
        text("Assistant de CAO").size(22),
        Space::new().width(16),
        file_buttons,
        Space::new().width(Length::Fill),
        text(memo_info).size(11),
        Space::new().width(12),
        back,
        button(text("Accueil").size(11))
            .on_press(Message::Home)
            .padding(Padding::from([4, 8]))
            .style(button::primary),
    ]
    .spacing(4)
    .padding(Padding::from([4, 0]))
    .align_y(Alignment::Center)
    .into()
}
