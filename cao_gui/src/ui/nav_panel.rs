//! Navigation Panel (Left Sidebar)
//!
//! Every page, grouped by domain. The Stirling detail pages sit under the
//! engine page; opening one from the engine page refreshes the memo.

use iced::widget::{button, column, container, rule, scrollable, text, Column};
use iced::{Element, Length, Padding};

use cao_core::pages::Page;

use super::shared::palette;
use crate::Message;

const PANEL_WIDTH: f32 = 190.0;

const SECTIONS: [(&str, &[Page]); 5] = [
    ("Général", &[Page::Home, Page::Settings]),
    ("RDM", &[Page::Rdm, Page::Materials]),
    ("Moteur Stirling", &[Page::Engine, Page::Sizing]),
    ("Transmission", &[Page::Gearbox, Page::IsoFit]),
    ("Drone", &[Page::DroneStructure, Page::DronePropulsion, Page::Mission]),
];

fn page_button(page: Page, current: Page, indent: f32) -> Element<'static, Message> {
    button(text(page.title()).size(11))
        .on_press(Message::ShowPage(page))
        .padding(Padding::from([4, 8]).left(8.0 + indent))
        .width(Length::Fill)
        .style(palette::page_button(page == current))
        .into()
}

/// Render the navigation panel
pub fn view_nav_panel(current: Page) -> Element<'static, Message> {
    let mut content: Column<'static, Message> = column![].spacing(3);

    for (title, pages) in SECTIONS {
        content = content.push(text(title).size(12).color(palette::PRIMARY));
        for &page in pages {
            content = content.push(page_button(page, current, 0.0));
            if page == Page::Engine {
                for detail in Page::STIRLING_DETAILS {
                    content = content.push(page_button(detail, current, 12.0));
                }
            }
        }
        content = content.push(rule::horizontal(1));
    }

    container(scrollable(content.padding(4)))
        .width(Length::Fixed(PANEL_WIDTH))
        .height(Length::Fill)
        .style(palette::card)
        .padding(5)
        .into()
}
