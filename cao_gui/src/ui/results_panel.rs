//! Results Panel (Right Side)
//!
//! Shows, for the last calculation of the current page:
//! - `Erreur : ...` in place of everything else when it failed
//! - notices (auto-completed or corrected inputs)
//! - the plan text
//! - the schematic canvas, with SVG and CSV export buttons

use iced::widget::{button, column, container, row, scrollable, text, Canvas, Column, Space};
use iced::{Element, Length, Padding};

use super::shared::palette;
use super::shared::schematic::SchematicView;
use crate::{App, Message};

/// Render the results panel
pub fn view_results_panel(app: &App) -> Element<'_, Message> {
    let content: Column<'_, Message> = if let Some(error) = &app.error_message {
        column![text(error).size(13).color(palette::ERROR)]
    } else if let Some(output) = &app.output {
        let mut content = column![].spacing(6);

        for notice in output.notices() {
            content = content.push(text(format!("⚠ {}", notice)).size(11).color(palette::ERROR));
        }
        content = content.push(text(output.plan()).size(11).font(iced::Font::MONOSPACE));

        let schematic = output.schematic();
        let curve = output.curve();
        let mut exports = row![].spacing(6);
        if schematic.is_some() {
            exports = exports.push(
                button(text("Exporter SVG").size(11))
                    .on_press(Message::ExportSvg)
                    .padding(Padding::from([4, 8]))
                    .style(button::secondary),
            );
        }
        if curve.is_some() {
            exports = exports.push(
                button(text("Exporter CSV").size(11))
                    .on_press(Message::ExportCsv)
                    .padding(Padding::from([4, 8]))
                    .style(button::secondary),
            );
        }
        content = content.push(exports);

        if let Some(schematic) = schematic {
            let canvas: Element<'_, Message> = Canvas::new(SchematicView::new(schematic))
                .width(Length::Fill)
                .height(Length::Fixed(360.0))
                .into();
            content = content.push(Space::new().height(4)).push(canvas);
        }
        content
    } else if app.page().is_calculator() {
        column![text("Renseignez le formulaire puis cliquez sur Calculer").size(12).color(palette::MUTED)]
    } else {
        column![]
    };

    container(scrollable(content.padding(8)))
        .width(Length::FillPortion(55))
        .height(Length::Fill)
        .style(palette::card)
        .padding(5)
        .into()
}
