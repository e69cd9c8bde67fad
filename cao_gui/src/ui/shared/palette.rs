//! Window colours and widget styles.

use iced::widget::{button, container};
use iced::{Border, Color, Theme};

pub const BACKGROUND: Color = Color::from_rgb8(0xF4, 0xFE, 0xFE);
pub const PRIMARY: Color = Color::from_rgb8(0x05, 0x14, 0x40);
pub const BUTTON: Color = Color::from_rgb8(0x30, 0x30, 0x30);
pub const HOVER: Color = Color::from_rgb8(0x3E, 0x53, 0x49);
pub const BORDER: Color = Color::from_rgb8(0xD9, 0xD9, 0xD9);
pub const ERROR: Color = Color::from_rgb8(0xEC, 0x19, 0x20);
pub const MUTED: Color = Color::from_rgb(0.45, 0.45, 0.45);

/// Whole-window background.
pub fn background(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(BACKGROUND.into()),
        text_color: Some(PRIMARY),
        ..container::Style::default()
    }
}

/// White card with a light border, used for panels and catalogue cards.
pub fn card(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Color::WHITE.into()),
        border: Border {
            color: BORDER,
            width: 1.0,
            radius: 4.0.into(),
        },
        ..container::Style::default()
    }
}

/// Dark page button; the current page is drawn in the primary colour.
pub fn page_button(selected: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |_theme, status| {
        let background = match status {
            _ if selected => PRIMARY,
            button::Status::Hovered | button::Status::Pressed => HOVER,
            button::Status::Disabled => BORDER,
            button::Status::Active => BUTTON,
        };
        button::Style {
            background: Some(background.into()),
            text_color: Color::WHITE,
            border: Border {
                color: BORDER,
                width: 0.0,
                radius: 3.0.into(),
            },
            ..button::Style::default()
        }
    }
}
