//! Toolbar component
//!
//! File operations (Open, Save, Export Geometry) on the left, drawing
//! controls (Undo, Clear, Pause/Resume) on the right.

use iced::widget::{button, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use profile_core::input::DrawingState;

use crate::Message;

/// Render the application header with title
pub fn view_header(window_title: String) -> Element<'static, Message> {
    row![
        text("Bendline").size(28),
        Space::new().width(Length::Fill),
        text(window_title).size(14),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Render the toolbar.
///
/// Undo and Clear are only enabled while drawing is active; the toggle
/// button is labelled with the action it will perform.
pub fn view_toolbar(drawing: DrawingState, has_segments: bool) -> Element<'static, Message> {
    let file_buttons = row![
        button(text("Open").size(11))
            .on_press(Message::OpenProfile)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        button(text("Save").size(11))
            .on_press(Message::SaveProfile)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        button(text("Export Geometry").size(11))
            .on_press_maybe(has_segments.then_some(Message::ExportGeometry))
            .padding(Padding::from([4, 8]))
            .style(button::primary),
    ]
    .spacing(4);

    let controls_enabled = drawing.is_active();
    let toggle_label = if controls_enabled { "Pause" } else { "Resume" };

    let drawing_buttons = row![
        button(text("Undo").size(11))
            .on_press_maybe(controls_enabled.then_some(Message::Undo))
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        button(text("Clear").size(11))
            .on_press_maybe(controls_enabled.then_some(Message::Clear))
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        button(text(toggle_label).size(11))
            .on_press(Message::ToggleDrawing)
            .padding(Padding::from([4, 8]))
            .style(if controls_enabled { button::secondary } else { button::primary }),
    ]
    .spacing(4);

    row![
        file_buttons,
        Space::new().width(Length::Fill),
        drawing_buttons,
    ]
    .padding(Padding::from([4, 0]))
    .align_y(Alignment::Center)
    .into()
}
