//! Status Bar (Bottom)
//!
//! Displays:
//! - Current file path
//! - Modified indicator (*)
//! - Segment count and drawing state
//! - Status messages

use std::path::PathBuf;

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use profile_core::input::DrawingState;

use crate::Message;

/// Render the status bar
pub fn view_status_bar<'a>(
    current_file: &'a Option<PathBuf>,
    is_modified: bool,
    segment_count: usize,
    drawing: DrawingState,
    status: &'a str,
) -> Element<'a, Message> {
    let file_info = match current_file {
        Some(path) => path.display().to_string(),
        None => "Untitled".to_string(),
    };

    let modified_indicator = if is_modified { " *" } else { "" };

    let drawing_info = match drawing {
        DrawingState::Active => text(format!("  {} segment(s)", segment_count)).size(10),
        DrawingState::Paused => text(format!("  {} segment(s) [Paused]", segment_count))
            .size(10)
            .color([0.6, 0.3, 0.0]),
    };

    row![
        text(format!("{}{}", file_info, modified_indicator)).size(10),
        drawing_info,
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
