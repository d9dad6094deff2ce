//! Digitizer canvas
//!
//! Bridges iced and the digitizer core in both directions: mouse and touch
//! events become [`PointerEvent`]s (in window coordinates, with the canvas
//! origin attached), and the core's [`DrawCommand`]s are painted onto an
//! iced [`Frame`].

use iced::widget::canvas::{self, Frame, Geometry, LineDash, Path, Stroke, Text};
use iced::{mouse, touch, Color, Rectangle, Renderer, Size, Theme};

use profile_core::geometry::Point;
use profile_core::input::{ContactId, PointerEvent, PointerPhase};
use profile_core::render::{CanvasSize, DrawCommand, DrawSurface, Rgba};

use crate::Message;

pub fn to_core_point(p: iced::Point) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

pub fn to_iced_point(p: Point) -> iced::Point {
    iced::Point::new(p.x as f32, p.y as f32)
}

pub fn to_canvas_size(size: Size) -> CanvasSize {
    CanvasSize::new(size.width as f64, size.height as f64)
}

fn to_color(color: Rgba) -> Color {
    Color::from_rgba(color.r, color.g, color.b, color.a)
}

/// Executes draw commands on an iced frame.
pub struct FrameSurface<'a> {
    frame: &'a mut Frame,
}

impl<'a> FrameSurface<'a> {
    pub fn new(frame: &'a mut Frame) -> Self {
        Self { frame }
    }
}

impl DrawSurface for FrameSurface<'_> {
    fn execute(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            match command {
                DrawCommand::Clear { size, color } => {
                    self.frame.fill_rectangle(
                        iced::Point::ORIGIN,
                        Size::new(size.width as f32, size.height as f32),
                        to_color(*color),
                    );
                }
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    width,
                    dash,
                } => {
                    let line = Path::line(to_iced_point(*from), to_iced_point(*to));
                    let stroke = Stroke {
                        line_dash: LineDash {
                            segments: dash,
                            offset: 0,
                        },
                        ..Stroke::default().with_color(to_color(*color)).with_width(*width)
                    };
                    self.frame.stroke(&line, stroke);
                }
                DrawCommand::Label {
                    position,
                    text,
                    color,
                    size,
                } => {
                    self.frame.fill_text(Text {
                        content: text.clone(),
                        position: to_iced_point(*position),
                        color: to_color(*color),
                        size: iced::Pixels(*size),
                        align_x: iced::alignment::Horizontal::Center.into(),
                        align_y: iced::alignment::Vertical::Center.into(),
                        ..Text::default()
                    });
                }
                DrawCommand::Marker {
                    center,
                    radius,
                    color,
                } => {
                    let marker = Path::circle(to_iced_point(*center), *radius);
                    self.frame.fill(&marker, to_color(*color));
                }
            }
        }
    }
}

/// Per-widget interaction state kept by iced between events.
#[derive(Debug, Default)]
pub struct CanvasState {
    last_size: Option<Size>,
    hovering: bool,
}

/// Canvas program showing the current frame of the digitizer.
pub struct ProfileCanvas<'a> {
    commands: &'a [DrawCommand],
}

impl<'a> ProfileCanvas<'a> {
    pub fn new(commands: &'a [DrawCommand]) -> Self {
        Self { commands }
    }

    /// Translate an iced event into a pointer event, tracking hover so that
    /// leaving the canvas produces exactly one `Leave`.
    fn pointer_event(
        state: &mut CanvasState,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<PointerEvent> {
        match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => cursor
                .position_over(bounds)
                .map(|p| PointerEvent::mouse_down(to_core_point(p))),
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => cursor
                .position_over(bounds)
                .map(|p| PointerEvent::mouse_up(to_core_point(p))),
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                if bounds.contains(*position) {
                    state.hovering = true;
                    Some(PointerEvent::mouse_move(to_core_point(*position)))
                } else if state.hovering {
                    state.hovering = false;
                    Some(leave_event(*position))
                } else {
                    None
                }
            }
            canvas::Event::Mouse(mouse::Event::CursorLeft) if state.hovering => {
                state.hovering = false;
                Some(leave_event(bounds.position()))
            }
            canvas::Event::Touch(touch::Event::FingerPressed { id, position })
                if bounds.contains(*position) =>
            {
                Some(PointerEvent::touch(PointerPhase::Down, id.0, to_core_point(*position)))
            }
            canvas::Event::Touch(touch::Event::FingerMoved { id, position }) => {
                Some(PointerEvent::touch(PointerPhase::Move, id.0, to_core_point(*position)))
            }
            canvas::Event::Touch(touch::Event::FingerLifted { id, position }) => {
                Some(PointerEvent::touch(PointerPhase::Up, id.0, to_core_point(*position)))
            }
            canvas::Event::Touch(touch::Event::FingerLost { id, position }) => {
                Some(PointerEvent::touch(PointerPhase::Leave, id.0, to_core_point(*position)))
            }
            _ => None,
        }
    }
}

fn leave_event(position: iced::Point) -> PointerEvent {
    PointerEvent::new(PointerPhase::Leave, to_core_point(position), ContactId::Mouse)
}

impl canvas::Program<Message> for ProfileCanvas<'_> {
    type State = CanvasState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let size = bounds.size();

        if let Some(pointer) = Self::pointer_event(state, event, bounds, cursor) {
            state.last_size = Some(size);
            let message = Message::Pointer {
                event: pointer,
                origin: to_core_point(bounds.position()),
                size: to_canvas_size(size),
            };
            return Some(canvas::Action::publish(message).and_capture());
        }

        // Any other event (redraws, window resizes) is a chance to notice
        // that the layout gave us a new size.
        if state.last_size != Some(size) {
            state.last_size = Some(size);
            return Some(canvas::Action::publish(Message::CanvasResized(to_canvas_size(size))));
        }

        None
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        FrameSurface::new(&mut frame).execute(self.commands);
        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
