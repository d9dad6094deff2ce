//! # Bendline GUI Application
//!
//! Canvas front-end for the profile digitizer. Click (or tap) once to start a
//! chain, then each further click adds a segment snapped to the nearest
//! multiple of 45°. A dashed preview follows the pointer between clicks.
//!
//! Usage: `profile_gui [--config FILE] [PROFILE]`

mod ui;

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use iced::widget::{canvas, column, container, rule};
use iced::{Element, Length, Size};
use log::{error, info, warn};

use profile_core::config::DigitizerConfig;
use profile_core::document::{load_document, save_document, ProfileDocument};
use profile_core::export::{export, ExportOptions};
use profile_core::geometry::{Point, Segment};
use profile_core::input::{PointerEvent, PointerInputTracker};
use profile_core::render::{CanvasSize, DrawCommand, Renderer};
use profile_core::store::SegmentStore;

use ui::profile_canvas::ProfileCanvas;

#[derive(Parser, Debug)]
#[command(name = "profile_gui")]
#[command(version, about = "Sheet-metal profile digitizer")]
struct Args {
    /// TOML configuration file (render style, export tick layout)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Profile document to open at startup
    profile: Option<PathBuf>,
}

pub fn main() -> iced::Result {
    env_logger::init();

    let args = Args::parse();
    let config = match DigitizerConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using defaults", e);
            DigitizerConfig::default()
        }
    };

    iced::application(
        move || App::new(config.clone(), args.profile.clone()),
        App::update,
        App::view,
    )
    .title(App::title)
    .window_size(Size::new(1024.0, 720.0))
    .run()
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Pointer activity on the canvas, with the canvas' current placement
    Pointer {
        event: PointerEvent,
        origin: Point,
        size: CanvasSize,
    },
    CanvasResized(CanvasSize),
    Undo,
    Clear,
    ToggleDrawing,
    OpenProfile,
    SaveProfile,
    ExportGeometry,
}

/// Host-side copy of the profile, kept current by the store's observer.
struct HostMirror {
    document: ProfileDocument,
    modified: bool,
}

struct App {
    tracker: PointerInputTracker,
    renderer: Renderer,
    export_options: ExportOptions,
    /// Last frame produced by the renderer
    commands: Vec<DrawCommand>,
    mirror: Rc<RefCell<HostMirror>>,
    current_file: Option<PathBuf>,
    status: String,
}

impl App {
    fn new(config: DigitizerConfig, profile: Option<PathBuf>) -> Self {
        let mirror = Rc::new(RefCell::new(HostMirror {
            document: ProfileDocument::default(),
            modified: false,
        }));
        let sink = Rc::clone(&mirror);
        let store = SegmentStore::new().with_observer(move |segments: &[Segment]| {
            let mut mirror = sink.borrow_mut();
            mirror.document.set_segments(segments);
            mirror.modified = true;
        });

        let mut app = Self {
            tracker: PointerInputTracker::new(store),
            renderer: Renderer::new(config.render),
            export_options: config.export,
            commands: Vec::new(),
            mirror,
            current_file: None,
            status: "Click to start a profile".to_string(),
        };

        if let Some(path) = profile {
            app.open(&path);
        }
        app
    }

    fn title(&self) -> String {
        let name = match &self.current_file {
            Some(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            None => "Untitled".to_string(),
        };
        let modified = if self.mirror.borrow().modified { " *" } else { "" };
        format!("Bendline - {}{}", name, modified)
    }

    fn update(&mut self, message: Message) {
        match message {
            Message::Pointer {
                event,
                origin,
                size,
            } => {
                self.renderer.resize(size);
                self.tracker.set_canvas_origin(origin);
                if self.tracker.handle(event) {
                    self.renderer.invalidate();
                }
            }
            Message::CanvasResized(size) => {
                if size.is_drawable() {
                    self.renderer.resize(size);
                } else {
                    self.renderer.detach();
                }
            }
            Message::Undo => {
                if self.tracker.undo() {
                    self.renderer.invalidate();
                }
            }
            Message::Clear => {
                if self.tracker.clear() {
                    self.renderer.invalidate();
                    self.status = "Profile cleared".to_string();
                }
            }
            Message::ToggleDrawing => {
                let state = self.tracker.toggle();
                self.renderer.invalidate();
                self.status = if state.is_active() {
                    "Drawing resumed".to_string()
                } else {
                    "Drawing paused".to_string()
                };
            }
            Message::OpenProfile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Bendline Profile", &["json"])
                    .pick_file()
                {
                    self.open(&path);
                }
            }
            Message::SaveProfile => self.save(),
            Message::ExportGeometry => self.export_geometry(),
        }

        if let Some(commands) = self.renderer.frame(&self.tracker) {
            self.commands = commands;
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let mirror = self.mirror.borrow();

        let content = column![
            ui::toolbar::view_header(self.title()),
            ui::toolbar::view_toolbar(self.tracker.drawing_state(), !self.tracker.segments().is_empty()),
            rule::horizontal(1),
            canvas(ProfileCanvas::new(&self.commands))
                .width(Length::Fill)
                .height(Length::Fill),
            rule::horizontal(1),
            ui::status_bar::view_status_bar(
                &self.current_file,
                mirror.modified,
                self.tracker.segments().len(),
                self.tracker.drawing_state(),
                &self.status,
            ),
        ]
        .spacing(4);

        container(content).padding(10).into()
    }

    fn open(&mut self, path: &Path) {
        match load_document(path) {
            Ok(document) => {
                let segments = document.segments.clone();
                self.mirror.borrow_mut().document = document;
                // Goes through the store so the anchor follows the loaded chain
                self.tracker.load_from_host(&segments);
                self.mirror.borrow_mut().modified = false;
                self.renderer.invalidate();
                self.current_file = Some(path.to_path_buf());
                self.status = format!("Opened {} segment(s)", self.tracker.segments().len());
                info!("opened {}", path.display());
            }
            Err(e) => {
                error!("failed to open {}: {}", path.display(), e);
                self.status = format!("Open failed: {}", e);
            }
        }
    }

    fn save(&mut self) {
        let path = match &self.current_file {
            Some(path) => path.clone(),
            None => match rfd::FileDialog::new()
                .add_filter("Bendline Profile", &["json"])
                .set_file_name("profile.json")
                .save_file()
            {
                Some(path) => path,
                None => return,
            },
        };

        let mut mirror = self.mirror.borrow_mut();
        if !mirror.document.true_lengths_aligned() {
            warn!("true lengths no longer match the drawn segments; dropping them");
            mirror.document.set_true_lengths(None);
        }
        match save_document(&mirror.document, &path) {
            Ok(()) => {
                mirror.modified = false;
                self.current_file = Some(path);
                self.status = "Saved".to_string();
            }
            Err(e) => {
                error!("failed to save {}: {}", path.display(), e);
                self.status = format!("Save failed: {}", e);
            }
        }
    }

    fn export_geometry(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Geometry JSON", &["json"])
            .set_file_name("geometry.json")
            .save_file()
        else {
            return;
        };

        let mirror = self.mirror.borrow();
        let true_lengths = mirror
            .document
            .true_lengths
            .as_deref()
            .filter(|_| mirror.document.true_lengths_aligned());

        let result = export(self.tracker.segments(), true_lengths, &self.export_options)
            .map_err(anyhow::Error::from)
            .and_then(|model| Ok(serde_json::to_string_pretty(&model)?))
            .and_then(|json| Ok(fs::write(&path, json)?));

        self.status = match result {
            Ok(()) => {
                info!("exported geometry to {}", path.display());
                format!("Exported {}", path.display())
            }
            Err(e) => {
                error!("geometry export failed: {:#}", e);
                format!("Export failed: {}", e)
            }
        };
    }
}
