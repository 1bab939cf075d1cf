use anyhow::{Context, Result};
use eframe::egui;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use wallmark_core::annotation::{AnnotationKind, WallAnnotation};
use wallmark_core::camera::InteractionMode;
use wallmark_core::config::ViewerConfig;
use wallmark_core::geom::{Vec2, Vec3};
use wallmark_core::room::{Room, WallId};
use wallmark_core::surface::{ChainedSurface, SurfaceCallback};
use wallmark_store::worker::Ticket;
use wallmark_store::{AnnotationRepository, AnnotationStore, JsonFileStore, LocalRows, PersistenceWorker, RowState};
use wallmark_view::{CameraMatrices, FrameSnapshot, Gesture, InteractionController, InteractionEvent, WallSelection};

const DEFAULT_STORE: &str = "wallmark-annotations.json";
/// Pointer travel (points) that turns a press into a drag.
const LONG_PRESS_SLOP: f32 = 6.0;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match ViewerConfig::load(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(error = %err, "falling back to default config");
                ViewerConfig::default()
            }
        },
        None => ViewerConfig::default(),
    };

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "wallmark",
        native_options,
        Box::new(move |cc| Ok(Box::new(WallmarkApp::new(cc, config)?))),
    )
}

/// Surface delegate that only traces lifecycle changes.
struct TraceSurface;

impl SurfaceCallback for TraceSurface {
    fn surface_created(&mut self) {
        debug!("room surface created");
    }

    fn surface_changed(&mut self, width: u32, height: u32) {
        debug!(width, height, "room surface changed");
    }
}

#[derive(Default)]
struct PointerTracker {
    down_at: Option<(egui::Pos2, f64)>,
    moved: bool,
    long_press_fired: bool,
    pinching: bool,
}

struct WallmarkApp {
    surface: ChainedSurface<InteractionController, TraceSurface>,
    config: ViewerConfig,
    rows: LocalRows,
    worker: Option<PersistenceWorker>,
    store_path: PathBuf,
    next_ticket: Ticket,
    pointer: PointerTracker,
    status: String,
}

impl WallmarkApp {
    fn new(_cc: &eframe::CreationContext<'_>, mut config: ViewerConfig) -> wallmark_core::Result<Self> {
        // Walls seen from outside are not drawn, so they must not be picked either.
        config.pick.cull_back_faces = true;
        let controller = InteractionController::new(&config)?;
        let mut surface = ChainedSurface::new(controller, Some(TraceSurface));
        surface.surface_created();

        let mut app = Self {
            surface,
            config,
            rows: LocalRows::new(),
            worker: None,
            store_path: PathBuf::from(DEFAULT_STORE),
            next_ticket: 1,
            pointer: PointerTracker::default(),
            status: "Long-press toggles rotate/pan. Double-click resets the camera.".to_string(),
        };
        let path = app.store_path.clone();
        app.open_store(&path);
        Ok(app)
    }

    fn controller(&self) -> &InteractionController {
        self.surface.inner()
    }

    fn controller_mut(&mut self) -> &mut InteractionController {
        self.surface.inner_mut()
    }

    fn pick_store(&mut self) {
        let file = rfd::FileDialog::new()
            .add_filter("Annotation store", &["json"])
            .set_file_name(DEFAULT_STORE)
            .save_file();
        if let Some(path) = file {
            self.open_store(&path);
        }
    }

    fn open_store(&mut self, path: &Path) {
        // Let the old writer drain before switching files.
        self.worker = None;
        self.controller_mut().set_loading(true);
        match load_store(path, self.config.room_id) {
            Ok((rows, worker)) => {
                self.rows = LocalRows::from_stored(rows);
                self.worker = Some(worker);
                self.store_path = path.to_path_buf();
                self.status = format!("Store: {} ({} annotations)", path.display(), self.rows.len());
            }
            Err(e) => {
                self.status = format!("Failed to open {}: {e:#}", path.display());
            }
        }
        self.controller_mut().set_loading(false);
    }

    fn poll_worker(&mut self) {
        let Some(worker) = &self.worker else {
            return;
        };
        while let Some(outcome) = worker.try_recv_outcome() {
            self.rows.apply(&outcome);
        }
    }

    fn apply_events(&mut self, events: Vec<InteractionEvent>) {
        for event in events {
            match event {
                InteractionEvent::ModeChanged(mode) => self.status = mode.label().to_string(),
                InteractionEvent::EditModeChanged(on) => {
                    self.status = if on { "Edit mode: drag on a wall" } else { "Edit mode off" }.to_string();
                }
                InteractionEvent::CameraReset => self.status = "Camera reset".to_string(),
                InteractionEvent::SelectionMissed => self.status = "No wall under pointer".to_string(),
                InteractionEvent::AnnotationCompleted(annotation) => self.persist(annotation),
                InteractionEvent::CameraChanged
                | InteractionEvent::SelectionStarted(_)
                | InteractionEvent::SelectionCancelled => {}
            }
        }
    }

    fn persist(&mut self, annotation: WallAnnotation) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.status = format!("{} added on the {} wall", annotation.kind.label(), annotation.wall.name());
        let queued = self
            .worker
            .as_ref()
            .is_some_and(|worker| worker.insert(ticket, annotation.clone()));
        if queued {
            self.rows.push_pending(ticket, annotation);
        } else {
            self.rows.push_unsaved(annotation);
        }
    }

    /// Rows without an id only exist locally.
    fn delete_row(&mut self, index: usize) {
        let Some(row) = self.rows.remove(index) else {
            return;
        };
        if let (Some(id), Some(worker)) = (row.annotation.id, &self.worker) {
            worker.delete(id);
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, rect: egui::Rect, response: &egui::Response) {
        let local = |p: egui::Pos2| p - rect.min;
        let (pressed, released, latest, now, zoom_delta, scroll, escape) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
                i.time,
                i.zoom_delta(),
                i.smooth_scroll_delta.y,
                i.key_pressed(egui::Key::Escape),
            )
        });
        let mut events = Vec::new();

        if response.double_clicked() {
            events.extend(self.controller_mut().handle(Gesture::DoubleTap));
        }

        if pressed && response.hovered() {
            if let Some(p) = latest {
                let v = local(p);
                self.pointer.down_at = Some((p, now));
                self.pointer.moved = false;
                self.pointer.long_press_fired = false;
                events.extend(self.controller_mut().handle(Gesture::Down { x: v.x, y: v.y }));
            }
        }

        if let Some((start, t0)) = self.pointer.down_at {
            if let Some(p) = latest {
                if !self.pointer.moved && p.distance(start) > LONG_PRESS_SLOP {
                    self.pointer.moved = true;
                }
                if response.dragged() {
                    let v = local(p);
                    events.extend(self.controller_mut().handle(Gesture::Move { x: v.x, y: v.y }));
                }
            }
            let held_ms = (now - t0) * 1000.0;
            let long_enough = held_ms >= self.config.gesture.long_press_ms as f64;
            if !self.pointer.moved && !self.pointer.long_press_fired && long_enough {
                self.pointer.long_press_fired = true;
                events.extend(self.controller_mut().handle(Gesture::LongPress));
            }
            if released {
                let v = local(latest.unwrap_or(start));
                self.pointer.down_at = None;
                events.extend(self.controller_mut().handle(Gesture::Up { x: v.x, y: v.y }));
            }
        }
        if response.long_touched() && !self.pointer.long_press_fired {
            self.pointer.long_press_fired = true;
            events.extend(self.controller_mut().handle(Gesture::LongPress));
        }

        let mut scale = zoom_delta;
        if response.hovered() && scroll.abs() > 0.0 {
            scale *= (scroll / 200.0).exp();
        }
        if (scale - 1.0).abs() > f32::EPSILON {
            if !self.pointer.pinching {
                self.pointer.pinching = true;
                events.extend(self.controller_mut().handle(Gesture::PinchBegin));
            }
            events.extend(self.controller_mut().handle(Gesture::Pinch { scale }));
        } else if self.pointer.pinching {
            self.pointer.pinching = false;
            events.extend(self.controller_mut().handle(Gesture::PinchEnd));
        }

        if escape {
            self.pointer.down_at = None;
            events.extend(self.controller_mut().handle(Gesture::Cancel));
        }

        self.apply_events(events);
    }

    fn draw_side_panel(&mut self, ui: &mut egui::Ui) {
        let state = self.controller().state();

        let mut edit = state.edit_mode;
        if ui.checkbox(&mut edit, "Edit mode").changed() {
            let events: Vec<_> = self.controller_mut().set_edit_mode(edit).into_iter().collect();
            self.apply_events(events);
        }

        let mut kind = state.selected_kind;
        egui::ComboBox::from_label("Kind")
            .selected_text(kind.label())
            .show_ui(ui, |ui| {
                for k in AnnotationKind::ALL {
                    ui.selectable_value(&mut kind, k, k.label());
                }
            });
        if kind != state.selected_kind {
            self.controller_mut().set_selected_kind(kind);
        }

        ui.add_enabled_ui(!state.edit_mode, |ui| {
            ui.horizontal(|ui| {
                for mode in [InteractionMode::Rotation, InteractionMode::Pan] {
                    if ui.selectable_label(state.mode == mode, mode.label()).clicked() {
                        let events: Vec<_> = self.controller_mut().set_mode(mode).into_iter().collect();
                        self.apply_events(events);
                    }
                }
            });
            if ui.button("Reset camera").clicked() && self.controller_mut().reset_camera() {
                self.status = "Camera reset".to_string();
            }
        });

        let cam = self.controller().camera().state();
        ui.label(format!(
            "pitch {:.1}°  yaw {:.1}°  zoom {:.2}  pan ({:.2}, {:.2})",
            cam.pitch, cam.yaw, cam.zoom, cam.pan_x, cam.pan_y
        ));

        ui.separator();
        ui.heading("Annotations");
        let mut delete = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, row) in self.rows.rows().iter().enumerate() {
                let a = &row.annotation;
                ui.horizontal(|ui| {
                    ui.colored_label(kind_color(a.kind, 255), "■");
                    ui.label(format!(
                        "{} · {} [{:.2},{:.2}]–[{:.2},{:.2}]",
                        a.kind.label(),
                        a.wall.name(),
                        a.x1,
                        a.y1,
                        a.x2,
                        a.y2
                    ));
                    let hover = match (row.state, a.id) {
                        (RowState::Pending(_), _) => {
                            ui.spinner();
                            "saving".to_string()
                        }
                        (RowState::Unsaved, _) => "not saved".to_string(),
                        (RowState::Stored, Some(id)) => format!("id {id}"),
                        (RowState::Stored, None) => String::new(),
                    };
                    if ui.small_button("Delete").on_hover_text(hover).clicked() {
                        delete = Some(index);
                    }
                });
                if let Some(notes) = &a.notes {
                    ui.label(egui::RichText::new(notes).italics());
                }
            }
        });
        if let Some(index) = delete {
            self.delete_row(index);
        }

        ui.separator();
        let annotations = self.rows.annotations();
        if let Ok(json) = serde_json::to_string_pretty(&annotations) {
            if ui.button("Copy JSON").clicked() {
                ui.ctx().copy_text(json.clone());
            }
            ui.collapsing("Raw annotations", |ui| {
                ui.monospace(json);
            });
        }
    }
}

fn load_store(path: &Path, room_id: u64) -> Result<(Vec<WallAnnotation>, PersistenceWorker)> {
    let store = JsonFileStore::open(path).with_context(|| format!("open store: {path:?}"))?;
    let rows = store.list_for_room(room_id)?;
    let worker = PersistenceWorker::spawn(AnnotationRepository::new(store)).context("start writer")?;
    Ok((rows, worker))
}

impl eframe::App for WallmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        let pending = self.rows.has_pending();
        self.controller_mut().set_loading(pending);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Store…").clicked() {
                    self.pick_store();
                }
                if ui.button("Open folder").clicked() {
                    let dir = self
                        .store_path
                        .parent()
                        .filter(|p| !p.as_os_str().is_empty())
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from("."));
                    let _ = open::that(dir);
                }
                ui.separator();
                ui.monospace(self.store_path.display().to_string());
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.controller().state().loading {
                    ui.spinner();
                }
                ui.label(&self.status);
            });
        });

        egui::SidePanel::right("controls").min_width(260.0).show(ctx, |ui| {
            self.draw_side_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            self.surface.resize(rect.width().round() as u32, rect.height().round() as u32);
            self.handle_input(ui, rect, &response);

            let annotations = self.rows.annotations();
            let frame = self.controller().snapshot(&annotations);
            let painter = ui.painter_at(rect);
            draw_room(&painter, rect, self.controller().room(), &frame, self.config.pick.cull_back_faces);
        });

        if self.pointer.down_at.is_some() {
            ctx.request_repaint();
        } else if pending {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

impl Drop for WallmarkApp {
    fn drop(&mut self) {
        self.surface.surface_destroyed();
    }
}

fn kind_color(kind: AnnotationKind, alpha: u8) -> egui::Color32 {
    let [r, g, b, _] = kind.rgba();
    egui::Color32::from_rgba_unmultiplied((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8, alpha)
}

fn wall_fill(id: WallId) -> egui::Color32 {
    match id {
        WallId::Floor => egui::Color32::from_gray(200),
        WallId::Left | WallId::Right => egui::Color32::from_gray(170),
        WallId::Front | WallId::Back => egui::Color32::from_gray(185),
    }
}

fn to_screen(rect: egui::Rect, m: &CameraMatrices, world: Vec3) -> Option<egui::Pos2> {
    let p = m.project(world)?;
    Some(rect.min + egui::vec2(p.x, p.y))
}

fn wall_quad(rect: egui::Rect, m: &CameraMatrices, room: &Room, id: WallId, a: Vec2, b: Vec2) -> Option<Vec<egui::Pos2>> {
    [
        Vec2::new(a.x, a.y),
        Vec2::new(b.x, a.y),
        Vec2::new(b.x, b.y),
        Vec2::new(a.x, b.y),
    ]
    .into_iter()
    .map(|uv| to_screen(rect, m, room.wall_to_world(id, uv)))
    .collect()
}

fn draw_room(painter: &egui::Painter, rect: egui::Rect, room: &Room, frame: &FrameSnapshot, cull: bool) {
    painter.rect_filled(rect, egui::CornerRadius::same(0), egui::Color32::from_gray(40));
    let Some(m) = frame.matrices else {
        return;
    };
    let eye = m.eye();

    let mut walls: Vec<_> = room
        .walls()
        .iter()
        .filter(|w| match (cull, eye) {
            (true, Some(eye)) => w.inward_normal().dot(eye.sub(w.center())) > 0.0,
            _ => true,
        })
        .collect();
    // Painter's algorithm: far walls first.
    walls.sort_by(|a, b| m.view_depth(b.center()).total_cmp(&m.view_depth(a.center())));

    let edge = egui::Stroke::new(1.0, egui::Color32::from_gray(90));
    for wall in &walls {
        let Some(quad) = wall_quad(rect, &m, room, wall.id, Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)) else {
            continue;
        };
        painter.add(egui::Shape::convex_polygon(quad, wall_fill(wall.id), edge));

        for a in frame.annotations.iter().filter(|a| a.wall == wall.id) {
            if let Some(quad) = wall_quad(rect, &m, room, wall.id, Vec2::new(a.x1, a.y1), Vec2::new(a.x2, a.y2)) {
                painter.add(egui::Shape::convex_polygon(quad, kind_color(a.kind, 178), egui::Stroke::NONE));
            }
        }
        if let Some(sel) = frame.selection.filter(|s| s.wall == wall.id) {
            draw_selection(painter, rect, &m, room, &sel, frame.state.selected_kind);
        }
    }

    let badge = if frame.state.edit_mode {
        format!("Edit · {}", frame.state.selected_kind.label())
    } else {
        frame.state.mode.label().to_string()
    };
    painter.text(
        rect.min + egui::vec2(8.0, 8.0),
        egui::Align2::LEFT_TOP,
        badge,
        egui::FontId::proportional(14.0),
        egui::Color32::WHITE,
    );
}

fn draw_selection(
    painter: &egui::Painter,
    rect: egui::Rect,
    m: &CameraMatrices,
    room: &Room,
    sel: &WallSelection,
    kind: AnnotationKind,
) {
    let r = sel.rect();
    if let Some(quad) = wall_quad(rect, m, room, sel.wall, r.min, r.max) {
        painter.add(egui::Shape::convex_polygon(
            quad,
            kind_color(kind, 90),
            egui::Stroke::new(2.0, egui::Color32::YELLOW),
        ));
    }
}
