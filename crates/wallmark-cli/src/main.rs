use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wallmark_core::annotation::{AnnotationKind, WallAnnotation};
use wallmark_core::camera::Camera;
use wallmark_core::config::ViewerConfig;
use wallmark_core::geom::Vec2;
use wallmark_core::report::{AnnotationStats, WallHitReport};
use wallmark_core::room::{Room, WallId};
use wallmark_store::{AnnotationRepository, JsonFileStore, PersistenceWorker};
use wallmark_view::{replay, CameraMatrices, GestureScript, InteractionController, Viewport, WallPicker};

const DEFAULT_STORE: &str = "wallmark-annotations.json";

#[derive(Debug, Parser)]
#[command(name = "wallmark")]
#[command(about = "Pick room walls and manage wall annotations.")]
struct Cli {
    /// Viewer config (JSON). Missing fields use defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Annotation store file.
    #[arg(long, global = true, default_value = DEFAULT_STORE)]
    store: PathBuf,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Args)]
struct CameraArgs {
    #[arg(long, default_value_t = 800.0)]
    width: f32,
    #[arg(long, default_value_t = 600.0)]
    height: f32,
    #[arg(long, allow_negative_numbers = true)]
    pitch: Option<f32>,
    #[arg(long, allow_negative_numbers = true)]
    yaw: Option<f32>,
    #[arg(long)]
    zoom: Option<f32>,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_x: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_y: f32,
}

#[derive(Debug, Args)]
struct CornerArgs {
    #[arg(long)]
    x1: Option<f32>,
    #[arg(long)]
    y1: Option<f32>,
    #[arg(long)]
    x2: Option<f32>,
    #[arg(long)]
    y2: Option<f32>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report which wall lies under a screen point.
    Pick {
        x: f32,
        y: f32,
        #[command(flatten)]
        camera: CameraArgs,
        /// Skip walls seen from outside the room.
        #[arg(long)]
        cull: bool,
    },
    /// Store a rectangle given in wall-local coordinates.
    Annotate {
        #[arg(long)]
        wall: u8,
        #[arg(long)]
        x1: f32,
        #[arg(long)]
        y1: f32,
        #[arg(long)]
        x2: f32,
        #[arg(long)]
        y2: f32,
        #[arg(long, default_value = "spray")]
        kind: AnnotationKind,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        room: Option<u64>,
    },
    List {
        /// Only rows of this room; defaults to every room.
        #[arg(long)]
        room: Option<u64>,
    },
    Update {
        id: u64,
        #[arg(long)]
        kind: Option<AnnotationKind>,
        #[arg(long)]
        notes: Option<String>,
        #[command(flatten)]
        corners: CornerArgs,
    },
    Delete {
        id: u64,
    },
    /// Feed a recorded gesture script through the interaction controller.
    Replay {
        script: PathBuf,
        /// Write the completed annotations to the store.
        #[arg(long)]
        persist: bool,
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
struct ListReport {
    annotations: Vec<WallAnnotation>,
    stats: AnnotationStats,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Pick { x, y, camera, cull } => pick(&config, Vec2::new(x, y), &camera, cull),
        Command::Annotate {
            wall,
            x1,
            y1,
            x2,
            y2,
            kind,
            notes,
            room,
        } => {
            let wall = WallId::from_index(wall)?;
            let annotation = WallAnnotation::from_corners(wall, Vec2::new(x1, y1), Vec2::new(x2, y2), kind)
                .with_room(room.unwrap_or(config.room_id))
                .with_notes(notes.unwrap_or_default());
            annotate(&cli.store, annotation)
        }
        Command::List { room } => list(&cli.store, room),
        Command::Update {
            id,
            kind,
            notes,
            corners,
        } => update(&cli.store, id, kind, notes, &corners),
        Command::Delete { id } => delete(&cli.store, id),
        Command::Replay {
            script,
            persist,
            report,
        } => replay_script(&config, &cli.store, &script, persist, report.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    match path {
        Some(path) => {
            ensure_input_file(path)?;
            ViewerConfig::load(path).with_context(|| format!("load config: {path:?}"))
        }
        None => Ok(ViewerConfig::default()),
    }
}

fn pick(config: &ViewerConfig, screen: Vec2, args: &CameraArgs, cull: bool) -> Result<()> {
    let mut camera = Camera::new(config.camera.clone());
    let state = camera.state();
    camera.set_rotation(args.pitch.unwrap_or(state.pitch), args.yaw.unwrap_or(state.yaw));
    camera.set_zoom(args.zoom.unwrap_or(state.zoom));
    camera.set_pan(args.pan_x, args.pan_y);

    let viewport = Viewport::new(args.width, args.height);
    let Some(matrices) = CameraMatrices::from_camera(&camera, viewport) else {
        bail!("viewport must be non-empty, got {}x{}", args.width, args.height);
    };

    let mut pick_cfg = config.pick.clone();
    if cull {
        pick_cfg.cull_back_faces = true;
    }
    let picker = WallPicker::new(Room::new(config.room)?, pick_cfg);
    let hit: Option<WallHitReport> = picker.pick_screen(screen, &matrices).map(|h| h.report());
    if hit.is_none() {
        info!(x = screen.x, y = screen.y, "no wall under point");
    }
    print_json(&hit)
}

fn open_repository(store: &Path) -> Result<AnnotationRepository<JsonFileStore>> {
    let store = JsonFileStore::open(store).with_context(|| format!("open store: {store:?}"))?;
    Ok(AnnotationRepository::new(store))
}

fn annotate(store: &Path, annotation: WallAnnotation) -> Result<()> {
    let mut repo = open_repository(store)?;
    let stored = repo.add_annotation(annotation).context("store annotation")?;
    print_json(&stored)
}

fn list(store: &Path, room: Option<u64>) -> Result<()> {
    let repo = open_repository(store)?;
    let annotations = match room {
        Some(room) => repo.annotations_for_room(room)?,
        None => repo.all_annotations()?,
    };
    let stats = AnnotationStats::collect(&annotations);
    print_json(&ListReport { annotations, stats })
}

fn update(
    store: &Path,
    id: u64,
    kind: Option<AnnotationKind>,
    notes: Option<String>,
    corners: &CornerArgs,
) -> Result<()> {
    let mut repo = open_repository(store)?;
    let Some(mut row) = repo.annotation(id)? else {
        bail!("no annotation with id {id} in {store:?}");
    };
    if let Some(kind) = kind {
        row.kind = kind;
    }
    if let Some(notes) = notes {
        row = row.with_notes(notes);
    }
    row.x1 = corners.x1.unwrap_or(row.x1);
    row.y1 = corners.y1.unwrap_or(row.y1);
    row.x2 = corners.x2.unwrap_or(row.x2);
    row.y2 = corners.y2.unwrap_or(row.y2);
    repo.update_annotation(&row).with_context(|| format!("update annotation {id}"))?;
    let stored = repo.annotation(id)?;
    print_json(&stored)
}

fn delete(store: &Path, id: u64) -> Result<()> {
    let mut repo = open_repository(store)?;
    repo.delete_annotation(id).with_context(|| format!("delete annotation {id}"))?;
    Ok(())
}

fn replay_script(
    config: &ViewerConfig,
    store: &Path,
    script_path: &Path,
    persist: bool,
    report: Option<&Path>,
) -> Result<()> {
    ensure_input_file(script_path)?;
    let text = std::fs::read_to_string(script_path).with_context(|| format!("read script: {script_path:?}"))?;
    let script: GestureScript =
        serde_json::from_str(&text).with_context(|| format!("parse script: {script_path:?}"))?;

    let mut controller = InteractionController::new(config)?;
    let session = replay(&mut controller, &script);
    debug!(steps = script.steps.len(), annotations = session.annotations.len(), "replay finished");

    if persist {
        let worker = PersistenceWorker::spawn(open_repository(store)?)?;
        for (ticket, annotation) in session.annotations.iter().enumerate() {
            worker.insert(ticket as u64, annotation.clone());
        }
        // Dropping the worker drains the queue.
    }

    let json = serde_json::to_string_pretty(&session).context("serialize session")?;
    if let Some(path) = report {
        write_file(path, &json).with_context(|| format!("write report: {path:?}"))?;
    } else {
        println!("{json}");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    std::fs::write(path, contents)
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}
