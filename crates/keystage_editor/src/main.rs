// SPDX-License-Identifier: MIT OR Apache-2.0
//! `keystage` - headless tools for Keystage animation documents.
//!
//! - `demo` writes a small sample document
//! - `sample` prints every object's resolved state at one instant
//! - `bake` prints one JSON frame per tick over the whole timeline

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use egui::Pos2;
use keystage_editor::{EditorSession, EditorSettings, Frame, Modifiers, SETTINGS_FILE_NAME};
use keystage_timeline::{Easing, KeyframePatch, ShapeKind, TimelineDocument};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Headless tools for Keystage animation documents
#[derive(Parser, Debug)]
#[command(name = "keystage")]
#[command(about = "Headless tools for Keystage animation documents")]
#[command(version)]
struct Args {
    /// Editor settings file (RON)
    #[arg(short, long, global = true, default_value = SETTINGS_FILE_NAME)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a demo document
    Demo {
        /// Output JSON file
        out: PathBuf,
    },
    /// Print every object's state at one instant
    Sample {
        /// Document to read
        document: PathBuf,
        /// Time in seconds
        #[arg(short, long)]
        time: f32,
    },
    /// Print one JSON frame per tick over the whole timeline
    Bake {
        /// Document to read
        document: PathBuf,
        /// Frames per second
        #[arg(long, default_value = "30")]
        fps: f32,
    },
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("keystage_editor=info,keystage_timeline=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let settings = EditorSettings::load_or_default(&args.settings)
        .with_context(|| format!("Failed to load settings from {}", args.settings.display()))?;

    match args.command {
        Command::Demo { out } => demo(settings, &out),
        Command::Sample { document, time } => sample(settings, &document, time),
        Command::Bake { document, fps } => bake(settings, &document, fps),
    }
}

fn load_session(settings: EditorSettings, path: &Path) -> Result<EditorSession> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let document = TimelineDocument::from_json(&json).with_context(|| format!("Invalid document {}", path.display()))?;

    let mut session = EditorSession::new(settings);
    session
        .load_document(document)
        .with_context(|| format!("Invalid document {}", path.display()))?;
    Ok(session)
}

fn demo(settings: EditorSettings, out: &Path) -> Result<()> {
    let mut session = EditorSession::new(settings);

    // A circle sliding right over two seconds
    let circle = session.create_object(ShapeKind::Circle, Pos2::new(100.0, 100.0), 0.0);
    session.append_keyframe(circle, 2.0, Easing::Linear, &KeyframePatch::new().position(300.0, 100.0));

    // A square fading in at t=2
    session.create_object(ShapeKind::Square, Pos2::new(200.0, 250.0), 2.0);

    // Bouncing caption
    let text = session.create_object(ShapeKind::Text, Pos2::new(120.0, 400.0), 0.0);
    session.append_keyframe(
        text,
        1.5,
        Easing::Bounce,
        &KeyframePatch::new().position(420.0, 400.0).text("Keystage"),
    );

    // Two rectangles growing together, the second pasted from the first
    let rect = session.create_object(ShapeKind::Rectangle, Pos2::new(500.0, 100.0), 0.0);
    session.append_keyframe(rect, 1.0, Easing::EaseInOut, &KeyframePatch::new().size(160.0, 90.0));
    session.click_object(rect, Modifiers::NONE);
    session.copy_selection();
    session.paste();

    let json = session.export_document().to_json()?;
    std::fs::write(out, json).with_context(|| format!("Failed to write {}", out.display()))?;
    tracing::info!("Wrote demo document with {} objects to {}", session.timeline().len(), out.display());
    Ok(())
}

fn sample(settings: EditorSettings, path: &Path, time: f32) -> Result<()> {
    let session = load_session(settings, path)?;
    let states: Vec<serde_json::Value> = session
        .timeline()
        .objects()
        .filter_map(|object| {
            let state = session.resolve(object.id(), time)?;
            Some(serde_json::json!({
                "id": object.id(),
                "name": object.name,
                "state": state,
            }))
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&states)?);
    Ok(())
}

/// Upper bound on frames a single bake may print
const MAX_BAKE_FRAMES: usize = 100_000;

/// Sample times for a bake, one per tick, ending exactly on `duration`
fn frame_times(duration: f32, fps: f32) -> Result<Vec<f32>> {
    anyhow::ensure!(fps.is_finite() && fps > 0.0, "fps must be positive, got {}", fps);
    anyhow::ensure!(
        duration.is_finite() && duration >= 0.0,
        "timeline duration must be finite and non-negative, got {}",
        duration
    );

    let frames = (duration * fps).ceil();
    anyhow::ensure!(
        frames < MAX_BAKE_FRAMES as f32,
        "bake of {}s at {} fps needs {} frames, limit is {}",
        duration,
        fps,
        frames,
        MAX_BAKE_FRAMES
    );

    Ok((0..=frames as usize).map(|i| (i as f32 / fps).min(duration)).collect())
}

fn bake(settings: EditorSettings, path: &Path, fps: f32) -> Result<()> {
    let session = load_session(settings, path)?;
    let times = frame_times(session.timeline().duration, fps)?;

    for &time in &times {
        let frame = Frame::playing(session.timeline(), time, |_| false);
        println!("{}", serde_json::to_string(&frame)?);
    }
    tracing::info!("Baked {} frames at {} fps", times.len(), fps);
    Ok(())
}
