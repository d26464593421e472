//! cutgrid CLI
//!
//! Runs the timeline layout engine against a project file.

mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cutgrid_cache::hash::hash_bytes;
use cutgrid_cache::{WaveformCache, WaveformData};
use cutgrid_core::events::EditSession;
use cutgrid_core::types::{ElementKind, LayoutConfig, PlacementRequest, Project};
use cutgrid_core::{place_transition, transition_slots, IntervalIndex};
use serde_json::{json, Value};
use settings::Settings;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cutgrid")]
#[command(about = "Timeline row allocation, canvas grid layout and transition timing")]
#[command(version)]
struct Cli {
    /// JSON settings file (layout padding, cache limits)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a new element and report its row and canvas rect
    Place {
        /// Project file
        project: PathBuf,

        /// Start time in seconds
        #[arg(long)]
        start: f64,

        /// End time in seconds
        #[arg(long)]
        end: f64,

        /// Preferred row; ignored if occupied
        #[arg(long)]
        row: Option<u32>,

        #[arg(long, value_enum, default_value = "video")]
        kind: KindArg,

        /// Save the updated project back to disk
        #[arg(long)]
        write: bool,
    },

    /// Recompute canvas rects for every video
    Layout {
        project: PathBuf,

        #[arg(long)]
        write: bool,
    },

    /// List intervals per row
    Rows { project: PathBuf },

    /// Compute a transition window between two clips
    Transition {
        /// End of the outgoing clip, seconds
        #[arg(long)]
        from_end: f64,

        /// Start of the incoming clip, seconds
        #[arg(long)]
        to_start: f64,

        #[arg(long, default_value = "500")]
        duration_ms: f64,

        /// Timeline zoom, for the on-screen width
        #[arg(long, default_value = "100")]
        px_per_sec: f64,
    },

    /// Candidate transition slots between neighbouring clips on a row
    Slots {
        project: PathBuf,

        #[arg(long, default_value = "0")]
        row: u32,

        #[arg(long, default_value = "500")]
        duration_ms: f64,
    },

    /// Compute waveform peaks from raw s16le mono PCM files
    Peaks {
        files: Vec<PathBuf>,

        #[arg(long, default_value = "8000")]
        sample_rate: u32,

        #[arg(long, default_value = "256")]
        samples_per_peak: u32,
    },

    /// Print the effective settings
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Video,
    Audio,
    Image,
    Text,
}

impl From<KindArg> for ElementKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Video => ElementKind::Video,
            KindArg::Audio => ElementKind::Audio,
            KindArg::Image => ElementKind::Image,
            KindArg::Text => ElementKind::Text,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let output = match cli.command {
        Commands::Place {
            project,
            start,
            end,
            row,
            kind,
            write,
        } => {
            let mut request = PlacementRequest::new(start, end);
            request.desired_row = row;
            place(&project, kind.into(), &request, &settings.layout, write)?
        }
        Commands::Layout { project, write } => layout(&project, &settings.layout, write)?,
        Commands::Rows { project } => rows(&load_project(&project)?),
        Commands::Transition {
            from_end,
            to_start,
            duration_ms,
            px_per_sec,
        } => transition(from_end, to_start, duration_ms, px_per_sec, &settings.layout),
        Commands::Slots {
            project,
            row,
            duration_ms,
        } => slots(&load_project(&project)?, row, duration_ms),
        Commands::Peaks {
            files,
            sample_rate,
            samples_per_peak,
        } => peaks(&files, sample_rate, samples_per_peak, &settings)?,
        Commands::Config => serde_json::to_value(&settings)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_project(path: &Path) -> Result<Project> {
    Project::load_from_file(path)
        .with_context(|| format!("Failed to load project {}", path.display()))
}

fn place(
    path: &Path,
    kind: ElementKind,
    request: &PlacementRequest,
    config: &LayoutConfig,
    write: bool,
) -> Result<Value> {
    let mut session = EditSession::new(load_project(path)?, *config);
    session
        .bus_mut()
        .subscribe(|event| tracing::info!(?event, "timeline event"));

    let id = session.place(kind, request)?;
    let element = session
        .project
        .timeline
        .element(id)
        .cloned()
        .context("placed element missing from timeline")?;

    if write {
        session.project.save_to_file(path)?;
    }
    Ok(serde_json::to_value(element)?)
}

fn layout(path: &Path, config: &LayoutConfig, write: bool) -> Result<Value> {
    let mut project = load_project(path)?;
    let canvas = project.canvas();
    project.timeline.relayout(canvas, config);

    let videos: Vec<_> = project
        .timeline
        .elements
        .iter()
        .filter(|e| e.kind.is_positioned())
        .collect();
    let output = serde_json::to_value(&videos)?;

    if write {
        project.save_to_file(path)?;
    }
    Ok(output)
}

fn rows(project: &Project) -> Value {
    let index = IntervalIndex::new(&project.timeline.elements);
    let rows: Vec<Value> = index
        .rows()
        .into_iter()
        .map(|row| {
            let spans: Vec<Value> = index
                .intervals_in_row(row)
                .into_iter()
                .map(|e| json!({ "id": e.id, "kind": e.kind, "start": e.start, "end": e.end }))
                .collect();
            json!({ "row": row, "elements": spans })
        })
        .collect();
    Value::Array(rows)
}

fn transition(
    from_end: f64,
    to_start: f64,
    duration_ms: f64,
    px_per_sec: f64,
    config: &LayoutConfig,
) -> Value {
    let window = place_transition(from_end, to_start, duration_ms);
    json!({
        "start": window.start,
        "end": window.end(),
        "width": window.width,
        "display_width_px": window.display_width_px(px_per_sec, config),
    })
}

fn slots(project: &Project, row: u32, duration_ms: f64) -> Value {
    json!(transition_slots(&project.timeline.elements, row, duration_ms))
}

fn peaks(
    files: &[PathBuf],
    sample_rate: u32,
    samples_per_peak: u32,
    settings: &Settings,
) -> Result<Value> {
    let mut cache = WaveformCache::with_clock(settings.waveforms, cutgrid_cache::SystemClock)?;
    let mut out = Vec::with_capacity(files.len());

    for file in files {
        let bytes = std::fs::read(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let hash = hash_bytes(&bytes);
        let url = file.to_string_lossy();

        let cached = !cache.needs_update(&url, samples_per_peak, &hash);
        let data = match cache.get(&url, samples_per_peak).filter(|_| cached) {
            Some(data) => data,
            None => {
                let samples: Vec<i16> = bytes
                    .chunks_exact(2)
                    .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
                    .collect();
                let data = WaveformData::from_samples(&samples, sample_rate, samples_per_peak);
                cache.set(&url, samples_per_peak, data, &hash);
                cache
                    .get(&url, samples_per_peak)
                    .context("waveform missing right after insert")?
            }
        };

        out.push(json!({
            "file": file,
            "hash": hash,
            "cached": cached,
            "peaks": data.peaks,
        }));
    }

    tracing::debug!(entries = cache.len(), "waveform cache");
    cache.dispose();
    Ok(Value::Array(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutgrid_core::project::preset_720p;
    use tempfile::TempDir;

    fn saved_project(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("demo.cutgrid");
        Project::new("Demo", preset_720p()).save_to_file(&path).unwrap();
        path
    }

    #[test]
    fn place_writes_back_when_asked() {
        let dir = TempDir::new().unwrap();
        let path = saved_project(&dir);
        let cfg = LayoutConfig::default();

        let first = place(&path, ElementKind::Video, &PlacementRequest::new(0.0, 5.0), &cfg, true).unwrap();
        assert_eq!(first["row"], 0);
        let second = place(&path, ElementKind::Video, &PlacementRequest::new(2.0, 4.0), &cfg, true).unwrap();
        assert_eq!(second["row"], 1);
        // Not written: the project still has two elements.
        place(&path, ElementKind::Audio, &PlacementRequest::new(0.0, 1.0), &cfg, false).unwrap();

        let project = load_project(&path).unwrap();
        assert_eq!(project.timeline.elements.len(), 2);

        let listed = rows(&project);
        assert_eq!(listed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn place_rejects_bad_interval() {
        let dir = TempDir::new().unwrap();
        let path = saved_project(&dir);
        let result = place(
            &path,
            ElementKind::Video,
            &PlacementRequest::new(3.0, 1.0),
            &LayoutConfig::default(),
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn layout_reports_videos_only() {
        let dir = TempDir::new().unwrap();
        let path = saved_project(&dir);
        let cfg = LayoutConfig::default();
        place(&path, ElementKind::Video, &PlacementRequest::new(0.0, 5.0), &cfg, true).unwrap();
        place(&path, ElementKind::Text, &PlacementRequest::new(0.0, 5.0), &cfg, true).unwrap();

        let out = layout(&path, &cfg, false).unwrap();
        let videos = out.as_array().unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0]["rect"]["width"], 1280.0);
    }

    #[test]
    fn transition_output() {
        let out = transition(10.0, 12.0, 500.0, 100.0, &LayoutConfig::default());
        assert_eq!(out["start"], 10.75);
        assert_eq!(out["width"], 0.5);
        assert_eq!(out["display_width_px"], 50.0);
    }

    #[test]
    fn peaks_reuses_cache_for_repeated_file() {
        let dir = TempDir::new().unwrap();
        let pcm = dir.path().join("tone.raw");
        let samples: Vec<u8> = [0i16, 1000, -1000, 500]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        std::fs::write(&pcm, samples).unwrap();

        let out = peaks(&[pcm.clone(), pcm], 8000, 2, &Settings::default()).unwrap();
        let arr = out.as_array().unwrap();
        assert_eq!(arr[0]["cached"], false);
        assert_eq!(arr[1]["cached"], true);
        assert_eq!(arr[1]["peaks"].as_array().unwrap().len(), 2);
    }
}
