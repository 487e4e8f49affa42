//! `tessera` - render a built-in scene to PNG.
//!
//! Usage: `tessera [--config settings.json] [--output path.png]`
//!
//! Without `--config` the scene, depth, sample count and preview flag are
//! read from stdin; an empty answer keeps the default.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use tessera_renderer::{scenes, PreviewBuffer, RenderSettings};

/// How often the preview image is rewritten.
const PREVIEW_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config needs a file path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--output" | "-o" => {
                let path = args.next().context("--output needs a file path")?;
                parsed.output = Some(PathBuf::from(path));
            }
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(parsed)
}

fn load_settings(path: &Path) -> Result<RenderSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing settings in {}", path.display()))
}

/// Asks `question` and parses the answer, keeping `default` on empty or bad input.
fn prompt_value<T>(
    input: &mut impl BufRead,
    out: &mut impl Write,
    question: &str,
    default: T,
) -> Result<T>
where
    T: FromStr + std::fmt::Display,
{
    writeln!(out, "{} (default = {}):", question, default)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("reading from stdin")?;
    let answer = line.trim();
    if answer.is_empty() {
        return Ok(default);
    }

    match answer.parse() {
        Ok(value) => Ok(value),
        Err(_) => {
            log::warn!("Could not parse {:?}, using {}", answer, default);
            Ok(default)
        }
    }
}

fn prompt_settings(
    settings: &mut RenderSettings,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Please input scene id:")?;
    for (id, name) in scenes::SCENE_NAMES.iter().enumerate() {
        writeln!(out, "{}: {}", id, name)?;
    }
    settings.scene = prompt_value(input, out, "Scene", settings.scene)?;
    settings.max_depth = prompt_value(input, out, "Max depth", settings.max_depth)?;
    settings.samples_per_pixel =
        prompt_value(input, out, "Samples per pixel", settings.samples_per_pixel)?;
    let default_preview = u8::from(settings.preview);
    let preview: u8 = prompt_value(input, out, "Live preview? (0/1)", default_preview)?;
    settings.preview = preview != 0;
    Ok(())
}

/// `output/result.png` becomes `output/result.preview.png`.
fn preview_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "result".to_string());
    output.with_file_name(format!("{}.preview.png", stem))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    Ok(())
}

/// Rewrites the preview image until `done` is set.
fn preview_loop(preview: &PreviewBuffer, path: &Path, done: &AtomicBool) {
    let mut last_write = Instant::now();
    while !done.load(Ordering::Acquire) {
        std::thread::sleep(Duration::from_millis(100));
        if last_write.elapsed() < PREVIEW_INTERVAL {
            continue;
        }
        last_write = Instant::now();
        if let Err(e) = preview.save_png(path) {
            log::warn!("Could not write preview {}: {}", path.display(), e);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => {
            let mut settings = RenderSettings::default();
            prompt_settings(&mut settings, &mut io::stdin().lock(), &mut io::stdout())?;
            settings
        }
    };
    if let Some(output) = args.output {
        settings.output = output;
    }
    settings.validate()?;

    log::info!("Starting Tessera with {:?}", settings);

    let scene = scenes::build_scene(settings.scene, settings.seed)?;
    let mut film = settings.film(scene.camera().aspect_ratio());
    let integrator = settings.integrator();
    let scheduler = settings.scheduler();
    ensure_parent_dir(&settings.output)?;

    let preview = settings
        .preview
        .then(|| PreviewBuffer::new(film.width(), film.height()));
    let done = AtomicBool::new(false);

    let outcome = std::thread::scope(|s| {
        if let Some(preview) = &preview {
            let path = preview_path(&settings.output);
            log::info!("Writing live preview to {}", path.display());
            let done = &done;
            s.spawn(move || preview_loop(preview, &path, done));
        }

        let outcome = scheduler.render(&scene, &integrator, &mut film, preview.as_ref());
        done.store(true, Ordering::Release);
        outcome
    });

    // Save whatever rendered, even when some tiles failed.
    film.save_png(&settings.output)
        .with_context(|| format!("writing {}", settings.output.display()))?;

    let stats = outcome.context("render did not complete")?;
    log::info!(
        "Done: {} tiles on {} threads in {:.2?}",
        stats.tiles,
        stats.threads,
        stats.elapsed
    );
    Ok(())
}
