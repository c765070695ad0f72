#![deny(unsafe_code)]
//! CLI binary for the particle backdrop.
//!
//! Subcommands:
//! - `render` — run N frames headless, write a PNG
//! - `play` — run the animation loop in real time, optionally injecting
//!   theme flips and resizes, optionally writing the last frame
//! - `type` — print the hero subtitle typing effect over time
//! - `list` — print available themes and their palettes

mod error;

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use backdrop_core::config::MAX_PARTICLE_COUNT;
use backdrop_core::{
    AnimationLoop, BackdropConfig, IntervalScheduler, ManualScheduler, Size, Theme, Typewriter,
    TypewriterConfig, Viewport,
};
use backdrop_raster::snapshot::write_png;
use backdrop_raster::PixelSurface;
use clap::{Parser, Subcommand};
use error::CliError;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "backdrop", about = "Animated particle backdrop renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by the commands that build a field.
#[derive(clap::Args)]
struct FieldArgs {
    /// Surface width in pixels.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: u32,

    /// Surface height in pixels.
    #[arg(short = 'H', long, default_value_t = 600)]
    height: u32,

    /// Color theme (dark, light).
    #[arg(short, long, default_value = "dark")]
    theme: Theme,

    /// PRNG seed; omitted means a different field every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of particles (overrides the config file).
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// JSON config file with particle and link settings.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run N frames headless and write the last one as a PNG.
    Render {
        #[command(flatten)]
        field: FieldArgs,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 120)]
        frames: u64,

        /// Output file path.
        #[arg(short, long, default_value = "backdrop.png")]
        output: PathBuf,
    },
    /// Run the animation loop in real time.
    Play {
        #[command(flatten)]
        field: FieldArgs,

        /// Target frame rate.
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Number of frames before stopping.
        #[arg(short, long, default_value_t = 300)]
        frames: u64,

        /// Toggle the theme after this frame.
        #[arg(long)]
        flip_theme_at: Option<u64>,

        /// Resize the viewport after a frame, as FRAME:WIDTHxHEIGHT.
        #[arg(long, value_parser = parse_resize)]
        resize_at: Option<ResizeAt>,

        /// Write the last frame to this PNG.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the typing effect's text over time.
    Type {
        /// Phrases to type (defaults to the hero subtitle phrases).
        #[arg(short, long = "phrase")]
        phrases: Vec<String>,

        /// Total span to print, in milliseconds.
        #[arg(long, default_value_t = 6000)]
        span_ms: u64,

        /// Interval between printed samples, in milliseconds.
        #[arg(long, default_value_t = 250)]
        step_ms: u64,

        /// Type the phrases once instead of looping.
        #[arg(long)]
        once: bool,

        /// Print a single sample at this time instead of a span.
        #[arg(long, conflicts_with_all = ["span_ms", "step_ms"])]
        at_ms: Option<u64>,
    },
    /// List available themes and palettes.
    List,
}

/// A viewport resize scheduled after a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeAt {
    frame: u64,
    size: Size,
}

fn parse_resize(s: &str) -> Result<ResizeAt, String> {
    let (frame, dims) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:WIDTHxHEIGHT, got '{s}'"))?;
    let (w, h) = dims
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{dims}'"))?;
    let frame = frame
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid frame '{frame}': {e}"))?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid width '{w}': {e}"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid height '{h}': {e}"))?;
    Ok(ResizeAt {
        frame,
        size: Size::new(width as f64, height as f64),
    })
}

/// Resolves the config file plus flag overrides.
fn load_config(args: &FieldArgs) -> Result<BackdropConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => BackdropConfig::from_file(path)?,
        None => BackdropConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(n) = args.particles {
        if n > MAX_PARTICLE_COUNT {
            warn!(requested = n, max = MAX_PARTICLE_COUNT, "clamping particle count");
        }
        config.particle_count = n.min(MAX_PARTICLE_COUNT);
    }
    config.validate()?;
    Ok(config)
}

/// Builds an activated loop over a pixel surface sized to the field args.
fn start_loop(
    args: &FieldArgs,
    viewport: &mut Viewport,
) -> Result<AnimationLoop<PixelSurface>, CliError> {
    let config = load_config(args)?;
    debug!(config = %config.to_json(), "resolved config");
    let surface = PixelSurface::from_size(viewport.size())?;
    let mut lp = AnimationLoop::new(surface, config, args.theme);
    lp.activate(viewport);
    Ok(lp)
}

fn viewport_for(args: &FieldArgs) -> Viewport {
    Viewport::new(Size::new(args.width as f64, args.height as f64))
}

fn save(lp: &AnimationLoop<PixelSurface>, output: &Path) -> Result<(), CliError> {
    write_png(lp.surface(), output)?;
    info!(path = %output.display(), "frame written");
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            if cli.json {
                let themes: Vec<_> = Theme::list_names()
                    .iter()
                    .map(|name| -> Result<_, CliError> {
                        let theme = Theme::from_name(name)?;
                        Ok(serde_json::json!({
                            "theme": name,
                            "palette": theme.palette(),
                            "backdrop": theme.backdrop(),
                        }))
                    })
                    .collect::<Result<_, CliError>>()?;
                println!("{}", serde_json::to_string_pretty(&themes)?);
            } else {
                println!("Themes:");
                for name in Theme::list_names() {
                    let theme = Theme::from_name(name)?;
                    let swatches: Vec<_> = theme
                        .palette()
                        .swatches()
                        .iter()
                        .map(|c| c.to_hex())
                        .collect();
                    println!("  {name}: {}", swatches.join(", "));
                }
            }
        }
        Command::Render {
            field,
            frames,
            output,
        } => {
            let mut viewport = viewport_for(&field);
            let mut lp = start_loop(&field, &mut viewport)?;
            let drawn = lp.run(&mut ManualScheduler::frames(frames));
            save(&lp, &output)?;
            lp.deactivate(&mut viewport);

            if cli.json {
                let info = serde_json::json!({
                    "width": field.width,
                    "height": field.height,
                    "theme": lp.theme(),
                    "particles": lp.field().len(),
                    "frames": drawn,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} particles ({}x{}, {} theme, {drawn} frames) -> {}",
                    lp.field().len(),
                    field.width,
                    field.height,
                    lp.theme(),
                    output.display()
                );
            }
        }
        Command::Play {
            field,
            fps,
            frames,
            flip_theme_at,
            resize_at,
            output,
        } => {
            let mut viewport = viewport_for(&field);
            let mut lp = start_loop(&field, &mut viewport)?;
            let mut scheduler = IntervalScheduler::from_fps(fps).with_limit(frames);
            let mut total_links = 0u64;
            let started = Instant::now();

            let drawn = lp.run_with(&mut scheduler, |lp, stats| {
                total_links += stats.links as u64;
                let frame = lp.frames();
                if flip_theme_at == Some(frame) {
                    let theme = lp.theme().toggled();
                    info!(frame, %theme, "flipping theme");
                    lp.set_theme(theme);
                }
                if let Some(resize) = resize_at.filter(|r| r.frame == frame) {
                    info!(frame, width = resize.size.width, height = resize.size.height, "resizing viewport");
                    viewport.resize(resize.size);
                }
                ControlFlow::Continue(())
            });
            let elapsed = started.elapsed();

            if let Some(path) = &output {
                save(&lp, path)?;
            }
            lp.deactivate(&mut viewport);

            let avg_links = if drawn > 0 {
                total_links as f64 / drawn as f64
            } else {
                0.0
            };
            let measured_fps = if elapsed > Duration::ZERO {
                drawn as f64 / elapsed.as_secs_f64()
            } else {
                0.0
            };
            if cli.json {
                let info = serde_json::json!({
                    "frames": drawn,
                    "elapsed_ms": elapsed.as_millis() as u64,
                    "fps": measured_fps,
                    "avg_links": avg_links,
                    "theme": lp.theme(),
                    "width": lp.size().width,
                    "height": lp.size().height,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "played {drawn} frames in {:.2}s ({measured_fps:.1} fps, {avg_links:.1} links/frame, {} theme, {}x{})",
                    elapsed.as_secs_f64(),
                    lp.theme(),
                    lp.size().width,
                    lp.size().height,
                );
            }
        }
        Command::Type {
            phrases,
            span_ms,
            step_ms,
            once,
            at_ms,
        } => {
            if step_ms == 0 {
                return Err(CliError::Input("--step-ms must be positive".into()));
            }
            let defaults = TypewriterConfig::default();
            let config = TypewriterConfig {
                phrases: if phrases.is_empty() {
                    defaults.phrases.clone()
                } else {
                    phrases
                },
                repeat: !once,
                ..defaults
            };
            let typewriter = Typewriter::new(config);
            let times: Vec<u64> = match at_ms {
                Some(t) => vec![t],
                None => (0..=span_ms / step_ms).map(|i| i * step_ms).collect(),
            };
            let samples: Vec<_> = times
                .into_iter()
                .map(|t| (t, typewriter.at(Duration::from_millis(t))))
                .collect();
            if cli.json {
                let rows: Vec<_> = samples
                    .iter()
                    .map(|(t, frame)| serde_json::json!({"ms": t, "frame": frame}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (t, frame) in &samples {
                    println!("{t:>6} ms  {}{}", frame.text, typewriter.config().cursor);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
