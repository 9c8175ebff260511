use anyhow::{Context, Result};
use argh::FromArgs;
use card_finder::adapters::{CaptureAdapter, ImageFileCapture, ImageRenderer, RenderAdapter};
use card_finder::core_modules::contiguous_areas::ClusterConfig;
use card_finder::parallel_pipeline::ParallelPipeline;
use card_finder::pipeline::{CardPipeline, MergeStrategy, PipelineConfig, ScanOrder};
use card_finder::polling::PollingLoop;
use std::path::PathBuf;
use std::time::Duration;

#[derive(FromArgs)]
/// Find blue and red playing cards in images and write annotated copies.
struct Args {
    /// input images (png, jpeg, ...)
    #[argh(positional)]
    inputs: Vec<String>,

    /// directory for annotated images (default: current directory)
    #[argh(option, default = "String::from(\".\")")]
    output_dir: String,

    /// shrink inputs to fit WxH before scanning, e.g. `300x300`
    #[argh(option)]
    resize: Option<String>,

    /// squared distance below which a pixel joins an area (default: 6)
    #[argh(option, default = "6.0", from_str_fn(parse_threshold))]
    threshold: f64,

    /// drop areas with this many pixels or fewer (default: 0, keep all)
    #[argh(option, default = "0")]
    min_points: usize,

    /// visit pixels column by column instead of row by row
    #[argh(switch)]
    column_major: bool,

    /// merge overlapping areas in a single sweep
    #[argh(switch)]
    single_pass: bool,

    /// poll one input per period (milliseconds) instead of processing all in parallel
    #[argh(option)]
    poll_ms: Option<u64>,
}

fn parse_size(raw: &str) -> Result<(u32, u32)> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .with_context(|| format!("size `{raw}` is not of the form WxH"))?;
    let width = width.trim().parse().with_context(|| format!("bad width in `{raw}`"))?;
    let height = height.trim().parse().with_context(|| format!("bad height in `{raw}`"))?;
    if width == 0 || height == 0 {
        anyhow::bail!("size `{raw}` must be non-zero");
    }
    Ok((width, height))
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let threshold: f64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("bad threshold `{raw}`: {e}"))?;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(format!("threshold `{raw}` must be a positive, finite number"));
    }
    Ok(threshold)
}

fn pipeline_config(args: &Args) -> PipelineConfig {
    PipelineConfig {
        scan_order: if args.column_major {
            ScanOrder::ColumnMajor
        } else {
            ScanOrder::RowMajor
        },
        cluster: ClusterConfig {
            sq_distance_threshold: args.threshold,
            min_points: args.min_points,
            merge_strategy: if args.single_pass {
                MergeStrategy::SinglePass
            } else {
                MergeStrategy::UntilStable
            },
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();

    let args: Args = argh::from_env();
    if args.inputs.is_empty() {
        anyhow::bail!("No input. Usage: card_tester <image>... [--output-dir DIR]");
    }

    let config = pipeline_config(&args);
    let output_dir = PathBuf::from(&args.output_dir);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let mut capture = ImageFileCapture::new(args.inputs.iter());
    if let Some(raw) = &args.resize {
        let (width, height) = parse_size(raw)?;
        capture = capture.with_resize(width, height);
    }
    let mut renderer = ImageRenderer::new(&output_dir);

    if let Some(poll_ms) = args.poll_ms {
        if poll_ms == 0 {
            anyhow::bail!("--poll-ms must be at least 1");
        }
        let stats = PollingLoop::new(CardPipeline::new(config))
            .with_period(Duration::from_millis(poll_ms))
            .run(&mut capture, &mut renderer)
            .await
            .context("polling loop failed")?;
        tracing::info!(
            "Processing complete: {} rendered, {} dropped. Output in {}",
            stats.frames_rendered,
            stats.frames_dropped,
            output_dir.display()
        );
        return Ok(());
    }

    let mut frames = Vec::with_capacity(capture.remaining());
    while let Some(frame) = capture.capture().context("failed to capture frame")? {
        frames.push(frame);
    }

    let pipeline = ParallelPipeline::new(config);
    tracing::info!(
        frames = frames.len(),
        workers = pipeline.worker_count(),
        "processing frames"
    );
    let results = pipeline.process_frames(frames).await;

    for result in results {
        let processed = result.context("worker pool stopped")?;
        let frame = &processed.frame;
        let name = frame
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let areas = processed
            .areas
            .with_context(|| format!("failed to process {name}"))?;
        for (category, boxes) in &areas {
            tracing::info!("{name}: {} {category} area(s)", boxes.len());
            for area in boxes {
                tracing::debug!(
                    "{category} ({}, {}) - ({}, {}), {} px",
                    area.top_left.x,
                    area.top_left.y,
                    area.bottom_right.x,
                    area.bottom_right.y,
                    area.points_count
                );
            }
        }
        renderer
            .render(frame, &areas)
            .with_context(|| format!("failed to render {name}"))?;
    }

    tracing::info!("Processing complete. Output saved to {}", output_dir.display());
    Ok(())
}
