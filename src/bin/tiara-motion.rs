use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tiara_motion::page::{RestaurantPage, mount_page};
use tiara_motion::{
    ElementId, Evaluation, ManualTickSource, MotionConfig, MotionContext, ScrollInput,
    ScrollState, Size, Threshold, Tick, TriggerId, Viewport,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tiara-motion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scroll script against the restaurant page and print one JSON line per frame.
    Trace(TraceArgs),
    /// Print the scroll offset at which a threshold is reached.
    Threshold(ThresholdArgs),
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Only print frames where a trigger changed state.
    #[arg(long, default_value_t = false)]
    changes_only: bool,
}

#[derive(Parser, Debug)]
struct ThresholdArgs {
    /// Threshold string, e.g. "top 85%".
    threshold: String,

    /// Leading edge of the element along the scroll axis, in document pixels.
    #[arg(long)]
    start: f64,

    /// Trailing edge of the element along the scroll axis, in document pixels.
    #[arg(long)]
    end: f64,

    /// Viewport length along the scroll axis.
    #[arg(long, default_value_t = 800.0)]
    viewport: f64,
}

/// A replay script. Everything but `steps` is optional; the page defaults to the sample page.
#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Script {
    #[serde(default)]
    config: MotionConfig,
    viewport: Option<Viewport>,
    page: Option<RestaurantPage>,
    steps: Vec<ScriptStep>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(tag = "op", rename_all = "camelCase")]
enum ScriptStep {
    /// Feed one input event.
    Input { event: ScrollInput },
    /// Run `count` frames of `ms` each.
    Frames { count: usize, ms: f64 },
    /// Run one frame per timestamp, timed by the gaps between them.
    Timestamps { ms: Vec<f64> },
    /// Pointer entered an element.
    PointerEnter { element: ElementId },
    /// Pointer left an element.
    PointerLeave { element: ElementId },
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FrameLine {
    frame: u64,
    time_ms: f64,
    elapsed_ms: f64,
    #[serde(flatten)]
    scroll: ScrollState,
    fired: Vec<TriggerId>,
    entered: Vec<TriggerId>,
    left: Vec<TriggerId>,
    completed: Vec<TriggerId>,
    scrubbed: usize,
}

impl FrameLine {
    fn new(tick: Tick, scroll: ScrollState, eval: Evaluation) -> Self {
        Self {
            frame: tick.frame,
            time_ms: tick.time_ms,
            elapsed_ms: tick.elapsed_ms,
            scroll,
            fired: eval.fired.to_vec(),
            entered: eval.entered.to_vec(),
            left: eval.left.to_vec(),
            completed: eval.completed.to_vec(),
            scrubbed: eval.scrubbed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Trace(args) => cmd_trace(args),
        Command::Threshold(args) => cmd_threshold(args),
    }
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read script '{}'", args.in_path.display()))?;
    let script: Script = serde_json::from_str(&text)
        .with_context(|| format!("parse script '{}'", args.in_path.display()))?;

    let page = script.page.unwrap_or_else(RestaurantPage::sample);
    let viewport = script.viewport.unwrap_or_else(|| {
        Viewport::new(
            Size::new(RestaurantPage::SAMPLE_WIDTH, 800.0),
            Size::new(RestaurantPage::SAMPLE_WIDTH, RestaurantPage::SAMPLE_HEIGHT),
        )
    });
    let ctx = MotionContext::new(script.config, viewport).context("create motion context")?;
    let mounted = mount_page(&ctx, &page).context("mount page")?;
    for m in &mounted {
        tracing::info!(section = m.scope.name(), stats = ?m.stats, "mounted");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut emit = |tick: Tick| -> anyhow::Result<()> {
        let eval = ctx.last_evaluation();
        if args.changes_only && eval.is_quiet() {
            return Ok(());
        }
        let line = FrameLine::new(tick, ctx.scroll_state(), eval);
        serde_json::to_writer(&mut out, &line)?;
        writeln!(out)?;
        Ok(())
    };

    let mut source = ManualTickSource::new();
    for step in script.steps {
        match step {
            ScriptStep::Input { event } => ctx.input(event),
            ScriptStep::Frames { count, ms } => {
                for _ in 0..count {
                    emit(ctx.frame(ms))?;
                }
            }
            ScriptStep::Timestamps { ms } => {
                for t in ms {
                    source.push(t);
                }
                while let Some(tick) = ctx.pump(&mut source) {
                    emit(tick)?;
                }
            }
            ScriptStep::PointerEnter { element } => {
                ctx.pointer_enter(element);
            }
            ScriptStep::PointerLeave { element } => {
                ctx.pointer_leave(element);
            }
        }
    }

    for m in &mounted {
        m.scope.teardown();
    }
    ctx.destroy();
    Ok(())
}

fn cmd_threshold(args: ThresholdArgs) -> anyhow::Result<()> {
    let threshold: Threshold = args
        .threshold
        .parse()
        .with_context(|| format!("parse threshold '{}'", args.threshold))?;
    if args.end < args.start {
        anyhow::bail!("--end ({}) is before --start ({})", args.end, args.start);
    }
    let offset = threshold.scroll_offset((args.start, args.end), args.viewport);
    println!(
        "{}",
        serde_json::json!({
            "threshold": threshold,
            "scrollOffset": offset,
        })
    );
    Ok(())
}
