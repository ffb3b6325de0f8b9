use std::{
    collections::HashSet,
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use keystage::scene::model::AnimatableObject;
use keystage::{
    EditCommand, EngineConfig, Evaluator, FixedStepClock, FrameClock as _, FrameIndex, ObjectId,
    Playback, Pose, Recovered, Scene, Target,
};

#[derive(Parser, Debug)]
#[command(name = "keystage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a scene, reporting any repairs.
    Validate(ValidateArgs),
    /// Sample one track at a frame.
    Sample(SampleArgs),
    /// Evaluate the full draw list of a frame.
    Frame(FrameArgs),
    /// Play the scene with a fixed-step clock, one summary line per tick.
    Play(PlayArgs),
    /// Apply an edit command and print the resulting scene.
    Edit(EditArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Shape id, `camera` or `focal`.
    #[arg(long)]
    target: Target,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Engine config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat these object ids as having their images loaded.
    #[arg(long = "loaded", value_delimiter = ',')]
    loaded: Vec<u64>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Starting frame.
    #[arg(long, default_value_t = 0)]
    from: u64,

    /// Number of ticks to run; defaults to the scene duration.
    #[arg(long)]
    steps: Option<u64>,

    /// Engine config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wrap to frame 0 at the end instead of stopping.
    #[arg(long = "loop")]
    looping: bool,
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Edit command JSON.
    #[arg(long)]
    command: PathBuf,

    /// Engine config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the edited scene here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
        Command::Edit(args) => cmd_edit(args),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<Recovered<Scene>> {
    Scene::from_path(path).with_context(|| format!("load scene '{}'", path.display()))
}

fn read_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        None => Ok(EngineConfig::default()),
        Some(p) => {
            EngineConfig::from_path(p).with_context(|| format!("load config '{}'", p.display()))
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value).context("encode output JSON")?;
    println!("{s}");
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let loaded = read_scene(&args.in_path)?;
    let scene = &loaded.value;
    print_json(&serde_json::json!({
        "durationFrames": scene.duration_frames(),
        "objects": scene.objects().len(),
        "warnings": loaded.warnings,
    }))
}

fn sample_json<P: Pose, K>(
    obj: &AnimatableObject<P, K>,
    frame: FrameIndex,
) -> serde_json::Value {
    let s = obj.sample(frame);
    serde_json::json!({
        "frame": frame,
        "keyframe": s.keyframe,
        "opacity": s.opacity,
    })
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?.value;
    let frame = scene.clamp_frame(FrameIndex(args.frame));
    let out = match args.target {
        Target::Shape(id) => {
            let obj = scene
                .object(id)
                .with_context(|| format!("no object with id {}", id.0))?;
            sample_json(obj, frame)
        }
        Target::Camera => sample_json(scene.camera(), frame),
        Target::FocalPoint => sample_json(scene.focal_point(), frame),
    };
    print_json(&out)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?.value;
    let config = read_config(args.config.as_deref())?;
    let images: HashSet<ObjectId> = args.loaded.into_iter().map(ObjectId).collect();

    let mut evaluator = Evaluator::new();
    let frame = evaluator.eval_frame(&scene, FrameIndex(args.frame), &config, &images);
    print_json(frame)
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?.value;
    let config = read_config(args.config.as_deref())?;
    let images: HashSet<ObjectId> = HashSet::new();

    let mut playback = Playback::new(scene.duration_frames(), &config.playback);
    if args.looping {
        playback.set_looping(true);
    }
    playback.seek(FrameIndex(args.from));
    playback.play();

    let mut evaluator = Evaluator::new();
    let summary = |evaluator: &mut Evaluator, frame: FrameIndex| {
        let out = evaluator.eval_frame(&scene, frame, &config, &images);
        let ids: Vec<ObjectId> = out.nodes.iter().map(|n| n.id).collect();
        serde_json::json!({ "frame": out.frame, "nodes": ids })
    };

    println!("{}", summary(&mut evaluator, playback.frame()));
    let steps = args.steps.unwrap_or(scene.duration_frames());
    let mut clock = FixedStepClock::new();
    clock.start(Box::new(|| {
        let Some(frame) = playback.tick() else {
            return ControlFlow::Break(());
        };
        println!("{}", summary(&mut evaluator, frame));
        ControlFlow::Continue(())
    }));
    let ran = clock.advance(steps);
    tracing::debug!(ran, steps, "playback finished");
    Ok(())
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?.value;
    let config = read_config(args.config.as_deref())?;
    let raw = std::fs::read_to_string(&args.command)
        .with_context(|| format!("read command '{}'", args.command.display()))?;
    let cmd: EditCommand = serde_json::from_str(&raw).context("parse edit command JSON")?;

    let edited = scene.apply(&cmd, &config)?;
    for w in &edited.warnings {
        eprintln!("warning: {w}");
    }
    let json = edited.value.to_json_string()?;
    match args.out {
        None => println!("{json}"),
        Some(out) => {
            std::fs::write(&out, json).with_context(|| format!("write scene '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
    }
    Ok(())
}
