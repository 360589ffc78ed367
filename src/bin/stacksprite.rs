use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use stacksprite::{
    Camera, Car, Compositor as _, CpuCompositor, CpuCompositorOpts, DemoConfig, ImageFilter,
    LayerImage, StackedSprite,
};

#[derive(Parser, Debug)]
#[command(name = "stacksprite", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single pose of a stacked sprite as a PNG.
    Frame(FrameArgs),
    /// Run the car demo headlessly and write one PNG per tick.
    Drive(DriveArgs),
}

#[derive(Parser, Debug)]
struct SheetArgs {
    /// Sprite sheet whose first row holds the slices, bottom slice leftmost.
    #[arg(long)]
    sheet: PathBuf,

    /// Slice width and height in pixels.
    #[arg(long)]
    tile: u32,

    /// Sampling filter, `nearest` or `linear` (defaults to STACKSPRITE_FILTER or nearest).
    #[arg(long, value_parser = parse_filter)]
    filter: Option<ImageFilter>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Rotation in radians.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    angle: f64,

    /// Height above ground in pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    z: f64,

    /// Integer zoom applied around the canvas centre.
    #[arg(long, default_value_t = 4)]
    zoom: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct DriveArgs {
    #[command(flatten)]
    sheet: SheetArgs,

    /// Demo configuration JSON; defaults reproduce the interactive demo.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks even if the script is longer.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Directory for `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Drive(args) => cmd_drive(args),
    }
}

fn parse_filter(s: &str) -> Result<ImageFilter, String> {
    ImageFilter::parse(s)
        .ok_or_else(|| format!("unknown filter '{s}' (expected nearest or linear)"))
}

fn make_compositor(filter: Option<ImageFilter>) -> CpuCompositor {
    let opts = CpuCompositorOpts::from_env();
    let opts = match filter {
        Some(filter) => opts.with_filter(filter),
        None => opts,
    };
    CpuCompositor::new(opts)
}

fn load_layers(args: &SheetArgs) -> anyhow::Result<Vec<LayerImage>> {
    let layers = stacksprite::load_sprite_row(&args.sheet, args.tile)
        .with_context(|| format!("load slices from '{}'", args.sheet.display()))?;
    tracing::info!(layers = layers.len(), tile = args.tile, "loaded sprite sheet");
    Ok(layers)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let layers = load_layers(&args.sheet)?;
    let mut compositor = make_compositor(args.sheet.filter);
    let mut sprite = StackedSprite::new(&mut compositor, &layers)?;

    let (fw, fh) = sprite.composite_size();
    let zoom = args.zoom.max(1);
    let (w, h) = (fw * 2 * zoom, fh * 2 * zoom);

    let camera = Camera::default();
    camera.scale(f64::from(zoom), f64::from(zoom));
    camera.translate(stacksprite::Vec2::new(f64::from(w) / 2.0, f64::from(h) / 2.0));
    sprite.set_camera(&camera);

    sprite.rotate(args.angle);
    sprite.move_z(args.z);

    let mut target = compositor.alloc(w, h)?;
    sprite.draw_to(&mut compositor, &mut target)?;

    ensure_parent(&args.out)?;
    target.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_drive(args: DriveArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    let layers = load_layers(&args.sheet)?;
    let mut compositor = make_compositor(args.sheet.filter.or(cfg.filter));

    let camera = Camera::new(cfg.camera.to_affine());
    let mut sprite = StackedSprite::new(&mut compositor, &layers)?;
    sprite.set_camera(&camera);
    let mut car = Car::new(sprite);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let total = args
        .max_frames
        .map_or(cfg.script.total_frames(), |m| m.min(cfg.script.total_frames()));
    let mut target = compositor.alloc(cfg.width, cfg.height)?;
    let background = cfg.clear_color();

    for frame in 0..total {
        if let Some(input) = cfg.script.input_at(frame) {
            car.apply_input(input);
        }
        car.update(cfg.tps);

        target.fill(background);
        car.sprite_mut().draw_to(&mut compositor, &mut target)?;
        target.save_png(&args.out_dir.join(format!("frame_{frame:05}.png")))?;
    }

    let stats = car.sprite().stats();
    tracing::info!(
        frames = total,
        reframes = stats.reframes,
        position = ?car.sprite().position(),
        "drive finished"
    );
    eprintln!("wrote {total} frames to {}", args.out_dir.display());
    Ok(())
}
