use std::path::PathBuf;

use anyhow::Context as _;
use billboard::{
    BackgroundCache, Billboard, BillboardOptions, Colour, Config, FileBackground, FontSource,
    MemoryBackground, Px, Shadow, DEFAULT_MESSAGE,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "billboard", version, about = "Put your message on a billboard")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a message onto the billboard and save it as a PNG.
    Render(RenderArgs),
    /// Delete generated billboards older than the retention period.
    Cleanup,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Message to display; newlines start new paragraphs.
    #[arg(default_value = DEFAULT_MESSAGE)]
    message: String,

    /// Output PNG path. Defaults to a timestamped file in the output directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Background image, overriding the configured one.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Font file, tried before the configured fonts.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Layout preset to start from instead of the configured options.
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Font size in pixels, at most 1024.
    #[arg(long)]
    size: Option<f32>,

    /// Text colour, e.g. `#ffffff` or `black`.
    #[arg(long)]
    colour: Option<Colour>,

    /// Draw a black drop shadow under the text.
    #[arg(long)]
    shadow: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Banded,
    Classic,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("load config '{}'", path.display()))?
        }
        None => Config::default(),
    };

    match cli.cmd {
        Command::Render(args) => cmd_render(config, args),
        Command::Cleanup => cmd_cleanup(config),
    }
}

fn options_for(config: &Config, args: &RenderArgs) -> BillboardOptions {
    let mut options = match args.preset {
        Some(Preset::Banded) => BillboardOptions::banded(),
        Some(Preset::Classic) => BillboardOptions::classic(),
        None => config.options,
    };
    if let Some(size) = args.size {
        options.font_size = Px(size);
    }
    if let Some(colour) = args.colour {
        options.text_colour = colour;
    }
    if args.shadow && options.shadow.is_none() {
        options.shadow = Some(Shadow::default());
    }
    options
}

fn cmd_render(config: Config, args: RenderArgs) -> anyhow::Result<()> {
    let options = options_for(&config, &args);

    let mut fonts = config.fonts.clone();
    if let Some(path) = &args.font {
        fonts = fonts.prefer(FontSource::Path(path.clone()));
    }
    let font = fonts.resolve().context("find a font to draw with")?;

    let background = match args.background.as_ref().or(config.background.as_ref()) {
        Some(path) => BackgroundCache::new(FileBackground::new(path)),
        None => BackgroundCache::new(MemoryBackground::Decoded(
            billboard::image::DynamicImage::ImageRgb8(billboard::fallback_canvas()),
        )),
    };

    let billboard = Billboard::new(background, font, options);
    let image = billboard
        .generate(&args.message)
        .context("render billboard")?;

    match &args.out {
        Some(out) => {
            image
                .save(out)
                .with_context(|| format!("write '{}'", out.display()))?;
            println!("{}", out.display());
        }
        None => {
            let store = config.output_store();
            let stored = store.save(&image).context("save billboard")?;
            println!("{}", stored.path.display());
            store.cleanup_expired().context("clean up old billboards")?;
        }
    }

    Ok(())
}

fn cmd_cleanup(config: Config) -> anyhow::Result<()> {
    let store = config.output_store();
    let removed = store
        .cleanup_expired()
        .with_context(|| format!("clean up '{}'", store.dir.display()))?;
    println!("removed {removed} file(s)");
    Ok(())
}
