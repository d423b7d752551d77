use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use kitsmith::{
    Canvas, Command as DesignCommand, FontSource, LoaderOpts, RenderConfig, RenderSession,
    SessionOpts, Side,
};

#[derive(Parser, Debug)]
#[command(name = "kitsmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a design into a PNG at a given path.
    Frame(FrameArgs),
    /// Render a design into `jersey-<side>-<timestamp>.png` inside a directory.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct DesignArgs {
    /// Asset directory containing `canvas/` and `patterns/`.
    #[arg(long)]
    assets: PathBuf,

    /// Design JSON (a full or partial configuration).
    #[arg(long)]
    design: Option<PathBuf>,

    /// JSON array of commands applied after the design.
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Logo image drawn on the front.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Garment side to render; overrides the design.
    #[arg(long)]
    side: Option<Side>,

    /// Container width in pixels; the frame is sized to fit it (default frame 400x480).
    #[arg(long)]
    container: Option<u32>,

    /// Per-asset load timeout in milliseconds.
    #[arg(long, default_value_t = kitsmith::DEFAULT_LOAD_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Font file for lettering; defaults to a system font.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    design: DesignArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    design: DesignArgs,

    /// Output directory.
    #[arg(long)]
    dir: PathBuf,
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
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    runtime.block_on(async {
        match cli.cmd {
            Command::Frame(args) => cmd_frame(args).await,
            Command::Export(args) => cmd_export(args).await,
        }
    })
}

async fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let session = render_design(&args.design).await?;
    let png = session.encode_png()?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let session = render_design(&args.design).await?;
    let path = session.export_png(&args.dir)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

async fn render_design(args: &DesignArgs) -> anyhow::Result<RenderSession> {
    let canvas = match args.container {
        Some(width) => Canvas::for_container(width)?,
        None => Canvas::default(),
    };
    let font = match &args.font {
        Some(path) => FontSource::File { path: path.clone() },
        None => FontSource::default(),
    };
    let opts = SessionOpts {
        canvas,
        assets: kitsmith::AssetPaths::new(&args.assets),
        loader: LoaderOpts {
            timeout_ms: args.timeout_ms,
        },
        font,
    };

    let mut session = RenderSession::new(opts)?;
    session.start().await?;

    if let Some(path) = &args.design {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read design '{}'", path.display()))?;
        session.replace_config(RenderConfig::from_json(&text)?)?;
    }
    if let Some(path) = &args.commands {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read commands '{}'", path.display()))?;
        session.apply_all(DesignCommand::list_from_json(&text)?)?;
    }
    if let Some(side) = args.side {
        session.apply(DesignCommand::SetSide(side))?;
    }
    if let Some(path) = &args.logo {
        session.set_logo(kitsmith::load_image_file(path)?)?;
    }

    session.settle().await?;
    Ok(session)
}
