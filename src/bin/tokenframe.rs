use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tokenframe", version)]
struct Cli {
    /// Frame settings JSON (defaults apply when omitted).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a framed artifact and write it to a file.
    Composite(RenderArgs),
    /// Render a low-resolution PNG preview.
    Preview(RenderArgs),
    /// Print the cache key and artifact filename for a base image.
    Key(KeyArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Base image, relative to `--root`.
    #[arg(long)]
    base: String,

    /// Frame configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Directory base, frame, and mask paths are resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct KeyArgs {
    /// Base image path.
    #[arg(long)]
    base: String,

    /// Entity or template id.
    #[arg(long)]
    entity: String,

    /// Entity role: `token` or `proto`.
    #[arg(long, default_value = "token", value_parser = parse_role)]
    role: tokenframe::Role,
}

fn parse_role(s: &str) -> Result<tokenframe::Role, String> {
    tokenframe::Role::from_key_segment(s).ok_or_else(|| format!("unknown role '{s}'"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => tokenframe::FrameSettings::from_path(path)?,
        None => tokenframe::FrameSettings::default(),
    };
    match cli.cmd {
        Command::Composite(args) => cmd_composite(&settings, args),
        Command::Preview(args) => cmd_preview(&settings, args),
        Command::Key(args) => cmd_key(&settings, args),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<tokenframe::FrameConfig> {
    let f = File::open(path).with_context(|| format!("open frame config '{}'", path.display()))?;
    let config: tokenframe::FrameConfig = serde_json::from_reader(BufReader::new(f))
        .with_context(|| "parse frame config JSON")?;
    if !config.is_active() {
        anyhow::bail!("frame config is disabled or has no frameImage");
    }
    Ok(config)
}

fn compositor(root: &Path) -> tokenframe::Compositor {
    tokenframe::Compositor::new(Arc::new(tokenframe::FsAssetSource::new(root)))
}

fn create_parent(out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_composite(settings: &tokenframe::FrameSettings, args: RenderArgs) -> anyhow::Result<()> {
    let config = read_config_json(&args.config)?;
    let bytes = compositor(&args.root).composite(
        &args.base,
        &config,
        settings.output_size,
        settings.format,
        settings.quality,
    )?;

    create_parent(&args.out)?;
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write artifact '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_preview(settings: &tokenframe::FrameSettings, args: RenderArgs) -> anyhow::Result<()> {
    let config = read_config_json(&args.config)?;
    let img = compositor(&args.root).render(&args.base, &config, settings.preview_size)?;

    create_parent(&args.out)?;
    img.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_key(settings: &tokenframe::FrameSettings, args: KeyArgs) -> anyhow::Result<()> {
    let key = tokenframe::derive_key(
        &args.base,
        &tokenframe::EntityId::new(args.entity),
        args.role,
    );
    println!("{key}");
    println!(
        "{}/{}",
        settings.cache_folder,
        key.file_name(settings.format)
    );
    Ok(())
}
