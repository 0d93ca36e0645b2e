use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "slidecraft", version)]
struct Cli {
    /// Optional engine config JSON (defaults apply to omitted fields).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export committed layers of every slot (or one slot) as PNG files.
    Export(ExportArgs),
    /// Render one slot's draft layers at preview width as a PNG.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input project manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory the PNG files are written to.
    #[arg(long)]
    out_dir: PathBuf,

    /// `2k`, `4k`, or a width in pixels.
    #[arg(long, default_value = "2k")]
    resolution: slidecraft::Resolution,

    /// Export only this slot (0-based).
    #[arg(long)]
    slot: Option<usize>,

    /// Print the load state of every font family the manifest registers.
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input project manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Slot to render (0-based).
    #[arg(long, default_value_t = 0)]
    slot: usize,

    /// Preview width; defaults to the configured preview width.
    #[arg(long)]
    width: Option<u32>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Export(args) => cmd_export(&cfg, args),
        Command::Preview(args) => cmd_preview(&cfg, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<slidecraft::StudioConfig> {
    let cfg = match path {
        Some(p) => slidecraft::StudioConfig::load(p)?,
        None => slidecraft::StudioConfig::default(),
    };
    Ok(cfg.with_env_overrides())
}

fn load_project(
    cfg: &slidecraft::StudioConfig,
    in_path: &Path,
) -> anyhow::Result<(slidecraft::ProjectManifest, slidecraft::LoadedProject)> {
    let manifest = slidecraft::ProjectManifest::load(in_path)?;
    let root = in_path.parent().unwrap_or_else(|| Path::new("."));
    let loaded = manifest
        .build(root, cfg, &cfg.decoder())
        .with_context(|| format!("load project '{}'", in_path.display()))?;
    Ok((manifest, loaded))
}

fn cmd_export(cfg: &slidecraft::StudioConfig, args: ExportArgs) -> anyhow::Result<()> {
    let (manifest, slidecraft::LoadedProject { project, mut fonts }) =
        load_project(cfg, &args.in_path)?;

    if args.dump_fonts {
        for font in &manifest.fonts {
            eprintln!("font: family={} status={:?}", font.family, fonts.status(&font.family));
        }
    }

    let exporter = cfg.exporter();
    let outcomes = match args.slot {
        Some(slot) => vec![slidecraft::SlotExportOutcome {
            slot_index: slot,
            resolution: args.resolution,
            result: exporter.export_slot(&project, slot, args.resolution, &mut fonts),
        }],
        None => exporter.export_all(&project, args.resolution, &mut fonts),
    };

    let mut failed = 0usize;
    for outcome in outcomes {
        match outcome.result {
            Ok(img) => {
                let path = img.write_to_dir(&args.out_dir)?;
                eprintln!("wrote {}", path.display());
            }
            Err(err) => {
                failed += 1;
                eprintln!(
                    "slot {} ({}): {err}",
                    outcome.slot_index, outcome.resolution
                );
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} slot(s) failed to export");
    }
    Ok(())
}

fn cmd_preview(cfg: &slidecraft::StudioConfig, args: PreviewArgs) -> anyhow::Result<()> {
    let (_, slidecraft::LoadedProject { project, mut fonts }) =
        load_project(cfg, &args.in_path)?;

    let mut preview = cfg.preview()?;
    if let Some(w) = args.width {
        preview.set_display_width(w)?;
    }
    let rendered = preview.render(&project, args.slot, &mut fonts)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = rendered.frame.encode_png()?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
