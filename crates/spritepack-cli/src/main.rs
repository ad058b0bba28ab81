use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use image::ImageReader;
use spritepack_core::prelude::*;
use tracing::info;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "spritepack",
    about = "Build a packed sprite atlas (image pages + JSON frame manifest) from a directory of sprites",
    version,
    author
)]
struct Cli {
    // Input/Output
    /// Input directory containing sprites and the project manifest
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output base path; pages are written as <output>[_<index>].<format>,
    /// the frame manifest as <output>.json
    #[arg(short, long, help_heading = "Input/Output")]
    output: PathBuf,
    /// Output image format: png | webp (lossless)
    #[arg(short, long, default_value = "webp", help_heading = "Input/Output")]
    format: String,
    /// Project manifest path, relative to the input directory
    #[arg(short, long, default_value = "manifest.json", help_heading = "Input/Output")]
    manifest: PathBuf,

    // Layout
    /// Max page width
    #[arg(long, default_value_t = 4096, help_heading = "Layout")]
    max_width: u32,
    /// Max page height
    #[arg(long, default_value_t = 4096, help_heading = "Layout")]
    max_height: u32,
    /// Allow rotation (90deg)
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Layout")]
    allow_rotation: bool,
    /// Padding between textures
    #[arg(long, default_value_t = 1, help_heading = "Layout")]
    texture_padding: u32,
    /// Border padding (around entire page)
    #[arg(long, default_value_t = 0, help_heading = "Layout")]
    border_padding: u32,

    // Export
    /// Replace frame keys with fixed-length content hashes
    #[arg(long, default_value_t = false, help_heading = "Export")]
    compress: bool,

    // Logging/UX
    /// Show a progress bar while decoding (disable with --progress false)
    #[arg(long, default_value_t = true, action = ArgAction::Set, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging/UX")]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);

    // Resolve everything up front: codec, manifest, config. Any failure here
    // is fatal before decoding or packing starts.
    let format: OutputFormat = cli.format.parse()?;

    let manifest_path = cli.input.join(&cli.manifest);
    let manifest_text = fs::read_to_string(&manifest_path)
        .with_context(|| format!("read manifest {}", manifest_path.display()))?;
    let manifest: ProjectManifest = serde_json::from_str(&manifest_text)
        .with_context(|| format!("parse manifest {}", manifest_path.display()))?;

    let cfg = AtlasConfig::builder()
        .with_max_dimensions(cli.max_width, cli.max_height)
        .allow_rotation(cli.allow_rotation)
        .texture_padding(cli.texture_padding)
        .border_padding(cli.border_padding)
        .build();
    cfg.validate()?;

    let paths = gather_sprites(&cli.input, &manifest.sources)?;
    anyhow::ensure!(
        !paths.is_empty(),
        "no sprites matched under {}",
        cli.input.display()
    );
    let inputs = load_sprites(&paths, cli.progress && !cli.quiet)?;
    info!(count = inputs.len(), "loaded input sprites");

    let (out_dir, base) = split_output(&cli.output)?;
    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let mut out = build_atlas(inputs, &manifest, &cfg, &base, format)?;

    for page in &out.pages {
        let path = out_dir.join(&out.document.meta.images[page.index]);
        page.rgba
            .save_with_format(&path, format.image_format())
            .with_context(|| format!("write {}", path.display()))?;
        info!(?path, id = page.index, "wrote page");
    }

    if cli.compress {
        let mapping = compress_keys(&mut out.document)?;
        info!(keys = mapping.len(), "compressed frame keys");
    }

    let json_path = out_dir.join(format!("{base}.json"));
    let json = serde_json::to_string_pretty(&out.document)?;
    fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
    info!(
        ?json_path,
        pages = out.pages.len(),
        frames = out.document.frames.len(),
        "atlas written"
    );

    Ok(())
}

/// Splits the output base path into (directory, base file stem).
fn split_output(output: &Path) -> anyhow::Result<(PathBuf, String)> {
    let base = output
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .with_context(|| format!("output path {} has no base name", output.display()))?;
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((dir, base))
}

/// Enumerates sprite files under `input` matching the manifest `sources`
/// globs (every supported image when no glob is given), as sorted
/// slash-normalized relative paths.
fn gather_sprites(input: &Path, sources: &[String]) -> anyhow::Result<Vec<(String, PathBuf)>> {
    let set = if sources.is_empty() {
        None
    } else {
        let mut b = globset::GlobSetBuilder::new();
        for pat in sources {
            b.add(globset::Glob::new(pat).with_context(|| format!("source glob {pat}"))?);
        }
        Some(b.build()?)
    };

    let mut list: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if !p.is_file() || !is_image(p) {
            continue;
        }
        let rel = p
            .strip_prefix(input)
            .unwrap_or(p)
            .to_string_lossy()
            .replace('\\', "/");
        if let Some(set) = &set {
            if !set.is_match(&rel) {
                continue;
            }
        }
        list.push((rel, p.to_path_buf()));
    }
    // Canonical order: packing and dedup depend on it.
    list.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(list)
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif" | "webp")
    )
}

/// Decodes every sprite. Any decode failure aborts the run; there is no
/// partial atlas output.
fn load_sprites(paths: &[(String, PathBuf)], progress: bool) -> anyhow::Result<Vec<InputSprite>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} decoding {pos}/{len} [{elapsed_precise}] {wide_msg}",
        ) {
            b.set_style(style);
        }
        Some(b)
    } else {
        None
    };

    let mut list = Vec::with_capacity(paths.len());
    for (rel, abs) in paths {
        if let Some(b) = &bar {
            b.set_message(rel.clone());
        }
        let image = ImageReader::open(abs)
            .with_context(|| format!("open {}", abs.display()))?
            .with_guessed_format()
            .with_context(|| format!("probe {}", abs.display()))?
            .decode()
            .with_context(|| format!("decode {}", abs.display()))?;
        list.push(InputSprite {
            path: rel.clone(),
            image,
        });
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
