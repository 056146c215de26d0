mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use nametag_engine::constants::DEFAULT_GRID_GAP_MM;
use nametag_engine::{
    BlankFill, CancelToken, FontBook, FontWeight, GenerationRequest, GridPreset, PaperSize,
    ProgressFn, ProjectSettings, SizingMode, calculate_page_count, calculate_statistics,
    ensure_default_template, generate_pdf,
};
use nametag_runtime::{load_font, load_roster_csv, load_template};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nametag", about = "Print-ready name badge sheets", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a badge PDF from a CSV roster
    Generate {
        /// Roster CSV file (first row holds column names)
        #[arg(short, long)]
        roster: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Project settings JSON (see `init-config`)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Image template as ID=PATH; repeatable. The first one is the default
        #[arg(long = "template", value_parser = parse_key_path)]
        templates: Vec<(String, PathBuf)>,

        /// Font file as FAMILY=PATH; repeatable. The first family is the fallback
        #[arg(long = "font", value_parser = parse_key_path)]
        fonts: Vec<(String, PathBuf)>,

        /// Paper size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Grid layout (columns x rows)
        #[arg(long, value_enum, conflicts_with = "fixed")]
        layout: Option<LayoutArg>,

        /// Fixed badge size in mm, e.g. 90x55
        #[arg(long, value_parser = parse_size_mm)]
        fixed: Option<(f32, f32)>,

        /// Number of blank badges to append
        #[arg(long)]
        blank: Option<usize>,

        /// Add crop marks around every badge
        #[arg(long)]
        crop_marks: bool,

        /// Watermark text repeated across every page
        #[arg(long)]
        watermark: Option<String>,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Show how many pages a roster needs
    Pages {
        /// Number of people
        #[arg(short, long)]
        count: usize,

        /// Grid layout (columns x rows)
        #[arg(long, default_value = "2x2", value_enum)]
        layout: LayoutArg,
    },

    /// Write a default project settings file
    InitConfig {
        /// Output JSON file
        #[arg(short, long, default_value = "project.json")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Letter,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    #[value(name = "2x2")]
    TwoByTwo,
    #[value(name = "2x3")]
    TwoByThree,
    #[value(name = "3x3")]
    ThreeByThree,
    #[value(name = "2x4")]
    TwoByFour,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::Letter => Self::Letter,
        }
    }
}

impl From<LayoutArg> for GridPreset {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::TwoByTwo => Self::TwoByTwo,
            LayoutArg::TwoByThree => Self::TwoByThree,
            LayoutArg::ThreeByThree => Self::ThreeByThree,
            LayoutArg::TwoByFour => Self::TwoByFour,
        }
    }
}

fn parse_key_path(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((key, path)) if !key.trim().is_empty() && !path.is_empty() => {
            Ok((key.trim().to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected KEY=PATH, got '{s}'")),
    }
}

fn parse_size_mm(s: &str) -> Result<(f32, f32), String> {
    let (w, h) = s
        .to_ascii_lowercase()
        .split_once('x')
        .map(|(w, h)| (w.trim().parse::<f32>(), h.trim().parse::<f32>()))
        .ok_or_else(|| format!("expected WIDTHxHEIGHT in mm, got '{s}'"))?;
    match (w, h) {
        (Ok(w), Ok(h)) if w > 0.0 && h > 0.0 => Ok((w, h)),
        _ => Err(format!("invalid badge size '{s}'")),
    }
}

/// Command-line overrides applied on top of the loaded project
struct ExportOverrides {
    paper: Option<PaperArg>,
    layout: Option<LayoutArg>,
    fixed: Option<(f32, f32)>,
    blank: Option<usize>,
    crop_marks: bool,
    watermark: Option<String>,
}

impl ExportOverrides {
    fn apply(self, settings: &mut ProjectSettings) {
        let export = &mut settings.export;
        if let Some(paper) = self.paper {
            export.paper = paper.into();
        }
        if let Some(layout) = self.layout {
            let gap_mm = match export.sizing {
                SizingMode::Grid { gap_mm, .. } => gap_mm,
                SizingMode::Fixed { .. } => DEFAULT_GRID_GAP_MM,
            };
            export.sizing = SizingMode::Grid {
                preset: layout.into(),
                gap_mm,
            };
        }
        if let Some((width_mm, height_mm)) = self.fixed {
            export.sizing = SizingMode::Fixed {
                width_mm,
                height_mm,
            };
        }
        if let Some(count) = self.blank {
            export.blank_fill = BlankFill::Count(count);
        }
        if self.crop_marks {
            export.crop_marks = true;
        }
        if let Some(text) = self.watermark {
            export.watermark = Some(text);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::new(cli.verbose)
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Generate {
            roster,
            output,
            config,
            templates,
            fonts,
            paper,
            layout,
            fixed,
            blank,
            crop_marks,
            watermark,
            stats_only,
        } => {
            let mut settings = match &config {
                Some(path) => ProjectSettings::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ProjectSettings::default(),
            };
            ExportOverrides {
                paper,
                layout,
                fixed,
                blank,
                crop_marks,
                watermark,
            }
            .apply(&mut settings);

            let loaded = load_roster_csv(&roster)
                .await
                .with_context(|| format!("Failed to load roster {}", roster.display()))?;

            let mut template_list = Vec::with_capacity(templates.len());
            for (id, path) in templates {
                template_list.push(load_template(&path, Some(id)).await?);
            }
            let default_id = ensure_default_template(&mut template_list);
            if settings.selected_template_id.is_none() {
                settings.selected_template_id = Some(default_id);
            }

            let mut font_book = FontBook::new();
            for (family, path) in &fonts {
                load_font(&mut font_book, family, FontWeight::Normal, path).await?;
            }
            if let Some((family, _)) = fonts.first() {
                font_book.set_fallback(family);
            }

            let request = GenerationRequest::new(template_list, loaded.entries, settings);
            let stats = calculate_statistics(&request)?;
            println!("Badge Statistics:");
            println!("  Entries: {}", stats.entries);
            println!("  Blank badges: {}", stats.blank_entries);
            println!("  Badges per page: {}", stats.per_page);
            println!("  Pages: {}", stats.pages);

            if stats_only {
                return Ok(());
            }

            let cancel = CancelToken::new();
            let ctrl_c_token = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("Interrupted, stopping after the current batch");
                    ctrl_c_token.cancel();
                }
            });

            let progress = ProgressFn(|current: usize, total: usize| {
                if current == total || current % 20 == 0 {
                    log::info!("Rendered {}/{} badges", current, total);
                }
            });

            let report = generate_pdf(request, font_book, progress, cancel, &output).await?;
            if report.degraded_entries > 0 {
                println!(
                    "Warning: {} badges were rendered without text",
                    report.degraded_entries
                );
            }
            println!(
                "Generated {} badges on {} pages → {}",
                report.entry_count + report.blank_count,
                report.page_count,
                output.display()
            );
        }

        Commands::Pages { count, layout } => {
            let preset: GridPreset = layout.into();
            let pages = calculate_page_count(count, preset);
            println!(
                "{} badges on a {} grid ({} per page): {} pages",
                count,
                preset.label(),
                preset.per_page(),
                pages
            );
        }

        Commands::InitConfig { output } => {
            if tokio::fs::try_exists(&output).await? {
                bail!("{} already exists", output.display());
            }
            ProjectSettings::default().save(&output).await?;
            println!("Wrote default settings → {}", output.display());
        }
    }

    Ok(())
}
