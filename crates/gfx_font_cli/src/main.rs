use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use gfx_font::{Font, FontFormat, LoadOptions, SaveOptions, load_file, save_file};

#[derive(Parser)]
#[command(version, about = "Inspect, convert and flatten Adafruit GFX bitmap fonts")]
pub struct Cli {
    #[arg(help = "Log debug output.", long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Show metrics and properties of a font")]
    Info {
        file: PathBuf,

        #[arg(help = "Print the whole font as JSON.", long, default_value_t = false)]
        json: bool,
    },

    #[command(about = "Convert a font, formats are taken from the file extensions")]
    Convert {
        input: PathBuf,
        output: PathBuf,

        #[arg(help = "Flatten the code sequence before saving.", long, default_value_t = false)]
        flatten: bool,

        #[arg(help = "Font name used for identifiers and name records.", long)]
        name: Option<String>,

        #[arg(help = "Truncate fonts with more glyphs.", long)]
        max_glyphs: Option<usize>,
    },

    #[command(about = "Make the glyph codes consecutive and write the font back")]
    Flatten {
        input: PathBuf,

        #[arg(help = "Output file, defaults to the input file.", long, short)]
        output: Option<PathBuf>,
    },

    #[command(about = "List the supported file formats")]
    Formats,
}

fn load(path: &Path, options: &LoadOptions) -> anyhow::Result<Font> {
    load_file(path, options).with_context(|| format!("Failed to load {}", path.display()))
}

fn save(font: &mut Font, path: &Path, options: &SaveOptions) -> anyhow::Result<()> {
    save_file(font, path, options).with_context(|| format!("Failed to save {}", path.display()))
}

fn print_info(font: &Font) {
    let bounds = font.bmp_bounds();
    let props = font.filled_properties(None);
    println!("name:        {}", props.font_name.unwrap_or_default());
    println!("glyphs:      {}", font.len());
    println!("codes:       0x{:04X}..=0x{:04X}", font.start_code(), font.end_code());
    println!("flat:        {}", font.is_flat());
    println!("yAdvance:    {}", font.y_advance);
    println!("max advance: {}", font.max_advance());
    println!(
        "bounds:      {}x{} at ({}, {})",
        bounds.width(),
        bounds.height(),
        bounds.left(),
        bounds.top()
    );
    println!("pixel size:  {}", props.pixel_size.unwrap_or_default());
    println!("ascent:      {}", props.ascent.unwrap_or_default());
    println!("descent:     {}", props.descent.unwrap_or_default());

    let moved = font.glyphs().iter().filter(|g| g.status == gfx_font::GlyphStatus::Error).count();
    let inserted = font.glyphs().iter().filter(|g| g.status == gfx_font::GlyphStatus::Inserted).count();
    if moved > 0 || inserted > 0 {
        println!("moved:       {moved}");
        println!("inserted:    {inserted}");
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Info { file, json } => {
            let font = load(&file, &LoadOptions::default())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&font)?);
            } else {
                print_info(&font);
            }
        }
        Commands::Convert {
            input,
            output,
            flatten,
            name,
            max_glyphs,
        } => {
            let load_options = LoadOptions {
                max_glyphs: max_glyphs.or(LoadOptions::default().max_glyphs),
                flatten,
            };
            let mut font = load(&input, &load_options)?;
            save(&mut font, &output, &SaveOptions { font_name: name })?;
        }
        Commands::Flatten { input, output } => {
            let mut font = load(&input, &LoadOptions::default())?;
            if font.is_flat() {
                log::info!("{} is already flat", input.display());
            }
            font.flatten();
            let output = output.unwrap_or(input);
            save(&mut font, &output, &SaveOptions::default())?;
        }
        Commands::Formats => {
            for format in FontFormat::ALL {
                let mode = if format.supports_save() { "load/save" } else { "load" };
                println!("{:<8} {:<20} {:<10} {}", format.extension(), format.name(), mode, format.description());
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let spec = if cli.verbose { "debug" } else { "info" };
    let _logger = match Logger::try_with_env_or_str(spec).and_then(|logger| logger.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    };

    if let Err(err) = run(cli) {
        log::error!("{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
