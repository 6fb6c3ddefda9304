use asciiwrite::config;
use asciiwrite::figfont::Font;
use asciiwrite::library::{self, FontLibrary};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "asciiwrite",
    version,
    about = "Render text as banner art with FIGlet (.flf) fonts"
)]
struct Cli {
    /// Font name from the font directory, or a path to an .flf file
    #[arg(short, long)]
    font: Option<String>,

    /// Font directory (defaults to FontDir from asciiwrite.ini)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Print the parsed font as JSON instead of rendering
    #[arg(long)]
    json: bool,

    /// List font names in the font directory
    #[arg(short, long)]
    list: bool,

    /// Text to render; words are joined by single spaces
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present_any = ["json", "list"]
    )]
    phrase: Vec<String>,
}

/// A spec naming a file is loaded directly; anything else is looked up by name.
fn resolve_font(dir: &Path, spec: &str) -> Result<Arc<Font>, library::LibraryError> {
    let as_path = Path::new(spec);
    if as_path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("flf"))
    {
        return library::load_file(as_path).map(Arc::new);
    }
    FontLibrary::open(dir)?.get(spec)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install logger immediately, then set runtime max level from config after loading it.
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .try_init();
    // Startup default when config is missing or malformed.
    log::set_max_level(log::LevelFilter::Warn);

    config::load();
    let cfg = config::get();
    log::set_max_level(cfg.log_level.as_level_filter());

    let cli = Cli::parse();

    let dir = cli.dir.unwrap_or(cfg.font_dir);
    if cli.list {
        for name in FontLibrary::open(&dir)?.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let font_spec = cli.font.unwrap_or(cfg.default_font);
    let font = resolve_font(&dir, &font_spec)?;

    if cli.json {
        println!("{}", font.to_json()?);
        return Ok(());
    }

    let phrase = cli.phrase.join(" ");
    match font.render(&phrase) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            log::error!("Cannot print '{phrase}' with font '{}': {e}", font.name);
            return Err(e.into());
        }
    }
    Ok(())
}
