use anyhow::Result;
use clap::Parser;
use loanlens_icon::icon_gen;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "loanlens-icon",
    about = "Render the LoanLens app icon and its adaptive foreground layer"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Font file to try before the system fonts. May be repeated.
    #[clap(long = "font", value_name = "PATH")]
    fonts: Vec<PathBuf>,

    /// Skip the system font list and use only --font paths or the built-in font
    #[clap(long)]
    no_system_fonts: bool,

    /// Text drawn inside the magnifying glass
    #[clap(long, default_value = icon_gen::DEFAULT_SYMBOL)]
    symbol: String,

    /// Gradient color at the top of the icon (CSS color format)
    #[clap(long)]
    top_color: Option<String>,

    /// Gradient color at the bottom of the icon (CSS color format)
    #[clap(long)]
    bottom_color: Option<String>,

    /// Color of the glass, symbol and trend line (CSS color format)
    #[clap(long)]
    ink_color: Option<String>,
}

impl From<Args> for icon_gen::Args {
    fn from(args: Args) -> Self {
        Self {
            output: args.output,
            fonts: args.fonts,
            no_system_fonts: args.no_system_fonts,
            symbol: args.symbol,
            top_color: args.top_color,
            bottom_color: args.bottom_color,
            ink_color: args.ink_color,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(args.into())
}
