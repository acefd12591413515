use clap::ValueEnum;
use color_eyre::eyre::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Color {
    No,
    Yes,
    Auto,
}

impl Color {
    pub fn is_enabled(self) -> bool {
        match self {
            Color::No => false,
            Color::Yes => true,
            Color::Auto => supports_color::on(supports_color::Stream::Stderr).is_some(),
        }
    }
}

/// Install color_eyre, disabling colored error reports when color is off
pub fn install_color_eyre(color: Color) -> Result<()> {
    if color.is_enabled() {
        color_eyre::install()
    } else {
        color_eyre::config::HookBuilder::blank().install()
    }
}
