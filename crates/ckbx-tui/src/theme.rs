//! Theme support with auto-detection for dark/light terminals.

use ckbx_core::ThemeConfig;
use ratatui::style::Color;

/// Application theme (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Pick the theme from config, detecting the terminal background for `System`.
    pub fn resolve(config: ThemeConfig) -> Self {
        match config {
            ThemeConfig::Dark => Theme::Dark,
            ThemeConfig::Light => Theme::Light,
            ThemeConfig::System => Self::detect(),
        }
    }

    /// Detect the terminal theme based on background luminance.
    fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => {
                tracing::debug!("Detected light terminal (luma: {:.2})", luma);
                Theme::Light
            }
            Ok(_) => Theme::Dark,
            Err(e) => {
                tracing::debug!("Could not detect terminal theme: {}, defaulting to dark", e);
                Theme::Dark
            }
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette::dark(),
            Theme::Light => Palette::light(),
        }
    }
}

/// Colors used by the address page.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub border: Color,
    pub muted: Color,

    /// Titles and the address hash.
    pub primary: Color,
    /// Labels in the overview block.
    pub accent: Color,
    pub selection: Color,

    /// Incoming capacity.
    pub income: Color,
    /// Outgoing capacity.
    pub outgo: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            bg: Color::Black,
            border: Color::DarkGray,
            muted: Color::Gray,
            primary: Color::Cyan,
            accent: Color::LightGreen,
            selection: Color::Rgb(40, 60, 80),
            income: Color::Green,
            outgo: Color::LightRed,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            bg: Color::White,
            border: Color::Gray,
            muted: Color::DarkGray,
            primary: Color::Blue,
            accent: Color::Rgb(0, 120, 90),
            selection: Color::Rgb(200, 220, 240),
            income: Color::Rgb(0, 130, 0),
            outgo: Color::Rgb(180, 0, 0),
            warning: Color::Rgb(170, 110, 0),
            error: Color::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_themes() {
        assert_eq!(Theme::resolve(ThemeConfig::Dark), Theme::Dark);
        assert_eq!(Theme::resolve(ThemeConfig::Light), Theme::Light);
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Theme::Dark.palette().fg, Theme::Light.palette().fg);
        assert_ne!(Theme::Dark.palette().bg, Theme::Light.palette().bg);
    }
}
