//! Export themes
//!
//! A closed set of presets. Lookup by name never fails: unknown names fall
//! back to the default preset.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Standard PDF base fonts a theme may pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Font {
    #[serde(rename = "Helvetica")]
    Helvetica,
    #[serde(rename = "Helvetica-Bold")]
    HelveticaBold,
    #[serde(rename = "Courier")]
    Courier,
    #[serde(rename = "Courier-Bold")]
    CourierBold,
}

impl Font {
    pub fn all() -> &'static [Font] {
        &[
            Font::Helvetica,
            Font::HelveticaBold,
            Font::Courier,
            Font::CourierBold,
        ]
    }

    /// PostScript base font name
    pub fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::Courier => "Courier",
            Font::CourierBold => "Courier-Bold",
        }
    }
}

/// Theme colors as `#RRGGBB` strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub success: &'static str,
    pub danger: &'static str,
    pub warning: &'static str,
    pub dark: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fonts {
    pub header: Font,
    pub body: Font,
    pub mono: Font,
}

/// Names of the built-in presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Default,
    Professional,
    Modern,
    Minimal,
}

impl ThemeName {
    pub fn all() -> &'static [ThemeName] {
        &[
            ThemeName::Default,
            ThemeName::Professional,
            ThemeName::Modern,
            ThemeName::Minimal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Professional => "professional",
            ThemeName::Modern => "modern",
            ThemeName::Minimal => "minimal",
        }
    }

    /// Case-insensitive lookup
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }

    /// "Professional"
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const SANS: Fonts = Fonts {
    header: Font::HelveticaBold,
    body: Font::Helvetica,
    mono: Font::Courier,
};

/// A resolved preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: Palette,
    pub fonts: Fonts,
}

impl Theme {
    pub const fn preset(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Theme {
                name,
                colors: Palette {
                    primary: "#3B82F6",
                    secondary: "#6B7280",
                    success: "#10B981",
                    danger: "#EF4444",
                    warning: "#F59E0B",
                    dark: "#1F2937",
                },
                fonts: SANS,
            },
            ThemeName::Professional => Theme {
                name,
                colors: Palette {
                    primary: "#1E40AF",
                    secondary: "#4B5563",
                    success: "#047857",
                    danger: "#DC2626",
                    warning: "#D97706",
                    dark: "#111827",
                },
                fonts: Fonts {
                    header: Font::HelveticaBold,
                    body: Font::Helvetica,
                    mono: Font::CourierBold,
                },
            },
            ThemeName::Modern => Theme {
                name,
                colors: Palette {
                    primary: "#7C3AED",
                    secondary: "#6B7280",
                    success: "#059669",
                    danger: "#DC2626",
                    warning: "#EA580C",
                    dark: "#1F2937",
                },
                fonts: SANS,
            },
            ThemeName::Minimal => Theme {
                name,
                colors: Palette {
                    primary: "#000000",
                    secondary: "#6B7280",
                    success: "#000000",
                    danger: "#000000",
                    warning: "#000000",
                    dark: "#000000",
                },
                fonts: SANS,
            },
        }
    }

    /// Resolve a theme by name, falling back to the default preset
    pub fn resolve(name: &str) -> Self {
        match ThemeName::parse(name) {
            Some(theme) => Self::preset(theme),
            None => {
                warn!(requested = name, "Unknown export theme, using default");
                Self::preset(ThemeName::Default)
            }
        }
    }

    pub fn is_default(&self) -> bool {
        self.name == ThemeName::Default
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::preset(ThemeName::Default)
    }
}

/// Listing entry for theme pickers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInfo {
    pub name: &'static str,
    pub display_name: String,
    pub colors: Palette,
}

/// Every built-in preset with its display name and colors
pub fn available_themes() -> Vec<ThemeInfo> {
    ThemeName::all()
        .iter()
        .map(|name| ThemeInfo {
            name: name.as_str(),
            display_name: name.display_name(),
            colors: Theme::preset(*name).colors,
        })
        .collect()
}
