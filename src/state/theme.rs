//! Built-in symbol pools.

use super::sequence::Symbol;

/// A named set of distinct symbols to play with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub symbols: &'static [&'static str],
}

/// Catalog offered by the setup screen. The first entry is the default.
pub const THEMES: &[Theme] = &[
    Theme {
        name: "Animals",
        symbols: &["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁"],
    },
    Theme {
        name: "Fruits",
        symbols: &["🍎", "🍐", "🍊", "🍋", "🍌", "🍉", "🍇", "🍓", "🍒", "🍑", "🥝"],
    },
    Theme {
        name: "Space",
        symbols: &["🚀", "🌍", "🌙", "⭐", "☄️", "🪐", "🛸", "🌞", "🌌", "👽", "🛰️"],
    },
    Theme {
        name: "Sports",
        symbols: &["⚽", "🏀", "🏈", "⚾", "🎾", "🏐", "🏉", "🎱", "🏓", "🏸", "🥊"],
    },
    Theme {
        name: "Weather",
        symbols: &["☀️", "⛅", "☁️", "🌧️", "⛈️", "🌩️", "❄️", "🌈", "🌪️", "🌫️"],
    },
];

impl Theme {
    /// Look up a built-in theme, ignoring case.
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        THEMES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &THEMES[0]
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        THEMES.iter().map(|t| t.name)
    }

    /// Symbols ready to hand to the engine.
    pub fn pool(&self) -> Vec<Symbol> {
        self.symbols.iter().map(|s| Symbol::new(*s)).collect()
    }

    /// First few symbols, for a setup-screen preview.
    pub fn preview(&self, count: usize) -> &'static [&'static str] {
        &self.symbols[..count.min(self.symbols.len())]
    }
}
