use crate::parser::lexer::TokenKind;
use crossterm::style::{Color, Stylize};

pub struct Theme {
    pub keyword: Color,
    pub identifier: Color,
    pub number: Color,
    pub string: Color,
    pub comment: Color, // Grey
    pub symbol: Color,
    pub node: Color,     // Yellow for tree node labels
    pub position: Color, // Muted for line/column suffixes
}

pub const DEFAULT_THEME: Theme = Theme {
    keyword: Color::Rgb {
        r: 137,
        g: 180,
        b: 250,
    }, // Blue
    identifier: Color::Rgb {
        r: 205,
        g: 214,
        b: 244,
    },
    number: Color::Rgb {
        r: 250,
        g: 179,
        b: 135,
    }, // Orange
    string: Color::Rgb {
        r: 166,
        g: 227,
        b: 161,
    }, // Green
    comment: Color::Rgb {
        r: 108,
        g: 112,
        b: 134,
    },
    symbol: Color::Rgb {
        r: 148,
        g: 226,
        b: 213,
    }, // Cyan/teal
    node: Color::Rgb {
        r: 249,
        g: 226,
        b: 175,
    },
    position: Color::Rgb {
        r: 108,
        g: 112,
        b: 134,
    },
};

impl Theme {
    pub fn token_color(&self, kind: TokenKind) -> Color {
        match kind {
            TokenKind::ReservedWord => self.keyword,
            TokenKind::Identifier => self.identifier,
            TokenKind::Number => self.number,
            TokenKind::String => self.string,
            TokenKind::Comment => self.comment,
            TokenKind::Symbol => self.symbol,
        }
    }
}

/// A theme plus the decision whether to emit color at all
pub struct Palette<'a> {
    pub theme: &'a Theme,
    pub enabled: bool,
}

impl<'a> Palette<'a> {
    pub fn new(theme: &'a Theme, enabled: bool) -> Self {
        Self { theme, enabled }
    }

    pub fn plain() -> Palette<'static> {
        Palette::new(&DEFAULT_THEME, false)
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}
