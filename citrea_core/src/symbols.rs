use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct symbols on a reel. Score digits map one-to-one onto them.
pub const SYMBOL_COUNT: u8 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Symbol(u8);

const GLYPHS: [(&str, &str); SYMBOL_COUNT as usize] = [
    ("🍋", "Lemon"),
    ("🍊", "Orange"),
    ("🍇", "Grape"),
    ("🔔", "Bell"),
    ("⭐", "Star"),
    ("🍒", "Cherry"),
    ("🟫", "Bar"),
    ("7️⃣", "Seven"),
    ("🍀", "Clover"),
    ("👑", "Crown"),
];

impl Symbol {
    pub const SEVEN: Symbol = Symbol(7);
    pub const CHERRY: Symbol = Symbol(5);
    pub const BAR: Symbol = Symbol(6);

    pub const ALL: [Symbol; SYMBOL_COUNT as usize] = [
        Symbol(0),
        Symbol(1),
        Symbol(2),
        Symbol(3),
        Symbol(4),
        Symbol(5),
        Symbol(6),
        Symbol(7),
        Symbol(8),
        Symbol(9),
    ];

    pub fn new(id: u8) -> Option<Self> {
        (id < SYMBOL_COUNT).then_some(Symbol(id))
    }

    pub fn to_index(self) -> u8 {
        self.0
    }

    /// The digit this symbol occupies in an outcome score.
    pub fn to_digit(self) -> char {
        char::from(b'0' + self.0)
    }

    pub fn glyph(self) -> &'static str {
        GLYPHS[self.0 as usize].0
    }

    pub fn name(self) -> &'static str {
        GLYPHS[self.0 as usize].1
    }
}

impl TryFrom<u8> for Symbol {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Symbol::new(id).ok_or_else(|| format!("symbol id {id} out of range 0..{SYMBOL_COUNT}"))
    }
}

impl From<Symbol> for u8 {
    fn from(s: Symbol) -> u8 {
        s.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symbols that take part in bonus patterns even without forming a triple.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BonusSymbols {
    pub premium: Symbol,
    pub cherry: Symbol,
    pub bar: Symbol,
}

impl Default for BonusSymbols {
    fn default() -> Self {
        Self {
            premium: Symbol::SEVEN,
            cherry: Symbol::CHERRY,
            bar: Symbol::BAR,
        }
    }
}

impl BonusSymbols {
    /// Premium stays on seven; the table keys spell it out as "777".
    pub fn with_cherry_and_bar(cherry: Symbol, bar: Symbol) -> Result<Self, String> {
        if cherry == bar {
            return Err(format!("cherry and bar share symbol {cherry}"));
        }
        if cherry == Symbol::SEVEN || bar == Symbol::SEVEN {
            return Err("cherry and bar must differ from the premium symbol 7".to_string());
        }
        Ok(Self {
            premium: Symbol::SEVEN,
            cherry,
            bar,
        })
    }
}
