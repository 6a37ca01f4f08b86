use std::fmt;

pub use Nucleotide::*;

/// DNA bases in the order they appear along matrix headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

/// Number of symbols in the alphabet.
pub const ALPHABET_SIZE: usize = 4;

/// Number of ordered (source, destination) pairs with source != destination.
pub const PAIR_COUNT: usize = ALPHABET_SIZE * (ALPHABET_SIZE - 1);

impl Nucleotide {
    pub const ALL: [Nucleotide; ALPHABET_SIZE] = [A, C, G, T];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            A => "A",
            C => "C",
            G => "G",
            T => "T",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.symbol() == s)
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An ordered substitution from one base to a different base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pair {
    pub source: Nucleotide,
    pub dest: Nucleotide,
}

impl Pair {
    /// Label used for result columns, e.g. `A -> C`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

/// All off-diagonal pairs, source major, destination minor.
pub fn pairs() -> impl Iterator<Item = Pair> {
    Nucleotide::ALL.into_iter().flat_map(|source| {
        Nucleotide::ALL
            .into_iter()
            .filter(move |&dest| dest != source)
            .map(move |dest| Pair { source, dest })
    })
}
