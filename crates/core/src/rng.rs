//! RNG module - shared piece sequence
//!
//! Both boards of a session draw from the same pre-generated sequence of
//! pieces. A board only keeps an index into it, so two boards at the same index
//! always see the same piece and can be kept in sync across restarts.
//!
//! The sequence is produced by a small LCG so the same seed always yields
//! the same game.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        (self.next_u32() >> 16) % max.max(1)
    }
}

/// Immutable, pre-generated run of random pieces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSequence {
    seed: u32,
    pieces: Vec<PieceKind>,
}

impl PieceSequence {
    /// Generate `len` uniformly random pieces from `seed`
    pub fn generate(seed: u32, len: usize) -> Self {
        let mut rng = SimpleRng::new(seed);
        let pieces = (0..len.max(1))
            .map(|_| PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize])
            .collect();
        Self { seed, pieces }
    }

    /// Use an explicit list of pieces (fixtures, replays)
    ///
    /// An empty list is replaced by a single straight piece.
    pub fn from_pieces(pieces: Vec<PieceKind>) -> Self {
        let pieces = if pieces.is_empty() {
            vec![PieceKind::Straight]
        } else {
            pieces
        };
        Self { seed: 0, pieces }
    }

    /// Piece at `index`, wrapping around the end of the sequence
    pub fn get(&self, index: usize) -> PieceKind {
        self.pieces[index % self.pieces.len()]
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}
