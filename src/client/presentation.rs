//! Sticky-note styling derived from a record id.
//!
//! Purely cosmetic: the same id always yields the same note, and nothing
//! here is ever sent back to the server.

use crate::domain::todo::TodoId;

pub const NOTE_COLORS: [&str; 5] = ["#fff9c4", "#ffe0e0", "#d7f9f1", "#e3ecff", "#fdebd3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteStyle {
    pub color: &'static str,
    /// Tilt in whole degrees, always within `-3..=3`.
    pub rotation: i32,
}

impl NoteStyle {
    pub fn for_id(id: &TodoId) -> Self { Self { color: note_color(id), rotation: note_rotation(id) } }
}

// Ids are zero-padded decimals; anything else styles like id 0.
fn numeric(id: &TodoId) -> u64 {
    id.as_str().trim().parse::<i64>().map(i64::unsigned_abs).unwrap_or(0)
}

pub fn note_color(id: &TodoId) -> &'static str {
    NOTE_COLORS[(numeric(id) % NOTE_COLORS.len() as u64) as usize]
}

pub fn note_rotation(id: &TodoId) -> i32 {
    (numeric(id).wrapping_mul(37) % 7) as i32 - 3
}
