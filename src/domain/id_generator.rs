use super::todo::TodoId;

/// Width every generated id is left-padded to. Longer values simply grow.
pub const ID_WIDTH: usize = 3;

/// Monotonic source of fixed-width numeric ids ("002", "003", ...).
///
/// The counter only moves forward, so an id handed out once is never handed
/// out again, even after the record that carried it is deleted.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Starts the sequence at `first`; the first call to [`IdGenerator::next`] yields it.
    pub fn starting_at(first: u64) -> Self { Self { next: first } }

    pub fn next(&mut self) -> TodoId {
        let id = TodoId::from_number(self.next);
        self.next += 1;
        id
    }
}
