use crate::{
    CompletePieceDropError, HoldError, PieceCollisionError,
    core::{
        arena::Arena,
        piece::{Piece, PieceKind, RotationDirection},
    },
};

use super::piece_queue::PieceQueue;

/// Per-piece game state: arena, falling piece, queue and hold slot.
///
/// All piece manipulation is validated against the arena: a rejected
/// operation returns an error and leaves the field unchanged. Spawning is the
/// exception: a piece that collides at spawn is still placed, and the error
/// reports a top-out.
#[derive(Debug, Clone)]
pub struct GameField {
    arena: Arena,
    falling_piece: Piece,
    piece_queue: PieceQueue,
    hold_used: bool,
}

impl GameField {
    /// Creates a field with an empty arena and spawns the first piece.
    #[must_use]
    pub fn new(arena: Arena, mut piece_queue: PieceQueue) -> Self {
        let falling_piece = Piece::spawn(piece_queue.pop_next(), arena.width());
        Self {
            arena,
            falling_piece,
            piece_queue,
            hold_used: false,
        }
    }

    /// Empties the arena, the queue and the hold slot, and spawns a fresh piece.
    pub fn reset(&mut self) {
        self.arena = Arena::new(self.arena.width(), self.arena.height());
        self.piece_queue.reset();
        self.falling_piece = Piece::spawn(self.piece_queue.pop_next(), self.arena.width());
        self.hold_used = false;
    }

    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.arena.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.piece_queue.held_piece()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_queue.next_pieces()
    }

    /// Landing position of the falling piece.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.falling_piece.simulate_drop_position(&self.arena)
    }

    pub fn try_move(&mut self, dx: i32) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.shifted(dx, 0))
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.down())
    }

    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), PieceCollisionError> {
        let piece = self
            .falling_piece
            .super_rotated(direction, &self.arena)
            .ok_or(PieceCollisionError)?;
        self.falling_piece = piece;
        Ok(())
    }

    /// Moves the falling piece to its landing position and returns the number
    /// of rows it fell. The piece is not locked.
    pub fn hard_drop(&mut self) -> usize {
        let ghost = self.ghost_piece();
        let distance = ghost.position().y() - self.falling_piece.position().y();
        self.falling_piece = ghost;
        usize::try_from(distance).unwrap_or(0)
    }

    /// Returns whether a hold would currently be accepted.
    ///
    /// Stowing into an empty slot is always accepted, even if the next piece
    /// then tops out; swapping is refused when the held piece would collide.
    #[must_use]
    pub fn can_hold(&self) -> bool {
        !self.hold_used
            && (self.held_piece().is_none()
                || !self.arena.is_colliding(&self.peek_falling_piece_after_hold()))
    }

    #[must_use]
    pub fn peek_falling_piece_after_hold(&self) -> Piece {
        Piece::spawn(self.piece_queue.peek_hold_result(), self.arena.width())
    }

    /// Swaps the falling piece with the hold slot (or the queue front when the
    /// slot is empty). Allowed once per piece.
    ///
    /// With an empty slot the next piece spawns like after a lock; if it
    /// collides, the hold still happens and [`HoldError::NewPieceCollision`]
    /// reports the top-out. A swap with an occupied slot is rejected when the
    /// held piece would collide.
    pub fn try_hold(&mut self) -> Result<(), HoldError> {
        if self.hold_used {
            return Err(HoldError::HoldAlreadyUsed);
        }
        let piece = self.peek_falling_piece_after_hold();
        let colliding = self.arena.is_colliding(&piece);
        if colliding && self.held_piece().is_some() {
            return Err(HoldError::PieceCollision(PieceCollisionError));
        }
        let kind = self.piece_queue.hold(self.falling_piece.kind());
        debug_assert_eq!(kind, piece.kind());
        self.falling_piece = piece;
        self.hold_used = true;
        if colliding {
            return Err(HoldError::NewPieceCollision);
        }
        Ok(())
    }

    /// Locks the falling piece, clears full rows and spawns the next piece.
    ///
    /// Returns the number of cleared rows together with the spawn result; on
    /// `Err` the new piece overlaps the arena and the game is over.
    pub fn complete_piece_drop(&mut self) -> (usize, Result<(), CompletePieceDropError>) {
        self.arena.fill_piece(&self.falling_piece);
        let cleared_lines = self.arena.clear_lines();

        self.falling_piece = Piece::spawn(self.piece_queue.pop_next(), self.arena.width());
        self.hold_used = false;
        if self.arena.is_colliding(&self.falling_piece) {
            return (
                cleared_lines,
                Err(CompletePieceDropError::NewPieceCollision),
            );
        }

        (cleared_lines, Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{arena::Cell, piece::PiecePosition},
        engine::piece_queue::Randomizer,
    };

    fn field(rows: &[&str], pieces: &[PieceKind]) -> GameField {
        GameField::new(
            Arena::from_rows(rows),
            PieceQueue::new(Randomizer::sequence(pieces.iter().copied())),
        )
    }

    fn empty_rows(width: usize, height: usize) -> Vec<String> {
        vec![".".repeat(width); height]
    }

    fn empty_field(pieces: &[PieceKind]) -> GameField {
        let rows = empty_rows(10, 8);
        let rows: Vec<_> = rows.iter().map(String::as_str).collect();
        field(&rows, pieces)
    }

    #[test]
    fn test_new_spawns_first_piece_centered() {
        let field = empty_field(&[PieceKind::T, PieceKind::I]);
        assert_eq!(field.falling_piece().kind(), PieceKind::T);
        assert_eq!(field.falling_piece().position(), PiecePosition::new(4, 0));
        assert_eq!(field.next_pieces().next(), Some(PieceKind::I));
    }

    #[test]
    fn test_move_stops_at_wall() {
        let mut field = empty_field(&[PieceKind::O]);
        for _ in 0..4 {
            field.try_move(-1).unwrap();
        }
        assert_eq!(field.falling_piece().position().x(), 0);
        assert!(field.try_move(-1).is_err());
        assert_eq!(field.falling_piece().position().x(), 0);
    }

    #[test]
    fn test_soft_drop_stops_at_floor() {
        let mut field = empty_field(&[PieceKind::O]);
        for _ in 0..6 {
            field.try_soft_drop().unwrap();
        }
        assert!(field.try_soft_drop().is_err());
        assert_eq!(field.falling_piece().position().y(), 6);
    }

    #[test]
    fn test_hard_drop_reports_distance() {
        let mut field = empty_field(&[PieceKind::I]);
        assert_eq!(field.hard_drop(), 7);
        assert_eq!(field.falling_piece().position().y(), 7);
        assert_eq!(field.hard_drop(), 0);
    }

    #[test]
    fn test_ghost_lands_on_stack() {
        let field = field(
            &[
                "..........", //
                "..........",
                "..........",
                "....ZZ....",
            ],
            &[PieceKind::O],
        );
        assert_eq!(field.ghost_piece().position(), PiecePosition::new(4, 1));
        assert_eq!(field.falling_piece().position().y(), 0);
    }

    #[test]
    fn test_hold_once_per_piece() {
        let mut field = empty_field(&[PieceKind::T, PieceKind::S, PieceKind::Z]);
        field.try_soft_drop().unwrap();

        field.try_hold().unwrap();
        assert_eq!(field.held_piece(), Some(PieceKind::T));
        assert_eq!(field.falling_piece().kind(), PieceKind::S);
        assert_eq!(field.falling_piece().position().y(), 0);
        assert!(!field.can_hold());
        assert!(matches!(field.try_hold(), Err(HoldError::HoldAlreadyUsed)));

        field.hard_drop();
        let (_, result) = field.complete_piece_drop();
        result.unwrap();
        assert_eq!(field.falling_piece().kind(), PieceKind::Z);
        field.try_hold().unwrap();
        assert_eq!(field.held_piece(), Some(PieceKind::Z));
        assert_eq!(field.falling_piece().kind(), PieceKind::T);
    }

    #[test]
    fn test_hold_into_blocked_spawn_tops_out() {
        let mut field = field(
            &[
                "..........", //
                "....Z.....",
                "..........",
                "..........",
            ],
            &[PieceKind::I, PieceKind::T],
        );
        assert!(field.can_hold());
        assert!(matches!(
            field.try_hold(),
            Err(HoldError::NewPieceCollision)
        ));
        assert_eq!(field.held_piece(), Some(PieceKind::I));
        assert_eq!(field.falling_piece().kind(), PieceKind::T);
        assert_eq!(field.falling_piece().position(), PiecePosition::new(4, 0));
        assert!(!field.can_hold());
    }

    #[test]
    fn test_hold_swap_rejected_when_held_piece_collides() {
        let mut field = field(
            &[
                "..........", //
                "..........",
                "..........",
                "..........",
            ],
            &[PieceKind::O, PieceKind::I, PieceKind::T],
        );
        field.try_hold().unwrap();
        field.hard_drop();
        field.complete_piece_drop().1.unwrap();
        assert_eq!(field.falling_piece().kind(), PieceKind::T);

        // Block the O spawn cells without touching the T.
        field.arena_mut().set_cell(4, 0, Cell::Piece(PieceKind::Z));
        let before = field.falling_piece();
        assert!(!field.can_hold());
        assert!(matches!(field.try_hold(), Err(HoldError::PieceCollision(_))));
        assert_eq!(field.falling_piece(), before);
        assert_eq!(field.held_piece(), Some(PieceKind::O));
    }

    #[test]
    fn test_complete_piece_drop_clears_lines() {
        let mut field = field(
            &[
                "..........", //
                "..........",
                "..........",
                "..........",
                "IIII..IIII",
                "IIII..IIII",
            ],
            &[PieceKind::O],
        );
        field.hard_drop();
        let (cleared, result) = field.complete_piece_drop();
        assert_eq!(cleared, 2);
        result.unwrap();
        assert!(field.arena().is_empty());
    }

    #[test]
    fn test_complete_piece_drop_detects_top_out() {
        let mut field = field(
            &[
                "..........", //
                "..........",
                "....JJ....",
                "JJJJJJJJJ.",
            ],
            &[PieceKind::O],
        );
        field.hard_drop();
        let (cleared, result) = field.complete_piece_drop();
        assert_eq!(cleared, 0);
        assert!(matches!(
            result,
            Err(CompletePieceDropError::NewPieceCollision)
        ));
    }

    #[test]
    fn test_reset_restores_empty_state() {
        let mut field = empty_field(&[PieceKind::L, PieceKind::J]);
        field.try_hold().unwrap();
        field.hard_drop();
        let _ = field.complete_piece_drop();

        field.reset();
        assert!(field.arena().is_empty());
        assert_eq!(field.held_piece(), None);
        assert_eq!(field.falling_piece().kind(), PieceKind::L);
        assert!(field.can_hold());
    }
}
