//! Wall-kick tables and the rotation resolver.
//!
//! Each rotation tries up to five positional offsets in order and keeps the
//! first one that does not collide. Offsets are `(dx, dy)` with +y pointing
//! down the arena. The I-piece has its own table; every other kind (O
//! included) uses the JLSTZ table.

use super::{
    arena::Arena,
    piece::{Piece, PieceKind, PieceRotation, RotationDirection},
};

/// A positional offset `(dx, dy)` tried during rotation.
pub type Kick = (i32, i32);

type KickTable = [[[Kick; 5]; 2]; 4];

const fn direction_index(direction: RotationDirection) -> usize {
    match direction {
        RotationDirection::Clockwise => 0,
        RotationDirection::CounterClockwise => 1,
    }
}

/// Indexed by `[from][direction]`.
static JLSTZ_KICKS: KickTable = [
    [
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // 0>1
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // 0>3
    ],
    [
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)], // 1>2
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)], // 1>0
    ],
    [
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // 2>3
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // 2>1
    ],
    [
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)], // 3>0
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)], // 3>2
    ],
];

static I_KICKS: KickTable = [
    [
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // 0>1
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // 0>3
    ],
    [
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // 1>2
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // 1>0
    ],
    [
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // 2>3
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // 2>1
    ],
    [
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // 3>0
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // 3>2
    ],
];

/// Returns the kick candidates for rotating `kind` away from `from`.
#[must_use]
pub fn kick_offsets(
    kind: PieceKind,
    from: PieceRotation,
    direction: RotationDirection,
) -> &'static [Kick; 5] {
    let table = match kind {
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    &table[from.as_usize()][direction_index(direction)]
}

pub(crate) fn kick_rotation(
    arena: &Arena,
    piece: Piece,
    direction: RotationDirection,
) -> Option<Piece> {
    let rotated = piece.rotated(direction);
    kick_offsets(piece.kind(), piece.rotation(), direction)
        .iter()
        .map(|&(dx, dy)| rotated.shifted(dx, dy))
        .find(|candidate| !arena.is_colliding(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{arena::Cell, piece::PiecePosition};

    #[test]
    fn test_i_piece_uses_its_own_table() {
        let cw = kick_offsets(
            PieceKind::I,
            PieceRotation::SPAWN,
            RotationDirection::Clockwise,
        );
        assert_eq!(cw[1], (-2, 0));
        let t = kick_offsets(
            PieceKind::T,
            PieceRotation::SPAWN,
            RotationDirection::Clockwise,
        );
        assert_eq!(t[1], (-1, 0));
        let o = kick_offsets(
            PieceKind::O,
            PieceRotation::new(3),
            RotationDirection::CounterClockwise,
        );
        assert_eq!(o, &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]);
    }

    #[test]
    fn test_every_table_starts_with_identity() {
        for kind in PieceKind::ALL {
            for from in 0..4 {
                for direction in [
                    RotationDirection::Clockwise,
                    RotationDirection::CounterClockwise,
                ] {
                    let kicks = kick_offsets(kind, PieceRotation::new(from), direction);
                    assert_eq!(kicks[0], (0, 0));
                }
            }
        }
    }

    #[test]
    fn test_unobstructed_rotation_needs_no_kick() {
        let arena = Arena::new(10, 20);
        let piece = Piece::new(PieceKind::T, PieceRotation::SPAWN, PiecePosition::new(4, 5));
        let rotated = piece
            .super_rotated(RotationDirection::Clockwise, &arena)
            .unwrap();
        assert_eq!(rotated.rotation(), PieceRotation::new(1));
        assert_eq!(rotated.position(), piece.position());
    }

    #[test]
    fn test_four_clockwise_rotations_are_identity() {
        let arena = Arena::new(10, 20);
        for kind in PieceKind::ALL {
            let start = Piece::new(kind, PieceRotation::SPAWN, PiecePosition::new(3, 8));
            let mut piece = start;
            for _ in 0..4 {
                piece = piece
                    .super_rotated(RotationDirection::Clockwise, &arena)
                    .unwrap();
            }
            assert_eq!(piece, start, "{kind:?}");
        }
    }

    #[test]
    fn test_blocked_rotation_uses_first_free_kick() {
        let mut arena = Arena::new(10, 10);
        // Blocks the stem of the unkicked clockwise T.
        arena.set_cell(3, 7, Cell::Piece(PieceKind::O));
        let piece = Piece::new(PieceKind::T, PieceRotation::SPAWN, PiecePosition::new(3, 5));
        assert!(arena.is_colliding(&piece.rotated(RotationDirection::Clockwise)));

        let rotated = piece
            .super_rotated(RotationDirection::Clockwise, &arena)
            .unwrap();
        assert_eq!(rotated.rotation(), PieceRotation::new(1));
        assert_eq!(rotated.position(), PiecePosition::new(2, 5));
    }

    #[test]
    fn test_rotation_fails_when_every_kick_collides() {
        let mut arena = Arena::new(10, 6);
        let piece = Piece::new(PieceKind::T, PieceRotation::SPAWN, PiecePosition::new(3, 3));
        let free: Vec<_> = piece.occupied_positions().collect();
        for y in 0..6 {
            for x in 0..10 {
                let pos = (i32::try_from(x).unwrap(), i32::try_from(y).unwrap());
                if !free.contains(&pos) {
                    arena.set_cell(x, y, Cell::Piece(PieceKind::Z));
                }
            }
        }
        assert!(!arena.is_colliding(&piece));
        assert_eq!(
            piece.super_rotated(RotationDirection::Clockwise, &arena),
            None
        );
        assert_eq!(
            piece.super_rotated(RotationDirection::CounterClockwise, &arena),
            None
        );
    }
}
