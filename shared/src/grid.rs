//! On-chain game state types.
//!
//! These mirror the component values the chain node serves for a spawned
//! entity. The grid world is a separate state machine from the local visual
//! avatar; nothing here feeds the kinematic integrator.

use serde::{Deserialize, Serialize};

/// Grid directions the on-chain game accepts for a move.
///
/// The numeric codes are part of the wire contract (0 is reserved for
/// "none"); do not reorder.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left = 1,
    Right = 2,
    Up = 3,
    Down = 4,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Wire code for the `move` call.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a wire code. Returns `None` for 0 (reserved) and unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Direction::Left),
            2 => Some(Direction::Right),
            3 => Some(Direction::Up),
            4 => Some(Direction::Down),
            _ => None,
        }
    }

    /// Human-readable label, also the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Down => "Down",
        }
    }
}

/// Grid coordinates of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridVec {
    pub x: u32,
    pub y: u32,
}

/// The `Position` component: where the entity sits on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub vec: GridVec,
}

/// The `Moves` component: how many moves remain and the last one taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moves {
    pub remaining: u8,
    pub last_direction: Option<Direction>,
}

/// The `DirectionsAvailable` component: directions the game currently
/// permits. Distinct from the local avatar's unrestricted visual movement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionsAvailable {
    pub directions: Vec<Direction>,
}

/// Client-side guard for a grid move: `true` when the world border blocks it.
///
/// `Up` and `Left` walk toward the low edge of the grid and are blocked at
/// zero, or before the entity has spawned. `Right` and `Down` are never
/// blocked client-side; the chain enforces the far edges.
pub fn border_blocks_move(position: Option<&Position>, direction: Direction) -> bool {
    match direction {
        Direction::Up => position.map(|p| p.vec.y == 0).unwrap_or(true),
        Direction::Left => position.map(|p| p.vec.x == 0).unwrap_or(true),
        Direction::Right | Direction::Down => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_codes_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
    }

    #[test]
    fn direction_codes_match_wire_contract() {
        assert_eq!(Direction::Left.code(), 1);
        assert_eq!(Direction::Right.code(), 2);
        assert_eq!(Direction::Up.code(), 3);
        assert_eq!(Direction::Down.code(), 4);
    }

    #[test]
    fn reserved_and_unknown_codes_are_rejected() {
        assert_eq!(Direction::from_code(0), None);
        assert_eq!(Direction::from_code(5), None);
        assert_eq!(Direction::from_code(u8::MAX), None);
    }

    #[test]
    fn labels_are_the_serialized_form() {
        for dir in Direction::ALL {
            let json = serde_json::to_string(&dir).unwrap();
            assert_eq!(json, format!("\"{}\"", dir.label()));
        }
    }

    #[test]
    fn border_guard_suppresses_up_at_the_top_edge() {
        let at_edge = Position {
            vec: GridVec { x: 5, y: 0 },
        };
        assert!(border_blocks_move(Some(&at_edge), Direction::Up));

        let inside = Position {
            vec: GridVec { x: 5, y: 1 },
        };
        assert!(!border_blocks_move(Some(&inside), Direction::Up));
    }

    #[test]
    fn border_guard_suppresses_left_at_the_low_x_edge() {
        let at_edge = Position {
            vec: GridVec { x: 0, y: 5 },
        };
        assert!(border_blocks_move(Some(&at_edge), Direction::Left));
        assert!(!border_blocks_move(Some(&at_edge), Direction::Right));
        assert!(!border_blocks_move(Some(&at_edge), Direction::Down));
    }

    #[test]
    fn border_guard_blocks_guarded_moves_before_spawn() {
        assert!(border_blocks_move(None, Direction::Up));
        assert!(border_blocks_move(None, Direction::Left));
        assert!(!border_blocks_move(None, Direction::Right));
        assert!(!border_blocks_move(None, Direction::Down));
    }

    #[test]
    fn moves_component_tolerates_null_last_direction() {
        let moves: Moves = serde_json::from_str(r#"{"remaining":100,"last_direction":null}"#).unwrap();
        assert_eq!(moves.remaining, 100);
        assert_eq!(moves.last_direction, None);

        let moves: Moves = serde_json::from_str(r#"{"remaining":42,"last_direction":"Up"}"#).unwrap();
        assert_eq!(moves.last_direction, Some(Direction::Up));
    }
}
