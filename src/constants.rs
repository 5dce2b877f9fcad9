//! Board geometry, starting layouts and timing constants for every cartridge.
//!
//! Coordinates are `(x, y)` with `x` counting columns from the left and `y`
//! counting rows from the top, matching the host's LED grid addressing.

// =============================================================================
// Checkers
// =============================================================================

/// Checkers board size (NxN).
pub const CHECKERS_SIZE: usize = 8;

/// Pieces each side starts with.
pub const CHECKERS_PIECES: usize = 12;

/// Rows occupied by Player One at the start. Player One moves toward row 0.
pub const CHECKERS_P1_ROWS: [usize; 3] = [5, 6, 7];

/// Rows occupied by Player Two at the start. Player Two moves toward row 7.
pub const CHECKERS_P2_ROWS: [usize; 3] = [0, 1, 2];

/// Per-player countdown length in seconds.
pub const CHECKERS_TURN_SECONDS: u32 = 1200;

// =============================================================================
// Chinese Checkers
// =============================================================================

/// Chinese checkers board size (NxN).
pub const CHINESE_CHECKERS_SIZE: usize = 8;

/// Pieces per side, which is also the score needed to win.
pub const CHINESE_CHECKERS_PIECES: u32 = 15;

/// Player One's home triangle is every cell with `x + y >= CHINESE_CHECKERS_P1_HOME_MIN`.
pub const CHINESE_CHECKERS_P1_HOME_MIN: usize = 10;

/// Player Two's home triangle is every cell with `x + y <= CHINESE_CHECKERS_P2_HOME_MAX`.
pub const CHINESE_CHECKERS_P2_HOME_MAX: usize = 4;

/// Per-player countdown length in seconds.
pub const CHINESE_CHECKERS_TURN_SECONDS: u32 = 1200;

// =============================================================================
// Go
// =============================================================================

/// Go board size (NxN).
pub const GO_SIZE: usize = 9;

/// Consecutive passes that end the game.
pub const GO_PASSES_TO_END: u8 = 2;

/// Per-player countdown length in seconds.
pub const GO_TURN_SECONDS: u32 = 3600;

// =============================================================================
// Straight Edge
// =============================================================================

/// Number of columns a disc can be dropped into.
pub const STRAIGHT_EDGE_COLS: usize = 7;

/// Number of rows. Row `STRAIGHT_EDGE_ROWS - 1` is the bottom.
pub const STRAIGHT_EDGE_ROWS: usize = 6;

/// Discs in a line needed to win.
pub const STRAIGHT_EDGE_LINE: usize = 4;

// =============================================================================
// Tile Flip
// =============================================================================

/// Default tile flip board size.
pub const TILE_FLIP_DEFAULT_SIZE: usize = 5;

/// Smallest selectable tile flip board.
pub const TILE_FLIP_MIN_SIZE: usize = 3;

/// Largest selectable tile flip board.
pub const TILE_FLIP_MAX_SIZE: usize = 9;

/// Start randomness levels (off, low, medium, high).
pub const TILE_FLIP_RANDOMNESS: [usize; 4] = [0, 10, 20, 30];

/// Host timer id used for the random-moves option.
pub const TILE_FLIP_RANDOM_TIMER: u8 = 0;

/// Period of the random-moves timer in milliseconds.
pub const TILE_FLIP_RANDOM_PERIOD_MS: u32 = 10_000;

/// Exclusive upper bound on presses made by one random-moves tick.
pub const TILE_FLIP_RANDOM_BURST: usize = 6;

/// Crazy Tile Flip always plays on a 5x5 board.
pub const CRAZY_TILE_FLIP_SIZE: usize = 5;

/// Most presses in a Crazy Tile Flip scramble.
pub const CRAZY_TILE_FLIP_MAX_SCRAMBLE: usize = 9;

/// Crazy Tile Flip score before the first press; each press costs a point.
pub const CRAZY_TILE_FLIP_START_SCORE: u32 = 1000;

/// Presses made by every Crazy Tile Flip timer tick.
pub const CRAZY_TILE_FLIP_BURST: usize = 2;

// =============================================================================
// Light Sequence
// =============================================================================

/// Board side for each difficulty (low, high).
pub const LIGHT_SEQUENCE_SIZES: [usize; 2] = [2, 3];

/// Length of the first sequence.
pub const LIGHT_SEQUENCE_START_LENGTH: u32 = 3;

/// Default wait between sequence lights in milliseconds.
pub const LIGHT_SEQUENCE_DEFAULT_DELAY_MS: u32 = 1000;

/// Step, floor and ceiling of the wait option.
pub const LIGHT_SEQUENCE_DELAY_STEP_MS: u32 = 250;
pub const LIGHT_SEQUENCE_MIN_DELAY_MS: u32 = 500;
pub const LIGHT_SEQUENCE_MAX_DELAY_MS: u32 = 3000;

/// Pause between a repeated sequence and the next, longer one.
pub const LIGHT_SEQUENCE_INTERMISSION_MS: u32 = 2000;

/// Longest a correctly pressed light stays on after a finished round.
pub const LIGHT_SEQUENCE_MAX_CLEAR_MS: u32 = 1000;

/// Host timer ids.
pub const LIGHT_SEQUENCE_SHOW_TIMER: u8 = 0;
pub const LIGHT_SEQUENCE_CLEAR_TIMER: u8 = 1;
pub const LIGHT_SEQUENCE_INTERMISSION_TIMER: u8 = 2;

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Orthogonal steps: North, East, South, West.
pub const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Diagonal steps: NE, SE, SW, NW.
pub const DIAGONAL: [(isize, isize); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// All 8 neighbor steps (orthogonal first, then diagonal).
pub const ALL_DIRECTIONS: [(isize, isize); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];
