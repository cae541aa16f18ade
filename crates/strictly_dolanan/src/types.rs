//! Core domain types: players, cells and the main board.

use super::action::MoveError;
use super::variant::{BOARD_SIZE, Variant};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the two seats at the table.
///
/// Seat `Two` is the AI when the match is played in AI mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum PlayerId {
    /// First seat (index 0, blue).
    One,
    /// Second seat (index 1, red).
    Two,
}

impl PlayerId {
    /// Both seats in index order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Returns the opponent seat.
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Zero-based seat index, also the selector row owned by this seat.
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// Seat for a zero-based index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerId::One),
            1 => Some(PlayerId::Two),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.index())
    }
}

/// Display color tag of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerColor {
    /// Seat one.
    Blue,
    /// Seat two.
    Red,
}

impl From<PlayerId> for PlayerColor {
    fn from(id: PlayerId) -> Self {
        match id {
            PlayerId::One => PlayerColor::Blue,
            PlayerId::Two => PlayerColor::Red,
        }
    }
}

/// A position on the main board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Row index, 0 at the top.
    pub row: usize,
    /// Column index, 0 at the left.
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Steps `distance` cells along `(dr, dc)`, or `None` when leaving a `size`×`size` board.
    pub fn offset(self, dr: isize, dc: isize, distance: isize, size: usize) -> Option<Coord> {
        let row = self.row as isize + dr * distance;
        let col = self.col as isize + dc * distance;
        let bound = size as isize;
        if (0..bound).contains(&row) && (0..bound).contains(&col) {
            Some(Coord::new(row as usize, col as usize))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A valued board cell that can be claimed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    value: u8,
    owner: Option<PlayerId>,
}

impl Cell {
    /// Creates an unowned cell.
    pub fn new(value: u8) -> Self {
        Self { value, owner: None }
    }

    /// The cell's target value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// The player who claimed this cell, if any.
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Returns true if nobody has claimed the cell.
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }
}

/// Proof that a cell was just claimed on a board.
///
/// Only [`Board::claim`] creates this token, and it borrows the board it was
/// issued for, so win detection can never run against an uncommitted cell.
#[derive(Debug, Clone, Copy)]
pub struct CommittedPlacement<'b> {
    board: &'b Board,
    coord: Coord,
    player: PlayerId,
}

impl<'b> CommittedPlacement<'b> {
    /// Board the placement was committed on.
    pub fn board(&self) -> &'b Board {
        self.board
    }

    /// Claimed cell.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Player who claimed the cell.
    pub fn player(&self) -> PlayerId {
        self.player
    }
}

/// Square grid of valued cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    /// Cells in row-major order.
    cells: Vec<Cell>,
}

/// Wire form of [`Board`], checked before it becomes one.
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = String;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.size == 0 || raw.cells.len() != raw.size * raw.size {
            return Err(format!(
                "board of size {} needs {} cells, got {}",
                raw.size,
                raw.size * raw.size,
                raw.cells.len()
            ));
        }
        Ok(Self {
            size: raw.size,
            cells: raw.cells,
        })
    }
}

impl Board {
    /// Generates a fresh unowned board for the variant.
    ///
    /// Values are drawn independently; duplicates are expected so that one
    /// combined value can be satisfied by several cells.
    #[instrument(skip(rng))]
    pub fn generate<R: Rng + ?Sized>(variant: Variant, rng: &mut R) -> Self {
        let cells = (0..BOARD_SIZE * BOARD_SIZE)
            .map(|_| Cell::new(variant.random_value(rng)))
            .collect();
        Self {
            size: BOARD_SIZE,
            cells,
        }
    }

    /// Builds an unowned board from explicit row-major values.
    ///
    /// Returns `None` unless `values` holds exactly `size * size` entries.
    pub fn from_values(size: usize, values: &[u8]) -> Option<Self> {
        if size == 0 || values.len() != size * size {
            return None;
        }
        Some(Self {
            size,
            cells: values.iter().copied().map(Cell::new).collect(),
        })
    }

    /// Builds a board whose every cell holds `value`.
    pub fn filled(size: usize, value: u8) -> Self {
        Self {
            size,
            cells: vec![Cell::new(value); size * size],
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the coordinate lies on the board.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    /// Gets the cell at a coordinate.
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        if self.contains(coord) {
            self.cells.get(coord.row * self.size + coord.col)
        } else {
            None
        }
    }

    /// Owner of the cell at a coordinate (none when free or off-board).
    pub fn owner_at(&self, coord: Coord) -> Option<PlayerId> {
        self.get(coord).and_then(Cell::owner)
    }

    /// Iterates over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (Coord::new(i / size, i % size), cell))
    }

    /// All free cells whose value equals `value`, in row-major order.
    #[instrument(skip(self))]
    pub fn cells_with_value(&self, value: u8) -> Vec<Coord> {
        self.iter()
            .filter(|(_, cell)| cell.is_free() && cell.value() == value)
            .map(|(coord, _)| coord)
            .collect()
    }

    /// Returns true if at least one free cell holds `value`.
    pub fn has_free_value(&self, value: u8) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.is_free() && cell.value() == value)
    }

    /// Number of cells owned by `player`.
    pub fn owned_count(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.owner() == Some(player))
            .count()
    }

    /// Returns true if every cell is owned.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_free())
    }

    /// Assigns a free cell to `player`.
    ///
    /// Ownership is write-once: claiming an owned cell fails and leaves the
    /// board untouched.
    pub fn claim(
        &mut self,
        coord: Coord,
        player: PlayerId,
    ) -> Result<CommittedPlacement<'_>, MoveError> {
        if !self.contains(coord) {
            return Err(MoveError::CellOutOfRange(coord));
        }
        let index = coord.row * self.size + coord.col;
        let cell = self.cells.get_mut(index).ok_or(MoveError::CellOutOfRange(coord))?;
        if cell.owner.is_some() {
            return Err(MoveError::CellOwned(coord));
        }
        cell.owner = Some(player);
        Ok(CommittedPlacement {
            board: self,
            coord,
            player,
        })
    }

    /// Formats the board as text: values, with owned cells shown as `A`/`B`.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..self.size {
            let line = (0..self.size)
                .map(|col| match self.get(Coord::new(row, col)) {
                    Some(cell) => match cell.owner() {
                        Some(PlayerId::One) => " A".to_string(),
                        Some(PlayerId::Two) => " B".to_string(),
                        None => format!("{:>2}", cell.value()),
                    },
                    None => "  ".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            result.push_str(&line);
            if row + 1 < self.size {
                result.push('\n');
            }
        }
        result
    }
}

/// A seat's record: name, color and selector-track state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    color: PlayerColor,
    pion: Option<usize>,
    pions_on_board: u32,
}

impl Player {
    /// Creates a player with no pion placed yet.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: id.into(),
            pion: None,
            pions_on_board: 0,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color tag.
    pub fn color(&self) -> PlayerColor {
        self.color
    }

    /// Selector column of this seat's pion.
    pub fn pion(&self) -> Option<usize> {
        self.pion
    }

    /// Number of board cells this player has claimed.
    pub fn pions_on_board(&self) -> u32 {
        self.pions_on_board
    }

    pub(crate) fn set_pion(&mut self, column: usize) {
        self.pion = Some(column);
    }

    pub(crate) fn record_placement(&mut self) {
        self.pions_on_board += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generated_board_is_unowned_and_in_domain() {
        let mut rng = StdRng::seed_from_u64(42);
        for variant in [Variant::Sum, Variant::Product] {
            let board = Board::generate(variant, &mut rng);
            assert_eq!(board.size(), BOARD_SIZE);
            assert_eq!(board.iter().count(), BOARD_SIZE * BOARD_SIZE);
            assert!(board.iter().all(|(_, cell)| cell.is_free()));
            assert!(board.iter().all(|(_, cell)| variant.is_valid_value(cell.value())));
        }
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = Board::generate(Variant::Sum, &mut StdRng::seed_from_u64(9));
        let b = Board::generate(Variant::Sum, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_deserialize_rejects_short_board() {
        let json = r#"{"size":10,"cells":[{"value":2,"owner":null}]}"#;
        assert!(serde_json::from_str::<Board>(json).is_err());

        let board = Board::filled(2, 4);
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);
    }

    #[test]
    fn test_cells_with_value_skips_owned_cells() {
        let mut board = Board::filled(3, 5);
        board.claim(Coord::new(1, 1), PlayerId::One).unwrap();
        let cells = board.cells_with_value(5);
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&Coord::new(1, 1)));
        assert!(board.cells_with_value(6).is_empty());
    }

    #[test]
    fn test_claim_is_write_once() {
        let mut board = Board::filled(4, 3);
        let coord = Coord::new(2, 3);
        assert!(board.claim(coord, PlayerId::Two).is_ok());
        assert_eq!(
            board.claim(coord, PlayerId::One).err(),
            Some(MoveError::CellOwned(coord))
        );
        assert_eq!(board.owner_at(coord), Some(PlayerId::Two));
    }

    #[test]
    fn test_claim_out_of_range() {
        let mut board = Board::filled(4, 3);
        let coord = Coord::new(4, 0);
        assert_eq!(
            board.claim(coord, PlayerId::One).err(),
            Some(MoveError::CellOutOfRange(coord))
        );
    }

    #[test]
    fn test_from_values_rejects_wrong_length() {
        assert!(Board::from_values(3, &[1, 2, 3]).is_none());
        let board = Board::from_values(2, &[1, 2, 3, 4]).unwrap();
        assert_eq!(board.get(Coord::new(1, 0)).map(Cell::value), Some(3));
    }

    #[test]
    fn test_offset_stays_on_board() {
        let c = Coord::new(0, 9);
        assert_eq!(c.offset(0, 1, 1, 10), None);
        assert_eq!(c.offset(1, -1, 2, 10), Some(Coord::new(2, 7)));
    }

    #[test]
    fn test_display_marks_owners() {
        let mut board = Board::from_values(2, &[4, 12, 7, 9]).unwrap();
        board.claim(Coord::new(0, 1), PlayerId::Two).unwrap();
        assert_eq!(board.display(), " 4  B\n 7  9");
    }
}
