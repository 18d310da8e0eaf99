use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-train grid of seat occupancy flags: 0 = free, 1 = occupied.
///
/// Serialized transparently, so the on-disk shape is a plain JSON array of
/// arrays of 0/1. Dimensions are fixed at train creation; booking and
/// cancellation only flip flags, never resize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SeatMatrix(Vec<Vec<u8>>);

impl SeatMatrix {
    /// Grid of the given dimensions with every seat free.
    pub fn new(rows: usize, seats_per_row: usize) -> Self {
        Self(vec![vec![0; seats_per_row]; rows])
    }

    pub fn from_rows(rows: Vec<Vec<u8>>) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.0
    }

    fn in_bounds(&self, row: usize, seat: usize) -> bool {
        row < self.0.len() && seat < self.0[row].len()
    }

    /// True only for an in-bounds cell currently flagged free.
    pub fn is_free(&self, row: usize, seat: usize) -> bool {
        self.in_bounds(row, seat) && self.0[row][seat] == 0
    }

    /// Flip a free cell to occupied. Out-of-bounds and already-occupied
    /// cells both refuse without mutating anything.
    pub fn occupy(&mut self, row: usize, seat: usize) -> Result<(), SeatError> {
        if !self.in_bounds(row, seat) {
            return Err(SeatError::OutOfBounds { row, seat });
        }
        if self.0[row][seat] != 0 {
            return Err(SeatError::Occupied { row, seat });
        }
        self.0[row][seat] = 1;
        Ok(())
    }

    /// Flip a cell back to free. Releasing an already-free cell is a no-op.
    pub fn release(&mut self, row: usize, seat: usize) -> Result<(), SeatError> {
        if !self.in_bounds(row, seat) {
            return Err(SeatError::OutOfBounds { row, seat });
        }
        self.0[row][seat] = 0;
        Ok(())
    }

    /// Coordinates of every occupied cell, row-major.
    pub fn occupied_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (row, seats) in self.0.iter().enumerate() {
            for (seat, flag) in seats.iter().enumerate() {
                if *flag != 0 {
                    cells.push((row, seat));
                }
            }
        }
        cells
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeatError {
    #[error("seat ({row}, {seat}) is out of bounds")]
    OutOfBounds { row: usize, seat: usize },

    #[error("seat ({row}, {seat}) is already occupied")]
    Occupied { row: usize, seat: usize },
}

/// A scheduled train: its route as an ordered station sequence, the
/// timetable for those stations, and the seat grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Train {
    pub train_id: String,
    /// Ordered, lower-cased station codes. An earlier index is upstream
    /// of a later one.
    pub stations: Vec<String>,
    pub station_times: BTreeMap<String, String>,
    pub seats: SeatMatrix,
}

impl Train {
    pub fn new(
        train_id: impl Into<String>,
        stations: Vec<String>,
        station_times: BTreeMap<String, String>,
        seats: SeatMatrix,
    ) -> Self {
        Self {
            train_id: train_id.into(),
            stations: stations
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
            station_times,
            seats,
        }
    }

    /// Train identifiers match case-insensitively.
    pub fn matches_id(&self, train_id: &str) -> bool {
        self.train_id.eq_ignore_ascii_case(train_id)
    }

    /// Position of a (normalized) station code in the route, if served.
    pub fn station_index(&self, station: &str) -> Option<usize> {
        let station = station.trim().to_lowercase();
        self.stations.iter().position(|s| *s == station)
    }

    /// True when both stations are served and `source` is strictly
    /// upstream of `destination`. The comparison is strict, so a
    /// degenerate source == destination query never matches.
    pub fn serves_route(&self, source: &str, destination: &str) -> bool {
        match (self.station_index(source), self.station_index(destination)) {
            (Some(src), Some(dst)) => src < dst,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train_12951() -> Train {
        Train::new(
            "12951",
            vec!["delhi".to_string(), "jaipur".to_string(), "udaipur".to_string()],
            BTreeMap::new(),
            SeatMatrix::new(2, 2),
        )
    }

    #[test]
    fn test_route_direction_is_strict() {
        let train = train_12951();

        assert!(train.serves_route("jaipur", "udaipur"));
        assert!(train.serves_route("delhi", "udaipur"));
        assert!(!train.serves_route("udaipur", "jaipur"));
        assert!(!train.serves_route("jaipur", "jaipur"));
        assert!(!train.serves_route("jaipur", "mumbai"));
    }

    #[test]
    fn test_route_inputs_are_normalized() {
        let train = train_12951();
        assert!(train.serves_route("  Delhi ", "UDAIPUR"));
    }

    #[test]
    fn test_station_codes_canonicalized_on_construction() {
        let train = Train::new(
            "12951",
            vec![" Delhi".to_string(), "JAIPUR ".to_string()],
            BTreeMap::new(),
            SeatMatrix::new(1, 1),
        );
        assert_eq!(train.stations, vec!["delhi", "jaipur"]);
    }

    #[test]
    fn test_id_match_is_case_insensitive() {
        let train = Train::new(
            "RJD-1",
            vec![],
            BTreeMap::new(),
            SeatMatrix::new(1, 1),
        );
        assert!(train.matches_id("rjd-1"));
        assert!(!train.matches_id("rjd-2"));
    }

    #[test]
    fn test_occupy_and_release_flip_flags() {
        let mut seats = SeatMatrix::new(2, 2);

        assert!(seats.is_free(0, 0));
        seats.occupy(0, 0).unwrap();
        assert!(!seats.is_free(0, 0));
        assert_eq!(seats.rows(), &[vec![1, 0], vec![0, 0]]);

        seats.release(0, 0).unwrap();
        assert!(seats.is_free(0, 0));
    }

    #[test]
    fn test_occupy_rejects_taken_and_out_of_bounds() {
        let mut seats = SeatMatrix::new(2, 2);
        seats.occupy(0, 0).unwrap();

        assert!(matches!(seats.occupy(0, 0), Err(SeatError::Occupied { .. })));
        assert!(matches!(seats.occupy(2, 0), Err(SeatError::OutOfBounds { .. })));
        assert!(matches!(seats.occupy(0, 9), Err(SeatError::OutOfBounds { .. })));
        // Failed attempts must not have mutated the grid
        assert_eq!(seats.rows(), &[vec![1, 0], vec![0, 0]]);
    }

    #[test]
    fn test_occupied_cells_enumeration() {
        let mut seats = SeatMatrix::new(2, 3);
        seats.occupy(0, 2).unwrap();
        seats.occupy(1, 0).unwrap();

        assert_eq!(seats.occupied_cells(), vec![(0, 2), (1, 0)]);
    }

    #[test]
    fn test_seat_matrix_serializes_as_bare_grid() {
        let mut seats = SeatMatrix::new(2, 2);
        seats.occupy(0, 0).unwrap();

        let json = serde_json::to_string(&seats).unwrap();
        assert_eq!(json, "[[1,0],[0,0]]");

        let back: SeatMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seats);
    }
}
