//! Pixel neighbourhoods

/// Connectivity for region growing and labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 4-way connectivity (N, S, E, W)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

const FOUR_WAY: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

const EIGHT_WAY: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl Connectivity {
    /// Neighbour offsets (dx, dy) in raster order
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::FourWay => &FOUR_WAY,
            Connectivity::EightWay => &EIGHT_WAY,
        }
    }

    /// Offsets of neighbours that precede a pixel in raster order
    pub fn causal_offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::FourWay => &FOUR_WAY[..2],
            Connectivity::EightWay => &EIGHT_WAY[..4],
        }
    }

    /// In-bounds neighbours of (x, y) in a `width` x `height` grid
    pub fn neighbors(
        self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (u32, u32)> {
        self.offsets().iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx as i64;
            let ny = y as i64 + dy as i64;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                None
            } else {
                Some((nx as u32, ny as u32))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_neighbors() {
        assert_eq!(Connectivity::FourWay.neighbors(0, 0, 3, 3).count(), 2);
        assert_eq!(Connectivity::EightWay.neighbors(0, 0, 3, 3).count(), 3);
        assert_eq!(Connectivity::EightWay.neighbors(1, 1, 3, 3).count(), 8);
    }

    #[test]
    fn test_causal_offsets_precede() {
        for conn in [Connectivity::FourWay, Connectivity::EightWay] {
            for &(dx, dy) in conn.causal_offsets() {
                assert!(dy < 0 || (dy == 0 && dx < 0));
            }
        }
    }
}
