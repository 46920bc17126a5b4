use crate::grid::{Coord, Grid};
use crate::random::RandomSource;

/// Samples the daily contacts of an agent from a square window around it.
pub struct ContactSampler<'a> {
    grid: &'a Grid,
}

impl<'a> ContactSampler<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Draw `count` contacts within `radius` of `origin`, with replacement.
    ///
    /// Offsets landing on the origin or outside the grid are redrawn without
    /// limit, so `radius` and `count` must leave some neighbor reachable.
    pub fn sample<R: RandomSource>(
        &self,
        origin: Coord,
        radius: u32,
        count: u32,
        rng: &mut R,
    ) -> Vec<Coord> {
        let mut contacts = Vec::with_capacity(count as usize);
        if radius == 0 || count == 0 {
            return contacts;
        }

        let radius = radius as i64;
        while contacts.len() < count as usize {
            let d_row = rng.uniform_int(-radius, radius);
            let d_col = rng.uniform_int(-radius, radius);
            if d_row == 0 && d_col == 0 {
                continue;
            }

            let row = origin.row as i64 + d_row;
            let col = origin.col as i64 + d_col;
            if !self.grid.contains(row, col) {
                continue;
            }
            contacts.push(Coord::new(row as usize, col as usize));
        }
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ChaChaSource, stub::StubSource};

    #[test]
    fn zero_radius_or_count_is_empty() {
        let grid = Grid::new(5, 5).unwrap();
        let sampler = ContactSampler::new(&grid);
        let mut rng = StubSource::new();
        assert!(sampler.sample(Coord::new(2, 2), 0, 4, &mut rng).is_empty());
        assert!(sampler.sample(Coord::new(2, 2), 2, 0, &mut rng).is_empty());
    }

    #[test]
    fn rejects_origin_and_out_of_bounds() {
        let grid = Grid::new(3, 3).unwrap();
        let sampler = ContactSampler::new(&grid);
        // (0, 0) is the origin, (-1, -1) leaves the grid, (1, 1) is accepted.
        let mut rng = StubSource::scripted(vec![0, 0, -1, -1, 1, 1]);
        let contacts = sampler.sample(Coord::new(0, 0), 1, 1, &mut rng);
        assert_eq!(contacts, vec![Coord::new(1, 1)]);
    }

    #[test]
    fn samples_with_replacement() {
        let grid = Grid::new(3, 3).unwrap();
        let sampler = ContactSampler::new(&grid);
        let mut rng = StubSource::scripted(vec![0, 1, 0, 1]);
        let contacts = sampler.sample(Coord::new(1, 1), 1, 2, &mut rng);
        assert_eq!(contacts, vec![Coord::new(1, 2), Coord::new(1, 2)]);
    }

    #[test]
    fn contacts_stay_in_window() {
        let grid = Grid::new(6, 4).unwrap();
        let sampler = ContactSampler::new(&grid);
        let mut rng = ChaChaSource::from_seed(3);
        for agt in grid.iter() {
            let origin = agt.coord();
            let contacts = sampler.sample(origin, 2, 10, &mut rng);
            assert_eq!(contacts.len(), 10);
            for contact in contacts {
                assert_ne!(contact, origin);
                assert!(contact.row < grid.rows() && contact.col < grid.cols());
                assert!(contact.row.abs_diff(origin.row) <= 2);
                assert!(contact.col.abs_diff(origin.col) <= 2);
            }
        }
    }
}
