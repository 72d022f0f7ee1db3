//! Selection operators

use rand::seq::index;
use rand::Rng;

use crate::operators::traits::SelectionOperator;

/// Tournament selection operator
///
/// Draws `tournament_size` distinct individuals and returns the one with the
/// lowest fitness. NaN fitness never wins against a number.
#[derive(Clone, Debug)]
pub struct TournamentSelection {
    /// Tournament size (number of individuals competing)
    pub tournament_size: usize,
}

impl TournamentSelection {
    /// Create a new tournament selection with the given size; sizes below one
    /// are raised to one
    pub fn new(tournament_size: usize) -> Self {
        Self {
            tournament_size: tournament_size.max(1),
        }
    }

    /// Create binary tournament selection (size = 2)
    pub fn binary() -> Self {
        Self::new(2)
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self::new(3)
    }
}

impl SelectionOperator for TournamentSelection {
    fn select<R: Rng>(&self, fitness: &[f64], rng: &mut R) -> usize {
        if fitness.is_empty() {
            return 0;
        }
        let size = self.tournament_size.min(fitness.len());
        index::sample(rng, fitness.len(), size)
            .into_iter()
            .reduce(|best, i| if beats(fitness[i], fitness[best]) { i } else { best })
            .unwrap_or(0)
    }
}

fn beats(a: f64, b: f64) -> bool {
    a < b || (b.is_nan() && !a.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_full_tournament_picks_minimum() {
        let mut rng = StdRng::seed_from_u64(42);
        let fitness = [3.0, 0.5, 2.0, 9.0];
        let selection = TournamentSelection::new(4);
        for _ in 0..20 {
            assert_eq!(selection.select(&fitness, &mut rng), 1);
        }
    }

    #[test]
    fn test_tournament_size_is_clamped() {
        let mut rng = StdRng::seed_from_u64(42);
        let selection = TournamentSelection::new(10);
        assert_eq!(selection.select(&[4.0, 1.0], &mut rng), 1);
        assert_eq!(TournamentSelection::new(0).tournament_size, 1);
    }

    #[test]
    fn test_nan_never_beats_number() {
        let mut rng = StdRng::seed_from_u64(42);
        let fitness = [f64::NAN, 7.0, f64::NAN];
        for _ in 0..20 {
            assert_eq!(TournamentSelection::new(3).select(&fitness, &mut rng), 1);
        }
    }

    #[test]
    fn test_selection_pressure() {
        let mut rng = StdRng::seed_from_u64(42);
        let fitness: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let picks = TournamentSelection::binary().select_many(&fitness, 1000, &mut rng);
        let mean = picks.iter().sum::<usize>() as f64 / picks.len() as f64;
        // uniform picking would average 4.5
        assert!(mean < 4.0);
    }
}
