use std::collections::HashMap;
use std::hash::Hash;

pub const VOTE_WEIGHT: f64 = 1.0;
pub const SHERIFF_VOTE_WEIGHT: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub enum TallyOutcome<K> {
    Winner(K),
    Tie(Vec<K>),
    Empty,
}

/// Accumulate-then-resolve vote counter. Keys with zero weight never win.
#[derive(Debug, Clone)]
pub struct VoteTally<K: Eq + Hash> {
    counts: HashMap<K, f64>,
}

impl<K: Eq + Hash + Clone> VoteTally<K> {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: K, weight: f64) {
        *self.counts.entry(key).or_insert(0.0) += weight;
    }

    pub fn weight_of(&self, key: &K) -> f64 {
        self.counts.get(key).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn resolve(&self) -> TallyOutcome<K> {
        let max = self
            .counts
            .values()
            .copied()
            .filter(|w| *w > 0.0)
            .fold(None, |acc: Option<f64>, w| match acc {
                Some(m) if m >= w => Some(m),
                _ => Some(w),
            });

        let Some(max) = max else {
            return TallyOutcome::Empty;
        };

        let mut leaders: Vec<K> = self
            .counts
            .iter()
            .filter(|(_, w)| **w == max)
            .map(|(k, _)| k.clone())
            .collect();

        if leaders.len() == 1 {
            TallyOutcome::Winner(leaders.remove(0))
        } else {
            TallyOutcome::Tie(leaders)
        }
    }
}

impl<K: Eq + Hash + Clone> Default for VoteTally<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone> FromIterator<(K, f64)> for VoteTally<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut tally = VoteTally::new();
        for (key, weight) in iter {
            tally.add(key, weight);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_leader_wins() {
        let mut tally = VoteTally::new();
        tally.add("a", VOTE_WEIGHT);
        tally.add("a", VOTE_WEIGHT);
        tally.add("b", VOTE_WEIGHT);
        assert_eq!(tally.resolve(), TallyOutcome::Winner("a"));
    }

    #[test]
    fn shared_maximum_is_a_tie() {
        let tally: VoteTally<&str> = [("a", 2.0), ("b", 2.0), ("c", 1.0)].into_iter().collect();
        match tally.resolve() {
            TallyOutcome::Tie(mut leaders) => {
                leaders.sort();
                assert_eq!(leaders, vec!["a", "b"]);
            }
            other => panic!("expected tie, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_zero_weight_tallies_have_no_winner() {
        let tally: VoteTally<&str> = VoteTally::new();
        assert_eq!(tally.resolve(), TallyOutcome::Empty);

        let zeros: VoteTally<&str> = [("a", 0.0), ("b", 0.0)].into_iter().collect();
        assert_eq!(zeros.resolve(), TallyOutcome::Empty);
    }

    #[test]
    fn sheriff_half_vote_breaks_a_tie() {
        let mut tally = VoteTally::new();
        tally.add("a", VOTE_WEIGHT);
        tally.add("b", SHERIFF_VOTE_WEIGHT);
        assert_eq!(tally.weight_of(&"b"), 1.5);
        assert_eq!(tally.resolve(), TallyOutcome::Winner("b"));
    }
}
