use rand::rngs::StdRng;
use rand::Rng;

/// Source of bounded random indices, injectable so picks can be scripted.
pub trait RandomSource {
    /// A value in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Unseeded thread-local randomness.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&mut self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}

impl RandomSource for StdRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Picks a uniformly random index into a set of `len` records. When more than
/// one record exists the pick never equals `previous`.
pub fn pick(len: usize, previous: Option<usize>, rng: &mut dyn RandomSource) -> Option<usize> {
    match len {
        0 => None,
        1 => Some(0),
        _ => loop {
            let candidate = rng.next_index(len);
            if Some(candidate) != previous {
                break Some(candidate);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Replays a fixed sequence of indices.
    struct Scripted {
        values: Vec<usize>,
        at: usize,
    }

    impl RandomSource for Scripted {
        fn next_index(&mut self, bound: usize) -> usize {
            let value = self.values[self.at % self.values.len()] % bound;
            self.at += 1;
            value
        }
    }

    #[test]
    fn test_two_records_never_repeat() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut previous = None;
        for _ in 0..100 {
            let next = pick(2, previous, &mut rng).unwrap();
            assert_ne!(Some(next), previous);
            previous = Some(next);
        }
    }

    #[test]
    fn test_resamples_on_repeat() {
        let mut rng = Scripted {
            values: vec![1, 1, 1, 2],
            at: 0,
        };
        assert_eq!(pick(3, Some(1), &mut rng), Some(2));
        assert_eq!(rng.at, 4);
    }

    #[test]
    fn test_single_record_always_returned() {
        let mut rng = Scripted {
            values: vec![0],
            at: 0,
        };
        assert_eq!(pick(1, Some(0), &mut rng), Some(0));
        assert_eq!(pick(1, None, &mut rng), Some(0));
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(pick(0, None, &mut ThreadRandom), None);
    }
}
