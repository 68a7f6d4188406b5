use crate::common::{NonZeroUInt, UInt};
use rand::Rng;

/// A source of uniformly distributed die results.
pub trait Roller {
    /// Returns a value in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }
}

/// Adapts a closure taking the number of sides into a [Roller].
///
/// Results outside `1..=sides` are folded back into range.
///
/// ```
/// use dice_notation::roll::FnRoller;
///
/// let result = dice_notation::evaluate_with("d20", FnRoller(|_| 15)).unwrap();
/// assert_eq!(result.total, 15);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct FnRoller<F>(pub F);

impl<F: FnMut(UInt) -> UInt> Roller for FnRoller<F> {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        fold((self.0)(sides.get()), sides)
    }
}

fn fold(value: UInt, sides: NonZeroUInt) -> UInt {
    value.wrapping_sub(1) % sides.get() + 1
}

#[cfg(test)]
pub(crate) use sequence::SequenceRoller;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::faces;
    use rand::SeedableRng;

    #[test]
    fn test_rng_roller_in_range() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let x = rng.roll(faces(6));
            assert!((1..=6).contains(&x));
        }
        assert_eq!(rng.roll(faces(1)), 1);
    }

    #[test]
    fn test_fn_roller_folds() {
        let mut roller = FnRoller(|_| 9);
        assert_eq!(roller.roll(faces(6)), 3);
        assert_eq!(roller.roll(faces(20)), 9);
        let mut roller = FnRoller(|_| 0);
        assert_eq!(roller.roll(faces(6)), 4);
    }

    #[test]
    fn test_sequence_roller_cycles() {
        let mut roller = SequenceRoller::new([1, 2, 3]);
        let drawn: Vec<_> = (0..5).map(|_| roller.roll(faces(6))).collect();
        assert_eq!(drawn, vec![1, 2, 3, 1, 2]);
    }
}
