use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source de choix aléatoire injectée dans le générateur.
pub trait Chooser {
    /// Retourne un indice dans `0..len` ; `len` est toujours > 0.
    fn choose(&mut self, len: usize) -> usize;
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn choose(&mut self, len: usize) -> usize {
        (**self).choose(len)
    }
}

/// Choix uniforme à partir d'un générateur `rand`.
#[derive(Debug, Clone)]
pub struct RandomChooser<R = ThreadRng> {
    rng: R,
}

impl RandomChooser<ThreadRng> {
    pub fn thread() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomChooser<ThreadRng> {
    fn default() -> Self {
        Self::thread()
    }
}

impl RandomChooser<StdRng> {
    /// Tirage reproductible, à demander explicitement.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomChooser<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Chooser for RandomChooser<R> {
    fn choose(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}
