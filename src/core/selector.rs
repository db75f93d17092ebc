use crate::domain::model::{Card, DrawnCard};
use crate::utils::error::{Result, TarotError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Picks `n` cards with pairwise-distinct names, uniformly at random.
///
/// Repeated names in `deck` count once; the first record for a name wins.
/// Fails with [`TarotError::InsufficientDeckError`] when fewer than `n`
/// distinct names are available instead of retrying.
pub fn select_distinct<R: Rng + ?Sized>(deck: &[Card], n: usize, rng: &mut R) -> Result<Vec<Card>> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<&Card> = deck
        .iter()
        .filter(|card| seen.insert(card.name.as_str()))
        .collect();

    if candidates.len() < n {
        return Err(TarotError::InsufficientDeckError {
            required: n,
            available: candidates.len(),
        });
    }

    let (chosen, _) = candidates.partial_shuffle(rng, n);
    Ok(chosen.iter().map(|card| (*card).clone()).collect())
}

/// Unbiased coin flip for a card's orientation.
pub fn is_reversed<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen_bool(0.5)
}

pub fn draw_cards<R: Rng + ?Sized>(deck: &[Card], n: usize, rng: &mut R) -> Result<Vec<DrawnCard>> {
    let selected = select_distinct(deck, n, rng)?;
    Ok(selected
        .into_iter()
        .map(|card| {
            let reversed = is_reversed(&mut *rng);
            DrawnCard::new(card, reversed)
        })
        .collect())
}
