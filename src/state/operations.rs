//! Shallow merge of partial updates.

use crate::types::{Partial, State};

/// Shallow-merge a partial onto a state.
///
/// Keys in `partial` overwrite keys in `base`; every other key of `base`
/// is kept. Existing keys keep their position, new keys are appended.
pub fn merge(base: &State, partial: Partial) -> State {
    let mut merged = base.clone();
    merged.extend(partial);
    merged
}

/// Fold partials together in order; later keys win.
pub fn fold<I>(partials: I) -> Partial
where
    I: IntoIterator<Item = Partial>,
{
    partials.into_iter().fold(Partial::new(), |mut acc, partial| {
        acc.extend(partial);
        acc
    })
}
