/// Identifier the surrounding application assigns to a user.
pub type UserId = u64;

/// Records that carry a monetary amount.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Sums the amounts of the given records.
pub fn total_amount<'a, T, I>(items: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(Amounted::amount).sum()
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
pub use uuid;
