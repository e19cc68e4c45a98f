//! Predicate search over an error's `source()` chain.
//!
//! Wrapping layers are caller-controlled, so nothing here assumes a fixed
//! depth: every search starts at the error itself and follows
//! [`Error::source`] until it runs out.

use std::error::Error;

/// Iterator over an error and each error it wraps, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Walk `err` and everything it wraps.
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Return the first link of the chain that is a `T`.
pub fn find_source<'a, T>(err: &'a (dyn Error + 'static)) -> Option<&'a T>
where
    T: Error + 'static,
{
    chain(err).find_map(|link| link.downcast_ref::<T>())
}

/// Returns `true` if any link of the chain satisfies `pred`.
pub fn any_source<P>(err: &(dyn Error + 'static), pred: P) -> bool
where
    P: FnMut(&(dyn Error + 'static)) -> bool,
{
    chain(err).any(pred)
}
