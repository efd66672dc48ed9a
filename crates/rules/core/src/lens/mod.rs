//! Composable get/update pairs over structured values.
//!
//! A lens focuses on one part of a larger value. Every lens in this crate obeys
//! two laws, for any source `s` and value `v` the update accepts:
//!
//! ```text
//! update(s, get(s)) == s      // writing back what was read changes nothing
//! get(update(s, v)) == v      // what was written is what is read
//! ```
//!
//! Updates return a new source and never mutate their input. They may fail
//! with a [`LensError`] when the value is outside what the field accepts.

mod error;

use std::marker::PhantomData;

pub use error::{LensError, RangeBound};

/// A law-abiding get/update pair from `Source` to `Target`.
pub trait Lens {
    type Source;
    type Target;

    /// Reads the focused value.
    fn get(&self, source: &Self::Source) -> Self::Target;

    /// Returns a copy of `source` with the focused value replaced by `value`.
    fn update(&self, source: &Self::Source, value: Self::Target)
    -> Result<Self::Source, LensError>;

    /// Focuses further into this lens' target with `inner`.
    fn then<L>(self, inner: L) -> Compose<Self, L>
    where
        Self: Sized,
        L: Lens<Source = Self::Target>,
    {
        Compose { outer: self, inner }
    }
}

impl<L: Lens + ?Sized> Lens for &L {
    type Source = L::Source;
    type Target = L::Target;

    fn get(&self, source: &Self::Source) -> Self::Target {
        (**self).get(source)
    }

    fn update(
        &self,
        source: &Self::Source,
        value: Self::Target,
    ) -> Result<Self::Source, LensError> {
        (**self).update(source, value)
    }
}

/// Two lenses chained: `outer` into a field, `inner` into that field's parts.
#[derive(Clone, Debug)]
pub struct Compose<A, B> {
    outer: A,
    inner: B,
}

impl<A, B> Lens for Compose<A, B>
where
    A: Lens,
    B: Lens<Source = A::Target>,
{
    type Source = A::Source;
    type Target = B::Target;

    fn get(&self, source: &Self::Source) -> Self::Target {
        self.inner.get(&self.outer.get(source))
    }

    fn update(
        &self,
        source: &Self::Source,
        value: Self::Target,
    ) -> Result<Self::Source, LensError> {
        let middle = self.outer.get(source);
        let middle = self.inner.update(&middle, value)?;
        self.outer.update(source, middle)
    }
}

/// A lens built from a pair of closures.
pub struct FnLens<S, T, G, U> {
    get: G,
    update: U,
    _marker: PhantomData<fn(&S) -> T>,
}

/// Builds a lens from `get` and `update` closures.
///
/// The closures are responsible for obeying the lens laws.
pub fn lens<S, T, G, U>(get: G, update: U) -> FnLens<S, T, G, U>
where
    G: Fn(&S) -> T,
    U: Fn(&S, T) -> Result<S, LensError>,
{
    FnLens {
        get,
        update,
        _marker: PhantomData,
    }
}

impl<S, T, G, U> Lens for FnLens<S, T, G, U>
where
    G: Fn(&S) -> T,
    U: Fn(&S, T) -> Result<S, LensError>,
{
    type Source = S;
    type Target = T;

    fn get(&self, source: &S) -> T {
        (self.get)(source)
    }

    fn update(&self, source: &S, value: T) -> Result<S, LensError> {
        (self.update)(source, value)
    }
}

/// Lifts a transform on a lens' target into a transform on its source.
///
/// ```
/// use rules_core::lens::{lens, updating};
///
/// let first = lens(|p: &(i32, i32)| p.0, |p: &(i32, i32), v| Ok((v, p.1)));
/// let double = updating(&first, |v| v * 2);
/// assert_eq!(double(&(3, 4)).unwrap(), (6, 4));
/// ```
pub fn updating<'a, L, F>(
    lens: &'a L,
    transform: F,
) -> impl Fn(&L::Source) -> Result<L::Source, LensError> + 'a
where
    L: Lens + ?Sized,
    F: Fn(L::Target) -> L::Target + 'a,
{
    move |source| lens.update(source, transform(lens.get(source)))
}
