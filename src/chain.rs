//! Ordered filter chains.
//!
//! A [`FilterChain`] folds an ordered list of transforms into a single
//! composed function at configure time. Transforms run in the order they
//! were given: configuring `[brighten, darken]` brightens first and then
//! darkens, so the result is `darken(brighten(c))`.
//!
//! The chain is generic over the value it carries. [`Colour`] is the default,
//! but nothing here inspects the value; it is only moved through transforms.
//!
//! # Example
//!
//! ```
//! use tint::{transform, Colour, FilterChain};
//!
//! let mut chain = FilterChain::new();
//! chain.configure([
//!     transform(|c: Colour| c.brighten(50)),
//!     transform(|c: Colour| c.darken(50)),
//! ]);
//!
//! assert_eq!(chain.apply(Colour::rgb(250, 100, 0)), Colour::rgb(205, 100, 0));
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::types::Colour;

/// A unary transform from a value to a value of the same type.
pub type Transform<C = Colour> = Arc<dyn Fn(C) -> C + Send + Sync>;

/// Wrap a closure as a [`Transform`].
pub fn transform<C, F>(f: F) -> Transform<C>
where
    C: 'static,
    F: Fn(C) -> C + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The transform that returns its input unchanged.
pub fn identity<C: 'static>() -> Transform<C> {
    Arc::new(|c: C| c)
}

/// Fold transforms into one, first transform applied first.
///
/// Returns the composed transform and the number of transforms folded into
/// it. An empty sequence folds to [`identity`] and a single transform is
/// returned as is. Longer sequences share one slice that is walked in a loop,
/// so chain length never adds call depth.
pub fn compose<C, I>(transforms: I) -> (Transform<C>, usize)
where
    C: 'static,
    I: IntoIterator<Item = Transform<C>>,
{
    let mut transforms: Vec<Transform<C>> = transforms.into_iter().collect();
    let len = transforms.len();

    let composed: Transform<C> = match len {
        0 => identity(),
        1 => transforms.swap_remove(0),
        _ => {
            let steps: Arc<[Transform<C>]> = transforms.into();
            Arc::new(move |c: C| steps.iter().fold(c, |c, step| step(c)))
        }
    };

    (composed, len)
}

/// An ordered chain of transforms applied as one.
///
/// A new chain is the identity. [`configure`](Self::configure) replaces the
/// whole sequence; there is no incremental add or remove.
pub struct FilterChain<C = Colour> {
    composed: Transform<C>,
    len: usize,
}

impl<C: 'static> FilterChain<C> {
    /// Create an identity chain.
    pub fn new() -> Self {
        Self {
            composed: identity(),
            len: 0,
        }
    }

    /// Create a chain already configured with `transforms`.
    pub fn from_transforms<I>(transforms: I) -> Self
    where
        I: IntoIterator<Item = Transform<C>>,
    {
        let (composed, len) = compose(transforms);
        Self { composed, len }
    }

    /// Replace the configured sequence.
    ///
    /// An empty sequence makes the chain the identity again.
    pub fn configure<I>(&mut self, transforms: I)
    where
        I: IntoIterator<Item = Transform<C>>,
    {
        *self = Self::from_transforms(transforms);
    }

    /// Replace the configured sequence using a fluent builder.
    ///
    /// The builder is lent to `block` and the chain it returns is installed.
    ///
    /// ```
    /// use tint::FilterChain;
    ///
    /// let mut chain = FilterChain::<i32>::new();
    /// chain.configure_with(|b| b.then(|x| x + 1).then(|x| x * 10));
    /// assert_eq!(chain.apply(2), 30);
    /// ```
    pub fn configure_with<F>(&mut self, block: F)
    where
        F: FnOnce(ChainBuilder<C>) -> ChainBuilder<C>,
    {
        *self = block(ChainBuilder::new()).build();
    }

    /// Run `input` through every transform in configured order.
    ///
    /// A panic raised by a transform propagates to the caller as is.
    pub fn apply(&self, input: C) -> C {
        (self.composed)(input)
    }

    /// Number of transforms in the current composition.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the chain is the identity.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The composed transform, detached from the chain.
    pub fn transform(&self) -> Transform<C> {
        Arc::clone(&self.composed)
    }
}

impl<C: 'static> Default for FilterChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for FilterChain<C> {
    fn clone(&self) -> Self {
        Self {
            composed: Arc::clone(&self.composed),
            len: self.len,
        }
    }
}

impl<C> fmt::Debug for FilterChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain").field("len", &self.len).finish()
    }
}

impl<C: 'static> FromIterator<Transform<C>> for FilterChain<C> {
    fn from_iter<I: IntoIterator<Item = Transform<C>>>(iter: I) -> Self {
        Self::from_transforms(iter)
    }
}

/// Fluent builder for a [`FilterChain`].
pub struct ChainBuilder<C = Colour> {
    transforms: Vec<Transform<C>>,
}

impl<C: 'static> ChainBuilder<C> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Append a closure to run after everything added so far.
    pub fn then<F>(mut self, f: F) -> Self
    where
        F: Fn(C) -> C + Send + Sync + 'static,
    {
        self.transforms.push(Arc::new(f));
        self
    }

    /// Append an existing transform.
    pub fn then_transform(mut self, transform: Transform<C>) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Append several transforms in order.
    pub fn extend<I>(mut self, transforms: I) -> Self
    where
        I: IntoIterator<Item = Transform<C>>,
    {
        self.transforms.extend(transforms);
        self
    }

    /// Fold the collected transforms into a chain.
    pub fn build(self) -> FilterChain<C> {
        FilterChain::from_transforms(self.transforms)
    }
}

impl<C: 'static> Default for ChainBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A filter chain that can be reconfigured while other threads apply it.
///
/// The composed transform is swapped as a whole under a write lock. Readers
/// clone the current composition under a read lock and run it after the lock
/// is released, so `apply` sees either the old sequence or the new one and
/// never holds the lock while a transform runs.
pub struct SharedFilterChain<C = Colour> {
    current: RwLock<FilterChain<C>>,
}

impl<C: 'static> SharedFilterChain<C> {
    /// Create an identity chain.
    pub fn new() -> Self {
        Self::from(FilterChain::new())
    }

    /// Replace the configured sequence.
    pub fn configure<I>(&self, transforms: I)
    where
        I: IntoIterator<Item = Transform<C>>,
    {
        // Compose before taking the lock so writers hold it only for the swap.
        let next = FilterChain::from_transforms(transforms);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Run `input` through the current composition.
    pub fn apply(&self, input: C) -> C {
        self.snapshot().apply(input)
    }

    /// The current composition.
    ///
    /// Later reconfiguration does not affect the returned chain.
    pub fn snapshot(&self) -> FilterChain<C> {
        // The stored chain is always complete, so a poisoned lock is still usable.
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of transforms in the current composition.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// True when the current composition is the identity.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: 'static> Default for SharedFilterChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> From<FilterChain<C>> for SharedFilterChain<C> {
    fn from(chain: FilterChain<C>) -> Self {
        Self {
            current: RwLock::new(chain),
        }
    }
}

impl<C: 'static> fmt::Debug for SharedFilterChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFilterChain")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn brighten() -> Transform<Colour> {
        transform(|c: Colour| c.brighten(50))
    }

    fn darken() -> Transform<Colour> {
        transform(|c: Colour| c.darken(50))
    }

    fn add(n: i32) -> Transform<i32> {
        transform(move |x| x + n)
    }

    fn times(n: i32) -> Transform<i32> {
        transform(move |x| x * n)
    }

    #[test]
    fn test_new_chain_is_identity() {
        let chain = FilterChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.apply(Colour::rgb(12, 34, 56)), Colour::rgb(12, 34, 56));
    }

    #[test]
    fn test_configure_empty_is_identity() {
        let mut chain = FilterChain::from_transforms([brighten()]);
        chain.configure(Vec::new());
        assert!(chain.is_empty());
        assert_eq!(chain.apply(Colour::rgb(200, 100, 200)), Colour::rgb(200, 100, 200));
    }

    #[test]
    fn test_single_transform_pass_through() {
        let chain = FilterChain::from_transforms([brighten()]);
        let c = Colour::rgb(10, 220, 255);
        assert_eq!(chain.apply(c), c.brighten(50));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_left_to_right_order() {
        let chain = FilterChain::from_transforms([add(1), times(10)]);
        // times(add(2)) = 30, whereas add(times(2)) would be 21
        assert_eq!(chain.apply(2), 30);
        assert_ne!(chain.apply(2), 21);
    }

    #[test]
    fn test_order_matters_with_clamping() {
        let c = Colour::rgb(250, 250, 250);
        let bright_then_dark = FilterChain::from_transforms([brighten(), darken()]);
        let dark_then_bright = FilterChain::from_transforms([darken(), brighten()]);

        assert_eq!(bright_then_dark.apply(c), Colour::rgb(205, 205, 205));
        assert_eq!(dark_then_bright.apply(c), Colour::rgb(250, 250, 250));
    }

    #[test]
    fn test_reconfigure_overwrites() {
        let mut chain = FilterChain::new();
        chain.configure([add(100)]);
        chain.configure([times(3)]);
        assert_eq!(chain.apply(2), 6);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let chain = FilterChain::from_transforms([brighten(), darken(), brighten()]);
        let c = Colour::rgb(1, 128, 254);
        let first = chain.apply(c);
        for _ in 0..10 {
            assert_eq!(chain.apply(c), first);
        }
    }

    #[test]
    fn test_brighten_then_darken_scenario() {
        let chain = FilterChain::from_transforms([brighten(), darken()]);

        assert_eq!(chain.apply(Colour::rgb(200, 100, 200)), Colour::rgb(200, 100, 200));
        assert_eq!(chain.apply(Colour::rgb(10, 0, 10)), Colour::rgb(10, 0, 10));
        // 250 clamps to 255 before darkening, so the round trip breaks
        assert_eq!(chain.apply(Colour::rgb(250, 100, 0)), Colour::rgb(205, 100, 0));
    }

    #[test]
    fn test_transforms_run_once_per_apply() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = {
            let calls = Arc::clone(&calls);
            transform(move |x: i32| {
                calls.fetch_add(1, Ordering::SeqCst);
                x
            })
        };
        let chain = FilterChain::from_transforms([Arc::clone(&counted), counted]);

        chain.apply(0);
        chain.apply(0);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    #[should_panic(expected = "negative input")]
    fn test_transform_panic_propagates() {
        let chain = FilterChain::from_transforms([
            add(-5),
            transform(|x: i32| {
                if x < 0 {
                    panic!("negative input");
                }
                x
            }),
        ]);
        chain.apply(1);
    }

    #[test]
    fn test_configure_with_builder() {
        let mut chain = FilterChain::<i32>::new();
        chain.configure_with(|b| b.then(|x| x + 1).then_transform(times(10)));
        assert_eq!(chain.apply(2), 30);
        assert_eq!(chain.len(), 2);

        chain.configure_with(|b| b);
        assert!(chain.is_empty());
        assert_eq!(chain.apply(2), 2);
    }

    #[test]
    fn test_builder_extend_keeps_order() {
        let chain = ChainBuilder::new()
            .then(|x: i32| x - 1)
            .extend([times(2), add(3)])
            .build();
        assert_eq!(chain.apply(5), 11);
    }

    #[test]
    fn test_collect_into_chain() {
        let chain: FilterChain<i32> = (1..=3).map(add).collect();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.apply(0), 6);
    }

    #[test]
    fn test_detached_transform_survives_reconfigure() {
        let mut chain = FilterChain::from_transforms([times(2)]);
        let detached = chain.transform();
        chain.configure([add(1)]);
        assert_eq!(detached(4), 8);
        assert_eq!(chain.apply(4), 5);
    }

    #[test]
    fn test_debug_shows_len() {
        let chain = FilterChain::from_transforms([add(1), add(2)]);
        assert_eq!(format!("{:?}", chain), "FilterChain { len: 2 }");
    }

    #[test]
    fn test_shared_chain_reconfigure() {
        let shared = SharedFilterChain::new();
        assert_eq!(shared.apply(7), 7);

        shared.configure([add(1), times(2)]);
        assert_eq!(shared.apply(7), 16);
        assert_eq!(shared.len(), 2);

        let snapshot = shared.snapshot();
        shared.configure(Vec::new());
        assert!(shared.is_empty());
        assert_eq!(shared.apply(7), 7);
        assert_eq!(snapshot.apply(7), 16);
    }

    #[test]
    fn test_shared_chain_never_mixes_sequences() {
        // Old chain yields x + 2, new chain yields x * 4. A reader that saw a
        // half-updated sequence would produce x + 1 then * 2, or similar.
        let shared = Arc::new(SharedFilterChain::from(FilterChain::from_transforms([
            add(1),
            add(1),
        ])));

        thread::scope(|s| {
            for _ in 0..4 {
                let shared = Arc::clone(&shared);
                s.spawn(move || {
                    for _ in 0..1_000 {
                        let out = shared.apply(3);
                        assert!(out == 5 || out == 12, "unexpected output {}", out);
                    }
                });
            }

            for i in 0..100 {
                if i % 2 == 0 {
                    shared.configure([times(2), times(2)]);
                } else {
                    shared.configure([add(1), add(1)]);
                }
            }
        });
    }

    #[test]
    fn test_long_chain_applies_and_drops() {
        let n = 100_000;
        let mut chain = FilterChain::from_transforms((0..n).map(|_| transform(|x: i64| x + 1)));
        assert_eq!(chain.len(), n);
        assert_eq!(chain.apply(0), n as i64);

        // Replacing drops the old composition.
        chain.configure((0..n).map(|_| transform(|x: i64| x - 1)));
        assert_eq!(chain.apply(0), -(n as i64));
        drop(chain);
    }

    #[test]
    fn test_long_shared_chain_swaps() {
        let n = 100_000;
        let shared = SharedFilterChain::new();
        shared.configure((0..n).map(|_| transform(|x: i64| x + 2)));
        assert_eq!(shared.apply(1), 2 * n as i64 + 1);
        shared.configure((0..n).map(|_| transform(|x: i64| x + 1)));
        assert_eq!(shared.apply(1), n as i64 + 1);
    }

    #[test]
    fn test_nested_chain_as_transform() {
        let inner = FilterChain::from_transforms([add(1), times(2)]);
        let outer = FilterChain::from_transforms([inner.transform(), add(3), inner.transform()]);
        // ((1 + 1) * 2 + 3 + 1) * 2
        assert_eq!(outer.apply(1), 16);
    }

    #[test]
    fn test_shared_chain_unlocked_while_applying() {
        // The transform reads and then reconfigures the chain it runs in. If
        // apply still held the read guard, the write here would deadlock.
        let shared = Arc::new(SharedFilterChain::<i32>::new());
        let inside = Arc::clone(&shared);
        shared.configure([
            add(1),
            transform(move |x: i32| {
                assert_eq!(inside.len(), 2);
                inside.configure([times(10)]);
                x
            }),
        ]);

        assert_eq!(shared.apply(1), 2);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared.apply(1), 10);
    }

    #[test]
    fn test_shared_chain_recovers_from_poison() {
        let shared = Arc::new(SharedFilterChain::from(FilterChain::from_transforms([add(1)])));

        let poisoner = Arc::clone(&shared);
        let result = thread::spawn(move || {
            let _guard = poisoner.current.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(result.is_err());

        assert_eq!(shared.apply(1), 2);
        shared.configure([times(5)]);
        assert_eq!(shared.apply(1), 5);
    }
}
