#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
pub(crate) type KeySet<I> = HashSet<I>;
#[cfg(not(feature = "std"))]
pub(crate) type KeySet<I> = BTreeSet<I>;

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = BTreeMap<K, V>;

#[cfg(feature = "std")]
#[doc(hidden)]
pub trait ItemKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<I: core::hash::Hash + Eq> ItemKey for I {}

#[cfg(not(feature = "std"))]
#[doc(hidden)]
pub trait ItemKey: Ord {}
#[cfg(not(feature = "std"))]
impl<I: Ord> ItemKey for I {}
