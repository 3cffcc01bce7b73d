//! Macros.

/// Prints comment-prefixed lines at some verbosity level.
///
/// - `log! { @info "..." }` requires `-v`,
/// - `log! { @verb "..." }` requires `-vv`,
/// - `log! { @debug "..." }` requires `-vvv`.
///
/// Everything is compiled out in bench mode.
#[macro_export]
#[cfg(not(feature = "bench"))]
macro_rules! log {
    (@info $($tt:tt)*) => (
        if $crate::common::conf.verb >= 1 {
            println!("; {}", format!($($tt)*))
        }
    );
    (@verb $($tt:tt)*) => (
        if $crate::common::conf.verb >= 2 {
            println!("; {}", format!($($tt)*))
        }
    );
    (@debug $($tt:tt)*) => (
        if $crate::common::conf.verb >= 3 {
            println!("; {}", format!($($tt)*))
        }
    );
}
#[cfg(feature = "bench")]
macro_rules! log {
    ($($tt:tt)*) => (());
}

/// Profiling macro.
///
/// If passed `self`, assumes `self` has a `_profiler` field.
#[macro_export]
#[cfg(not(feature = "bench"))]
macro_rules! profile {
    ( | $prof:ident | wrap $b:block $( $scope:expr ),+ $(,)* ) => ({
        profile! { |$prof| tick $($scope),+ }
        let res = $b;
        profile! { |$prof| mark $($scope),+ }
        res
    });
    ( | $prof:ident | $stat:expr => add $e:expr ) => (
        $prof.stat_do( $stat, |val| val + $e )
    );
    ( | $prof:ident | $meth:ident $( $scope:expr ),+ $(,)* ) => (
        $prof.$meth(
            vec![ $($scope),+ ]
        )
    );
    ( $slf:ident wrap $b:block $( $scope:expr ),+ $(,)* ) => ({
        let prof = & $slf._profiler;
        profile! { |prof| wrap $b $($scope),+ }
    });
    ( $slf:ident $stat:expr => add $e:expr ) => ({
        let prof = & $slf._profiler;
        profile! { |prof| $stat => add $e }
    });
    ( $slf:ident $meth:ident $( $scope:expr ),+ $(,)* ) => ({
        let prof = & $slf._profiler;
        profile! { |prof| $meth $($scope),+ }
    });
}
#[cfg(feature = "bench")]
macro_rules! profile {
    ( | $prof:ident | wrap $b:block $( $scope:expr ),+ $(,)* ) => (
        $b
    );
    ( $slf:ident wrap $b:block $( $scope:expr ),+ $(,)* ) => (
        $b
    );
    ( $($tt:tt)* ) => (());
}

/// Generates a zero-cost `usize` wrapper with its range, set, hash map and
/// total (vec-backed) map types.
macro_rules! wrap_usize {
    (
        $(#[$idx_meta:meta])* $idx:ident
        $(#[$rng_meta:meta])* range: $rng:ident
        $(#[$set_meta:meta])* set: $set:ident
        $(#[$hmap_meta:meta])* hash map: $hmap:ident
        $(#[$map_meta:meta])* map: $map:ident
    ) => (
        $(#[$idx_meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $idx {
            val: usize,
        }
        impl $idx {
            /// Wraps a `usize`.
            #[inline]
            pub fn new(val: usize) -> Self {
                $idx { val }
            }
            /// Unwraps itself.
            #[inline]
            pub fn get(self) -> usize {
                self.val
            }
        }
        impl From<usize> for $idx {
            fn from(val: usize) -> Self {
                $idx { val }
            }
        }
        impl From<$idx> for usize {
            fn from(idx: $idx) -> usize {
                idx.val
            }
        }
        impl ::std::ops::Deref for $idx {
            type Target = usize;
            fn deref(&self) -> &usize {
                &self.val
            }
        }
        impl ::std::fmt::Display for $idx {
            fn fmt(&self, fmt: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(fmt, "{}", self.val)
            }
        }
        impl ::std::fmt::Debug for $idx {
            fn fmt(&self, fmt: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(fmt, "{}", self.val)
            }
        }

        $(#[$rng_meta])*
        #[derive(Clone, Copy, Debug)]
        pub struct $rng {
            start: usize,
            end: usize,
        }
        impl $rng {
            /// Range between two bounds, end exclusive.
            #[inline]
            pub fn new(start: usize, end: usize) -> Self {
                $rng { start, end }
            }
            /// Range from zero, end exclusive.
            #[inline]
            pub fn zero_to(end: usize) -> Self {
                $rng { start: 0, end }
            }
        }
        impl Iterator for $rng {
            type Item = $idx;
            fn next(&mut self) -> Option<$idx> {
                if self.start < self.end {
                    let res = $idx::new(self.start);
                    self.start += 1;
                    Some(res)
                } else {
                    None
                }
            }
        }

        $(#[$set_meta])*
        pub type $set = ::std::collections::HashSet<$idx>;

        $(#[$hmap_meta])*
        pub type $hmap<T> = ::std::collections::HashMap<$idx, T>;

        $(#[$map_meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $map<T> {
            vec: Vec<T>,
        }
        impl<T> $map<T> {
            /// Empty map.
            #[inline]
            pub fn new() -> Self {
                $map { vec: Vec::new() }
            }
            /// Empty map with some capacity.
            #[inline]
            pub fn with_capacity(capa: usize) -> Self {
                $map { vec: Vec::with_capacity(capa) }
            }
            /// Number of elements.
            #[inline]
            pub fn len(&self) -> usize {
                self.vec.len()
            }
            /// True if the map is empty.
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.vec.is_empty()
            }
            /// Pushes an element at the end, returns its index.
            #[inline]
            pub fn push(&mut self, elem: T) -> $idx {
                let idx = $idx::new(self.vec.len());
                self.vec.push(elem);
                idx
            }
            /// Iterator over the elements.
            #[inline]
            pub fn iter(&self) -> ::std::slice::Iter<T> {
                self.vec.iter()
            }
            /// Mutable iterator over the elements.
            #[inline]
            pub fn iter_mut(&mut self) -> ::std::slice::IterMut<T> {
                self.vec.iter_mut()
            }
            /// Iterator over indices and elements.
            #[inline]
            pub fn index_iter(&self) -> impl Iterator<Item = ($idx, &T)> {
                self.vec.iter().enumerate().map(
                    |(idx, elem)| ($idx::new(idx), elem)
                )
            }
            /// Indices of the map.
            #[inline]
            pub fn indices(&self) -> $rng {
                $rng::zero_to(self.vec.len())
            }
        }
        impl<T> Default for $map<T> {
            fn default() -> Self {
                Self::new()
            }
        }
        impl<T> From<Vec<T>> for $map<T> {
            fn from(vec: Vec<T>) -> Self {
                $map { vec }
            }
        }
        impl<T> ::std::ops::Index<$idx> for $map<T> {
            type Output = T;
            fn index(&self, idx: $idx) -> &T {
                &self.vec[idx.val]
            }
        }
        impl<T> ::std::ops::IndexMut<$idx> for $map<T> {
            fn index_mut(&mut self, idx: $idx) -> &mut T {
                &mut self.vec[idx.val]
            }
        }
        impl<T> IntoIterator for $map<T> {
            type Item = T;
            type IntoIter = ::std::vec::IntoIter<T>;
            fn into_iter(self) -> Self::IntoIter {
                self.vec.into_iter()
            }
        }
        impl<'a, T> IntoIterator for &'a $map<T> {
            type Item = &'a T;
            type IntoIter = ::std::slice::Iter<'a, T>;
            fn into_iter(self) -> Self::IntoIter {
                self.vec.iter()
            }
        }
        impl<T: ::std::fmt::Debug> ::std::fmt::Debug for $map<T> {
            fn fmt(&self, fmt: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                fmt.debug_list().entries(self.vec.iter()).finish()
            }
        }
    );
}
