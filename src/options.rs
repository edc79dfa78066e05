//! Option functions shared by every entity kind.
//!
//! Each entity has a plain options struct with defaults. Callers pass a slice
//! of [`Opt`] values which are applied to the defaults strictly in order, so
//! the last option touching a field wins. Provider packages ship their own
//! option sets; [`merge_option_sets`] concatenates them with caller options.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Final attribute map handed to the renderer. Sorted for stable output.
pub type Attrs = BTreeMap<String, String>;

/// A single option function over an options struct `T`.
pub struct Opt<T>(Arc<dyn Fn(&mut T) + Send + Sync>);

impl<T> Opt<T> {
    pub fn new(f: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, target: &mut T) {
        (self.0)(target)
    }
}

impl<T> Clone for Opt<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opt(..)")
    }
}

/// Applies `opts` in order on top of `base`.
pub fn apply_all<T>(mut base: T, opts: &[Opt<T>]) -> T {
    for o in opts {
        o.apply(&mut base);
    }
    base
}

/// Concatenates option sets left to right.
pub fn merge_option_sets<T, I>(sets: I) -> Vec<Opt<T>>
where
    I: IntoIterator,
    I::Item: AsRef<[Opt<T>]>,
{
    let mut merged = Vec::new();
    for set in sets {
        merged.extend(set.as_ref().iter().cloned());
    }
    merged
}

/// Drops every attribute whose value is empty.
pub fn trim_attrs(attrs: Attrs) -> Attrs {
    attrs.into_iter().filter(|(_, v)| !v.is_empty()).collect()
}

/// Layout direction of the whole diagram (`rankdir`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    TopToBottom,
    BottomToTop,
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::TopToBottom => "TB",
            Direction::BottomToTop => "BT",
            Direction::LeftToRight => "LR",
            Direction::RightToLeft => "RL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    pub size: f64,
    pub color: String,
}

impl Font {
    pub fn new(name: &str, size: f64, color: &str) -> Self {
        Self {
            name: name.to_string(),
            size,
            color: color.to_string(),
        }
    }

    /// Writes `fontname`, `fontsize` and `fontcolor` into `attrs`.
    pub(crate) fn write_attrs(&self, attrs: &mut Attrs) {
        attrs.insert("fontname".into(), self.name.clone());
        attrs.insert("fontsize".into(), format_number(self.size));
        attrs.insert("fontcolor".into(), self.color.clone());
    }
}

/// Locale-independent decimal rendering: `12.0` becomes `12`, `13.5` stays.
/// NaN and infinities become an empty string, so [`trim_attrs`] drops the key.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return String::new();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
