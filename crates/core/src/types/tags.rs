//! Customer tag set.
//!
//! Shopify stores customer tags as a single comma-separated string
//! (`"vip, wholesale"`). It trims each entry and treats tags
//! case-insensitively, so `VIP` and `vip` are the same tag.

use core::fmt;

/// Ordered, de-duplicated set of customer tags.
///
/// # Examples
///
/// ```
/// use age_gate_core::TagSet;
///
/// let tags = TagSet::parse("vip,  wholesale, VIP");
/// assert_eq!(tags.to_string(), "vip, wholesale");
///
/// let updated = tags.with_tag("age-verified").expect("tag was absent");
/// assert_eq!(updated.to_string(), "vip, wholesale, age-verified");
///
/// assert!(updated.with_tag("Age-Verified").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Parse a comma-separated tag string, dropping blanks and duplicates.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut tags = Self::default();
        for tag in raw.split(',') {
            tags.insert(tag);
        }
        tags
    }

    /// Whether `tag` is present (trimmed, ASCII case-insensitive).
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.0.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// The union of this set and `tag`, or `None` if `tag` is already present.
    ///
    /// Returning `None` lets callers skip the update call entirely.
    #[must_use]
    pub fn with_tag(&self, tag: &str) -> Option<Self> {
        if self.contains(tag) {
            return None;
        }
        let mut updated = self.clone();
        updated.insert(tag);
        Some(updated)
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn insert(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.contains(tag) {
            self.0.push(tag.to_owned());
        }
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}
