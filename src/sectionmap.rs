use indexmap::IndexMap;
use log::{debug, warn};
use strum::IntoEnumIterator;

use crate::{
    commit_type::{normalize_type, KnownType},
    model::{ChangeItem, ChangelogSection},
};

/// Title of the section collecting every breaking item, always emitted first
pub const BREAKING_SECTION: &str = "Breaking Changes";

/// Title of the trailing section for types missing from the canonical order
pub const OTHER_SECTION: &str = "Other Changes";

/// The canonical section order used when none is configured
pub const DEFAULT_SECTION_ORDER: [KnownType; 11] = [
    KnownType::Feat,
    KnownType::Fix,
    KnownType::Perf,
    KnownType::Refactor,
    KnownType::Docs,
    KnownType::Test,
    KnownType::Build,
    KnownType::Ci,
    KnownType::Style,
    KnownType::Chore,
    KnownType::Revert,
];

/// Resolves one canonical order entry: a type token, an alias, or a section
/// title (case-insensitive).
pub fn section_type_for(entry: &str) -> Option<KnownType> {
    let entry = entry.trim();
    normalize_type(entry).or_else(|| {
        KnownType::iter().find(|ty| ty.section_title().eq_ignore_ascii_case(entry))
    })
}

/// Resolves a configured section order. Unrecognized entries are ignored and
/// repeated ones keep their first position.
pub fn resolve_order<I, S>(entries: I) -> Vec<KnownType>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut order = Vec::new();
    for entry in entries {
        match section_type_for(entry.as_ref()) {
            Some(ty) if !order.contains(&ty) => order.push(ty),
            Some(_) => {}
            None => warn!("ignoring unknown section {:?}", entry.as_ref()),
        }
    }
    order
}

/// A struct which holds the items of a changelog bucketed into sections, each
/// bucket in the order items were pushed
#[derive(Debug, Default)]
pub struct SectionMap {
    /// The canonical type order, empty for first-seen order
    pub order: Vec<KnownType>,
    /// Items per type, types in first-seen order
    pub sections: IndexMap<KnownType, Vec<ChangeItem>>,
    /// Items whose type is missing from a non-empty `order`
    pub others: Vec<ChangeItem>,
    /// Breaking items, also present in their regular bucket
    pub breaking: Vec<ChangeItem>,
}

impl SectionMap {
    pub fn new(order: Vec<KnownType>) -> SectionMap {
        SectionMap {
            order,
            ..SectionMap::default()
        }
    }

    /// Creates a section map from items already in traversal order, which we
    /// can then turn into changelog sections
    ///
    /// # Example
    ///
    /// ```
    /// # use relnote::{SectionMap, DEFAULT_SECTION_ORDER};
    /// let sm = SectionMap::from_items(DEFAULT_SECTION_ORDER.to_vec(), Vec::new());
    /// assert!(sm.into_sections().is_empty());
    /// ```
    pub fn from_items<I>(order: Vec<KnownType>, items: I) -> SectionMap
    where
        I: IntoIterator<Item = ChangeItem>,
    {
        let mut sm = SectionMap::new(order);
        for item in items {
            sm.push(item);
        }
        sm
    }

    pub fn push(&mut self, item: ChangeItem) {
        if item.breaking {
            self.breaking.push(item.clone());
        }
        if self.order.is_empty() || self.order.contains(&item.change_type) {
            self.sections.entry(item.change_type).or_default().push(item);
        } else {
            self.others.push(item);
        }
    }

    /// Emits the sections: breaking changes first, then the types of `order`
    /// that have items, then the catch-all section. An empty `order` keeps
    /// first-seen type order instead.
    pub fn into_sections(mut self) -> Vec<ChangelogSection> {
        let mut out = Vec::with_capacity(self.sections.len() + 2);
        if !self.breaking.is_empty() {
            out.push(ChangelogSection {
                title: BREAKING_SECTION.to_owned(),
                items: self.breaking,
            });
        }

        if self.order.is_empty() {
            out.extend(self.sections.into_iter().map(|(ty, items)| ChangelogSection {
                title: ty.section_title().to_owned(),
                items,
            }));
            return out;
        }

        for ty in &self.order {
            if let Some(items) = self.sections.shift_remove(ty) {
                out.push(ChangelogSection {
                    title: ty.section_title().to_owned(),
                    items,
                });
            }
        }
        if !self.others.is_empty() {
            debug!("{} items fall into {}", self.others.len(), OTHER_SECTION);
            out.push(ChangelogSection {
                title: OTHER_SECTION.to_owned(),
                items: self.others,
            });
        }

        out
    }
}
