//! Pure editing operations on collections and documents.
//!
//! Nothing here performs I/O. Every fallible operation validates before it
//! mutates, so an `Err` leaves the receiver untouched.

use tracing::debug;

use crate::catalog::CommandCatalog;
use crate::errors::{MenuError, Result};
use crate::model::{Collection, CollectionItem, Document};

const NEW_COLLECTION_PREFIX: &str = "New Collection";
const COPY_SUFFIX: &str = " copy";

/// Translate a drop row from list coordinates into a post-removal index.
///
/// A list reports the drop row against the layout that still contains the
/// dragged item. When the item moves downwards its own slot disappears
/// first, so the target shifts up by one.
pub fn adjusted_drop_index(from: usize, row: usize) -> usize {
    if from < row { row - 1 } else { row }
}

/// Drop command items the catalog no longer confirms.
///
/// Separators are always kept and survivors keep their relative order.
pub fn reconcile<C: CommandCatalog + ?Sized>(document: &Document, catalog: &C) -> Document {
    let mut pruned = 0usize;
    let collections = document
        .collections
        .iter()
        .map(|collection| {
            let items: Vec<CollectionItem> = collection
                .items
                .iter()
                .filter(|item| match item {
                    CollectionItem::Command(command) => {
                        let keep = catalog.exists(&command.plugin_id, &command.command_id);
                        if !keep {
                            pruned += 1;
                        }
                        keep
                    }
                    CollectionItem::Separator => true,
                })
                .cloned()
                .collect();
            Collection {
                items,
                ..collection.clone()
            }
        })
        .collect();

    if pruned > 0 {
        debug!(pruned, "reconcile dropped stale command references");
    }

    Document {
        schema_version: document.schema_version,
        collections,
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(MenuError::IndexOutOfRange { index, len })
    }
}

impl Collection {
    /// Insert `item` at `at`, which may equal the current length.
    pub fn insert_item(&mut self, item: CollectionItem, at: usize) -> Result<()> {
        if at > self.items.len() {
            return Err(MenuError::IndexOutOfRange {
                index: at,
                len: self.items.len(),
            });
        }
        if self.auto_grouping && item.is_separator() {
            return Err(MenuError::invalid(
                "separators are not allowed in an auto-grouped collection",
            ));
        }
        self.items.insert(at, item);
        Ok(())
    }

    /// Remove the item at `from` and re-insert it at post-removal index `to`.
    ///
    /// Callers translating a list drop row must apply [`adjusted_drop_index`]
    /// first.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.items.len();
        check_index(from, len)?;
        check_index(to, len)?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Remove and return the item at `index`.
    pub fn remove_item(&mut self, index: usize) -> Result<CollectionItem> {
        check_index(index, self.items.len())?;
        Ok(self.items.remove(index))
    }

    /// Toggle auto-grouping. Turning it on strips every separator.
    pub fn set_auto_grouping(&mut self, on: bool) {
        self.auto_grouping = on;
        if on {
            self.items.retain(|item| !item.is_separator());
        }
    }
}

impl Document {
    /// Rename the collection at `index`, returning the title actually stored.
    ///
    /// A title already used by another collection gets `" copy"` appended.
    pub fn rename_collection(&mut self, index: usize, new_title: &str) -> Result<String> {
        check_index(index, self.collections.len())?;
        if new_title.is_empty() {
            return Err(MenuError::invalid("collection title must not be empty"));
        }
        if self.collections[index].title == new_title {
            return Ok(new_title.to_owned());
        }

        let collides = self
            .collections
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && c.title == new_title);
        let accepted = if collides {
            format!("{new_title}{COPY_SUFFIX}")
        } else {
            new_title.to_owned()
        };
        self.collections[index].title.clone_from(&accepted);
        Ok(accepted)
    }

    /// Append an empty collection with the lowest unused "New Collection N" title.
    ///
    /// Returns the new collection's index.
    pub fn add_collection(&mut self) -> usize {
        let title = next_free_title(self.titles());
        self.collections.push(Collection::new(title));
        self.collections.len() - 1
    }

    /// Remove the collection at `index`.
    ///
    /// Returns the index that should become active if the removed collection
    /// was the active one.
    pub fn remove_collection(&mut self, index: usize) -> Result<usize> {
        check_index(index, self.collections.len())?;
        if self.collections.len() == 1 {
            return Err(MenuError::invalid("cannot remove the last collection"));
        }
        let _ = self.collections.remove(index);
        Ok(index.min(self.collections.len() - 1))
    }

    /// Mutable access to a collection, bounds-checked.
    pub fn collection_mut(&mut self, index: usize) -> Result<&mut Collection> {
        let len = self.collections.len();
        self.collections
            .get_mut(index)
            .ok_or(MenuError::IndexOutOfRange { index, len })
    }
}

fn next_free_title<'a>(titles: impl Iterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = titles.collect();
    let mut n = 1usize;
    loop {
        let candidate = format!("{NEW_COLLECTION_PREFIX} {n}");
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::catalog::{InstalledPlugin, StaticCatalog};
    use crate::model::CommandRef;

    fn cmd(id: &str) -> CollectionItem {
        CollectionItem::Command(CommandRef::new("plugin", id, id.to_uppercase(), "Plugin"))
    }

    fn collection(items: Vec<CollectionItem>) -> Collection {
        Collection::new("Work").with_items(items)
    }

    fn catalog_of(ids: &[&str]) -> StaticCatalog {
        StaticCatalog::new(vec![InstalledPlugin {
            plugin_name: "Plugin".into(),
            icon: None,
            commands: ids
                .iter()
                .map(|id| CommandRef::new("plugin", *id, id.to_uppercase(), "Plugin"))
                .collect(),
        }])
    }

    #[test]
    fn adjusted_drop_index_shifts_only_downward_moves() {
        assert_eq!(adjusted_drop_index(0, 3), 2);
        assert_eq!(adjusted_drop_index(2, 0), 0);
        assert_eq!(adjusted_drop_index(1, 1), 1);
    }

    #[test]
    fn move_down_with_drop_shift_lands_after_target() {
        let mut c = collection(vec![cmd("a"), cmd("b"), cmd("c")]);
        // dropping A below C in the list is drop row 3
        c.move_item(0, adjusted_drop_index(0, 3)).unwrap();
        assert_eq!(c.items, vec![cmd("b"), cmd("c"), cmd("a")]);
    }

    #[test]
    fn move_to_post_removal_index() {
        let mut c = collection(vec![cmd("a"), cmd("b"), cmd("c")]);
        c.move_item(0, 2).unwrap();
        assert_eq!(c.items, vec![cmd("b"), cmd("c"), cmd("a")]);
    }

    #[test]
    fn move_up_needs_no_shift() {
        let mut c = collection(vec![cmd("a"), cmd("b"), cmd("c")]);
        c.move_item(2, adjusted_drop_index(2, 0)).unwrap();
        assert_eq!(c.items, vec![cmd("c"), cmd("a"), cmd("b")]);
    }

    #[test]
    fn move_rejects_invalid_indices() {
        let mut c = collection(vec![cmd("a"), cmd("b")]);
        assert_matches!(
            c.move_item(2, 0),
            Err(MenuError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_matches!(
            c.move_item(0, 2),
            Err(MenuError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(c.items, vec![cmd("a"), cmd("b")]);
    }

    #[test]
    fn insert_accepts_end_position() {
        let mut c = collection(vec![cmd("a")]);
        c.insert_item(cmd("b"), 1).unwrap();
        c.insert_item(CollectionItem::Separator, 0).unwrap();
        assert_eq!(c.items, vec![CollectionItem::Separator, cmd("a"), cmd("b")]);
    }

    #[test]
    fn insert_past_end_is_out_of_range() {
        let mut c = collection(vec![cmd("a")]);
        assert_matches!(
            c.insert_item(cmd("b"), 2),
            Err(MenuError::IndexOutOfRange { index: 2, len: 1 })
        );
    }

    #[test]
    fn separator_rejected_when_auto_grouping() {
        let mut c = collection(vec![cmd("a")]);
        c.set_auto_grouping(true);
        assert_matches!(
            c.insert_item(CollectionItem::Separator, 0),
            Err(MenuError::InvalidOperation(_))
        );
        c.insert_item(cmd("b"), 0).unwrap();
        assert_eq!(c.items, vec![cmd("b"), cmd("a")]);
    }

    #[test]
    fn auto_grouping_strips_separators() {
        let mut c = collection(vec![cmd("a"), CollectionItem::Separator, cmd("b")]);
        c.set_auto_grouping(true);
        assert_eq!(c.items, vec![cmd("a"), cmd("b")]);
        assert!(c.auto_grouping);
    }

    #[test]
    fn disabling_auto_grouping_keeps_items() {
        let mut c = collection(vec![cmd("a"), cmd("b")]);
        c.set_auto_grouping(true);
        c.set_auto_grouping(false);
        assert_eq!(c.items, vec![cmd("a"), cmd("b")]);
        assert!(!c.auto_grouping);
    }

    #[test]
    fn remove_item_returns_removed() {
        let mut c = collection(vec![cmd("a"), CollectionItem::Separator]);
        assert_eq!(c.remove_item(1).unwrap(), CollectionItem::Separator);
        assert_matches!(c.remove_item(1), Err(MenuError::IndexOutOfRange { .. }));
    }

    #[test]
    fn rename_collision_appends_copy() {
        let mut doc = Document::with_collections(vec![Collection::new("Work"), Collection::new("Play")]);
        let accepted = doc.rename_collection(1, "Work").unwrap();
        assert_eq!(accepted, "Work copy");
        assert_eq!(doc.collections[1].title, "Work copy");
    }

    #[test]
    fn rename_to_own_title_is_noop() {
        let mut doc = Document::with_collections(vec![Collection::new("Work")]);
        assert_eq!(doc.rename_collection(0, "Work").unwrap(), "Work");
        assert_eq!(doc.collections[0].title, "Work");
    }

    #[test]
    fn rename_rejects_empty_title() {
        let mut doc = Document::with_collections(vec![Collection::new("Work")]);
        assert_matches!(doc.rename_collection(0, ""), Err(MenuError::InvalidOperation(_)));
        assert_eq!(doc.collections[0].title, "Work");
    }

    #[test]
    fn add_collection_uses_lowest_free_number() {
        let mut doc = Document::with_collections(vec![
            Collection::new("New Collection 1"),
            Collection::new("New Collection 3"),
        ]);
        let index = doc.add_collection();
        assert_eq!(index, 2);
        assert_eq!(doc.collections[2].title, "New Collection 2");
        let _ = doc.add_collection();
        assert_eq!(doc.collections[3].title, "New Collection 4");
    }

    #[test]
    fn remove_collection_clamps_active_index() {
        let mut doc = Document::with_collections(vec![
            Collection::new("A"),
            Collection::new("B"),
            Collection::new("C"),
        ]);
        assert_eq!(doc.remove_collection(2).unwrap(), 1);
        assert_eq!(doc.remove_collection(0).unwrap(), 0);
        assert_eq!(doc.titles().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn remove_last_collection_is_invalid() {
        let mut doc = Document::with_collections(vec![Collection::new("Only")]);
        assert_matches!(doc.remove_collection(0), Err(MenuError::InvalidOperation(_)));
        assert_eq!(doc.collections.len(), 1);
    }

    #[test]
    fn reconcile_drops_missing_commands_everywhere() {
        let doc = Document::with_collections(vec![
            collection(vec![cmd("a"), cmd("x"), CollectionItem::Separator, cmd("b")]),
            Collection::new("Play").with_items(vec![cmd("x"), cmd("c")]),
        ]);
        let out = reconcile(&doc, &catalog_of(&["a", "b", "c"]));
        assert_eq!(
            out.collections[0].items,
            vec![cmd("a"), CollectionItem::Separator, cmd("b")]
        );
        assert_eq!(out.collections[1].items, vec![cmd("c")]);
        assert_eq!(out.collections[1].title, "Play");
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        fn arb_item() -> impl Strategy<Value = CollectionItem> {
            prop_oneof![
                3 => "[a-e]".prop_map(|id| cmd(&id)),
                1 => Just(CollectionItem::Separator),
            ]
        }

        fn arb_collection() -> impl Strategy<Value = Collection> {
            (prop::collection::vec(arb_item(), 0..8), any::<bool>()).prop_map(|(items, grouped)| {
                Collection {
                    title: "C".into(),
                    shortcut: None,
                    auto_grouping: grouped,
                    items,
                }
            })
        }

        proptest! {
            #[test]
            fn reconcile_is_idempotent(
                collections in prop::collection::vec(arb_collection(), 0..4),
                installed in prop::collection::vec("[a-e]", 0..5),
            ) {
                let ids: Vec<&str> = installed.iter().map(String::as_str).collect();
                let catalog = catalog_of(&ids);
                let doc = Document::with_collections(collections);
                let once = reconcile(&doc, &catalog);
                let twice = reconcile(&once, &catalog);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn auto_grouping_leaves_no_separators(mut c in arb_collection()) {
                c.set_auto_grouping(true);
                prop_assert!(c.items.iter().all(|i| !i.is_separator()));
                let snapshot = c.clone();
                c.set_auto_grouping(true);
                prop_assert_eq!(c, snapshot);
            }

            #[test]
            fn move_is_invertible(
                c in arb_collection(),
                from in 0usize..8,
                to in 0usize..8,
            ) {
                prop_assume!(from < c.items.len() && to < c.items.len());
                let mut moved = c.clone();
                moved.move_item(from, to).unwrap();
                moved.move_item(to, from).unwrap();
                prop_assert_eq!(moved, c);
            }
        }
    }
}
