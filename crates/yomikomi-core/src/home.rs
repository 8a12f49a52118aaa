//! Homepage grid: filter view state, rendered cards, favorite toggling.

use crate::catalog::CatalogStore;
use crate::favorites::Favorites;
use crate::filter::{filter_records, Card, CategoryFilter, ViewState};
use crate::kv::KeyValueStore;
use crate::progress::Progress;

/// Result of clicking a card's favorite button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteToggle {
    pub series_id: String,
    pub favorited: bool,
    /// The grid was rebuilt because the favorites view is active.
    pub rerendered: bool,
}

pub struct HomePage<'a> {
    catalog: &'a CatalogStore,
    store: &'a dyn KeyValueStore,
    placeholder_cover: String,
    view: ViewState,
    cards: Vec<Card>,
}

impl<'a> HomePage<'a> {
    /// Build the page showing every series.
    pub fn new(
        catalog: &'a CatalogStore,
        store: &'a dyn KeyValueStore,
        placeholder_cover: impl Into<String>,
    ) -> Self {
        let mut page = Self {
            catalog,
            store,
            placeholder_cover: placeholder_cover.into(),
            view: ViewState::default(),
            cards: Vec::new(),
        };
        page.render(CategoryFilter::All, String::new());
        page
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Id of the filter button to highlight.
    pub fn active_button(&self) -> String {
        self.view.category.button_id()
    }

    /// Replace the whole card list for `category` and `search`.
    pub fn render(&mut self, category: CategoryFilter, search: impl Into<String>) {
        self.view = ViewState::new(category, search);

        let favorites = Favorites::new(self.store);
        let progress = Progress::new(self.store);
        let fav_ids = favorites.list();

        self.cards = filter_records(self.catalog.records(), &self.view, &fav_ids)
            .into_iter()
            .map(|record| {
                let is_favorite = fav_ids.iter().any(|f| *f == record.id);
                Card::build(
                    record,
                    is_favorite,
                    progress.get(&record.id),
                    &self.placeholder_cover,
                )
            })
            .collect();

        tracing::debug!(
            category = %self.view.category,
            search = %self.view.search,
            cards = self.cards.len(),
            "Rendered catalog grid"
        );
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        let search = std::mem::take(&mut self.view.search);
        self.render(category, search);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let category = self.view.category.clone();
        self.render(category, search);
    }

    /// Toggle a favorite from its card button.
    ///
    /// Only the button is updated in place, unless the favorites view is
    /// showing, in which case the grid is rebuilt so removals disappear.
    pub fn toggle_favorite(&mut self, series_id: &str) -> FavoriteToggle {
        let favorited = Favorites::new(self.store).toggle(series_id);

        let rerendered = self.view.category == CategoryFilter::Favorites;
        if rerendered {
            let view = self.view.clone();
            self.render(view.category, view.search);
        } else if let Some(card) = self.cards.iter_mut().find(|c| c.series_id == series_id) {
            card.favorite.active = favorited;
        }

        FavoriteToggle {
            series_id: series_id.to_string(),
            favorited,
            rerendered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::models::{Category, SeriesRecord};

    fn catalog() -> CatalogStore {
        CatalogStore::from_records(vec![
            SeriesRecord::new("solo", "Solo Leveling", Category::Manhwa),
            SeriesRecord::new("berserk", "Berserk", Category::Manga),
            SeriesRecord::new("tower", "Tower of God", Category::Manhwa),
        ])
    }

    fn card_ids(page: &HomePage<'_>) -> Vec<String> {
        page.cards().iter().map(|c| c.series_id.clone()).collect()
    }

    #[test]
    fn test_initial_render_shows_all() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let page = HomePage::new(&catalog, &store, "ph.png");
        assert_eq!(card_ids(&page), vec!["solo", "berserk", "tower"]);
        assert_eq!(page.active_button(), "btn-all");
    }

    #[test]
    fn test_category_keeps_search_and_vice_versa() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let mut page = HomePage::new(&catalog, &store, "ph.png");

        page.set_search("o");
        assert_eq!(card_ids(&page), vec!["solo", "tower"]);

        page.set_category(CategoryFilter::Only(Category::Manhwa));
        assert_eq!(page.view().search, "o");
        assert_eq!(card_ids(&page), vec!["solo", "tower"]);
        assert_eq!(page.active_button(), "btn-manhwa");

        page.set_search("");
        assert_eq!(card_ids(&page), vec!["solo", "tower"]);
    }

    #[test]
    fn test_progress_switches_link_to_continue() {
        let catalog = catalog();
        let store = MemoryStore::new();
        Progress::new(&store).set("berserk", 5);

        let page = HomePage::new(&catalog, &store, "ph.png");
        let berserk = &page.cards()[1];
        assert!(berserk.link.continuing);
        assert_eq!(berserk.link.chapter, 5);
        assert!(!page.cards()[0].link.continuing);
    }

    #[test]
    fn test_toggle_outside_favorites_updates_in_place() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let mut page = HomePage::new(&catalog, &store, "ph.png");

        let result = page.toggle_favorite("tower");
        assert!(result.favorited);
        assert!(!result.rerendered);
        assert!(page.cards()[2].favorite.active);
        assert_eq!(card_ids(&page).len(), 3);
    }

    #[test]
    fn test_unfavorite_in_favorites_view_removes_card() {
        let catalog = catalog();
        let store = MemoryStore::new();
        let favorites = Favorites::new(&store);
        favorites.add("solo");
        favorites.add("tower");

        let mut page = HomePage::new(&catalog, &store, "ph.png");
        page.set_category(CategoryFilter::Favorites);
        assert_eq!(card_ids(&page), vec!["solo", "tower"]);
        assert!(page.cards().iter().all(|c| c.favorite.active));

        let result = page.toggle_favorite("solo");
        assert!(!result.favorited);
        assert!(result.rerendered);
        assert_eq!(card_ids(&page), vec!["tower"]);
    }
}
