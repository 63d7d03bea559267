//! Derived views over the tea collection.
//!
//! [`apply_filter`] walks the collection once, collecting the teas visible
//! under the selected filter and counting every filter bucket at the same
//! time so all filter badges can be rendered from one result.

use serde::Serialize;

use alba_shared::{TeaFilter, TeaType};

use crate::models::Tea;

/// Number of teas under each of the seven filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub favorite: usize,
    pub black: usize,
    pub green: usize,
    pub white: usize,
    pub oolong: usize,
    pub puerh: usize,
}

impl FilterCounts {
    pub fn get(&self, filter: TeaFilter) -> usize {
        match filter {
            TeaFilter::All => self.all,
            TeaFilter::Favorite => self.favorite,
            TeaFilter::Type(t) => self.by_type(t),
        }
    }

    pub fn by_type(&self, tea_type: TeaType) -> usize {
        match tea_type {
            TeaType::Black => self.black,
            TeaType::Green => self.green,
            TeaType::White => self.white,
            TeaType::Oolong => self.oolong,
            TeaType::Puerh => self.puerh,
        }
    }

    fn record(&mut self, tea: &Tea) {
        self.all += 1;
        if tea.favorite {
            self.favorite += 1;
        }
        let slot = match tea.tea_type {
            TeaType::Black => &mut self.black,
            TeaType::Green => &mut self.green,
            TeaType::White => &mut self.white,
            TeaType::Oolong => &mut self.oolong,
            TeaType::Puerh => &mut self.puerh,
        };
        *slot += 1;
    }
}

/// Copy shown in place of the grid when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
}

/// Result of filtering: the visible teas in source order plus every count.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterView<'a> {
    pub filter: TeaFilter,
    pub visible: Vec<&'a Tea>,
    pub counts: FilterCounts,
}

impl<'a> FilterView<'a> {
    /// Heading above the grid.
    pub fn title(&self) -> String {
        let n = self.visible.len();
        if n == 0 {
            return "Seems like your tea closet's empty.".to_string();
        }
        match self.filter {
            TeaFilter::All => format!("Your Tea Collection ({n})"),
            other => format!("{} ({n})", other.label()),
        }
    }

    pub fn empty_state(&self) -> EmptyState {
        match self.filter {
            TeaFilter::Favorite => EmptyState {
                title: "No favorites yet!",
                description: "Mark some teas as favorites by clicking the heart icon to see them here.",
                action: "Add More Teas",
            },
            TeaFilter::All => EmptyState {
                title: "No teas yet!",
                description: "Start building your collection by adding your first tea.",
                action: "Add Your First Tea",
            },
            TeaFilter::Type(_) => EmptyState {
                title: "No teas in this category",
                description: "Try a different filter or add some teas to see them here.",
                action: "Add Your First Tea",
            },
        }
    }

    /// Visible teas in display order, most recently added first.
    pub fn newest_first(&self) -> Vec<&'a Tea> {
        self.visible.iter().rev().copied().collect()
    }

    /// Visible teas in the order the caller asked for.
    pub fn ordered(&self, newest_first: bool) -> Vec<&'a Tea> {
        if newest_first {
            self.newest_first()
        } else {
            self.visible.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

pub fn matches(filter: TeaFilter, tea: &Tea) -> bool {
    match filter {
        TeaFilter::All => true,
        TeaFilter::Favorite => tea.favorite,
        TeaFilter::Type(t) => tea.tea_type == t,
    }
}

pub fn apply_filter(teas: &[Tea], filter: TeaFilter) -> FilterView<'_> {
    let mut counts = FilterCounts::default();
    let mut visible = Vec::new();

    for tea in teas {
        counts.record(tea);
        if matches(filter, tea) {
            visible.push(tea);
        }
    }

    FilterView {
        filter,
        visible,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use alba_shared::TeaId;

    use super::*;

    fn tea(name: &str, tea_type: TeaType, favorite: bool) -> Tea {
        let now = Utc::now();
        Tea {
            id: TeaId::new(),
            name: name.into(),
            tea_type,
            description: None,
            tasting_notes: None,
            infusion_ingredients: None,
            brew_time: None,
            favorite,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn collection() -> Vec<Tea> {
        vec![
            tea("Assam", TeaType::Black, true),
            tea("Sencha", TeaType::Green, false),
            tea("Darjeeling", TeaType::Black, false),
            tea("Silver Needle", TeaType::White, true),
            tea("Tieguanyin", TeaType::Oolong, false),
            tea("Shou", TeaType::Puerh, true),
        ]
    }

    #[test]
    fn test_totals_invariant() {
        let teas = collection();
        for filter in TeaFilter::ALL {
            let view = apply_filter(&teas, filter);
            let c = view.counts;
            assert_eq!(c.all, teas.len());
            assert_eq!(c.black + c.green + c.white + c.oolong + c.puerh, teas.len());
        }
    }

    #[test]
    fn test_counts_independent_of_selection() {
        let teas = collection();
        let all = apply_filter(&teas, TeaFilter::All).counts;
        let green = apply_filter(&teas, TeaFilter::Type(TeaType::Green)).counts;
        assert_eq!(all, green);
        assert_eq!(all.get(TeaFilter::Favorite), 3);
        assert_eq!(all.get(TeaFilter::Type(TeaType::Black)), 2);
    }

    #[test]
    fn test_favorite_subset() {
        let teas = collection();
        let view = apply_filter(&teas, TeaFilter::Favorite);
        let names: Vec<&str> = view.visible.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Assam", "Silver Needle", "Shou"]);
    }

    #[test]
    fn test_type_subset_keeps_order() {
        let teas = collection();
        let view = apply_filter(&teas, TeaFilter::Type(TeaType::Black));
        let names: Vec<&str> = view.visible.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Assam", "Darjeeling"]);

        let reversed: Vec<&str> = view.newest_first().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(reversed, vec!["Darjeeling", "Assam"]);
        assert_eq!(view.ordered(false).len(), 2);
    }

    #[test]
    fn test_all_is_full_sequence() {
        let teas = collection();
        let view = apply_filter(&teas, TeaFilter::All);
        assert_eq!(view.visible.len(), teas.len());
        assert!(view.visible.iter().zip(&teas).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn test_titles() {
        let teas = collection();
        assert_eq!(apply_filter(&teas, TeaFilter::All).title(), "Your Tea Collection (6)");
        assert_eq!(apply_filter(&teas, TeaFilter::Favorite).title(), "Favorites (3)");
        assert_eq!(
            apply_filter(&teas, TeaFilter::Type(TeaType::Puerh)).title(),
            "Pu-erh (1)"
        );
        assert_eq!(
            apply_filter(&[], TeaFilter::All).title(),
            "Seems like your tea closet's empty."
        );
    }

    #[test]
    fn test_empty_collection() {
        let view = apply_filter(&[], TeaFilter::Favorite);
        assert!(view.is_empty());
        assert_eq!(view.counts, FilterCounts::default());
        assert_eq!(view.empty_state().title, "No favorites yet!");
        assert_eq!(
            apply_filter(&[], TeaFilter::Type(TeaType::Green)).empty_state().title,
            "No teas in this category"
        );
    }
}
