//! # Restaurant Catalog
//!
//! Partner restaurants and the browse filters.
//!
//! Filtering is plain predicate composition: every active predicate must hold, and the
//! result optionally re-sorts by cheapest plan price. Recomputed from the full list on
//! every change. The favorite flag is the only mutable field and lives in memory only.

use serde::{Deserialize, Serialize};

/// A restaurant-specific price offering, e.g. "Month" or "Half-month".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    pub label: String,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Restaurant {
    pub name: String,
    pub campus: String,
    pub desc: String,
    pub plans: Vec<Plan>,
    pub walk_minutes: u32,
    pub self_service: bool,
    pub verified: bool,
    pub favorite: bool,
}

impl Restaurant {
    /// Cheapest plan, used as the sort key. Plan-less entries sort last.
    fn min_price(&self) -> u64 {
        self.plans.iter().map(|p| p.price).min().unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkBucket {
    Under5,
    FiveToTen,
    Over10,
}

impl WalkBucket {
    fn contains(self, minutes: u32) -> bool {
        match self {
            WalkBucket::Under5 => minutes < 5,
            WalkBucket::FiveToTen => (5..=10).contains(&minutes),
            WalkBucket::Over10 => minutes > 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSort {
    Asc,
    Desc,
}

/// Independent predicates, conjoined. `None` means the predicate is inactive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantFilter {
    pub campus: Option<String>,
    pub plan: Option<String>,
    pub walk: Option<WalkBucket>,
    pub self_service: Option<bool>,
    pub verified: Option<bool>,
    #[serde(default)]
    pub favorites_only: bool,
    pub sort: Option<PriceSort>,
}

impl RestaurantFilter {
    fn matches(&self, r: &Restaurant) -> bool {
        if let Some(campus) = &self.campus {
            if r.campus != *campus {
                return false;
            }
        }
        if let Some(plan) = &self.plan {
            if !r.plans.iter().any(|p| p.label == *plan) {
                return false;
            }
        }
        if let Some(walk) = self.walk {
            if !walk.contains(r.walk_minutes) {
                return false;
            }
        }
        if let Some(self_service) = self.self_service {
            if r.self_service != self_service {
                return false;
            }
        }
        if let Some(verified) = self.verified {
            if r.verified != verified {
                return false;
            }
        }
        if self.favorites_only && !r.favorite {
            return false;
        }

        true
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
}

impl Catalog {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        Self { restaurants }
    }

    /// The partner list the prototype ships with.
    pub fn seed() -> Self {
        let plans = |month: u64| {
            vec![
                Plan {
                    label: "Month".to_string(),
                    price: month,
                },
                Plan {
                    label: "Half-month".to_string(),
                    price: month / 2 + month / 20,
                },
            ]
        };

        Self::new(vec![
            Restaurant {
                name: "UR - Nyarugenge Cafeteria".to_string(),
                campus: "Nyarugenge Campus".to_string(),
                desc: "Delicious local meals every day.".to_string(),
                plans: plans(45_000),
                walk_minutes: 4,
                self_service: true,
                verified: true,
                favorite: false,
            },
            Restaurant {
                name: "UR - Huye Campus Canteen".to_string(),
                campus: "Huye Campus".to_string(),
                desc: "Affordable student buffet options.".to_string(),
                plans: plans(42_000),
                walk_minutes: 7,
                self_service: true,
                verified: true,
                favorite: false,
            },
            Restaurant {
                name: "RP - IPRC Kigali Mess".to_string(),
                campus: "Kigali Campus".to_string(),
                desc: "Fast meals and cold drinks.".to_string(),
                plans: plans(48_000),
                walk_minutes: 12,
                self_service: false,
                verified: true,
                favorite: false,
            },
            Restaurant {
                name: "RP - Tumba Bistro".to_string(),
                campus: "Tumba Campus".to_string(),
                desc: "Tasty lunch and free Wi-Fi corner.".to_string(),
                plans: vec![Plan {
                    label: "Month".to_string(),
                    price: 40_000,
                }],
                walk_minutes: 9,
                self_service: false,
                verified: false,
                favorite: false,
            },
        ])
    }

    pub fn all(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn toggle_favorite(&mut self, name: &str) -> bool {
        match self.restaurants.iter_mut().find(|r| r.name == name) {
            Some(r) => {
                r.favorite = !r.favorite;
                true
            }
            None => false,
        }
    }

    pub fn browse(&self, filter: &RestaurantFilter) -> Vec<Restaurant> {
        let mut shown: Vec<Restaurant> = self
            .restaurants
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        match filter.sort {
            Some(PriceSort::Asc) => shown.sort_by_key(Restaurant::min_price),
            Some(PriceSort::Desc) => {
                shown.sort_by_key(|r| std::cmp::Reverse(r.min_price()));
            }
            None => {}
        }

        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campus_filter_is_exact_set_membership() {
        let catalog = Catalog::seed();
        let filter = RestaurantFilter {
            campus: Some("Huye Campus".to_string()),
            ..Default::default()
        };

        let shown = catalog.browse(&filter);

        assert_eq!(shown.len(), 1);
        assert!(shown.iter().all(|r| r.campus == "Huye Campus"));
    }

    #[test]
    fn predicates_conjoin() {
        let catalog = Catalog::seed();
        let filter = RestaurantFilter {
            verified: Some(true),
            self_service: Some(true),
            walk: Some(WalkBucket::FiveToTen),
            ..Default::default()
        };

        let shown = catalog.browse(&filter);

        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].name, "UR - Huye Campus Canteen");
    }

    #[test]
    fn plan_existence_filter() {
        let catalog = Catalog::seed();
        let filter = RestaurantFilter {
            plan: Some("Half-month".to_string()),
            ..Default::default()
        };

        let shown = catalog.browse(&filter);

        assert_eq!(shown.len(), 3);
        assert!(shown.iter().all(|r| r.name != "RP - Tumba Bistro"));
    }

    #[test]
    fn price_sort_orders_by_cheapest_plan() {
        let catalog = Catalog::seed();

        let asc = catalog.browse(&RestaurantFilter {
            sort: Some(PriceSort::Asc),
            ..Default::default()
        });
        let prices: Vec<u64> = asc.iter().map(|r| r.min_price()).collect();
        assert!(prices.is_sorted());

        let desc = catalog.browse(&RestaurantFilter {
            sort: Some(PriceSort::Desc),
            ..Default::default()
        });
        assert_eq!(desc.first().unwrap().name, asc.last().unwrap().name);
    }

    #[test]
    fn favorites_only_follows_the_toggle() {
        let mut catalog = Catalog::seed();
        let filter = RestaurantFilter {
            favorites_only: true,
            ..Default::default()
        };

        assert!(catalog.browse(&filter).is_empty());

        assert!(catalog.toggle_favorite("RP - Tumba Bistro"));
        let shown = catalog.browse(&filter);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].name, "RP - Tumba Bistro");

        // Toggling back clears it; unknown names report false.
        assert!(catalog.toggle_favorite("RP - Tumba Bistro"));
        assert!(catalog.browse(&filter).is_empty());
        assert!(!catalog.toggle_favorite("Nowhere"));
    }

    #[test]
    fn empty_filter_shows_everything_unsorted() {
        let catalog = Catalog::seed();

        let shown = catalog.browse(&RestaurantFilter::default());

        assert_eq!(shown.len(), catalog.all().len());
        assert_eq!(shown[0].name, "UR - Nyarugenge Cafeteria");
    }
}
