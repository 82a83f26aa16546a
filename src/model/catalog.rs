//! The static menu: categories and the items inside them.
//!
//! Iteration order matters. Every ranking in the recommendation engine breaks
//! ties by the position of an item in [`Catalog::items`], and category lists
//! follow [`Catalog::categories`].

use serde::{Deserialize, Serialize};

string_id!(
    /// Identifier of a menu item, e.g. `masala-dosa`.
    ItemId
);

string_id!(
    /// Identifier of a menu category, e.g. `main-course`.
    CategoryId
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

/// One selectable option inside a customization group. `price` is a delta
/// on top of the item price and may be negative (a half portion).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOption {
    pub id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizationGroup {
    pub name: String,
    pub options: Vec<CustomizationOption>,
}

/// A menu item. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: CategoryId,
    pub is_veg: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customizations: Vec<CustomizationGroup>,
}

/// An ordered, read-only menu.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, items: Vec<CatalogItem>) -> Self {
        Self { categories, items }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn item(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Items of one category, in catalog order.
    pub fn items_in<'a>(
        &'a self,
        category: &'a CategoryId,
    ) -> impl Iterator<Item = &'a CatalogItem> + 'a {
        self.items
            .iter()
            .filter(move |item| &item.category == category)
    }

    /// The canteen's built-in menu: 4 categories, 12 items.
    pub fn canteen() -> Self {
        let categories = vec![
            category("snacks", "Snacks", "Quick bites to satisfy your cravings"),
            category("main-course", "Main Course", "Hearty meals to fuel your day"),
            category("beverages", "Beverages", "Refreshing drinks to quench your thirst"),
            category("desserts", "Desserts", "Sweet treats to end your meal"),
        ];

        let spice_level = || {
            group(
                "Spice Level",
                &[("mild", "Mild", 0.0), ("medium", "Medium", 0.0), ("spicy", "Spicy", 0.0)],
            )
        };

        let items = vec![
            item("samosa", "Crispy Samosa", "Deep-fried pastry with spiced potato filling", 15.0, "snacks", true)
                .with(spice_level()),
            item("vada-pav", "Vada Pav", "Spicy potato fritter in a bun with chutneys", 20.0, "snacks", true),
            item("maggi", "Masala Maggi", "Classic instant noodles with a spicy twist", 30.0, "snacks", true).with(
                group(
                    "Add-ons",
                    &[("cheese", "Cheese", 10.0), ("veggies", "Veggies", 5.0), ("egg", "Egg", 15.0)],
                ),
            ),
            item("paneer-tikka", "Paneer Tikka", "Grilled cottage cheese with spices and veggies", 80.0, "main-course", true),
            item("chicken-biryani", "Chicken Biryani", "Fragrant rice dish with spiced chicken", 120.0, "main-course", false)
                .with(group("Portion Size", &[("half", "Half", -30.0), ("full", "Full", 0.0)]))
                .with(spice_level()),
            item("chole-bhature", "Chole Bhature", "Spicy chickpea curry with fried bread", 70.0, "main-course", true),
            item("masala-dosa", "Masala Dosa", "Crispy rice crepe with spiced potato filling", 60.0, "main-course", true),
            item("cold-coffee", "Cold Coffee", "Chilled coffee with ice cream", 50.0, "beverages", true).with(group(
                "Add-ons",
                &[("extra-cream", "Extra Cream", 10.0), ("chocolate-syrup", "Chocolate Syrup", 5.0)],
            )),
            item("masala-chai", "Masala Chai", "Spiced tea with milk", 15.0, "beverages", true),
            item("mango-lassi", "Mango Lassi", "Sweet yogurt drink with mango pulp", 40.0, "beverages", true),
            item("gulab-jamun", "Gulab Jamun", "Deep-fried milk solids soaked in sugar syrup", 25.0, "desserts", true),
            item("chocolate-brownie", "Chocolate Brownie", "Rich chocolate brownie with nuts", 35.0, "desserts", true)
                .with(group(
                    "Toppings",
                    &[("ice-cream", "Ice Cream", 15.0), ("chocolate-sauce", "Chocolate Sauce", 10.0)],
                )),
        ];

        Self::new(categories, items)
    }
}

impl CatalogItem {
    fn with(mut self, group: CustomizationGroup) -> Self {
        self.customizations.push(group);
        self
    }
}

fn category(id: &str, name: &str, description: &str) -> Category {
    Category {
        id: CategoryId::from(id),
        name: name.to_string(),
        description: description.to_string(),
    }
}

fn item(id: &str, name: &str, description: &str, price: f64, category: &str, is_veg: bool) -> CatalogItem {
    CatalogItem {
        id: ItemId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: CategoryId::from(category),
        is_veg,
        customizations: Vec::new(),
    }
}

fn group(name: &str, options: &[(&str, &str, f64)]) -> CustomizationGroup {
    CustomizationGroup {
        name: name.to_string(),
        options: options
            .iter()
            .map(|(id, name, price)| CustomizationOption {
                id: id.to_string(),
                name: name.to_string(),
                price: *price,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canteen_menu_shape() {
        let catalog = Catalog::canteen();
        assert_eq!(catalog.categories().len(), 4);
        assert_eq!(catalog.items().len(), 12);

        let counts: Vec<usize> = catalog
            .categories()
            .iter()
            .map(|c| catalog.items_in(&c.id).count())
            .collect();
        assert_eq!(counts, vec![3, 4, 3, 2]);
    }

    #[test]
    fn test_only_biryani_is_non_veg() {
        let catalog = Catalog::canteen();
        let non_veg: Vec<&str> = catalog
            .items()
            .iter()
            .filter(|i| !i.is_veg)
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(non_veg, vec!["chicken-biryani"]);
    }

    #[test]
    fn test_item_json_uses_camel_case() {
        let catalog = Catalog::canteen();
        let dosa = catalog.item(&ItemId::from("masala-dosa")).unwrap();
        let json = serde_json::to_value(dosa).unwrap();
        assert_eq!(json["isVeg"], true);
        assert_eq!(json["category"], "main-course");
        assert!(json.get("customizations").is_none());
    }
}
