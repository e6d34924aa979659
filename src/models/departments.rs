/// Logical department groups and which raw department names light them up.
/// A department that appears in no group is ignored for status purposes.
pub const DEPARTMENT_GROUPS: &[(&str, &[&str])] = &[
    ("Grocery", &["Grocery"]),
    ("Meat", &["Meat", "Deli"]),
    ("Bakery", &["Bakery Commercial", "Bakery Instore"]),
    ("Dairy/Frozen", &["Bulk"]),
    ("Seafood", &["Seafood"]),
    ("HMR", &["HMR"]),
    ("Produce", &["Produce"]),
    ("Home", &["Home", "Entertainment"]),
];

/// Merchandise-category prefixes that are never reported. Matching is literal
/// and case-sensitive.
pub const BANNED_CATEGORY_PREFIXES: &[&str] = &[
    "Nuts/ Dried Fruit",
    "Fresh-",
    "Field Veg",
    "Root Veg",
    "Salad Veg",
    "Cooking Veg",
    "Peppers",
    "Tomatoes",
    "Lamb",
    "Sausage",
    "Hams",
    "Books-",
    "Magazines",
    "Newspapers",
];

/// Group a raw department name maps into, if any.
pub fn group_for_department(department: &str) -> Option<&'static str> {
    DEPARTMENT_GROUPS
        .iter()
        .find(|(_, names)| names.contains(&department))
        .map(|(group, _)| *group)
}

/// Whether a merchandise category starts with any banned prefix.
pub fn is_banned_category(category: &str) -> bool {
    BANNED_CATEGORY_PREFIXES
        .iter()
        .any(|prefix| category.starts_with(prefix))
}
