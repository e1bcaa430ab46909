//! Product categories.
//!
//! A category is a fixed set of name keywords; a product belongs to every
//! category whose keywords appear in its name.

use serde::Serialize;

/// The shop's browsable categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Desktop computers and laptops.
    ComputersLaptops,
    /// Phones and tablets.
    PhonesTablets,
    /// Cameras.
    Cameras,
    /// Audio equipment.
    Audio,
    /// Televisions and home entertainment.
    TvsHome,
    /// Gaming hardware.
    Gaming,
    /// Networking equipment.
    Networking,
    /// Computer components.
    Components,
    /// Wearables.
    WearableTech,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Self; 9] = [
        Self::ComputersLaptops,
        Self::PhonesTablets,
        Self::Cameras,
        Self::Audio,
        Self::TvsHome,
        Self::Gaming,
        Self::Networking,
        Self::Components,
        Self::WearableTech,
    ];

    /// URL path segment of the category page.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::ComputersLaptops => "computers_laptops",
            Self::PhonesTablets => "phones_tablets",
            Self::Cameras => "cameras",
            Self::Audio => "audio",
            Self::TvsHome => "tvs_home",
            Self::Gaming => "gaming",
            Self::Networking => "networking",
            Self::Components => "components",
            Self::WearableTech => "wearable_tech",
        }
    }

    /// Name keywords selecting the category's products.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::ComputersLaptops => &["PC", "Laptop"],
            Self::PhonesTablets => &["Phone", "Tablet"],
            Self::Cameras => &["Camera"],
            Self::Audio => &["Audio", "Headphones", "Earphones"],
            Self::TvsHome => &["TV"],
            Self::Gaming => &["Gaming"],
            Self::Networking => &["Networking"],
            Self::Components => &["Component"],
            Self::WearableTech => &["Wearable"],
        }
    }

    /// Looks a category up by its slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}
