pub mod data;
pub mod random_value;
pub mod template;
pub mod validation;

pub use data::{Catalogs, FixtureCatalogs, ItemInfo, ItemType, LandmarkInfo, Reach, SiteKind, SpellInfo, UnitInfo};
pub use random_value::RandomValue;
pub use template::{
    BorderType, Connection, DiplomacyEntry, RequestedBag, RequestedCity, RequestedRuin,
    RequestedSite, RequestedStack, Settings, Template, ZoneContents, ZoneTemplate, ZoneType,
};
pub use validation::validate_template;
