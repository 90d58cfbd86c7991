//! CRM field names for the inventory entity

pub const ID: &str = "id";
pub const REFERENCE: &str = "ufCrm48ReferenceNumber";
pub const TITLE: &str = "ufCrm48ListingTitle";
pub const BEDROOMS: &str = "ufCrm48Bedrooms";
pub const BATHROOMS: &str = "ufCrm48Bathrooms";
pub const PRICE: &str = "ufCrm48Price";
pub const STATUS: &str = "ufCrm48Status";
pub const PROJECT_STATUS: &str = "ufCrm48ProjectStatus";
pub const OWNER_PHONE: &str = "ufCrm48OwnerPhone";
pub const UNIT_TYPE: &str = "ufCrm48UnitType";
pub const LOCATION_PF: &str = "ufCrm48LocationPf";
pub const LOCATION_BAYUT: &str = "ufCrm48LocationBayut";
pub const SIZE: &str = "ufCrm48Size";
pub const AGENT_NAME: &str = "ufCrm48AgentName";
pub const OWNER_NAME: &str = "ufCrm48OwnerName";
pub const PROPERTY_IMAGES: &str = "ufCrm48PropertyImages";
pub const OWNER_URL: &str = "ufCrm48OwnerUrl";

/// Field selection sent with every item request
pub const SELECT_FIELDS: [&str; 17] = [
    ID,
    REFERENCE,
    TITLE,
    BEDROOMS,
    BATHROOMS,
    PRICE,
    STATUS,
    PROJECT_STATUS,
    OWNER_PHONE,
    UNIT_TYPE,
    LOCATION_PF,
    LOCATION_BAYUT,
    SIZE,
    AGENT_NAME,
    OWNER_NAME,
    PROPERTY_IMAGES,
    OWNER_URL,
];
