//! Contact entity: an address and phone owned by one user.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub city: String,
    pub street: String,
    pub house: String,
    pub structure: String,
    pub building: String,
    pub apartment: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a contact. The owner is passed separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub city: String,
    pub street: String,
    pub house: String,
    pub structure: String,
    pub building: String,
    pub apartment: String,
    pub phone: String,
}

/// Partial update for an existing contact. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPatch {
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub structure: Option<String>,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub phone: Option<String>,
}

impl ContactPatch {
    pub fn apply_to(self, contact: &mut Contact) {
        if let Some(city) = self.city {
            contact.city = city;
        }
        if let Some(street) = self.street {
            contact.street = street;
        }
        if let Some(house) = self.house {
            contact.house = house;
        }
        if let Some(structure) = self.structure {
            contact.structure = structure;
        }
        if let Some(building) = self.building {
            contact.building = building;
        }
        if let Some(apartment) = self.apartment {
            contact.apartment = apartment;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
    }
}
