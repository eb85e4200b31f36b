//! Delivery details collected at checkout.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Number of digits a phone number must have.
pub const PHONE_DIGITS: usize = 10;

/// Hostels and locations a customer may pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOptions {
    /// Hostel identifiers.
    pub hostels: Vec<String>,
    /// Location names.
    pub locations: Vec<String>,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            hostels: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            locations: vec!["Loc1".to_string(), "Loc2".to_string(), "Loc3".to_string()],
        }
    }
}

/// The raw checkout form, as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryForm {
    pub customer_name: String,
    pub phone_number: String,
    pub hostel: String,
    pub location: String,
    pub room: String,
}

impl DeliveryForm {
    /// Validate the form into [`DeliveryDetails`].
    ///
    /// Fields are trimmed. The name must be non-empty, the phone number must
    /// be exactly ten ASCII digits, hostel and location must be among the
    /// configured options, and the room must be a number.
    pub fn validate(&self, options: &DeliveryOptions) -> Result<DeliveryDetails, CommerceError> {
        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(invalid("name", "is required"));
        }

        let phone_number = self.phone_number.trim();
        if phone_number.len() != PHONE_DIGITS || !phone_number.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid(
                "phone number",
                format!("expected a valid {PHONE_DIGITS}-digit phone number"),
            ));
        }

        let hostel = self.hostel.trim();
        if !options.hostels.iter().any(|h| h == hostel) {
            return Err(invalid(
                "hostel",
                format!("choose one of {}", options.hostels.join(", ")),
            ));
        }

        let location = self.location.trim();
        if !options.locations.iter().any(|l| l == location) {
            return Err(invalid(
                "location",
                format!("choose one of {}", options.locations.join(", ")),
            ));
        }

        let room = self.room.trim();
        if room.is_empty() || !room.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("room", "must be a number"));
        }

        Ok(DeliveryDetails {
            customer_name: customer_name.to_string(),
            phone_number: phone_number.to_string(),
            hostel: hostel.to_string(),
            location: location.to_string(),
            room: room.to_string(),
        })
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> CommerceError {
    CommerceError::InvalidDeliveryDetails {
        field,
        reason: reason.into(),
    }
}

/// Validated delivery details. Only obtainable through
/// [`DeliveryForm::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDetails {
    customer_name: String,
    phone_number: String,
    hostel: String,
    location: String,
    room: String,
}

impl DeliveryDetails {
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn hostel(&self) -> &str {
        &self.hostel
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// Address line stored on the order, e.g. `"Hostel 2, Loc1, Room 114"`.
    pub fn delivery_address(&self) -> String {
        format!("Hostel {}, {}, Room {}", self.hostel, self.location, self.room)
    }
}
