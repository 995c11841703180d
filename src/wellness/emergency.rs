//! Emergency contact and medical profile

use super::WellnessError;
use serde::{Deserialize, Serialize};

/// Shown on the emergency view above everything else
pub const EMERGENCY_NOTICE: &str = "This is not a substitute for emergency services. \
If you are experiencing a medical emergency, please call 911 or your local emergency number immediately.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyProfile {
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub blood_type: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub medications: String,
}

/// Who to reach, once a contact exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
}

impl EmergencyProfile {
    /// Trim every field
    pub fn normalized(self) -> Self {
        Self {
            contact_name: self.contact_name.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
            blood_type: self.blood_type.trim().to_uppercase(),
            allergies: self.allergies.trim().to_string(),
            medications: self.medications.trim().to_string(),
        }
    }

    /// Build a request to reach the emergency contact. Needs a phone number.
    pub fn contact_request(&self) -> Result<ContactRequest, WellnessError> {
        let phone = self.contact_phone.trim();
        if phone.is_empty() {
            return Err(WellnessError::NoEmergencyContact);
        }
        let name = match self.contact_name.trim() {
            "" => "your emergency contact",
            name => name,
        };
        Ok(ContactRequest {
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }
}
