//! Relief supply categories.

use serde::{Deserialize, Serialize};

/// The fixed catalogue of relief supplies tracked per distribution center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemName {
    FirstAidKit,
    FireExtinguisher,
    EmergencyBlanket,
    WaterBottles,
    FoodRations,
    Flashlight,
    Radio,
    Batteries,
    MedicalSupplies,
    RescueEquipment,
}

impl ItemName {
    pub fn parse(s: &str) -> Option<ItemName> {
        match s {
            "first_aid_kit" => Some(ItemName::FirstAidKit),
            "fire_extinguisher" => Some(ItemName::FireExtinguisher),
            "emergency_blanket" => Some(ItemName::EmergencyBlanket),
            "water_bottles" => Some(ItemName::WaterBottles),
            "food_rations" => Some(ItemName::FoodRations),
            "flashlight" => Some(ItemName::Flashlight),
            "radio" => Some(ItemName::Radio),
            "batteries" => Some(ItemName::Batteries),
            "medical_supplies" => Some(ItemName::MedicalSupplies),
            "rescue_equipment" => Some(ItemName::RescueEquipment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemName::FirstAidKit => "first_aid_kit",
            ItemName::FireExtinguisher => "fire_extinguisher",
            ItemName::EmergencyBlanket => "emergency_blanket",
            ItemName::WaterBottles => "water_bottles",
            ItemName::FoodRations => "food_rations",
            ItemName::Flashlight => "flashlight",
            ItemName::Radio => "radio",
            ItemName::Batteries => "batteries",
            ItemName::MedicalSupplies => "medical_supplies",
            ItemName::RescueEquipment => "rescue_equipment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips() {
        for name in [
            ItemName::FirstAidKit,
            ItemName::WaterBottles,
            ItemName::RescueEquipment,
        ] {
            assert_eq!(ItemName::parse(name.as_str()), Some(name));
        }
        assert_eq!(ItemName::parse("tents"), None);
    }
}
