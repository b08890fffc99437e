// Room offers as returned by the reservation service. The wire format
// keeps the vendor's field names; accessors expose clean display values.
// Everything here is read-only data owned by the remote service.

use serde::Deserialize;

use crate::format;

const DEFAULT_DESCRIPTION: &str =
    "Indulge in comfort with premium amenities and elegant design";

/// Response envelope of the search endpoint:
/// `{ success, data: [offers], message? }`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<RoomOffer>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One bookable unit. Field names follow the reservation vendor's JSON.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RoomOffer {
    #[serde(rename = "roomrateunkid")]
    pub id: Option<i64>,

    #[serde(rename = "Room_Name")]
    pub name: Option<String>,

    #[serde(rename = "Roomtype_Name")]
    pub room_type_name: Option<String>,

    #[serde(rename = "Room_Description")]
    pub description: Option<String>,

    #[serde(rename = "room_main_image")]
    pub main_image: Option<String>,

    #[serde(rename = "Room_Max_adult")]
    pub max_adults: u32,

    #[serde(rename = "Room_Max_child")]
    pub max_children: u32,

    #[serde(rename = "min_ava_rooms")]
    pub available_rooms: i64,

    #[serde(rename = "currency_sign")]
    pub currency_symbol: String,

    #[serde(rename = "room_rates_info")]
    pub rates: Option<RoomRates>,

    #[serde(rename = "deals")]
    pub deal: Option<String>,

    #[serde(rename = "BookingEngineURL")]
    pub booking_url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RoomRates {
    pub avg_per_night_after_discount: Option<f64>,
    pub totalprice_inclusive_all: Option<f64>,
}

impl RoomOffer {
    /// Room name, falling back to the room-type name when unset.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.room_type_name.as_deref())
            .unwrap_or("Room")
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }

    pub fn nightly_rate(&self) -> Option<f64> {
        self.rates
            .as_ref()
            .and_then(|r| r.avg_per_night_after_discount)
    }

    pub fn total_price(&self) -> Option<f64> {
        self.rates.as_ref().and_then(|r| r.totalprice_inclusive_all)
    }

    pub fn nightly_rate_display(&self) -> String {
        format::format_money(&self.currency_symbol, self.nightly_rate())
    }

    pub fn total_price_display(&self) -> String {
        format::format_money(&self.currency_symbol, self.total_price())
    }

    // Capacity always spells out both nouns ("2 Adults, 0 Children"),
    // unlike the guest summary which drops zero children.
    pub fn capacity_summary(&self) -> String {
        format!("{} Adults, {} Children", self.max_adults, self.max_children)
    }

    pub fn availability_label(&self) -> String {
        format::rooms_left_label(self.available_rooms)
    }
}
