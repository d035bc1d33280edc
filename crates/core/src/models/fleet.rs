//! Fleet listing models (`GET /fleet/available`)

use crate::types::Usd;
use serde::{Deserialize, Serialize};

/// A vehicle as listed in the fleet
///
/// Listings are loosely shaped: the id may arrive as `id` or `vehicleId`,
/// the label as `name` or `make` + `model`, and the rate as `price` or
/// `rentalCostPerDay`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "type")]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Usd>,
    #[serde(default)]
    pub rental_cost_per_day: Option<Usd>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub vehicle_image_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Vehicle {
    /// Id to book this vehicle under
    pub fn key(&self) -> Option<i64> {
        self.vehicle_id.or(self.id)
    }

    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        let make = self.make.as_deref().unwrap_or_default();
        let model = self.model.as_deref().unwrap_or_default();
        let joined = format!("{} {}", make, model);
        let joined = joined.trim();
        if joined.is_empty() {
            "Unnamed vehicle".to_string()
        } else {
            joined.to_string()
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.vehicle_type.as_deref().or(self.category.as_deref())
    }

    pub fn daily_rate(&self) -> Option<Usd> {
        self.price.or(self.rental_cost_per_day)
    }

    /// Only an explicit "available" status counts
    pub fn is_available(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("available"))
    }
}

/// Response from `GET /fleet/available?page=N&size=M`
///
/// Either `{ "data": { "vehicles": [..], "pagination": {..} } }` or a
/// Spring page `{ "content": [..], "totalPages": .., "totalElements": .. }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetResponse {
    #[serde(default)]
    pub data: Option<FleetData>,
    #[serde(default)]
    pub content: Option<Vec<Vehicle>>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_elements: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FleetData {
    #[serde(default)]
    pub vehicles: Option<Vec<Vehicle>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
}

/// One page of the fleet; `page` is zero-based
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetPage {
    pub page: u32,
    pub vehicles: Vec<Vehicle>,
    pub total_pages: u32,
    pub total_items: u64,
}

impl FleetPage {
    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }
}

impl FleetResponse {
    /// Unrecognized shapes yield an empty page
    pub fn into_page(self, page: u32) -> FleetPage {
        let wrapped = self
            .data
            .and_then(|data| data.vehicles.map(|v| (v, data.pagination.unwrap_or_default())));
        if let Some((vehicles, pagination)) = wrapped {
            return FleetPage {
                page,
                vehicles,
                total_pages: pagination.total_pages,
                total_items: pagination.total_items,
            };
        }

        match self.content {
            Some(vehicles) => FleetPage {
                page,
                vehicles,
                total_pages: self.total_pages.unwrap_or_default(),
                total_items: self.total_elements.unwrap_or_default(),
            },
            None => FleetPage {
                page,
                vehicles: Vec::new(),
                total_pages: 0,
                total_items: 0,
            },
        }
    }
}
