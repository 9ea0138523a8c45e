use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EntityModel, Result};

/// Where a shipment of specimens is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentState {
    Created,
    Packed,
    Sent,
    Received,
    Unpacked,
    Completed,
    Lost,
}

/// A shipment of specimens between two centres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_modified: Option<String>,
    pub courier_name: String,
    pub tracking_number: String,
    pub from_location_name: String,
    pub to_location_name: String,
    pub state: ShipmentState,
}

impl EntityModel for Shipment {
    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Parses a shipment from the server's JSON representation.
pub fn parse_shipment(raw: Value) -> Result<Shipment> {
    Ok(serde_json::from_value(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_the_wire_representation() {
        let shipment = parse_shipment(json!({
            "id": "s-1",
            "version": 1,
            "courierName": "FastFreight",
            "trackingNumber": "FF-1234",
            "fromLocationName": "Edmonton Centre",
            "toLocationName": "Calgary Centre",
            "state": "sent"
        }))
        .unwrap();

        assert_eq!(shipment.id, "s-1");
        assert_eq!(shipment.state, ShipmentState::Sent);
        assert_eq!(shipment.tracking_number, "FF-1234");
    }
}
