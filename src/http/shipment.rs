//! Shipment upload records accepted on `/parsifal`.

use serde::{Deserialize, Serialize};

/// Freight bill record as posted by the audit front end.
///
/// Keys are the human-readable column titles of the upstream sheet, spelling
/// included. Missing keys read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShipmentRecord {
    #[serde(rename = "Shipment Type")]
    pub shipment_type: String,
    #[serde(rename = "Transit Type")]
    pub transit_type: String,
    #[serde(rename = "Transit Mode")]
    pub transit_mode: String,
    #[serde(rename = "Bill Type")]
    pub bill_type: String,
    #[serde(rename = "Auditor")]
    pub auditor: String,
    #[serde(rename = "Storage On Bill")]
    pub storage_on_bill: String,
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Division")]
    pub division: String,
    #[serde(rename = "File Number")]
    pub file_number: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Booking Agent")]
    pub booking_agent: String,
    #[serde(rename = "Load Date")]
    pub load_date: String,
    #[serde(rename = "Origin Country")]
    pub origin_country: String,
    #[serde(rename = "Origin State")]
    pub origin_state: String,
    #[serde(rename = "Origin City")]
    pub origin_city: String,
    #[serde(rename = "Destination Country")]
    pub destination_country: String,
    #[serde(rename = "Destination City")]
    pub destination_city: String,
    #[serde(rename = "Billing SP")]
    pub billing_sp: String,
    #[serde(rename = "SP Bill Number")]
    pub sp_bill_number: String,
    #[serde(rename = "SP Bill Date")]
    pub sp_bill_date: String,
    #[serde(rename = "SP Bill Amount")]
    pub sp_bill_amount: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Bill received Date")]
    pub bill_received_date: String,
    #[serde(rename = "Cost Center")]
    pub cost_center: String,
    #[serde(rename = "cost EE Number")]
    pub cost_ee_number: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "ModelCD")]
    pub model_cd: String,
    #[serde(rename = "SPBill Gross amount")]
    pub sp_bill_gross_amount: String,
}

impl ShipmentRecord {
    /// Malformed bodies read as an empty record.
    pub fn decode(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Could not decode shipment record");
            Self::default()
        })
    }
}

/// Answer to an upload: `Success`, or `FAILURE` with the write error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub success: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn stored() -> Self {
        Self {
            success: "Success",
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: "FAILURE",
            error: Some(error.to_string()),
        }
    }
}
