//! Signers, access codes and anchors

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::wire::nullable;
use crate::constants::{HOST_PIXELS_PER_INCH, POINTS_PER_INCH};
use crate::errors::Result;
use crate::impl_wire_enum;
use crate::validation::require_non_empty;

/// Whether a signer belongs to the envelope owner's organisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignerType {
    #[default]
    Internal,
    External,
}

impl_wire_enum!(SignerType {
    Internal => 0,
    External => 1,
});

/// Kind of action an anchor asks the signer to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnchorType {
    #[default]
    SignHere,
    Initial,
    Date,
    Checkbox,
}

impl_wire_enum!(AnchorType {
    SignHere => 0,
    Initial => 1,
    Date => 2,
    Checkbox => 3,
});

/// Shared secret an external signer must supply before signing
///
/// Only the description is shown to the signer; the value is compared
/// server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessCode {
    #[serde(rename = "Description", deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename = "Value", deserialize_with = "nullable")]
    pub value: String,
}

impl AccessCode {
    pub fn new(description: impl Into<String>, value: impl Into<String>) -> Self {
        Self { description: description.into(), value: value.into() }
    }

    /// # Errors
    /// Returns a validation error when the description or value is empty
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.description, "A description is required for the access code")?;
        require_non_empty(&self.value, "A value is required for the access code")
    }
}

/// Positioned marker on a document page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchor {
    #[serde(rename = "Id", deserialize_with = "nullable")]
    pub id: Uuid,
    #[serde(rename = "Doc_Id", deserialize_with = "nullable")]
    pub doc_id: Uuid,
    #[serde(rename = "Type", deserialize_with = "nullable")]
    pub anchor_type: AnchorType,
    #[serde(rename = "Page", deserialize_with = "nullable")]
    pub page: u32,
    #[serde(rename = "X", deserialize_with = "nullable")]
    pub x: f64,
    #[serde(rename = "Y", deserialize_with = "nullable")]
    pub y: f64,
    #[serde(rename = "Width", deserialize_with = "nullable")]
    pub width: f64,
    #[serde(rename = "Height", deserialize_with = "nullable")]
    pub height: f64,
    #[serde(rename = "Required", deserialize_with = "nullable")]
    pub required: bool,
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "Client_Data")]
    pub client_data: Option<String>,
}

impl Anchor {
    /// Build a required sign-here anchor from a host note measured in 96 dpi
    /// pixels. Coordinates are converted to 72 dpi points.
    pub fn sign_here_from_pixels(
        doc_id: Uuid,
        page: u32,
        (x, y): (f64, f64),
        (width, height): (f64, f64),
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            doc_id,
            anchor_type: AnchorType::SignHere,
            page,
            x: pixels_to_points(x),
            y: pixels_to_points(y),
            width: pixels_to_points(width),
            height: pixels_to_points(height),
            required: true,
            comment: None,
            client_data: None,
        }
    }
}

fn pixels_to_points(pixels: f64) -> f64 {
    pixels * POINTS_PER_INCH / HOST_PIXELS_PER_INCH
}

/// A person required to act on an envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Signer {
    #[serde(rename = "User_Id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "Type", deserialize_with = "nullable")]
    pub signer_type: SignerType,
    #[serde(rename = "First_Name", deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(rename = "Last_Name", deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(rename = "Email", deserialize_with = "nullable")]
    pub email: String,
    #[serde(rename = "Code", skip_serializing_if = "Option::is_none")]
    pub code: Option<AccessCode>,
    #[serde(rename = "Anchors", deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<Anchor>,
    #[serde(rename = "Completed", deserialize_with = "nullable")]
    pub completed: bool,
    #[serde(rename = "Rejected", deserialize_with = "nullable")]
    pub rejected: bool,
    #[serde(rename = "Reject_Reason", skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}

impl Signer {
    /// Signer payload for an internal user; only the email is meaningful
    pub fn internal(email: impl Into<String>) -> Self {
        Self { email: email.into(), signer_type: SignerType::Internal, ..Self::default() }
    }

    /// Signer payload for an external party
    pub fn external(dto: &SignerDto, code: Option<AccessCode>) -> Self {
        Self {
            email: dto.email.clone(),
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            signer_type: SignerType::External,
            code,
            ..Self::default()
        }
    }

    pub fn with_anchors(mut self, anchors: Vec<Anchor>) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Rules for `AddExternalSigner`: full identity, and a complete access
    /// code when one is attached
    ///
    /// # Errors
    /// Returns a validation error naming the first missing field
    pub fn validate_external(&self) -> Result<()> {
        SignerDto::new(&*self.email, &*self.first_name, &*self.last_name).validate_external()?;
        self.code.as_ref().map_or(Ok(()), AccessCode::validate)
    }

    /// Rules for `AddInternalSigner`: only the email is required
    ///
    /// # Errors
    /// Returns a validation error when the email is empty
    pub fn validate_internal(&self) -> Result<()> {
        require_non_empty(&self.email, "An email address is required for the internal signer")
    }
}

/// Identity of an external signer as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerDto {
    #[serde(rename = "First_Name", deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(rename = "Last_Name", deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(rename = "Email", deserialize_with = "nullable")]
    pub email: String,
}

impl SignerDto {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self { email: email.into(), first_name: first_name.into(), last_name: last_name.into() }
    }

    /// # Errors
    /// Returns a validation error when the email, first name or last name
    /// is empty
    pub fn validate_external(&self) -> Result<()> {
        require_non_empty(&self.email, "An email address is required for the external signer")?;
        require_non_empty(&self.first_name, "A first name is required for the external signer")?;
        require_non_empty(&self.last_name, "A last name is required for the external signer")
    }
}
