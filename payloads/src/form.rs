//! The create/edit property form: input validation, form state and the
//! two-step submission (save the record, then upload any selected files).

use crate::{
    APIClient, ClientError, Image, ImageId, Property, PropertyId,
    ValidationErrors, requests::UploadFile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyField {
    Address,
    Description,
    Price,
    Bedrooms,
    Bathrooms,
    SquareFootage,
}

impl PropertyField {
    pub const ALL: [PropertyField; 6] = [
        PropertyField::Address,
        PropertyField::Description,
        PropertyField::Price,
        PropertyField::Bedrooms,
        PropertyField::Bathrooms,
        PropertyField::SquareFootage,
    ];

    /// Key used for this field in validation error bodies.
    pub fn key(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Description => "description",
            Self::Price => "price",
            Self::Bedrooms => "bedrooms",
            Self::Bathrooms => "bathrooms",
            Self::SquareFootage => "squareFootage",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::Description => "Description",
            Self::Price => "Price (£)",
            Self::Bedrooms => "Bedrooms",
            Self::Bathrooms => "Bathrooms",
            Self::SquareFootage => "Square Footage",
        }
    }
}

/// Raw form input, one string per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDraft {
    pub address: String,
    pub description: String,
    pub price: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub square_footage: String,
}

impl PropertyDraft {
    pub fn from_property(property: &Property) -> Self {
        Self {
            address: property.address.clone(),
            description: property.description.clone(),
            price: property.price.to_string(),
            bedrooms: property.bedrooms.to_string(),
            bathrooms: property.bathrooms.to_string(),
            square_footage: property.square_footage.to_string(),
        }
    }

    pub fn get(&self, field: PropertyField) -> &str {
        match field {
            PropertyField::Address => &self.address,
            PropertyField::Description => &self.description,
            PropertyField::Price => &self.price,
            PropertyField::Bedrooms => &self.bedrooms,
            PropertyField::Bathrooms => &self.bathrooms,
            PropertyField::SquareFootage => &self.square_footage,
        }
    }

    pub fn set(&mut self, field: PropertyField, value: impl Into<String>) {
        let value = value.into();
        match field {
            PropertyField::Address => self.address = value,
            PropertyField::Description => self.description = value,
            PropertyField::Price => self.price = value,
            PropertyField::Bedrooms => self.bedrooms = value,
            PropertyField::Bathrooms => self.bathrooms = value,
            PropertyField::SquareFootage => self.square_footage = value,
        }
    }

    /// Check every field and build the record to send. All problems are
    /// reported at once, keyed like the backend's 400 body.
    pub fn validate(&self) -> Result<Property, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let address = self.address.trim();
        if address.is_empty() {
            errors.insert(PropertyField::Address.key(), "Address is required");
        }
        let price = positive(
            &mut errors,
            PropertyField::Price,
            &self.price,
            "Price",
        );
        let bedrooms = positive_whole(
            &mut errors,
            PropertyField::Bedrooms,
            &self.bedrooms,
            "Number of bedrooms",
        );
        let bathrooms = positive(
            &mut errors,
            PropertyField::Bathrooms,
            &self.bathrooms,
            "Number of bathrooms",
        );
        if bathrooms.is_some_and(|n| (n * 2.0).fract() != 0.0) {
            errors.insert(
                PropertyField::Bathrooms.key(),
                "Number of bathrooms must be in steps of 0.5",
            );
        }
        let square_footage = positive(
            &mut errors,
            PropertyField::SquareFootage,
            &self.square_footage,
            "Square footage",
        );

        match (price, bedrooms, bathrooms, square_footage) {
            (Some(price), Some(bedrooms), Some(bathrooms), Some(square_footage))
                if errors.is_empty() =>
            {
                Ok(Property {
                    id: None,
                    address: address.to_string(),
                    description: self.description.trim().to_string(),
                    price,
                    bedrooms,
                    bathrooms,
                    square_footage,
                    images: vec![],
                })
            }
            _ => Err(errors),
        }
    }
}

fn positive(
    errors: &mut ValidationErrors,
    field: PropertyField,
    input: &str,
    name: &str,
) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        errors.insert(field.key(), format!("{name} is required"));
        return None;
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        Ok(value) if value.is_finite() => {
            errors.insert(field.key(), format!("{name} must be greater than 0"));
            None
        }
        _ => {
            errors.insert(field.key(), format!("{name} must be a number"));
            None
        }
    }
}

fn positive_whole(
    errors: &mut ValidationErrors,
    field: PropertyField,
    input: &str,
    name: &str,
) -> Option<u32> {
    let trimmed = input.trim();
    if let Ok(value) = trimmed.parse::<u32>()
        && value > 0
    {
        return Some(value);
    }
    // not a usable u32: say why, in the same terms as the other fields
    let value = positive(errors, field, trimmed, name)?;
    let message = if value.fract() != 0.0 {
        format!("{name} must be a whole number")
    } else if value > f64::from(u32::MAX) {
        format!("{name} is too large")
    } else {
        // written as a float, e.g. "3.0"
        return Some(value as u32);
    };
    errors.insert(field.key(), message);
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(PropertyId),
}

impl FormMode {
    pub fn property_id(self) -> Option<PropertyId> {
        match self {
            Self::Create => None,
            Self::Edit(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    /// Edit mode only, waiting for the record to prefill from.
    LoadingExisting,
    Editing,
    Submitting,
    Succeeded,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Rejected locally or by the backend; nothing was saved.
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error("Error saving property. Please try again.")]
    SaveFailed(#[source] ClientError),
    /// The record was saved but its images were not.
    #[error("Error uploading images. Please try again.")]
    UploadFailed {
        property: Property,
        #[source]
        source: ClientError,
    },
    /// The backend saved the record but returned no id, so files selected
    /// for it could not be uploaded.
    #[error("Property saved, but its images could not be attached.")]
    SavedWithoutId(Property),
}

/// Save `property`, then upload `files` against the saved id if there are
/// any. The upload never starts before the save has completed, and an upload
/// failure leaves the saved record in place.
#[tracing::instrument(skip(client, property, files), fields(files = files.len()))]
pub async fn submit_property(
    client: &APIClient,
    mode: FormMode,
    property: &Property,
    files: &[UploadFile],
) -> Result<Property, SubmitError> {
    let saved = match mode {
        FormMode::Create => client.create_property(property).await,
        FormMode::Edit(id) => client.update_property(id, property).await,
    };
    let mut saved = saved.map_err(|e| match e {
        ClientError::Validation(errors) => SubmitError::Invalid(errors),
        e => SubmitError::SaveFailed(e),
    })?;

    if files.is_empty() {
        return Ok(saved);
    }
    let Some(id) = saved.id.or(mode.property_id()) else {
        tracing::warn!("Saved property has no id, skipping image upload");
        return Err(SubmitError::SavedWithoutId(saved));
    };
    match client.upload_images(id, files).await {
        Ok(images) => {
            saved.images.extend(images);
            Ok(saved)
        }
        Err(source) => {
            tracing::warn!("Property {id} saved but image upload failed: {source}");
            Err(SubmitError::UploadFailed {
                property: saved,
                source,
            })
        }
    }
}

/// Validate locally, then [`submit_property`]. Nothing is sent when
/// validation fails.
pub async fn submit_draft(
    client: &APIClient,
    mode: FormMode,
    draft: &PropertyDraft,
    files: &[UploadFile],
) -> Result<Property, SubmitError> {
    let property = draft.validate().map_err(SubmitError::Invalid)?;
    submit_property(client, mode, &property, files).await
}

/// State of one form instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyForm {
    pub mode: FormMode,
    pub phase: FormPhase,
    pub draft: PropertyDraft,
    /// Images already stored for the property being edited.
    pub existing_images: Vec<Image>,
    /// Files chosen for upload on submit.
    pub files: Vec<UploadFile>,
    pub field_errors: ValidationErrors,
    /// A form-wide message, e.g. a failed save.
    pub error: Option<String>,
}

impl PropertyForm {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            phase: FormPhase::Idle,
            draft: PropertyDraft::default(),
            existing_images: vec![],
            files: vec![],
            field_errors: ValidationErrors::new(),
            error: None,
        }
    }

    /// Leave `Idle`. Returns the id to fetch when editing.
    pub fn start(&mut self) -> Option<PropertyId> {
        match self.mode {
            FormMode::Create => {
                self.phase = FormPhase::Editing;
                None
            }
            FormMode::Edit(id) => {
                self.phase = FormPhase::LoadingExisting;
                Some(id)
            }
        }
    }

    pub fn loaded(&mut self, property: &Property) {
        self.draft = PropertyDraft::from_property(property);
        self.existing_images = property.images.clone();
        self.phase = FormPhase::Editing;
    }

    pub fn load_failed(&mut self, error: &ClientError) {
        self.error = Some(error.user_message());
        self.phase = FormPhase::Editing;
    }

    pub fn set_field(&mut self, field: PropertyField, value: impl Into<String>) {
        self.draft.set(field, value);
        self.field_errors.0.remove(field.key());
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = UploadFile>) {
        self.files.extend(files);
    }

    pub fn remove_file(&mut self, index: usize) {
        if index < self.files.len() {
            self.files.remove(index);
        }
    }

    /// Drop an image after the backend has confirmed its deletion.
    pub fn image_deleted(&mut self, id: ImageId) {
        self.existing_images.retain(|image| image.id != id);
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Validate and move to `Submitting`. On failure the field errors are
    /// shown and the form stays editable.
    pub fn begin_submit(&mut self) -> Option<Property> {
        if self.phase != FormPhase::Editing {
            return None;
        }
        self.error = None;
        match self.draft.validate() {
            Ok(property) => {
                self.field_errors = ValidationErrors::new();
                self.phase = FormPhase::Submitting;
                Some(property)
            }
            Err(errors) => {
                self.field_errors = errors;
                None
            }
        }
    }

    pub fn finish_submit(&mut self, result: &Result<Property, SubmitError>) {
        match result {
            Ok(_) => {
                self.phase = FormPhase::Succeeded;
                self.files.clear();
            }
            Err(SubmitError::Invalid(errors)) => {
                self.field_errors = errors.clone();
                self.phase = FormPhase::Editing;
            }
            Err(SubmitError::UploadFailed { property, .. }) => {
                self.error = result.as_ref().err().map(ToString::to_string);
                // the record exists now; retrying must update, not create
                if let Some(id) = property.id {
                    self.mode = FormMode::Edit(id);
                }
                self.phase = FormPhase::Editing;
            }
            Err(
                e @ (SubmitError::SaveFailed(_)
                | SubmitError::SavedWithoutId(_)),
            ) => {
                self.error = Some(e.to_string());
                self.phase = FormPhase::Editing;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PropertyDraft {
        PropertyDraft {
            address: " 10 Downing Street ".into(),
            description: "Period townhouse".into(),
            price: "1250000".into(),
            bedrooms: "3".into(),
            bathrooms: "1.5".into(),
            square_footage: "1800".into(),
        }
    }

    #[test]
    fn valid_draft_builds_a_property() {
        let property = valid_draft().validate().unwrap();
        assert_eq!(property.id, None);
        assert_eq!(property.address, "10 Downing Street");
        assert_eq!(property.bedrooms, 3);
        assert_eq!(property.bathrooms, 1.5);
    }

    #[test]
    fn negative_price_is_rejected_with_a_price_error() {
        let mut draft = valid_draft();
        draft.price = "-5".into();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_field(PropertyField::Price),
            Some("Price must be greater than 0")
        );
    }

    #[test]
    fn every_invalid_field_is_reported() {
        let draft = PropertyDraft {
            bedrooms: "2.5".into(),
            bathrooms: "1.25".into(),
            square_footage: "big".into(),
            ..Default::default()
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.for_field(PropertyField::Address),
            Some("Address is required")
        );
        assert_eq!(
            errors.for_field(PropertyField::Price),
            Some("Price is required")
        );
        assert!(errors.for_field(PropertyField::Bedrooms).is_some());
        assert!(errors.for_field(PropertyField::Bathrooms).is_some());
        assert_eq!(
            errors.for_field(PropertyField::SquareFootage),
            Some("Square footage must be a number")
        );
        assert_eq!(errors.for_field(PropertyField::Description), None);
    }

    #[test]
    fn bedrooms_beyond_u32_are_rejected_not_saturated() {
        let mut draft = valid_draft();
        draft.bedrooms = "99999999999".into();
        assert_eq!(
            draft.validate().unwrap_err().get("bedrooms"),
            Some("Number of bedrooms is too large")
        );

        draft.bedrooms = "2.5".into();
        assert_eq!(
            draft.validate().unwrap_err().get("bedrooms"),
            Some("Number of bedrooms must be a whole number")
        );

        draft.bedrooms = "3.0".into();
        assert_eq!(draft.validate().unwrap().bedrooms, 3);
    }

    #[test]
    fn non_finite_numbers_are_not_numbers() {
        let mut draft = valid_draft();
        draft.price = "1e400".into();
        draft.square_footage = "inf".into();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get("price"), Some("Price must be a number"));
        assert_eq!(
            errors.get("squareFootage"),
            Some("Square footage must be a number")
        );
    }

    #[test]
    fn zero_is_not_positive() {
        let mut draft = valid_draft();
        draft.bedrooms = "0".into();
        assert_eq!(
            draft.validate().unwrap_err().get("bedrooms"),
            Some("Number of bedrooms must be greater than 0")
        );
    }

    #[test]
    fn edit_form_loads_then_edits() {
        let mut form = PropertyForm::new(FormMode::Edit(PropertyId(4)));
        assert_eq!(form.phase, FormPhase::Idle);
        assert_eq!(form.start(), Some(PropertyId(4)));
        assert_eq!(form.phase, FormPhase::LoadingExisting);

        let property = valid_draft().validate().unwrap();
        form.loaded(&property);
        assert_eq!(form.phase, FormPhase::Editing);
        assert_eq!(form.draft.price, "1250000");
    }

    #[test]
    fn local_validation_failure_keeps_the_form_editable() {
        let mut form = PropertyForm::new(FormMode::Create);
        form.start();
        form.set_field(PropertyField::Price, "-5");
        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.phase, FormPhase::Editing);
        assert!(form.field_errors.for_field(PropertyField::Price).is_some());

        // editing a field clears its error
        form.set_field(PropertyField::Price, "5");
        assert_eq!(form.field_errors.for_field(PropertyField::Price), None);
    }

    #[test]
    fn server_validation_errors_map_back_to_fields() {
        let mut form = PropertyForm::new(FormMode::Create);
        form.start();
        form.draft = valid_draft();
        assert!(form.begin_submit().is_some());
        assert!(form.is_submitting());

        let mut errors = ValidationErrors::new();
        errors.insert("address", "Address is required");
        form.finish_submit(&Err(SubmitError::Invalid(errors)));
        assert_eq!(form.phase, FormPhase::Editing);
        assert_eq!(
            form.field_errors.for_field(PropertyField::Address),
            Some("Address is required")
        );
        assert_eq!(form.error, None);
    }

    #[test]
    fn upload_failure_switches_to_editing_the_saved_record() {
        let mut form = PropertyForm::new(FormMode::Create);
        form.start();
        form.draft = valid_draft();
        let mut property = form.begin_submit().unwrap();
        property.id = Some(PropertyId(42));

        form.finish_submit(&Err(SubmitError::UploadFailed {
            property,
            source: ClientError::APIError(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                String::new(),
            ),
        }));
        assert_eq!(form.mode, FormMode::Edit(PropertyId(42)));
        assert_eq!(
            form.error.as_deref(),
            Some("Error uploading images. Please try again.")
        );
    }

    #[test]
    fn save_without_an_id_is_reported_as_its_own_failure() {
        let mut form = PropertyForm::new(FormMode::Create);
        form.start();
        form.draft = valid_draft();
        let property = form.begin_submit().unwrap();

        form.finish_submit(&Err(SubmitError::SavedWithoutId(property)));
        assert_eq!(form.phase, FormPhase::Editing);
        assert_eq!(form.mode, FormMode::Create);
        assert_eq!(
            form.error.as_deref(),
            Some("Property saved, but its images could not be attached.")
        );
    }
}
