use std::io::{Read, Seek, SeekFrom};

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    ProductCategory, ProductDescription, ProductTitle, SellPrice, TypeConstraintError,
};
use crate::storage::UploadedImage;

/// Multipart body accepted by the create and edit endpoints: text fields for
/// the product record plus repeated `images` file parts.
#[derive(MultipartForm)]
pub struct ProductForm {
    pub title: Text<String>,
    pub category: Text<String>,
    pub description: Text<String>,
    pub sell_price: Text<i32>,
    #[multipart(limit = "10MB")]
    pub images: Vec<TempFile>,
}

#[derive(Debug, Validate)]
struct ProductFields {
    #[validate(length(min = 1))]
    title: String,
    #[validate(length(min = 1))]
    category: String,
    #[validate(length(min = 1))]
    description: String,
    #[validate(range(min = 0))]
    sell_price: i32,
}

/// Validated payload for product creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProductPayload {
    pub title: ProductTitle,
    pub category: ProductCategory,
    pub description: ProductDescription,
    pub sell_price: SellPrice,
    pub images: Vec<UploadedImage>,
}

/// Validated payload for product edits. `images` is `None` when the client
/// sent no file parts, which keeps the stored image set.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductPayload {
    pub title: ProductTitle,
    pub category: ProductCategory,
    pub description: ProductDescription,
    pub sell_price: SellPrice,
    pub images: Option<Vec<UploadedImage>>,
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("at least one image is required")]
    MissingImages,
    #[error("uploaded part is not an image")]
    NotAnImage,
    #[error("uploaded image is empty")]
    EmptyImage,
    #[error("failed to read uploaded image")]
    ReadFailed,
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl From<std::io::Error> for ProductFormError {
    fn from(_: std::io::Error) -> Self {
        Self::ReadFailed
    }
}

fn decode_images(files: &mut [TempFile]) -> Result<Vec<UploadedImage>, ProductFormError> {
    let mut images = Vec::with_capacity(files.len());

    for file in files {
        if let Some(content_type) = file.content_type.as_ref() {
            if !content_type.essence_str().starts_with("image/") {
                return Err(ProductFormError::NotAnImage);
            }
        }

        let handle = file.file.as_file_mut();
        handle.seek(SeekFrom::Start(0))?;

        let mut bytes = Vec::with_capacity(file.size);
        handle.read_to_end(&mut bytes)?;

        if bytes.is_empty() {
            return Err(ProductFormError::EmptyImage);
        }

        images.push(UploadedImage {
            file_name: file.file_name.clone(),
            content_type: file
                .content_type
                .as_ref()
                .map(|mime| mime.essence_str().to_string()),
            bytes,
        });
    }

    Ok(images)
}

impl TryFrom<ProductForm> for CreateProductPayload {
    type Error = ProductFormError;

    fn try_from(mut form: ProductForm) -> Result<Self, Self::Error> {
        let images = decode_images(&mut form.images)?;
        if images.is_empty() {
            return Err(ProductFormError::MissingImages);
        }

        let fields = ProductFields {
            title: form.title.into_inner(),
            category: form.category.into_inner(),
            description: form.description.into_inner(),
            sell_price: form.sell_price.into_inner(),
        };
        fields.validate()?;

        Ok(Self {
            title: ProductTitle::new(fields.title)?,
            category: ProductCategory::try_from(fields.category.as_str())?,
            description: ProductDescription::new(fields.description)?,
            sell_price: SellPrice::new(fields.sell_price)?,
            images,
        })
    }
}

impl TryFrom<ProductForm> for UpdateProductPayload {
    type Error = ProductFormError;

    fn try_from(mut form: ProductForm) -> Result<Self, Self::Error> {
        let images = decode_images(&mut form.images)?;
        let images = if images.is_empty() {
            None
        } else {
            Some(images)
        };

        let fields = ProductFields {
            title: form.title.into_inner(),
            category: form.category.into_inner(),
            description: form.description.into_inner(),
            sell_price: form.sell_price.into_inner(),
        };
        fields.validate()?;

        Ok(Self {
            title: ProductTitle::new(fields.title)?,
            category: ProductCategory::try_from(fields.category.as_str())?,
            description: ProductDescription::new(fields.description)?,
            sell_price: SellPrice::new(fields.sell_price)?,
            images,
        })
    }
}
