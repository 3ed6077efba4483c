//! Editable form state for the create/edit view.
//!
//! The identifier is always part of the form but disabled: it is shown,
//! never edited. Everything else goes through setters that reject values
//! the record cannot hold.

use thiserror::Error;

use cinedex_core::{Movie, MovieDraft, MovieId, MoviePatch, NewMovie};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Id,
    Name,
    Category,
    Rating,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Id => "id",
            FormField::Name => "name",
            FormField::Category => "category",
            FormField::Rating => "rating",
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, FormField::Id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("field '{}' is disabled", .0.as_str())]
    FieldDisabled(FormField),

    #[error("field '{}' expects a number, got {value:?}", field.as_str())]
    InvalidNumber { field: FormField, value: String },
}

/// Current values of the edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieForm {
    id: Option<MovieId>,
    name: Option<String>,
    category: Option<String>,
    rating: Option<f64>,
}

impl MovieForm {
    pub fn id(&self) -> Option<MovieId> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    pub fn set_id(&mut self, _id: Option<MovieId>) -> Result<(), FormError> {
        Err(FormError::FieldDisabled(FormField::Id))
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    pub fn set_rating(&mut self, rating: Option<f64>) -> Result<(), FormError> {
        if let Some(value) = rating {
            check_finite(FormField::Rating, value)?;
        }
        self.rating = rating;
        Ok(())
    }

    /// Set the rating from raw input text; blank input clears it.
    pub fn set_rating_text(&mut self, raw: &str) -> Result<(), FormError> {
        let raw = raw.trim();
        if raw.is_empty() {
            self.rating = None;
            return Ok(());
        }
        let value = raw.parse::<f64>().map_err(|_| FormError::InvalidNumber {
            field: FormField::Rating,
            value: raw.to_string(),
        })?;
        self.set_rating(Some(value))
    }

    /// Check the enabled fields. The disabled id is skipped: a new record
    /// has none.
    pub fn validate(&self) -> Result<(), FormError> {
        if let Some(value) = self.rating {
            check_finite(FormField::Rating, value)?;
        }
        Ok(())
    }
}

fn check_finite(field: FormField, value: f64) -> Result<(), FormError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FormError::InvalidNumber {
            field,
            value: value.to_string(),
        })
    }
}

/// A form seeded with defaults, overlaid by `initial` when given.
pub fn create_form(initial: Option<&MovieDraft>) -> MovieForm {
    let mut form = MovieForm::default();
    if let Some(draft) = initial {
        reset_form(&mut form, draft);
    }
    form
}

/// Reinitialize every field from `draft`; a new record leaves the id empty.
pub fn reset_form(form: &mut MovieForm, draft: &MovieDraft) {
    *form = match draft {
        MovieDraft::Existing(movie) => MovieForm {
            id: Some(movie.id),
            name: movie.name.clone(),
            category: movie.category.clone(),
            rating: movie.rating,
        },
        MovieDraft::New(movie) => MovieForm {
            id: None,
            name: movie.name.clone(),
            category: movie.category.clone(),
            rating: movie.rating,
        },
    };
}

pub fn extract(form: &MovieForm) -> MovieDraft {
    match form.id {
        Some(id) => MovieDraft::Existing(Movie {
            id,
            name: form.name.clone(),
            category: form.category.clone(),
            rating: form.rating,
        }),
        None => MovieDraft::New(NewMovie {
            name: form.name.clone(),
            category: form.category.clone(),
            rating: form.rating,
        }),
    }
}

/// The non-empty fields as a partial update; `None` for a record without id.
pub fn extract_patch(form: &MovieForm) -> Option<MoviePatch> {
    let id = form.id?;
    Some(MoviePatch {
        id,
        name: form.name.clone(),
        category: form.category.clone(),
        rating: form.rating,
    })
}
