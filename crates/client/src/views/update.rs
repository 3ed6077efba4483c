use std::sync::Arc;

use cinedex_core::{Movie, MovieDraft};

use crate::error::{ClientError, ClientResult};
use crate::form::{self, MovieForm};
use crate::navigation::Navigator;
use crate::resolver::Resolution;
use crate::service::{EntityResponse, MovieTransport};
use crate::views::BusyFlag;

/// Create/edit page.
pub struct MovieUpdateView {
    transport: Arc<dyn MovieTransport>,
    navigator: Arc<dyn Navigator>,
    form: MovieForm,
    is_saving: BusyFlag,
}

impl MovieUpdateView {
    pub fn new(
        transport: Arc<dyn MovieTransport>,
        navigator: Arc<dyn Navigator>,
        resolution: Resolution,
    ) -> Self {
        let mut view = Self {
            transport,
            navigator,
            form: form::create_form(None),
            is_saving: BusyFlag::default(),
        };
        if let Some(movie) = resolution.into_movie() {
            view.update_form(&MovieDraft::Existing(movie));
        }
        view
    }

    pub fn form(&self) -> &MovieForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut MovieForm {
        &mut self.form
    }

    pub fn update_form(&mut self, draft: &MovieDraft) {
        form::reset_form(&mut self.form, draft);
    }

    pub fn is_new(&self) -> bool {
        self.form.id().is_none()
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving.get()
    }

    pub fn saving_flag(&self) -> BusyFlag {
        self.is_saving.clone()
    }

    pub fn previous_state(&self) {
        self.navigator.back();
    }

    /// Update when the form holds an id, create otherwise.
    ///
    /// Navigates back only on success; the error is handed to the caller.
    pub async fn save(&mut self) -> ClientResult<Option<Movie>> {
        let _saving = self.is_saving.raise();
        self.form.validate()?;

        let result = match form::extract(&self.form) {
            MovieDraft::Existing(movie) => self.transport.update(&movie).await,
            MovieDraft::New(movie) => self.transport.create(&movie).await,
        };

        self.finish(result)
    }

    /// Send only the filled-in fields of an existing record (merge patch).
    pub async fn save_patch(&mut self) -> ClientResult<Option<Movie>> {
        let _saving = self.is_saving.raise();
        self.form.validate()?;

        let patch = form::extract_patch(&self.form).ok_or(ClientError::MissingId)?;
        let result = self.transport.partial_update(&patch).await;
        self.finish(result)
    }

    fn finish(&self, result: ClientResult<EntityResponse<Movie>>) -> ClientResult<Option<Movie>> {
        match result {
            Ok(response) => {
                self.previous_state();
                Ok(response.body)
            }
            Err(e) => {
                tracing::warn!(error = %e, "saving movie failed");
                Err(e)
            }
        }
    }
}
