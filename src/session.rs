//! Editing-session state.
//!
//! A [`Session`] owns everything the contact form used to keep as ambient UI
//! state: the fields being edited, the live vCard preview, and the most
//! recently generated image together with where it is in its lifecycle.

use std::path::{Path, PathBuf};

use crate::async_api::ImageClient;
use crate::contact::{ContactRecord, Field};
use crate::render::{PixelDimension, RenderedImage};
use crate::vcard::{self, NotReady, VCardText};
use crate::{export, Error, Result};

/// Where the session's QR image is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    NoImage,
    Requested,
    Ready,
    Failed,
    Exported,
}

/// Handle for one generation request, issued by [`Session::begin_generation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    id: u64,
    payload: VCardText,
    size: PixelDimension,
}

impl GenerationTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn payload(&self) -> &VCardText {
        &self.payload
    }

    pub fn size(&self) -> PixelDimension {
        self.size
    }
}

/// One person's editing session.
#[derive(Debug, Default)]
pub struct Session {
    record: ContactRecord,
    preview: String,
    image: Option<RenderedImage>,
    state: ImageState,
    issued: u64,
    completed: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::with_record(ContactRecord::default())
    }

    pub fn with_record(record: ContactRecord) -> Self {
        let preview = vcard::preview(&record);
        Self {
            record,
            preview,
            ..Default::default()
        }
    }

    pub fn record(&self) -> &ContactRecord {
        &self.record
    }

    /// Update one field and refresh the preview.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.record.set(field, value);
        self.refresh_preview();
    }

    /// Replace the whole record and refresh the preview.
    pub fn set_record(&mut self, record: ContactRecord) {
        self.record = record;
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        self.preview = vcard::preview(&self.record);
    }

    /// Live preview: the vCard text, or the placeholder while not ready.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn vcard(&self) -> std::result::Result<VCardText, NotReady> {
        vcard::build(&self.record)
    }

    pub fn image(&self) -> Option<&RenderedImage> {
        self.image.as_ref()
    }

    pub fn image_state(&self) -> ImageState {
        self.state
    }

    /// Start a generation request for the current record.
    ///
    /// Fails with a validation error, and leaves the image state alone, when
    /// a required field is missing.
    pub fn begin_generation(&mut self, size: PixelDimension) -> Result<GenerationTicket> {
        let payload = self.vcard()?;
        self.issued += 1;
        self.state = ImageState::Requested;
        Ok(GenerationTicket {
            id: self.issued,
            payload,
            size,
        })
    }

    /// Record the outcome of a generation request.
    ///
    /// Results for a ticket older than one that already completed are
    /// dropped with [`Error::Stale`]. A failure keeps the previous image, if
    /// any, and is returned to the caller. While a newer request is still
    /// outstanding the state stays [`ImageState::Requested`].
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        outcome: Result<RenderedImage>,
    ) -> Result<&RenderedImage> {
        if ticket.id <= self.completed {
            log::warn!(
                "ignoring result of generation #{} (#{} already completed)",
                ticket.id,
                self.completed
            );
            return Err(Error::Stale);
        }
        self.completed = ticket.id;
        // a newer request is still in flight
        let superseded = self.issued > ticket.id;

        match outcome {
            Ok(image) => {
                log::debug!("generation #{} ready (sha256 {})", ticket.id, image.digest());
                if !superseded {
                    self.state = ImageState::Ready;
                }
                Ok(&*self.image.insert(image))
            }
            Err(err) => {
                if !superseded {
                    self.state = ImageState::Failed;
                }
                Err(err)
            }
        }
    }

    /// Generate the QR image for the current record through `client`.
    pub async fn generate(&mut self, client: &ImageClient) -> Result<&RenderedImage> {
        let ticket = self.begin_generation(client.size())?;
        let outcome = client
            .acquire_image(Some(ticket.payload()), ticket.size())
            .await;
        self.finish_generation(ticket, outcome)
    }

    /// Save the current image into `dir` under the derived filename.
    pub fn download(&mut self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = export::save(
            self.image.as_ref(),
            &self.record.first_name,
            &self.record.last_name,
            dir,
        )?;
        self.state = ImageState::Exported;
        Ok(path)
    }
}
