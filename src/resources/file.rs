//! File uploads.

use std::path::Path;

use crate::error::ApiError;
use crate::object::Object;
use crate::request;
use crate::resource::ResourceKind;
use crate::transport::{FileUpload, Transport};
use crate::types::RequestOptions;

const ENDPOINT: &str = "files";

/// Upload the file at `path` for `purpose` (e.g. `dispute_evidence`).
pub fn upload<T: Transport + ?Sized>(
    transport: &T,
    purpose: &str,
    path: &Path,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    let file = FileUpload::new(purpose, path);
    request::upload(transport, ENDPOINT, &file, ResourceKind::File, options)
}

pub fn retrieve<T: Transport + ?Sized>(
    transport: &T,
    id: &str,
    options: &RequestOptions,
) -> Result<Object, ApiError> {
    request::retrieve(
        transport,
        &format!("{}/{}", ENDPOINT, id),
        ResourceKind::File,
        options,
    )
}
