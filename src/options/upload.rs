//! Upload-aware option building (GraphQL multipart request).

use super::{construct_default_options, FetchOptions, MultipartForm, OptionBuilder, RequestBody};
use crate::types::{FileUpload, Operation};
use crate::{Error, Result};
use reqwest::Method;
use serde_json::Value;

/// A file lifted out of the variables, with the dotted path it came from
/// (e.g. `variables.files.0`).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFile {
    pub path: String,
    pub file: FileUpload,
}

/// Finds file blobs inside a variables tree.
///
/// Implementations replace every extracted blob with `null` in place so the
/// remaining tree can be serialized as the `operations` field.
pub trait FileExtractor: Send + Sync {
    fn extract_files(&self, variables: &mut Value, path: &str) -> Vec<ExtractedFile>;
}

/// Extracts [`FileUpload`] markers (see [`crate::types::upload`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkedFileExtractor;

impl MarkedFileExtractor {
    fn walk(value: &mut Value, path: &str, out: &mut Vec<ExtractedFile>) {
        if let Some(file) = FileUpload::from_value(value) {
            *value = Value::Null;
            out.push(ExtractedFile {
                path: path.to_string(),
                file,
            });
            return;
        }
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    Self::walk(child, &format!("{}.{}", path, key), out);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter_mut().enumerate() {
                    Self::walk(child, &format!("{}.{}", path, index), out);
                }
            }
            _ => {}
        }
    }
}

impl FileExtractor for MarkedFileExtractor {
    fn extract_files(&self, variables: &mut Value, path: &str) -> Vec<ExtractedFile> {
        let mut out = Vec::new();
        Self::walk(variables, path, &mut out);
        out
    }
}

/// Multipart encoding when the variables carry files, JSON otherwise.
pub fn construct_upload_options(
    extractor: &dyn FileExtractor,
    mut operation: Operation,
    options: FetchOptions,
) -> Result<FetchOptions> {
    let batched = operation.is_batched();
    let mut files = Vec::new();
    for (index, request) in operation.requests_mut().iter_mut().enumerate() {
        let Some(variables) = request.variables.as_mut() else {
            continue;
        };
        let prefix = if batched {
            format!("{}.variables", index)
        } else {
            "variables".to_string()
        };
        files.extend(extractor.extract_files(variables, &prefix));
    }

    if files.is_empty() {
        return construct_default_options(&operation, options);
    }

    let operations = serde_json::to_string(&operation).map_err(Error::Serialization)?;
    let form = files.into_iter().fold(
        MultipartForm::new().text("operations", operations),
        |form, extracted| form.file(extracted.path, extracted.file),
    );

    tracing::debug!(
        target: "graphql_fetch",
        parts = form.parts().len(),
        batched,
        "encoding operation as multipart upload"
    );

    Ok(FetchOptions {
        method: Some(Method::POST),
        body: Some(RequestBody::Multipart(form)),
        ..options
    })
}

/// [`OptionBuilder`] that switches to multipart when files are present.
#[derive(Debug, Clone, Default)]
pub struct UploadOptionBuilder<E = MarkedFileExtractor> {
    extractor: E,
}

impl UploadOptionBuilder<MarkedFileExtractor> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: FileExtractor> UploadOptionBuilder<E> {
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }
}

impl<E: FileExtractor> OptionBuilder for UploadOptionBuilder<E> {
    fn build(&self, operation: Operation, options: FetchOptions) -> Result<FetchOptions> {
        construct_upload_options(&self.extractor, operation, options)
    }
}
