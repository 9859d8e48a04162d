//! Persisting pact documents.
//!
//! Writing merges into whatever document already sits at the target path: the provider, the
//! consumer and the pact specification have to agree, and interactions that are already there
//! are kept once, in their original order. The read-modify-write isn't locked, so two processes
//! writing the same consumer/provider pair at the same time can lose each other's interactions.

pub mod error;

use crate::{pact_builder::build_pact_document, pact_storage::PactStorage, Pact};
pub use error::{ConflictingField, Error, MergeConflict};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WriteMode {
    Merge,
    Overwrite,
}

impl Default for WriteMode {
    fn default() -> Self {
        WriteMode::Merge
    }
}

pub fn pact_file_path<P: AsRef<Path>>(
    pact_directory: P,
    consumer_name: &str,
    provider_name: &str,
) -> PathBuf {
    pact_directory
        .as_ref()
        .join(format!("{}-{}.pact.json", consumer_name, provider_name))
}

/// Builds the document for `pact` and stores it, returning the path it was written to.
pub fn write_pact<P: AsRef<Path>>(
    pact: &Pact,
    pact_directory: P,
    write_mode: WriteMode,
    storage: &dyn PactStorage,
) -> Result<PathBuf, Error> {
    let path = pact_file_path(pact_directory, &pact.consumer_name, &pact.provider_name);
    let mut document =
        serde_json::to_value(build_pact_document(pact)).map_err(Error::SerializationError)?;

    if write_mode == WriteMode::Merge {
        if let Some(contents) = storage.read(&path)? {
            debug!(path = %path.display(), "Merging into the existing pact file");
            let existing: Value = serde_json::from_str(&contents).map_err(|source| {
                Error::MalformedExistingFile {
                    path: path.clone(),
                    source,
                }
            })?;
            document = merge_documents(existing, document)?;
        }
    }

    storage.write(&path, &to_pretty_json(&document)?)?;
    info!(
        path = %path.display(),
        interactions = interaction_count(&document),
        "Pact file written"
    );

    Ok(path)
}

/// Appends the interactions of `new` to `existing`, dropping exact duplicates.
pub fn merge_documents(mut existing: Value, new: Value) -> Result<Value, Error> {
    if !existing.is_object() {
        return Err(Error::NotAPactDocument("the top level is not an object"));
    }

    check_same(
        ConflictingField::Provider,
        &existing["provider"],
        &new["provider"],
    )?;
    check_same(
        ConflictingField::Consumer,
        &existing["consumer"],
        &new["consumer"],
    )?;
    check_same(
        ConflictingField::PactSpecification,
        &existing["metadata"]["pactSpecification"],
        &new["metadata"]["pactSpecification"],
    )?;

    let new_interactions = match new {
        Value::Object(mut fields) => match fields.remove("interactions") {
            Some(Value::Array(interactions)) => interactions,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let interactions = existing
        .get_mut("interactions")
        .and_then(Value::as_array_mut)
        .ok_or(Error::NotAPactDocument("interactions is not a list"))?;

    let mut merged: Vec<Value> = Vec::with_capacity(interactions.len() + new_interactions.len());
    for interaction in std::mem::take(interactions)
        .into_iter()
        .chain(new_interactions)
    {
        if !merged.contains(&interaction) {
            merged.push(interaction);
        }
    }
    *interactions = merged;

    Ok(existing)
}

fn check_same(field: ConflictingField, existing: &Value, new: &Value) -> Result<(), Error> {
    if existing == new {
        Ok(())
    } else {
        Err(Error::MergeConflict(MergeConflict {
            field,
            existing: existing.clone(),
            new: new.clone(),
        }))
    }
}

/// Serializes with four-space indentation.
pub fn to_pretty_json(document: &Value) -> Result<String, Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    document
        .serialize(&mut serializer)
        .map_err(Error::SerializationError)?;

    Ok(String::from_utf8(buffer)?)
}

fn interaction_count(document: &Value) -> usize {
    document["interactions"].as_array().map_or(0, Vec::len)
}
