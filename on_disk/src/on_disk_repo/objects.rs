use std::io::{Read, Write};
use std::path::PathBuf;
use std::str;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use strata_core::object::{Id, Kind, Object};
use strata_core::repo::{Error, ObjectStore, Result};
use tempfile::NamedTempFile;

use super::{persist, read_if_exists, OnDiskRepo};

impl OnDiskRepo {
    fn objects_dir(&self) -> PathBuf {
        self.git_dir.join("objects")
    }

    // `.git/objects/xx/yyyy...`, split after the first two hex digits.
    fn object_path(&self, id: &Id) -> PathBuf {
        let hex = id.to_string();
        let (dir, file) = hex.split_at(2);
        self.objects_dir().join(dir).join(file)
    }
}

impl ObjectStore for OnDiskRepo {
    fn has_object(&self, id: &Id) -> Result<bool> {
        Ok(self.object_path(id).is_file())
    }

    /// Writes the object as a loose object, compressed the same way
    /// command-line git does.
    fn put_object(&mut self, object: &Object) -> Result<Id> {
        let id = *object.id();
        let path = self.object_path(&id);
        if path.exists() {
            tracing::trace!(%id, "loose object already present");
            return Ok(id);
        }

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let temp = NamedTempFile::new_in(self.objects_dir())?;
        let mut encoder = ZlibEncoder::new(temp, Compression::default());
        write!(encoder, "{} {}\0", object.kind(), object.len())?;
        encoder.write_all(object.content())?;
        let temp = encoder.finish()?;

        persist(temp, &path)?;

        tracing::debug!(%id, kind = %object.kind(), len = object.len(), "wrote loose object");
        Ok(id)
    }

    fn get_object(&self, id: &Id) -> Result<Option<Object>> {
        let compressed = match read_if_exists(&self.object_path(id))? {
            Some(compressed) => compressed,
            None => return Ok(None),
        };

        let mut raw = Vec::new();
        ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut raw)?;

        let object = decode_loose(&raw).ok_or_else(|| corrupt(&raw, id))?;
        if object.id() != id {
            return Err(Error::CorruptObject {
                kind: object.kind(),
                id: *id,
            });
        }

        Ok(Some(object))
    }
}

// Parses `<kind> <len>\0<content>`.
fn decode_loose(raw: &[u8]) -> Option<Object> {
    let nul = raw.iter().position(|b| *b == 0)?;
    let header = str::from_utf8(&raw[..nul]).ok()?;
    let content = &raw[nul + 1..];

    let mut parts = header.splitn(2, ' ');
    let kind: Kind = parts.next()?.parse().ok()?;
    let len: usize = parts.next()?.parse().ok()?;
    if len != content.len() {
        return None;
    }

    Some(Object::new(kind, content.to_vec()))
}

// Best guess at the kind of an object whose header we couldn't decode.
fn corrupt(raw: &[u8], id: &Id) -> Error {
    let kind = raw
        .split(|b| *b == b' ')
        .next()
        .and_then(|k| str::from_utf8(k).ok())
        .and_then(|k| k.parse().ok())
        .unwrap_or(Kind::Blob);

    Error::CorruptObject { kind, id: *id }
}
