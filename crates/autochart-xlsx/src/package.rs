//! In-memory OPC package

use std::fs::{self, File};
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;

use crate::content_types::CONTENT_TYPES_PART;
use crate::error::{XlsxError, XlsxResult};

/// One entry of the zip archive
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// An XLSX package held entirely in memory
///
/// Parts keep the order they had in the source archive; parts added later
/// are appended. Nothing touches the disk between [`XlsxPackage::open`] and
/// [`XlsxPackage::save`].
#[derive(Debug, Clone)]
pub struct XlsxPackage {
    parts: Vec<Part>,
}

impl XlsxPackage {
    /// Read a package from a file path
    ///
    /// The file is closed again before this returns.
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a package from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an OOXML package
        if archive.by_name(CONTENT_TYPES_PART).is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push(Part {
                name: entry.name().to_string(),
                data,
                is_dir: entry.is_dir(),
            });
        }

        tracing::debug!(parts = parts.len(), "Loaded package");
        Ok(Self { parts })
    }

    /// Contents of a part, by zip entry name (no leading slash)
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| !p.is_dir && p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Contents of a part that must exist
    pub fn required_part(&self, name: &str) -> XlsxResult<&[u8]> {
        self.part(name)
            .ok_or_else(|| XlsxError::MissingPart(name.to_string()))
    }

    /// Whether a part exists
    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    /// Replace a part's contents, or append a new part
    pub fn set_part<S: Into<String>>(&mut self, name: S, data: Vec<u8>) {
        let name = name.into();
        match self.parts.iter_mut().find(|p| !p.is_dir && p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name,
                data,
                is_dir: false,
            }),
        }
    }

    /// Names of all file parts, in archive order
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts
            .iter()
            .filter(|p| !p.is_dir)
            .map(|p| p.name.as_str())
    }

    /// First unused part name of the form `{prefix}{n}{suffix}`, counting from 1
    pub fn next_part_name(&self, prefix: &str, suffix: &str) -> String {
        (1u32..)
            .map(|n| format!("{}{}{}", prefix, n, suffix))
            .find(|name| !self.has_part(name))
            .unwrap_or_else(|| format!("{}{}", prefix, suffix))
    }

    /// Write the package to a writer
    pub fn write<W: Write + Seek>(&self, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for part in &self.parts {
            if part.is_dir {
                zip.add_directory(part.name.as_str(), options)?;
            } else {
                zip.start_file(part.name.as_str(), options)?;
                zip.write_all(&part.data)?;
            }
        }

        let mut inner = zip.finish()?;
        inner.flush()?;
        Ok(())
    }

    /// Save the package to a file path, replacing it atomically
    ///
    /// The archive is written to a temporary file next to `path` and then
    /// renamed over it, so an error part-way through leaves `path` untouched.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        let path = path.as_ref();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        self.write(BufWriter::new(tmp.as_file_mut()))?;

        if let Ok(meta) = fs::metadata(path) {
            if let Err(e) = fs::set_permissions(tmp.path(), meta.permissions()) {
                tracing::warn!("Could not carry file permissions over: {e}");
            }
        }

        tmp.persist(path).map_err(|e| XlsxError::Io(e.error))?;
        tracing::debug!("Wrote package to {}", path.display());
        Ok(())
    }
}
