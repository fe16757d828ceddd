use std::io::Write;

use log::debug;

use super::{Error, Exporter};
use crate::layout::FamilyLayout;

/// Writes layouts as pretty-printed JSON.
///
/// The document holds the placed vertices, edge routes, diagnostics (as
/// `{severity, code, message}` objects) and overall bounds.
pub struct JsonExporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonExporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Exporter for JsonExporter<W> {
    fn export_layout(&mut self, layout: &FamilyLayout) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut self.writer, layout).map_err(|err| {
            if err.is_io() {
                Error::Io(err.into())
            } else {
                Error::Render(err.to_string())
            }
        })?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        debug!(vertices = layout.vertices().len(); "Exported layout as JSON");
        Ok(())
    }
}
