//! Mercenary bundle format (.mrcb)
//!
//! Layout:
//! [4 bytes] Magic: "MERC"
//! [4 bytes] Manifest length (u32 LE)
//! [N bytes] JSON manifest
//! [4 bytes] Program length (u32 LE)
//! [M bytes] JSON-serialized CompiledProgram

use crate::ir::CompiledProgram;
use std::io::{self, Read, Write};

const MAGIC: &[u8; 4] = b"MERC";
pub const FORMAT: &str = "mercenary-stack-v1";
pub const EXTENSION: &str = "mrcb";

/// Serialize a CompiledProgram to the bundle format.
pub fn write_bundle<W: Write>(writer: &mut W, program: &CompiledProgram) -> io::Result<()> {
    writer.write_all(MAGIC)?;

    let manifest = serde_json::json!({
        "format": FORMAT,
        "version": program.version,
        "instructions": program.instructions.len(),
        "functions": program.function_names(),
    });
    let manifest_bytes = serde_json::to_vec(&manifest).map_err(io::Error::other)?;
    write_section(writer, &manifest_bytes)?;

    let body = serde_json::to_vec(program).map_err(io::Error::other)?;
    write_section(writer, &body)?;

    log::debug!(
        "wrote bundle: {} instruction(s), {} byte(s) of code",
        program.instructions.len(),
        body.len()
    );
    Ok(())
}

/// Deserialize a CompiledProgram from the bundle format.
pub fn read_bundle<R: Read>(reader: &mut R) -> io::Result<CompiledProgram> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid magic number: expected MERC, got {:?}", magic),
        ));
    }

    // Informational only.
    let _manifest = read_section(reader)?;

    let body = read_section(reader)?;
    serde_json::from_slice(&body).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_section<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "bundle section too large"))?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(bytes)
}

fn read_section<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    // The header is untrusted: grow with the data actually present.
    let mut bytes = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("bundle section truncated: expected {} bytes, got {}", len, bytes.len()),
        ));
    }
    Ok(bytes)
}
