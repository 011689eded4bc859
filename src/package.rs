/*!
 * Minimal ZIP container writer for OPC packages
 *
 * A DOCX file is an OPC package: a ZIP archive of XML parts. Only the
 * subset of the ZIP format needed to write one is implemented here —
 * deflate-compressed entries, a central directory, and the end record.
 * No ZIP64, no encryption, no streaming descriptors.
 */

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::{Datelike, Local, Timelike};
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};

const LOCAL_FILE_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_DIR_HEADER_SIG: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIG: u32 = 0x0605_4b50;

const VERSION_NEEDED: u16 = 20;
const METHOD_DEFLATE: u16 = 8;

struct PartRecord {
    name: String,
    crc: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    offset: u32,
}

/// In-memory ZIP archive builder
pub struct ZipPackage {
    buffer: Vec<u8>,
    parts: Vec<PartRecord>,
    dos_time: u16,
    dos_date: u16,
}

impl ZipPackage {
    /// Create an empty package stamped with the current local time
    pub fn new() -> Self {
        let now = Local::now();
        let year = (now.year().clamp(1980, 2107) - 1980) as u16;
        let dos_date = (year << 9) | ((now.month() as u16) << 5) | now.day() as u16;
        let dos_time =
            ((now.hour() as u16) << 11) | ((now.minute() as u16) << 5) | (now.second() as u16 / 2);

        Self {
            buffer: Vec::new(),
            parts: Vec::new(),
            dos_time,
            dos_date,
        }
    }

    /// Append one named part, deflate-compressed
    pub fn add_part(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        let mut crc = Crc::new();
        crc.update(data);
        let crc = crc.sum();

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;

        let offset = self.buffer.len() as u32;

        self.buffer.write_u32::<LittleEndian>(LOCAL_FILE_HEADER_SIG)?;
        self.buffer.write_u16::<LittleEndian>(VERSION_NEEDED)?;
        self.buffer.write_u16::<LittleEndian>(0)?; // flags
        self.buffer.write_u16::<LittleEndian>(METHOD_DEFLATE)?;
        self.buffer.write_u16::<LittleEndian>(self.dos_time)?;
        self.buffer.write_u16::<LittleEndian>(self.dos_date)?;
        self.buffer.write_u32::<LittleEndian>(crc)?;
        self.buffer.write_u32::<LittleEndian>(compressed.len() as u32)?;
        self.buffer.write_u32::<LittleEndian>(data.len() as u32)?;
        self.buffer.write_u16::<LittleEndian>(name.len() as u16)?;
        self.buffer.write_u16::<LittleEndian>(0)?; // extra field length
        self.buffer.write_all(name.as_bytes())?;
        self.buffer.write_all(&compressed)?;

        self.parts.push(PartRecord {
            name: name.to_string(),
            crc,
            compressed_size: compressed.len() as u32,
            uncompressed_size: data.len() as u32,
            offset,
        });

        Ok(())
    }

    /// Write the central directory and end record, returning the archive
    pub fn finish(mut self) -> io::Result<Vec<u8>> {
        let central_offset = self.buffer.len() as u32;

        for part in &self.parts {
            self.buffer.write_u32::<LittleEndian>(CENTRAL_DIR_HEADER_SIG)?;
            self.buffer.write_u16::<LittleEndian>(VERSION_NEEDED)?; // version made by
            self.buffer.write_u16::<LittleEndian>(VERSION_NEEDED)?;
            self.buffer.write_u16::<LittleEndian>(0)?; // flags
            self.buffer.write_u16::<LittleEndian>(METHOD_DEFLATE)?;
            self.buffer.write_u16::<LittleEndian>(self.dos_time)?;
            self.buffer.write_u16::<LittleEndian>(self.dos_date)?;
            self.buffer.write_u32::<LittleEndian>(part.crc)?;
            self.buffer.write_u32::<LittleEndian>(part.compressed_size)?;
            self.buffer.write_u32::<LittleEndian>(part.uncompressed_size)?;
            self.buffer.write_u16::<LittleEndian>(part.name.len() as u16)?;
            self.buffer.write_u16::<LittleEndian>(0)?; // extra field length
            self.buffer.write_u16::<LittleEndian>(0)?; // comment length
            self.buffer.write_u16::<LittleEndian>(0)?; // disk number start
            self.buffer.write_u16::<LittleEndian>(0)?; // internal attributes
            self.buffer.write_u32::<LittleEndian>(0)?; // external attributes
            self.buffer.write_u32::<LittleEndian>(part.offset)?;
            self.buffer.write_all(part.name.as_bytes())?;
        }

        let central_size = self.buffer.len() as u32 - central_offset;
        let count = self.parts.len() as u16;

        self.buffer.write_u32::<LittleEndian>(END_OF_CENTRAL_DIR_SIG)?;
        self.buffer.write_u16::<LittleEndian>(0)?; // disk number
        self.buffer.write_u16::<LittleEndian>(0)?; // central directory disk
        self.buffer.write_u16::<LittleEndian>(count)?;
        self.buffer.write_u16::<LittleEndian>(count)?;
        self.buffer.write_u32::<LittleEndian>(central_size)?;
        self.buffer.write_u32::<LittleEndian>(central_offset)?;
        self.buffer.write_u16::<LittleEndian>(0)?; // comment length

        Ok(self.buffer)
    }
}

impl Default for ZipPackage {
    fn default() -> Self {
        Self::new()
    }
}
