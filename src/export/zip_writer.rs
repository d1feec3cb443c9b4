//! Minimal ZIP container writer.
//!
//! Entries are always stored (method 0); there is no compression. The
//! output has one local header per part in input order, a central
//! directory, and the end-of-central-directory record.

use crate::error::{Result, XlcalError};

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIGNATURE: u32 = 0x0605_4b50;

/// Version 2.0: the lowest that covers stored entries and directories.
const VERSION: u16 = 20;
const METHOD_STORED: u16 = 0;

pub const LOCAL_HEADER_LEN: usize = 30;
pub const CENTRAL_HEADER_LEN: usize = 46;
pub const END_OF_CENTRAL_DIR_LEN: usize = 22;

/// A named part of the output package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePart {
    pub name: String,
    pub content: Vec<u8>,
}

impl ArchivePart {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// What goes in the CRC-32 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Checksum {
    /// Real CRC-32 of each entry
    #[default]
    Computed,
    /// Always 0. Readers that validate CRCs will reject these entries.
    Zero,
}

/// Central directory data remembered for each written entry.
#[derive(Debug)]
struct CentralEntry {
    name: Vec<u8>,
    crc32: u32,
    size: u32,
    local_offset: u32,
}

/// Writes stored entries into an in-memory buffer.
#[derive(Debug)]
pub struct ZipWriter {
    buf: Vec<u8>,
    entries: Vec<CentralEntry>,
    checksum: Checksum,
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn to_u32(n: usize, what: &str) -> Result<u32> {
    u32::try_from(n).map_err(|_| XlcalError::ArchiveLimit(format!("{what} {n} exceeds 4 GiB")))
}

fn to_u16(n: usize, what: &str) -> Result<u16> {
    u16::try_from(n).map_err(|_| XlcalError::ArchiveLimit(format!("{what} {n} exceeds 65535")))
}

impl ZipWriter {
    pub fn new(checksum: Checksum) -> Self {
        Self {
            buf: Vec::new(),
            entries: Vec::new(),
            checksum,
        }
    }

    /// Append one stored entry: local header, name, raw content.
    pub fn add(&mut self, name: &str, content: &[u8]) -> Result<()> {
        let local_offset = to_u32(self.buf.len(), "entry offset")?;
        let size = to_u32(content.len(), "entry size")?;
        let name_len = to_u16(name.len(), "file name length")?;
        let crc32 = match self.checksum {
            Checksum::Computed => crc32fast::hash(content),
            Checksum::Zero => 0,
        };

        self.buf
            .reserve(LOCAL_HEADER_LEN + name.len() + content.len());
        put_u32(&mut self.buf, LOCAL_HEADER_SIGNATURE);
        put_u16(&mut self.buf, VERSION); // version needed
        put_u16(&mut self.buf, 0); // flags
        put_u16(&mut self.buf, METHOD_STORED);
        put_u16(&mut self.buf, 0); // mod time
        put_u16(&mut self.buf, 0); // mod date
        put_u32(&mut self.buf, crc32);
        put_u32(&mut self.buf, size); // compressed
        put_u32(&mut self.buf, size); // uncompressed
        put_u16(&mut self.buf, name_len);
        put_u16(&mut self.buf, 0); // extra field length
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(content);

        log::trace!("zip entry {name}: {size} bytes at offset {local_offset}");

        self.entries.push(CentralEntry {
            name: name.as_bytes().to_vec(),
            crc32,
            size,
            local_offset,
        });
        Ok(())
    }

    /// Write the central directory and end record, returning the archive.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cd_offset = to_u32(self.buf.len(), "central directory offset")?;
        let entry_count = to_u16(self.entries.len(), "entry count")?;

        for entry in &self.entries {
            let name_len = to_u16(entry.name.len(), "file name length")?;
            put_u32(&mut self.buf, CENTRAL_HEADER_SIGNATURE);
            put_u16(&mut self.buf, VERSION); // version made by
            put_u16(&mut self.buf, VERSION); // version needed
            put_u16(&mut self.buf, 0); // flags
            put_u16(&mut self.buf, METHOD_STORED);
            put_u16(&mut self.buf, 0); // mod time
            put_u16(&mut self.buf, 0); // mod date
            put_u32(&mut self.buf, entry.crc32);
            put_u32(&mut self.buf, entry.size); // compressed
            put_u32(&mut self.buf, entry.size); // uncompressed
            put_u16(&mut self.buf, name_len);
            put_u16(&mut self.buf, 0); // extra field length
            put_u16(&mut self.buf, 0); // comment length
            put_u16(&mut self.buf, 0); // disk number start
            put_u16(&mut self.buf, 0); // internal attributes
            put_u32(&mut self.buf, 0); // external attributes
            put_u32(&mut self.buf, entry.local_offset);
            self.buf.extend_from_slice(&entry.name);
        }

        let cd_end = to_u32(self.buf.len(), "central directory end")?;
        let cd_size = cd_end - cd_offset;

        put_u32(&mut self.buf, END_OF_CENTRAL_DIR_SIGNATURE);
        put_u16(&mut self.buf, 0); // this disk
        put_u16(&mut self.buf, 0); // disk with central directory
        put_u16(&mut self.buf, entry_count); // entries on this disk
        put_u16(&mut self.buf, entry_count); // total entries
        put_u32(&mut self.buf, cd_size);
        put_u32(&mut self.buf, cd_offset);
        put_u16(&mut self.buf, 0); // comment length

        log::debug!(
            "zip archive: {entry_count} entries, central directory {cd_size} bytes at {cd_offset}"
        );
        Ok(self.buf)
    }
}

/// Serialize parts, in order, into a stored ZIP archive with real CRCs.
pub fn assemble_archive(parts: &[ArchivePart]) -> Result<Vec<u8>> {
    assemble_archive_with(parts, Checksum::Computed)
}

/// Serialize parts with an explicit checksum policy.
pub fn assemble_archive_with(parts: &[ArchivePart], checksum: Checksum) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(checksum);
    for part in parts {
        writer.add(&part.name, &part.content)?;
    }
    writer.finish()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn u16_at(buf: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([buf[at], buf[at + 1]])
    }

    fn u32_at(buf: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
    }

    #[test]
    fn test_empty_archive_is_just_end_record() {
        let zip = assemble_archive(&[]).unwrap();
        assert_eq!(zip.len(), END_OF_CENTRAL_DIR_LEN);
        assert_eq!(&zip[..4], b"PK\x05\x06");
        assert_eq!(u16_at(&zip, 10), 0);
        assert_eq!(u32_at(&zip, 16), 0);
    }

    #[test]
    fn test_layout_of_single_entry() {
        let zip = assemble_archive(&[ArchivePart::new("a.txt", "hello")]).unwrap();
        let local_len = LOCAL_HEADER_LEN + 5 + 5;
        let central_len = CENTRAL_HEADER_LEN + 5;
        assert_eq!(zip.len(), local_len + central_len + END_OF_CENTRAL_DIR_LEN);

        assert_eq!(&zip[..4], b"PK\x03\x04");
        assert_eq!(u16_at(&zip, 4), 20);
        assert_eq!(u16_at(&zip, 8), 0); // stored
        assert_eq!(u32_at(&zip, 14), crc32fast::hash(b"hello"));
        assert_eq!(u32_at(&zip, 18), 5);
        assert_eq!(u32_at(&zip, 22), 5);
        assert_eq!(u16_at(&zip, 26), 5);
        assert_eq!(&zip[30..35], b"a.txt");
        assert_eq!(&zip[35..40], b"hello");

        assert_eq!(&zip[local_len..local_len + 4], b"PK\x01\x02");
        assert_eq!(u32_at(&zip, local_len + 42), 0); // local header offset

        let eocd = local_len + central_len;
        assert_eq!(&zip[eocd..eocd + 4], b"PK\x05\x06");
        assert_eq!(u16_at(&zip, eocd + 8), 1);
        assert_eq!(u16_at(&zip, eocd + 10), 1);
        assert_eq!(u32_at(&zip, eocd + 12), u32::try_from(central_len).unwrap());
        assert_eq!(u32_at(&zip, eocd + 16), u32::try_from(local_len).unwrap());
    }

    #[test]
    fn test_zero_checksum_mode() {
        let zip = assemble_archive_with(&[ArchivePart::new("a", "xyz")], Checksum::Zero).unwrap();
        assert_eq!(u32_at(&zip, 14), 0);
        let central = LOCAL_HEADER_LEN + 1 + 3;
        assert_eq!(u32_at(&zip, central + 16), 0);
    }

    #[test]
    fn test_offsets_accumulate() {
        let parts = [
            ArchivePart::new("one", vec![1u8; 10]),
            ArchivePart::new("two", vec![2u8; 20]),
        ];
        let zip = assemble_archive(&parts).unwrap();
        let second_local = LOCAL_HEADER_LEN + 3 + 10;
        assert_eq!(&zip[second_local..second_local + 4], b"PK\x03\x04");

        let cd_start = second_local + LOCAL_HEADER_LEN + 3 + 20;
        let second_central = cd_start + CENTRAL_HEADER_LEN + 3;
        assert_eq!(
            u32_at(&zip, second_central + 42),
            u32::try_from(second_local).unwrap()
        );
    }

    #[test]
    fn test_utf8_name_and_content_lengths_are_bytes() {
        let zip = assemble_archive(&[ArchivePart::new("ü.xml", "café")]).unwrap();
        assert_eq!(u16_at(&zip, 26), 6);
        assert_eq!(u32_at(&zip, 18), 5);
    }
}
