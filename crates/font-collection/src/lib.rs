//! # Font Collection
//!
//! Assemble several sfnt fonts into one TrueType Collection (`.ttc`).
//!
//! Tables with byte-identical contents are written once and referenced from
//! every font directory that lists them, which is where most of the size
//! saving of a collection comes from (Iosevka styles share `cvt `, `fpgm`,
//! `prep` and often `GSUB`).
//!
//! ## Example
//!
//! ```no_run
//! use iosevka_font_collection::CollectionBuilder;
//!
//! let regular = std::fs::read("Iosevka-Regular.ttf").unwrap();
//! let bold = std::fs::read("Iosevka-Bold.ttf").unwrap();
//!
//! let mut builder = CollectionBuilder::new();
//! builder.add_font(&regular).unwrap().add_font(&bold).unwrap();
//! std::fs::write("Iosevka.ttc", builder.build().unwrap()).unwrap();
//! ```

mod error;

use std::collections::HashMap;

use read_fonts::{FontRef, types::Tag};

pub use error::{Error, Result};

const TTC_TAG: &[u8; 4] = b"ttcf";
const MAX_TABLES: usize = 4095;
const TTC_HEADER_LEN: usize = 12;
const OFFSET_TABLE_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

/// Builder collecting fonts for a collection, in insertion order.
#[derive(Default)]
pub struct CollectionBuilder<'a> {
    fonts: Vec<FontRef<'a>>,
}

struct DirectoryEntry {
    tag: Tag,
    checksum: u32,
    table: usize,
}

struct Directory {
    sfnt_version: u32,
    entries: Vec<DirectoryEntry>,
}

impl Directory {
    fn len(&self) -> usize {
        OFFSET_TABLE_LEN + TABLE_RECORD_LEN * self.entries.len()
    }
}

impl<'a> CollectionBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and appends a font.
    pub fn add_font(&mut self, data: &'a [u8]) -> Result<&mut Self> {
        let index = self.fonts.len();
        let font = FontRef::new(data).map_err(|source| Error::Parse { index, source })?;
        self.fonts.push(font);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Serializes the collection.
    pub fn build(&self) -> Result<Vec<u8>> {
        if self.fonts.is_empty() {
            return Err(Error::Empty);
        }

        let mut tables: Vec<&[u8]> = Vec::new();
        let mut seen: HashMap<&[u8], usize> = HashMap::new();
        let mut directories = Vec::with_capacity(self.fonts.len());

        for (index, font) in self.fonts.iter().enumerate() {
            let mut entries = Vec::new();
            for record in font.table_directory.table_records() {
                let tag = record.tag();
                let data = font
                    .table_data(tag)
                    .ok_or(Error::MissingTable { index, tag })?
                    .as_bytes();
                let table = *seen.entry(data).or_insert_with(|| {
                    tables.push(data);
                    tables.len() - 1
                });
                entries.push(DirectoryEntry { tag, checksum: record.checksum(), table });
            }
            entries.sort_by_key(|e| e.tag);
            directories.push(Directory {
                sfnt_version: font.table_directory.sfnt_version(),
                entries,
            });
        }

        let header_len = TTC_HEADER_LEN + 4 * directories.len();
        let directories_len: usize = directories.iter().map(Directory::len).sum();

        let mut table_offsets = Vec::with_capacity(tables.len());
        let mut cursor = header_len + directories_len;
        for data in &tables {
            table_offsets.push(to_u32(cursor)?);
            cursor += padded_len(data.len());
        }
        to_u32(cursor)?;

        let mut out = Vec::with_capacity(cursor);
        out.extend_from_slice(TTC_TAG);
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&to_u32(directories.len())?.to_be_bytes());

        let mut directory_offset = header_len;
        for directory in &directories {
            out.extend_from_slice(&to_u32(directory_offset)?.to_be_bytes());
            directory_offset += directory.len();
        }

        for directory in &directories {
            write_offset_table(&mut out, directory.sfnt_version, directory.entries.len())?;
            for entry in &directory.entries {
                let data = tables[entry.table];
                out.extend_from_slice(&entry.tag.to_be_bytes());
                out.extend_from_slice(&entry.checksum.to_be_bytes());
                out.extend_from_slice(&table_offsets[entry.table].to_be_bytes());
                out.extend_from_slice(&to_u32(data.len())?.to_be_bytes());
            }
        }

        for data in &tables {
            out.extend_from_slice(data);
            out.resize(out.len() + padded_len(data.len()) - data.len(), 0);
        }

        Ok(out)
    }
}

/// Builds a collection from raw font buffers (simple API).
pub fn build_collection<T: AsRef<[u8]>>(fonts: &[T]) -> Result<Vec<u8>> {
    let mut builder = CollectionBuilder::new();
    for font in fonts {
        builder.add_font(font.as_ref())?;
    }
    builder.build()
}

fn write_offset_table(out: &mut Vec<u8>, sfnt_version: u32, num_tables: usize) -> Result<()> {
    // Table records are 16 bytes and searchRange is a u16, so 4095 tables at most.
    if num_tables > MAX_TABLES {
        return Err(Error::TooLarge);
    }
    let num_tables = num_tables as u16;
    // Largest power of two not above num_tables; 0 tables keeps everything 0.
    let entry_selector = if num_tables == 0 { 0 } else { 15 - num_tables.leading_zeros() as u16 };
    let search_range = if num_tables == 0 { 0 } else { (1u16 << entry_selector) * 16 };
    let range_shift = num_tables * 16 - search_range;

    out.extend_from_slice(&sfnt_version.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());
    Ok(())
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::TooLarge)
}

#[cfg(test)]
mod tests {
    use read_fonts::FileRef;

    use super::*;

    fn read_u32(data: &[u8], at: usize) -> u32 {
        u32::from_be_bytes(data[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn test_empty_collection_is_rejected() {
        assert!(matches!(CollectionBuilder::new().build(), Err(Error::Empty)));
    }

    #[test]
    fn test_parse_error_reports_index() {
        let fonts: [&[u8]; 2] = [font_test_data::CMAP12_FONT1, b"garbage"];
        let err = build_collection(&fonts).unwrap_err();
        assert!(matches!(err, Error::Parse { index: 1, .. }));
    }

    #[test]
    fn test_offset_table_search_fields() {
        let mut out = Vec::new();
        write_offset_table(&mut out, 0x0001_0000, MAX_TABLES).unwrap();
        let field = |at: usize| u16::from_be_bytes([out[at], out[at + 1]]);
        assert_eq!(field(4), 4095);
        assert_eq!(field(6), 32768);
        assert_eq!(field(8), 11);
        assert_eq!(field(10), 4095 * 16 - 32768);
    }

    #[test]
    fn test_too_many_tables_is_rejected() {
        let mut out = Vec::new();
        let err = write_offset_table(&mut out, 0x0001_0000, MAX_TABLES + 1).unwrap_err();
        assert!(matches!(err, Error::TooLarge));
        assert!(out.is_empty());
    }

    #[test]
    fn test_header_layout() {
        let fonts = [font_test_data::CMAP12_FONT1, font_test_data::SIMPLE_GLYF];
        let ttc = build_collection(&fonts).unwrap();

        assert_eq!(&ttc[..4], b"ttcf");
        assert_eq!(read_u32(&ttc, 4), 0x0001_0000);
        assert_eq!(read_u32(&ttc, 8), 2);
        assert_eq!(read_u32(&ttc, 12), 20);
        assert_eq!(ttc.len() % 4, 0);
    }

    #[test]
    fn test_round_trip_through_read_fonts() {
        let fonts = [font_test_data::CMAP12_FONT1, font_test_data::SIMPLE_GLYF];
        let ttc = build_collection(&fonts).unwrap();

        let FileRef::Collection(collection) = FileRef::new(&ttc).unwrap() else {
            panic!("expected a collection");
        };
        assert_eq!(collection.len(), 2);

        for (index, original) in fonts.iter().enumerate() {
            let original = FontRef::new(original).unwrap();
            let member = collection.get(index as u32).unwrap();
            for record in original.table_directory.table_records() {
                let tag = record.tag();
                assert_eq!(
                    member.table_data(tag).unwrap().as_bytes(),
                    original.table_data(tag).unwrap().as_bytes(),
                    "table {tag} of font #{index} differs"
                );
            }
        }
    }

    #[test]
    fn test_identical_tables_are_shared() {
        let single = build_collection(&[font_test_data::CMAP12_FONT1]).unwrap();
        let double =
            build_collection(&[font_test_data::CMAP12_FONT1, font_test_data::CMAP12_FONT1])
                .unwrap();

        let font = FontRef::new(font_test_data::CMAP12_FONT1).unwrap();
        let directory_len =
            OFFSET_TABLE_LEN + TABLE_RECORD_LEN * font.table_directory.table_records().len();

        // Second font adds one header offset and one directory, no table data.
        assert_eq!(double.len(), single.len() + 4 + directory_len);
    }

    #[test]
    fn test_search_fields() {
        let mut out = Vec::new();
        write_offset_table(&mut out, 0x0001_0000, 11).unwrap();
        assert_eq!(&out[4..6], &11u16.to_be_bytes());
        assert_eq!(&out[6..8], &128u16.to_be_bytes());
        assert_eq!(&out[8..10], &3u16.to_be_bytes());
        assert_eq!(&out[10..12], &48u16.to_be_bytes());
    }
}
