//! XML file loading functionality.
//!
//! This module provides functions to load XML documents from files or stdin,
//! transparently decompressing gzip input, and parsing them into `XmlNode`
//! trees ready for querying.

use crate::document::node::XmlNode;
use crate::document::parser::{parse_xml_with, ParseOptions};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Loads and parses an XML file from the filesystem.
///
/// Files ending in `.gz` are decompressed first. Files ending in `.json`
/// (or `.json.gz`) are read as the portable nested-tuple form instead of
/// markup.
///
/// # Examples
///
/// ```no_run
/// use yaxi::document::parser::ParseOptions;
/// use yaxi::file::loader::load_xml_file;
///
/// let root = load_xml_file("event.xml", &ParseOptions::default()).unwrap();
/// println!("{}", root.tag());
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist or cannot be read
/// - A `.gz` file is not valid gzip
/// - The contents are not well-formed XML (or a valid portable document)
pub fn load_xml_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<XmlNode> {
    let path_ref = path.as_ref();

    let content = if is_gzipped(path_ref) {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref).context("Failed to read file")?
    };

    if is_portable_json(path_ref) {
        XmlNode::from_json(&content).context("Failed to read portable JSON document")
    } else {
        parse_xml_with(&content, options).context("Failed to parse XML")
    }
}

/// Loads and parses XML from standard input.
///
/// Gzip input is detected by its magic bytes (0x1f 0x8b). Input starting
/// with `[` is read as the portable nested-tuple form.
///
/// ```no_run
/// use yaxi::document::parser::ParseOptions;
/// use yaxi::file::loader::load_xml_from_stdin;
///
/// // Usage: cat event.xml | yaxi -q What
/// let root = load_xml_from_stdin(&ParseOptions::default()).unwrap();
/// ```
pub fn load_xml_from_stdin(options: &ParseOptions) -> Result<XmlNode> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    parse_bytes(buffer, options)
}

/// Decodes raw document bytes: gzip detection, UTF-8, then XML or portable JSON.
pub fn parse_bytes(buffer: Vec<u8>, options: &ParseOptions) -> Result<XmlNode> {
    let content = if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in input")?
    };

    if content.trim_start().starts_with('[') {
        XmlNode::from_json(&content).context("Failed to read portable JSON document")
    } else {
        parse_xml_with(&content, options).context("Failed to parse XML from input")
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}

/// Checks for a `.json` extension, ignoring a trailing `.gz`.
fn is_portable_json<P: AsRef<Path>>(path: P) -> bool {
    let path_str = path.as_ref().to_string_lossy();
    let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);
    base.ends_with(".json")
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    fn gzip(content: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_is_portable_json() {
        assert!(is_portable_json("tree.json"));
        assert!(is_portable_json("path/to/tree.json.gz"));
        assert!(!is_portable_json("event.xml"));
        assert!(!is_portable_json("event.xml.gz"));
    }

    #[test]
    fn test_read_gzipped_file() {
        let dir = TempDir::new().unwrap();
        let gz_path = dir.path().join("event.xml.gz");
        fs::write(&gz_path, gzip("<Root/>")).unwrap();

        assert_eq!(read_gzipped_file(&gz_path).unwrap(), "<Root/>");
    }

    #[test]
    fn test_read_gzipped_file_corrupted() {
        let dir = TempDir::new().unwrap();
        let gz_path = dir.path().join("event.xml.gz");
        fs::write(&gz_path, b"not gzip data").unwrap();

        let err_msg = read_gzipped_file(&gz_path).unwrap_err().to_string();
        assert!(err_msg.contains("decompress") || err_msg.contains("corrupted"));
    }

    #[test]
    fn test_parse_bytes_detects_formats() {
        let options = ParseOptions::default();
        let plain = parse_bytes(b"<Root><A/></Root>".to_vec(), &options).unwrap();
        assert_eq!(plain.children().len(), 1);

        let zipped = parse_bytes(gzip("<Root><A/><B/></Root>"), &options).unwrap();
        assert_eq!(zipped.children().len(), 2);

        let portable = parse_bytes(br#"["Root",null,{},[]]"#.to_vec(), &options).unwrap();
        assert_eq!(portable, XmlNode::new("Root"));
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_utf8() {
        let err = parse_bytes(vec![0xff, 0xfe, 0x00], &ParseOptions::default()).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }
}
