//! Split a document by page ranges

use std::fmt;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::document::{DocumentError, Result};

use super::{load_plain, save};

/// Inclusive, 1-based page range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn single(page: u32) -> Self {
        Self {
            start: page,
            end: page,
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.start..=self.end).contains(&page)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parse `"1-3,5,8-"` against a document of `page_count` pages
///
/// Whitespace is ignored. An open end runs to the last page. Every range must
/// lie inside the document and must not be reversed.
pub fn parse_page_ranges(expr: &str, page_count: u32) -> Result<Vec<PageRange>> {
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let invalid = || DocumentError::InvalidRange(expr.trim().to_string());

    if compact.is_empty() {
        return Err(invalid());
    }

    compact
        .split(',')
        .map(|part| {
            let (start, end) = match part.split_once('-') {
                Some((start, "")) => (start.parse::<u32>().ok(), Some(page_count)),
                Some((start, end)) => (start.parse::<u32>().ok(), end.parse::<u32>().ok()),
                None => {
                    let page = part.parse::<u32>().ok();
                    (page, page)
                }
            };

            match (start, end) {
                (Some(start), Some(end)) if start >= 1 && start <= end && end <= page_count => {
                    Ok(PageRange { start, end })
                }
                _ => Err(invalid()),
            }
        })
        .collect()
}

/// One output document of a split
#[derive(Debug, Clone)]
pub struct SplitPart {
    pub range: PageRange,
    pub bytes: Vec<u8>,
}

/// Split result as delivered to a client
#[derive(Debug)]
pub enum SplitOutput {
    /// Exactly one part, as a PDF
    Single(Vec<u8>),
    /// Several parts, as a zip archive
    Archive(Vec<u8>),
}

impl SplitOutput {
    /// Package parts, naming archive entries `<stem>-<range>.pdf`
    pub fn package(mut parts: Vec<SplitPart>, stem: &str) -> Result<Self> {
        if parts.len() == 1 {
            return Ok(SplitOutput::Single(parts.remove(0).bytes));
        }

        let archive_error = |e: zip::result::ZipError| DocumentError::Serialize(e.to_string());
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            for part in &parts {
                zip.start_file(format!("{}-{}.pdf", stem, part.range), options)
                    .map_err(archive_error)?;
                zip.write_all(&part.bytes)?;
            }
            zip.finish().map_err(archive_error)?;
        }

        Ok(SplitOutput::Archive(buffer))
    }
}

/// Split into one document per range, or one per page when no ranges are given
pub fn split(bytes: &[u8], ranges: Option<&str>) -> Result<Vec<SplitPart>> {
    let doc = load_plain(bytes)?;
    let page_count = doc.get_pages().len() as u32;

    let ranges = match ranges.map(str::trim).filter(|r| !r.is_empty()) {
        Some(expr) => parse_page_ranges(expr, page_count)?,
        None => (1..=page_count).map(PageRange::single).collect(),
    };

    let parts = ranges
        .into_iter()
        .map(|range| {
            let mut part = doc.clone();
            let outside: Vec<u32> = (1..=page_count).filter(|&p| !range.contains(p)).collect();
            part.delete_pages(&outside);
            part.prune_objects();
            part.compress();

            Ok(SplitPart {
                range,
                bytes: save(&mut part)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!("Split {} pages into {} parts", page_count, parts.len());
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixtures::{contents_decode, page_widths, pdf_with_pages};
    use std::io::Read;

    fn five_pages() -> Vec<u8> {
        pdf_with_pages(&[
            (101.0, 100.0),
            (102.0, 100.0),
            (103.0, 100.0),
            (104.0, 100.0),
            (105.0, 100.0),
        ])
    }

    #[test]
    fn test_parse_page_ranges() {
        assert_eq!(
            parse_page_ranges("1-3, 5 ,4-", 8).unwrap(),
            vec![
                PageRange { start: 1, end: 3 },
                PageRange::single(5),
                PageRange { start: 4, end: 8 },
            ]
        );
        assert_eq!(parse_page_ranges("2", 2).unwrap(), vec![PageRange::single(2)]);
    }

    #[test]
    fn test_parse_page_ranges_rejects_invalid() {
        for expr in ["", "0", "5-3", "1-9", "a", "1,,2", "-3", "1-2-3", "9-"] {
            assert!(
                matches!(parse_page_ranges(expr, 8), Err(DocumentError::InvalidRange(_))),
                "{:?} should be rejected",
                expr
            );
        }
    }

    #[test]
    fn test_range_labels() {
        assert_eq!(PageRange { start: 2, end: 4 }.to_string(), "2-4");
        assert_eq!(PageRange::single(7).to_string(), "7");
    }

    #[test]
    fn test_split_by_ranges() {
        let parts = split(&five_pages(), Some("1-2,4-")).unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(page_widths(&parts[0].bytes), vec![101.0, 102.0]);
        assert_eq!(page_widths(&parts[1].bytes), vec![104.0, 105.0]);
        assert!(parts.iter().all(|p| contents_decode(&p.bytes)));
    }

    #[test]
    fn test_split_without_ranges_is_per_page() {
        let parts = split(&five_pages(), None).unwrap();
        assert_eq!(parts.len(), 5);
        assert_eq!(page_widths(&parts[2].bytes), vec![103.0]);

        assert_eq!(split(&five_pages(), Some("  ")).unwrap().len(), 5);
    }

    #[test]
    fn test_split_out_of_range() {
        assert!(matches!(
            split(&five_pages(), Some("4-6")),
            Err(DocumentError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_package_single_and_archive() {
        let parts = split(&five_pages(), Some("2")).unwrap();
        let single = SplitOutput::package(parts, "report").unwrap();
        assert!(matches!(single, SplitOutput::Single(ref bytes) if bytes.starts_with(b"%PDF")));

        let parts = split(&five_pages(), Some("1-2,5")).unwrap();
        let SplitOutput::Archive(zip_bytes) = SplitOutput::package(parts, "report").unwrap() else {
            panic!("expected an archive");
        };

        let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes)).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"report-1-2.pdf".to_string()));
        assert!(names.contains(&"report-5.pdf".to_string()));

        let mut entry = Vec::new();
        archive
            .by_name("report-5.pdf")
            .unwrap()
            .read_to_end(&mut entry)
            .unwrap();
        assert_eq!(page_widths(&entry), vec![105.0]);
    }
}
