use crate::metadata::MetadataReader;
use anyhow::{Context, Result};
use exif::{DateTime, Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const DATE_TAGS: &[(Tag, Tag, Tag)] = &[
    (
        Tag::DateTimeOriginal,
        Tag::SubSecTimeOriginal,
        Tag::OffsetTimeOriginal,
    ),
    (
        Tag::DateTimeDigitized,
        Tag::SubSecTimeDigitized,
        Tag::OffsetTimeDigitized,
    ),
    (Tag::DateTime, Tag::SubSecTime, Tag::OffsetTime),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedExifReader;

impl MetadataReader for EmbeddedExifReader {
    fn read_candidates(&self, path: &Path) -> Result<Vec<String>> {
        let file = File::open(path)
            .with_context(|| format!("failed to open for EXIF reading: {}", path.display()))?;
        let mut buf = BufReader::new(file);
        let exif = Reader::new()
            .read_from_container(&mut buf)
            .with_context(|| format!("failed to parse EXIF: {}", path.display()))?;

        Ok(DATE_TAGS
            .iter()
            .map(|&(date, subsec, offset)| render_date(&exif, date, subsec, offset))
            .collect())
    }
}

fn render_date(exif: &Exif, date_tag: Tag, subsec_tag: Tag, offset_tag: Tag) -> String {
    let Some(raw_date) = ascii_value(exif, date_tag) else {
        return String::new();
    };
    let Ok(mut date) = DateTime::from_ascii(raw_date) else {
        return String::new();
    };

    let subsec = ascii_value(exif, subsec_tag)
        .map(|raw| {
            String::from_utf8_lossy(raw)
                .chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .unwrap_or_default();

    if let Some(raw) = ascii_value(exif, offset_tag) {
        if let Err(err) = date.parse_offset(raw) {
            log::debug!("ignoring malformed {offset_tag}: {err}");
        }
    }
    let offset = date.offset.map(format_offset).unwrap_or_default();

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{}{}",
        date.year, date.month, date.day, date.hour, date.minute, date.second, subsec, offset
    )
}

fn ascii_value(exif: &Exif, tag: Tag) -> Option<&[u8]> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(values) => values.first().map(Vec::as_slice),
        _ => None,
    }
}

fn format_offset(minutes: i16) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let minutes = minutes.unsigned_abs();
    format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
}
