//! Fixed-layout course completion certificate.
//!
//! The document is a positioned list of text blocks on an A4 landscape page.
//! Turning it into pixels or PDF belongs to whoever consumes the JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PAGE_WIDTH_MM: u16 = 297;
pub const PAGE_HEIGHT_MM: u16 = 210;
const DEFAULT_RECIPIENT: &str = "Student";
const DEFAULT_ISSUER: &str = "Learning Platform";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequest {
    pub recipient_name: String,
    pub course_title: String,
    pub issued_on: NaiveDate,
    #[serde(default)]
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockRole {
    Heading,
    Preamble,
    Recipient,
    Body,
    Course,
    Footer,
    Serial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub role: BlockRole,
    pub content: String,
    /// Baseline measured from the top edge; every block is centered horizontally.
    pub y_mm: u16,
    pub font_size_pt: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateDocument {
    pub serial: String,
    pub width_mm: u16,
    pub height_mm: u16,
    pub blocks: Vec<TextBlock>,
}

impl CertificateDocument {
    pub fn compose(request: &CertificateRequest) -> Self {
        let recipient = non_blank(&request.recipient_name).unwrap_or(DEFAULT_RECIPIENT);
        let course = request.course_title.trim();
        let issuer = request
            .issuer
            .as_deref()
            .and_then(non_blank)
            .unwrap_or(DEFAULT_ISSUER);
        let serial = serial_for(recipient, course, request.issued_on);

        let block = |role, content: String, y_mm, font_size_pt| TextBlock {
            role,
            content,
            y_mm,
            font_size_pt,
        };

        let blocks = vec![
            block(BlockRole::Heading, "Certificate of Completion".to_string(), 40, 36),
            block(BlockRole::Preamble, "This certifies that".to_string(), 70, 16),
            block(BlockRole::Recipient, recipient.to_string(), 92, 30),
            block(
                BlockRole::Body,
                "has successfully completed the course".to_string(),
                112,
                16,
            ),
            block(BlockRole::Course, course.to_string(), 132, 24),
            block(
                BlockRole::Footer,
                format!(
                    "Issued by {issuer} on {}",
                    request.issued_on.format("%B %-d, %Y")
                ),
                170,
                12,
            ),
            block(BlockRole::Serial, format!("Certificate No. {serial}"), 190, 9),
        ];

        Self {
            serial,
            width_mm: PAGE_WIDTH_MM,
            height_mm: PAGE_HEIGHT_MM,
            blocks,
        }
    }

    pub fn block(&self, role: BlockRole) -> Option<&TextBlock> {
        self.blocks.iter().find(|block| block.role == role)
    }

    /// Plain text rendition, one block per paragraph.
    pub fn render_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// FNV-1a over the identifying fields; stable across builds and platforms.
fn serial_for(recipient: &str, course: &str, issued_on: NaiveDate) -> String {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    let hash = [recipient, "\u{1f}", course, "\u{1f}"]
        .iter()
        .flat_map(|part| part.bytes())
        .chain(issued_on.to_string().into_bytes())
        .fold(OFFSET, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(PRIME));

    format!("{}-{hash:08X}", issued_on.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> CertificateRequest {
        CertificateRequest {
            recipient_name: name.to_string(),
            course_title: "  Intro to Chemistry ".to_string(),
            issued_on: NaiveDate::from_ymd_opt(2025, 6, 3).expect("valid date"),
            issuer: None,
        }
    }

    #[test]
    fn places_recipient_and_course() {
        let document = CertificateDocument::compose(&request("Grace Hopper"));

        assert_eq!(
            document.block(BlockRole::Recipient).map(|b| b.content.as_str()),
            Some("Grace Hopper")
        );
        assert_eq!(
            document.block(BlockRole::Course).map(|b| b.content.as_str()),
            Some("Intro to Chemistry")
        );
        let footer = document.block(BlockRole::Footer).expect("footer present");
        assert_eq!(footer.content, "Issued by Learning Platform on June 3, 2025");
        assert!(document
            .blocks
            .iter()
            .all(|block| block.y_mm < document.height_mm));
    }

    #[test]
    fn blank_names_fall_back_and_serials_are_stable() {
        let first = CertificateDocument::compose(&request("   "));
        let second = CertificateDocument::compose(&request(""));
        let other = CertificateDocument::compose(&request("Ada"));

        assert_eq!(
            first.block(BlockRole::Recipient).map(|b| b.content.as_str()),
            Some("Student")
        );
        assert_eq!(first.serial, second.serial);
        assert_ne!(first.serial, other.serial);
        assert!(first.serial.starts_with("20250603-"));
        assert!(first.render_text().contains("Certificate of Completion"));
    }
}
