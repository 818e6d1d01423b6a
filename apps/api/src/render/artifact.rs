//! Finished export file and its HTTP attachment response.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// RFC 3986 unreserved characters pass through; every other byte is `%XX`.
const FILENAME_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Pdf,
    Pptx,
}

impl ExportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Pptx => "pptx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportKind::Pdf => PDF_CONTENT_TYPE,
            ExportKind::Pptx => crate::render::pptx::CONTENT_TYPE,
        }
    }
}

/// `<brand>_<student name>.<ext>`, e.g. `高顿去保研_规划报告_张三.pdf`.
pub fn artifact_name(brand: &str, student: &str, kind: ExportKind) -> String {
    let student: String = student
        .trim()
        .chars()
        .map(|c| {
            let reserved = matches!(c, '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|');
            if reserved || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{brand}_{student}.{}", kind.extension())
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub kind: ExportKind,
    pub file_name: String,
    pub bytes: Bytes,
}

impl ExportArtifact {
    /// `attachment` disposition with an ASCII fallback name and the RFC 5987 UTF-8 name.
    pub fn content_disposition(&self) -> String {
        format!(
            "attachment; filename=\"report.{}\"; filename*=UTF-8''{}",
            self.kind.extension(),
            percent_encode(&self.file_name)
        )
    }
}

impl IntoResponse for ExportArtifact {
    fn into_response(self) -> Response {
        let disposition = self.content_disposition();
        (
            [
                (header::CONTENT_TYPE, self.kind.content_type().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

fn percent_encode(text: &str) -> String {
    utf8_percent_encode(text, FILENAME_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name_uses_brand_and_student() {
        assert_eq!(
            artifact_name("高顿去保研_规划报告", "张三", ExportKind::Pdf),
            "高顿去保研_规划报告_张三.pdf"
        );
        assert_eq!(artifact_name("b", " a/b ", ExportKind::Pptx), "b_a_b.pptx");
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("a b.pdf"), "a%20b.pdf");
        assert_eq!(percent_encode("张"), "%E5%BC%A0");
    }

    #[test]
    fn test_response_headers() {
        let artifact = ExportArtifact {
            kind: ExportKind::Pptx,
            file_name: "x_张三.pptx".to_string(),
            bytes: Bytes::from_static(b"PK"),
        };
        let response = artifact.into_response();
        let headers = response.headers();
        assert_eq!(
            headers[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment;"));
        assert!(disposition.ends_with("filename*=UTF-8''x_%E5%BC%A0%E4%B8%89.pptx"));
    }
}
