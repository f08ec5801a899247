//! Completion certificate rendering and export.

use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::info;

/// Error types for certificate export.
///
/// Export never touches lesson state, so every failure can be retried.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Cannot write certificate to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Certificate rendering failed: {0}")]
    Render(String),
}

/// What the certificate says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub student_name: String,
    pub score: u32,
    pub issued_on: NaiveDate,
}

impl Certificate {
    /// Certificate issued today.
    pub fn new(student_name: impl Into<String>, score: u32) -> Self {
        Self {
            student_name: student_name.into(),
            score,
            issued_on: Local::now().date_naive(),
        }
    }

    pub fn with_issued_on(mut self, date: NaiveDate) -> Self {
        self.issued_on = date;
        self
    }

    /// File name without extension: `شهادة-<name>`.
    ///
    /// Runs of whitespace, control characters and path separators become a
    /// single `-`, so the file always lands directly in the output directory.
    pub fn file_stem(&self) -> String {
        let name = self
            .student_name
            .split(|c: char| c.is_whitespace() || c.is_control() || is_reserved_in_file_name(c))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        format!("شهادة-{}", name.trim_start_matches('.'))
    }
}

/// Characters that are path separators or rejected in file names on some
/// platforms.
fn is_reserved_in_file_name(c: char) -> bool {
    matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}

/// Turns a certificate into a printable document.
pub trait CertificateRenderer: Send + Sync {
    /// File extension of the rendered document
    fn extension(&self) -> &'static str;

    fn render(&self, certificate: &Certificate) -> Result<Vec<u8>, ExportError>;
}

/// Printable right-to-left HTML page.
#[derive(Debug, Clone, Default)]
pub struct HtmlCertificateRenderer;

impl CertificateRenderer for HtmlCertificateRenderer {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, certificate: &Certificate) -> Result<Vec<u8>, ExportError> {
        let html = format!(
            r#"<!DOCTYPE html>
<html lang="ar" dir="rtl">
<head>
<meta charset="utf-8">
<title>{stem}</title>
<style>
  @page {{ size: A4 landscape; margin: 0; }}
  body {{ font-family: sans-serif; background: #fff; display: flex; justify-content: center; }}
  .certificate {{ border: 8px solid #facc15; border-radius: 24px; padding: 40px; margin: 24px;
                  max-width: 960px; min-height: 600px; text-align: center; }}
  h1 {{ color: #4f46e5; font-size: 48px; margin-bottom: 8px; }}
  .student {{ color: #16a34a; font-size: 56px; border-bottom: 4px dashed #d1d5db; padding: 16px 0; }}
  .footer {{ display: flex; justify-content: space-between; margin-top: 48px; }}
  .badge {{ background: #facc15; color: #fff; border-radius: 50%; width: 120px; height: 120px;
            line-height: 120px; font-size: 28px; font-weight: bold; transform: rotate(12deg); }}
</style>
</head>
<body>
<div class="certificate">
  <h1>شهادة إتقان المهارات الرقمية</h1>
  <p>درس تنسيق وإدارة البريد الإلكتروني</p>
  <h2 class="student">{name}</h2>
  <p>نشهد بأن الطالب المتميز قد أتم بنجاح درس<br>
     <strong>"تنسيق وإدارة البريد الإلكتروني"</strong><br>
     وأظهر براعة في كتابة الرسائل، وتنسيقها، وتأمين حسابه الرقمي.</p>
  <p>النقاط: {score}</p>
  <div class="footer">
    <div><p>معلم المادة</p><p><strong>أ. أسعد الذهلي</strong></p></div>
    <div class="badge">ممتاز</div>
    <div><p>{date}</p><p>التاريخ</p></div>
  </div>
</div>
</body>
</html>
"#,
            stem = escape_html(&certificate.file_stem()),
            name = escape_html(&certificate.student_name),
            score = certificate.score,
            date = certificate.issued_on.format("%Y/%m/%d"),
        );
        Ok(html.into_bytes())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes rendered certificates to a directory.
pub struct CertificateExporter {
    output_dir: PathBuf,
    renderer: Box<dyn CertificateRenderer>,
}

impl CertificateExporter {
    /// Exporter using the HTML renderer.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_renderer(output_dir, Box::new(HtmlCertificateRenderer))
    }

    pub fn with_renderer(
        output_dir: impl Into<PathBuf>,
        renderer: Box<dyn CertificateRenderer>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            renderer,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render and write the certificate. Returns the written file.
    pub fn export(&self, certificate: &Certificate) -> Result<PathBuf, ExportError> {
        let bytes = self.renderer.render(certificate)?;

        std::fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.output_dir.join(format!(
            "{}.{}",
            certificate.file_stem(),
            self.renderer.extension()
        ));
        std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "Certificate exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenRenderer;

    impl CertificateRenderer for BrokenRenderer {
        fn extension(&self) -> &'static str {
            "pdf"
        }

        fn render(&self, _certificate: &Certificate) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Render("no fonts".to_string()))
        }
    }

    #[test]
    fn test_file_stem_collapses_whitespace() {
        let cert = Certificate::new("Layla  Al Harthy", 450);
        assert_eq!(cert.file_stem(), "شهادة-Layla-Al-Harthy");
    }

    #[test]
    fn test_file_stem_replaces_path_characters() {
        assert_eq!(Certificate::new("ليلى/سالم", 450).file_stem(), "شهادة-ليلى-سالم");
        assert_eq!(Certificate::new("a\\b:c\0d", 450).file_stem(), "شهادة-a-b-c-d");
        assert_eq!(Certificate::new(".hidden", 450).file_stem(), "شهادة-hidden");
        assert!(!Certificate::new("x/../..", 450).file_stem().contains('/'));
    }

    #[test]
    fn test_export_stays_in_output_dir_and_can_retry() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CertificateExporter::new(dir.path());
        let cert = Certificate::new("x/../ليلى/سالم", 450);

        let first = exporter.export(&cert).unwrap();
        let second = exporter.export(&cert).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.parent(), Some(dir.path()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_html_contains_name_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let cert = Certificate::new("Layla <3", 450).with_issued_on(date);
        let html = String::from_utf8(HtmlCertificateRenderer.render(&cert).unwrap()).unwrap();

        assert!(html.contains("Layla &lt;3"));
        assert!(html.contains("2026/03/01"));
        assert!(html.contains("dir=\"rtl\""));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CertificateExporter::new(dir.path().join("certs"));

        let path = exporter.export(&Certificate::new("Layla", 450)).unwrap();

        assert_eq!(path.file_name().unwrap().to_str(), Some("شهادة-Layla.html"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Layla"));
    }

    #[test]
    fn test_render_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CertificateExporter::with_renderer(dir.path(), Box::new(BrokenRenderer));

        let result = exporter.export(&Certificate::new("Layla", 450));

        assert!(matches!(result, Err(ExportError::Render(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let exporter = CertificateExporter::new(blocker.join("certs"));
        let result = exporter.export(&Certificate::new("Layla", 450));

        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
