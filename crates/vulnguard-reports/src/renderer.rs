//! Turning an assembled [`Report`] into an exportable byte stream.
//!
//! Rendering failures are renderer errors, never domain errors; the
//! HTTP layer maps them to a 502-style problem response.

use genpdf::elements::{Break, Paragraph};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element};
use thiserror::Error;

use crate::services::Report;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Font loading failed: {0}")]
    Fonts(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

/// Renders an assembled report to an opaque binary document.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError>;

    /// MIME type of the rendered output.
    fn content_type(&self) -> &'static str;
}

/// PDF renderer backed by genpdf. Requires Liberation fonts on the
/// host; a local `./fonts` directory takes precedence.
pub struct PdfRenderer {
    font_dirs: Vec<String>,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self {
            font_dirs: vec![
                "./fonts".to_string(),
                "/usr/share/fonts/truetype/liberation".to_string(),
            ],
        }
    }

    fn load_fonts(&self) -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, RenderError> {
        for dir in &self.font_dirs {
            if let Ok(family) = genpdf::fonts::from_files(dir, "LiberationSans", None) {
                return Ok(family);
            }
        }
        Err(RenderError::Fonts(format!(
            "no usable LiberationSans in {:?}",
            self.font_dirs
        )))
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, report: &Report) -> Result<Vec<u8>, RenderError> {
        let fonts = self.load_fonts()?;

        let title_style = Style::new().bold().with_font_size(20);
        let section_style = Style::new().bold().with_font_size(14);
        let text_style = Style::new().with_font_size(10);

        let mut doc = Document::new(fonts);
        doc.set_title(&report.report_title);

        doc.push(Break::new(2));
        doc.push(
            Paragraph::new(&report.report_title)
                .aligned(Alignment::Center)
                .styled(title_style),
        );
        doc.push(Break::new(1));
        doc.push(
            Paragraph::new(format!("Generated: {}", report.generated_at))
                .aligned(Alignment::Center)
                .styled(text_style),
        );
        doc.push(Break::new(2));

        doc.push(Paragraph::new("SUMMARY").styled(section_style));
        doc.push(
            Paragraph::new(format!(
                "Assets monitored: {} | Open vulnerabilities: {}",
                report.total_assets, report.open_vulnerabilities
            ))
            .styled(text_style),
        );
        for (severity, count) in &report.severity_distribution {
            doc.push(Paragraph::new(format!("  {}: {}", severity, count)).styled(text_style));
        }

        doc.push(Break::new(1));
        doc.push(Paragraph::new("TOP RISKS").styled(section_style));
        for (i, risk) in report.top_risks.iter().enumerate() {
            doc.push(
                Paragraph::new(format!(
                    "{}. [{}] {} - {} on {} (score {:.2})",
                    i + 1,
                    risk.severity,
                    risk.cve_id,
                    risk.title,
                    risk.asset_name,
                    risk.risk_score
                ))
                .styled(text_style),
            );
        }

        doc.push(Break::new(1));
        doc.push(Paragraph::new("ASSETS").styled(section_style));
        for asset in &report.assets {
            doc.push(Break::new(1));
            doc.push(
                Paragraph::new(format!(
                    "{} ({}) - criticality {}, last scanned {}",
                    asset.asset_name, asset.asset_type, asset.criticality, asset.last_scanned
                ))
                .styled(Style::new().bold().with_font_size(11)),
            );
            if asset.open_findings.is_empty() {
                doc.push(Paragraph::new("  No open findings").styled(text_style));
            }
            for finding in &asset.open_findings {
                doc.push(
                    Paragraph::new(format!(
                        "  [{}] {} - {} (CVSS {:.1}, score {:.2})",
                        finding.severity,
                        finding.cve_id,
                        finding.title,
                        finding.cvss_score,
                        finding.risk_score
                    ))
                    .styled(text_style),
                );
            }
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| RenderError::Render(e.to_string()))?;
        Ok(buffer)
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}
