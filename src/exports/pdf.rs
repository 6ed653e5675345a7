//! PDF export functionality
//!
//! The report is laid out into pages of positioned text lines first, then
//! drawn with printpdf. Only the drawing step touches the PDF library.

use anyhow::{Context, Result};
use chrono::Local;
use printpdf::*;
use std::io::BufWriter;

use crate::insights::{DeviceScore, RiskPenalties, ScoreBands};
use crate::models::{Device, RiskTier};

pub const REPORT_TITLE: &str = "Net-Sentinel Security Report";
pub const REPORT_FILE_NAME: &str = "NetSentinel_Report.pdf";

const FONT_SIZE_TITLE: f32 = 20.0;
const FONT_SIZE_HEADING: f32 = 14.0;
const FONT_SIZE_SUBHEADING: f32 = 12.0;
const FONT_SIZE_BODY: f32 = 10.0;
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PAGE_START_Y_MM: f32 = 277.0;
const PAGE_BOTTOM_Y_MM: f32 = 20.0;
const PAGE_MARGIN_X_MM: f32 = 10.0;
const FINDING_INDENT_X_MM: f32 = 15.0;

/// RGB in 0..=1, as printpdf expects
type Ink = (f32, f32, f32);

const INK_BLACK: Ink = (0.0, 0.0, 0.0);

fn tier_ink(tier: RiskTier) -> Ink {
    match tier {
        RiskTier::High => (0.78, 0.0, 0.0),
        RiskTier::Medium => (0.85, 0.5, 0.0),
        RiskTier::Low => (0.0, 0.55, 0.2),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TextLine {
    text: String,
    x_mm: f32,
    y_mm: f32,
    size_pt: f32,
    bold: bool,
    ink: Ink,
}

fn current_page_mut(pages: &mut [Vec<TextLine>]) -> &mut Vec<TextLine> {
    let idx = pages.len().saturating_sub(1);
    &mut pages[idx]
}

fn ensure_space(pages: &mut Vec<Vec<TextLine>>, y_pos: &mut f32, needed_mm: f32) {
    if *y_pos - needed_mm >= PAGE_BOTTOM_Y_MM {
        return;
    }

    pages.push(Vec::new());
    *y_pos = PAGE_START_Y_MM;
    add_line(
        pages,
        y_pos,
        format!("{} (continued)", REPORT_TITLE),
        PAGE_MARGIN_X_MM,
        FONT_SIZE_HEADING,
        true,
        INK_BLACK,
        12.0,
    );
}

#[allow(clippy::too_many_arguments)]
fn add_line(
    pages: &mut [Vec<TextLine>],
    y_pos: &mut f32,
    text: String,
    x_mm: f32,
    size_pt: f32,
    bold: bool,
    ink: Ink,
    advance_mm: f32,
) {
    current_page_mut(pages).push(TextLine {
        text,
        x_mm,
        y_mm: *y_pos,
        size_pt,
        bold,
        ink,
    });
    *y_pos -= advance_mm;
}

/// Lay the report out into pages. `generated` is printed verbatim.
fn layout_report(
    devices: &[Device],
    penalties: &RiskPenalties,
    bands: &ScoreBands,
    generated: &str,
) -> Vec<Vec<TextLine>> {
    let mut pages: Vec<Vec<TextLine>> = vec![Vec::new()];
    let mut y_pos = PAGE_START_Y_MM;

    add_line(
        &mut pages,
        &mut y_pos,
        REPORT_TITLE.to_string(),
        PAGE_MARGIN_X_MM,
        FONT_SIZE_TITLE,
        true,
        INK_BLACK,
        10.0,
    );
    add_line(
        &mut pages,
        &mut y_pos,
        format!("Generated: {}", generated),
        PAGE_MARGIN_X_MM,
        FONT_SIZE_SUBHEADING,
        false,
        INK_BLACK,
        20.0,
    );

    for device in devices {
        // Keep the device heading with at least its first finding
        ensure_space(&mut pages, &mut y_pos, 17.0);

        let score = DeviceScore::calculate(device, penalties, bands);
        add_line(
            &mut pages,
            &mut y_pos,
            format!(
                "Target: {} ({}) - Score {}/100 [{}]",
                device.address,
                device.category,
                score.score,
                score.band.as_str().to_uppercase()
            ),
            PAGE_MARGIN_X_MM,
            FONT_SIZE_SUBHEADING,
            true,
            INK_BLACK,
            10.0,
        );

        for vuln in &device.vulnerabilities {
            ensure_space(&mut pages, &mut y_pos, 7.0);
            add_line(
                &mut pages,
                &mut y_pos,
                format!(
                    " - [{}] Port {}: {}",
                    vuln.risk_tier.label(),
                    vuln.port,
                    vuln.service
                ),
                FINDING_INDENT_X_MM,
                FONT_SIZE_BODY,
                false,
                tier_ink(vuln.risk_tier),
                7.0,
            );
        }

        y_pos -= 10.0;
    }

    pages
}

fn build_pdf_bytes(pages: Vec<Vec<TextLine>>) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("Failed to load Helvetica")?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("Failed to load Helvetica-Bold")?;

    for (idx, lines) in pages.into_iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", idx + 1),
            );
            doc.get_page(page).get_layer(layer)
        };

        for line in lines {
            let (r, g, b) = line.ink;
            layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
            let face = if line.bold { &font_bold } else { &font };
            layer.use_text(line.text, line.size_pt, Mm(line.x_mm), Mm(line.y_mm), face);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).context("Failed to serialize PDF")?;
    let bytes = buf
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush PDF buffer: {}", e))?;

    Ok(bytes)
}

/// Render the security report for `devices`, one block per device.
pub fn render_report_pdf(
    devices: &[Device],
    penalties: &RiskPenalties,
    bands: &ScoreBands,
) -> Result<Vec<u8>> {
    let generated = Local::now().format("%Y-%m-%d").to_string();
    build_pdf_bytes(layout_report(devices, penalties, bands, &generated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vulnerability;
    use crate::scanner::fallback_devices;

    fn layout(devices: &[Device]) -> Vec<Vec<TextLine>> {
        layout_report(
            devices,
            &RiskPenalties::default(),
            &ScoreBands::default(),
            "2026-10-18",
        )
    }

    #[test]
    fn report_has_title_date_and_one_block_per_device() {
        let pages = layout(&fallback_devices());
        assert_eq!(pages.len(), 1);

        let texts: Vec<&str> = pages[0].iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts[0], REPORT_TITLE);
        assert_eq!(texts[1], "Generated: 2026-10-18");
        assert_eq!(
            texts[2],
            "Target: 192.168.1.15 (Linux Server) - Score 65/100 [WARNING]"
        );
        assert_eq!(texts[5], " - [HIGH] Port 3306: MySQL");
        assert!(texts.contains(&"Target: 192.168.1.100 (Workstation) - Score 100/100 [SAFE]"));
    }

    #[test]
    fn findings_are_inked_by_tier() {
        let pages = layout(&fallback_devices());
        let find = |needle: &str| {
            pages[0]
                .iter()
                .find(|l| l.text.contains(needle))
                .map(|l| l.ink)
        };
        assert_eq!(find("Port 3306"), Some(tier_ink(RiskTier::High)));
        assert_eq!(find("Port 80:"), Some(tier_ink(RiskTier::Medium)));
        assert_eq!(find("Port 22:"), Some(tier_ink(RiskTier::Low)));
        assert_eq!(find("Target: 192.168.1.1 "), Some(INK_BLACK));
    }

    #[test]
    fn long_inventories_paginate_with_continuation_heading() {
        let device = (0..60u16).fold(Device::new("10.0.0.9", "Linux Server"), |d, i| {
            d.with_vulnerability(Vulnerability::new(1000 + i, "svc", RiskTier::Low, "open"))
        });
        let pages = layout(&[device]);

        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.iter().all(|l| l.y_mm >= PAGE_BOTTOM_Y_MM));
        }
        assert_eq!(pages[1][0].text, format!("{} (continued)", REPORT_TITLE));
        let findings: usize = pages
            .iter()
            .flatten()
            .filter(|l| l.text.starts_with(" - ["))
            .count();
        assert_eq!(findings, 60);
    }

    #[test]
    fn rendered_pdf_has_pdf_magic() {
        let bytes = render_report_pdf(
            &fallback_devices(),
            &RiskPenalties::default(),
            &ScoreBands::default(),
        )
        .expect("report should render");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
