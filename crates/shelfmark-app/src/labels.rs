// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{EmptySelection, Record, RecordId};

const QRCODE_SCRIPT: &str = "https://cdnjs.cloudflare.com/ajax/libs/qrcodejs/1.0.0/qrcode.min.js";
const JSBARCODE_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/jsbarcode@3.11.5/dist/JsBarcode.all.min.js";
const PRINT_DELAY_MS: u32 = 500;

/// One printable label. Title and both code payloads carry the box code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDocument {
    pub id: RecordId,
    pub title: String,
    pub barcode: String,
    pub qr: String,
}

impl LabelDocument {
    fn for_record(record: &Record) -> Self {
        Self {
            id: record.id,
            title: record.box_code.clone(),
            barcode: record.box_code.clone(),
            qr: record.box_code.clone(),
        }
    }
}

/// Physical size of one label page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLayout {
    pub width_mm: u32,
    pub height_mm: u32,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            width_mm: 100,
            height_mm: 80,
        }
    }
}

/// Labels for every selected record, in load order regardless of the view.
pub fn generate_labels(records: &[Record]) -> Result<Vec<LabelDocument>, EmptySelection> {
    let mut selected = records
        .iter()
        .filter(|record| record.selected)
        .collect::<Vec<_>>();
    if selected.is_empty() {
        return Err(EmptySelection);
    }
    selected.sort_by_key(|record| record.id);
    Ok(selected.into_iter().map(LabelDocument::for_record).collect())
}

/// Builds the self-printing HTML document: one page per label, codes drawn
/// client-side by QRCode.js and JsBarcode once the page has loaded.
pub fn render_print_document(labels: &[LabelDocument], layout: LabelLayout) -> String {
    let mut body = String::new();
    for (index, label) in labels.iter().enumerate() {
        body.push_str(&format!(
            r#"    <div class="label">
      <div class="label-main">
        <div class="label-text">
          <h1>{title}</h1>
          <div class="codes-row">
            <div class="barcode-container">
              <svg id="barcode-{index}" class="barcode"></svg>
            </div>
            <div class="qr-container">
              <div id="qr-{index}" class="qr-code"></div>
            </div>
          </div>
        </div>
      </div>
    </div>
"#,
            title = escape_html(&label.title),
        ));
    }

    let mut script = String::new();
    for (index, label) in labels.iter().enumerate() {
        script.push_str(&format!(
            r#"        new QRCode(document.getElementById('qr-{index}'), {{
          text: {qr},
          width: 40,
          height: 40,
          colorDark: '#000000',
          colorLight: '#ffffff',
          correctLevel: QRCode.CorrectLevel.H
        }});
        JsBarcode('#barcode-{index}', {barcode}, {{
          format: 'CODE128',
          width: 1.5,
          height: 40,
          displayValue: false,
          margin: 0
        }});
"#,
            qr = js_string(&label.qr),
            barcode = js_string(&label.barcode),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="th">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Print Labels</title>
  <script src="{QRCODE_SCRIPT}"></script>
  <script src="{JSBARCODE_SCRIPT}"></script>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    @page {{ size: {width}mm {height}mm; margin: 0; }}
    body {{ font-family: 'Arial', 'Helvetica', sans-serif; }}
    .label {{
      width: {width}mm;
      height: {height}mm;
      padding: 1mm 8mm 8mm 8mm;
      page-break-after: always;
      display: flex;
      align-items: center;
      justify-content: center;
      border: 1px dashed #ccc;
      background: white;
    }}
    .label:last-child {{ page-break-after: auto; }}
    .label-main, .label-text {{
      width: 100%;
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: flex-start;
    }}
    .label-main {{ height: 100%; }}
    .label-text h1 {{
      font-size: 52pt;
      font-weight: bold;
      line-height: 1.1;
      padding: 0 2mm;
      text-align: center;
      width: 100%;
      white-space: nowrap;
    }}
    .codes-row {{
      display: flex;
      align-items: center;
      justify-content: center;
      gap: 8mm;
      width: 100%;
    }}
    .barcode {{ width: 100%; max-width: 45mm; height: auto; }}
    .qr-container {{ display: flex; align-items: center; justify-content: center; }}
    .qr-code {{ display: inline-block; background: white; }}
    .qr-code canvas {{ display: block; }}
    @media print {{ .label {{ border: none; }} }}
  </style>
</head>
<body>
{body}  <script>
    window.onload = function() {{
{script}        setTimeout(function() {{
          window.print();
        }}, {PRINT_DELAY_MS});
    }};
  </script>
</body>
</html>
"#,
        width = layout.width_mm,
        height = layout.height_mm,
    )
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Quoted JS string literal that is also safe inside an inline `<script>`.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned())
        .to_string()
        .replace("</", "<\\/")
}
