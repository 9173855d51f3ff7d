//! ZPL label program composition.

use log::debug;

use crate::{
    error::Error,
    layout::{Layout, Origin, TextField},
    raster::{pack, rasterize, BitmapBlock},
    symbol::{encode, ERROR_CORRECTION},
};

pub const IDENTIFIER_MAX: usize = 20;
pub const DESCRIPTION_MAX: usize = 32;
pub const MANUFACTURER_MAX: usize = 20;
pub const MODEL_MAX: usize = 20;

/// Cut `text` to at most `max` characters, dropping the tail.
pub fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Text printed on a label and the URL encoded into its symbol.
///
/// Text fields are truncated on assignment so they always fit the stock.
///
/// # Example
///
/// ```
/// use zpl_label::LabelFields;
///
/// let fields = LabelFields::new("SN-00000000000000000000", "https://example.test/m/abc123")
///     .with_model("LX-200")
///     .with_manufacturer("Acme");
/// assert_eq!(fields.identifier(), "SN-00000000000000000");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelFields {
    identifier: String,
    description: String,
    manufacturer: String,
    model: String,
    url: String,
}

impl LabelFields {
    pub fn new(identifier: &str, url: &str) -> Self {
        LabelFields {
            identifier: truncate(identifier, IDENTIFIER_MAX).to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(self, description: &str) -> Self {
        LabelFields {
            description: truncate(description, DESCRIPTION_MAX).to_string(),
            ..self
        }
    }

    pub fn with_manufacturer(self, manufacturer: &str) -> Self {
        LabelFields {
            manufacturer: truncate(manufacturer, MANUFACTURER_MAX).to_string(),
            ..self
        }
    }

    pub fn with_model(self, model: &str) -> Self {
        LabelFields {
            model: truncate(model, MODEL_MAX).to_string(),
            ..self
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A complete ZPL program for a single label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelProgram(String);

impl LabelProgram {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

fn zpl_line(buf: &mut String, s: &str) {
    buf.push_str(s);
    buf.push('\n');
}

/// Escape field data for use after `^FH\`.
fn escape_field(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\5C"),
            '^' => out.push_str("\\5E"),
            '~' => out.push_str("\\7E"),
            _ => out.push(c),
        }
    }
    out
}

fn field_origin(origin: Origin) -> String {
    format!("^FO{},{}", origin.x, origin.y)
}

fn rotated_text(buf: &mut String, field: &TextField, text: &str) {
    zpl_line(
        buf,
        &format!(
            "{}^A0R,{},{}^FH\\^FD{}^FS",
            field_origin(field.origin),
            field.height,
            field.width,
            escape_field(text)
        ),
    );
}

/// Assemble the label program.
///
/// Command order: label start and media setup, home reset, graphic field,
/// separator rule, identifier, model, manufacturer, quantity and label end.
pub fn compose(bitmap: &BitmapBlock, fields: &LabelFields, layout: &Layout) -> LabelProgram {
    let total = bitmap.total_bytes();
    let mut buf = String::with_capacity(bitmap.hex().len() + 256);

    zpl_line(&mut buf, "^XA");
    zpl_line(&mut buf, "^CI28");
    zpl_line(&mut buf, "^PON");
    zpl_line(&mut buf, &format!("^PW{}", layout.width));
    zpl_line(&mut buf, &format!("^LL{}", layout.length));
    zpl_line(&mut buf, "^LH0,0");

    zpl_line(
        &mut buf,
        &format!(
            "{}^GFA,{},{},{},{}^FS",
            field_origin(layout.symbol_origin),
            total,
            total,
            bitmap.bytes_per_row(),
            bitmap.hex()
        ),
    );

    let rule = &layout.separator;
    zpl_line(
        &mut buf,
        &format!(
            "{}^GB{},{},{}^FS",
            field_origin(rule.origin),
            rule.width,
            rule.thickness,
            rule.thickness
        ),
    );

    rotated_text(&mut buf, &layout.identifier, fields.identifier());
    rotated_text(&mut buf, &layout.model, fields.model());
    rotated_text(&mut buf, &layout.manufacturer, fields.manufacturer());

    zpl_line(&mut buf, "^PQ1");
    zpl_line(&mut buf, "^XZ");

    debug!("Composed label program of {} bytes", buf.len());
    LabelProgram(buf)
}

/// Run the rendering pipeline without touching the network.
///
/// Fails before producing any output when the URL cannot be encoded.
pub fn build_label(fields: &LabelFields, layout: &Layout) -> Result<LabelProgram, Error> {
    let matrix = encode(fields.url(), ERROR_CORRECTION)?;
    let grid = rasterize(&matrix, layout.symbol_dots as usize);
    let bitmap = pack(&grid);
    Ok(compose(&bitmap, fields, layout))
}
