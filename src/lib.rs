//! ZPL QR Label Printer
//!
//! This crate renders an asset label for ZPL thermal label printers: a QR
//! symbol pointing at the asset's URL plus its identifier, model and
//! manufacturer, and sends it to the printer over a raw TCP socket.
//!
//! # Example
//!
//! ```rust,no_run
//! use zpl_label::{print_label, LabelFields, PrinterConfig};
//!
//! let fields = LabelFields::new("SN-1024", "https://assets.example/m/1024")
//!     .with_model("LX-200")
//!     .with_manufacturer("Acme");
//! let config = PrinterConfig::new("192.168.1.50");
//! let result = print_label(&fields, &config).unwrap();
//! println!("{}", result.message);
//! ```

mod error;
mod label;
mod layout;
mod printer;
mod raster;
mod symbol;

pub use crate::{
    error::{Error, SendError},
    label::{
        build_label, compose, truncate, LabelFields, LabelProgram, DESCRIPTION_MAX,
        IDENTIFIER_MAX, MANUFACTURER_MAX, MODEL_MAX,
    },
    layout::{Layout, Origin, Rule, TextField},
    printer::{
        print_label, send, PrintResult, PrinterConfig, DEFAULT_HOST, DEFAULT_PORT,
        DEFAULT_TIMEOUT,
    },
    raster::{pack, rasterize, BitmapBlock, PixelGrid},
    symbol::{encode, Level, SymbolMatrix, ERROR_CORRECTION},
};
