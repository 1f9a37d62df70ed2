#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod source;

pub use source::PdfTextSource;
