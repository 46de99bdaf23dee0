//! Source normalizers.
//!
//! Each module turns one kind of input file into the plain values the rest
//! of the pipeline works with:
//!
//! - [`email`] - `.eml` threads into line-oriented [`evidence::Document`]s
//! - [`spreadsheet`] - survey workbooks into teacher names and feedback
//! - [`roster_file`] - `.txt` / `.csv` teacher lists

pub mod email;
pub mod roster_file;
pub mod spreadsheet;
