//! Survey workbook reading.
//!
//! Each [`FeedbackSource`] names a workbook, a sheet, and the headers of the
//! instructor and comment columns. Headers drift between survey exports, so
//! when the configured header is missing a close match is used instead.

use calamine::{open_workbook_auto, Data, Reader};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Sheet holding positive instructor feedback in both survey exports.
pub const POSITIVE_FEEDBACK_SHEET: &str = "Instructor feedback - positive";

const AT24_FILE: &str = "Economics AT 24 Results.xlsx";
const AT24_INSTRUCTOR: &str = "Instructor Name";
const AT24_COMMENT: &str =
    "If you would like to add any positive comments about this instructor, please do so here:";

const WT25_FILE: &str = "WT25 Course Survey Qualitative comments - Economics v2.xlsx";
const WT25_INSTRUCTOR: &str = "Instructor";
const WT25_COMMENT: &str =
    "If you would like to add any positive comments about this class teacher, please do so here:";

#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("cannot open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot read sheet '{sheet}' in {path}: {source}")]
    Sheet {
        path: PathBuf,
        sheet: String,
        #[source]
        source: calamine::Error,
    },

    #[error("no instructor column like '{column}' in {path}")]
    MissingInstructorColumn { path: PathBuf, column: String },
}

/// One survey sheet and the columns to read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSource {
    pub path: PathBuf,
    pub sheet: String,
    pub instructor_column: String,
    pub comment_column: String,
}

impl FeedbackSource {
    pub fn new(
        path: impl Into<PathBuf>,
        sheet: impl Into<String>,
        instructor_column: impl Into<String>,
        comment_column: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
            instructor_column: instructor_column.into(),
            comment_column: comment_column.into(),
        }
    }
}

/// The two Economics survey exports, relative to `assets_dir`.
pub fn default_sources(assets_dir: &Path) -> Vec<FeedbackSource> {
    vec![
        FeedbackSource::new(
            assets_dir.join(AT24_FILE),
            POSITIVE_FEEDBACK_SHEET,
            AT24_INSTRUCTOR,
            AT24_COMMENT,
        ),
        FeedbackSource::new(
            assets_dir.join(WT25_FILE),
            POSITIVE_FEEDBACK_SHEET,
            WT25_INSTRUCTOR,
            WT25_COMMENT,
        ),
    ]
}

/// Index of the instructor column.
///
/// Exact header first, then the first header containing "instructor", then
/// the first containing "name" or "teacher".
pub fn resolve_instructor_column(headers: &[String], preferred: &str) -> Option<usize> {
    exact(headers, preferred)
        .or_else(|| first_containing(headers, |h| h.contains("instructor")))
        .or_else(|| first_containing(headers, |h| h.contains("name") || h.contains("teacher")))
}

/// Index of the comment column.
///
/// Exact header first, then the first header containing both "positive" and
/// "comment", then the first containing "comment".
pub fn resolve_comment_column(headers: &[String], preferred: &str) -> Option<usize> {
    exact(headers, preferred)
        .or_else(|| first_containing(headers, |h| h.contains("positive") && h.contains("comment")))
        .or_else(|| first_containing(headers, |h| h.contains("comment")))
}

fn exact(headers: &[String], wanted: &str) -> Option<usize> {
    headers.iter().position(|h| h == wanted)
}

fn first_containing(headers: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    headers.iter().position(|h| pred(&h.to_lowercase()))
}

/// A survey sheet with its columns resolved.
#[derive(Debug, Clone)]
pub struct SurveyTable {
    label: String,
    instructor: usize,
    comment: Option<usize>,
    rows: Vec<Vec<String>>,
}

impl SurveyTable {
    /// Build from stringified rows; the first row is the header.
    pub fn from_rows(
        source: &FeedbackSource,
        mut rows: Vec<Vec<String>>,
    ) -> Result<Self, SpreadsheetError> {
        let label = format!("{} -> {}", source.path.display(), source.sheet);
        let headers = if rows.is_empty() {
            Vec::new()
        } else {
            rows.remove(0)
        };

        let instructor = resolve_instructor_column(&headers, &source.instructor_column)
            .ok_or_else(|| SpreadsheetError::MissingInstructorColumn {
                path: source.path.clone(),
                column: source.instructor_column.clone(),
            })?;
        if headers[instructor] != source.instructor_column {
            warn!(
                table = %label,
                wanted = %source.instructor_column,
                using = %headers[instructor],
                "Instructor column not found, using closest header"
            );
        }

        let comment = resolve_comment_column(&headers, &source.comment_column);
        match comment {
            Some(idx) if headers[idx] != source.comment_column => warn!(
                table = %label,
                wanted = %source.comment_column,
                using = %headers[idx],
                "Comment column not found, using closest header"
            ),
            None => warn!(
                table = %label,
                wanted = %source.comment_column,
                "No comment column, sheet contributes no feedback"
            ),
            _ => {}
        }

        Ok(Self {
            label,
            instructor,
            comment,
            rows,
        })
    }

    /// Where the table came from, for logs.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Trimmed, non-empty instructor cells in row order.
    pub fn instructors(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(self.instructor))
            .map(|cell| cell.trim())
            .filter(|name| !name.is_empty())
    }

    /// Non-blank comments on rows whose instructor matches `teacher`,
    /// ignoring case and surrounding whitespace.
    pub fn comments_for(&self, teacher: &str) -> Vec<String> {
        let Some(comment) = self.comment else {
            return Vec::new();
        };
        let wanted = teacher.trim().to_lowercase();

        self.rows
            .iter()
            .filter(|row| {
                row.get(self.instructor)
                    .is_some_and(|cell| cell.trim().to_lowercase() == wanted)
            })
            .filter_map(|row| row.get(comment))
            .filter(|cell| !cell.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Read one source from disk.
pub fn read_table(source: &FeedbackSource) -> Result<SurveyTable, SpreadsheetError> {
    let mut workbook = open_workbook_auto(&source.path).map_err(|e| SpreadsheetError::Open {
        path: source.path.clone(),
        source: e,
    })?;

    let range = workbook
        .worksheet_range(&source.sheet)
        .map_err(|e| SpreadsheetError::Sheet {
            path: source.path.clone(),
            sheet: source.sheet.clone(),
            source: e,
        })?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    debug!(path = %source.path.display(), rows = rows.len(), "Read survey sheet");

    SurveyTable::from_rows(source, rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Read every source, logging and skipping the ones that fail.
pub fn load_tables(sources: &[FeedbackSource]) -> Vec<SurveyTable> {
    sources
        .iter()
        .filter_map(|source| match read_table(source) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!(error = %e, "Skipping feedback source");
                None
            }
        })
        .collect()
}

/// Sorted, unique teacher names across all tables.
pub fn names_from_tables(tables: &[SurveyTable]) -> Vec<String> {
    tables
        .iter()
        .flat_map(SurveyTable::instructors)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Feedback per roster name, across tables in order.
///
/// Every roster name gets an entry, empty when nothing matched.
pub fn feedback_from_tables(roster: &[String], tables: &[SurveyTable]) -> IndexMap<String, Vec<String>> {
    let mut feedback: IndexMap<String, Vec<String>> = IndexMap::with_capacity(roster.len());

    for teacher in roster {
        if feedback.contains_key(teacher) {
            continue;
        }
        let comments: Vec<String> = tables
            .iter()
            .flat_map(|table| table.comments_for(teacher))
            .collect();
        debug!(teacher = %teacher, comments = comments.len(), "Collected survey feedback");
        feedback.insert(teacher.clone(), comments);
    }

    feedback
}

/// Sorted, unique teacher names from the given sources.
pub fn teacher_names(sources: &[FeedbackSource]) -> Vec<String> {
    let names = names_from_tables(&load_tables(sources));
    info!(teachers = names.len(), "Collected teacher names from surveys");
    names
}

/// Positive feedback for each roster name from the given sources.
pub fn feedback_for(roster: &[String], sources: &[FeedbackSource]) -> IndexMap<String, Vec<String>> {
    feedback_from_tables(roster, &load_tables(sources))
}
