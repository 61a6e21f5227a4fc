use crate::error::{NetworkError, Result};
use crate::person::{CellRecord, PersonRecord, Status, denormalize_cells};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

lazy_static! {
    static ref HEADER_NOISE: Regex = Regex::new(r"[^a-z0-9]").unwrap();
    static ref TRUTHY: Regex = Regex::new(r"(?i)^(true|yes|y|sim|s|1|x)$").unwrap();
    static ref FALSY: Regex = Regex::new(r"(?i)^(false|no|n|nao|não|0|)$").unwrap();
}

/// People and cells as handed over by the data store at one point in time.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub people: Vec<PersonRecord>,
    #[serde(default)]
    pub cells: Vec<CellRecord>,
    #[serde(default = "Utc::now")]
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(people: Vec<PersonRecord>, cells: Vec<CellRecord>) -> Self {
        Snapshot {
            people,
            cells,
            captured_at: Utc::now(),
        }
    }

    /// Parses a loosely typed payload: a bare array of people, or an object
    /// with a `people` array and optional `cells` array.
    pub fn from_value(value: &Value) -> Result<Self> {
        let (people, cells) = match value {
            Value::Array(_) => (Some(value), None),
            Value::Object(map) => (map.get("people"), map.get("cells")),
            _ => {
                return Err(NetworkError::invalid_argument(
                    "expected an array of people or an object with a 'people' array",
                ));
            }
        };
        let Some(people) = people.filter(|people| people.is_array()) else {
            return Err(NetworkError::invalid_argument(
                "'people' must be an array of person records",
            ));
        };

        let people: Vec<PersonRecord> = serde_json::from_value(people.clone())?;
        let cells: Vec<CellRecord> = match cells.filter(|cells| !cells.is_null()) {
            Some(cells) => serde_json::from_value(cells.clone())?,
            None => Vec::new(),
        };

        let mut snapshot = Snapshot::new(people, cells);
        if let Some(captured_at) = value
            .get("capturedAt")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        {
            snapshot.captured_at = captured_at.with_timezone(&Utc);
        }
        Ok(snapshot)
    }

    /// People with cell and leader names filled in from `cells`.
    pub fn denormalized_people(&self) -> Vec<PersonRecord> {
        let mut people = self.people.clone();
        denormalize_cells(&mut people, &self.cells);
        people
    }
}

/// Load a snapshot from a JSON file
///
/// # Arguments
/// * `filepath` - Path to a JSON file holding either an array of people or
///   an object with `people` and `cells`
///
/// # Examples
/// ```no_run
/// use genealogy::loader::from_json;
///
/// match from_json("people.json") {
///     Ok(snapshot) => println!("Loaded {} people", snapshot.people.len()),
///     Err(e) => eprintln!("Error loading JSON: {}", e),
/// }
/// ```
pub fn from_json(filepath: impl AsRef<Path>) -> Result<Snapshot> {
    let file = File::open(filepath)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    Snapshot::from_value(&value)
}

/// Load people from a CSV file
///
/// The first line must be a header. Columns are matched by name, ignoring
/// case and punctuation, so `parent_id_evangelism` and `parentIdEvangelism`
/// are the same column. `id` and `name` are required; every other column is
/// optional.
///
/// # Examples
/// ```no_run
/// use genealogy::loader::people_from_csv;
///
/// match people_from_csv("people.csv") {
///     Ok(people) => println!("Loaded {} people", people.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn people_from_csv(filepath: impl AsRef<Path>) -> Result<Vec<PersonRecord>> {
    let lines = read_lines(filepath)?;
    let Some((header, rows)) = lines.split_first() else {
        return Ok(Vec::new());
    };
    let columns = header_columns(header);
    for required in ["id", "name"] {
        if !columns.contains_key(required) {
            return Err(NetworkError::Csv {
                line: 1,
                message: format!("missing required column '{}'", required),
            });
        }
    }

    let mut people = Vec::with_capacity(rows.len());
    for (offset, line) in rows.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = offset + 2;
        let fields = parse_csv_row(line);
        let field = |name: &str| -> Option<&str> {
            columns
                .get(name)
                .and_then(|&column| fields.get(column))
                .map(|value| value.trim())
        };
        let optional = |name: &str| field(name).filter(|v| !v.is_empty()).map(str::to_string);

        let status = match field("status").filter(|v| !v.is_empty()) {
            None => Status::default(),
            Some(raw) => Status::from_label(raw).ok_or_else(|| NetworkError::Csv {
                line: line_number,
                message: format!("unknown status '{}'", raw),
            })?,
        };

        people.push(PersonRecord {
            id: field("id").unwrap_or_default().to_string(),
            name: field("name").unwrap_or_default().to_string(),
            cell_id: optional("cellid"),
            cell_name: optional("cellname"),
            leader_name: optional("leadername"),
            status,
            parent_id_evangelism: optional("parentidevangelism"),
            parent_id_discipleship: optional("parentiddiscipleship"),
            baptized: parse_flag(field("baptized"), line_number)?,
            encounter_with_god: parse_flag(field("encounterwithgod"), line_number)?,
            is_founder: parse_flag(field("isfounder"), line_number)?,
        });
    }

    debug!("loaded {} people from CSV", people.len());
    Ok(people)
}

/// Load cells (`id`, `name`, optional `leader_name`) from a CSV file
pub fn cells_from_csv(filepath: impl AsRef<Path>) -> Result<Vec<CellRecord>> {
    let lines = read_lines(filepath)?;
    let Some((header, rows)) = lines.split_first() else {
        return Ok(Vec::new());
    };
    let columns = header_columns(header);
    let (Some(&id_column), Some(&name_column)) = (columns.get("id"), columns.get("name")) else {
        return Err(NetworkError::Csv {
            line: 1,
            message: "cells need 'id' and 'name' columns".to_string(),
        });
    };

    let cells = rows
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields = parse_csv_row(line);
            let get = |column: usize| fields.get(column).map(|v| v.trim().to_string());
            CellRecord {
                id: get(id_column).unwrap_or_default(),
                name: get(name_column).unwrap_or_default(),
                leader_name: columns
                    .get("leadername")
                    .and_then(|&column| get(column))
                    .filter(|v| !v.is_empty()),
            }
        })
        .collect();
    Ok(cells)
}

/// Load cells from a `.csv` file or a `.json` array of cell objects
pub fn load_cells(filepath: impl AsRef<Path>) -> Result<Vec<CellRecord>> {
    let path = filepath.as_ref();
    match extension_of(path).as_deref() {
        Some("csv") => cells_from_csv(path),
        Some("json") => {
            let file = File::open(path)?;
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
        Some(ext) => Err(NetworkError::invalid_argument(format!(
            "Unsupported cells file extension: {}",
            ext
        ))),
        None => Err(NetworkError::invalid_argument("File has no extension")),
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Detect file type and load appropriate format
///
/// `.json` and `.csv` are read as data-store exports; `.gz` and `.bin` are
/// compressed snapshots written by [`crate::saving::save_snapshot`].
pub fn load_snapshot(filepath: impl AsRef<Path>) -> Result<Snapshot> {
    let path = filepath.as_ref();
    match extension_of(path).as_deref() {
        Some("json") => from_json(path),
        Some("csv") => Ok(Snapshot::new(people_from_csv(path)?, Vec::new())),
        Some("gz") | Some("bin") => crate::saving::load_snapshot(path),
        Some(ext) => Err(NetworkError::invalid_argument(format!(
            "Unsupported file extension: {}",
            ext
        ))),
        None => Err(NetworkError::invalid_argument("File has no extension")),
    }
}

fn read_lines(filepath: impl AsRef<Path>) -> Result<Vec<String>> {
    let file = File::open(filepath)?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()?;
    Ok(lines)
}

fn header_columns(header: &str) -> HashMap<String, usize> {
    parse_csv_row(header.trim_start_matches('\u{feff}'))
        .iter()
        .enumerate()
        .map(|(column, name)| {
            let key = HEADER_NOISE.replace_all(&name.to_lowercase(), "").into_owned();
            (key, column)
        })
        .collect()
}

fn parse_flag(raw: Option<&str>, line: usize) -> Result<bool> {
    let raw = raw.unwrap_or("");
    if TRUTHY.is_match(raw) {
        Ok(true)
    } else if FALSY.is_match(raw) {
        Ok(false)
    } else {
        Err(NetworkError::Csv {
            line,
            message: format!("expected a yes/no value, got '{}'", raw),
        })
    }
}

// Parse a CSV row into a vector of strings
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Doubled quote inside a quoted field
                    current_field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                result.push(std::mem::take(&mut current_field));
            }
            _ => current_field.push(c),
        }
    }

    result.push(current_field);
    result
}
