use std::io::Read;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct FighterRecord {
    #[serde(rename = "fid")]
    pub id: String,
    pub name: String,
    #[serde(rename = "class")]
    pub weight_class: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub height: Option<f32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub weight: Option<f32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FightRecord {
    #[serde(rename = "f1fid")]
    pub fighter1_id: String,
    #[serde(rename = "f1name")]
    pub fighter1_name: String,
    #[serde(rename = "f2fid")]
    pub fighter2_id: String,
    #[serde(rename = "f2name")]
    pub fighter2_name: String,
    #[serde(rename = "f1result")]
    pub result1: String,
    #[serde(rename = "f2result")]
    pub result2: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub round: Option<u8>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub event_day: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub event_month: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub event_year: Option<i32>,
}

impl FightRecord {
    pub fn event_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.event_year?, self.event_month?, self.event_day?)
    }

    pub fn method(&self) -> Option<String> {
        self.method
            .as_deref()
            .map(str::trim)
            .filter(|method| !method.is_empty())
            .map(str::to_owned)
    }
}

const FIGHTER_COLUMNS: [&str; 3] = ["fid", "name", "class"];
const FIGHT_COLUMNS: [&str; 6] = ["f1fid", "f1name", "f2fid", "f2name", "f1result", "f2result"];

/// Reads every row; a row that fails to deserialize is skipped with a warning
/// so one malformed line does not cost the whole file. A missing required
/// column fails the whole read.
fn read_rows<T, R>(reader: R, source: &str, required: &[&str]) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header row of {source}"))?;

    let missing = required
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .copied()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!("{source} is missing required column(s): {}", missing.join(", "));
    }

    let mut rows = Vec::new();
    for (line, row) in reader.deserialize::<T>().enumerate() {
        match row {
            Ok(row) => rows.push(row),
            Err(error) => log::warn!("{source}: skipping malformed row {}: {error}", line + 2),
        }
    }
    Ok(rows)
}

pub fn read_fighter_records<R: Read>(reader: R, source: &str) -> Result<Vec<FighterRecord>> {
    read_rows(reader, source, &FIGHTER_COLUMNS)
}

pub fn read_fight_records<R: Read>(reader: R, source: &str) -> Result<Vec<FightRecord>> {
    read_rows(reader, source, &FIGHT_COLUMNS)
}
