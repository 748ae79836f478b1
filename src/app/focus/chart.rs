use chrono::NaiveDate;
use eframe::egui::{Pos2, Rect, pos2};

use crate::roster::{FightResult, Fighter};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ChartPoint {
    pub(crate) date: NaiveDate,
    /// Positive round for a win, negative for a loss, zero for a draw.
    pub(crate) value: i32,
    pub(crate) result: FightResult,
    pub(crate) opponent: String,
    pub(crate) method: Option<String>,
}

/// One fighter's bout history as date against signed finishing round.
#[derive(Clone, Debug)]
pub(crate) struct HistoryChart {
    pub(crate) points: Vec<ChartPoint>,
    pub(crate) first: NaiveDate,
    pub(crate) last: NaiveDate,
    pub(crate) max_round: i32,
    /// Bouts without a usable date are left off the chart.
    pub(crate) undated: usize,
}

fn signed_round(result: FightResult, round: Option<u8>) -> i32 {
    let round = i32::from(round.unwrap_or(1).max(1));
    match result {
        FightResult::Win => round,
        FightResult::Loss => -round,
        FightResult::Draw => 0,
    }
}

impl HistoryChart {
    pub(crate) fn for_fighter(fighter: &Fighter) -> Option<Self> {
        let mut points = fighter
            .fights
            .iter()
            .filter_map(|fight| {
                Some(ChartPoint {
                    date: fight.date?,
                    value: signed_round(fight.result, fight.round),
                    result: fight.result,
                    opponent: fight.opponent_name.clone(),
                    method: fight.method.clone(),
                })
            })
            .collect::<Vec<_>>();
        let undated = fighter.fights.len() - points.len();
        points.sort_by_key(|point| point.date);

        let first = points.first()?.date;
        let last = points.last()?.date;
        let max_round = points
            .iter()
            .map(|point| point.value.abs())
            .max()
            .unwrap_or(1)
            .max(1);

        Some(Self {
            points,
            first,
            last,
            max_round,
            undated,
        })
    }

    /// Maps a point into `area`: dates run left to right, zero sits on the
    /// horizontal midline.
    pub(crate) fn project(&self, point: &ChartPoint, area: Rect) -> Pos2 {
        let span = (self.last - self.first).num_days();
        let t = if span <= 0 {
            0.5
        } else {
            (point.date - self.first).num_days() as f32 / span as f32
        };
        let v = point.value as f32 / self.max_round as f32;
        pos2(
            area.left() + t * area.width(),
            area.center().y - v * area.height() * 0.5,
        )
    }

    pub(crate) fn projected(&self, area: Rect) -> Vec<(Pos2, &ChartPoint)> {
        self.points
            .iter()
            .map(|point| (self.project(point, area), point))
            .collect()
    }
}
