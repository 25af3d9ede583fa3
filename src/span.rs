// src/span.rs
//! Span selection over a curve container: index + normalized [start, end] range.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::{CurveSample, CurveSet};

/// A sub-range of one curve in a [`CurveSet`].
///
/// `range.x`/`range.y` are normalized arc-length parameters. Nothing forces
/// `start <= end`; an inverted range simply yields no placements.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplineSpan {
    pub index: usize,
    pub range: Vec2,
}

impl Default for SplineSpan {
    fn default() -> Self {
        Self { index: 0, range: Vec2::new(0.0, 1.0) }
    }
}

impl SplineSpan {
    pub fn new(index: usize, start: f32, end: f32) -> Self {
        Self { index, range: Vec2::new(start, end) }
    }

    /// Clamp this span against the container's bounds.
    ///
    /// An absent or empty container forces `index` to 0; otherwise the index
    /// is clamped into the curve list. Range components are clamped to [0, 1]
    /// independently. Never fails; out-of-range input is corrected in place.
    pub fn validate(&mut self, curves: Option<&CurveSet>) {
        match curves {
            Some(set) if !set.is_empty() => {
                self.index = self.index.min(set.len() - 1);
            }
            _ => {
                self.index = 0;
            }
        }
        self.range.x = self.range.x.clamp(0.0, 1.0);
        self.range.y = self.range.y.clamp(0.0, 1.0);
    }

    /// Evaluate the referenced curve at both span endpoints.
    ///
    /// Read-only query for external visualization; `None` when the index does
    /// not resolve to a curve.
    pub fn endpoints(&self, curves: &CurveSet) -> Option<(CurveSample, CurveSample)> {
        let curve = curves.curve(self.index)?;
        Some((curve.sample(self.range.x), curve.sample(self.range.y)))
    }
}
