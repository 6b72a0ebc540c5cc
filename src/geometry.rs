use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{UiScopeError, UiScopeResult};

/// Screen rectangle of a node, `[left,top][right,bottom]` in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

fn bounds_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\[(-?\d+),(-?\d+)\]\[(-?\d+),(-?\d+)\]$").expect("valid bounds pattern")
    })
}

impl ElementBounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Parses a UiAutomator `bounds` attribute, e.g. `[0,96][1080,2244]`.
    pub fn parse(s: &str) -> UiScopeResult<Self> {
        let caps = bounds_pattern()
            .captures(s.trim())
            .ok_or_else(|| UiScopeError::MalformedBounds(s.to_string()))?;
        let coord = |i: usize| -> UiScopeResult<i32> {
            caps[i]
                .parse::<i32>()
                .map_err(|_| UiScopeError::MalformedBounds(s.to_string()))
        };
        Ok(Self {
            left: coord(1)?,
            top: coord(2)?,
            right: coord(3)?,
            bottom: coord(4)?,
        })
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    /// Area in square pixels; 0 for degenerate or inverted rects.
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// True when `self` has positive extent on both axes.
    pub fn is_visible(&self) -> bool {
        self.left < self.right && self.top < self.bottom
    }

    /// True iff `inner` lies entirely within `self` and the two rects are
    /// not identical. Identical bounds are excluded so a node can never be
    /// selected as its own container.
    pub fn contains(&self, inner: &ElementBounds) -> bool {
        if self == inner {
            return false;
        }
        self.left <= inner.left
            && self.top <= inner.top
            && self.right >= inner.right
            && self.bottom >= inner.bottom
    }

    /// Integer midpoint with floor rounding. Region bucketing and group
    /// keys both derive from this point, so it must stay consistent.
    pub fn center(&self) -> (i32, i32) {
        (
            (self.left + self.right).div_euclid(2),
            (self.top + self.bottom).div_euclid(2),
        )
    }
}

impl fmt::Display for ElementBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}][{},{}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Coarse vertical screen zone used for grouping and display filters.
/// Thresholds are in raw pixel coordinates of the source screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenRegion {
    Top,
    Middle,
    Bottom,
}

impl ScreenRegion {
    pub fn from_center_y(y: i32) -> Self {
        if y < 600 {
            ScreenRegion::Top
        } else if y < 1800 {
            ScreenRegion::Middle
        } else {
            ScreenRegion::Bottom
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenRegion::Top => "top",
            ScreenRegion::Middle => "middle",
            ScreenRegion::Bottom => "bottom",
        }
    }
}
