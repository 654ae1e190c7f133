use std::ops::RangeInclusive;

/// 始点が終点より大きい区間を作ろうとした。
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid range: start {start} is greater than end {end}")]
pub struct InvalidRangeError {
    pub start: i64,
    pub end: i64,
}

/// 空でない整数閉区間 `[start, end]`。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Interval {
    start: i64,
    end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Result<Self, InvalidRangeError> {
        if start <= end {
            Ok(Self { start, end })
        } else {
            Err(InvalidRangeError { start, end })
        }
    }

    pub fn start(self) -> i64 {
        self.start
    }

    pub fn end(self) -> i64 {
        self.end
    }

    /// 含まれる整数の個数。`i64` 全域でも溢れないよう `u128` で返す。
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> u128 {
        (i128::from(self.end) - i128::from(self.start) + 1) as u128
    }

    pub fn intersects(self, other: Self) -> bool {
        !(self.end < other.start || other.end < self.start)
    }

    /// 隙間なく隣接しているか (共通部分はない)。
    pub fn is_adjacent(self, other: Self) -> bool {
        // i64::MAX で終わる区間に右隣は存在しない (逆も同様)。
        self.end.checked_add(1) == Some(other.start) || other.end.checked_add(1) == Some(self.start)
    }

    /// 1 つの区間にまとめられるか。
    pub fn is_mergeable(self, other: Self) -> bool {
        self.intersects(other) || self.is_adjacent(other)
    }

    pub fn intersection(self, other: Self) -> Option<Self> {
        self.intersects(other).then(|| Self {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// 両者を覆う最小の区間。`is_mergeable` な場合に限り和集合と一致する。
    pub fn hull(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn contains(self, x: i64) -> bool {
        self.start <= x && x <= self.end
    }

    pub fn to_range(self) -> RangeInclusive<i64> {
        self.start..=self.end
    }
}

impl TryFrom<RangeInclusive<i64>> for Interval {
    type Error = InvalidRangeError;

    fn try_from(range: RangeInclusive<i64>) -> Result<Self, Self::Error> {
        Self::new(*range.start(), *range.end())
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
