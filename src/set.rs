//! 整数閉区間の和集合。

use std::ops::{BitAnd, BitOr, RangeInclusive};
use std::str::FromStr;

use anyhow::Context as _;

use crate::index::PieceIdx;
use crate::range::{Interval, InvalidRangeError};

/// 互いに素かつ隣接しない整数閉区間の和として表した整数集合。
///
/// 区間列 (ピース列) は常に正規形に保たれる:
///
/// * 始点について狭義単調増加。
/// * 隣り合うピースは重ならず、隣接もしない (`pieces[i].end < pieces[i + 1].start - 1`)。
///
/// 正規形は集合ごとに一意なので、等価性とハッシュはピース列の構造だけで決まる。
/// 一度構築した集合は変更されず、集合演算は常に新しい集合を返す。
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct IntervalSet {
    pieces: Box<[Interval]>,
}

impl IntervalSet {
    /// 閉区間 `[start, end]` 1 つからなる集合を作る。
    pub fn new(start: i64, end: i64) -> Result<Self, InvalidRangeError> {
        let piece = Interval::new(start, end)?;

        Ok(Self {
            pieces: Box::new([piece]),
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// 任意の順序の (重なりや隣接を含みうる) 区間列から集合を作る。
    pub fn try_from_ranges<I>(ranges: I) -> Result<Self, InvalidRangeError>
    where
        I: IntoIterator<Item = RangeInclusive<i64>>,
    {
        let mut ivs = ranges
            .into_iter()
            .map(Interval::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        ivs.sort_unstable_by_key(|iv| iv.start());

        let mut builder = PieceBuilder::with_capacity(ivs.len());
        for iv in ivs {
            builder.place(iv);
        }

        Ok(builder.finish())
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// 正規形におけるピース数 (要素数ではない)。
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// 集合に含まれる整数の総数。
    pub fn element_count(&self) -> u128 {
        self.pieces.iter().map(|piece| piece.len()).sum()
    }

    pub fn iter_pieces(
        &self,
    ) -> impl ExactSizeIterator<Item = RangeInclusive<i64>> + std::iter::FusedIterator + Clone + '_
    {
        self.pieces.iter().map(|piece| piece.to_range())
    }

    pub fn enumerate_pieces(
        &self,
    ) -> impl ExactSizeIterator<Item = (PieceIdx, RangeInclusive<i64>)>
    + std::iter::FusedIterator
    + Clone
    + '_ {
        self.iter_pieces()
            .enumerate()
            .map(|(i, x)| (PieceIdx::new(i), x))
    }

    pub fn piece(&self, piece_i: PieceIdx) -> RangeInclusive<i64> {
        self.pieces
            .get(piece_i.get())
            .unwrap_or_else(|| panic!("piece index out of range: {piece_i}"))
            .to_range()
    }

    pub fn contains(&self, x: i64) -> bool {
        // ピース列は始点・終点ともに昇順なので二分探索できる。
        let i = self.pieces.partition_point(|piece| piece.end() < x);

        self.pieces.get(i).is_some_and(|piece| piece.contains(x))
    }

    /// 和集合。
    ///
    /// 両者のピース列を始点順にマージしつつ、直前に置いたピースとまとめられるならまとめる。
    /// 入力がともに正規形なので、新たに置くピースが直前より前のピースとまとめられることはない。
    pub fn union(&self, other: &Self) -> Self {
        let (lhs, rhs) = (&*self.pieces, &*other.pieces);
        let mut builder = PieceBuilder::with_capacity(lhs.len() + rhs.len());

        let (mut i, mut j) = (0, 0);
        loop {
            let cand = match (lhs.get(i), rhs.get(j)) {
                // 始点が同じなら左辺を先に置く。
                (Some(&l), Some(&r)) if l.start() <= r.start() => {
                    i += 1;
                    l
                }
                (_, Some(&r)) => {
                    j += 1;
                    r
                }
                (Some(&l), None) => {
                    i += 1;
                    l
                }
                (None, None) => break,
            };
            builder.place(cand);
        }

        let res = builder.finish();
        tracing::trace!(
            lhs = lhs.len(),
            rhs = rhs.len(),
            out = res.piece_count(),
            "union"
        );

        res
    }

    /// 共通部分。
    ///
    /// 2 ポインタで走査し、終点が小さい方を進める。
    /// 得られる区間は始点昇順かつ互いに素・非隣接なので、まとめ直しは不要。
    pub fn intersection(&self, other: &Self) -> Self {
        let (lhs, rhs) = (&*self.pieces, &*other.pieces);
        let mut builder = PieceBuilder::with_capacity(lhs.len().min(rhs.len()));

        let (mut i, mut j) = (0, 0);
        while let (Some(&l), Some(&r)) = (lhs.get(i), rhs.get(j)) {
            if let Some(piece) = l.intersection(r) {
                builder.push(piece);
            }
            if l.end() < r.end() {
                i += 1;
            } else {
                j += 1;
            }
        }

        let res = builder.finish();
        tracing::trace!(
            lhs = lhs.len(),
            rhs = rhs.len(),
            out = res.piece_count(),
            "intersection"
        );

        res
    }

    /// プロセスやツールチェインのバージョンによらず決定的なハッシュ値。
    ///
    /// `(start, end)` を平坦化した列に対する多項式ハッシュ (`h = 31 * h + x`, 初期値 1)。
    pub fn stable_hash(&self) -> u64 {
        self.pieces
            .iter()
            .flat_map(|piece| [piece.start(), piece.end()])
            .fold(1_u64, |h, x| h.wrapping_mul(31).wrapping_add(x as u64))
    }
}

impl TryFrom<RangeInclusive<i64>> for IntervalSet {
    type Error = InvalidRangeError;

    fn try_from(range: RangeInclusive<i64>) -> Result<Self, Self::Error> {
        Self::new(*range.start(), *range.end())
    }
}

impl BitOr for &IntervalSet {
    type Output = IntervalSet;

    fn bitor(self, rhs: Self) -> IntervalSet {
        self.union(rhs)
    }
}

impl BitAnd for &IntervalSet {
    type Output = IntervalSet;

    fn bitand(self, rhs: Self) -> IntervalSet {
        self.intersection(rhs)
    }
}

/// `[5,7-9]` の形式で出力する。空集合は `[]`。
impl std::fmt::Display for IntervalSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{piece}")?;
        }
        f.write_str("]")
    }
}

/// `Display` の出力形式を読む。ピースの順序や重なりは問わない。
impl FromStr for IntervalSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let ranges = crate::script::parse_set_literal(s).context("set literal parse error")?;

        Self::try_from_ranges(ranges).context("invalid set literal")
    }
}

/// 正規形のピース列を末尾への追加だけで組み立てる。
///
/// 置いたピースのうち書き換えうるのは最後の 1 つのみ。
#[derive(Debug)]
struct PieceBuilder {
    pieces: Vec<Interval>,
}

impl PieceBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            pieces: Vec::with_capacity(capacity),
        }
    }

    /// 始点昇順に渡されるピースを置く。直前のピースとまとめられるなら両者を覆う区間に置き換える。
    fn place(&mut self, cand: Interval) {
        if let Some(last) = self.pieces.last_mut() {
            if last.is_mergeable(cand) {
                *last = last.hull(cand);
                return;
            }
        }
        self.pieces.push(cand);
    }

    /// 直前のピースとまとめる必要がないと分かっているピースを置く。
    fn push(&mut self, piece: Interval) {
        debug_assert!(
            self.pieces
                .last()
                .is_none_or(|&last| last.start() < piece.start() && !last.is_mergeable(piece)),
            "piece {piece} breaks canonical order"
        );
        self.pieces.push(piece);
    }

    fn finish(self) -> IntervalSet {
        IntervalSet {
            pieces: self.pieces.into(),
        }
    }
}
