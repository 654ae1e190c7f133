//! 集合スクリプトの AST。

use std::ops::RangeInclusive;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Script {
    pub stmts: Box<[Stmt]>,
}

/// `;` で終わる文。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Stmt {
    /// `let NAME = EXPR;`
    Let { name: String, expr: Expr },
    /// `print EXPR;`
    Print(Expr),
    /// `count EXPR;`
    Count(Expr),
    /// `contains EXPR, INT;`
    Contains(Expr, i64),
    /// `equals EXPR, EXPR;`
    Equals(Expr, Expr),
    /// `hash EXPR;`
    Hash(Expr),
}

impl Stmt {
    /// 出力に付けるラベル。式を正規化したソーステキスト。
    pub fn label(&self) -> String {
        match self {
            Self::Let { name, .. } => name.clone(),
            Self::Print(expr) | Self::Count(expr) | Self::Hash(expr) => expr.to_string(),
            Self::Contains(expr, x) => format!("{expr} contains {x}"),
            Self::Equals(lhs, rhs) => format!("{lhs} == {rhs}"),
        }
    }
}

/// 集合を表す式。`&` は `|` より強く結合する。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expr {
    /// `[1-5,7]`
    ///
    /// 各ピースは書かれた順のまま。始点 > 終点 のものも評価時までは保持する。
    Literal(Box<[RangeInclusive<i64>]>),
    Var(String),
    /// `EXPR | EXPR | ...`
    ///
    /// 演算子の連鎖は 1 ノードにまとめる (2 項以上)。入れ子になるのは括弧を書いた場合のみ。
    Union(Box<[Expr]>),
    /// `EXPR & EXPR & ...`
    Intersection(Box<[Expr]>),
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(ranges) => {
                f.write_str("[")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if range.start() == range.end() {
                        write!(f, "{}", range.start())?;
                    } else {
                        write!(f, "{}-{}", range.start(), range.end())?;
                    }
                }
                f.write_str("]")
            }
            Self::Var(name) => f.write_str(name),
            // 同じ演算の子は括弧で書かれたもの。
            Self::Union(operands) => fmt_chain(f, operands, " | ", |e| {
                matches!(e, Self::Union(..))
            }),
            Self::Intersection(operands) => fmt_chain(f, operands, " & ", |e| {
                matches!(e, Self::Union(..) | Self::Intersection(..))
            }),
        }
    }
}

fn fmt_chain(
    f: &mut std::fmt::Formatter<'_>,
    operands: &[Expr],
    op: &str,
    needs_paren: impl Fn(&Expr) -> bool,
) -> std::fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(op)?;
        }
        if needs_paren(operand) {
            write!(f, "({operand})")?;
        } else {
            write!(f, "{operand}")?;
        }
    }

    Ok(())
}
