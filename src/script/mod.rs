//! 集合スクリプト関連。
//!
//! ```text
//! let A = [5-15];
//! let B = [7-26];
//! print A | B;        # [5-26]
//! count A & B;        # 1
//! contains A, 3;      # false
//! equals A & B, [7-15];
//! hash A;
//! ```

use anyhow::Context as _;
use indexmap::IndexMap;

use crate::index::StmtIdx;
use crate::set::IntervalSet;

mod ast;
mod eval;
mod parse;

pub(crate) use self::parse::parse_set_literal;

/// 評価済みの集合スクリプト。
#[derive(Debug)]
pub struct SetScript {
    // 定義順を保つ。
    bindings: IndexMap<String, IntervalSet>,
    reports: Box<[Report]>,
}

impl SetScript {
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter_bindings(
        &self,
    ) -> impl ExactSizeIterator<Item = (&str, &IntervalSet)> + std::iter::FusedIterator + Clone
    {
        self.bindings.iter().map(|(name, set)| (name.as_str(), set))
    }

    pub fn binding(&self, name: &str) -> Option<&IntervalSet> {
        self.bindings.get(name)
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }

    pub fn iter_reports(
        &self,
    ) -> impl ExactSizeIterator<Item = &Report> + std::iter::FusedIterator + Clone {
        self.reports.iter()
    }

    pub fn load(script: &str) -> anyhow::Result<Self> {
        let script = self::parse::parse(script).context("set script parse error")?;
        let script = self::eval::eval(&script).context("set script eval error")?;

        Ok(script)
    }

    /// 式 1 つを評価する。`print EXPR;` だけのスクリプトと同じ結果になる。
    ///
    /// 式の後ろに `;` や別の文を続けることはできない。
    pub fn load_expr(expr: &str) -> anyhow::Result<Self> {
        let expr = self::parse::parse_expr(expr).context("set expression parse error")?;
        let script = ast::Script {
            stmts: [ast::Stmt::Print(expr)].into(),
        };
        let script = self::eval::eval(&script).context("set expression eval error")?;

        Ok(script)
    }
}

/// `let` 以外の文 1 つぶんの評価結果。
#[derive(Clone, Debug, Eq, PartialEq, derive_builder::Builder)]
pub struct Report {
    stmt_i: StmtIdx,
    #[builder(setter(into))]
    label: String,
    value: ReportValue,
}

impl Report {
    pub fn stmt_idx(&self) -> StmtIdx {
        self.stmt_i
    }

    /// 文中の式を正規化したもの。
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &ReportValue {
        &self.value
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReportValue {
    /// `print`
    Set(IntervalSet),
    /// `count`
    Count(usize),
    /// `contains`, `equals`
    Bool(bool),
    /// `hash`
    Hash(u64),
}

impl std::fmt::Display for ReportValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set(set) => set.fmt(f),
            Self::Count(n) => n.fmt(f),
            Self::Bool(b) => b.fmt(f),
            Self::Hash(h) => h.fmt(f),
        }
    }
}
