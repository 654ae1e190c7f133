use anyhow::{Context as _, anyhow, ensure};
use indexmap::IndexMap;

use crate::index::StmtIdx;
use crate::set::IntervalSet;

use super::{Report, ReportBuilder, ReportValue, SetScript, ast};

/// 集合スクリプトの AST を評価し、結果を返す。
pub fn eval(script: &ast::Script) -> anyhow::Result<SetScript> {
    let mut ctx = EvalContext::default();

    for (i, stmt) in script.stmts.iter().enumerate() {
        let stmt_i = StmtIdx::new(i);
        eval_stmt(&mut ctx, stmt_i, stmt)
            .with_context(|| format!("statement {stmt_i} ('{}') eval error", stmt.label()))?;
    }

    Ok(ctx.into_script())
}

#[derive(Debug, Default)]
struct EvalContext {
    bindings: IndexMap<String, IntervalSet>,
    reports: Vec<Report>,
}

impl EvalContext {
    fn into_script(self) -> SetScript {
        SetScript {
            bindings: self.bindings,
            reports: self.reports.into(),
        }
    }
}

fn eval_stmt(ctx: &mut EvalContext, stmt_i: StmtIdx, stmt: &ast::Stmt) -> anyhow::Result<()> {
    let value = match stmt {
        ast::Stmt::Let { name, expr } => {
            // 再定義は許さない。
            ensure!(
                !ctx.bindings.contains_key(name),
                "duplicate set definition: '{name}'"
            );
            let set = eval_expr(ctx, expr)?;
            tracing::debug!(%stmt_i, name = %name, %set, "let");
            ctx.bindings.insert(name.clone(), set);
            return Ok(());
        }
        ast::Stmt::Print(expr) => ReportValue::Set(eval_expr(ctx, expr)?),
        ast::Stmt::Count(expr) => ReportValue::Count(eval_expr(ctx, expr)?.piece_count()),
        ast::Stmt::Contains(expr, x) => ReportValue::Bool(eval_expr(ctx, expr)?.contains(*x)),
        ast::Stmt::Equals(lhs, rhs) => {
            ReportValue::Bool(eval_expr(ctx, lhs)? == eval_expr(ctx, rhs)?)
        }
        ast::Stmt::Hash(expr) => ReportValue::Hash(eval_expr(ctx, expr)?.stable_hash()),
    };
    tracing::debug!(%stmt_i, %value, "report");

    let mut builder = ReportBuilder::default();
    builder.stmt_i(stmt_i);
    builder.label(stmt.label());
    builder.value(value);
    ctx.reports.push(builder.build().context("failed to build report")?);

    Ok(())
}

fn eval_expr(ctx: &EvalContext, expr: &ast::Expr) -> anyhow::Result<IntervalSet> {
    match expr {
        ast::Expr::Literal(ranges) => IntervalSet::try_from_ranges(ranges.iter().cloned())
            .with_context(|| format!("invalid set literal: {expr}")),
        ast::Expr::Var(name) => ctx
            .bindings
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("unknown set: '{name}'")),
        // 連鎖は左から順に畳み込む。再帰するのは括弧で入れ子になった項のみ。
        ast::Expr::Union(operands) => {
            let mut acc = IntervalSet::empty();
            for operand in operands {
                acc = acc.union(&eval_expr(ctx, operand)?);
            }
            Ok(acc)
        }
        ast::Expr::Intersection(operands) => {
            let (first, rest) = operands
                .split_first()
                .ok_or_else(|| anyhow!("empty intersection"))?;
            let mut acc = eval_expr(ctx, first)?;
            for operand in rest {
                acc = acc.intersection(&eval_expr(ctx, operand)?);
            }
            Ok(acc)
        }
    }
}
