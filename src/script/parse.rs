use std::ops::RangeInclusive;

use anyhow::anyhow;
use winnow::{
    Parser as _,
    ascii::{dec_int, multispace1 as ws1},
    combinator::{
        alt, cut_err, delimited, dispatch, fail, opt, peek, preceded, repeat, separated,
        terminated,
    },
    error::{StrContext, StrContextValue},
    token::{any, one_of, take_till, take_while},
};

use super::ast;

/// 文のキーワード。集合名には使えない。
const KEYWORDS: [&str; 6] = ["let", "print", "count", "contains", "equals", "hash"];

/// 集合スクリプトをパースし、AST を返す。
pub fn parse(s: &str) -> anyhow::Result<ast::Script> {
    script.parse(s).map_err(|e| anyhow!("{e}"))
}

/// 集合リテラル (`[1-5,7]` など) 単体をパースする。前後の空白は許す。
pub fn parse_set_literal(s: &str) -> anyhow::Result<Box<[RangeInclusive<i64>]>> {
    delimited(ign, literal, ign)
        .parse(s)
        .map_err(|e| anyhow!("{e}"))
}

/// 式 1 つだけをパースする。`;` や後続の文は許さない。
pub fn parse_expr(s: &str) -> anyhow::Result<ast::Expr> {
    delimited(ign, expr, ign)
        .parse(s)
        .map_err(|e| anyhow!("{e}"))
}

type ParseResult<T> = winnow::ModalResult<T>;

fn script(input: &mut &str) -> ParseResult<ast::Script> {
    preceded(ign, repeat(0.., terminated(stmt, ign)))
        .map(|stmts: Vec<_>| ast::Script {
            stmts: stmts.into(),
        })
        .parse_next(input)
}

fn stmt(input: &mut &str) -> ParseResult<ast::Stmt> {
    let stmt = dispatch! { word;
        "let" => cut_err(let_body),
        "print" => cut_err(preceded(ign, expr)).map(ast::Stmt::Print),
        "count" => cut_err(preceded(ign, expr)).map(ast::Stmt::Count),
        "contains" => cut_err(contains_body),
        "equals" => cut_err(equals_body),
        "hash" => cut_err(preceded(ign, expr)).map(ast::Stmt::Hash),
        _ => fail,
    }
    .context(StrContext::Label("statement"))
    .parse_next(input)?;

    cut_err(preceded(ign, ';'))
        .context(StrContext::Expected(StrContextValue::CharLiteral(';')))
        .parse_next(input)?;

    Ok(stmt)
}

fn let_body(input: &mut &str) -> ParseResult<ast::Stmt> {
    let name = preceded(ign, set_name).parse_next(input)?;
    delimited(ign, '=', ign)
        .context(StrContext::Expected(StrContextValue::CharLiteral('=')))
        .parse_next(input)?;
    let expr = expr.parse_next(input)?;

    Ok(ast::Stmt::Let { name, expr })
}

fn contains_body(input: &mut &str) -> ParseResult<ast::Stmt> {
    let expr = preceded(ign, expr).parse_next(input)?;
    list_sep.parse_next(input)?;
    let x = int.parse_next(input)?;

    Ok(ast::Stmt::Contains(expr, x))
}

fn equals_body(input: &mut &str) -> ParseResult<ast::Stmt> {
    let lhs = preceded(ign, expr).parse_next(input)?;
    list_sep.parse_next(input)?;
    let rhs = expr.parse_next(input)?;

    Ok(ast::Stmt::Equals(lhs, rhs))
}

/// `|` で区切られた項の並び。
fn expr(input: &mut &str) -> ParseResult<ast::Expr> {
    let first = term.parse_next(input)?;
    let rest: Vec<_> =
        repeat(0.., preceded(delimited(ign, '|', ign), cut_err(term))).parse_next(input)?;

    Ok(chain(first, rest, ast::Expr::Union))
}

/// `&` で区切られた原子式の並び。
fn term(input: &mut &str) -> ParseResult<ast::Expr> {
    let first = atom.parse_next(input)?;
    let rest: Vec<_> =
        repeat(0.., preceded(delimited(ign, '&', ign), cut_err(atom))).parse_next(input)?;

    Ok(chain(first, rest, ast::Expr::Intersection))
}

/// 演算子の連鎖を 1 ノードにまとめる。項が 1 つならそのまま返す。
fn chain(
    first: ast::Expr,
    rest: Vec<ast::Expr>,
    node: fn(Box<[ast::Expr]>) -> ast::Expr,
) -> ast::Expr {
    if rest.is_empty() {
        return first;
    }

    let mut operands = Vec::with_capacity(rest.len() + 1);
    operands.push(first);
    operands.extend(rest);

    node(operands.into())
}

fn atom(input: &mut &str) -> ParseResult<ast::Expr> {
    dispatch! { peek(any);
        '[' => literal.map(ast::Expr::Literal),
        '(' => delimited(('(', ign), cut_err(expr), cut_err((ign, ')'))),
        _ => set_name.map(ast::Expr::Var),
    }
    .context(StrContext::Label("set expression"))
    .parse_next(input)
}

fn literal(input: &mut &str) -> ParseResult<Box<[RangeInclusive<i64>]>> {
    delimited(
        ('[', ign),
        separated(0.., piece, delimited(ign, ',', ign)),
        cut_err((ign, ']')).context(StrContext::Expected(StrContextValue::CharLiteral(']'))),
    )
    .map(|pieces: Vec<_>| pieces.into())
    .parse_next(input)
}

/// `N` または `N-M`。負数も書ける (`-3--1`)。
fn piece(input: &mut &str) -> ParseResult<RangeInclusive<i64>> {
    let start = int.parse_next(input)?;
    let end = opt(preceded(delimited(ign, '-', ign), cut_err(int))).parse_next(input)?;

    Ok(start..=end.unwrap_or(start))
}

fn int(input: &mut &str) -> ParseResult<i64> {
    dec_int
        .context(StrContext::Expected(StrContextValue::Description("integer")))
        .parse_next(input)
}

fn list_sep(input: &mut &str) -> ParseResult<()> {
    delimited(ign, ',', ign)
        .void()
        .context(StrContext::Expected(StrContextValue::CharLiteral(',')))
        .parse_next(input)
}

fn set_name(input: &mut &str) -> ParseResult<String> {
    word.verify(|s: &str| !KEYWORDS.contains(&s))
        .map(str::to_owned)
        .parse_next(input)
}

fn word<'i>(input: &mut &'i str) -> ParseResult<&'i str> {
    (
        one_of(|ch: char| ch.is_ascii_alphabetic() || ch == '_'),
        take_while(0.., |ch: char| ch.is_ascii_alphanumeric() || ch == '_'),
    )
        .take()
        .parse_next(input)
}

/// コメントと空白文字を読み飛ばす。
fn ign(input: &mut &str) -> ParseResult<()> {
    repeat(0.., alt((comment, ws1.void())))
        .map(|()| ())
        .parse_next(input)
}

fn comment(input: &mut &str) -> ParseResult<()> {
    ('#', take_till(0.., ['\n', '\r'])).void().parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::ast::{Expr, Stmt};

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_owned())
    }

    #[test]
    fn set_literal() {
        assert_eq!(&*parse_set_literal("[]").unwrap(), &[] as &[RangeInclusive<i64>]);
        assert_eq!(&*parse_set_literal("[5,7-9]").unwrap(), &[5..=5, 7..=9]);
        assert_eq!(
            &*parse_set_literal(" [ -3--1 , 4 - 6 ] ").unwrap(),
            &[-3..=-1, 4..=6]
        );
        // 始点 > 終点 の検査はパーサの仕事ではない。
        assert_eq!(&*parse_set_literal("[9-2]").unwrap(), &[9..=2]);

        assert!(parse_set_literal("[1,]").is_err());
        assert!(parse_set_literal("[1-]").is_err());
        assert!(parse_set_literal("[1").is_err());
        assert!(parse_set_literal("[99999999999999999999]").is_err());
        assert!(parse_set_literal("[1] x").is_err());
    }

    #[test]
    fn precedence() {
        let script = parse("print A | B & C;").unwrap();
        assert_eq!(
            &*script.stmts,
            &[Stmt::Print(Expr::Union(
                [var("A"), Expr::Intersection([var("B"), var("C")].into())].into()
            ))]
        );

        let script = parse("print (A | B) & C;").unwrap();
        assert_eq!(
            &*script.stmts,
            &[Stmt::Print(Expr::Intersection(
                [Expr::Union([var("A"), var("B")].into()), var("C")].into()
            ))]
        );
    }

    #[test]
    fn chains_are_flat() {
        let script = parse("print A | B | C & D & E | F;").unwrap();
        assert_eq!(
            &*script.stmts,
            &[Stmt::Print(Expr::Union(
                [
                    var("A"),
                    var("B"),
                    Expr::Intersection([var("C"), var("D"), var("E")].into()),
                    var("F"),
                ]
                .into()
            ))]
        );

        // 長い連鎖でも入れ子は深くならない。
        let src = (0..100_000)
            .map(|i| format!("[{}]", i % 10))
            .collect::<Vec<_>>()
            .join(" | ");
        let Expr::Union(operands) = parse_expr(&src).unwrap() else {
            panic!("not a union chain");
        };
        assert_eq!(operands.len(), 100_000);
    }

    #[test]
    fn single_expression() {
        assert_eq!(parse_expr(" A & [1-3] # note").unwrap().to_string(), "A & [1-3]");

        assert!(parse_expr("[1];").is_err());
        assert!(parse_expr("[1]; print [2]").is_err());
        assert!(parse_expr("").is_err());
    }

    #[test]
    fn all_statements() {
        let src = "
            # comment
            let A = [5-15];
            let B=[7-26];#trailing
            print A | B;
            count A & B;
            contains A, -3;
            equals A, [5-15];
            hash A;
        ";
        let script = parse(src).unwrap();

        assert_eq!(script.stmts.len(), 7);
        assert_eq!(
            script.stmts[0],
            Stmt::Let {
                name: "A".to_owned(),
                expr: Expr::Literal([5..=15].into())
            }
        );
        assert_eq!(script.stmts[4], Stmt::Contains(Expr::Var("A".to_owned()), -3));
        assert!(matches!(script.stmts[6], Stmt::Hash(Expr::Var(_))));
    }

    #[test]
    fn empty_script() {
        assert!(parse("").unwrap().stmts.is_empty());
        assert!(parse("  # nothing\n").unwrap().stmts.is_empty());
    }

    #[test]
    fn syntax_errors() {
        assert!(parse("print A").is_err());
        assert!(parse("let print = [1];").is_err());
        assert!(parse("A = [1];").is_err());
        assert!(parse("print A |;").is_err());
        assert!(parse("contains A 3;").is_err());
        assert!(parse("print (A;").is_err());
    }

    #[test]
    fn labels_keep_grouping() {
        for src in ["A | B & C", "(A | B) & C", "A & (B & C)", "A | (B | C)", "[1-3,5] & B"] {
            let script = parse(&format!("print {src};")).unwrap();
            assert_eq!(script.stmts[0].label(), src);
        }
    }
}
