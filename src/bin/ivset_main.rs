use anyhow::Context as _;
use clap::{ArgGroup, Parser, builder::NonEmptyStringValueParser};

use ivset::script::SetScript;

#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("input").required(true).args(["path_script", "expr"])))]
struct Cli {
    /// 集合スクリプトファイル名。
    #[arg(
        short = 'f',
        long = "file",
        value_parser = NonEmptyStringValueParser::new()
    )]
    path_script: Option<String>,

    /// 評価して出力する式 1 つ (`print EXPR;` と同じ)。
    #[arg(
        short = 'e',
        long = "expr",
        value_parser = NonEmptyStringValueParser::new()
    )]
    expr: Option<String>,

    /// 各行の先頭に "LABEL = " を付ける。
    #[arg(short = 'l', long = "labels")]
    labels: bool,

    /// ログレベル ("error", "warn", "info", "debug", "trace")。
    #[arg(long = "log-level", default_value = "warn")]
    log_level: tracing::Level,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // -f と -e はどちらか一方のみ指定される (ArgGroup で保証)。
    let script = if let Some(path) = &cli.path_script {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read set script '{path}'"))?;
        SetScript::load(&src)?
    } else {
        SetScript::load_expr(cli.expr.as_deref().unwrap_or_default())?
    };
    tracing::info!(
        bindings = script.binding_count(),
        reports = script.report_count(),
        "evaluated"
    );

    for report in script.iter_reports() {
        if cli.labels {
            println!("{} = {}", report.label(), report.value());
        } else {
            println!("{}", report.value());
        }
    }

    Ok(())
}
