// ==========================================
// 货舱 ULD 配载系统 - 命令行入口
// ==========================================
// 子命令: profiles / check / export
// 输出: 报文与结果写 stdout, 日志写 stderr
// ==========================================

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use uld_deck_planner::app::AppState;
use uld_deck_planner::engine::{DuplicateIdentity, ReadinessIssue};
use uld_deck_planner::i18n::{self, t, t_with_args};
use uld_deck_planner::importer::ImportReport;
use uld_deck_planner::{Advisory, ApiError};

/// 货舱 ULD 配载: 舱位互斥校验与 CPM 报文生成
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 站点配置文件（缺省读取环境变量或用户配置目录）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 界面语言 (zh-CN / en), 覆盖配置文件
    #[arg(long, global = true)]
    locale: Option<String>,

    /// 日志以 JSON 行输出
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 列出可用机型档案
    Profiles,
    /// 导入装载清单并检查互斥、重复与导出条件
    Check(SessionArgs),
    /// 导入装载清单并输出 CPM 报文
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// 飞机注册号
    #[arg(short, long)]
    aircraft: String,

    /// CSV 装载清单 (type,uld_id,bulk,weight,position)
    #[arg(short, long)]
    loads: PathBuf,

    /// 以 JSON 输出
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// 航班号（空则使用站点默认值）
    #[arg(short, long, default_value = "")]
    flight: String,

    /// 目的站三字码（空则使用站点默认值）
    #[arg(short, long, default_value = "")]
    dest: String,

    /// 当月日期 (1-31), 缺省为今天
    #[arg(long)]
    day: Option<u32>,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    registration: &'a str,
    import: &'a ImportReport,
    blocked_positions: Vec<String>,
    duplicates: Vec<DuplicateIdentity>,
    readiness_issues: Vec<ReadinessIssue>,
    ready: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    uld_deck_planner::logging::init(cli.log_json);

    let mut state = AppState::from_config_path(cli.config.as_deref())
        .context("应用状态初始化失败")?;

    let locale = cli
        .locale
        .clone()
        .unwrap_or_else(|| state.config.config().locale.clone());
    if !i18n::set_locale(&locale) {
        bail!("不支持的语言: {}", locale);
    }

    info!(
        version = uld_deck_planner::VERSION,
        locale = %locale,
        "{}",
        uld_deck_planner::APP_NAME
    );

    match cli.command {
        Command::Profiles => print_profiles(&state),
        Command::Check(args) => run_check(&mut state, &args),
        Command::Export(args) => run_export(&mut state, &args),
    }
}

fn print_profiles(state: &AppState) -> Result<()> {
    println!("{}", t("profiles.header"));
    for profile in state.catalog.profiles() {
        println!(
            "  {}",
            t_with_args(
                "profiles.entry",
                &[
                    ("registration", profile.registration()),
                    ("aircraft_type", profile.aircraft_type()),
                    ("containers", &profile.container_positions().len().to_string()),
                    ("pallets", &profile.pallet_positions().len().to_string()),
                ],
            )
        );
    }
    Ok(())
}

/// 选择档案并导入清单
fn open_session(state: &mut AppState, args: &SessionArgs) -> Result<ImportReport> {
    state.select_profile(&args.aircraft)?;

    if !args.loads.exists() {
        bail!(t_with_args(
            "import.file_not_found",
            &[("path", &args.loads.display().to_string())]
        ));
    }

    state
        .import_load_sheet(&args.loads)
        .with_context(|| format!("装载清单导入失败: {}", args.loads.display()))
}

fn run_check(state: &mut AppState, args: &SessionArgs) -> Result<()> {
    let report = open_session(state, args)?;
    let session = &state.session;

    let check = CheckReport {
        registration: session
            .profile()
            .map(|p| p.registration())
            .unwrap_or_default(),
        import: &report,
        blocked_positions: session.blocked_positions()?.into_iter().collect(),
        duplicates: session.duplicate_identities(),
        readiness_issues: session.readiness_issues(),
        ready: session.is_export_ready(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&check)?);
        return Ok(());
    }

    print_import_report(&report);

    let blocked = if check.blocked_positions.is_empty() {
        t("common.none")
    } else {
        check.blocked_positions.join(" ")
    };
    println!("{}", t_with_args("check.blocked", &[("positions", &blocked)]));

    for duplicate in &check.duplicates {
        let ids: Vec<String> = duplicate.load_ids.iter().map(|id| id.to_string()).collect();
        println!(
            "{}",
            t_with_args(
                "check.duplicate",
                &[
                    ("uld_type", duplicate.uld_type.code()),
                    ("uld_id", &duplicate.uld_id),
                    ("load_ids", &ids.join(", ")),
                ],
            )
        );
    }

    if check.ready {
        println!("{}", t("check.ready"));
    } else {
        print_readiness_issues(&check.readiness_issues);
    }
    Ok(())
}

fn run_export(state: &mut AppState, args: &ExportArgs) -> Result<()> {
    let report = open_session(state, &args.session)?;
    if !args.session.json {
        print_import_report(&report);
    }

    let day = args.day.unwrap_or_else(|| chrono::Local::now().day());
    let manifest = match state.session.build_manifest(&args.flight, &args.dest, day) {
        Ok(manifest) => manifest,
        Err(ApiError::NotReady { issues }) => {
            print_readiness_issues(&issues);
            bail!(t("error.NOT_READY"));
        }
        Err(err) => {
            let code = err.code();
            return Err(anyhow::Error::new(err).context(t(&format!("error.{}", code))));
        }
    };

    if args.session.json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    } else {
        println!("{}", manifest.to_text());
    }
    Ok(())
}

fn print_import_report(report: &ImportReport) {
    eprintln!(
        "{}",
        t_with_args(
            "import.summary",
            &[
                ("rows", &report.rows_read.to_string()),
                ("imported", &report.imported_count().to_string()),
                ("rejected", &report.rejections.len().to_string()),
            ],
        )
    );

    for rejection in &report.rejections {
        eprintln!(
            "  {}",
            t_with_args(
                "import.rejection",
                &[
                    ("line", &rejection.line.to_string()),
                    ("code", &rejection.code),
                    ("message", &rejection.message),
                ],
            )
        );
    }

    for row in &report.advisories {
        if let Advisory::LockedFieldIgnored { field } = &row.advisory {
            eprintln!(
                "  {}",
                t_with_args(
                    "advisory.LOCKED_FIELD_IGNORED",
                    &[("line", &row.line.to_string()), ("field", &field.to_string())],
                )
            );
        }
    }
}

fn print_readiness_issues(issues: &[ReadinessIssue]) {
    println!(
        "{}",
        t_with_args("check.not_ready", &[("count", &issues.len().to_string())])
    );
    for issue in issues {
        println!(
            "  {}",
            t_with_args(
                &format!("readiness.{}", issue.reason.code()),
                &[("load_id", &issue.load_id.to_string())],
            )
        );
    }
}
