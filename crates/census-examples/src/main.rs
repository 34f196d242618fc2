use facet::Facet;
use figue as args;
use census::{ReportMode, ReportSink, ShutdownReport};
use tracing::info;

mod scenarios;

type AnyResult<T> = Result<T, String>;

#[derive(Facet, Debug)]
struct Cli {
    #[facet(flatten)]
    builtins: args::FigueBuiltins,
    /// Report to print at exit: off, leaks, stats, or all. Overrides CENSUS_REPORT.
    #[facet(args::named, default)]
    report: Option<String>,
    /// Send the report through tracing instead of stderr.
    #[facet(args::named, default)]
    log: bool,
    #[facet(args::subcommand)]
    command: CommandKind,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum CommandKind {
    /// Every tracked value is dropped before exit.
    Balanced,
    /// Leaks through a reference cycle and `Box::leak`.
    Leaky,
    /// Tracked values created and dropped across tokio tasks.
    Tasks {
        #[facet(args::named, default)]
        tasks: Option<u32>,
    },
}

const DEFAULT_TASKS: u32 = 64;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

async fn run() -> AnyResult<i32> {
    let cli = parse_cli()?;
    let report = shutdown_report(&cli)?;

    dispatch_command(cli.command).await?;

    let code = report.finish();
    info!(code, "scenario finished");
    Ok(code)
}

fn parse_cli() -> AnyResult<Cli> {
    let figue_config = args::builder::<Cli>()
        .map_err(|e| format!("failed to build CLI schema: {e}"))?
        .cli(|cli| cli.strict())
        .help(|h| {
            h.program_name("census-examples")
                .description("Run census leak-tracking scenarios as subcommands")
                .version(option_env!("CARGO_PKG_VERSION").unwrap_or("dev"))
        })
        .build();

    args::Driver::new(figue_config)
        .run()
        .into_result()
        .map(|v| v.value)
        .map_err(|e| e.to_string())
}

fn shutdown_report(cli: &Cli) -> AnyResult<ShutdownReport> {
    let report = match cli.report.as_deref() {
        Some(value) => {
            let mode: ReportMode = value.parse().map_err(|e| format!("--report: {e}"))?;
            ShutdownReport::new(mode)
        }
        None => ShutdownReport::from_env(),
    };
    let sink = if cli.log {
        ReportSink::Tracing
    } else {
        ReportSink::Stderr
    };
    Ok(report.with_sink(sink))
}

async fn dispatch_command(command: CommandKind) -> AnyResult<()> {
    match command {
        CommandKind::Balanced => scenarios::balanced::run().await,
        CommandKind::Leaky => scenarios::leaky::run().await,
        CommandKind::Tasks { tasks } => {
            scenarios::tasks::run(tasks.unwrap_or(DEFAULT_TASKS)).await
        }
    }
}
