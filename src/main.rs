use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use mesh_analyzer::archive::create_archive;
use mesh_analyzer::config::LOCAL_CONFIG;
use mesh_analyzer::history::{ConnectionTracker, HistoryStore};
use mesh_analyzer::logs::{self, Session};
use mesh_analyzer::platform::{get_wireless_tools, WirelessTools};
use mesh_analyzer::power::{monitor_power_events, write_fix_script, PowerDetective, PowerReport};
use mesh_analyzer::report::console::{render_console, write_power_summary, write_roaming};
use mesh_analyzer::report::write_html_report;
use mesh_analyzer::roaming::{
    continuous_monitor, detect_microdropouts, interrupted, measure_roaming, LinkProbe, RoamingTest,
};
use mesh_analyzer::{Analyzer, Config, DataDir};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "mesh-analyzer")]
#[command(about = "WiFi mesh network analyzer: topology, roaming and power diagnostics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Wireless interface to analyze (detected when omitted)
    #[arg(short, long, global = true)]
    interface: Option<String>,

    /// Config file (default: ./mesh-analyzer.toml, then ~/.mesh_analyzer/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Args, Default)]
struct AnalyzeArgs {
    /// Write an HTML report to the reports directory
    #[arg(long)]
    html_report: bool,

    /// Zip this session's logs and history data
    #[arg(long)]
    create_archive: bool,

    /// Include the power management check
    #[arg(long)]
    check_power: bool,

    /// Include an interactive roaming walk test
    #[arg(long)]
    roaming_test: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the current connection and mesh (default)
    Analyze(AnalyzeArgs),
    /// Track connection events and re-analyze periodically until Ctrl+C
    Monitor {
        /// Seconds between analyses
        #[arg(long)]
        scan_interval: Option<u64>,
    },
    /// Show data directory usage
    StorageInfo,
    /// Back up and clear BSSID history and connection events
    ResetHistory,
    /// Create a zip archive of logs and history data
    Archive,
    /// Poll the link quickly looking for sub-second dropouts
    Dropouts {
        /// Seconds to monitor
        #[arg(short, long)]
        duration: Option<u64>,
    },
    /// Measure roaming while walking around (or for a fixed time)
    RoamingTest {
        /// Run for the configured duration instead of waiting for Enter
        #[arg(long)]
        timed: bool,
    },
    /// Log roaming events to the roaming log until Ctrl+C
    MonitorRoaming,
    /// Look for power management settings that affect WiFi
    CheckPower {
        /// Watch power save and link state changes afterwards
        #[arg(long)]
        monitor: bool,

        /// Don't write the fix script
        #[arg(long)]
        no_fix_script: bool,
    },
    /// Generate default config file
    Init,
}

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Analyze(AnalyzeArgs::default()));

    if let Commands::Init = command {
        let path = PathBuf::from(LOCAL_CONFIG);
        Config::default().save(&path)?;
        println!("Created default config: {}", path.display());
        return Ok(());
    }

    let home = DataDir::resolve(None)?;
    let config = Config::discover(cli.config.as_deref(), Some(&home.config_file()))?;
    let data_dir = match &config.storage.data_dir {
        Some(dir) => DataDir::resolve(Some(dir.as_path()))?,
        None => home,
    };

    let session = Session::start();
    let dir_ready = data_dir.ensure();
    let _log_guard = logs::init(Some(&data_dir.logs_dir()), &session, cli.verbose)?;
    if let Err(e) = dir_ready {
        warn!("{}", e);
    }

    match command {
        Commands::StorageInfo => return storage_info(&data_dir, &config),
        Commands::ResetHistory => return reset_history(&data_dir, &config),
        Commands::Archive => {
            let path = create_archive(&data_dir, &session)?;
            println!("Archive created: {}", path.display());
            return Ok(());
        }
        _ => {}
    }

    let tools: Arc<dyn WirelessTools> = Arc::from(get_wireless_tools()?);
    let configured = cli.interface.or_else(|| config.analyzer.interface.clone());
    let interface = Analyzer::resolve_interface(tools.as_ref(), configured.as_deref())?;
    logs::log_analysis_start(&interface, &session);
    info!("Using wireless interface {}", interface);

    let history = HistoryStore::open(data_dir.clone(), config.storage.retention_days, Utc::now());
    let mut analyzer = Analyzer::new(
        Arc::clone(&tools),
        interface.clone(),
        history,
        config.analyzer.history_window_hours,
    );

    match command {
        Commands::Analyze(args) => analyze(&mut analyzer, &config, &data_dir, &session, args).await,
        Commands::Monitor { scan_interval } => {
            let link_poll = Duration::from_secs(config.analyzer.link_poll_secs.max(1));
            let scan_every =
                Duration::from_secs(scan_interval.unwrap_or(config.analyzer.scan_interval_secs).max(1));
            println!("Monitoring {} - Ctrl+C to stop", interface);
            let recorded = analyzer
                .monitor(link_poll, scan_every, interrupted(), |snapshot| {
                    println!("{}", render_console(snapshot));
                })
                .await?;
            println!("Recorded {} connection events", recorded);
            Ok(())
        }
        Commands::Dropouts { duration } => {
            let probe = Arc::new(LinkProbe::new(tools, interface));
            let duration =
                Duration::from_secs(duration.unwrap_or(config.roaming.dropout_duration_secs));
            let report =
                detect_microdropouts(probe, config.roaming.dropout_poll_interval(), duration).await?;

            println!();
            println!("Micro-dropouts: {}", report.dropouts.len());
            for event in &report.dropouts {
                println!("  {}", event.describe());
            }
            println!("Roams: {}", report.roams.len());
            for event in &report.roams {
                println!("  {}", event.describe());
            }
            if report.dropouts.is_empty() {
                println!("No micro-dropouts detected");
            }
            Ok(())
        }
        Commands::RoamingTest { timed } => {
            let probe = Arc::new(LinkProbe::new(tools, interface));
            let test = if timed {
                RoamingTest::Timed(Duration::from_secs(config.roaming.test_duration_secs))
            } else {
                RoamingTest::Walk
            };
            let measurement = measure_roaming(probe, config.roaming.poll_interval(), test).await?;

            let mut out = String::new();
            write_roaming(&mut out, &measurement)?;
            println!();
            print!("{}", out);
            Ok(())
        }
        Commands::MonitorRoaming => {
            let probe = Arc::new(LinkProbe::new(tools, interface));
            let (summary, events) =
                continuous_monitor(probe, config.roaming.poll_interval(), &config.roaming.log_file)
                    .await?;
            println!();
            println!(
                "{} events: {} seamless roams, {} dropped, {} micro-dropouts",
                events, summary.seamless_roams, summary.dropped_roams, summary.micro_dropouts
            );
            Ok(())
        }
        Commands::CheckPower {
            monitor,
            no_fix_script,
        } => {
            let report = PowerDetective::new(Arc::clone(&tools), interface.clone()).check_all();
            print_power_report(&report)?;
            if !no_fix_script {
                fix_script(&report, &config);
            }
            if monitor {
                let duration = Duration::from_secs(config.power.monitor_duration_secs);
                println!();
                println!("Monitoring power events for {} seconds...", duration.as_secs());
                let events = monitor_power_events(tools, &interface, duration).await?;
                println!("{} power events recorded", events.len());
            }
            Ok(())
        }
        Commands::Init | Commands::StorageInfo | Commands::ResetHistory | Commands::Archive => Ok(()),
    }
}

async fn analyze(
    analyzer: &mut Analyzer,
    config: &Config,
    data_dir: &DataDir,
    session: &Session,
    args: AnalyzeArgs,
) -> CliResult {
    let mut snapshot = analyzer.snapshot();

    let mut tracker = ConnectionTracker::new();
    analyzer.record_link(&mut tracker, snapshot.link.as_ref(), Utc::now())?;

    if args.roaming_test {
        let probe = Arc::new(LinkProbe::new(analyzer.tools(), analyzer.interface()));
        let measurement =
            measure_roaming(probe, config.roaming.poll_interval(), RoamingTest::Walk).await?;
        snapshot.roaming = Some(measurement);
    }

    if args.check_power {
        let report = PowerDetective::new(analyzer.tools(), analyzer.interface()).check_all();
        fix_script(&report, config);
        snapshot.power = Some(report);
    }

    println!("{}", render_console(&snapshot));

    if args.html_report {
        let path = write_html_report(data_dir, &snapshot)?;
        println!("HTML report: {}", path.display());
    }
    if args.create_archive {
        let path = create_archive(data_dir, session)?;
        println!("Archive created: {}", path.display());
    }
    Ok(())
}

fn print_power_report(report: &PowerReport) -> CliResult {
    println!("WiFi Power Management Check");
    println!("{}", "=".repeat(60));
    for findings in &report.categories {
        if findings.issues.is_empty() {
            continue;
        }
        println!();
        println!("{}:", findings.category);
        for issue in &findings.issues {
            println!("  [{}] {}", issue.severity, issue.issue);
            println!("      Impact: {}", issue.impact);
            if let Some(fix) = &issue.fix {
                println!("      Fix: {}", fix);
            }
        }
    }

    let mut summary = String::new();
    write_power_summary(&mut summary, report)?;
    println!();
    print!("{}", summary);
    Ok(())
}

fn fix_script(report: &PowerReport, config: &Config) {
    match write_fix_script(report, &config.power.fix_script) {
        Ok(Some(path)) => println!("Fix script written to {} (review before running)", path.display()),
        Ok(None) => {}
        Err(e) => warn!("{}", e),
    }
}

fn storage_info(data_dir: &DataDir, config: &Config) -> CliResult {
    let store = HistoryStore::open(data_dir.clone(), config.storage.retention_days, Utc::now());
    let info = store.storage_info();
    let kib = |bytes: u64| bytes as f64 / 1024.0;

    println!("Data directory: {}", info.data_dir.display());
    println!("  BSSID history:     {:>8.1} KiB ({} BSSIDs)", kib(info.history_bytes), info.bssids);
    println!("  Connection events: {:>8.1} KiB ({} events)", kib(info.events_bytes), info.events);
    println!("  Logs:              {:>8.1} KiB ({} files)", kib(info.log_bytes), info.log_files);
    println!("  Reports:           {:>8.1} KiB ({} files)", kib(info.report_bytes), info.report_files);
    println!("  Total:             {:>8.1} KiB", kib(info.total_bytes()));
    if let Some(oldest) = info.oldest_event {
        println!("  Oldest event: {}", oldest.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("  Retention: {} days", store.retention_days());
    Ok(())
}

fn reset_history(data_dir: &DataDir, config: &Config) -> CliResult {
    let mut store = HistoryStore::open(data_dir.clone(), config.storage.retention_days, Utc::now());
    let backups = store.reset(Utc::now())?;
    if backups.is_empty() {
        println!("No history to reset");
    } else {
        for backup in &backups {
            println!("Backed up: {}", backup.display());
        }
        println!("History cleared");
    }
    Ok(())
}
