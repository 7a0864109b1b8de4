use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use swaglabs_e2e::suite::{self, RunnerConfig, SuiteRunner};
use swaglabs_e2e::{logging, ChromeBrowser, Env};

// Flags override the settings Env::from_env reads; the environment is read there only
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Suite to run
    #[arg(short, long)]
    suite: Option<String>,

    /// Storefront URL
    #[arg(long)]
    base_url: Option<String>,

    /// Wait/assertion timeout in milliseconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Highlight every element the suite touches
    #[arg(long)]
    debug_highlight: bool,

    /// Only run scenarios whose name contains this text
    #[arg(short, long)]
    filter: Option<String>,

    /// Scenarios run concurrently
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Directory for the JSON report and failure screenshots
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Connect to a running Chrome instead of launching one
    #[arg(long)]
    debug_port: Option<u16>,

    /// List registered suites and exit
    #[arg(long)]
    list: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn apply(&self, env: &mut Env) {
        if let Some(suite) = &self.suite {
            env.test_suite = suite.clone();
        }
        if let Some(base_url) = &self.base_url {
            env.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            env.timeout = Duration::from_millis(timeout);
        }
        if self.headed {
            env.headless = false;
        }
        if self.debug_highlight {
            env.debug_highlight = true;
        }
        if let Some(dir) = &self.report_dir {
            env.report_dir = dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    if args.list {
        for (name, description) in suite::SUITES {
            println!("{}  {}", name, description);
        }
        return Ok(());
    }

    let mut env = Env::from_env();
    args.apply(&mut env);
    log::info!("Running suite {} against {}", env.test_suite, env.base_url);

    let mut selected = suite::build_suite(&env.test_suite, &env)?;
    if let Some(filter) = &args.filter {
        selected.retain_matching(filter);
    }

    let browser = match args.debug_port {
        Some(port) => ChromeBrowser::connect_debug_port(port)
            .await?
            .with_navigation_timeout(env.navigation_timeout),
        None => ChromeBrowser::from_env(&env).await?,
    };

    let runner = SuiteRunner::new(RunnerConfig {
        workers: args.workers,
        ..RunnerConfig::from_env(&env)
    });
    let report = runner.run(&selected, &browser).await;

    match report.write_to(&env.report_dir).await {
        Ok(path) => log::info!("Report written to {}", path.display()),
        Err(e) => log::error!("Failed to write report: {}", e),
    }
    println!("{}", report.summary());

    if let Err(e) = browser.close().await {
        log::warn!("Failed to close Chrome: {}", e);
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
