use clap::Parser;
use seo_analytics_launcher::app;
use seo_analytics_launcher::config::{is_truthy, LAUNCHER_VERBOSE_ENV};
use seo_analytics_launcher::core::launch;
use seo_analytics_launcher::utils::logger;
use seo_analytics_launcher::{Args, Environment, SystemRunner};

fn main() {
    let args = Args::parse();
    let base_env = Environment::from_process();

    logger::init_cli_logger(is_truthy(base_env.get(LAUNCHER_VERBOSE_ENV)));

    if let Err(e) = app::run(args, base_env, &SystemRunner::new(), launch::exec) {
        tracing::error!("❌ Launch aborted: {}", e);
        for line in app::failure_lines(&e) {
            eprintln!("{}", line);
        }
        std::process::exit(e.exit_code());
    }
}
