use ab_compare::utils::error::AbError;
use ab_compare::utils::logger::{self, LogFormat};
use ab_compare::utils::validation::Validate;
use ab_compare::{AbTestPipeline, AnalysisEngine, CliConfig, LocalStorage, TomlConfig};
use clap::Parser;

/// 印出錯誤與建議，並依嚴重程度結束程序；缺少輸入只提示上傳
fn report_failure(stage: &str, e: &AbError) {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = e.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

fn main() {
    let mut config = CliConfig::parse();

    logger::init_logger(LogFormat::from_json_flag(config.log_json), config.verbose);

    tracing::info!("Starting ab-compare CLI");

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path) {
            Ok(file) => config = config.with_file_defaults(file),
            Err(e) => {
                report_failure(&format!("Loading config file '{}'", path), &e);
                return;
            }
        }
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        report_failure("Configuration validation", &e);
        return;
    }

    let quiet = config.quiet;
    let storage = LocalStorage::new(".");
    let pipeline = AbTestPipeline::new(storage, config);
    let engine = AnalysisEngine::new(pipeline);

    match engine.run() {
        Ok(output) => {
            if !quiet {
                println!("{}", output.report_text);
            }
            for path in &output.written_files {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => report_failure("Comparison", &e),
    }
}
