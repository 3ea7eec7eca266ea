use clap::Parser;
use natal_chart::domain::ports::CacheStore;
use natal_chart::utils::error::ErrorSeverity;
use natal_chart::utils::{logger, validation::Validate};
use natal_chart::{
    CliConfig, HttpEphemeris, HttpHouseSystem, LocalCacheStore, MemoryCacheStore,
    NatalChartAssembler,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting natal-chart CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    let settings = match cli.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 建立後端與快取
    let store: Arc<dyn CacheStore> = match &settings.cache_dir {
        Some(dir) => Arc::new(LocalCacheStore::new(dir)),
        None => Arc::new(MemoryCacheStore::new()),
    };
    let ephemeris = Arc::new(HttpEphemeris::new(
        settings.ephemeris_endpoint.clone(),
        settings.ephemeris_version.clone(),
    ));
    let mut assembler = NatalChartAssembler::new(ephemeris, store, settings.engine.clone());
    match &settings.houses_endpoint {
        Some(endpoint) => {
            assembler = assembler.with_house_system(Arc::new(HttpHouseSystem::new(endpoint)));
        }
        None => tracing::warn!("No house endpoint configured, houses will be skipped"),
    }

    match assembler.compute_from_raw(&cli.raw_event()).await {
        Ok(chart) => {
            tracing::info!(
                "✅ Natal chart computed (houses: {:?})",
                chart.houses.status
            );
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Natal chart failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
