#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::Client as DynamoClient;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use natal_chart::domain::model::{NatalChartRecord, RawBirthEvent};
#[cfg(feature = "lambda")]
use natal_chart::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use natal_chart::{
    DynamoCacheStore, HttpEphemeris, HttpHouseSystem, LambdaConfig, NatalChartAssembler,
};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "lambda")]
use std::sync::Arc;
#[cfg(feature = "lambda")]
use tokio::sync::OnceCell;

#[cfg(feature = "lambda")]
const ESTIMATED_BIRTH_TIME: &str = "12:00";

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub user_id: String,
    pub birth_date: Option<String>,
    pub birth_time: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub iana_time_zone: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub user_id: String,
    pub chart_type: &'static str,
    pub is_time_estimated: bool,
    pub chart: NatalChartRecord,
}

// 後端與快取客戶端在冷啟動時建立一次，之後重複使用
#[cfg(feature = "lambda")]
static ASSEMBLER: OnceCell<NatalChartAssembler> = OnceCell::const_new();

#[cfg(feature = "lambda")]
async fn build_assembler() -> Result<NatalChartAssembler, Error> {
    let config = LambdaConfig::from_env()?;
    config.validate()?;

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&aws)
        .region(Region::new(config.region.clone()))
        .build();
    let store = DynamoCacheStore::new(
        DynamoClient::from_conf(dynamo_config),
        config.cache_table_name.clone(),
    );

    let ephemeris = HttpEphemeris::new(
        config.ephemeris_endpoint.clone(),
        config.ephemeris_version.clone(),
    );
    let mut assembler =
        NatalChartAssembler::new(Arc::new(ephemeris), Arc::new(store), config.engine.clone());
    if let Some(endpoint) = &config.houses_endpoint {
        assembler = assembler.with_house_system(Arc::new(HttpHouseSystem::new(endpoint)));
    } else {
        tracing::warn!("HOUSES_ENDPOINT not set, charts will be produced without houses");
    }
    Ok(assembler)
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let request = event.payload;
    tracing::info!("Received natal chart request for userId: {}", request.user_id);

    // 未提供出生時間時以正午估算，並標記為估算值
    let is_time_estimated = request
        .birth_time
        .as_deref()
        .map_or(true, |time| time.trim().is_empty());
    let birth_time = if is_time_estimated {
        Some(ESTIMATED_BIRTH_TIME.to_string())
    } else {
        request.birth_time
    };

    let raw = RawBirthEvent {
        birth_date: request.birth_date,
        birth_time,
        latitude: request.latitude,
        longitude: request.longitude,
        iana_time_zone: request.iana_time_zone,
    };

    let assembler = ASSEMBLER.get_or_try_init(build_assembler).await?;
    let chart = assembler.compute_from_raw(&raw).await.map_err(|e| {
        tracing::error!(
            "Natal chart failed for userId {}: {} ({})",
            request.user_id,
            e,
            e.recovery_suggestion()
        );
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    tracing::info!(
        "Successfully generated natal chart for userId: {}",
        request.user_id
    );
    Ok(Response {
        user_id: request.user_id,
        chart_type: "natal",
        is_time_estimated,
        chart,
    })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();
    run(service_fn(function_handler)).await
}
