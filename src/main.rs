use gridstore::{Matrix, MatrixSdkBuilder, SdkConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging/tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Optional JSON config path; otherwise run with telemetry on
    let config = match std::env::args().nth(1) {
        Some(path) => SdkConfig::from_file(path)?,
        None => SdkConfig { enable_telemetry: true, ..SdkConfig::default() },
    };
    tracing::info!("Gridstore demo starting with {:?}", config);

    let sdk = MatrixSdkBuilder::from_config(config).build();

    sdk.create(Matrix::new("m1", "Test Matrix 1", vec![vec![1.0, 2.0], vec![3.0, 4.0]])).await?;
    sdk.create(Matrix::new("m2", "Test Matrix 2", vec![vec![5.0, 6.0], vec![7.0, 8.0]])).await?;

    let sum = sdk.add("m1", "m2", None).await?;
    println!("Add result ({}): {:?}", sum.id, sum.data);

    let product = sdk.multiply("m1", "m2", None).await?;
    println!("Multiply result ({}): {:?}", product.id, product.data);

    let transposed = sdk.transpose("m1", None).await?;
    println!("Transpose result ({}): {:?}", transposed.id, transposed.data);

    let stats = sdk.statistics("m1").await?;
    println!("Statistics: {}", serde_json::to_string_pretty(&stats)?);

    match sdk.metrics_snapshot() {
        Some(snapshot) => println!("Telemetry snapshot:\n{}", snapshot),
        None => println!("Telemetry disabled"),
    }

    sdk.close().await;
    Ok(())
}
