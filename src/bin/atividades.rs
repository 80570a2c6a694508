use escola_services::{run_service, Service};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run_service(Service::Activities).await
}
