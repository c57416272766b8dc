use tokio::time::sleep;
use tracing::{info, warn};

use crate::broker::{BrokerError, BrokerGateway, TopologyDescriptor};
use crate::config::app::RetryPolicy;

/// Connect with bounded exponential backoff, then declare `topology`.
/// Exhausted retries return the last connection error; a topology
/// rejection is not retried.
pub async fn connect_with_retry(
    url: &str,
    topology: &TopologyDescriptor,
    retry: RetryPolicy,
    publish_timeout: std::time::Duration,
) -> Result<BrokerGateway, BrokerError> {
    let mut attempt = 1;
    let gateway = loop {
        match BrokerGateway::connect(url, publish_timeout).await {
            Ok(gateway) => break gateway,
            Err(e) if attempt < retry.attempts => {
                let delay = retry.delay_for(attempt);
                warn!(
                    attempt,
                    max_attempts = retry.attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "broker connect failed, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                warn!(attempt, error = %e, "broker connect failed, giving up");
                return Err(e);
            }
        }
    };
    info!(attempt, "broker connected");

    declare_or_close(gateway, topology).await
}

/// A gateway whose topology was rejected is closed before the error returns.
async fn declare_or_close(
    gateway: BrokerGateway,
    topology: &TopologyDescriptor,
) -> Result<BrokerGateway, BrokerError> {
    if let Err(e) = gateway.declare_topology(topology).await {
        if let Err(close_err) = gateway.close().await {
            warn!(error = %close_err, "broker close after topology failure failed");
        }
        return Err(e);
    }
    Ok(gateway)
}
