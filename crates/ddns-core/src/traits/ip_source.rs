// # IP Source Trait
//
// Defines the interface for observing the caller's current public IP.
//
// ## Implementations
//
// - Plain-text HTTP lookup service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//     let ip = source.current().await?;
//     println!("public IP: {}", ip);
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// An IP source is asked once per tick and must not cache: every call
/// observes the address afresh. The returned text is used as the record
/// answer verbatim, so implementations should not reformat it.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Observe the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The address as reported by the source
    /// - `Err(Error)`: If the source could not be reached or answered unsuccessfully
    async fn current(&self) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
