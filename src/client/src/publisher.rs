use forwarder_common::{PublishContext, Sample};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config_manager::PublisherDefaults;
use crate::destination::Destination;
use crate::error::Result;
use crate::exporters::proto::{EventProto, Msg};
use crate::exporters::transport::{Transport, TransportEnum};
use crate::mapping::EventMapper;

/// Entry point used by the upstream pipeline.
#[allow(async_fn_in_trait)]
pub trait SamplePublisher {
    /// Attempts delivery of every sample, in order. Never fails: per-sample
    /// problems are logged and skipped.
    async fn publish_samples(&self, context: &PublishContext, samples: &[Sample]);
}

/// Relays samples to an event-index server as monitoring events.
///
/// The connection is opened on the first publish and then reused. It sits
/// behind a mutex held for a whole publish call, so concurrent callers never
/// race on the connect-if-needed step and each batch goes out in order.
pub struct RiemannPublisher {
    destination: Destination,
    mapper: EventMapper,
    transport: Mutex<TransportEnum>,
}

impl RiemannPublisher {
    /// Resolves `descriptor` against `defaults`. Configuration errors are the
    /// only errors this type ever returns.
    pub fn from_url(descriptor: &str, defaults: &PublisherDefaults) -> Result<Self> {
        let destination = Destination::resolve(descriptor, defaults)?;
        info!("RiemannPublisher created for {}", destination);

        Ok(Self::new(destination, defaults.default_ttl))
    }

    pub fn new(destination: Destination, default_ttl: u64) -> Self {
        RiemannPublisher {
            transport: Mutex::new(TransportEnum::for_kind(destination.transport)),
            mapper: EventMapper::new(default_ttl),
            destination,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub async fn is_connected(&self) -> bool {
        self.transport.lock().await.is_connected()
    }

    /// Drops the connection; the next publish opens a new one.
    pub async fn close(&self) -> Result<()> {
        self.transport.lock().await.close().await
    }

    async fn publish_sample(&self, transport: &mut TransportEnum, sample: &Sample) -> Result<()> {
        let event = self.mapper.to_event(sample)?;
        transport
            .send(&Msg::with_events(vec![EventProto::from(&event)]))
            .await
    }
}

impl SamplePublisher for RiemannPublisher {
    async fn publish_samples(&self, context: &PublishContext, samples: &[Sample]) {
        let mut transport = self.transport.lock().await;

        if !transport.is_connected() {
            match transport.connect(&self.destination).await {
                Ok(()) => debug!(
                    "Connected to {} via {}",
                    self.destination,
                    transport.variant_name()
                ),
                // sends below fail one by one and are logged individually
                Err(err) => warn!("Unable to connect to {}: {}", self.destination, err),
            }
        }

        for sample in samples {
            debug!(
                request_id = context.request_id(),
                "Publishing sample {:?} to {}",
                sample,
                self.destination.address()
            );

            if let Err(err) = self.publish_sample(&mut transport, sample).await {
                warn!(
                    request_id = context.request_id(),
                    "Unable to send sample {}: {}", sample.name, err
                );
            }
        }
    }
}
